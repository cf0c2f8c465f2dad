//! Resident set bookkeeping and load/unload plan computation
//!
//! The manager never performs I/O. It decides which dataset indices must
//! load or unload for a tile, then records what the render collaborator
//! actually achieved. Residency is a bitset over store indices; resource
//! handles for resident datasets are kept alongside so they can be handed
//! back for unloading.

use std::collections::BTreeMap;

use bitvec::prelude::*;
use tracing::{debug, warn};

use crate::io::error::LoadError;
use crate::residency::plan::{LoadMode, LoadPlan};
use crate::spatial::coordinate::TileCoordinate;
use crate::spatial::store::TileStore;

/// What happened to one planned load once the collaborator finished
#[derive(Debug, PartialEq, Eq)]
pub enum LoadCompletion<H> {
    /// The dataset is now resident
    Resident,
    /// The collaborator failed; the dataset stays non-resident
    Failed(LoadError),
    /// The plan was superseded or the load duplicated a resident dataset;
    /// the returned handle must be unloaded immediately
    Stale(H),
}

/// Tracks which datasets are loaded and plans transitions between tiles
#[derive(Debug)]
pub struct ResidentSetManager<H> {
    resident: BitVec,
    handles: BTreeMap<usize, H>,
    active: Option<(TileCoordinate, LoadMode)>,
    generation: u64,
}

impl<H> ResidentSetManager<H> {
    /// Create an empty resident set for a store of `dataset_count` datasets
    pub fn new(dataset_count: usize) -> Self {
        Self {
            resident: bitvec![0; dataset_count],
            handles: BTreeMap::new(),
            active: None,
            generation: 0,
        }
    }

    /// Plan the transition that makes `tile` active under `mode`
    ///
    /// Every resident dataset the tile does not require is scheduled for
    /// unloading; every required dataset that is not resident is scheduled
    /// for loading. The plan becomes the newest one, superseding any plan
    /// whose loads are still in flight.
    pub fn activate(
        &mut self,
        store: &TileStore,
        tile: TileCoordinate,
        mode: LoadMode,
    ) -> LoadPlan {
        let required = mode.select(store.indices(tile));

        let unload: Vec<usize> = self
            .resident
            .iter_ones()
            .filter(|index| !required.contains(index))
            .collect();
        let load: Vec<usize> = required
            .iter()
            .copied()
            .filter(|&index| !self.is_resident(index))
            .collect();

        self.generation += 1;
        self.active = Some((tile, mode));

        debug!(
            tile = %tile,
            mode = %mode,
            load = load.len(),
            unload = unload.len(),
            generation = self.generation,
            "planned tile activation"
        );

        LoadPlan {
            tile,
            mode,
            load,
            unload,
            generation: self.generation,
        }
    }

    /// Remove `index` from the resident set, returning its handle for unloading
    pub fn release(&mut self, index: usize) -> Option<H> {
        if let Some(mut bit) = self.resident.get_mut(index) {
            *bit = false;
        }
        self.handles.remove(&index)
    }

    /// Record the outcome of one planned load
    ///
    /// Successful loads only become resident when `plan` is still the
    /// newest plan and the dataset is not already resident.
    pub fn complete_load(
        &mut self,
        plan: &LoadPlan,
        index: usize,
        outcome: Result<H, LoadError>,
    ) -> LoadCompletion<H> {
        let handle = match outcome {
            Ok(handle) => handle,
            Err(error) => {
                warn!(dataset = %error.dataset, reason = %error.reason, "dataset failed to load");
                return LoadCompletion::Failed(error);
            }
        };

        if !self.is_current(plan) || self.is_resident(index) {
            debug!(
                index,
                plan_tile = %plan.tile,
                plan_generation = plan.generation,
                generation = self.generation,
                "discarding load from superseded plan"
            );
            return LoadCompletion::Stale(handle);
        }

        match self.resident.get_mut(index) {
            Some(mut bit) => *bit = true,
            None => return LoadCompletion::Stale(handle),
        }
        let _ = self.handles.insert(index, handle);
        LoadCompletion::Resident
    }

    /// Whether `plan` is the most recently issued plan
    pub const fn is_current(&self, plan: &LoadPlan) -> bool {
        plan.generation == self.generation
    }

    /// Whether the dataset at `index` is resident
    pub fn is_resident(&self, index: usize) -> bool {
        self.resident.get(index).as_deref() == Some(&true)
    }

    /// Resident dataset indices in ascending order
    pub fn resident_indices(&self) -> Vec<usize> {
        self.resident.iter_ones().collect()
    }

    /// Number of resident datasets
    pub fn resident_count(&self) -> usize {
        self.resident.count_ones()
    }

    /// Handle of a resident dataset
    pub fn handle(&self, index: usize) -> Option<&H> {
        self.handles.get(&index)
    }

    /// Tile and mode of the newest plan
    pub const fn active(&self) -> Option<(TileCoordinate, LoadMode)> {
        self.active
    }

    /// Release every resident dataset, returning handles in index order
    pub fn drain(&mut self) -> Vec<(usize, H)> {
        self.resident.fill(false);
        self.active = None;
        self.generation += 1;
        std::mem::take(&mut self.handles).into_iter().collect()
    }
}
