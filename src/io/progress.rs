//! Extraction progress display for folder analysis

use crate::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
use crate::spatial::bounds::DatasetId;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::LazyLock;
use std::sync::atomic::{AtomicUsize, Ordering};

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Datasets: [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static DATASET_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_spinner()
        .template("  {prefix} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
});

/// Tracks bounds extraction over a folder of datasets
///
/// Shows one overall bar plus a short rolling list of the most recently
/// finished datasets, so large folders do not flood the terminal.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: ProgressBar,
    recent_bars: Vec<ProgressBar>,
    completed: AtomicUsize,
    failed: AtomicUsize,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a progress manager with an empty batch bar
    pub fn new() -> Self {
        let multi_progress = MultiProgress::new();
        let batch_bar = multi_progress.add(ProgressBar::new(0));
        batch_bar.set_style(BATCH_STYLE.clone());

        Self {
            multi_progress,
            batch_bar,
            recent_bars: Vec::new(),
            completed: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        }
    }

    /// Size the display for `dataset_count` extractions
    pub fn initialize(&mut self, dataset_count: usize) {
        self.batch_bar.set_length(dataset_count as u64);
        self.batch_bar.set_position(0);
        self.completed.store(0, Ordering::Relaxed);
        self.failed.store(0, Ordering::Relaxed);

        let bars_to_create = dataset_count.min(MAX_INDIVIDUAL_PROGRESS_BARS);
        while self.recent_bars.len() < bars_to_create {
            let bar = self.multi_progress.add(ProgressBar::new_spinner());
            bar.set_style(DATASET_STYLE.clone());
            self.recent_bars.push(bar);
        }
    }

    /// Record one finished extraction
    pub fn complete_dataset(&self, dataset: &DatasetId, succeeded: bool) {
        let index = self.completed.fetch_add(1, Ordering::Relaxed);
        if !succeeded {
            let _ = self.failed.fetch_add(1, Ordering::Relaxed);
        }
        self.batch_bar.inc(1);

        // Rotate through the rolling bars so the newest result is always visible
        if !self.recent_bars.is_empty() {
            if let Some(bar) = self.recent_bars.get(index % self.recent_bars.len()) {
                bar.set_prefix(if succeeded { "✓" } else { "✗" });
                bar.set_message(dataset.to_string());
            }
        }
    }

    /// Number of extractions recorded so far
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    /// Number of failed extractions recorded so far
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::Relaxed)
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        let failed = self.failed();
        let message = if failed == 0 {
            "all datasets analysed".to_string()
        } else {
            format!("{failed} excluded")
        };
        self.batch_bar.finish_with_message(message);
        for bar in &self.recent_bars {
            bar.finish_and_clear();
        }
        let _ = self.multi_progress.clear();
    }
}
