//! Terminal progress bar fed by the matcher's progress hooks.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use overlap_match::ProgressObserver;

pub struct BarObserver {
    bar: ProgressBar,
}

impl BarObserver {
    pub fn new() -> Result<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "  [{elapsed_precise}] {bar:30.cyan/blue} {pos}/{len} Matching source records...",
            )?
            .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        Ok(Self { bar })
    }
}

impl ProgressObserver for BarObserver {
    fn start(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
    }

    fn advance(&self, processed: usize) {
        self.bar.set_position(processed as u64);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
