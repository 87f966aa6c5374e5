use indicatif::{ProgressBar, ProgressStyle};

use crate::importer::application::ports::outgoing::ImportProgress;

const TEMPLATE: &str = "{msg} |{bar:40}| {pos}/{len} Rows Imported ({percent}%)";

/// Terminal progress bar on stderr. Draws nothing when stderr is not a tty.
pub struct IndicatifProgress {
    bar: ProgressBar,
}

impl IndicatifProgress {
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        bar.set_message("Importing Topics");
        Self { bar }
    }

    #[cfg(test)]
    pub fn hidden(total: usize) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(total as u64);
        Self { bar }
    }

    #[cfg(test)]
    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl ImportProgress for IndicatifProgress {
    fn advance(&mut self) {
        self.bar.inc(1);
    }

    // Stops at the imported count; skipped rows never fill the bar.
    fn finish(&mut self) {
        self.bar.abandon();
    }
}
