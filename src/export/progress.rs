//! Progress reporting for long exports

use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress tracker for the order scan
///
/// Draws to stderr so stdout only carries the completion message.
pub struct ProgressTracker {
    /// Start time of the operation
    start_time: Instant,
    /// Progress bar (optional, can be disabled)
    bar: Option<ProgressBar>,
}

impl ProgressTracker {
    /// Create a new progress tracker
    ///
    /// # Arguments
    /// * `total` - Estimated number of orders, if known
    /// * `enable_bar` - Whether to display a progress bar
    pub fn new(total: Option<u64>, enable_bar: bool) -> Self {
        let bar = enable_bar.then(|| match total {
            Some(n) => {
                let bar = ProgressBar::new(n);
                if let Ok(style) = ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} orders {msg}")
                {
                    bar.set_style(style.progress_chars("#>-"));
                }
                bar
            }
            None => {
                let bar = ProgressBar::new_spinner();
                if let Ok(style) =
                    ProgressStyle::default_spinner().template("{spinner:.green} {pos} orders {msg}")
                {
                    bar.set_style(style);
                }
                bar
            }
        });

        Self {
            start_time: Instant::now(),
            bar,
        }
    }

    /// A tracker that draws nothing
    pub fn disabled() -> Self {
        Self::new(None, false)
    }

    /// Update progress with the number of orders exported so far
    pub fn update(&self, count: u64) {
        if let Some(ref bar) = self.bar {
            bar.set_position(count);

            let elapsed = self.start_time.elapsed().as_secs_f64();
            if elapsed > 0.0 {
                let speed = count as f64 / elapsed;
                bar.set_message(format!("({:.0} orders/sec)", speed));
            }
        }
    }

    /// Finish and clear the progress bar
    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_tracker_with_total() {
        let tracker = ProgressTracker::new(Some(1000), false);
        tracker.update(500);
        tracker.finish();
    }

    #[test]
    fn test_progress_tracker_hidden_bar() {
        let tracker = ProgressTracker::new(None, true);
        if let Some(ref bar) = tracker.bar {
            bar.set_draw_target(indicatif::ProgressDrawTarget::hidden());
        }
        tracker.update(42);
        assert_eq!(tracker.bar.as_ref().map(|b| b.position()), Some(42));
        tracker.finish();
    }
}
