use indicatif::{ProgressBar, ProgressStyle};
use mabfeat::pipeline::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use tracing::warn;

#[derive(Clone)]
pub struct BatchProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl BatchProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0).with_style(Self::bar_style());
        pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        pb.finish_and_clear();

        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(pb_guard) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::BatchStart { total_files } => {
                    pb_guard.reset();
                    pb_guard.set_style(Self::bar_style());
                    pb_guard.set_length(total_files);
                    pb_guard.set_position(0);
                    pb_guard.set_message("Processing");
                }
                Progress::FileFinished { path, kept_repeats } => {
                    pb_guard.inc(1);
                    pb_guard.println(format!(
                        "  ✓ {} ({} repeat(s) kept)",
                        path.display(),
                        kept_repeats
                    ));
                }
                Progress::BatchFinish => {
                    if pb_guard.position() < pb_guard.length().unwrap_or(0) {
                        pb_guard.set_position(pb_guard.length().unwrap_or(0));
                    }
                    pb_guard.finish_with_message("✓ Done");
                }
                Progress::Message(msg) => {
                    if !pb_guard.is_finished() {
                        pb_guard.println(format!("  {}", msg));
                    } else {
                        pb_guard.set_message(msg);
                    }
                }
            }
        })
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<12} [{bar:40.cyan/blue}] {pos}/{len} files")
            .expect("Failed to create bar style template")
            .progress_chars("##-")
    }
}

impl Default for BatchProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
