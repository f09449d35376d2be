use std::time::{Duration, Instant};

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Mutex;

use crate::pipeline::{RunState, StageObserver};

/// Spinners stay on screen at least this long, even if the call was faster.
pub const MIN_INDICATOR_DISPLAY: Duration = Duration::from_secs(2);

pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.magenta} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}

/// Terminal progress for a pipeline run.
///
/// Generation shows "Finding Those Songs!", resolution and publishing share
/// "Creating Playlist!". A spinner is only cleared once it has been visible
/// for the minimum display time.
pub struct StageSpinner {
    current: Mutex<Option<(ProgressBar, Instant)>>,
    min_display: Duration,
}

impl StageSpinner {
    pub fn new() -> Self {
        Self::with_min_display(MIN_INDICATOR_DISPLAY)
    }

    pub fn with_min_display(min_display: Duration) -> Self {
        StageSpinner {
            current: Mutex::new(None),
            min_display,
        }
    }

    async fn finish_current(&self) {
        let previous = self.current.lock().await.take();
        if let Some((pb, started)) = previous {
            let elapsed = started.elapsed();
            if elapsed < self.min_display {
                tokio::time::sleep(self.min_display - elapsed).await;
            }
            pb.finish_and_clear();
        }
    }
}

impl Default for StageSpinner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StageObserver for StageSpinner {
    async fn enter(&self, state: RunState) {
        let message = match state {
            RunState::Generating => "Finding Those Songs!",
            RunState::Resolving => "Creating Playlist!",
            // keeps the "Creating Playlist!" spinner running
            RunState::Publishing => return,
            _ => {
                self.finish_current().await;
                return;
            }
        };

        self.finish_current().await;
        *self.current.lock().await = Some((spinner(message), Instant::now()));
    }
}
