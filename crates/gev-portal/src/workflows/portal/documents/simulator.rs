use std::time::Duration;

use rand::Rng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use super::upload::{UploadEvent, UploadProgress};
use super::DocumentId;

/// Timing and outcome odds of the simulated file transfer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UploadSimulation {
    tick: Duration,
    step: u8,
    settle: Duration,
    success_ratio: f64,
}

impl UploadSimulation {
    pub fn new(tick: Duration, step: u8, settle: Duration, success_ratio: f64) -> Self {
        let success_ratio = if success_ratio.is_finite() {
            success_ratio.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            tick,
            step: step.clamp(1, 100),
            settle,
            success_ratio,
        }
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn settle(&self) -> Duration {
        self.settle
    }

    pub fn success_ratio(&self) -> f64 {
        self.success_ratio
    }

    /// Runs one upload attempt on its own task, reporting through `events`.
    /// Must be called inside a tokio runtime.
    pub fn spawn(
        &self,
        document: DocumentId,
        attempt: u64,
        events: mpsc::UnboundedSender<UploadEvent>,
    ) -> UploadTask {
        let simulation = *self;
        let handle = tokio::spawn(async move {
            let send = |progress| {
                events
                    .send(UploadEvent {
                        document,
                        attempt,
                        progress,
                    })
                    .is_ok()
            };

            let mut progress = 0u8;
            while progress < 100 {
                tokio::time::sleep(simulation.tick).await;
                progress = progress.saturating_add(simulation.step).min(100);
                if !send(UploadProgress::Advanced(progress)) {
                    return;
                }
            }

            tokio::time::sleep(simulation.settle).await;
            let success = rand::rng().random_bool(simulation.success_ratio);
            debug!(%document, attempt, success, "simulated upload settled");
            send(UploadProgress::Finished { success });
        });

        UploadTask { handle }
    }
}

impl Default for UploadSimulation {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(150),
            10,
            Duration::from_millis(500),
            0.8,
        )
    }
}

/// Handle to a running upload; dropping it cancels the transfer.
#[derive(Debug)]
pub struct UploadTask {
    handle: JoinHandle<()>,
}

impl Drop for UploadTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
