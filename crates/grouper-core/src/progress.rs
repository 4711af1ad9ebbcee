//! Progress reporting and the per-run guard

use std::sync::Arc;
use std::time::Instant;

/// Receives progress updates while a run is in flight.
///
/// Implementations use interior mutability; the engine only holds a shared
/// handle.
pub trait Progress: Send + Sync {
    /// Show `info` under `title`; `fraction` is in `0.0..=1.0`.
    fn display(&self, title: &str, info: &str, fraction: f32);

    /// Remove any progress display.
    fn clear(&self);
}

/// Discards all progress updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn display(&self, _title: &str, _info: &str, _fraction: f32) {}

    fn clear(&self) {}
}

/// Clears progress and logs elapsed time when dropped.
///
/// Held for the duration of a run so both happen on every exit path,
/// including early returns through `?`.
pub struct RunGuard {
    progress: Arc<dyn Progress>,
    operation: &'static str,
    started: Instant,
}

impl RunGuard {
    pub fn new(progress: Arc<dyn Progress>, operation: &'static str) -> Self {
        tracing::debug!(operation, "run started");
        Self {
            progress,
            operation,
            started: Instant::now(),
        }
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.progress.clear();
        tracing::info!(
            operation = self.operation,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "run finished"
        );
    }
}
