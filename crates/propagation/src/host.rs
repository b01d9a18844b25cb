//! Cooperative checkpoints between a long propagation and whoever is running it.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Called at batch boundaries with the completed fraction in `[0, 1]`.
///
/// Within one propagation the reported fractions never decrease, and a run that is not
/// cancelled ends with a checkpoint at exactly `1.0`. Returning `ControlFlow::Break(())` stops the propagation, which then returns the
/// samples produced so far marked as cancelled.
pub trait PropagationHost {
    fn checkpoint(&mut self, progress: f64) -> ControlFlow<()>;
}

impl<F> PropagationHost for F
where
    F: FnMut(f64) -> ControlFlow<()>,
{
    fn checkpoint(&mut self, progress: f64) -> ControlFlow<()> {
        self(progress)
    }
}

/// Forwards checkpoints to `inner` with progress mapped from `[0, 1]` onto
/// `[start, 1]`, so a nested stage keeps the outer run's progress monotone.
pub(crate) struct RemainingProgress<'h, H: ?Sized> {
    inner: &'h mut H,
    start: f64,
}

impl<'h, H: PropagationHost + ?Sized> RemainingProgress<'h, H> {
    pub(crate) fn new(inner: &'h mut H, start: f64) -> Self {
        Self {
            inner,
            start: start.clamp(0.0, 1.0),
        }
    }
}

impl<H: PropagationHost + ?Sized> PropagationHost for RemainingProgress<'_, H> {
    fn checkpoint(&mut self, progress: f64) -> ControlFlow<()> {
        let progress = progress.clamp(0.0, 1.0);
        self.inner.checkpoint(1.0 - (1.0 - self.start) * (1.0 - progress))
    }
}

/// Host that never interrupts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unattended;

impl PropagationHost for Unattended {
    fn checkpoint(&mut self, _progress: f64) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// Shared flag another thread can raise to stop a propagation at its next checkpoint.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

impl PropagationHost for CancellationToken {
    fn checkpoint(&mut self, _progress: f64) -> ControlFlow<()> {
        if self.is_cancelled() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_progress_maps_onto_tail_of_outer_run() {
        let mut seen = Vec::new();
        let mut record = |p: f64| -> ControlFlow<()> {
            seen.push(p);
            ControlFlow::Continue(())
        };
        let mut nested = RemainingProgress::new(&mut record, 0.4);
        let _ = nested.checkpoint(0.0);
        let _ = nested.checkpoint(0.5);
        let _ = nested.checkpoint(1.0);
        assert_eq!(seen.len(), 3);
        assert!((seen[0] - 0.4).abs() < 1e-15);
        assert!((seen[1] - 0.7).abs() < 1e-15);
        assert_eq!(seen[2], 1.0);
    }
}
