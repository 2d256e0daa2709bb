//! Trailing-edge debounce for viewport resize events.

use crate::Viewport;

pub const RESIZE_DEBOUNCE_MS: u32 = 500;

/// One-shot timers provided by the host event loop.
pub trait Scheduler {
    type Handle;

    fn schedule(&mut self, delay_ms: u32) -> Self::Handle;
    fn cancel(&mut self, handle: Self::Handle);
}

/// Collapses a burst of resize events into a single recomputation that runs
/// once the burst has been quiet for `delay_ms`.
#[derive(Debug)]
pub struct ResizeDebouncer<H> {
    delay_ms: u32,
    pending: Option<H>,
    latest: Option<Viewport>,
}

impl<H> ResizeDebouncer<H> {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            pending: None,
            latest: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Records `viewport` and restarts the quiet-period timer.
    pub fn on_resize<S>(&mut self, viewport: Viewport, scheduler: &mut S)
    where
        S: Scheduler<Handle = H>,
    {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel(handle);
        }
        self.latest = Some(viewport);
        self.pending = Some(scheduler.schedule(self.delay_ms));
    }

    /// Called from the timer callback; yields the last recorded viewport once.
    pub fn fire(&mut self) -> Option<Viewport> {
        self.pending = None;
        self.latest.take()
    }
}

impl<H> Default for ResizeDebouncer<H> {
    fn default() -> Self {
        Self::new(RESIZE_DEBOUNCE_MS)
    }
}
