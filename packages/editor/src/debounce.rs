//! Debouncing for text input.
//!
//! Time is passed in by the caller, so the debouncer is deterministic and
//! never owns a timer. Feed every input with [`InputDebouncer::schedule`]
//! and call [`InputDebouncer::poll`] from the event loop; only the input
//! scheduled last fires, once its window has elapsed.

use web_time::{Duration, Instant};

/// Default debounce window
pub const DEFAULT_DEBOUNCE_MS: u64 = 250;

#[derive(Debug, Clone)]
pub struct InputDebouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> InputDebouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Schedule `input`, replacing whatever was pending
    pub fn schedule(&mut self, input: T, now: Instant) {
        self.pending = Some((input, now + self.window));
    }

    /// Take the pending input if its window has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if now >= *deadline => self.pending.take().map(|(input, _)| input),
            _ => None,
        }
    }

    /// Take the pending input regardless of the window
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(input, _)| input)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending input becomes due
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }
}

impl<T> Default for InputDebouncer<T> {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DEBOUNCE_MS))
    }
}
