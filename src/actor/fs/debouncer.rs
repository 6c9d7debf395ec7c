use std::time::Duration;

use tokio::time::Instant;

use super::types::WatchEvent;

/// Default quiet period before a batch is delivered.
pub const DEBOUNCE: Duration = Duration::from_millis(100);

/// Pure debouncer: only handles timing and buffering.
///
/// Events are kept in arrival order and never deduplicated; every push
/// moves the deadline to `window` after the newest event.
pub(super) struct Debouncer {
    window: Duration,
    pub(super) buffer: Vec<WatchEvent>,
    pub(super) last_event: Option<Instant>,
}

impl Debouncer {
    pub(super) fn new(window: Duration) -> Self {
        Self {
            window,
            buffer: Vec::new(),
            last_event: None,
        }
    }

    pub(super) fn push(&mut self, event: WatchEvent) {
        crate::debug!("watch"; "event {}: {:?}", event.kind.label(), event.paths);
        self.buffer.push(event);
        self.last_event = Some(Instant::now());
    }

    /// When the buffered batch becomes due, if anything is buffered.
    pub(super) fn deadline(&self) -> Option<Instant> {
        if self.buffer.is_empty() {
            return None;
        }
        self.last_event.map(|t| t + self.window)
    }

    /// Take the whole batch and reset the timer.
    pub(super) fn take(&mut self) -> Vec<WatchEvent> {
        self.last_event = None;
        std::mem::take(&mut self.buffer)
    }
}
