//! Output sinks

use super::event::MediaEvent;
use std::sync::Mutex;

/// Destination for human-readable media events.
pub trait OutputSink: Send + Sync {
    /// Deliver one event
    fn emit(&self, event: &MediaEvent);
}

/// Prints each event as a line on stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn emit(&self, event: &MediaEvent) {
        println!("{}", event);
    }
}

/// Captures events in memory, in emission order
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<MediaEvent>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all captured events
    pub fn events(&self) -> Vec<MediaEvent> {
        self.lock().clone()
    }

    /// Captured events rendered as console lines
    pub fn lines(&self) -> Vec<String> {
        self.lock().iter().map(ToString::to_string).collect()
    }

    /// Number of captured events matching `predicate`
    pub fn count(&self, predicate: impl Fn(&MediaEvent) -> bool) -> usize {
        self.lock().iter().filter(|e| predicate(e)).count()
    }

    /// Drop everything captured so far
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<MediaEvent>> {
        // poisoned only if an emitter panicked; the Vec itself stays valid
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl OutputSink for MemorySink {
    fn emit(&self, event: &MediaEvent) {
        self.lock().push(event.clone());
    }
}
