//! Human-readable output for the media layer
//!
//! Every component reports what it does as a typed [`MediaEvent`] pushed
//! into an injected [`OutputSink`]. The binary prints them to stdout, tests
//! capture them with [`MemorySink`].

pub mod event;
pub mod sink;

pub use event::MediaEvent;
pub use sink::{ConsoleSink, MemorySink, OutputSink};
