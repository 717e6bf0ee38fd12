//! Tier-2 resource type
//!
//! A [`RealResource`] is the heavier object built on top of exactly one
//! intrinsic payload. The resource cache constructs it at most once per key.

use super::payload::IntrinsicPayload;
use crate::output::{MediaEvent, OutputSink};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Anything that can be shown to a principal
pub trait Renderable {
    /// Resource name
    fn name(&self) -> &str;

    /// Render the resource for `principal`, reporting it to `sink`
    fn render(&self, principal: &str, sink: &dyn OutputSink);
}

/// Fully constructed resource wrapping one shared payload
#[derive(Debug)]
pub struct RealResource {
    payload: Arc<IntrinsicPayload>,
    instantiated_at: DateTime<Utc>,
}

impl RealResource {
    pub fn new(payload: Arc<IntrinsicPayload>) -> Self {
        Self {
            payload,
            instantiated_at: Utc::now(),
        }
    }

    /// The shared payload backing this resource
    pub fn payload(&self) -> &Arc<IntrinsicPayload> {
        &self.payload
    }

    /// When this resource was constructed
    pub fn instantiated_at(&self) -> DateTime<Utc> {
        self.instantiated_at
    }
}

impl Renderable for RealResource {
    fn name(&self) -> &str {
        self.payload.key()
    }

    fn render(&self, principal: &str, sink: &dyn OutputSink) {
        sink.emit(&MediaEvent::Rendered {
            key: self.payload.key().to_string(),
            principal: principal.to_string(),
            data_id: self.payload.shared_bytes().to_string(),
        });
    }
}
