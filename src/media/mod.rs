//! Media layer — two-tier lazy cache behind an access-gated proxy
//!
//! Tier 1 (intrinsic): one immutable payload per key, shared and never evicted.
//! Tier 2 (resource): one heavier resource per key, built lazily on tier 1 and
//! dropped only by an explicit clear.

pub mod cache;
pub mod gate;
pub mod payload;
pub mod proxy;
pub mod resource;

pub use cache::{Lookup, ResourceCache};
pub use gate::AccessGate;
pub use payload::{IntrinsicDataStore, IntrinsicPayload, PayloadSource, SyntheticSource};
pub use proxy::{AccessOutcome, ProxyState, ResourceProxy};
pub use resource::{RealResource, Renderable};
