//! MediaVault - Lazy, access-gated two-tier media cache
//!
//! MediaVault serves named media resources through a per-call proxy that
//! logs every access, enforces a naming-convention access policy, and
//! resolves resources lazily from a two-tier cache.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        MediaFacade                            │
//! │   view_one · view_batch · preload · stats · invalidate        │
//! └───────────────┬──────────────────────────────┬───────────────┘
//!                 │ one proxy per view            │ preload
//! ┌───────────────▼──────────────┐               │
//! │        ResourceProxy          │               │
//! │  log ─► AccessGate ─► resolve │               │
//! └───────────────┬──────────────┘               │
//!                 │ authorized only               │
//! ┌───────────────▼──────────────┐               │
//! │   ResourceCache (tier 2)      │               │
//! │   one RealResource per key    │               │
//! └───────────────┬──────────────┘               │
//! ┌───────────────▼───────────────────────────────▼──────────────┐
//! │              IntrinsicDataStore (tier 1)                       │
//! │   one shared payload per key, never evicted                    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! All human-readable output flows through an injected
//! [`output::OutputSink`]; structured diagnostics go through `tracing`.
//!
//! ## Modules
//!
//! - [`media`]: intrinsic store, resource cache, access gate and proxy
//! - [`facade`]: batch entry point and statistics
//! - [`output`]: output sinks and media events
//! - [`config`]: Configuration management

pub mod config;
pub mod error;
pub mod facade;
pub mod media;
pub mod output;

pub use config::MediaVaultConfig;
pub use error::{Error, Result};
pub use facade::{CacheStats, MediaFacade};
