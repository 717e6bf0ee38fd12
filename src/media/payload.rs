//! Intrinsic data store (tier 1)
//!
//! Holds one immutable [`IntrinsicPayload`] per key for the lifetime of the
//! store. Construction is serialized per key through a `OnceCell` slot, so
//! concurrent first requests for the same key build exactly one payload while
//! requests for other keys proceed independently. There is no clear operation.

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::output::{MediaEvent, OutputSink};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OnceCell, RwLock};
use uuid::Uuid;

/// Shared, immutable payload for one key
#[derive(Debug, Clone)]
pub struct IntrinsicPayload {
    key: String,
    shared_bytes: String,
    created_at: DateTime<Utc>,
}

impl IntrinsicPayload {
    /// Resource key this payload belongs to
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The shared payload data
    pub fn shared_bytes(&self) -> &str {
        &self.shared_bytes
    }

    /// When the payload was materialized
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Where payload bytes come from.
///
/// A failed fetch is never cached; the next request for the key retries.
#[async_trait]
pub trait PayloadSource: Send + Sync {
    /// Produce the payload bytes for `key`
    async fn fetch(&self, key: &str) -> Result<String>;
}

/// Deterministic in-memory payload synthesis
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    data_prefix: String,
}

impl SyntheticSource {
    pub fn new(data_prefix: impl Into<String>) -> Self {
        Self {
            data_prefix: data_prefix.into(),
        }
    }

    /// `<prefix><key>_<tag>`, where the tag is derived from a v5 UUID of the key.
    pub fn synthesize(&self, key: &str) -> String {
        let tag = Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes()).simple().to_string();
        format!("{}{}_{}", self.data_prefix, key, &tag[..8])
    }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new(StoreConfig::default().data_prefix)
    }
}

#[async_trait]
impl PayloadSource for SyntheticSource {
    async fn fetch(&self, key: &str) -> Result<String> {
        Ok(self.synthesize(key))
    }
}

type Slot = Arc<OnceCell<Arc<IntrinsicPayload>>>;

/// Tier-1 store of shared payloads
pub struct IntrinsicDataStore {
    slots: RwLock<HashMap<String, Slot>>,
    source: Arc<dyn PayloadSource>,
    fetch_timeout: Duration,
    sink: Arc<dyn OutputSink>,
    constructions: AtomicU64,
}

impl IntrinsicDataStore {
    /// Create a store backed by [`SyntheticSource`]
    pub fn new(config: &StoreConfig, sink: Arc<dyn OutputSink>) -> Self {
        Self::with_source(
            Arc::new(SyntheticSource::new(config.data_prefix.clone())),
            Duration::from_millis(config.fetch_timeout_ms),
            sink,
        )
    }

    /// Create a store backed by a custom payload source
    pub fn with_source(
        source: Arc<dyn PayloadSource>,
        fetch_timeout: Duration,
        sink: Arc<dyn OutputSink>,
    ) -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            source,
            fetch_timeout,
            sink,
            constructions: AtomicU64::new(0),
        }
    }

    /// Return the payload for `key`, constructing it on first use.
    pub async fn get_or_create(&self, key: &str) -> Result<Arc<IntrinsicPayload>> {
        if let Some(payload) = self.resolved(key).await {
            return Ok(payload);
        }

        let slot = self.slot(key).await;
        let result = slot
            .get_or_try_init(|| self.construct(key))
            .await
            .cloned();

        if result.is_err() {
            self.discard_empty(key, &slot).await;
        }
        result
    }

    /// Number of distinct keys materialized
    pub async fn size(&self) -> usize {
        self.slots
            .read()
            .await
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    /// Snapshot of materialized keys
    pub async fn keys(&self) -> HashSet<String> {
        self.slots
            .read()
            .await
            .iter()
            .filter(|(_, slot)| slot.initialized())
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Whether a payload exists for `key`
    pub async fn contains(&self, key: &str) -> bool {
        self.resolved(key).await.is_some()
    }

    /// Total payload construction events
    pub fn constructions(&self) -> u64 {
        self.constructions.load(Ordering::SeqCst)
    }

    async fn resolved(&self, key: &str) -> Option<Arc<IntrinsicPayload>> {
        self.slots
            .read()
            .await
            .get(key)
            .and_then(|slot| slot.get().cloned())
    }

    async fn slot(&self, key: &str) -> Slot {
        self.slots
            .write()
            .await
            .entry(key.to_string())
            .or_default()
            .clone()
    }

    /// Drop a slot left empty by a failed construction.
    async fn discard_empty(&self, key: &str, slot: &Slot) {
        let mut slots = self.slots.write().await;
        if let Some(current) = slots.get(key) {
            // map + this caller; any other holder is still waiting to initialize
            if Arc::ptr_eq(current, slot)
                && !current.initialized()
                && Arc::strong_count(current) == 2
            {
                slots.remove(key);
            }
        }
    }

    async fn construct(&self, key: &str) -> Result<Arc<IntrinsicPayload>> {
        let shared_bytes = match tokio::time::timeout(self.fetch_timeout, self.source.fetch(key))
            .await
        {
            Ok(fetched) => fetched?,
            Err(_) => {
                return Err(Error::Retrieval {
                    key: key.to_string(),
                    reason: format!("fetch timed out after {:?}", self.fetch_timeout),
                })
            }
        };

        self.constructions.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(key, "Intrinsic payload created");
        self.sink.emit(&MediaEvent::PayloadCreated {
            key: key.to_string(),
        });

        Ok(Arc::new(IntrinsicPayload {
            key: key.to_string(),
            shared_bytes,
            created_at: Utc::now(),
        }))
    }
}
