//! Resource cache (tier 2)
//!
//! Maps keys to fully constructed [`RealResource`]s, built lazily on top of
//! the [`IntrinsicDataStore`]. Each key owns a `OnceCell` slot so first-time
//! construction is exclusive per key; lookups of resolved keys only take the
//! shared map lock.
//!
//! Every construction holds the construction gate in shared mode. [`clear`]
//! takes it exclusively, so a clear waits for in-flight builds to land and a
//! build never straddles a clear.
//!
//! [`clear`]: ResourceCache::clear

use super::payload::IntrinsicDataStore;
use super::resource::RealResource;
use crate::error::Result;
use crate::output::{MediaEvent, OutputSink};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{OnceCell, RwLock};

type Slot = Arc<OnceCell<Arc<RealResource>>>;

/// Result of a cache lookup
#[derive(Debug, Clone)]
pub struct Lookup {
    /// The resolved resource
    pub resource: Arc<RealResource>,
    /// `true` when the resource already existed, `false` when this call built it
    pub cached: bool,
}

/// Tier-2 cache of constructed resources
pub struct ResourceCache {
    store: Arc<IntrinsicDataStore>,
    slots: RwLock<HashMap<String, Slot>>,
    construction_gate: RwLock<()>,
    sink: Arc<dyn OutputSink>,
    constructions: AtomicU64,
}

impl ResourceCache {
    pub fn new(store: Arc<IntrinsicDataStore>, sink: Arc<dyn OutputSink>) -> Self {
        Self {
            store,
            slots: RwLock::new(HashMap::new()),
            construction_gate: RwLock::new(()),
            sink,
            constructions: AtomicU64::new(0),
        }
    }

    /// Return the resource for `key`, building it on first use.
    pub async fn get_or_build(&self, key: &str) -> Result<Lookup> {
        if let Some(resource) = self.resolved(key).await {
            return Ok(self.hit(key, resource));
        }

        let _building = self.construction_gate.read().await;
        let slot = self.slot(key).await;

        let mut built = false;
        let result = slot
            .get_or_try_init(|| {
                built = true;
                self.construct(key)
            })
            .await
            .cloned();

        match result {
            Ok(resource) if built => Ok(Lookup {
                resource,
                cached: false,
            }),
            Ok(resource) => Ok(self.hit(key, resource)),
            Err(e) => {
                self.discard_empty(key, &slot).await;
                Err(e)
            }
        }
    }

    /// Empty the cache, returning how many resources were dropped.
    ///
    /// The intrinsic store is left untouched.
    pub async fn clear(&self) -> usize {
        let _exclusive = self.construction_gate.write().await;
        let mut slots = self.slots.write().await;
        let removed = slots.values().filter(|slot| slot.initialized()).count();
        slots.clear();

        tracing::info!(removed, "Resource cache cleared");
        removed
    }

    /// Number of cached resources
    pub async fn size(&self) -> usize {
        self.slots
            .read()
            .await
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    /// Whether a resource is cached for `key`
    pub async fn contains(&self, key: &str) -> bool {
        self.resolved(key).await.is_some()
    }

    /// Total resource construction events
    pub fn constructions(&self) -> u64 {
        self.constructions.load(Ordering::SeqCst)
    }

    /// The intrinsic store this cache builds on
    pub fn store(&self) -> &Arc<IntrinsicDataStore> {
        &self.store
    }

    fn hit(&self, key: &str, resource: Arc<RealResource>) -> Lookup {
        tracing::debug!(key, "Resource cache hit");
        self.sink.emit(&MediaEvent::ResourceFromCache {
            key: key.to_string(),
        });
        Lookup {
            resource,
            cached: true,
        }
    }

    async fn resolved(&self, key: &str) -> Option<Arc<RealResource>> {
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

    async fn construct(&self, key: &str) -> Result<Arc<RealResource>> {
        let payload = self.store.get_or_create(key).await?;
        let resource = Arc::new(RealResource::new(payload));

        self.constructions.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(key, "Resource constructed");
        self.sink.emit(&MediaEvent::ResourceCreated {
            key: key.to_string(),
        });
        Ok(resource)
    }
}
