//! Media Facade — batch-oriented entry point
//!
//! Owns the shared intrinsic store, resource cache and access gate, and hands
//! out a fresh [`ResourceProxy`] for every view. Proxies are never reused, so
//! each view is logged and authorized again even when the resource is warm.

use crate::config::MediaVaultConfig;
use crate::error::Result;
use crate::media::{AccessGate, AccessOutcome, IntrinsicDataStore, ResourceCache, ResourceProxy};
use crate::output::{MediaEvent, OutputSink};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Snapshot of both cache tiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Payloads in the intrinsic store
    pub intrinsic_count: usize,
    /// Resources in the resource cache
    pub resource_count: usize,
    /// Keys materialized in the intrinsic store
    pub keys: BTreeSet<String>,
}

/// Simplified front door to the media layer
pub struct MediaFacade {
    store: Arc<IntrinsicDataStore>,
    cache: Arc<ResourceCache>,
    gate: Arc<AccessGate>,
    sink: Arc<dyn OutputSink>,
}

impl MediaFacade {
    /// Build the full stack from configuration
    pub fn new(config: &MediaVaultConfig, sink: Arc<dyn OutputSink>) -> Self {
        let store = Arc::new(IntrinsicDataStore::new(&config.store, sink.clone()));
        let cache = Arc::new(ResourceCache::new(store.clone(), sink.clone()));
        let gate = Arc::new(AccessGate::new(&config.access));
        Self::from_parts(store, cache, gate, sink)
    }

    /// Assemble a facade over existing components
    pub fn from_parts(
        store: Arc<IntrinsicDataStore>,
        cache: Arc<ResourceCache>,
        gate: Arc<AccessGate>,
        sink: Arc<dyn OutputSink>,
    ) -> Self {
        Self {
            store,
            cache,
            gate,
            sink,
        }
    }

    /// View a single resource through a fresh proxy
    pub async fn view_one(&self, key: &str, principal: &str) -> Result<AccessOutcome> {
        let mut proxy =
            ResourceProxy::new(self.cache.clone(), self.gate.clone(), self.sink.clone());
        proxy.display(key, principal).await
    }

    /// View resources in order, one proxy per key
    pub async fn view_batch<S: AsRef<str>>(
        &self,
        keys: &[S],
        principal: &str,
    ) -> Result<Vec<AccessOutcome>> {
        self.sink.emit(&MediaEvent::BatchStarted {
            principal: principal.to_string(),
            count: keys.len(),
        });

        let mut outcomes = Vec::with_capacity(keys.len());
        for key in keys {
            outcomes.push(self.view_one(key.as_ref(), principal).await?);
        }
        Ok(outcomes)
    }

    /// Warm the intrinsic store only.
    ///
    /// Bypasses the access gate and the resource cache; no resource is built.
    pub async fn preload<S: AsRef<str>>(&self, keys: &[S]) -> Result<()> {
        self.sink.emit(&MediaEvent::PreloadStarted {
            keys: keys.iter().map(|k| k.as_ref().to_string()).collect(),
        });

        for key in keys {
            self.store.get_or_create(key.as_ref()).await?;
        }
        tracing::info!(count = keys.len(), "Preloaded intrinsic payloads");
        Ok(())
    }

    /// Current statistics of both tiers
    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            intrinsic_count: self.store.size().await,
            resource_count: self.cache.size().await,
            keys: self.store.keys().await.into_iter().collect(),
        }
    }

    /// Collect statistics and write them to the sink
    pub async fn report_stats(&self) -> CacheStats {
        let stats = self.stats().await;
        self.sink.emit(&MediaEvent::Stats {
            intrinsic_count: stats.intrinsic_count,
            resource_count: stats.resource_count,
            keys: stats.keys.iter().cloned().collect(),
        });
        stats
    }

    /// Empty the resource cache; the intrinsic store is kept.
    pub async fn invalidate(&self) -> usize {
        let removed = self.cache.clear().await;
        self.sink.emit(&MediaEvent::CacheInvalidated { removed });
        removed
    }

    pub fn store(&self) -> &Arc<IntrinsicDataStore> {
        &self.store
    }

    pub fn cache(&self) -> &Arc<ResourceCache> {
        &self.cache
    }

    pub fn gate(&self) -> &Arc<AccessGate> {
        &self.gate
    }
}
