//! Resource Proxy — per-call gatekeeper
//!
//! Every access is logged first, then authorized by the [`AccessGate`], and
//! only then resolved through the [`ResourceCache`]. A denied call never
//! reaches the cache or the intrinsic store.
//!
//! ```text
//! Unrequested ──► Logged ──┬──► Denied
//!                          └──► Authorized ──► Resolved
//! ```

use super::cache::{Lookup, ResourceCache};
use super::gate::AccessGate;
use super::resource::{RealResource, Renderable};
use crate::error::{Error, Result};
use crate::output::{MediaEvent, OutputSink};
use std::sync::Arc;

/// Lifecycle of the current proxy call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyState {
    /// No call made yet
    Unrequested,
    /// Attempt recorded, not yet authorized
    Logged,
    /// Gate refused the principal
    Denied,
    /// Gate accepted the principal, resource not yet resolved
    Authorized,
    /// Resource resolved
    Resolved,
}

/// Outcome of a `display` call
#[derive(Debug, Clone)]
pub enum AccessOutcome {
    /// The gate refused access; nothing was loaded
    Denied,
    /// The resource was rendered for the principal
    Rendered {
        resource: Arc<RealResource>,
        /// Served from the resource cache rather than built by this call
        cached: bool,
    },
}

impl AccessOutcome {
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied)
    }

    /// The rendered resource, if access was granted
    pub fn resource(&self) -> Option<&Arc<RealResource>> {
        match self {
            Self::Rendered { resource, .. } => Some(resource),
            Self::Denied => None,
        }
    }
}

/// Per-call proxy in front of the resource cache.
///
/// Proxies are cheap and not shared; create one per access.
pub struct ResourceProxy {
    cache: Arc<ResourceCache>,
    gate: Arc<AccessGate>,
    sink: Arc<dyn OutputSink>,
    state: ProxyState,
}

impl ResourceProxy {
    pub fn new(
        cache: Arc<ResourceCache>,
        gate: Arc<AccessGate>,
        sink: Arc<dyn OutputSink>,
    ) -> Self {
        Self {
            cache,
            gate,
            sink,
            state: ProxyState::Unrequested,
        }
    }

    /// State reached by the most recent call
    pub fn state(&self) -> ProxyState {
        self.state
    }

    /// Log, authorize, lazily resolve and render `key` for `principal`.
    ///
    /// A denial is reported through the sink and returned as
    /// [`AccessOutcome::Denied`]; it is not an error.
    pub async fn display(&mut self, key: &str, principal: &str) -> Result<AccessOutcome> {
        match self.resolve(key, principal).await? {
            None => Ok(AccessOutcome::Denied),
            Some(Lookup { resource, cached }) => {
                resource.render(principal, self.sink.as_ref());
                Ok(AccessOutcome::Rendered { resource, cached })
            }
        }
    }

    /// Like [`display`](Self::display) without rendering; a denial becomes
    /// [`Error::AccessDenied`].
    pub async fn fetch(&mut self, key: &str, principal: &str) -> Result<Arc<RealResource>> {
        self.resolve(key, principal)
            .await?
            .map(|lookup| lookup.resource)
            .ok_or_else(|| Error::AccessDenied {
                key: key.to_string(),
                principal: principal.to_string(),
            })
    }

    async fn resolve(&mut self, key: &str, principal: &str) -> Result<Option<Lookup>> {
        self.state = ProxyState::Unrequested;

        tracing::debug!(key, principal, "Access requested");
        self.sink.emit(&MediaEvent::AccessAttempt {
            key: key.to_string(),
            principal: principal.to_string(),
        });
        self.state = ProxyState::Logged;

        if !self.gate.evaluate(key, principal) {
            tracing::warn!(key, principal, "Access denied");
            self.sink.emit(&MediaEvent::AccessDenied {
                key: key.to_string(),
                principal: principal.to_string(),
            });
            self.state = ProxyState::Denied;
            return Ok(None);
        }
        self.state = ProxyState::Authorized;

        match self.cache.get_or_build(key).await {
            Ok(lookup) => {
                self.state = ProxyState::Resolved;
                Ok(Some(lookup))
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "Resource retrieval failed");
                self.sink.emit(&MediaEvent::RetrievalFailed {
                    key: key.to_string(),
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::media::payload::{IntrinsicDataStore, PayloadSource};
    use crate::output::MemorySink;
    use async_trait::async_trait;
    use std::time::Duration;

    struct Fixture {
        cache: Arc<ResourceCache>,
        gate: Arc<AccessGate>,
        sink: Arc<MemorySink>,
    }

    impl Fixture {
        fn new() -> Self {
            let sink = Arc::new(MemorySink::new());
            let store = Arc::new(IntrinsicDataStore::new(
                &StoreConfig::default(),
                sink.clone(),
            ));
            Self {
                cache: Arc::new(ResourceCache::new(store, sink.clone())),
                gate: Arc::new(AccessGate::default()),
                sink,
            }
        }

        fn proxy(&self) -> ResourceProxy {
            ResourceProxy::new(self.cache.clone(), self.gate.clone(), self.sink.clone())
        }
    }

    struct BrokenSource;

    #[async_trait]
    impl PayloadSource for BrokenSource {
        async fn fetch(&self, key: &str) -> Result<String> {
            Err(Error::Retrieval {
                key: key.to_string(),
                reason: "disk offline".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_new_proxy_is_unrequested() {
        let fx = Fixture::new();
        assert_eq!(fx.proxy().state(), ProxyState::Unrequested);
    }

    #[tokio::test]
    async fn test_denied_display_touches_nothing() {
        let fx = Fixture::new();
        let mut proxy = fx.proxy();

        let outcome = proxy.display("private_x", "bob").await.unwrap();

        assert!(outcome.is_denied());
        assert!(outcome.resource().is_none());
        assert_eq!(proxy.state(), ProxyState::Denied);
        assert_eq!(fx.cache.size().await, 0);
        assert_eq!(fx.cache.store().size().await, 0);
        assert_eq!(
            fx.sink.events(),
            vec![
                MediaEvent::AccessAttempt {
                    key: "private_x".to_string(),
                    principal: "bob".to_string(),
                },
                MediaEvent::AccessDenied {
                    key: "private_x".to_string(),
                    principal: "bob".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_authorized_display_renders() {
        let fx = Fixture::new();
        let mut proxy = fx.proxy();

        let outcome = proxy.display("private_x", "Admin").await.unwrap();

        assert_eq!(proxy.state(), ProxyState::Resolved);
        match outcome {
            AccessOutcome::Rendered { resource, cached } => {
                assert!(!cached);
                assert_eq!(resource.name(), "private_x");
            }
            AccessOutcome::Denied => panic!("admin must be authorized"),
        }

        let lines = fx.sink.lines();
        assert_eq!(
            lines.first().map(String::as_str),
            Some("[ResourceProxy] user='Admin' requests 'private_x'")
        );
        assert!(lines
            .last()
            .unwrap()
            .starts_with("Displaying 'private_x' to user 'Admin'"));
    }

    #[tokio::test]
    async fn test_every_call_logs_and_checks() {
        let fx = Fixture::new();
        let mut proxy = fx.proxy();

        let first = proxy.display("a", "carol").await.unwrap();
        let second = proxy.display("a", "carol").await.unwrap();

        assert!(matches!(second, AccessOutcome::Rendered { cached: true, .. }));
        assert!(Arc::ptr_eq(
            first.resource().unwrap(),
            second.resource().unwrap()
        ));
        assert_eq!(
            fx.sink
                .count(|e| matches!(e, MediaEvent::AccessAttempt { .. })),
            2
        );
        assert_eq!(
            fx.sink.count(|e| matches!(e, MediaEvent::Rendered { .. })),
            2
        );
    }

    #[tokio::test]
    async fn test_fetch_denied_is_error() {
        let fx = Fixture::new();
        let mut proxy = fx.proxy();

        let err = proxy.fetch("private_doc", "bob").await.unwrap_err();

        assert!(matches!(err, Error::AccessDenied { .. }));
        assert!(!err.is_retryable());
        assert_eq!(fx.cache.size().await, 0);
        assert_eq!(
            fx.sink.count(|e| matches!(e, MediaEvent::Rendered { .. })),
            0
        );
    }

    #[tokio::test]
    async fn test_fetch_authorized_does_not_render() {
        let fx = Fixture::new();
        let mut proxy = fx.proxy();

        let resource = proxy.fetch("img_new.png", "bob").await.unwrap();

        assert_eq!(resource.name(), "img_new.png");
        assert_eq!(fx.cache.size().await, 1);
        assert_eq!(
            fx.sink.count(|e| matches!(e, MediaEvent::Rendered { .. })),
            0
        );
    }

    #[tokio::test]
    async fn test_retrieval_failure_reported() {
        let sink = Arc::new(MemorySink::new());
        let store = Arc::new(IntrinsicDataStore::with_source(
            Arc::new(BrokenSource),
            Duration::from_secs(1),
            sink.clone(),
        ));
        let cache = Arc::new(ResourceCache::new(store, sink.clone()));
        let mut proxy = ResourceProxy::new(
            cache.clone(),
            Arc::new(AccessGate::default()),
            sink.clone(),
        );

        let err = proxy.display("img.png", "alice").await.unwrap_err();

        assert!(err.is_retryable());
        assert_eq!(proxy.state(), ProxyState::Authorized);
        assert_eq!(cache.size().await, 0);
        assert_eq!(
            sink.count(|e| matches!(e, MediaEvent::RetrievalFailed { .. })),
            1
        );
    }
}
