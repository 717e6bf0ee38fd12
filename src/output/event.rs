//! Events emitted by the store, cache, proxy and facade

use serde::{Deserialize, Serialize};

/// A single reportable step of a media access.
///
/// `Display` renders the console line for the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum MediaEvent {
    /// A principal asked for a key (always emitted, before authorization)
    AccessAttempt { key: String, principal: String },
    /// The gate refused the principal
    AccessDenied { key: String, principal: String },
    /// A new intrinsic payload was synthesized
    PayloadCreated { key: String },
    /// A new resource was constructed on top of its payload
    ResourceCreated { key: String },
    /// A resource was served from the resource cache
    ResourceFromCache { key: String },
    /// A resource was rendered for a principal
    Rendered {
        key: String,
        principal: String,
        data_id: String,
    },
    /// Payload retrieval failed; nothing was cached
    RetrievalFailed { key: String, reason: String },
    /// A batch view started
    BatchStarted { principal: String, count: usize },
    /// A preload started
    PreloadStarted { keys: Vec<String> },
    /// Statistics snapshot
    Stats {
        intrinsic_count: usize,
        resource_count: usize,
        keys: Vec<String>,
    },
    /// The resource cache was emptied
    CacheInvalidated { removed: usize },
}

impl MediaEvent {
    /// Key the event refers to, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::AccessAttempt { key, .. }
            | Self::AccessDenied { key, .. }
            | Self::PayloadCreated { key }
            | Self::ResourceCreated { key }
            | Self::ResourceFromCache { key }
            | Self::Rendered { key, .. }
            | Self::RetrievalFailed { key, .. } => Some(key),
            _ => None,
        }
    }
}

impl std::fmt::Display for MediaEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AccessAttempt { key, principal } => {
                write!(f, "[ResourceProxy] user='{}' requests '{}'", principal, key)
            }
            Self::AccessDenied { key, principal } => write!(
                f,
                "[ResourceProxy] ACCESS DENIED for user '{}' to resource '{}'",
                principal, key
            ),
            Self::PayloadCreated { key } => {
                write!(f, "[IntrinsicDataStore] created intrinsic data for: {}", key)
            }
            Self::ResourceCreated { key } => write!(f, "[RealResource] instantiated for: {}", key),
            Self::ResourceFromCache { key } => {
                write!(f, "[ResourceProxy] resource taken from cache for: {}", key)
            }
            Self::Rendered {
                key,
                principal,
                data_id,
            } => write!(
                f,
                "Displaying '{}' to user '{}' (data id: {})",
                key, principal, data_id
            ),
            Self::RetrievalFailed { key, reason } => {
                write!(f, "[ResourceProxy] retrieval of '{}' failed: {}", key, reason)
            }
            Self::BatchStarted { principal, count } => write!(
                f,
                "[MediaFacade] Viewing {} resources for user: {}",
                count, principal
            ),
            Self::PreloadStarted { keys } => {
                write!(f, "[MediaFacade] Preloading: [{}]", keys.join(", "))
            }
            Self::Stats {
                intrinsic_count,
                resource_count,
                keys,
            } => write!(
                f,
                "[MediaFacade] Stats: intrinsic pool size={}, resource cache size={}, intrinsic keys=[{}]",
                intrinsic_count,
                resource_count,
                keys.join(", ")
            ),
            Self::CacheInvalidated { removed } => write!(
                f,
                "[MediaFacade] Resource cache cleared ({} entries removed).",
                removed
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lines() {
        let attempt = MediaEvent::AccessAttempt {
            key: "img_sunset.jpg".to_string(),
            principal: "alice".to_string(),
        };
        assert_eq!(
            attempt.to_string(),
            "[ResourceProxy] user='alice' requests 'img_sunset.jpg'"
        );

        let rendered = MediaEvent::Rendered {
            key: "a".to_string(),
            principal: "carol".to_string(),
            data_id: "BINARY_DATA_OF_a_1234abcd".to_string(),
        };
        assert_eq!(
            rendered.to_string(),
            "Displaying 'a' to user 'carol' (data id: BINARY_DATA_OF_a_1234abcd)"
        );
    }

    #[test]
    fn test_key_accessor() {
        let denied = MediaEvent::AccessDenied {
            key: "private_x".to_string(),
            principal: "bob".to_string(),
        };
        assert_eq!(denied.key(), Some("private_x"));
        assert_eq!(MediaEvent::CacheInvalidated { removed: 2 }.key(), None);
    }

    #[test]
    fn test_serialization_tag() {
        let event = MediaEvent::PayloadCreated {
            key: "y".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "payload_created");
        assert_eq!(json["key"], "y");
    }
}
