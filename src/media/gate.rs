//! Access Gate — naming-convention access policy
//!
//! Keys carrying the restricted prefix are readable only by the admin
//! principal. Everything else is public.

use crate::config::AccessConfig;

/// Stateless access policy
#[derive(Debug, Clone)]
pub struct AccessGate {
    restricted_prefix: String,
    admin_principal: String,
}

impl AccessGate {
    /// Create a gate from the access configuration
    pub fn new(config: &AccessConfig) -> Self {
        Self {
            restricted_prefix: config.restricted_prefix.clone(),
            admin_principal: config.admin_principal.to_lowercase(),
        }
    }

    /// Whether `key` names a restricted resource
    pub fn is_restricted(&self, key: &str) -> bool {
        key.starts_with(&self.restricted_prefix)
    }

    /// Decide whether `principal` may access `key`
    pub fn evaluate(&self, key: &str, principal: &str) -> bool {
        if self.is_restricted(key) {
            return principal.to_lowercase() == self.admin_principal;
        }
        true
    }
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::new(&AccessConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_key_admin_allowed() {
        let gate = AccessGate::default();
        assert!(gate.evaluate("private_x", "admin"));
        assert!(gate.evaluate("private_x", "ADMIN"));
        assert!(gate.evaluate("private_x", "Admin"));
    }

    #[test]
    fn test_private_key_other_denied() {
        let gate = AccessGate::default();
        assert!(!gate.evaluate("private_x", "bob"));
        assert!(!gate.evaluate("private_x", ""));
        assert!(!gate.evaluate("private_x", "administrator"));
    }

    #[test]
    fn test_admin_match_is_unicode_case_insensitive() {
        let gate = AccessGate::new(&AccessConfig {
            restricted_prefix: "private_".to_string(),
            admin_principal: "Ärzte".to_string(),
        });
        assert!(gate.evaluate("private_x", "ärzte"));
        assert!(gate.evaluate("private_x", "ÄRZTE"));
    }

    #[test]
    fn test_public_key_always_allowed() {
        let gate = AccessGate::default();
        assert!(gate.evaluate("public_x", "anyone"));
        assert!(gate.evaluate("img_sunset.jpg", ""));
        // prefix must lead the key
        assert!(gate.evaluate("img_private_x", "bob"));
    }

    #[test]
    fn test_prefix_is_case_sensitive() {
        let gate = AccessGate::default();
        assert!(!gate.is_restricted("PRIVATE_x"));
        assert!(gate.evaluate("PRIVATE_x", "bob"));
    }

    #[test]
    fn test_custom_policy() {
        let gate = AccessGate::new(&AccessConfig {
            restricted_prefix: "secret_".to_string(),
            admin_principal: "root".to_string(),
        });

        assert!(gate.evaluate("private_x", "bob"));
        assert!(!gate.evaluate("secret_x", "admin"));
        assert!(gate.evaluate("secret_x", "Root"));
    }
}
