//! # Connection Provider Registry
//!
//! Process-wide registry of named [`ConnectionProvider`]s, the seam through
//! which the engine resolves the data-source names configured on its job
//! store. Registration happens during job-store initialization; lookups come
//! from the engine's own worker threads afterwards.
//!
//! Critical sections only clone `Arc`s and never await, so a plain
//! `parking_lot` lock is enough.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

use crate::error::{BridgeError, Result};

use super::ConnectionProvider;

static GLOBAL: OnceLock<ConnectionRegistry> = OnceLock::new();

/// Named connection-provider registry.
pub struct ConnectionRegistry {
    providers: RwLock<HashMap<String, Arc<dyn ConnectionProvider>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            providers: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide registry the engine resolves against.
    pub fn global() -> &'static ConnectionRegistry {
        GLOBAL.get_or_init(ConnectionRegistry::new)
    }

    /// Register a provider under a name, replacing any previous registration.
    pub fn register(&self, name: &str, provider: Arc<dyn ConnectionProvider>) {
        let replaced = self
            .providers
            .write()
            .insert(name.to_string(), provider)
            .is_some();
        if replaced {
            debug!(provider = %name, "Replaced existing connection provider");
        } else {
            info!(provider = %name, "Registered connection provider");
        }
    }

    /// Look up a provider by name.
    pub fn provider(&self, name: &str) -> Result<Arc<dyn ConnectionProvider>> {
        self.providers
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| BridgeError::UnknownProvider {
                name: name.to_string(),
            })
    }

    /// Remove a provider. Returns whether anything was registered under the
    /// name.
    pub fn deregister(&self, name: &str) -> bool {
        let removed = self.providers.write().remove(name).is_some();
        if removed {
            debug!(provider = %name, "Deregistered connection provider");
        }
        removed
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.read().contains_key(name)
    }

    /// Names of every registered provider, sorted for stable output.
    pub fn provider_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sqlx::pool::PoolConnection;
    use sqlx::Postgres;

    struct NoopProvider;

    #[async_trait]
    impl ConnectionProvider for NoopProvider {
        async fn connection(&self) -> Result<PoolConnection<Postgres>> {
            Err(BridgeError::configuration("test", "no pool behind this provider"))
        }
    }

    #[test]
    fn register_lookup_deregister_round_trip() {
        let registry = ConnectionRegistry::new();
        registry.register("alpha", Arc::new(NoopProvider));

        assert!(registry.contains("alpha"));
        assert!(registry.provider("alpha").is_ok());
        assert_eq!(registry.provider_names(), vec!["alpha".to_string()]);

        assert!(registry.deregister("alpha"));
        assert!(!registry.contains("alpha"));
        assert!(matches!(
            registry.provider("alpha"),
            Err(BridgeError::UnknownProvider { .. })
        ));
    }

    #[test]
    fn deregistering_unknown_name_is_harmless() {
        let registry = ConnectionRegistry::new();
        assert!(!registry.deregister("ghost"));
    }

    #[test]
    fn registration_replaces_silently() {
        let registry = ConnectionRegistry::new();
        registry.register("alpha", Arc::new(NoopProvider));
        registry.register("alpha", Arc::new(NoopProvider));
        assert_eq!(registry.provider_names().len(), 1);
    }
}
