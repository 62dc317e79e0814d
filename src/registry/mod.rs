//! Autoloader registry: the instance cache and the resolver chain.
//!
//! The original design kept both as ambient process-wide state. Here they
//! are owned by an explicit [`Autoloader`] value so tests can run against
//! private registries, with [`Autoloader::global`] providing the usual
//! process-wide singleton for hosts that want one.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::error::AutoloadResult;
use crate::host::{Resolution, SourceHost};
use crate::loader::Loader;
use crate::path;

static GLOBAL: OnceCell<Arc<Autoloader>> = OnceCell::new();

/// Ordered resolver chain. Read on every resolve, written only by
/// `Loader::register` / `Loader::unregister`.
#[derive(Debug, Default)]
pub(crate) struct ChainInner {
    pub(crate) entries: RwLock<Vec<Arc<Loader>>>,
}

/// Owns every [`Loader`] instance and the chain they register with.
#[derive(Debug)]
pub struct Autoloader {
    instances: Mutex<HashMap<String, Arc<Loader>>>,
    chain: Arc<ChainInner>,
}

impl Default for Autoloader {
    fn default() -> Self {
        Self::new()
    }
}

impl Autoloader {
    pub fn new() -> Self {
        Self {
            instances: Mutex::new(HashMap::new()),
            chain: Arc::new(ChainInner::default()),
        }
    }

    /// Process-wide registry, created on first use.
    pub fn global() -> Arc<Autoloader> {
        GLOBAL.get_or_init(|| Arc::new(Autoloader::new())).clone()
    }

    /// Returns the loader for `namespace`, creating it on first request.
    ///
    /// The namespace is normalized before lookup, so `"\Acme"` and
    /// `"Acme"` name the same instance. Get-or-create is atomic per key;
    /// every equivalent call returns the identical `Arc`.
    pub fn loader(&self, namespace: &str) -> Arc<Loader> {
        let key = path::normalize_namespace(namespace);
        let mut instances = self.instances.lock();
        instances
            .entry(key.to_string())
            .or_insert_with(|| {
                debug!(namespace = key, "creating loader instance");
                Loader::new(key, Arc::downgrade(&self.chain))
            })
            .clone()
    }

    /// All loader instances ever created, registered or not.
    pub fn loaders(&self) -> Vec<Arc<Loader>> {
        self.instances.lock().values().cloned().collect()
    }

    /// Walks the chain in registration order until one loader handles
    /// `symbol`. Declines are normal; errors from a matching loader's
    /// load attempt surface immediately.
    pub fn resolve(&self, symbol: &str, host: &mut dyn SourceHost) -> AutoloadResult<Resolution> {
        // Snapshot so the host may register or unregister loaders while
        // source it triggered is executing.
        let entries: Vec<Arc<Loader>> = self.chain.entries.read().clone();
        for loader in entries {
            if loader.try_load(symbol, host)? == Resolution::Handled {
                return Ok(Resolution::Handled);
            }
        }
        debug!(symbol, "no registered loader claimed the symbol");
        Ok(Resolution::Declined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_namespace_yields_identical_instance() {
        let registry = Autoloader::new();
        let first = registry.loader("Acme");
        let second = registry.loader("Acme");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn distinct_namespaces_yield_distinct_instances() {
        let registry = Autoloader::new();
        let a = registry.loader("Acme");
        let b = registry.loader("Vendor");
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn lookup_is_keyed_on_the_normalized_namespace() {
        let registry = Autoloader::new();
        let bare = registry.loader("Acme");
        let prefixed = registry.loader("\\Acme");
        assert!(Arc::ptr_eq(&bare, &prefixed));
        assert_eq!(prefixed.namespace(), "Acme");
    }

    #[test]
    fn namespace_keys_are_case_sensitive() {
        let registry = Autoloader::new();
        let upper = registry.loader("Acme");
        let lower = registry.loader("acme");
        assert!(!Arc::ptr_eq(&upper, &lower));
    }

    #[test]
    fn loaders_lists_unregistered_instances_too() {
        let registry = Autoloader::new();
        registry.loader("Acme");
        registry.loader("Vendor");
        assert_eq!(registry.loaders().len(), 2);
    }

    #[test]
    fn concurrent_get_or_create_yields_one_instance() {
        let registry = Arc::new(Autoloader::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.loader("Acme"))
            })
            .collect();
        let loaders: Vec<_> = handles
            .into_iter()
            .map(|handle| handle.join().expect("join"))
            .collect();
        assert!(loaders.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
    }

    #[test]
    fn global_returns_one_registry() {
        let first = Autoloader::global();
        let second = Autoloader::global();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
