//=====================================================
// File: loader.rs
//=====================================================
// Author: VeldWorks
// License: MIT
// Goal: Per-namespace loader instance
// Objective: Hold one namespace root's configuration, derive candidate
//            paths, and manage membership in the resolver chain
//=====================================================

use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::trace;

use crate::error::{AutoloadError, AutoloadResult};
use crate::host::{self, Resolution, SourceHost};
use crate::path::{self, Convention, DEFAULT_SEPARATOR};
use crate::registry::ChainInner;

/// Mutable portion of a loader. The namespace itself is fixed at
/// construction and lives outside the lock.
#[derive(Debug)]
struct LoaderState {
    base_path: Option<PathBuf>,
    separator: char,
    convention: Convention,
    check_files_exist: bool,
    registered: bool,
}

/// One namespace root of the autoloader.
///
/// Instances are created by [`crate::registry::Autoloader::loader`] and
/// shared as `Arc<Loader>`; the instance cache guarantees one instance per
/// distinct normalized namespace. Setters chain (`&self -> &Self`) and may
/// be called in any order until registration.
#[derive(Debug)]
pub struct Loader {
    namespace: String,
    namespace_len: usize,
    chain: Weak<ChainInner>,
    state: RwLock<LoaderState>,
}

// Lock order everywhere: chain entries before loader state. `resolve_chain`
// walks a snapshot instead of holding the entries lock across loads.

impl Loader {
    pub(crate) fn new(namespace: &str, chain: Weak<ChainInner>) -> Arc<Self> {
        let namespace = path::normalize_namespace(namespace).to_string();
        let namespace_len = namespace.len();
        Arc::new(Self {
            namespace,
            namespace_len,
            chain,
            state: RwLock::new(LoaderState {
                base_path: None,
                separator: DEFAULT_SEPARATOR,
                convention: Convention::default(),
                check_files_exist: false,
                registered: false,
            }),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> Option<PathBuf> {
        self.state.read().base_path.clone()
    }

    pub fn separator(&self) -> char {
        self.state.read().separator
    }

    pub fn is_psr4(&self) -> bool {
        self.state.read().convention == Convention::Psr4
    }

    pub fn is_registered(&self) -> bool {
        self.state.read().registered
    }

    /// Sets the directory classes of this namespace are loaded from.
    /// Trailing path separators are dropped.
    pub fn set_path(&self, dirpath: impl AsRef<Path>) -> &Self {
        let trimmed = dirpath.as_ref().components().as_path().to_path_buf();
        self.state.write().base_path = Some(trimmed);
        self
    }

    /// Sets the namespace separator, `\` (default) or `_`.
    pub fn set_separator(&self, separator: char) -> &Self {
        self.state.write().separator = separator;
        self
    }

    /// Sets whether files are checked for existence before loading.
    pub fn set_check_files_exist(&self, value: bool) -> &Self {
        self.state.write().check_files_exist = value;
        self
    }

    /// Switches between PSR-4 (`true`) and PSR-0 (`false`).
    ///
    /// The convention is part of the chain entry's behavior, so changing
    /// it while registered is an error.
    pub fn set_psr4(&self, value: bool) -> AutoloadResult<&Self> {
        let mut state = self.state.write();
        if state.registered {
            return Err(AutoloadError::RegisteredConvention {
                namespace: self.namespace.clone(),
            });
        }
        state.convention = if value {
            Convention::Psr4
        } else {
            Convention::Psr0
        };
        Ok(self)
    }

    /// Enters this loader into the resolver chain.
    ///
    /// Fails unless a non-empty base path has been set. Registering an already
    /// registered loader is a no-op, never a duplicate chain entry.
    pub fn register(self: &Arc<Self>) -> AutoloadResult<()> {
        let chain = self.chain.upgrade();
        let entries = chain.as_ref().map(|chain| chain.entries.write());
        let mut state = self.state.write();

        let has_path = state
            .base_path
            .as_deref()
            .is_some_and(|path| !path.as_os_str().is_empty());
        if !has_path {
            return Err(AutoloadError::MissingBasePath {
                namespace: self.namespace.clone(),
            });
        }
        if state.registered {
            return Ok(());
        }
        // The registry owns the chain; a loader that outlived it has
        // nothing left to register with.
        if let Some(mut entries) = entries {
            entries.push(Arc::clone(self));
        }
        state.registered = true;
        Ok(())
    }

    /// Removes this loader from the resolver chain. The instance stays in
    /// the cache and may be registered again later.
    pub fn unregister(&self) {
        let chain = self.chain.upgrade();
        let entries = chain.as_ref().map(|chain| chain.entries.write());
        let mut state = self.state.write();

        if let Some(mut entries) = entries {
            entries.retain(|entry| !std::ptr::eq(Arc::as_ptr(entry), self));
        }
        state.registered = false;
    }

    /// Derives the candidate relative path for `symbol` under this
    /// loader's convention, without touching the file system.
    pub fn resolve(&self, symbol: &str) -> Option<PathBuf> {
        let (separator, convention) = {
            let state = self.state.read();
            (state.separator, state.convention)
        };
        match convention {
            Convention::Psr0 => path::resolve_psr0(symbol, &self.namespace, separator),
            Convention::Psr4 => path::resolve_psr4(symbol, &self.namespace, separator),
        }
    }

    /// Chain entry point: derive a path for `symbol` and, on a match,
    /// materialize it through the host.
    pub(crate) fn try_load(
        &self,
        symbol: &str,
        host: &mut dyn SourceHost,
    ) -> AutoloadResult<Resolution> {
        let (base_path, check_files_exist) = {
            let state = self.state.read();
            (state.base_path.clone(), state.check_files_exist)
        };
        let Some(base) = base_path else {
            return Ok(Resolution::Declined);
        };
        let Some(relative) = self.resolve(symbol) else {
            trace!(
                symbol,
                namespace = %self.namespace,
                "prefix mismatch, declining"
            );
            return Ok(Resolution::Declined);
        };
        host::materialize(symbol, &base, &relative, check_files_exist, host)
    }

    /// Cached byte length of the namespace, fixed at construction.
    ///
    /// Accessor only: the PSR-4 fixed-length prefix compare is expressed
    /// through `str::strip_prefix`, which walks exactly this many bytes.
    pub fn namespace_len(&self) -> usize {
        self.namespace_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detached(namespace: &str) -> Arc<Loader> {
        Loader::new(namespace, Weak::new())
    }

    #[test]
    fn construction_trims_and_caches_namespace() {
        let loader = detached("\\_Acme");
        assert_eq!(loader.namespace(), "Acme");
        assert_eq!(loader.namespace_len(), 4);
    }

    #[test]
    fn defaults_match_psr0_backslash() {
        let loader = detached("Acme");
        assert_eq!(loader.separator(), '\\');
        assert!(!loader.is_psr4());
        assert!(!loader.is_registered());
        assert!(loader.path().is_none());
    }

    #[test]
    fn setters_chain_and_stick() {
        let loader = detached("Acme");
        loader
            .set_path("/srv/lib/")
            .set_separator('_')
            .set_check_files_exist(true);
        assert_eq!(loader.path(), Some(PathBuf::from("/srv/lib")));
        assert_eq!(loader.separator(), '_');
    }

    #[test]
    fn register_without_path_fails_and_stays_unregistered() {
        let loader = detached("Acme");
        let err = loader.register().expect_err("no path set");
        assert!(matches!(err, AutoloadError::MissingBasePath { .. }));
        assert!(!loader.is_registered());
    }

    #[test]
    fn register_with_empty_path_fails_and_stays_unregistered() {
        let loader = detached("Acme");
        loader.set_path("");
        let err = loader.register().expect_err("empty path is unset");
        assert!(matches!(err, AutoloadError::MissingBasePath { .. }));
        assert!(!loader.is_registered());
    }

    #[test]
    fn convention_is_frozen_while_registered() {
        let loader = detached("Acme");
        loader.set_path("/srv/lib");
        loader.register().expect("register");
        let err = loader.set_psr4(true).expect_err("registered");
        assert!(matches!(err, AutoloadError::RegisteredConvention { .. }));
        assert!(!loader.is_psr4());

        loader.unregister();
        loader.set_psr4(true).expect("unregistered again");
        assert!(loader.is_psr4());
    }

    #[test]
    fn resolve_follows_the_configured_convention() {
        let loader = detached("Acme");
        loader.set_path("/srv/lib");
        let psr0 = loader.resolve("Acme\\Foo_Bar\\Baz").expect("psr0 match");
        assert_eq!(psr0, ["Acme", "Foo_Bar", "Baz.vd"].iter().collect::<PathBuf>());

        loader.set_psr4(true).expect("not registered");
        let psr4 = loader.resolve("Acme\\Foo\\Bar").expect("psr4 match");
        assert_eq!(psr4, ["Foo", "Bar.vd"].iter().collect::<PathBuf>());
    }
}

//=====================================================
// End of file
//=====================================================
