//! Error taxonomy for the autoloader.
//!
//! A loader declining a symbol is not an error; only configuration misuse
//! and failed load attempts surface through [`AutoloadError`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AutoloadError {
    /// `register()` was called before a base path was set.
    #[error("cannot register loader for '{namespace}': no base path set")]
    MissingBasePath { namespace: String },

    /// The convention was changed while the loader was registered.
    #[error("cannot change convention for '{namespace}': loader already registered")]
    RegisteredConvention { namespace: String },

    /// A load was attempted with existence checking disabled and the
    /// target file is absent.
    #[error("source file '{}' for symbol '{symbol}' does not exist", path.display())]
    FileNotFound { symbol: String, path: PathBuf },

    /// The target file exists but could not be read.
    #[error("failed reading '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The host executor rejected the loaded source.
    #[error("host rejected source for '{symbol}': {message}")]
    Host { symbol: String, message: String },
}

pub type AutoloadResult<T> = Result<T, AutoloadError>;
