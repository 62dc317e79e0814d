//! PSR-0/PSR-4 namespace autoloader for the Veld scripting runtime.
//!
//! Each namespace root gets one [`Loader`] instance from the
//! [`Autoloader`] registry. Registered loaders form an ordered resolver
//! chain; when the host hits an undefined symbol it calls
//! [`Autoloader::resolve`], each loader either derives a source path for
//! the symbol or declines, and the first match is read and handed to the
//! host's [`SourceHost`] to execute.

pub mod error;
pub mod host;
pub mod loader;
pub mod path;
pub mod registry;

pub use error::{AutoloadError, AutoloadResult};
pub use host::{Resolution, SourceHost};
pub use loader::Loader;
pub use path::{Convention, DEFAULT_SEPARATOR, SOURCE_EXT};
pub use registry::Autoloader;
