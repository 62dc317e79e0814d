//=====================================================
// File: host.rs
//=====================================================
// Author: VeldWorks
// License: MIT
// Goal: File materialization and the host execution hook
// Objective: Join resolved paths to a namespace root, apply the
//            existence-check policy, and hand loaded source to the host
//=====================================================

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, trace};

use crate::error::{AutoloadError, AutoloadResult};

/// Outcome of consulting one resolver chain entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The symbol's source was loaded and handed to the host.
    Handled,
    /// The symbol does not belong to this loader; the chain continues.
    Declined,
}

/// Execution hook supplied by whatever runs Veld source.
///
/// `define` is called with the symbol being resolved, the absolute path
/// the source was read from, and the source text. Executing the source is
/// what makes the symbol defined; the autoloader only gets it there.
pub trait SourceHost {
    fn define(&mut self, symbol: &str, path: &Path, source: &str) -> Result<(), String>;
}

/// Joins `relative` onto `base` and performs the load.
///
/// With existence checking on, a missing file is a silent decline so the
/// chain can keep going. With it off, a missing file is a reported
/// [`AutoloadError::FileNotFound`].
pub(crate) fn materialize(
    symbol: &str,
    base: &Path,
    relative: &Path,
    check_files_exist: bool,
    host: &mut dyn SourceHost,
) -> AutoloadResult<Resolution> {
    let absolute = base.join(relative);

    if check_files_exist && !absolute.is_file() {
        trace!(symbol, path = %absolute.display(), "candidate file absent, declining");
        return Ok(Resolution::Declined);
    }

    let source = fs::read_to_string(&absolute).map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            AutoloadError::FileNotFound {
                symbol: symbol.to_string(),
                path: absolute.clone(),
            }
        } else {
            AutoloadError::Io {
                path: absolute.clone(),
                source: err,
            }
        }
    })?;

    host.define(symbol, &absolute, &source)
        .map_err(|message| AutoloadError::Host {
            symbol: symbol.to_string(),
            message,
        })?;

    debug!(symbol, path = %absolute.display(), "symbol defined");
    Ok(Resolution::Handled)
}

//=====================================================
// End of file
//=====================================================
