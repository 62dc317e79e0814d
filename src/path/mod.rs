//=====================================================
// File: path.rs
//=====================================================
// Author: VeldWorks
// License: MIT
// Goal: PSR-0/PSR-4 path derivation for Veld symbols
// Objective: Pure helpers mapping a fully-qualified symbol name to a
//            relative source-file path under a namespace root
//=====================================================

use std::path::PathBuf;

/// File extension of Veld source files. Derived paths always end in it;
/// the host language dictates it, so it is not configurable.
pub const SOURCE_EXT: &str = "vd";

/// Default namespace separator.
pub const DEFAULT_SEPARATOR: char = '\\';

/// Addressing convention used by a loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Convention {
    #[default]
    Psr0,
    Psr4,
}

/// Strips leading separators and underscores from a raw namespace string.
/// Loader instances and the instance cache both key on the trimmed form.
pub fn normalize_namespace(raw: &str) -> &str {
    raw.trim_start_matches(['\\', '_'])
}

/// PSR-0 resolution.
///
/// The namespace prefix is matched case-insensitively and retained in the
/// derived path. Separators in the segments up to the last one become
/// directory separators; in the final segment, underscores do.
pub fn resolve_psr0(symbol: &str, namespace: &str, separator: char) -> Option<PathBuf> {
    let head = symbol.get(..namespace.len())?;
    if !head.eq_ignore_ascii_case(namespace) {
        return None;
    }

    let mut path = PathBuf::new();
    let leaf = match symbol.rfind(separator) {
        Some(pos) => {
            for segment in symbol[..pos].split(separator) {
                path.push(segment);
            }
            &symbol[pos + separator.len_utf8()..]
        }
        None => symbol,
    };

    // Underscore-as-namespace applies to the class segment only.
    push_leaf(&mut path, leaf, '_');
    Some(path)
}

/// PSR-4 resolution.
///
/// The namespace prefix is matched case-sensitively over its exact length,
/// then stripped together with the separator that follows it. A symbol
/// identical to the namespace leaves no class segment and is no match.
pub fn resolve_psr4(symbol: &str, namespace: &str, separator: char) -> Option<PathBuf> {
    let rest = symbol.strip_prefix(namespace)?;

    let mut chars = rest.chars();
    chars.next()?;
    let rest = chars.as_str();
    if rest.is_empty() {
        return None;
    }

    let mut path = PathBuf::new();
    push_leaf(&mut path, rest, separator);
    Some(path)
}

/// Pushes `leaf` split on `separator`, attaching [`SOURCE_EXT`] to the
/// final segment.
fn push_leaf(path: &mut PathBuf, leaf: &str, separator: char) {
    let mut segments: Vec<&str> = leaf.split(separator).collect();
    let file = format!("{}.{}", segments.pop().unwrap_or(""), SOURCE_EXT);
    for segment in segments {
        path.push(segment);
    }
    path.push(file);
}


//=====================================================
// End of file
//=====================================================
