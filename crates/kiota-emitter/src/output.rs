//! Root output folder resolution
//!
//! The host hands each emitter a package-qualified directory such as
//! `tsp-output/@scope/package`. Everything this emitter writes (the API
//! description and every generated client) goes beneath the shared root
//! above it instead.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Leading character of a scoped package directory
pub const SCOPE_MARKER: char = '@';

/// Resolve the shared root from the emitter's own output directory
///
/// Walks up one level, then one more if that level is a scope directory.
/// Relative paths stay relative; a path with no parent resolves to `.`.
pub fn resolve_root_output_folder(emitter_output_dir: &Path) -> PathBuf {
    let parent = dirname(emitter_output_dir);
    if is_scope_dir(&parent) {
        dirname(&parent)
    } else {
        parent
    }
}

fn is_scope_dir(path: &Path) -> bool {
    path.file_name()
        .and_then(OsStr::to_str)
        .is_some_and(|name| name.starts_with(SCOPE_MARKER))
}

fn dirname(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => PathBuf::from("."),
        Some(parent) => parent.to_path_buf(),
        None if path.has_root() => path.to_path_buf(),
        None => PathBuf::from("."),
    }
}
