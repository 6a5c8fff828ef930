//! Content discovery: recursive file scanning with extension filtering.
//!
//! The scanner walks a directory tree and returns relative paths for every
//! regular file whose extension (compared case-insensitively) is one of the
//! recognized content formats. Paths are always normalized to forward-slash
//! form so later stages can compare and report them identically on every
//! host; they are converted back to native separators only at the point of
//! touching the filesystem, via [`to_native`].
//!
//! The scanner makes no ordering guarantee; callers that need a stable
//! order apply [`crate::naming::natural_cmp`] themselves. Missing or
//! unreadable directories yield an empty (or partial) result rather than an
//! error: a half-populated dropzone must never abort a build.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions the pipeline recognizes as content, lowercase.
pub const CONTENT_EXTENSIONS: &[&str] = &["md", "markdown", "txt", "pdf"];

/// The binary document format: discovered and inventoried, but never
/// mirrored into chapters or listed in generated artifacts.
pub const BINARY_DOC_EXTENSION: &str = "pdf";

/// Text formats eligible for draft concatenation.
const TEXT_CHAPTER_EXTENSIONS: &[&str] = &["md", "markdown", "txt"];

/// Recursively discover content files under `root`.
///
/// Returned paths are relative to `root`, forward-slash separated, and
/// optionally prefixed with `prefix` (also forward-slash form). Directories
/// are recursed unconditionally; unreadable entries are skipped.
pub fn scan_content(root: &Path, prefix: Option<&str>) -> Vec<String> {
    let mut found = Vec::new();
    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        if !has_content_extension(rel) {
            continue;
        }
        let rel = to_forward_slashes(rel);
        found.push(match prefix {
            Some(p) => format!("{p}/{rel}"),
            None => rel,
        });
    }
    found
}

fn has_content_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            CONTENT_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

fn to_forward_slashes(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Convert a forward-slash relative path back to a native [`PathBuf`] for
/// filesystem access.
pub fn to_native(rel: &str) -> PathBuf {
    rel.split('/').collect()
}

/// Base filename of a forward-slash relative path.
pub fn base_name(rel: &str) -> &str {
    rel.rsplit('/').next().unwrap_or(rel)
}

fn has_extension_ic(rel: &str, ext: &str) -> bool {
    base_name(rel)
        .rsplit_once('.')
        .is_some_and(|(_, e)| e.eq_ignore_ascii_case(ext))
}

/// True for files in the binary document format.
pub fn is_binary_doc(rel: &str) -> bool {
    has_extension_ic(rel, BINARY_DOC_EXTENSION)
}

/// Whether a chapter-relative path participates in generated listings (TOC):
/// underscore-prefixed base names and binary documents are excluded.
pub fn is_listable_chapter(rel: &str) -> bool {
    !base_name(rel).starts_with('_') && !is_binary_doc(rel)
}

/// Whether a chapter-relative path is eligible for draft concatenation:
/// listable, and in a text format.
pub fn is_text_chapter(rel: &str) -> bool {
    is_listable_chapter(rel)
        && TEXT_CHAPTER_EXTENSIONS
            .iter()
            .any(|ext| has_extension_ic(rel, ext))
}
