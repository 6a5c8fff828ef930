//! Chapter normalization: mirror dropzone content into the canonical
//! chapter directory.
//!
//! Every run starts from empty: the destination is recursively cleared (but
//! not deleted) before mirroring, so two consecutive runs against an
//! unchanged dropzone produce byte-identical trees and no stale chapter ever
//! survives a rename in the source.
//!
//! The stage is partial-failure tolerant: a copy that fails is logged and
//! counted, and the batch continues. A best-effort mirror is still useful,
//! which is the opposite policy from draft packaging.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::{fsops, scan};

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Diagnostic report file written into the chapter directory. The leading
/// underscore keeps it out of the TOC and the packaged draft.
pub const REPORT_NAME: &str = "_normalize-report.txt";

/// Outcome of one normalization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Files mirrored into the chapter directory.
    pub copied: usize,
    /// Files excluded (binary documents) or whose copy failed.
    pub skipped: usize,
}

/// Mirror every markdown/plain-text file from `dropzone` into
/// `chapters_dir`, stripping a leading `chapters/` segment so an organized
/// dropzone does not nest.
///
/// Failing to prepare or clear the destination is an error; individual copy
/// failures are not.
pub fn normalize_chapters(
    dropzone: &Path,
    chapters_dir: &Path,
) -> Result<NormalizeReport, NormalizeError> {
    fs::create_dir_all(chapters_dir)?;
    fsops::clear_dir(chapters_dir)?;

    let mut report = NormalizeReport::default();
    for rel in scan::scan_content(dropzone, None) {
        if scan::is_binary_doc(&rel) {
            report.skipped += 1;
            continue;
        }
        let dest_rel = rel.strip_prefix("chapters/").unwrap_or(&rel);
        let src = dropzone.join(scan::to_native(&rel));
        let dst = chapters_dir.join(scan::to_native(dest_rel));
        match fsops::copy_with_parents(&src, &dst) {
            Ok(_) => report.copied += 1,
            Err(e) => {
                eprintln!("[normalize] warning: copy failed for {rel}: {e}");
                report.skipped += 1;
            }
        }
    }

    // Operator-facing summary; no later stage consumes it, so a failed
    // write is a warning rather than a stage failure.
    let summary = format!("copied: {}\nskipped: {}\n", report.copied, report.skipped);
    if let Err(e) = fs::write(chapters_dir.join(REPORT_NAME), summary) {
        eprintln!("[normalize] warning: could not write {REPORT_NAME}: {e}");
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str, content: &str) {
        let path: PathBuf = root.join(scan::to_native(rel));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn snapshot(dir: &Path) -> Vec<(String, Vec<u8>)> {
        let mut out: Vec<(String, Vec<u8>)> = scan::scan_content(dir, None)
            .into_iter()
            .map(|rel| {
                let bytes = fs::read(dir.join(scan::to_native(&rel))).unwrap();
                (rel, bytes)
            })
            .collect();
        out.sort();
        out
    }

    #[test]
    fn mirrors_text_content_and_skips_binary_docs() {
        let tmp = TempDir::new().unwrap();
        let drop = tmp.path().join("dropzone");
        let chapters = tmp.path().join("chapters");
        touch(&drop, "ch1-intro.md", "# One");
        touch(&drop, "notes.txt", "notes");
        touch(&drop, "scan.pdf", "%PDF");

        let report = normalize_chapters(&drop, &chapters).unwrap();

        assert_eq!(report, NormalizeReport { copied: 2, skipped: 1 });
        assert!(chapters.join("ch1-intro.md").is_file());
        assert!(chapters.join("notes.txt").is_file());
        assert!(!chapters.join("scan.pdf").exists());
    }

    #[test]
    fn strips_leading_chapters_segment() {
        let tmp = TempDir::new().unwrap();
        let drop = tmp.path().join("dropzone");
        let chapters = tmp.path().join("chapters");
        touch(&drop, "chapters/ch1.md", "# One");
        touch(&drop, "chapters/part/ch2.md", "# Two");

        normalize_chapters(&drop, &chapters).unwrap();

        assert!(chapters.join("ch1.md").is_file());
        assert!(chapters.join("part/ch2.md").is_file());
        assert!(!chapters.join("chapters").exists());
    }

    #[test]
    fn destination_is_cleared_each_run() {
        let tmp = TempDir::new().unwrap();
        let drop = tmp.path().join("dropzone");
        let chapters = tmp.path().join("chapters");
        touch(&drop, "ch1.md", "# One");
        touch(&chapters, "stale-leftover.md", "old");

        normalize_chapters(&drop, &chapters).unwrap();

        assert!(!chapters.join("stale-leftover.md").exists());
        assert!(chapters.join("ch1.md").is_file());
    }

    #[test]
    fn two_runs_are_byte_identical() {
        let tmp = TempDir::new().unwrap();
        let drop = tmp.path().join("dropzone");
        let chapters = tmp.path().join("chapters");
        touch(&drop, "ch1.md", "# One");
        touch(&drop, "part/ch2.md", "# Two");
        touch(&drop, "scan.pdf", "%PDF");

        let first_report = normalize_chapters(&drop, &chapters).unwrap();
        let first = snapshot(&chapters);
        let second_report = normalize_chapters(&drop, &chapters).unwrap();
        let second = snapshot(&chapters);

        assert_eq!(first_report, second_report);
        assert_eq!(first, second);
    }

    #[test]
    fn report_file_records_counts() {
        let tmp = TempDir::new().unwrap();
        let drop = tmp.path().join("dropzone");
        let chapters = tmp.path().join("chapters");
        touch(&drop, "ch1.md", "# One");
        touch(&drop, "scan.pdf", "%PDF");

        normalize_chapters(&drop, &chapters).unwrap();

        let report = fs::read_to_string(chapters.join(REPORT_NAME)).unwrap();
        assert_eq!(report, "copied: 1\nskipped: 1\n");
    }

    #[cfg(unix)]
    #[test]
    fn unwritable_report_does_not_fail_the_stage() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let drop = tmp.path().join("dropzone");
        fs::create_dir_all(&drop).unwrap();
        let chapters = tmp.path().join("chapters");
        fs::create_dir_all(&chapters).unwrap();
        fs::set_permissions(&chapters, fs::Permissions::from_mode(0o555)).unwrap();

        // with an empty dropzone the only write is the report itself;
        // under a non-root user it fails, and the stage must still succeed
        let report = normalize_chapters(&drop, &chapters).unwrap();

        assert_eq!(report, NormalizeReport::default());
        fs::set_permissions(&chapters, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn missing_dropzone_yields_empty_mirror() {
        let tmp = TempDir::new().unwrap();
        let chapters = tmp.path().join("chapters");

        let report = normalize_chapters(&tmp.path().join("absent"), &chapters).unwrap();

        assert_eq!(report, NormalizeReport::default());
        assert!(chapters.join(REPORT_NAME).is_file());
    }
}
