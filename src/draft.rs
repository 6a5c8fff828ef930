//! Draft packaging: concatenate generated and chapter content into one
//! ordered document.
//!
//! Section order is fixed: frontmatter (or a synthesized title heading when
//! none exists), the TOC if present, chapters in natural order, and
//! acknowledgements if present, all joined by [`SECTION_SEPARATOR`].
//!
//! Packaging is fail-fast: any I/O error aborts the whole operation. A
//! half-written draft is worse than no draft, which is the opposite policy
//! from chapter normalization.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

use crate::context::ProjectContext;
use crate::{fsops, naming, scan};

#[derive(Error, Debug)]
pub enum DraftError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Literal separator between draft sections.
pub const SECTION_SEPARATOR: &str = "\n\n---\n\n";

/// Output filename, in the workspace and in the build root copies.
pub const DRAFT_NAME: &str = "book-draft.md";

fn append_file(out: &mut File, src: &Path) -> io::Result<u64> {
    let mut input = File::open(src)?;
    io::copy(&mut input, out)
}

/// Chapter files eligible for the draft, in natural order.
pub fn list_chapter_files(chapters_dir: &Path) -> Vec<String> {
    let mut files: Vec<String> = scan::scan_content(chapters_dir, None)
        .into_iter()
        .filter(|rel| scan::is_text_chapter(rel))
        .collect();
    files.sort_by(|a, b| naming::natural_cmp(a, b));
    files
}

/// Pack the workspace draft, then copy it into the build root's `md/` and
/// `site/` subdirectories.
///
/// Returns whether the site copy succeeded; that flag alone gates the
/// landing page's download link. The build-root copies are best-effort; only
/// the packing itself is fail-fast.
pub fn pack_draft(
    ctx: &ProjectContext,
    title: &str,
    build_root: &Path,
) -> Result<bool, DraftError> {
    fs::create_dir_all(&ctx.workspace)?;
    let draft_path = ctx.draft();
    let mut out = File::create(&draft_path)?;

    let frontmatter = ctx.frontmatter();
    if frontmatter.is_file() {
        append_file(&mut out, &frontmatter)?;
    } else {
        write!(out, "# {title}\n\n")?;
    }

    let toc = ctx.toc();
    if toc.is_file() {
        out.write_all(SECTION_SEPARATOR.as_bytes())?;
        append_file(&mut out, &toc)?;
    }

    let chapters_dir = ctx.chapters_dir();
    for rel in list_chapter_files(&chapters_dir) {
        out.write_all(SECTION_SEPARATOR.as_bytes())?;
        append_file(&mut out, &chapters_dir.join(scan::to_native(&rel)))?;
    }

    let acknowledgements = ctx.acknowledgements();
    if acknowledgements.is_file() {
        out.write_all(SECTION_SEPARATOR.as_bytes())?;
        append_file(&mut out, &acknowledgements)?;
    }

    out.flush()?;
    drop(out);
    println!("[pack] wrote: {}", draft_path.display());

    let md_dst = build_root.join("md").join(DRAFT_NAME);
    match fsops::copy_with_parents(&draft_path, &md_dst) {
        Ok(_) => println!("[pack] copied: {}", md_dst.display()),
        Err(e) => eprintln!("[pack] warning: copy to {} failed: {e}", md_dst.display()),
    }

    let site_dst = build_root.join("site").join(DRAFT_NAME);
    match fsops::copy_with_parents(&draft_path, &site_dst) {
        Ok(_) => {
            println!("[pack] copied: {}", site_dst.display());
            Ok(true)
        }
        Err(e) => {
            eprintln!("[pack] warning: copy to {} failed: {e}", site_dst.display());
            Ok(false)
        }
    }
}
