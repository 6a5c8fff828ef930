//! Generated workspace artifacts: outline, TOC, frontmatter,
//! acknowledgements, and the cover pair.
//!
//! Each generator is independently triggerable and reports its own result;
//! the orchestrator treats failures here as warnings, never as build
//! aborts. Everything except the cover image is regenerated from scratch on
//! every run; the cover is generated only when absent, because users are
//! expected to hand-edit the SVG.

use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::{naming, scan};

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

fn write_artifact(path: &Path, content: &str) -> Result<(), ArtifactError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

/// Write the ingest outline: a human-readable inventory of everything the
/// scanner found. `files` is expected to be pre-sorted by the caller.
pub fn write_outline(
    out_path: &Path,
    title: &str,
    author: &str,
    dropzone_label: &str,
    day: &str,
    files: &[String],
) -> Result<(), ArtifactError> {
    let mut md = String::with_capacity(512 + files.len() * 64);
    md.push_str(&format!("# Draft Outline - {title}\n\n"));
    md.push_str(&format!("_Author:_ **{author}**  \n"));
    md.push_str(&format!("_Date:_ **{day}**  \n"));
    md.push_str(&format!("_Sources scanned:_ `{dropzone_label}`\n\n"));
    md.push_str("## Sources (recursive)\n");
    if files.is_empty() {
        md.push_str("\n> No .md/.markdown/.txt/.pdf files found yet.\n");
    } else {
        for rel in files {
            md.push_str(&format!("- {rel}\n"));
        }
    }
    md.push_str(&format!(
        "\n---\n_Tip:_ Add your chapters as **Markdown** files under `{dropzone_label}` and re-run `bookforge ingest`.\n"
    ));
    write_artifact(out_path, &md)?;
    println!("[ingest] wrote: {}", out_path.display());
    Ok(())
}

/// Generate the table of contents from the canonical chapter directory.
///
/// Underscore-prefixed files and binary documents are excluded; entries are
/// natural-sorted and labelled via [`naming::chapter_label`]. A missing
/// chapter directory is a silent success no-op: there is simply nothing to
/// list yet.
pub fn generate_toc(
    chapters_dir: &Path,
    out_path: &Path,
    title: &str,
) -> Result<(), ArtifactError> {
    if !chapters_dir.exists() {
        return Ok(());
    }
    let mut entries: Vec<String> = scan::scan_content(chapters_dir, None)
        .into_iter()
        .filter(|rel| scan::is_listable_chapter(rel))
        .collect();
    entries.sort_by(|a, b| naming::natural_cmp(a, b));

    let mut md = String::with_capacity(256 + entries.len() * 64);
    md.push_str(&format!("# Table of Contents - {title}\n\n"));
    md.push_str("> Draft TOC generated from `workspace/chapters/`.\n\n");
    if entries.is_empty() {
        md.push_str("_No chapters found yet._\n");
    } else {
        for rel in &entries {
            let label = naming::chapter_label(rel);
            md.push_str(&format!("- [{label}](<chapters/{rel}>)\n"));
        }
    }
    write_artifact(out_path, &md)?;
    println!("[toc] wrote: {}", out_path.display());
    Ok(())
}

/// Metadata needed by the frontmatter generator, with fallbacks already
/// applied by the manifest accessors.
pub struct Frontmatter<'a> {
    pub title: &'a str,
    pub subtitle: &'a str,
    pub author: &'a str,
    pub language: &'a str,
    pub publisher: &'a str,
    pub copyright_year: &'a str,
    pub description: &'a str,
    pub day: &'a str,
}

/// Regenerate the frontmatter page. Never fails for missing optional data:
/// empty fields are either omitted (subtitle, publisher) or replaced by a
/// placeholder (description).
pub fn generate_frontmatter(out_path: &Path, fm: &Frontmatter<'_>) -> Result<(), ArtifactError> {
    let mut md = String::with_capacity(512);
    md.push_str(&format!("# {}\n", fm.title));
    if !fm.subtitle.is_empty() {
        md.push_str(&format!("## {}\n", fm.subtitle));
    }
    md.push('\n');
    md.push_str(&format!("**Author:** {}  \n", fm.author));
    if !fm.publisher.is_empty() {
        md.push_str(&format!("**Publisher:** {}  \n", fm.publisher));
    }
    md.push_str(&format!("**Language:** {}  \n", fm.language));
    md.push_str(&format!("**Date:** {}  \n", fm.day));
    md.push_str(&format!(
        "**Copyright:** © {} {}\n\n",
        fm.copyright_year, fm.author
    ));
    if fm.description.is_empty() {
        md.push_str("_No description provided._\n");
    } else {
        md.push_str(fm.description);
        md.push('\n');
    }
    write_artifact(out_path, &md)?;
    println!("[frontmatter] wrote: {}", out_path.display());
    Ok(())
}

const ACKNOWLEDGEMENTS_TEMPLATE: &str = "\
# Acknowledgements

This work was made possible thanks to the encouragement and contributions of friends,
family, colleagues, and the broader open source community.

- To my family for patience and support during the writing process.
- To early readers and reviewers for their thoughtful feedback.
- To open-source maintainers whose tools power modern learning.

*Optional:* This book was scaffolded with **bookforge**. You may keep or remove this line.
";

/// Regenerate the static acknowledgements page.
pub fn generate_acknowledgements(out_path: &Path) -> Result<(), ArtifactError> {
    write_artifact(out_path, ACKNOWLEDGEMENTS_TEMPLATE)?;
    println!("[ack] wrote: {}", out_path.display());
    Ok(())
}

/// Minimal XML text escaping for values interpolated into the cover SVG.
fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Generate the starter cover SVG, but only when no cover exists at
/// `out_path`. Hand-edited covers are never overwritten.
///
/// Returns `true` when a cover was freshly written.
pub fn generate_cover(
    out_path: &Path,
    title: &str,
    author: &str,
    slug: &str,
) -> Result<bool, ArtifactError> {
    if out_path.exists() {
        return Ok(false);
    }
    let title = xml_escape(title);
    let author = xml_escape(author);
    let slug = xml_escape(slug);
    let svg = format!(
        r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="1600" height="2560" viewBox="0 0 1600 2560">
  <defs>
    <linearGradient id="g" x1="0" y1="0" x2="1" y2="1">
      <stop offset="0%" stop-color="#0ea5e9"/>
      <stop offset="100%" stop-color="#22c55e"/>
    </linearGradient>
  </defs>
  <rect width="1600" height="2560" fill="url(#g)"/>
  <rect x="80" y="80" width="1440" height="2400" rx="48" fill="#ffffff" opacity="0.08"/>
  <g font-family="Segoe UI, Roboto, Ubuntu, Arial, sans-serif" fill="#0f172a">
    <text x="120" y="520" font-size="88" opacity="0.8">bookforge</text>
    <text x="120" y="720" font-size="128" font-weight="700">{title}</text>
    <text x="120" y="860" font-size="64" opacity="0.8">by {author}</text>
  </g>
  <g font-family="Consolas, Menlo, monospace" fill="#0f172a" opacity="0.75">
    <text x="120" y="2360" font-size="40">slug: {slug}</text>
  </g>
</svg>
"##
    );
    write_artifact(out_path, &svg)?;
    println!("[cover] wrote: {}", out_path.display());
    Ok(true)
}

/// Regenerate the cover editing guide. Unlike the cover itself this is
/// rewritten on every build so its metadata stays current.
pub fn generate_cover_guide(
    out_path: &Path,
    title: &str,
    author: &str,
    slug: &str,
    day: &str,
) -> Result<(), ArtifactError> {
    let md = format!(
        "# Front Cover\n\n\
         A starter cover has been generated at `workspace/cover.svg`.\n\
         Edit that file (SVG is just text), then run `bookforge build` again to copy it into the outputs.\n\n\
         **Title:** {title}  \n\
         **Author:** {author}  \n\
         **Slug:** {slug}  \n\
         **Date:** {day}  \n"
    );
    write_artifact(out_path, &md)?;
    println!("[frontcover] wrote: {}", out_path.display());
    Ok(())
}
