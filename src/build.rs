//! Build orchestration and output-tree lifecycle.
//!
//! One build targets `outputs/<slug>/<YYYY-MM-DD>/`: the same root for
//! every build of a title on a given UTC day. The root is rebuilt clean:
//! existing children are deleted (the root itself survives), the fixed
//! subdirectory set is recreated, and every artifact is laid down fresh.
//! Nothing from a previous build carries over.
//!
//! ## Failure taxonomy
//!
//! Stages report success or failure through their `Result`; this module
//! alone decides what is fatal:
//!
//! - **Fatal**: cannot create the build root or its subdirectories, cannot
//!   write `BUILDINFO.txt`.
//! - **Warned, build continues**: ingest, normalization, each artifact
//!   generator, stylesheet/cover staging, draft packaging, site assembly.
//!
//! The pipeline is strictly sequential; concurrent builds against the same
//! (slug, date) key are not mutually excluded and can corrupt each other's
//! output. That is an accepted non-goal for a local tool.

use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::artifacts::{self, Frontmatter};
use crate::context::ProjectContext;
use crate::manifest::{self, BookManifest};
use crate::{draft, fsops, naming, normalize, scan, site};

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("dropzone path not found: {0}")]
    MissingDropzone(PathBuf),
    #[error("cannot create {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("cannot write {path}: {source}")]
    WriteBuildInfo { path: PathBuf, source: io::Error },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Artifact(#[from] artifacts::ArtifactError),
}

/// The fixed subdirectory set of every build root.
pub const OUTPUT_SUBDIRS: &[&str] = &[
    "pdf",
    "docx",
    "epub",
    "html",
    "md",
    "cover",
    "video-scripts",
    "site",
];

/// What a completed build produced and where.
#[derive(Debug)]
pub struct BuildOutcome {
    pub root: PathBuf,
    pub has_cover: bool,
    pub has_draft: bool,
}

/// Discovery only: scan the dropzone and write the diagnostic outline.
pub fn run_ingest(ctx: &ProjectContext, manifest: &BookManifest) -> Result<(), BuildError> {
    if !ctx.dropzone.exists() {
        return Err(BuildError::MissingDropzone(ctx.dropzone.clone()));
    }
    let mut files = scan::scan_content(&ctx.dropzone, None);
    files.sort_by(|a, b| naming::natural_cmp(a, b));

    artifacts::write_outline(
        &ctx.outline(),
        manifest.title(),
        manifest.author(),
        &manifest.dropzone,
        &manifest::utc_build_date(),
        &files,
    )?;
    println!("[ingest] complete.");
    Ok(())
}

/// Run the full pipeline: optional ingest and normalization, artifact
/// generation, build-root lifecycle, cover resolution, draft packaging, and
/// site assembly.
pub fn run_build(ctx: &ProjectContext, manifest: &BookManifest) -> Result<BuildOutcome, BuildError> {
    let title = manifest.title();
    let author = manifest.author();

    if manifest.ingest_on_build {
        println!("[build] ingest_on_build: true, running ingest...");
        if let Err(e) = run_ingest(ctx, manifest) {
            eprintln!("[build] warning: ingest failed: {e}");
        }
    }

    if manifest.normalize_on_build {
        println!(
            "[build] normalize_on_build: true, mirroring from {}",
            ctx.dropzone.display()
        );
        match normalize::normalize_chapters(&ctx.dropzone, &ctx.chapters_dir()) {
            Ok(report) => println!(
                "[normalize] mirrored {} files ({} skipped)",
                report.copied, report.skipped
            ),
            Err(e) => eprintln!("[build] warning: normalization failed: {e}"),
        }
    }

    if let Err(e) = artifacts::generate_toc(&ctx.chapters_dir(), &ctx.toc(), title) {
        eprintln!("[toc] warning: {e}");
    }
    let day = manifest::utc_build_date();
    let frontmatter = Frontmatter {
        title,
        subtitle: &manifest.subtitle,
        author,
        language: manifest.language(),
        publisher: &manifest.publisher,
        copyright_year: &manifest.copyright_year(),
        description: &manifest.description,
        day: &day,
    };
    if let Err(e) = artifacts::generate_frontmatter(&ctx.frontmatter(), &frontmatter) {
        eprintln!("[frontmatter] warning: {e}");
    }
    if let Err(e) = artifacts::generate_acknowledgements(&ctx.acknowledgements()) {
        eprintln!("[ack] warning: {e}");
    }

    let slug = manifest.slug();
    let stamp = manifest::utc_build_timestamp();
    let root = ctx.build_root(&slug, &day);

    if root.exists() {
        println!("[build] cleaning existing: {}", root.display());
        if let Err(e) = fsops::clear_dir(&root) {
            eprintln!(
                "[build] warning: could not fully clean {}: {e}",
                root.display()
            );
        }
    }
    fs::create_dir_all(&root).map_err(|source| BuildError::CreateDir {
        path: root.clone(),
        source,
    })?;
    for sub in OUTPUT_SUBDIRS {
        let path = root.join(sub);
        fs::create_dir_all(&path).map_err(|source| BuildError::CreateDir { path, source })?;
    }

    match site::stage_stylesheet(ctx, &root) {
        Ok(name) => println!("[site] stylesheet: html/{name}"),
        Err(e) => eprintln!("[site] warning: stylesheet staging failed: {e}"),
    }

    // Cover: generate only when absent, then copy into archive + site.
    let ws_cover = ctx.cover();
    if !ws_cover.exists() {
        if let Err(e) = artifacts::generate_cover(&ws_cover, title, author, &slug) {
            eprintln!("[cover] warning: {e}");
        }
    }
    if let Err(e) = artifacts::generate_cover_guide(&ctx.cover_guide(), title, author, &slug, &day)
    {
        eprintln!("[frontcover] warning: {e}");
    }
    let mut has_cover = false;
    if ws_cover.is_file() {
        let archive_dst = root.join("cover").join("cover.svg");
        match fsops::copy_with_parents(&ws_cover, &archive_dst) {
            Ok(_) => println!("[cover] copied (archive): {}", archive_dst.display()),
            Err(e) => eprintln!("[cover] warning: archive copy failed: {e}"),
        }
        let site_dst = root.join("site").join("cover.svg");
        match fsops::copy_with_parents(&ws_cover, &site_dst) {
            Ok(_) => {
                println!("[cover] copied (site): {}", site_dst.display());
                has_cover = true;
            }
            Err(e) => eprintln!("[cover] warning: site copy failed: {e}"),
        }
    }

    let info_path = root.join("BUILDINFO.txt");
    let info = format!(
        "Title:  {title}\nAuthor: {author}\nSlug:   {slug}\nDate:   {day}\nStamp:  {stamp}\n"
    );
    fs::write(&info_path, info).map_err(|source| BuildError::WriteBuildInfo {
        path: info_path,
        source,
    })?;

    let has_draft = match draft::pack_draft(ctx, title, &root) {
        Ok(flag) => flag,
        Err(e) => {
            eprintln!("[build] warning: failed to package {}: {e}", draft::DRAFT_NAME);
            false
        }
    };

    if let Err(e) = site::write_index(&root.join("site"), manifest, &slug, &stamp, has_cover, has_draft) {
        eprintln!("[build] warning: could not write site/index.html: {e}");
    }

    println!("[build] ok: {}", root.display());
    println!("[build] outputs are overwritten on subsequent builds for the same date.");
    Ok(BuildOutcome {
        root,
        has_cover,
        has_draft,
    })
}
