//! Resolved project paths, threaded explicitly through every pipeline stage.
//!
//! Nothing in the pipeline infers a location from the process working
//! directory at call time: the CLI resolves a [`ProjectContext`] once at
//! startup and every component receives the absolute paths it needs from it.
//!
//! ## Project layout
//!
//! ```text
//! <project>/
//! ├── book.toml            # manifest (scalar key:value metadata + switches)
//! ├── dropzone/            # raw manuscript fragments (user-owned input)
//! ├── workspace/           # regenerable intermediates
//! │   ├── chapters/        # canonical chapter mirror
//! │   ├── outline.md       # ingest diagnostic
//! │   ├── toc.md
//! │   ├── frontmatter.md
//! │   ├── acknowledgements.md
//! │   ├── cover.svg
//! │   ├── frontcover.md    # cover editing guide
//! │   └── book-draft.md    # packaged draft
//! ├── themes/              # stylesheet source (book.css)
//! └── outputs/<slug>/<YYYY-MM-DD>/   # dated build roots
//! ```

use std::io;
use std::path::{Path, PathBuf};

/// Absolute paths for one project, resolved once at startup.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    /// Project root (directory containing `book.toml`).
    pub root: PathBuf,
    /// User-populated input directory.
    pub dropzone: PathBuf,
    /// Regenerable staging area for generated artifacts.
    pub workspace: PathBuf,
    /// Parent of all dated build roots.
    pub outputs: PathBuf,
    /// Stylesheet source directory.
    pub themes: PathBuf,
}

impl ProjectContext {
    /// Resolve a context from a (possibly relative) project root and the
    /// manifest's dropzone setting. The working directory is consulted
    /// exactly once, here.
    pub fn resolve(project_root: &Path, dropzone: &str) -> io::Result<Self> {
        let root = if project_root.is_absolute() {
            project_root.to_path_buf()
        } else {
            std::env::current_dir()?.join(project_root)
        };
        Ok(Self {
            dropzone: root.join(dropzone),
            workspace: root.join("workspace"),
            outputs: root.join("outputs"),
            themes: root.join("themes"),
            root,
        })
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join("book.toml")
    }

    /// Canonical chapter mirror, rebuilt from the dropzone on every
    /// normalization pass.
    pub fn chapters_dir(&self) -> PathBuf {
        self.workspace.join("chapters")
    }

    pub fn outline(&self) -> PathBuf {
        self.workspace.join("outline.md")
    }

    pub fn toc(&self) -> PathBuf {
        self.workspace.join("toc.md")
    }

    pub fn frontmatter(&self) -> PathBuf {
        self.workspace.join("frontmatter.md")
    }

    pub fn acknowledgements(&self) -> PathBuf {
        self.workspace.join("acknowledgements.md")
    }

    pub fn cover(&self) -> PathBuf {
        self.workspace.join("cover.svg")
    }

    /// Companion guide explaining how to hand-edit the cover. Regenerated on
    /// every build, unlike the cover itself.
    pub fn cover_guide(&self) -> PathBuf {
        self.workspace.join("frontcover.md")
    }

    pub fn draft(&self) -> PathBuf {
        self.workspace.join("book-draft.md")
    }

    pub fn theme_css(&self) -> PathBuf {
        self.themes.join("book.css")
    }

    /// Dated build root for one (slug, UTC day) key. Multiple builds on the
    /// same day target the same root.
    pub fn build_root(&self, slug: &str, day: &str) -> PathBuf {
        self.outputs.join(slug).join(day)
    }
}
