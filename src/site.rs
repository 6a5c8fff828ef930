//! Site assembly: stylesheet staging and the static landing page.
//!
//! The landing page is rendered with [maud](https://maud.lambda.xyz/):
//! compile-time checked HTML with automatic escaping, so a title like
//! `Tips & <Tricks>` cannot break the page. Exactly one `index.html` is
//! emitted per build; the cover image and draft download link appear only
//! when the orchestrator confirmed those files actually landed in `site/`.

use maud::{DOCTYPE, Markup, html};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::context::ProjectContext;
use crate::fsops;
use crate::manifest::BookManifest;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Name of the staged stylesheet inside the build root's `html/` directory.
pub const STYLESHEET_NAME: &str = "style.css";

/// Starter stylesheet seeded into `themes/book.css` by `init`.
pub const STARTER_CSS: &str = "\
/* bookforge starter theme */
:root {
  color-scheme: light dark;
  --fg: #1a1a1a;
  --bg: #fafafa;
  --muted: #666666;
}
body {
  margin: 0;
  font-family: Georgia, 'Times New Roman', serif;
  color: var(--fg);
  background: var(--bg);
}
main {
  max-width: 42rem;
  margin: 4rem auto;
  padding: 0 1rem;
}
.card {
  padding: 2rem;
  border: 1px solid #dddddd;
  border-radius: 8px;
  background: #ffffff;
}
.meta {
  color: var(--muted);
}
img.cover {
  max-width: 16rem;
  display: block;
  margin: 1rem 0;
}
";

/// Minimal placeholder written when no theme stylesheet exists.
const PLACEHOLDER_CSS: &str = "/* bookforge theme placeholder */\n";

/// Stage the theme stylesheet into `<build_root>/html/`, lazily creating a
/// minimal placeholder when the project has no theme file. Returns the
/// staged stylesheet's name.
pub fn stage_stylesheet(
    ctx: &ProjectContext,
    build_root: &Path,
) -> Result<&'static str, SiteError> {
    let dst = build_root.join("html").join(STYLESHEET_NAME);
    let theme = ctx.theme_css();
    if theme.is_file() {
        fsops::copy_with_parents(&theme, &dst)?;
    } else {
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&dst, PLACEHOLDER_CSS)?;
    }
    Ok(STYLESHEET_NAME)
}

/// Emit `index.html` into the site directory.
pub fn write_index(
    site_dir: &Path,
    manifest: &BookManifest,
    slug: &str,
    stamp: &str,
    has_cover: bool,
    has_draft: bool,
) -> Result<(), SiteError> {
    let page = render_index(
        manifest.title(),
        manifest.author(),
        slug,
        stamp,
        has_cover,
        has_draft,
    );
    fs::create_dir_all(site_dir)?;
    fs::write(site_dir.join("index.html"), page.into_string())?;
    println!("[site] wrote: {}", site_dir.join("index.html").display());
    Ok(())
}

fn render_index(
    title: &str,
    author: &str,
    slug: &str,
    stamp: &str,
    has_cover: bool,
    has_draft: bool,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width,initial-scale=1";
                title { (title) " - bookforge" }
                link rel="stylesheet" href={ "../html/" (STYLESHEET_NAME) };
            }
            body {
                main {
                    div.card {
                        h1 { (title) }
                        p.meta { "by " (author) }
                        p {
                            strong { "Slug:" } " " code { (slug) }
                            br;
                            strong { "Build:" } " " code { (stamp) }
                        }
                        @if has_cover {
                            img.cover src="cover.svg" alt="Cover";
                        }
                        @if has_draft {
                            p { a href="book-draft.md" download { "Download book-draft.md" } }
                        }
                        p { "This page is a build preview. The render stage replaces it with the full book site." }
                    }
                }
            }
        }
    }
}
