//! bookforge: a deterministic book-build pipeline with a local preview
//! server.
//!
//! A project is a directory with a `book.toml` manifest, a dropzone of raw
//! manuscript fragments, a regenerable workspace, and dated build outputs:
//!
//! ```text
//! dropzone/ ──ingest──▶ workspace/outline.md
//!     │
//!     └──normalize──▶ workspace/chapters/ ──▶ toc / frontmatter / ack
//!                                │
//!                                └──pack──▶ workspace/book-draft.md
//!                                                │
//!                                                ▼
//!                      outputs/<slug>/<YYYY-MM-DD>/{md,site,cover,...}
//!                                                │
//!                                                └──serve──▶ http://127.0.0.1:8080/
//! ```
//!
//! Builds are deterministic for a given (input tree, manifest, UTC day):
//! chapter ordering is natural-sorted, the build root is rebuilt clean on
//! every run, and two builds on the same day target the same root.
//!
//! ## Module map
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`context`] | Resolved project paths, threaded through every stage |
//! | [`manifest`] | `book.toml` loading with lenient scalar coercion |
//! | [`naming`] | Slugs, natural ordering, chapter labels |
//! | [`scan`] | Recursive content discovery and path classification |
//! | [`normalize`] | Dropzone → canonical chapter mirror |
//! | [`artifacts`] | Outline, TOC, frontmatter, acknowledgements, cover |
//! | [`draft`] | Ordered single-document draft packaging |
//! | [`build`] | Pipeline orchestration and output-tree lifecycle |
//! | [`site`] | Stylesheet staging and the static landing page |
//! | [`serve`] | Strict single-threaded HTTP preview server |
//! | [`fsops`] | Shared filesystem primitives |

pub mod artifacts;
pub mod build;
pub mod context;
pub mod draft;
pub mod fsops;
pub mod manifest;
pub mod naming;
pub mod normalize;
pub mod scan;
pub mod serve;
pub mod site;
