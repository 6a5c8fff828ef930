//! Centralized naming rules: slugs, chapter labels, and natural ordering.
//!
//! All path-derived names flow through this module so the same conventions
//! apply everywhere:
//!
//! - **Slugs** identify a book on disk and in URLs: lowercase, dash-separated,
//!   derived from the manifest title (`"My New Book"` → `my-new-book`).
//! - **Chapter labels** turn a mirrored filename into a display title
//!   (`ch1-intro.md` → `Chapter 1 - Intro`).
//! - **Natural ordering** sorts embedded digit runs by numeric value, so
//!   `ch2.md` comes before `ch10.md` without zero-padding.

use std::cmp::Ordering;

/// Derive a lowercase, dash-separated, filesystem/URL-safe slug from a title.
///
/// Runs of non-alphanumeric characters collapse into a single dash; leading
/// and trailing dashes are dropped. An empty result falls back to `untitled`.
pub fn slugify(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut prev_dash = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            prev_dash = false;
        } else if !prev_dash && !out.is_empty() {
            out.push('-');
            prev_dash = true;
        }
    }
    if out.ends_with('-') {
        out.pop();
    }
    if out.is_empty() {
        "untitled".to_string()
    } else {
        out
    }
}

/// Case-insensitive natural comparison: digit runs compare by numeric value,
/// everything else byte-by-byte after ASCII lowercasing.
///
/// `ch2.md` < `ch10.md` < `ch10b.md`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let (mut i, mut j) = (0usize, 0usize);
    loop {
        match (a.get(i), b.get(j)) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(&ca), Some(&cb)) => {
                if ca.is_ascii_digit() && cb.is_ascii_digit() {
                    let (va, ni) = digit_run(a, i);
                    let (vb, nj) = digit_run(b, j);
                    if va != vb {
                        return va.cmp(&vb);
                    }
                    i = ni;
                    j = nj;
                    continue;
                }
                let ta = ca.to_ascii_lowercase();
                let tb = cb.to_ascii_lowercase();
                if ta != tb {
                    return ta.cmp(&tb);
                }
                i += 1;
                j += 1;
            }
        }
    }
}

/// Read a digit run starting at `i`, returning its numeric value and the
/// index one past the run. Saturates rather than overflowing on absurd runs.
fn digit_run(s: &[u8], mut i: usize) -> (u128, usize) {
    let mut value: u128 = 0;
    while let Some(&c) = s.get(i) {
        if !c.is_ascii_digit() {
            break;
        }
        value = value.saturating_mul(10).saturating_add(u128::from(c - b'0'));
        i += 1;
    }
    (value, i)
}

/// Derive a display label from a chapter's relative path.
///
/// The base filename is stripped of its extension, runs of non-alphanumeric
/// characters become single spaces, and each word is title-cased. A leading
/// `Ch<N>` token is then expanded: `ch1-intro.md` → `Chapter 1 - Intro`,
/// `ch7.md` → `Chapter 7`. Names that merely start with the letters "ch"
/// (`chapter-two.md`, `checklist.md`) are left as plain title case.
pub fn chapter_label(rel_path: &str) -> String {
    let base = rel_path.rsplit('/').next().unwrap_or(rel_path);
    let stem = match base.rfind('.') {
        Some(dot) => &base[..dot],
        None => base,
    };
    let titled = title_case(stem);
    expand_chapter_token(&titled).unwrap_or(titled)
}

/// Title-case a filename stem, treating every non-alphanumeric run as a
/// single word boundary and collapsing the resulting spaces.
fn title_case(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len());
    let mut new_word = true;
    for c in stem.chars() {
        if c.is_alphabetic() {
            if new_word {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            new_word = false;
        } else if c.is_ascii_digit() {
            out.push(c);
            new_word = false;
        } else {
            if !out.is_empty() && !out.ends_with(' ') {
                out.push(' ');
            }
            new_word = true;
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}

/// Expand a leading `Ch<N>` token into `Chapter <N> - <Rest>`.
///
/// Returns `None` when the label does not start with "Ch" followed (after
/// optional spaces) by a digit run, in which case the caller keeps the
/// title-cased label unchanged.
fn expand_chapter_token(label: &str) -> Option<String> {
    let rest = label.strip_prefix("Ch")?;
    let rest = rest.trim_start_matches(' ');
    let digits: &str = {
        let end = rest
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map_or(rest.len(), |(i, _)| i);
        &rest[..end]
    };
    if digits.is_empty() {
        return None;
    }
    let tail = rest[digits.len()..].trim();
    if tail.is_empty() {
        Some(format!("Chapter {digits}"))
    } else {
        Some(format!("Chapter {digits} - {tail}"))
    }
}
