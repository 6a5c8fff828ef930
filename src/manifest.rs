//! Book manifest loading (`book.toml`).
//!
//! The manifest is deliberately flat: scalar key:value metadata plus two
//! boolean pipeline switches. Loading is lenient the whole way down: a
//! missing or type-malformed key resolves to its documented default rather
//! than failing, so a half-filled starter manifest always builds. Only an
//! unreadable file or a syntactically invalid document is an error.
//!
//! ```toml
//! title = "My New Book"
//! subtitle = "Learning by Building"
//! author = "Your Name"
//! language = "en"             # default "en"
//! publisher = ""
//! copyright_year = ""         # empty = current UTC year at build time
//! description = "Short paragraph describing the book."
//! dropzone = "dropzone"       # input directory, relative to project root
//! ingest_on_build = true      # run discovery as part of `build`
//! normalize_on_build = true   # mirror chapters as part of `build`
//! ```

use chrono::Utc;
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid manifest: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Declarative book metadata, read from `book.toml`.
///
/// String fields keep their raw (possibly empty) value; the accessor methods
/// apply the documented fallbacks so empty and missing behave identically.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BookManifest {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub subtitle: String,
    #[serde(deserialize_with = "lenient_string")]
    pub author: String,
    #[serde(deserialize_with = "lenient_string")]
    pub language: String,
    #[serde(deserialize_with = "lenient_string")]
    pub publisher: String,
    #[serde(deserialize_with = "lenient_string")]
    pub copyright_year: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(deserialize_with = "lenient_string")]
    pub dropzone: String,
    #[serde(deserialize_with = "lenient_bool")]
    pub ingest_on_build: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub normalize_on_build: bool,
}

impl Default for BookManifest {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            author: String::new(),
            language: String::new(),
            publisher: String::new(),
            copyright_year: String::new(),
            description: String::new(),
            dropzone: "dropzone".to_string(),
            ingest_on_build: true,
            normalize_on_build: true,
        }
    }
}

impl BookManifest {
    /// Load from a `book.toml` path. Unknown keys are ignored; malformed
    /// scalars fall back to defaults via the lenient deserializers.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let mut manifest: BookManifest = toml::from_str(&content)?;
        if manifest.dropzone.is_empty() {
            manifest.dropzone = "dropzone".to_string();
        }
        Ok(manifest)
    }

    pub fn title(&self) -> &str {
        non_empty_or(&self.title, "Untitled")
    }

    pub fn author(&self) -> &str {
        non_empty_or(&self.author, "Unknown")
    }

    pub fn language(&self) -> &str {
        non_empty_or(&self.language, "en")
    }

    /// Copyright year, falling back to the current UTC year when unset.
    pub fn copyright_year(&self) -> String {
        if self.copyright_year.is_empty() {
            utc_year()
        } else {
            self.copyright_year.clone()
        }
    }

    /// URL/filesystem-safe identifier derived from the title.
    pub fn slug(&self) -> String {
        crate::naming::slugify(self.title())
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() { fallback } else { value }
}

/// Accept any TOML scalar as a string; non-scalars become empty (= unset).
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match toml::Value::deserialize(deserializer)? {
        toml::Value::String(s) => s,
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => b.to_string(),
        toml::Value::Datetime(dt) => dt.to_string(),
        toml::Value::Array(_) | toml::Value::Table(_) => String::new(),
    })
}

/// Accept booleans and boolean-ish scalars. String coercion recognizes only
/// the documented truthy/falsy spellings; anything else keeps the switch at
/// its documented default (enabled).
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match toml::Value::deserialize(deserializer)? {
        toml::Value::Boolean(b) => b,
        toml::Value::Integer(i) => i != 0,
        toml::Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => true,
            "false" | "no" | "off" | "0" => false,
            _ => true,
        },
        _ => true,
    })
}

/// Current UTC calendar date, day precision (`YYYY-MM-DD`).
pub fn utc_build_date() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// Current UTC timestamp, second precision, filename-safe
/// (`YYYY-MM-DDTHH-MM-SSZ`).
pub fn utc_build_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H-%M-%SZ").to_string()
}

fn utc_year() -> String {
    Utc::now().format("%Y").to_string()
}

/// Starter manifest written by `bookforge init` (only when absent).
pub const STARTER_MANIFEST: &str = r#"# bookforge book manifest (starter)
title = "My New Book"
subtitle = "Learning by Building"
author = "Your Name"
language = "en"
publisher = ""
copyright_year = ""
description = "Short paragraph describing the book."

# Directory of raw manuscript fragments, relative to the project root.
dropzone = "dropzone"

# Pipeline switches: run discovery / chapter mirroring as part of `build`.
ingest_on_build = true
normalize_on_build = true
"#;
