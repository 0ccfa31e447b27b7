//! Loading and writing JSON documents.
//!
//! Every command reads its records from `.json` files. Loading keeps the raw
//! [`serde_json::Value`] so the validator sees exactly what the user wrote,
//! and records a BLAKE3 hash of the file for provenance.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

/// Recognized JSON extensions.
pub const JSON_EXTENSIONS: &[&str] = &["json"];

/// A loaded JSON document.
#[derive(Debug, Clone)]
pub struct LoadResult {
    pub value: Value,
    /// BLAKE3 hash of the file content.
    pub source_hash: String,
}

/// Errors raised while loading a document.
#[derive(Debug)]
pub enum InputError {
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    UnknownExtension { extension: Option<String> },

    JsonParse { message: String },
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::FileRead { path, source } => {
                write!(f, "failed to read file '{}': {}", path.display(), source)
            }
            InputError::UnknownExtension { extension } => match extension {
                Some(ext) => write!(f, "unknown file extension '.{}' (expected .json)", ext),
                None => write!(f, "file has no extension (expected .json)"),
            },
            InputError::JsonParse { message } => write!(f, "JSON parse error: {}", message),
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InputError::FileRead { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Loads a JSON document from `path`.
pub fn load_json(path: &Path) -> Result<LoadResult, InputError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase());
    if !extension
        .as_deref()
        .is_some_and(|ext| JSON_EXTENSIONS.contains(&ext))
    {
        return Err(InputError::UnknownExtension { extension });
    }

    let content = std::fs::read_to_string(path).map_err(|e| InputError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let source_hash = blake3::hash(content.as_bytes()).to_hex().to_string();
    let value = serde_json::from_str(&content).map_err(|e| InputError::JsonParse {
        message: e.to_string(),
    })?;

    tracing::debug!(path = %path.display(), hash = %&source_hash[..16], "loaded input");
    Ok(LoadResult { value, source_hash })
}

/// Writes `value` as pretty JSON to `out`, or to stdout when `out` is `None`.
pub fn write_json<T: Serialize>(value: &T, out: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => {
            std::fs::write(path, format!("{}\n", json))?;
            tracing::info!(path = %path.display(), "wrote output");
        }
        None => println!("{}", json),
    }
    Ok(())
}
