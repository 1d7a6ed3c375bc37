//! # Document Loader
//!
//! Reads resource documents from disk and turns them into [`Resource`]s.
//!
//! JSON and YAML are accepted. The format is chosen from the file extension;
//! unknown extensions are tried as JSON first, then YAML.

use serde_json::Value;
use statuseq_core::{Resource, StatusEqError, TypedKind};
use std::path::{Path, PathBuf};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum size of a resource document (16 MB).
pub const MAX_DOCUMENT_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), StatusEqError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| StatusEqError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(StatusEqError::SerializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Resolve a path to an existing regular file.
///
/// Canonicalization resolves `..` and symlinks before the file is opened.
fn validate_file_path(path: &Path) -> Result<PathBuf, StatusEqError> {
    let canonical = path.canonicalize().map_err(|e| {
        StatusEqError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(StatusEqError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

// =============================================================================
// DOCUMENT FORMAT
// =============================================================================

/// Encoding of a resource document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Pick the format from a file extension, if it is a known one.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Parse document text in the given format, or sniff it when `None`.
pub fn parse_document(text: &str, format: Option<DocumentFormat>) -> Result<Value, StatusEqError> {
    match format {
        Some(DocumentFormat::Json) => serde_json::from_str(text)
            .map_err(|e| StatusEqError::SerializationError(format!("Invalid JSON: {}", e))),
        Some(DocumentFormat::Yaml) => serde_yaml::from_str(text)
            .map_err(|e| StatusEqError::SerializationError(format!("Invalid YAML: {}", e))),
        None => serde_json::from_str(text).or_else(|_| {
            serde_yaml::from_str(text).map_err(|e| {
                StatusEqError::SerializationError(format!(
                    "Document is neither JSON nor YAML: {}",
                    e
                ))
            })
        }),
    }
}

/// Read and parse a document from disk.
pub fn load_document(path: &Path) -> Result<Value, StatusEqError> {
    let validated = validate_file_path(path)?;
    validate_file_size(&validated, MAX_DOCUMENT_FILE_SIZE)?;

    let text = std::fs::read_to_string(&validated)
        .map_err(|e| StatusEqError::IoError(format!("Read file: {}", e)))?;

    tracing::debug!(path = %validated.display(), bytes = text.len(), "Loaded document");
    parse_document(&text, DocumentFormat::from_path(&validated))
}

/// Wrap a parsed document as a [`Resource`].
///
/// With `typed`, the document is decoded into its fixed-schema record and
/// only known kinds are accepted.
pub fn to_resource(document: Value, typed: bool) -> Result<Resource, StatusEqError> {
    if typed {
        TypedKind::decode(document)
    } else {
        Resource::from_value(document)
    }
}

// =============================================================================
// TESTS
// =============================================================================
