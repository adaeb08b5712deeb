//! Document loading for indexing
//!
//! Supports plain text, Markdown and JSON files. Binary formats (PDF,
//! DOCX) are out of scope; unsupported files in a directory walk are
//! skipped with a log line rather than failing the run.

use std::collections::HashMap;
use std::path::Path;

use sha2::Digest;
use sha2::Sha256;
use tracing::debug;
use tracing::warn;
use walkdir::WalkDir;

use crate::errors::DocRagError;
use crate::errors::Result;

/// Extensions the loader accepts
pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "md", "markdown", "json"];

/// A loaded document ready for chunking and indexing
#[derive(Debug, Clone)]
pub struct Document {
    /// Source id used for retrieval attribution (the file stem)
    pub id: String,
    pub text: String,
    pub metadata: HashMap<String, String>,
}

/// Load a single file based on its extension
pub fn load_file(path: &Path) -> Result<Document> {
    if !path.is_file() {
        return Err(DocRagError::Document(format!(
            "not a file: {}",
            path.display()
        )));
    }

    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "txt" => load_text(path, "txt"),
        "md" | "markdown" => load_text(path, "markdown"),
        "json" => load_json(path),
        other => Err(DocRagError::Document(format!(
            "unsupported file type: .{other} (supported: {})",
            SUPPORTED_EXTENSIONS.join(", ")
        ))),
    }
}

/// Load all supported files from a directory.
///
/// Files that fail to load are skipped with a warning so one bad file
/// cannot abort a whole indexing run.
pub fn load_directory(dir: &Path, recursive: bool) -> Result<Vec<Document>> {
    if !dir.is_dir() {
        return Err(DocRagError::Document(format!(
            "not a directory: {}",
            dir.display()
        )));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut documents = Vec::new();

    for entry in WalkDir::new(dir)
        .max_depth(max_depth)
        .follow_links(true)
        .into_iter()
        .filter_map(std::result::Result::ok)
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
            debug!("Skipping unsupported file: {}", path.display());
            continue;
        }

        match load_file(path) {
            Ok(doc) => documents.push(doc),
            Err(e) => warn!("Failed to load {}: {e}", path.display()),
        }
    }

    Ok(documents)
}

fn load_text(path: &Path, doc_type: &str) -> Result<Document> {
    let text = std::fs::read_to_string(path)?;
    Ok(Document {
        id: file_stem(path),
        metadata: base_metadata(path, doc_type, &text),
        text,
    })
}

/// JSON files may carry a structured `{"text": ..., "metadata": ...}`
/// payload; anything else is indexed as pretty-printed JSON.
fn load_json(path: &Path) -> Result<Document> {
    let raw = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&raw)?;

    let (id, text, extra) = match &value {
        serde_json::Value::Object(map) if map.contains_key("text") => {
            let id = map
                .get("id")
                .and_then(|v| v.as_str())
                .map_or_else(|| file_stem(path), String::from);
            let text = map
                .get("text")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            let extra = map
                .get("metadata")
                .and_then(|v| v.as_object())
                .map(|m| {
                    m.iter()
                        .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                        .collect::<HashMap<_, _>>()
                })
                .unwrap_or_default();
            (id, text, extra)
        }
        other => (
            file_stem(path),
            serde_json::to_string_pretty(other)?,
            HashMap::new(),
        ),
    };

    let mut metadata = base_metadata(path, "json", &text);
    metadata.extend(extra);

    Ok(Document { id, text, metadata })
}

fn base_metadata(path: &Path, doc_type: &str, text: &str) -> HashMap<String, String> {
    let mut metadata = HashMap::new();
    metadata.insert("source".to_string(), path.display().to_string());
    metadata.insert("type".to_string(), doc_type.to_string());
    metadata.insert(
        "filename".to_string(),
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
    );
    metadata.insert("sha256".to_string(), content_hash(text));
    metadata
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Hex-encoded SHA-256 of the document text
fn content_hash(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}
