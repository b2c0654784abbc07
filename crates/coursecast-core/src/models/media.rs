use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::validation::content_type_for_path;

/// A file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoFile {
    pub path: PathBuf,
    pub file_name: String,
    /// MIME type sent as `Content-Type` on the direct transfer.
    pub content_type: String,
    pub size_bytes: u64,
}

impl VideoFile {
    pub fn new(
        path: impl Into<PathBuf>,
        content_type: impl Into<String>,
        size_bytes: u64,
    ) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("video")
            .to_string();
        Self {
            path,
            file_name,
            content_type: content_type.into(),
            size_bytes,
        }
    }

    /// Describe a file on disk. The content type is taken from `content_type` when given,
    /// otherwise inferred from the extension (`application/octet-stream` when unknown).
    pub fn from_path(path: &Path, content_type: Option<&str>) -> Result<Self> {
        if path
            .components()
            .any(|c| c == std::path::Component::ParentDir)
        {
            return Err(anyhow::anyhow!("Invalid input: {}", path.display()));
        }

        let metadata = std::fs::metadata(path)
            .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;
        if !metadata.is_file() {
            return Err(anyhow::anyhow!("Not a regular file: {}", path.display()));
        }

        let content_type = content_type
            .map(|ct| ct.trim().to_lowercase())
            .unwrap_or_else(|| content_type_for_path(path).to_string());

        Ok(Self::new(path, content_type, metadata.len()))
    }
}
