//! Local validation of a selected file, run before any network call.

use std::path::Path;

use crate::error::{UploadError, GIB};
use crate::models::VideoFile;

/// Default selection ceiling: 5 GiB.
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 5 * GIB;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Map a file extension to the MIME type a browser would report for it.
///
/// Non-video types are listed too so that a picture or document is rejected as
/// "not a video" rather than as an unknown file.
pub fn content_type_for_extension(extension: &str) -> Option<&'static str> {
    let content_type = match extension.to_lowercase().as_str() {
        // Videos
        "mp4" => "video/mp4",
        "m4v" => "video/x-m4v",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        "mpeg" | "mpg" => "video/mpeg",
        "ogv" => "video/ogg",
        "3gp" => "video/3gpp",
        // Images
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        // Audio
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        // Documents
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => return None,
    };
    Some(content_type)
}

/// Content type for a path, `application/octet-stream` when the extension is unknown.
pub fn content_type_for_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(content_type_for_extension)
        .unwrap_or(FALLBACK_CONTENT_TYPE)
}

/// Upload precondition checks.
#[derive(Debug, Clone, Copy)]
pub struct VideoValidator {
    max_file_size: u64,
}

impl Default for VideoValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_SIZE_BYTES)
    }
}

impl VideoValidator {
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    /// Only `video/*` media types are accepted.
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), UploadError> {
        let normalized = content_type.trim().to_lowercase();
        match normalized.strip_prefix("video/") {
            Some(subtype) if !subtype.is_empty() => Ok(()),
            _ => Err(UploadError::InvalidFileType {
                content_type: content_type.to_string(),
            }),
        }
    }

    /// The ceiling itself is already too large.
    pub fn validate_file_size(&self, size: u64) -> Result<(), UploadError> {
        if size >= self.max_file_size {
            return Err(UploadError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }
        Ok(())
    }

    /// Type first, then size.
    pub fn validate(&self, file: &VideoFile) -> Result<(), UploadError> {
        self.validate_content_type(&file.content_type)?;
        self.validate_file_size(file.size_bytes)
    }
}
