//! Error types module
//!
//! This module provides the error taxonomy of the upload workflow. Every variant of
//! [`UploadError`] ends a session in the `error` state and is recoverable through a reset;
//! none of them are fatal to the process.
//!
//! `Display` carries the internal detail meant for logs. The message shown to the user
//! comes from [`ErrorMetadata::client_message`].

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::models::SessionState;

/// One gibibyte, the unit the size ceiling is expressed in.
pub const GIB: u64 = 1024 * 1024 * 1024;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for remote failures the user can retry
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error presentation - defines how an error should be shown to the user
/// This trait allows errors to self-describe their user-facing characteristics
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "INVALID_FILE_TYPE")
    fn error_code(&self) -> &'static str;

    /// Whether starting a new session can succeed without changing the input
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the user
    fn suggested_action(&self) -> Option<&'static str>;

    /// User-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Which of the two status pollers an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    /// Polling the upload record until an asset id appears.
    UploadRecord,
    /// Polling the media asset until playback is ready.
    Asset,
}

impl PollPhase {
    /// Error returned when the attempt ceiling is reached without a terminal status.
    pub fn timeout_error(self, attempts: u32) -> UploadError {
        match self {
            PollPhase::UploadRecord => UploadError::UploadProcessingTimeout { attempts },
            PollPhase::Asset => UploadError::ProcessingTimeout { attempts },
        }
    }

    /// Error returned when a status query fails in transport or parsing.
    pub fn status_check_failed(self, reason: impl Into<String>) -> UploadError {
        UploadError::StatusCheckFailed {
            phase: self,
            reason: reason.into(),
        }
    }
}

impl Display for PollPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            PollPhase::UploadRecord => write!(f, "upload"),
            PollPhase::Asset => write!(f, "asset"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UploadError {
    #[error("Missing credential: upload requires a logged-in account")]
    MissingCredential,

    #[error("Invalid file type: {content_type}")]
    InvalidFileType { content_type: String },

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Upload URL unavailable: {0}")]
    UploadUrlUnavailable(String),

    #[error("Transfer failed: {0}")]
    TransferFailed(String),

    #[error("Upload record reached terminal status: {status}")]
    UploadProcessingFailed { status: String },

    #[error("Upload record had no asset after {attempts} attempts")]
    UploadProcessingTimeout { attempts: u32 },

    #[error("Asset processing failed: {0}")]
    ProcessingFailed(String),

    #[error("Asset was not ready after {attempts} attempts")]
    ProcessingTimeout { attempts: u32 },

    #[error("{phase} status check failed: {reason}")]
    StatusCheckFailed { phase: PollPhase, reason: String },

    #[error("Upload cancelled")]
    Cancelled,

    #[error("Invalid transition: cannot reset from {from}")]
    InvalidTransition { from: SessionState },
}

/// Static metadata for each variant: (error_code, recoverable, suggested_action, log_level).
fn upload_error_static_metadata(
    err: &UploadError,
) -> (&'static str, bool, Option<&'static str>, LogLevel) {
    match err {
        UploadError::MissingCredential => (
            "MISSING_CREDENTIAL",
            false,
            Some("Log in and try again"),
            LogLevel::Debug,
        ),
        UploadError::InvalidFileType { .. } => (
            "INVALID_FILE_TYPE",
            false,
            Some("Choose an MP4, WebM or MOV file"),
            LogLevel::Debug,
        ),
        UploadError::FileTooLarge { .. } => (
            "FILE_TOO_LARGE",
            false,
            Some("Compress or trim the video and try again"),
            LogLevel::Debug,
        ),
        UploadError::UploadUrlUnavailable(_) => (
            "UPLOAD_URL_UNAVAILABLE",
            true,
            Some("Retry after a short delay"),
            LogLevel::Error,
        ),
        UploadError::TransferFailed(_) => (
            "TRANSFER_FAILED",
            true,
            Some("Check your connection and try again"),
            LogLevel::Warn,
        ),
        UploadError::UploadProcessingFailed { .. } => (
            "UPLOAD_PROCESSING_FAILED",
            true,
            Some("Upload the file again"),
            LogLevel::Warn,
        ),
        UploadError::UploadProcessingTimeout { .. } => (
            "UPLOAD_PROCESSING_TIMEOUT",
            true,
            Some("Check the lesson later"),
            LogLevel::Warn,
        ),
        UploadError::ProcessingFailed(_) => (
            "PROCESSING_FAILED",
            false,
            Some("Check the video encoding and try a different file"),
            LogLevel::Warn,
        ),
        UploadError::ProcessingTimeout { .. } => (
            "PROCESSING_TIMEOUT",
            true,
            Some("Check the lesson later"),
            LogLevel::Warn,
        ),
        UploadError::StatusCheckFailed { .. } => (
            "STATUS_CHECK_FAILED",
            true,
            Some("Retry after a short delay"),
            LogLevel::Error,
        ),
        UploadError::Cancelled => ("CANCELLED", true, None, LogLevel::Debug),
        UploadError::InvalidTransition { .. } => (
            "INVALID_TRANSITION",
            false,
            Some("Wait for the upload to finish before resetting"),
            LogLevel::Debug,
        ),
    }
}

/// Render a byte ceiling the way the upload widget advertises it ("5GB").
pub fn format_size_limit(max: u64) -> String {
    if max >= GIB && max % GIB == 0 {
        format!("{}GB", max / GIB)
    } else if max >= 1024 * 1024 && max % (1024 * 1024) == 0 {
        format!("{}MB", max / (1024 * 1024))
    } else {
        format!("{} bytes", max)
    }
}

impl ErrorMetadata for UploadError {
    fn error_code(&self) -> &'static str {
        upload_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        upload_error_static_metadata(self).1
    }

    fn suggested_action(&self) -> Option<&'static str> {
        upload_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        upload_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            UploadError::MissingCredential => "Please log in to upload videos".to_string(),
            UploadError::InvalidFileType { .. } => "Please select a video file".to_string(),
            UploadError::FileTooLarge { max, .. } => {
                format!("File size must be less than {}", format_size_limit(*max))
            }
            UploadError::UploadUrlUnavailable(_) => {
                "Invalid response from upload URL endpoint".to_string()
            }
            UploadError::TransferFailed(_) => "Upload failed. Please try again.".to_string(),
            UploadError::UploadProcessingFailed { .. } => "Upload processing failed".to_string(),
            UploadError::UploadProcessingTimeout { .. } => {
                "Upload processing timeout. Please check later.".to_string()
            }
            UploadError::ProcessingFailed(_) => "Video processing failed".to_string(),
            UploadError::ProcessingTimeout { .. } => {
                "Processing timeout. Please check later.".to_string()
            }
            UploadError::StatusCheckFailed { phase, .. } => match phase {
                PollPhase::UploadRecord => "Failed to check upload status".to_string(),
                PollPhase::Asset => "Failed to check video status".to_string(),
            },
            UploadError::Cancelled => "Upload cancelled".to_string(),
            UploadError::InvalidTransition { from } => {
                format!("Cannot reset while the upload is {}", from)
            }
        }
    }
}
