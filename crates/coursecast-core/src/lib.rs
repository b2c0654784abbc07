//! Coursecast Core Library
//!
//! This crate provides the domain models, error types, configuration, and validation
//! shared by the API client, the upload orchestrator, and the CLI.

pub mod config;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{ClientConfig, PollPolicy};
pub use error::{ErrorMetadata, LogLevel, PollPhase, UploadError};
pub use validation::VideoValidator;
