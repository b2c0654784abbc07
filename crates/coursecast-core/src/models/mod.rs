//! Data models for the application
//!
//! This module contains the data structures exchanged with the course backend and the
//! state carried by an upload session, organized by domain.

mod asset;
mod course;
mod media;
mod session;
mod upload;
mod user;

// Re-export all models for convenient imports
pub use asset::*;
pub use course::*;
pub use media::*;
pub use session::*;
pub use upload::*;
pub use user::*;
