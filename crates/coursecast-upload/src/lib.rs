//! Upload orchestration for lesson videos.
//!
//! An [`UploadOrchestrator`] drives one session at a time through
//! `idle → requesting-url → uploading → processing → complete | error`:
//!
//! 1. check for a credential and validate the selected file locally (no network call),
//! 2. request a single-use upload target from the backend,
//! 3. PUT the file to the target URL while publishing percent progress,
//! 4. poll the upload record until it names an asset,
//! 5. poll the asset until it is ready for playback.
//!
//! Every transition is published on a watch channel ([`UploadOrchestrator::subscribe`]).
//! The outcome is reported through [`UploadCallbacks`] and returned to the caller.
//! Sessions can be aborted at any await point through a [`CancelHandle`].

pub mod orchestrator;
pub mod poller;
pub mod progress;
pub mod service;
pub mod session;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use orchestrator::{CancelHandle, UploadConfig, UploadOrchestrator};
pub use poller::{decide_asset_status, decide_upload_status, PollDecision, Poller};
pub use progress::{percent_complete, ProgressTracker};
pub use service::MediaService;
pub use session::{NoopCallbacks, UploadCallbacks, UploadSnapshot};
