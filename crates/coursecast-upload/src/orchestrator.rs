//! The upload session state machine.

use coursecast_api_client::ProgressFn;
use coursecast_core::models::{SessionState, UploadCompletion, UploadTarget, VideoFile};
use coursecast_core::{
    ClientConfig, ErrorMetadata, LogLevel, PollPhase, PollPolicy, UploadError, VideoValidator,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::poller::{cancellable, decide_asset_status, decide_upload_status, Poller};
use crate::progress::ProgressTracker;
use crate::service::MediaService;
use crate::session::{UploadCallbacks, UploadSnapshot};

/// Settings for one orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadConfig {
    /// Origin the direct transfer will come from, sent when requesting the upload target.
    pub origin: String,
    pub max_file_size_bytes: u64,
    pub upload_poll: PollPolicy,
    pub asset_poll: PollPolicy,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self::from(&ClientConfig::default())
    }
}

impl From<&ClientConfig> for UploadConfig {
    fn from(config: &ClientConfig) -> Self {
        Self {
            origin: config.origin.clone(),
            max_file_size_bytes: config.max_file_size_bytes,
            upload_poll: config.upload_poll,
            asset_poll: config.asset_poll,
        }
    }
}

/// Aborts the session in flight. Cloneable and usable from any task.
///
/// Each new session gets a fresh token, so a cancel that lands while idle does not
/// leak into the next session.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    current: Arc<Mutex<CancellationToken>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.lock().cancel();
    }

    fn rearm(&self) -> CancellationToken {
        let mut token = self.lock();
        *token = CancellationToken::new();
        token.clone()
    }

    fn lock(&self) -> MutexGuard<'_, CancellationToken> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Remaining work of a session. Each step carries what it needs from the previous one.
#[derive(Debug)]
enum Step {
    RequestTarget,
    Transfer(UploadTarget),
    PollUploadRecord { upload_id: String },
    PollAsset { asset_id: String },
}

pub struct UploadOrchestrator<S> {
    service: S,
    callbacks: Arc<dyn UploadCallbacks>,
    config: UploadConfig,
    validator: VideoValidator,
    state: Arc<watch::Sender<UploadSnapshot>>,
    cancel: CancelHandle,
}

impl<S: MediaService> UploadOrchestrator<S> {
    pub fn new(service: S, callbacks: Arc<dyn UploadCallbacks>, config: UploadConfig) -> Self {
        let (state, _) = watch::channel(UploadSnapshot::default());
        Self {
            service,
            callbacks,
            validator: VideoValidator::new(config.max_file_size_bytes),
            config,
            state: Arc::new(state),
            cancel: CancelHandle::default(),
        }
    }

    /// Receive every published snapshot of this orchestrator's sessions.
    pub fn subscribe(&self) -> watch::Receiver<UploadSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> UploadSnapshot {
        self.state.borrow().clone()
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().state
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Run a full session for `file` and return its outcome.
    ///
    /// Selecting a file while a previous session sits in `complete` or `error` discards
    /// it first. Success leaves the orchestrator in `complete` and fires
    /// `on_upload_complete`; failure leaves it in `error` and fires `on_error`. A
    /// cancelled session returns to `idle`, fires nothing and returns
    /// [`UploadError::Cancelled`].
    pub async fn select_file(&mut self, file: VideoFile) -> Result<UploadCompletion, UploadError> {
        let previous = self.state();
        if previous != SessionState::Idle {
            tracing::debug!(previous = %previous, "Discarding previous upload session");
            self.state.send_replace(UploadSnapshot::default());
        }

        let cancel = self.cancel.rearm();
        let result = self.run_session(&file, &cancel).await;
        self.finish(result)
    }

    /// Return to `idle` from `complete` or `error`, clearing id, progress and error.
    pub fn reset(&mut self) -> Result<(), UploadError> {
        let current = self.state();
        if !current.is_terminal() {
            return Err(UploadError::InvalidTransition { from: current });
        }

        self.state.send_replace(UploadSnapshot::default());
        tracing::debug!(from = %current, "Upload session reset");
        Ok(())
    }

    async fn run_session(
        &self,
        file: &VideoFile,
        cancel: &CancellationToken,
    ) -> Result<UploadCompletion, UploadError> {
        if !self.service.has_credential() {
            return Err(UploadError::MissingCredential);
        }
        self.validator.validate(file)?;

        tracing::info!(
            file_name = %file.file_name,
            content_type = %file.content_type,
            size_bytes = file.size_bytes,
            "Starting video upload"
        );

        let mut step = Step::RequestTarget;
        loop {
            step = match step {
                Step::RequestTarget => {
                    self.transition(SessionState::RequestingUrl);
                    Step::Transfer(self.request_target(cancel).await?)
                }
                Step::Transfer(target) => {
                    self.state.send_modify(|snapshot| {
                        snapshot.state = SessionState::Uploading;
                        snapshot.upload_id = Some(target.upload_id.clone());
                        snapshot.progress_percent = 0;
                    });
                    self.transfer(&target, file, cancel).await?;
                    self.transition(SessionState::Processing);
                    Step::PollUploadRecord {
                        upload_id: target.upload_id,
                    }
                }
                Step::PollUploadRecord { upload_id } => {
                    let service = &self.service;
                    let id = upload_id.as_str();
                    let asset_id = Poller::new(PollPhase::UploadRecord, self.config.upload_poll)
                        .run(
                            cancel,
                            move || service.get_upload_status(id),
                            decide_upload_status,
                        )
                        .await?;
                    tracing::info!(upload_id = %upload_id, asset_id = %asset_id, "Asset created");
                    Step::PollAsset { asset_id }
                }
                Step::PollAsset { asset_id } => {
                    let service = &self.service;
                    let id = asset_id.as_str();
                    return Poller::new(PollPhase::Asset, self.config.asset_poll)
                        .run(
                            cancel,
                            move || service.get_asset_status(id),
                            decide_asset_status,
                        )
                        .await;
                }
            };
        }
    }

    async fn request_target(&self, cancel: &CancellationToken) -> Result<UploadTarget, UploadError> {
        let response = cancellable(cancel, self.service.create_upload_target(&self.config.origin))
            .await?
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to request upload URL");
                UploadError::UploadUrlUnavailable(format!("{:#}", e))
            })?;

        let target = response.into_target().ok_or_else(|| {
            UploadError::UploadUrlUnavailable(
                "response is missing upload_url or upload_id".to_string(),
            )
        })?;

        tracing::debug!(upload_id = %target.upload_id, "Upload target issued");
        Ok(target)
    }

    async fn transfer(
        &self,
        target: &UploadTarget,
        file: &VideoFile,
        cancel: &CancellationToken,
    ) -> Result<(), UploadError> {
        let tracker = ProgressTracker::new();
        let state = self.state.clone();
        let on_progress: ProgressFn = Arc::new(move |sent, total| {
            if let Some(percent) = tracker.record(sent, total) {
                state.send_modify(|snapshot| snapshot.progress_percent = percent);
            }
        });

        cancellable(
            cancel,
            self.service.transfer_file(&target.upload_url, file, on_progress),
        )
        .await?
        .map_err(|e| {
            tracing::warn!(upload_id = %target.upload_id, error = %e, "Direct upload failed");
            UploadError::TransferFailed(format!("{:#}", e))
        })?;

        tracing::info!(upload_id = %target.upload_id, "Direct upload finished");
        Ok(())
    }

    fn transition(&self, next: SessionState) {
        self.state.send_modify(|snapshot| snapshot.state = next);
        tracing::debug!(state = %next, "Upload session state changed");
    }

    fn finish(
        &self,
        result: Result<UploadCompletion, UploadError>,
    ) -> Result<UploadCompletion, UploadError> {
        match &result {
            Ok(completion) => {
                self.state.send_modify(|snapshot| {
                    snapshot.state = SessionState::Complete;
                    snapshot.progress_percent = 100;
                });
                tracing::info!(
                    playback_id = %completion.playback_id,
                    duration_secs = completion.duration_secs,
                    "Video ready for playback"
                );
                self.callbacks
                    .on_upload_complete(&completion.playback_id, completion.duration_secs);
            }
            Err(UploadError::Cancelled) => {
                self.state.send_replace(UploadSnapshot::default());
                tracing::info!("Upload cancelled");
            }
            Err(err) => {
                let message = err.client_message();
                self.state.send_modify(|snapshot| {
                    snapshot.state = SessionState::Error;
                    snapshot.last_error = Some(message.clone());
                    snapshot.error_code = Some(err.error_code());
                });
                match err.log_level() {
                    LogLevel::Debug => {
                        tracing::debug!(error = %err, code = err.error_code(), "Upload rejected")
                    }
                    LogLevel::Warn => {
                        tracing::warn!(error = %err, code = err.error_code(), "Upload failed")
                    }
                    LogLevel::Error => {
                        tracing::error!(error = %err, code = err.error_code(), "Upload failed")
                    }
                }
                self.callbacks.on_error(&message);
            }
        }
        result
    }
}
