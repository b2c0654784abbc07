//! Scripted media service and recording callbacks for orchestrator tests.

use anyhow::Result;
use async_trait::async_trait;
use coursecast_api_client::ProgressFn;
use coursecast_core::models::{
    AssetStatus, AssetStatusResponse, UploadRecordStatus, UploadStatusResponse,
    UploadTargetResponse, VideoFile,
};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::service::MediaService;
use crate::session::UploadCallbacks;

pub fn video(name: &str, content_type: &str, size_bytes: u64) -> VideoFile {
    VideoFile::new(format!("/tmp/{}", name), content_type, size_bytes)
}

pub fn upload_status(status: UploadRecordStatus, asset_id: Option<&str>) -> UploadStatusResponse {
    UploadStatusResponse {
        status,
        asset_id: asset_id.map(str::to_string),
    }
}

pub fn asset_status(
    status: AssetStatus,
    playback_id: Option<&str>,
    duration: Option<f64>,
) -> AssetStatusResponse {
    AssetStatusResponse {
        status,
        playback_id: playback_id.map(str::to_string),
        duration,
    }
}

/// Answers from queues. An empty upload queue answers `waiting`, an empty asset queue
/// answers `preparing`.
pub struct MockMediaService {
    credential: bool,
    target: Result<UploadTargetResponse, String>,
    transfer_error: Option<String>,
    transfer_delay: Option<Duration>,
    progress: Vec<(u64, u64)>,
    upload_statuses: Mutex<VecDeque<Result<UploadStatusResponse, String>>>,
    asset_statuses: Mutex<VecDeque<Result<AssetStatusResponse, String>>>,
    target_calls: Mutex<u32>,
    transfer_calls: Mutex<u32>,
    upload_status_calls: Mutex<Vec<String>>,
    asset_status_calls: Mutex<Vec<String>>,
}

impl MockMediaService {
    pub fn new() -> Self {
        Self {
            credential: true,
            target: Ok(UploadTargetResponse {
                upload_url: Some("https://storage.example/put/up_1".to_string()),
                upload_id: Some("up_1".to_string()),
            }),
            transfer_error: None,
            transfer_delay: None,
            progress: Vec::new(),
            upload_statuses: Mutex::new(VecDeque::new()),
            asset_statuses: Mutex::new(VecDeque::new()),
            target_calls: Mutex::new(0),
            transfer_calls: Mutex::new(0),
            upload_status_calls: Mutex::new(Vec::new()),
            asset_status_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_target(mut self, upload_url: Option<&str>, upload_id: Option<&str>) -> Self {
        self.target = Ok(UploadTargetResponse {
            upload_url: upload_url.map(str::to_string),
            upload_id: upload_id.map(str::to_string),
        });
        self
    }

    pub fn failing_target(mut self, reason: &str) -> Self {
        self.target = Err(reason.to_string());
        self
    }

    pub fn without_credential(mut self) -> Self {
        self.credential = false;
        self
    }

    /// The transfer sleeps this long after its first progress event.
    pub fn slow_transfer(mut self, delay: Duration) -> Self {
        self.transfer_delay = Some(delay);
        self
    }

    pub fn failing_transfer(mut self, reason: &str) -> Self {
        self.transfer_error = Some(reason.to_string());
        self
    }

    /// Progress events replayed by every transfer, before it finishes.
    pub fn with_progress(mut self, events: Vec<(u64, u64)>) -> Self {
        self.progress = events;
        self
    }

    pub fn push_upload_status(&self, response: UploadStatusResponse) {
        self.upload_statuses.lock().unwrap().push_back(Ok(response));
    }

    pub fn push_upload_status_error(&self, reason: &str) {
        self.upload_statuses
            .lock()
            .unwrap()
            .push_back(Err(reason.to_string()));
    }

    pub fn push_asset_status(&self, response: AssetStatusResponse) {
        self.asset_statuses.lock().unwrap().push_back(Ok(response));
    }

    pub fn push_asset_status_error(&self, reason: &str) {
        self.asset_statuses
            .lock()
            .unwrap()
            .push_back(Err(reason.to_string()));
    }

    pub fn target_calls(&self) -> u32 {
        *self.target_calls.lock().unwrap()
    }

    pub fn transfer_calls(&self) -> u32 {
        *self.transfer_calls.lock().unwrap()
    }

    pub fn upload_status_calls(&self) -> Vec<String> {
        self.upload_status_calls.lock().unwrap().clone()
    }

    pub fn asset_status_calls(&self) -> Vec<String> {
        self.asset_status_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaService for MockMediaService {
    fn has_credential(&self) -> bool {
        self.credential
    }

    async fn create_upload_target(&self, _origin: &str) -> Result<UploadTargetResponse> {
        *self.target_calls.lock().unwrap() += 1;
        self.target
            .clone()
            .map_err(|reason| anyhow::anyhow!("API request failed with status {}", reason))
    }

    async fn get_upload_status(&self, upload_id: &str) -> Result<UploadStatusResponse> {
        self.upload_status_calls
            .lock()
            .unwrap()
            .push(upload_id.to_string());
        let next = self.upload_statuses.lock().unwrap().pop_front();
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(reason)) => Err(anyhow::anyhow!(reason)),
            None => Ok(upload_status(UploadRecordStatus::Waiting, None)),
        }
    }

    async fn get_asset_status(&self, asset_id: &str) -> Result<AssetStatusResponse> {
        self.asset_status_calls
            .lock()
            .unwrap()
            .push(asset_id.to_string());
        let next = self.asset_statuses.lock().unwrap().pop_front();
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(reason)) => Err(anyhow::anyhow!(reason)),
            None => Ok(asset_status(AssetStatus::Preparing, None, None)),
        }
    }

    async fn transfer_file(
        &self,
        _upload_url: &str,
        file: &VideoFile,
        on_progress: ProgressFn,
    ) -> Result<()> {
        *self.transfer_calls.lock().unwrap() += 1;
        if let Some(reason) = &self.transfer_error {
            return Err(anyhow::anyhow!("Upload rejected by storage: {}", reason));
        }
        on_progress(0, file.size_bytes);
        if let Some(delay) = self.transfer_delay {
            tokio::time::sleep(delay).await;
        }
        for (sent, total) in &self.progress {
            on_progress(*sent, *total);
        }
        on_progress(file.size_bytes, file.size_bytes);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingCallbacks {
    completions: Mutex<Vec<(String, f64)>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingCallbacks {
    pub fn completions(&self) -> Vec<(String, f64)> {
        self.completions.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl UploadCallbacks for RecordingCallbacks {
    fn on_upload_complete(&self, playback_id: &str, duration_secs: f64) {
        self.completions
            .lock()
            .unwrap()
            .push((playback_id.to_string(), duration_secs));
    }

    fn on_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}
