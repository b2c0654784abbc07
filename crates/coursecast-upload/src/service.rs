//! Remote operations the orchestrator depends on.

use anyhow::Result;
use async_trait::async_trait;
use coursecast_api_client::{ApiClient, ProgressFn};
use coursecast_core::models::{
    AssetStatusResponse, UploadStatusResponse, UploadTargetResponse, VideoFile,
};
use std::sync::Arc;

/// The three backend calls of the upload workflow plus the direct transfer.
///
/// The credential is part of the implementor (e.g. [`ApiClient`] carries its `Auth`),
/// so the orchestrator never reaches for ambient session state.
#[async_trait]
pub trait MediaService: Send + Sync {
    /// Whether calls will carry a credential. A session without one never starts.
    fn has_credential(&self) -> bool {
        true
    }

    /// Request a single-use upload URL and its correlation id.
    async fn create_upload_target(&self, origin: &str) -> Result<UploadTargetResponse>;

    /// Status of the upload record, with the asset id once one exists.
    async fn get_upload_status(&self, upload_id: &str) -> Result<UploadStatusResponse>;

    /// Transcode status of the asset, with playback id and duration once ready.
    async fn get_asset_status(&self, asset_id: &str) -> Result<AssetStatusResponse>;

    /// PUT the file to `upload_url`. Any non-2xx status is an error.
    async fn transfer_file(
        &self,
        upload_url: &str,
        file: &VideoFile,
        on_progress: ProgressFn,
    ) -> Result<()>;
}

#[async_trait]
impl MediaService for ApiClient {
    fn has_credential(&self) -> bool {
        self.is_authenticated()
    }

    async fn create_upload_target(&self, origin: &str) -> Result<UploadTargetResponse> {
        ApiClient::create_upload_target(self, origin).await
    }

    async fn get_upload_status(&self, upload_id: &str) -> Result<UploadStatusResponse> {
        ApiClient::get_upload_status(self, upload_id).await
    }

    async fn get_asset_status(&self, asset_id: &str) -> Result<AssetStatusResponse> {
        ApiClient::get_asset_status(self, asset_id).await
    }

    async fn transfer_file(
        &self,
        upload_url: &str,
        file: &VideoFile,
        on_progress: ProgressFn,
    ) -> Result<()> {
        self.put_file(upload_url, file, on_progress).await
    }
}

#[async_trait]
impl<T: MediaService + ?Sized> MediaService for Arc<T> {
    fn has_credential(&self) -> bool {
        (**self).has_credential()
    }

    async fn create_upload_target(&self, origin: &str) -> Result<UploadTargetResponse> {
        (**self).create_upload_target(origin).await
    }

    async fn get_upload_status(&self, upload_id: &str) -> Result<UploadStatusResponse> {
        (**self).get_upload_status(upload_id).await
    }

    async fn get_asset_status(&self, asset_id: &str) -> Result<AssetStatusResponse> {
        (**self).get_asset_status(asset_id).await
    }

    async fn transfer_file(
        &self,
        upload_url: &str,
        file: &VideoFile,
        on_progress: ProgressFn,
    ) -> Result<()> {
        (**self).transfer_file(upload_url, file, on_progress).await
    }
}
