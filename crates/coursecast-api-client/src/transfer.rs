//! Direct file transfer to a pre-signed upload URL.

use anyhow::{Context, Result};
use coursecast_core::models::VideoFile;
use futures::StreamExt;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use crate::ApiClient;

/// Read size per streamed chunk; each chunk produces one progress event.
const CHUNK_SIZE: usize = 256 * 1024;

/// Progress callback: `(bytes_sent, total_bytes)`.
pub type ProgressFn = Arc<dyn Fn(u64, u64) + Send + Sync>;

impl ApiClient {
    /// PUT the raw file bytes to `upload_url` with the file's media type as content type.
    ///
    /// The backend credential is not sent; the URL itself authorizes the upload.
    /// `on_progress` is called once before the first byte and after every chunk handed to
    /// the connection. Any non-2xx status is an error.
    pub async fn put_file(
        &self,
        upload_url: &str,
        file: &VideoFile,
        on_progress: ProgressFn,
    ) -> Result<()> {
        let handle = tokio::fs::File::open(&file.path)
            .await
            .with_context(|| format!("Failed to open file: {}", file.path.display()))?;

        let total = file.size_bytes;
        on_progress(0, total);

        let mut sent: u64 = 0;
        let progress = on_progress.clone();
        let stream = ReaderStream::with_capacity(handle, CHUNK_SIZE).map(move |chunk| {
            if let Ok(bytes) = &chunk {
                sent += bytes.len() as u64;
                progress(sent, total);
            }
            chunk
        });

        tracing::debug!(
            file_name = %file.file_name,
            content_type = %file.content_type,
            size_bytes = total,
            "Starting direct upload"
        );

        let response = self
            .upload_client
            .put(upload_url)
            .header(CONTENT_TYPE, file.content_type.as_str())
            .header(CONTENT_LENGTH, total)
            .body(reqwest::Body::wrap_stream(stream))
            .send()
            .await
            .context("Failed to upload file")?;

        Self::ensure_success(response)
            .await
            .context("Upload rejected by storage")?;

        on_progress(total, total);
        Ok(())
    }
}
