use serde::{Deserialize, Serialize};

/// Request body for a single-use upload target.
#[derive(Debug, Clone, Serialize)]
pub struct UploadTargetRequest {
    /// Origin the browser-side upload would come from; the media service uses it for CORS.
    pub cors_origin: String,
}

/// Raw response of the upload-target endpoint. Both fields are optional on the wire so a
/// malformed response can be told apart from a transport failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadTargetResponse {
    #[serde(default)]
    pub upload_url: Option<String>,
    #[serde(default)]
    pub upload_id: Option<String>,
}

/// Destination URL plus correlation id issued for one direct file transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadTarget {
    pub upload_url: String,
    pub upload_id: String,
}

impl UploadTargetResponse {
    /// Returns the target only when both fields are present and non-empty.
    pub fn into_target(self) -> Option<UploadTarget> {
        let upload_url = self.upload_url.filter(|u| !u.trim().is_empty())?;
        let upload_id = self.upload_id.filter(|id| !id.trim().is_empty())?;
        Some(UploadTarget {
            upload_url,
            upload_id,
        })
    }
}

/// Status of the media service's upload record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadRecordStatus {
    Waiting,
    Created,
    AssetCreated,
    Errored,
    Cancelled,
    TimedOut,
    #[serde(other)]
    Unknown,
}

impl UploadRecordStatus {
    /// Statuses after which the record will never produce an asset.
    pub fn is_failed(&self) -> bool {
        matches!(
            self,
            UploadRecordStatus::Errored | UploadRecordStatus::Cancelled | UploadRecordStatus::TimedOut
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UploadRecordStatus::Waiting => "waiting",
            UploadRecordStatus::Created => "created",
            UploadRecordStatus::AssetCreated => "asset_created",
            UploadRecordStatus::Errored => "errored",
            UploadRecordStatus::Cancelled => "cancelled",
            UploadRecordStatus::TimedOut => "timed_out",
            UploadRecordStatus::Unknown => "unknown",
        }
    }
}

/// Response of the upload-record status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadStatusResponse {
    pub status: UploadRecordStatus,
    #[serde(default)]
    pub asset_id: Option<String>,
}
