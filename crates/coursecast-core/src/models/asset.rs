use serde::{Deserialize, Serialize};

/// Transcode status of a media asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    Preparing,
    Ready,
    Errored,
    #[serde(other)]
    Unknown,
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Preparing => "preparing",
            AssetStatus::Ready => "ready",
            AssetStatus::Errored => "errored",
            AssetStatus::Unknown => "unknown",
        }
    }
}

/// Response of the asset status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetStatusResponse {
    pub status: AssetStatus,
    #[serde(default)]
    pub playback_id: Option<String>,
    /// Duration in seconds, present once the asset is ready.
    #[serde(default)]
    pub duration: Option<f64>,
}

/// Playback identifiers reported when a session completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadCompletion {
    pub playback_id: String,
    pub duration_secs: f64,
}

impl UploadCompletion {
    /// Builds a completion from a ready asset.
    ///
    /// Returns `None` when the playback id is missing or blank. A missing, negative or
    /// non-finite duration becomes zero.
    pub fn from_ready_asset(asset: &AssetStatusResponse) -> Option<Self> {
        let playback_id = asset
            .playback_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())?;
        let duration_secs = asset
            .duration
            .filter(|d| d.is_finite() && *d > 0.0)
            .unwrap_or(0.0);
        Some(Self {
            playback_id: playback_id.to_string(),
            duration_secs,
        })
    }
}
