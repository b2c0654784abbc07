//! Configuration module
//!
//! This module provides the client configuration: backend location, credential,
//! request timeouts and the upload polling cadence.

use std::env;
use std::time::Duration;

use crate::validation::DEFAULT_MAX_FILE_SIZE_BYTES;

// Common constants
const DEFAULT_API_URL: &str = "http://localhost:3000";
const DEFAULT_ORIGIN: &str = "http://localhost:3000";
const HTTP_TIMEOUT_SECS: u64 = 60;
const UPLOAD_POLL_INTERVAL_SECS: u64 = 5;
const UPLOAD_STATUS_MAX_ATTEMPTS: u32 = 30;
const ASSET_STATUS_MAX_ATTEMPTS: u32 = 60;

/// Fixed-cadence polling: query once, then every `interval`, at most `max_attempts` queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Upload-record polling: 30 attempts, 5 seconds apart.
    pub fn upload_record() -> Self {
        Self::new(
            Duration::from_secs(UPLOAD_POLL_INTERVAL_SECS),
            UPLOAD_STATUS_MAX_ATTEMPTS,
        )
    }

    /// Asset polling: 60 attempts, 5 seconds apart.
    pub fn asset() -> Self {
        Self::new(
            Duration::from_secs(UPLOAD_POLL_INTERVAL_SECS),
            ASSET_STATUS_MAX_ATTEMPTS,
        )
    }
}

/// Client configuration.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_url: String,
    pub auth_token: Option<String>,
    pub origin: String,
    pub http_timeout_secs: u64,
    pub max_file_size_bytes: u64,
    pub upload_poll: PollPolicy,
    pub asset_poll: PollPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            auth_token: None,
            origin: DEFAULT_ORIGIN.to_string(),
            http_timeout_secs: HTTP_TIMEOUT_SECS,
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
            upload_poll: PollPolicy::upload_record(),
            asset_poll: PollPolicy::asset(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source. `from_env` uses the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let api_url = get("COURSECAST_API_URL")
            .or_else(|| get("API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let auth_token = get("COURSECAST_AUTH_TOKEN").or_else(|| get("AUTH_TOKEN"));

        let origin = get("COURSECAST_ORIGIN").unwrap_or_else(|| DEFAULT_ORIGIN.to_string());

        let http_timeout_secs = get("HTTP_TIMEOUT_SECS")
            .map(|s| {
                s.parse::<u64>()
                    .map_err(|_| anyhow::anyhow!("HTTP_TIMEOUT_SECS must be a valid number"))
            })
            .transpose()?
            .unwrap_or(HTTP_TIMEOUT_SECS);

        let max_file_size_bytes = get("UPLOAD_MAX_FILE_SIZE_BYTES")
            .map(|s| {
                s.parse::<u64>().map_err(|_| {
                    anyhow::anyhow!("UPLOAD_MAX_FILE_SIZE_BYTES must be a valid number")
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_MAX_FILE_SIZE_BYTES);

        let interval_secs = get("UPLOAD_POLL_INTERVAL_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(UPLOAD_POLL_INTERVAL_SECS);
        let interval = Duration::from_secs(interval_secs);

        let upload_attempts = get("UPLOAD_STATUS_MAX_ATTEMPTS")
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(UPLOAD_STATUS_MAX_ATTEMPTS);

        let asset_attempts = get("ASSET_STATUS_MAX_ATTEMPTS")
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(ASSET_STATUS_MAX_ATTEMPTS);

        let config = Self {
            api_url,
            auth_token,
            origin,
            http_timeout_secs,
            max_file_size_bytes,
            upload_poll: PollPolicy::new(interval, upload_attempts),
            asset_poll: PollPolicy::new(interval, asset_attempts),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "COURSECAST_API_URL must start with http:// or https://"
            ));
        }

        if self.http_timeout_secs == 0 {
            return Err(anyhow::anyhow!("HTTP_TIMEOUT_SECS must be greater than 0"));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!(
                "UPLOAD_MAX_FILE_SIZE_BYTES must be greater than 0"
            ));
        }

        if self.upload_poll.interval.is_zero() || self.asset_poll.interval.is_zero() {
            return Err(anyhow::anyhow!(
                "UPLOAD_POLL_INTERVAL_SECS must be greater than 0"
            ));
        }

        if self.upload_poll.max_attempts == 0 || self.asset_poll.max_attempts == 0 {
            return Err(anyhow::anyhow!(
                "UPLOAD_STATUS_MAX_ATTEMPTS and ASSET_STATUS_MAX_ATTEMPTS must be greater than 0"
            ));
        }

        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
