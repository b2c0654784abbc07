//! Shared HTTP client for the course backend.
//!
//! Provides a minimal client with an explicit credential (Bearer token), generic
//! GET/POST/PATCH helpers, and domain methods (auth, profile, catalogue, teacher courses,
//! upload targets, status queries).
//! The direct file transfer to a pre-signed URL lives in [`transfer`]; it never carries
//! the backend credential.

pub mod api;
pub mod transfer;

use anyhow::{Context, Result};
use coursecast_core::ClientConfig;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Authentication strategy for the API.
#[derive(Clone, Debug)]
pub enum Auth {
    /// No credential; only login and signup work.
    Anonymous,
    /// `Authorization: Bearer {token}`
    Bearer(String),
}

/// HTTP client for the course backend with an explicit credential.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    upload_client: Client,
    base_url: String,
    auth: Auth,
}

impl ApiClient {
    pub fn new(base_url: String, auth: Auth, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        // Large transfers can run for a long time; only bound the connect phase.
        let upload_client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .context("Failed to create upload HTTP client")?;

        Ok(Self {
            client,
            upload_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// Create client from configuration. Uses Bearer auth when a token is configured.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let auth = match &config.auth_token {
            Some(token) => Auth::Bearer(token.clone()),
            None => Auth::Anonymous,
        };
        Self::new(config.api_url.clone(), auth, config.http_timeout())
    }

    /// Same client with a different credential (e.g. after login).
    pub fn with_auth(&self, auth: Auth) -> Self {
        Self {
            auth,
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.auth, Auth::Bearer(_))
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Auth::Anonymous => request,
            Auth::Bearer(token) => request.header("Authorization", format!("Bearer {}", token)),
        }
    }

    fn require_auth(&self) -> Result<()> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(anyhow::anyhow!(
                "Missing credential. Set COURSECAST_AUTH_TOKEN or log in first"
            ))
        }
    }

    /// GET request with optional query parameters. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.build_url(path);
        let mut request = self.client.get(&url);
        request = self.apply_auth(request);

        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.context("Failed to send request")?;
        Self::parse_json(response).await
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.build_url(path);
        let request = self.client.post(&url).json(body);
        let request = self.apply_auth(request);

        let response = request.send().await.context("Failed to send request")?;
        Self::parse_json(response).await
    }

    /// PATCH JSON body and deserialize response.
    pub async fn patch_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.build_url(path);
        let request = self.client.patch(&url).json(body);
        let request = self.apply_auth(request);

        let response = request.send().await.context("Failed to send request")?;
        Self::parse_json(response).await
    }

    async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let response = Self::ensure_success(response).await?;

        let body: T = response
            .json()
            .await
            .context("Failed to parse response as JSON")?;

        Ok(body)
    }

    /// Turn a non-2xx response into an error carrying status and body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "API request failed with status {}: {}",
                status,
                error_text
            ));
        }
        Ok(response)
    }
}

// Re-export domain response types for convenience.
pub use coursecast_core::models::{
    AssetStatusResponse, AuthResponse, Course, Lesson, PlatformStats, TeacherSummary,
    UploadStatusResponse, UploadTargetResponse, User,
};
pub use transfer::ProgressFn;
