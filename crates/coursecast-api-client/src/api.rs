//! Domain methods for the course backend client.
//!
//! Response types are re-exported from `coursecast_core::models`.

use crate::ApiClient;
use anyhow::{Context, Result};
use coursecast_core::models::{
    AssetStatusResponse, AuthResponse, Course, Lesson, LoginRequest, PlatformStats, Role,
    SignupRequest, TeacherSummary, UpdateProfileRequest, UploadStatusResponse,
    UploadTargetRequest, UploadTargetResponse, User,
};
use validator::Validate;

/// Teacher portal data: the courses plus their totals.
#[derive(Debug, serde::Serialize)]
pub struct TeacherPortal {
    pub user: User,
    pub summary: TeacherSummary,
    pub courses: Vec<Course>,
}

impl ApiClient {
    /// Exchange email and password for an auth token.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        request
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid input: {}", e))?;

        self.post_json("/auth/login", &request).await
    }

    /// Create an account and return its auth token.
    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse> {
        request
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid input: {}", e))?;
        if !matches!(request.role, Role::Student | Role::Teacher) {
            return Err(anyhow::anyhow!(
                "Invalid input: role must be student or teacher"
            ));
        }

        self.post_json("/auth/signup", request).await
    }

    /// Get the user the credential belongs to.
    pub async fn me(&self) -> Result<User> {
        self.require_auth()?;
        self.get("/auth/me", &[]).await
    }

    /// Change profile fields of the current user and return the updated user.
    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> Result<User> {
        self.require_auth()?;
        request
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid input: {}", e))?;
        if request.is_empty() {
            return Err(anyhow::anyhow!("Invalid input: nothing to update"));
        }

        self.patch_json("/auth/me", request).await
    }

    /// Look up a lesson by its slug.
    pub async fn get_lesson_by_slug(&self, slug: &str) -> Result<Lesson> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Err(anyhow::anyhow!("Invalid input: lesson slug is required"));
        }
        self.get(&format!("/lessons/{}", urlencoding::encode(slug)), &[])
            .await
    }

    /// Courses highlighted on the landing page.
    pub async fn featured_courses(&self) -> Result<Vec<Course>> {
        self.get("/courses/featured", &[]).await
    }

    /// Catalogue totals.
    pub async fn platform_stats(&self) -> Result<PlatformStats> {
        self.get("/stats", &[]).await
    }

    /// List the courses owned by the current teacher.
    pub async fn teacher_courses(&self) -> Result<Vec<Course>> {
        self.require_auth()?;
        self.get("/teacher/courses", &[]).await
    }

    /// Load the teacher portal. Refused for accounts that are not teacher or admin.
    pub async fn teacher_portal(&self) -> Result<TeacherPortal> {
        let user = self.me().await.context("Failed to load current user")?;
        if !user.role.can_teach() {
            return Err(anyhow::anyhow!(
                "Forbidden: the teacher portal requires a teacher or admin account"
            ));
        }

        let courses = self
            .teacher_courses()
            .await
            .context("Failed to load teacher courses")?;
        let summary = TeacherSummary::from_courses(&courses);

        Ok(TeacherPortal {
            user,
            summary,
            courses,
        })
    }

    /// Request a single-use upload target for a direct transfer.
    pub async fn create_upload_target(&self, origin: &str) -> Result<UploadTargetResponse> {
        self.require_auth()?;
        let body = UploadTargetRequest {
            cors_origin: origin.to_string(),
        };
        self.post_json("/mux/upload_url", &body).await
    }

    /// Status of an upload record.
    pub async fn get_upload_status(&self, upload_id: &str) -> Result<UploadStatusResponse> {
        self.require_auth()?;
        self.get(
            &format!("/mux/upload/{}", urlencoding::encode(upload_id)),
            &[],
        )
        .await
    }

    /// Transcode status of a media asset.
    pub async fn get_asset_status(&self, asset_id: &str) -> Result<AssetStatusResponse> {
        self.require_auth()?;
        self.get(&format!("/mux/asset/{}", urlencoding::encode(asset_id)), &[])
            .await
    }
}
