use serde::{Deserialize, Serialize};
use validator::Validate;

/// Account role as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Teachers and admins may use the teacher portal.
    pub fn can_teach(self) -> bool {
        matches!(self, Role::Teacher | Role::Admin)
    }
}

/// Current user, as returned by `GET /auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub role: Role,
}

impl User {
    pub fn display_name(&self) -> &str {
        self.first_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.email)
    }
}

/// Token returned by login and signup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(rename = "authToken")]
    pub auth_token: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(max = 100, message = "First name must be at most 100 characters"))]
    pub first_name: String,
    #[validate(length(max = 100, message = "Last name must be at most 100 characters"))]
    pub last_name: String,
    pub role: Role,
}

/// Profile fields to change. Unset fields are left untouched by the backend.
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "First name must be at most 100 characters"))]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "Last name must be at most 100 characters"))]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(url(message = "Avatar must be a valid URL"))]
    pub avatar_url: Option<String>,
}

impl UpdateProfileRequest {
    /// Build a request from raw input, treating blank values as unset.
    pub fn from_input(
        first_name: Option<String>,
        last_name: Option<String>,
        avatar_url: Option<String>,
    ) -> Self {
        fn non_blank(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            first_name: non_blank(first_name),
            last_name: non_blank(last_name),
            avatar_url: non_blank(avatar_url),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.avatar_url.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_access() {
        assert!(Role::Teacher.can_teach());
        assert!(Role::Admin.can_teach());
        assert!(!Role::Student.can_teach());
        assert!(!Role::Unknown.can_teach());
    }

    #[test]
    fn test_user_parsing_and_display_name() {
        let user: User = serde_json::from_str(
            r#"{"id":7,"email":"ada@example.com","first_name":"Ada","role":"teacher"}"#,
        )
        .unwrap();
        assert_eq!(user.role, Role::Teacher);
        assert_eq!(user.display_name(), "Ada");

        let user: User =
            serde_json::from_str(r#"{"id":8,"email":"bo@example.com","role":"owner"}"#).unwrap();
        assert_eq!(user.role, Role::Unknown);
        assert_eq!(user.display_name(), "bo@example.com");
    }

    #[test]
    fn test_signup_validation() {
        let request = SignupRequest {
            email: "not-an-email".to_string(),
            password: "123".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            role: Role::Student,
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));

        let ok = SignupRequest {
            email: "ada@example.com".to_string(),
            password: "secret1".to_string(),
            ..request
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_update_profile_drops_blank_fields() {
        let request = UpdateProfileRequest::from_input(
            Some(" Ada ".to_string()),
            Some("   ".to_string()),
            None,
        );
        assert_eq!(request.first_name.as_deref(), Some("Ada"));
        assert!(request.last_name.is_none());
        assert!(!request.is_empty());
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"first_name": "Ada"})
        );
        assert!(UpdateProfileRequest::from_input(None, Some(String::new()), None).is_empty());
    }

    #[test]
    fn test_update_profile_rejects_bad_avatar_url() {
        let request = UpdateProfileRequest {
            avatar_url: Some("not a url".to_string()),
            ..Default::default()
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("avatar_url"));
    }
}
