use coursecast_api_client::api::TeacherPortal;
use coursecast_core::models::{Course, Role, SessionState, User};
use coursecast_core::{ErrorMetadata, UploadError};
use coursecast_upload::{UploadCallbacks, UploadSnapshot};

/// How account and course listings are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

/// Roles an account can be created with from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SignupRole {
    Student,
    Teacher,
}

impl From<SignupRole> for Role {
    fn from(role: SignupRole) -> Self {
        match role {
            SignupRole::Student => Role::Student,
            SignupRole::Teacher => Role::Teacher,
        }
    }
}

/// One line describing what changed between two snapshots, if anything worth showing.
pub fn describe_change(previous: &UploadSnapshot, current: &UploadSnapshot) -> Option<String> {
    if current.state != previous.state {
        return Some(match (current.state, &current.last_error) {
            (SessionState::Error, Some(message)) => format!("error: {}", message),
            (SessionState::Uploading, _) => format!(
                "uploading (upload id {})",
                current.upload_id.as_deref().unwrap_or("-")
            ),
            (state, _) => state.to_string(),
        });
    }

    if current.state == SessionState::Uploading
        && current.progress_percent != previous.progress_percent
    {
        return Some(format!("uploaded {}%", current.progress_percent));
    }

    None
}

/// Message for a failed upload: what went wrong, then what to do about it.
pub fn describe_failure(err: &UploadError) -> String {
    let mut message = format!("{} ({})", err.client_message(), err.error_code());
    if let Some(action) = err.suggested_action() {
        message.push_str(&format!(". {}", action));
    }
    if err.is_recoverable() {
        message.push_str(". Run the upload again to retry");
    }
    message
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

fn count(value: Option<u32>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

pub fn render_user(user: &User) -> String {
    let full_name = [user.first_name.as_deref(), user.last_name.as_deref()]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let mut out = format!("\n=== {} ===\n\n", user.display_name());
    out.push_str(&format!("{:<8} {}\n", "ID", user.id));
    out.push_str(&format!("{:<8} {}\n", "Email", user.email));
    if !full_name.is_empty() {
        out.push_str(&format!("{:<8} {}\n", "Name", full_name));
    }
    out.push_str(&format!("{:<8} {:?}\n", "Role", user.role));
    out
}

/// Course rows under a heading, one line per course.
pub fn render_courses(heading: &str, courses: &[Course]) -> String {
    let mut out = format!("\n=== {} ===\n\n", heading);
    if courses.is_empty() {
        out.push_str("No courses found.\n");
        return out;
    }

    out.push_str(&format!(
        "{:<8} {:<40} {:<8} {:<8} {:<8} {:<8}\n",
        "ID", "Title", "Tier", "Modules", "Lessons", "Featured"
    ));
    out.push_str(&format!("{}\n", "-".repeat(85)));
    for course in courses {
        out.push_str(&format!(
            "{:<8} {:<40} {:<8} {:<8} {:<8} {:<8}\n",
            course.id,
            truncate(&course.title, 40),
            course.tier_label(),
            count(course.module_count),
            count(course.lesson_count),
            if course.featured { "yes" } else { "" },
        ));
    }
    out
}

pub fn render_portal(portal: &TeacherPortal) -> String {
    let mut out = render_courses(
        &format!("Courses of {}", portal.user.display_name()),
        &portal.courses,
    );
    out.push_str(&format!(
        "\nTotal: {} courses, {} modules, {} lessons\n",
        portal.summary.total_courses, portal.summary.total_modules, portal.summary.total_lessons
    ));
    out
}

/// Outcome callbacks that write to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogCallbacks;

impl UploadCallbacks for LogCallbacks {
    fn on_upload_complete(&self, playback_id: &str, duration_secs: f64) {
        tracing::info!(playback_id = %playback_id, duration_secs, "Lesson video is ready");
    }

    fn on_error(&self, message: &str) {
        tracing::error!(message = %message, "Lesson video upload failed");
    }
}


/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
