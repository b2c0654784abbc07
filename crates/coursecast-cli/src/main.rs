//! Coursecast CLI: command-line client for the course backend.
//!
//! Set COURSECAST_API_URL (or API_URL) and COURSECAST_AUTH_TOKEN (or AUTH_TOKEN).
//! `login` and `signup` print a token to export as COURSECAST_AUTH_TOKEN.

use anyhow::Context;
use clap::{Parser, Subcommand};
use coursecast_api_client::ApiClient;
use coursecast_cli::{
    describe_change, describe_failure, init_tracing, render_courses, render_portal, render_user,
    LogCallbacks, OutputFormat, SignupRole,
};
use coursecast_core::models::{SignupRequest, UpdateProfileRequest, VideoFile};
use coursecast_core::ClientConfig;
use coursecast_upload::{UploadConfig, UploadOrchestrator, UploadSnapshot};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "coursecast", about = "Coursecast course platform CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a lesson video and wait until it is ready for playback
    Upload {
        /// Path to the video file
        file: PathBuf,
        /// Media type to send instead of the one derived from the extension
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Log in and print an auth token
    Login {
        email: String,
        #[arg(long, env = "COURSECAST_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and print an auth token
    Signup {
        email: String,
        #[arg(long, env = "COURSECAST_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long, value_enum, default_value = "student")]
        role: SignupRole,
    },
    /// Show the account the token belongs to
    Me {
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
    /// Change first name, last name or avatar of the current account
    UpdateProfile {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        avatar_url: Option<String>,
    },
    /// Teacher portal: owned courses with module and lesson totals
    Courses {
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
    /// Courses highlighted on the landing page
    Featured {
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
    /// Catalogue totals
    Stats,
    /// Look up a lesson by slug
    Lesson { slug: String },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

async fn upload(
    client: ApiClient,
    config: &ClientConfig,
    file: PathBuf,
    content_type: Option<String>,
) -> anyhow::Result<()> {
    let file = VideoFile::from_path(&file, content_type.as_deref())?;
    let mut orchestrator = UploadOrchestrator::new(
        client,
        Arc::new(LogCallbacks),
        UploadConfig::from(config),
    );

    let mut updates = orchestrator.subscribe();
    let reporter = tokio::spawn(async move {
        let mut previous = UploadSnapshot::default();
        while updates.changed().await.is_ok() {
            let current = updates.borrow_and_update().clone();
            if let Some(line) = describe_change(&previous, &current) {
                tracing::info!("{}", line);
            }
            previous = current;
        }
    });

    let cancel = orchestrator.cancel_handle();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling upload");
            cancel.cancel();
        }
    });

    let result = orchestrator.select_file(file).await;
    interrupt.abort();
    // Dropping the orchestrator closes the snapshot channel and ends the reporter.
    drop(orchestrator);
    let _ = reporter.await;

    let completion = result.map_err(|e| anyhow::anyhow!(describe_failure(&e)))?;
    print_json(&completion)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ClientConfig::from_env().context("Invalid configuration")?;
    let client = ApiClient::from_config(&config).context(
        "Failed to create API client. Set COURSECAST_API_URL (or API_URL)",
    )?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Upload { file, content_type } => {
            upload(client, &config, file, content_type).await?;
        }
        Commands::Login { email, password } => {
            let response = client.login(&email, &password).await?;
            print_json(&response)?;
        }
        Commands::Signup {
            email,
            password,
            first_name,
            last_name,
            role,
        } => {
            let request = SignupRequest {
                email: email.trim().to_string(),
                password,
                first_name,
                last_name,
                role: role.into(),
            };
            let response = client.signup(&request).await?;
            print_json(&response)?;
        }
        Commands::Me { format } => {
            let user = client.me().await?;
            match format {
                OutputFormat::Json => print_json(&user)?,
                OutputFormat::Table => print!("{}", render_user(&user)),
            }
        }
        Commands::UpdateProfile {
            first_name,
            last_name,
            avatar_url,
        } => {
            let request = UpdateProfileRequest::from_input(first_name, last_name, avatar_url);
            let user = client.update_profile(&request).await?;
            print_json(&user)?;
        }
        Commands::Courses { format } => {
            let portal = client.teacher_portal().await?;
            match format {
                OutputFormat::Json => print_json(&portal)?,
                OutputFormat::Table => print!("{}", render_portal(&portal)),
            }
        }
        Commands::Featured { format } => {
            let courses = client.featured_courses().await?;
            match format {
                OutputFormat::Json => print_json(&courses)?,
                OutputFormat::Table => print!("{}", render_courses("Featured courses", &courses)),
            }
        }
        Commands::Stats => {
            let stats = client.platform_stats().await?;
            print_json(&stats)?;
        }
        Commands::Lesson { slug } => {
            let lesson = client
                .get_lesson_by_slug(&slug)
                .await
                .with_context(|| format!("Failed to load lesson '{}'", slug))?;
            if !lesson.has_video() {
                tracing::warn!(slug = %lesson.slug, "Lesson has no playable video yet");
            }
            print_json(&lesson)?;
        }
    }

    Ok(())
}
