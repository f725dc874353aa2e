//! Command-line entry point: grades a single repository submission.
//!
//! Usage: `grade <repository-url> <project-type> [submitter-id]`
//!
//! This is the composition root: it loads the environment-backed
//! configuration, initializes logging, wires the production strategies, and
//! prints the grading result as JSON. Server deployments embed
//! [`grader::GradingJob`] directly instead.

use common::config::AppConfig;
use common::logger::init_logger;
use grader::GradingJob;
use grader::config::{PipelineConfig, ReviewerConfig};
use grader::types::{ProjectType, Submission, is_github_repository_url};
use std::process::ExitCode;

fn parse_project_type(raw: &str) -> Option<ProjectType> {
    serde_json::from_value(serde_json::Value::String(raw.to_lowercase())).ok()
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = AppConfig::global().clone();
    init_logger(&config.log_level, &config.log_file, config.log_to_stdout);

    let args: Vec<String> = std::env::args().collect();
    let (url, project_type) = match (args.get(1), args.get(2)) {
        (Some(url), Some(raw)) => match parse_project_type(raw) {
            Some(project_type) => (url.clone(), project_type),
            None => {
                eprintln!("unknown project type '{}'", raw);
                return ExitCode::FAILURE;
            }
        },
        _ => {
            eprintln!("usage: grade <repository-url> <project-type> [submitter-id]");
            return ExitCode::FAILURE;
        }
    };

    if !is_github_repository_url(&url) {
        eprintln!("'{}' is not a GitHub repository URL", url);
        return ExitCode::FAILURE;
    }

    let submitter = args.get(3).cloned().unwrap_or_else(|| "cli".to_string());
    let mut submission = Submission::new(
        format!("cli-{}", chrono::Utc::now().timestamp_millis()),
        url,
        submitter,
        project_type,
    );

    let job = GradingJob::new(
        &config.grading_storage_root,
        &config.npm_registry_url,
        PipelineConfig::default(),
        ReviewerConfig::from_env(),
    );

    match job.grade(&mut submission).await {
        Ok(result) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&result).expect("result serializes")
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("grading failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
