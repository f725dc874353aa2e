//! # Types Module
//!
//! Core data structures shared across the grading pipeline: the [`Submission`]
//! record itself, its status/grade enums, the closed [`ProjectType`] tag that
//! selects a pipeline branch, and the transient [`TestResult`] and
//! [`QualityAnalysis`] values produced mid-pipeline.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// The kind of project being graded. Determines which pipeline phases run
/// and how the final score is composed.
///
/// Serialized in `lowercase` for config/record JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Express,
    React,
    Fullstack,
    /// C/C++ projects are reviewed without execution.
    C,
}

impl ProjectType {
    /// Whether this project type declares an executable dependency manifest
    /// that must be installed before tests can run.
    pub fn runs_install(self) -> bool {
        self.is_executable()
    }

    /// Whether this project type's test suite is executed. Non-executable
    /// types skip straight to review.
    pub fn runs_tests(self) -> bool {
        self.is_executable()
    }

    /// JS/TS project types are executable; compiled ones are review-only.
    pub fn is_executable(self) -> bool {
        !matches!(self, ProjectType::C)
    }
}

/// Pipeline phase of a submission. Strictly forward-moving; `Completed` and
/// `Failed` are terminal and mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Uploading,
    Installing,
    Testing,
    Reviewing,
    Reporting,
    Completed,
    Failed,
}

impl SubmissionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SubmissionStatus::Completed | SubmissionStatus::Failed)
    }

    /// Stable lowercase name, matching the serialized form. Used for logging
    /// and notification events.
    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::Uploading => "uploading",
            SubmissionStatus::Installing => "installing",
            SubmissionStatus::Testing => "testing",
            SubmissionStatus::Reviewing => "reviewing",
            SubmissionStatus::Reporting => "reporting",
            SubmissionStatus::Completed => "completed",
            SubmissionStatus::Failed => "failed",
        }
    }
}

/// Final pass/fail outcome. `Pending` until the submission reaches a
/// terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Pass,
    Fail,
    Pending,
}

/// One row of the per-category score breakdown shown to the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub category: String,
    pub score: f64,
    pub max_score: f64,
    /// Human-readable explanation for this category's score, including why a
    /// degraded phase scored low.
    pub feedback: String,
}

/// The numeric outcome of a completed grading run. All scores are 0-100.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scores {
    pub total: f64,
    /// 0 for project types whose test phase is skipped.
    pub test_score: f64,
    pub quality_score: f64,
    pub breakdown: Vec<ScoreBreakdown>,
}

/// One grading request and its accumulated state. Created by the API layer;
/// mutated exclusively by the grading orchestrator as the pipeline advances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    /// Opaque unique id, assigned at creation.
    pub id: String,
    pub repository_url: String,
    pub submitter_id: String,
    pub project_type: ProjectType,
    /// Optional free-form marking criteria embedded into the review prompt.
    pub rubric: Option<String>,
    /// Optional glob patterns overriding the default file-selection set.
    pub file_selectors: Option<Vec<String>>,
    pub status: SubmissionStatus,
    pub grade: Grade,
    /// Present if and only if `status` is `Completed`.
    pub scores: Option<Scores>,
    /// Markdown report; present if and only if `status` is `Completed`.
    pub report: Option<String>,
    /// Present if and only if `status` is `Failed`.
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Updated on every status transition.
    pub updated_at: DateTime<Utc>,
}

impl Submission {
    /// Creates a fresh submission in its initial state (`uploading`, grade
    /// `pending`). The caller is responsible for having validated
    /// `repository_url` (see [`is_github_repository_url`]).
    pub fn new(
        id: impl Into<String>,
        repository_url: impl Into<String>,
        submitter_id: impl Into<String>,
        project_type: ProjectType,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            repository_url: repository_url.into(),
            submitter_id: submitter_id.into(),
            project_type,
            rubric: None,
            file_selectors: None,
            status: SubmissionStatus::Uploading,
            grade: Grade::Pending,
            scores: None,
            report: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Result of one test-suite execution. Never constructed from a raised
/// error: a test command that could not run at all yields zero counts with a
/// diagnostic in `details`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub passed: u32,
    pub total: u32,
    /// Raw runner output (or a diagnostic when the command did not execute).
    pub details: String,
}

/// The LLM-derived quality review. Always produced, even when the model call
/// fails; in that case the scores are zero and `report` explains why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityAnalysis {
    /// 0-100, clamped at parse time.
    pub code_quality_score: f64,
    /// Only present for non-executable (review-only) project types.
    pub code_smell_score: Option<f64>,
    /// The model's own estimate of test quality; only consulted when the
    /// measured test run produced no counts.
    pub test_score: Option<f64>,
    /// Markdown report.
    pub report: String,
}

static GITHUB_URL: OnceLock<Regex> = OnceLock::new();

/// Returns true if `url` looks like a GitHub repository URL
/// (`https://github.com/<owner>/<repo>`, optional `.git` suffix).
pub fn is_github_repository_url(url: &str) -> bool {
    let re = GITHUB_URL.get_or_init(|| {
        Regex::new(r"^https://github\.com/[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+?(\.git)?/?$")
            .expect("invalid GitHub URL regex")
    });
    re.is_match(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn github_url_validation() {
        assert!(is_github_repository_url("https://github.com/octocat/hello-world"));
        assert!(is_github_repository_url("https://github.com/octocat/hello-world.git"));
        assert!(is_github_repository_url("https://github.com/org-name/repo_name/"));
        assert!(!is_github_repository_url("https://gitlab.com/octocat/hello-world"));
        assert!(!is_github_repository_url("https://github.com/octocat"));
        assert!(!is_github_repository_url("git@github.com:octocat/hello-world.git"));
        assert!(!is_github_repository_url("https://github.com/a/b/c"));
    }

    #[test]
    fn project_type_dispatch() {
        assert!(ProjectType::Express.runs_install());
        assert!(ProjectType::Express.runs_tests());
        assert!(ProjectType::Fullstack.is_executable());
        assert!(!ProjectType::C.runs_install());
        assert!(!ProjectType::C.runs_tests());
        assert!(!ProjectType::C.is_executable());
    }

    #[test]
    fn new_submission_starts_pending() {
        let s = Submission::new("s1", "https://github.com/a/b", "u1", ProjectType::Express);
        assert_eq!(s.status, SubmissionStatus::Uploading);
        assert_eq!(s.grade, Grade::Pending);
        assert!(s.scores.is_none());
        assert!(s.report.is_none());
        assert!(s.error.is_none());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&SubmissionStatus::Reviewing).unwrap();
        assert_eq!(json, "\"reviewing\"");
        assert_eq!(SubmissionStatus::Reviewing.as_str(), "reviewing");
    }
}
