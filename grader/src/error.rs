//! Grader Error Types
//!
//! This module defines [`GraderError`], the error type for the grading pipeline.
//! Only conditions that make grading impossible to attempt are errors here:
//! a repository that cannot be fetched, a dependency install that fails, or a
//! working directory that cannot be allocated. Everything downstream of those
//! phases (test execution, registry lookups, AI review) degrades into a value
//! rather than an error, so the fatal/non-fatal distinction is visible in the
//! type signatures instead of prose.

use thiserror::Error;

/// A pipeline-fatal grading failure. Any of these aborts the pipeline and
/// moves the submission to `failed`.
#[derive(Debug, Error)]
pub enum GraderError {
    /// The repository could not be cloned (unreachable, private, nonexistent).
    #[error("repository fetch failed: {0}")]
    FetchFailed(String),

    /// Dependency installation failed; carries the raw process output.
    #[error("dependency installation failed: {0}")]
    InstallFailed(String),

    /// The submission's working directory could not be created.
    #[error("working directory error: {0}")]
    Workspace(String),
}
