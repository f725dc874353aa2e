//! # Grader Library
//!
//! Core logic for automated grading of submitted GitHub repositories. Given
//! a [`Submission`], the pipeline clones the repository into an isolated
//! working directory, installs dependencies, executes the test suite,
//! samples source files, asks an LLM for a quality review, and composes a
//! weighted final grade, guaranteeing working-directory cleanup on every
//! exit path.
//!
//! ## Key Concepts
//! - **GradingJob**: The configured pipeline; one `grade` call per submission.
//! - **Strategies**: Fetcher, installer, test runner, and reviewer are
//!   pluggable traits so any phase can be substituted (notably a fake
//!   reviewer in tests).
//! - **Fatal vs. degraded**: only repository fetch and dependency install
//!   abort a run. Test execution, registry lookups, and the AI review always
//!   degrade into explainable low scores instead of failing the submission.

pub mod collector;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod installer;
mod process;
pub mod registry;
pub mod report;
pub mod reviewer;
pub mod scorer;
pub mod test_runner;
pub mod traits;
pub mod types;
pub mod workspace;

use crate::config::{PipelineConfig, ReviewerConfig};
use crate::error::GraderError;
use crate::fetcher::GitFetcher;
use crate::installer::NpmInstaller;
use crate::registry::RegistryResolver;
use crate::report::GradingResult;
use crate::reviewer::LlmReviewer;
use crate::test_runner::NpmTestRunner;
use crate::traits::{Fetcher, Installer, NotificationChannel, NullChannel, ReviewInput, Reviewer, TestRunner};
use crate::types::{Grade, Submission, SubmissionStatus};
use crate::workspace::Workspace;

use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// A configured grading pipeline.
///
/// Construction wires the production strategies (git, npm, the LLM
/// reviewer); `with_*` methods substitute any of them. One job may grade
/// many submissions; each `grade` call owns its submission's working
/// directory for the duration of the run.
pub struct GradingJob {
    storage_root: PathBuf,
    config: PipelineConfig,
    fetcher: Box<dyn Fetcher>,
    installer: Box<dyn Installer>,
    runner: Box<dyn TestRunner>,
    reviewer: Box<dyn Reviewer>,
    notifier: Box<dyn NotificationChannel>,
    resolver: RegistryResolver,
    limiter: Option<Arc<Semaphore>>,
}

impl GradingJob {
    /// Creates a job with production strategies.
    ///
    /// # Arguments
    /// * `storage_root` - Directory under which per-submission working
    ///   directories are allocated.
    /// * `registry_url` - Base URL of the npm-compatible package registry.
    /// * `config` - Pipeline tunables and scoring policy.
    /// * `reviewer_config` - Explicit LLM settings for the quality reviewer.
    pub fn new(
        storage_root: impl Into<PathBuf>,
        registry_url: impl Into<String>,
        config: PipelineConfig,
        reviewer_config: ReviewerConfig,
    ) -> Self {
        let resolver = RegistryResolver::new(registry_url, config.registry_timeout_secs);
        Self {
            storage_root: storage_root.into(),
            fetcher: Box::new(GitFetcher::new(config.clone_timeout_secs)),
            installer: Box::new(NpmInstaller::new(config.install_timeout_secs)),
            runner: Box::new(NpmTestRunner::new(config.test_timeout_secs)),
            reviewer: Box::new(LlmReviewer::new(reviewer_config)),
            notifier: Box::new(NullChannel),
            resolver,
            limiter: None,
            config,
        }
    }

    /// Substitute the repository fetcher.
    pub fn with_fetcher<F: Fetcher + 'static>(mut self, fetcher: F) -> Self {
        self.fetcher = Box::new(fetcher);
        self
    }

    /// Substitute the dependency installer.
    pub fn with_installer<I: Installer + 'static>(mut self, installer: I) -> Self {
        self.installer = Box::new(installer);
        self
    }

    /// Substitute the test runner.
    pub fn with_test_runner<R: TestRunner + 'static>(mut self, runner: R) -> Self {
        self.runner = Box::new(runner);
        self
    }

    /// Substitute the quality reviewer.
    pub fn with_reviewer<R: Reviewer + 'static>(mut self, reviewer: R) -> Self {
        self.reviewer = Box::new(reviewer);
        self
    }

    /// Attach a notification channel receiving one event per status
    /// transition.
    pub fn with_notifier<N: NotificationChannel + 'static>(mut self, notifier: N) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    /// Attach a shared semaphore bounding how many pipelines run at once.
    /// Sizing it is a deployment decision (`max_concurrent_pipelines`).
    pub fn with_limiter(mut self, limiter: Arc<Semaphore>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// Runs the full grading pipeline for one submission.
    ///
    /// Advances `submission.status` strictly forward through
    /// `uploading -> installing -> testing -> reviewing -> reporting ->
    /// completed`, publishing each transition. On a pipeline-fatal failure
    /// (fetch, install, or working-directory allocation) the submission
    /// moves to `failed` with `error` populated and the error is returned.
    /// Downstream phase failures degrade into low sub-scores instead.
    ///
    /// The working directory is removed on every exit path.
    pub async fn grade(&self, submission: &mut Submission) -> Result<GradingResult, GraderError> {
        let _permit = match &self.limiter {
            Some(limiter) => Some(limiter.clone().acquire_owned().await.map_err(|e| {
                GraderError::Workspace(format!("pipeline limiter closed: {}", e))
            })?),
            None => None,
        };

        log::info!(
            "grading submission {} ({})",
            submission.id,
            submission.repository_url
        );
        self.transition(submission, SubmissionStatus::Uploading).await;

        let workspace = match Workspace::create(&self.storage_root, &submission.id) {
            Ok(workspace) => workspace,
            Err(e) => {
                self.fail(submission, &e).await;
                return Err(e);
            }
        };

        let result = self.run_pipeline(submission, workspace.path()).await;

        // Cleanup happens before the outcome is reported, success or not.
        workspace.close();

        match result {
            Ok(grading_result) => {
                log::info!(
                    "submission {} completed: total {:.2}, grade {:?}",
                    submission.id,
                    grading_result.scores.total,
                    grading_result.grade
                );
                Ok(grading_result)
            }
            Err(e) => {
                self.fail(submission, &e).await;
                Err(e)
            }
        }
    }

    async fn run_pipeline(
        &self,
        submission: &mut Submission,
        work_dir: &Path,
    ) -> Result<GradingResult, GraderError> {
        self.fetcher
            .fetch(&submission.repository_url, work_dir)
            .await?;

        if submission.project_type.runs_install() {
            self.transition(submission, SubmissionStatus::Installing).await;
            self.installer.install(work_dir).await?;
        }

        let test_result = if submission.project_type.runs_tests() {
            self.transition(submission, SubmissionStatus::Testing).await;
            Some(self.runner.run(work_dir).await)
        } else {
            None
        };

        self.transition(submission, SubmissionStatus::Reviewing).await;

        let patterns = submission
            .file_selectors
            .clone()
            .unwrap_or_else(|| collector::default_patterns(submission.project_type));
        let source = collector::collect(work_dir, &patterns, self.config.max_file_chars);

        let declared = registry::read_manifest(work_dir);
        let latest = self.resolver.resolve_latest_versions(&declared).await;

        let analysis = self
            .reviewer
            .review(ReviewInput {
                source: &source,
                test_result: test_result.as_ref(),
                rubric: submission.rubric.as_deref(),
                declared_dependencies: &declared,
                latest_versions: &latest,
                project_type: submission.project_type,
            })
            .await;

        self.transition(submission, SubmissionStatus::Reporting).await;

        let test_score = report::effective_test_score(
            test_result.as_ref(),
            &analysis,
            submission.project_type,
        );
        let composite = scorer::compose(
            test_score,
            analysis.code_quality_score,
            submission.project_type,
            &self.config.weights,
        );
        let scores = report::build_scores(
            test_result.as_ref(),
            &analysis,
            test_score,
            &composite,
            submission.project_type,
        );

        submission.grade = composite.grade;
        submission.scores = Some(scores.clone());
        submission.report = Some(analysis.report.clone());
        self.transition(submission, SubmissionStatus::Completed).await;

        Ok(GradingResult {
            grade: composite.grade,
            scores,
            report: analysis.report,
        })
    }

    async fn transition(&self, submission: &mut Submission, status: SubmissionStatus) {
        submission.status = status;
        submission.updated_at = Utc::now();
        log::debug!("submission {} -> {}", submission.id, status.as_str());
        self.notifier.publish(&submission.id, status.as_str()).await;
    }

    async fn fail(&self, submission: &mut Submission, error: &GraderError) {
        log::error!("submission {} failed: {}", submission.id, error);
        submission.error = Some(error.to_string());
        submission.grade = Grade::Fail;
        self.transition(submission, SubmissionStatus::Failed).await;
    }
}
