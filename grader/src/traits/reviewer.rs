//! # Reviewer Trait
//!
//! Strategy trait for the LLM-backed quality review. The production
//! implementation calls an OpenAI-compatible chat-completions endpoint; the
//! trait exists so tests can substitute a canned reviewer and so the model
//! provider can change without touching the orchestrator.

use crate::types::{ProjectType, QualityAnalysis, TestResult};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Everything the reviewer needs to build its prompt. Borrowed from the
/// orchestrator's pipeline state for the duration of one review call.
pub struct ReviewInput<'a> {
    /// Concatenated, sanitized source files (see the collector).
    pub source: &'a str,
    /// Measured test results; `None` when the test phase was skipped.
    pub test_result: Option<&'a TestResult>,
    /// Optional instructor-supplied marking criteria.
    pub rubric: Option<&'a str>,
    /// Dependency name -> declared version range, from the project manifest.
    pub declared_dependencies: &'a BTreeMap<String, String>,
    /// Dependency name -> latest published version ("unknown" on lookup
    /// failure). The prompt restricts version commentary to this data.
    pub latest_versions: &'a BTreeMap<String, String>,
    pub project_type: ProjectType,
}

/// Produces a [`QualityAnalysis`] for the submission. Infallible by design:
/// the LLM is the least reliable component in the pipeline, so every failure
/// mode (timeout, auth, rate limit, unparseable response) degrades into a
/// zero-score analysis whose report explains what happened.
#[async_trait]
pub trait Reviewer: Send + Sync {
    async fn review(&self, input: ReviewInput<'_>) -> QualityAnalysis;
}
