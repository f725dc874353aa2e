//! # Test Runner Trait
//!
//! Strategy trait for executing a project's test suite. Implementations
//! never raise: "tests ran but some failed" is a normal [`TestResult`] with
//! `passed < total`, and "the test command could not execute at all" is a
//! zero-count result with a diagnostic in `details`. This keeps the pipeline
//! able to proceed to quality review and produce a partial, explainable
//! grade.

use crate::types::TestResult;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait TestRunner: Send + Sync {
    async fn run(&self, project_path: &Path) -> TestResult;
}
