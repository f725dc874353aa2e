//! # Installer Trait
//!
//! Strategy trait for installing a project's declared dependencies inside
//! the working directory. Only invoked for project types whose dispatch
//! table says `runs_install()`; review-only types skip this phase entirely.

use crate::error::GraderError;
use async_trait::async_trait;
use std::path::Path;

/// Runs the package manager's install command with `project_path` as the
/// working directory. Failure is pipeline-fatal and carries the raw process
/// output for diagnostics.
#[async_trait]
pub trait Installer: Send + Sync {
    async fn install(&self, project_path: &Path) -> Result<(), GraderError>;
}
