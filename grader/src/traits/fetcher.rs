//! # Fetcher Trait
//!
//! Strategy trait for bringing a remote repository onto local disk. The
//! production implementation shells out to `git clone`; tests substitute a
//! fake that writes fixture files instead.

use crate::error::GraderError;
use async_trait::async_trait;
use std::path::Path;

/// Clones `repository_url` into `destination`, which already exists and is
/// empty. Any failure (unreachable, private, nonexistent repository) is
/// surfaced as [`GraderError::FetchFailed`]; this phase is pipeline-fatal
/// and is never retried at this layer.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, repository_url: &str, destination: &Path) -> Result<(), GraderError>;
}
