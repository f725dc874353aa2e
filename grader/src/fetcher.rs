//! Repository fetcher: `git clone` into the submission's working directory.

use crate::error::GraderError;
use crate::process::{WaitError, run_with_timeout};
use crate::traits::Fetcher;
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tokio::time::Duration;

/// Clones the submission's repository with the system `git`. The destination
/// is the freshly created, empty working directory owned by the orchestrator.
pub struct GitFetcher {
    clone_timeout: Duration,
}

impl GitFetcher {
    pub fn new(clone_timeout_secs: u64) -> Self {
        Self {
            clone_timeout: Duration::from_secs(clone_timeout_secs),
        }
    }
}

#[async_trait]
impl Fetcher for GitFetcher {
    async fn fetch(&self, repository_url: &str, destination: &Path) -> Result<(), GraderError> {
        let mut command = Command::new("git");
        command
            .arg("clone")
            .arg("--depth=1")
            .arg(repository_url)
            .arg(destination)
            // A private repository must fail instead of prompting for
            // credentials on a worker with no terminal.
            .env("GIT_TERMINAL_PROMPT", "0");

        let output = run_with_timeout(&mut command, self.clone_timeout)
            .await
            .map_err(|e| match e {
                WaitError::Spawn(e) => {
                    GraderError::FetchFailed(format!("failed to start git: {}", e))
                }
                WaitError::TimedOut(limit) => GraderError::FetchFailed(format!(
                    "git clone timed out after {}s",
                    limit.as_secs()
                )),
                WaitError::Io(e) => GraderError::FetchFailed(e.to_string()),
            })?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(GraderError::FetchFailed(format!(
                "git clone exited with {}: {}",
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )))
        }
    }
}
