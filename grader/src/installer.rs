//! Dependency installer: `npm install` inside the working directory.

use crate::error::GraderError;
use crate::process::{WaitError, run_with_timeout};
use crate::traits::Installer;
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tokio::time::Duration;

/// Installs a JS/TS project's declared dependencies. Failure is
/// pipeline-fatal and carries the raw process output so a broken manifest is
/// diagnosable from the submission's error field.
pub struct NpmInstaller {
    install_timeout: Duration,
}

impl NpmInstaller {
    pub fn new(install_timeout_secs: u64) -> Self {
        Self {
            install_timeout: Duration::from_secs(install_timeout_secs),
        }
    }
}

#[async_trait]
impl Installer for NpmInstaller {
    async fn install(&self, project_path: &Path) -> Result<(), GraderError> {
        let mut command = Command::new("npm");
        command
            .arg("install")
            .arg("--no-audit")
            .arg("--no-fund")
            .current_dir(project_path);

        let output = run_with_timeout(&mut command, self.install_timeout)
            .await
            .map_err(|e| match e {
                WaitError::Spawn(e) => {
                    GraderError::InstallFailed(format!("failed to start npm: {}", e))
                }
                WaitError::TimedOut(limit) => GraderError::InstallFailed(format!(
                    "npm install timed out after {}s",
                    limit.as_secs()
                )),
                WaitError::Io(e) => GraderError::InstallFailed(e.to_string()),
            })?;

        if output.status.success() {
            Ok(())
        } else {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(GraderError::InstallFailed(format!(
                "npm install exited with {}:\nSTDOUT:\n{}\nSTDERR:\n{}",
                output.status.code().unwrap_or(-1),
                stdout.trim(),
                stderr.trim()
            )))
        }
    }
}
