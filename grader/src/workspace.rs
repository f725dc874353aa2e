//! Submission-scoped working directory.
//!
//! Each submission owns exactly one uniquely-named directory under the
//! grading storage root for the lifetime of its pipeline run. Only the
//! orchestrator creates or deletes it. Removal failure on close is logged,
//! never raised: cleanup must not mask the pipeline's primary outcome.

use crate::error::GraderError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Allocates a fresh working directory under `storage_root`, named after
    /// the submission id plus a random suffix so concurrent repeat grades of
    /// the same submission cannot collide.
    pub fn create(storage_root: &Path, submission_id: &str) -> Result<Self, GraderError> {
        fs::create_dir_all(storage_root).map_err(|e| {
            GraderError::Workspace(format!(
                "cannot create storage root {}: {}",
                storage_root.display(),
                e
            ))
        })?;

        let dir = tempfile::Builder::new()
            .prefix(&format!("submission_{}_", submission_id))
            .tempdir_in(storage_root)
            .map_err(|e| {
                GraderError::Workspace(format!("cannot allocate working directory: {}", e))
            })?;

        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Removes the working directory recursively. Failures are logged; the
    /// directory is also removed on drop if close is never reached (e.g. a
    /// panic unwinding through the pipeline).
    pub fn close(self) {
        let path = self.dir.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            log::warn!(
                "failed to remove working directory {}: {}",
                path.display(),
                e
            );
        }
    }
}
