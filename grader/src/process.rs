//! Shared child-process execution with a hard deadline.
//!
//! Every external tool the pipeline shells out to (`git`, `npm`) goes through
//! [`run_with_timeout`] so a command that overruns its limit is actually
//! killed, not just abandoned: the child is spawned with `kill_on_drop`, and
//! dropping the timed-out future reaps it.

use std::process::{Output, Stdio};
use tokio::process::Command;
use tokio::time::{Duration, timeout};

/// Why a command produced no [`Output`].
#[derive(Debug)]
pub(crate) enum WaitError {
    /// The binary could not be started at all (missing tool, bad cwd).
    Spawn(std::io::Error),
    /// The command exceeded its deadline and was killed.
    TimedOut(Duration),
    /// Waiting on the running child failed.
    Io(std::io::Error),
}

/// Spawns `command` with piped stdio and waits at most `limit` for it to
/// finish. On timeout the child process is killed before returning.
pub(crate) async fn run_with_timeout(
    command: &mut Command,
    limit: Duration,
) -> Result<Output, WaitError> {
    let child = command
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(WaitError::Spawn)?;

    match timeout(limit, child.wait_with_output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(WaitError::Io(e)),
        Err(_) => Err(WaitError::TimedOut(limit)),
    }
}
