use crate::error::{PadError, Result};
use std::process::Stdio;
use tracing::debug;

/// Launch a command via `/bin/sh -c`, detached from the dispatcher.
///
/// The child is not awaited and its output is discarded; only a failure
/// to spawn is reported.
///
/// # Errors
/// Returns `PadError::LocalExec` if the shell cannot be spawned.
pub fn spawn_detached(command: &str) -> Result<()> {
    let child = tokio::process::Command::new("/bin/sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| PadError::LocalExec {
            command: command.to_string(),
            message: e.to_string(),
        })?;

    debug!("spawned '{command}' (pid {:?})", child.id());
    // Dropping the handle leaves the child running.
    drop(child);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn spawn_returns_without_waiting() {
        // A slow command must not block the caller.
        let start = std::time::Instant::now();
        spawn_detached("sleep 5").unwrap();
        assert!(start.elapsed() < std::time::Duration::from_secs(1));
    }

    #[tokio::test]
    async fn spawn_true_succeeds() {
        assert!(spawn_detached("true").is_ok());
    }
}
