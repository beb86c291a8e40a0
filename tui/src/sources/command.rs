//! Shell command source

use std::process::Stdio;

use async_trait::async_trait;
use display_core::{Poll, Source, SourceError};
use tokio::process::Command;
use tracing::{debug, warn};

/// Run `command` through `sh -c` and return its standard output
///
/// Failures are not errors here: a command that cannot start or exits
/// non-zero yields a one-line description of what went wrong, so the display
/// shows the problem instead of the loop stopping.
pub async fn run_shell(command: &str) -> String {
    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await;

    match output {
        Ok(output) if output.status.success() => {
            debug!(command, bytes = output.stdout.len(), "Command finished");
            String::from_utf8_lossy(&output.stdout).into_owned()
        }
        Ok(output) => {
            warn!(command, status = %output.status, "Command failed");
            format!("{command}: {}", output.status)
        }
        Err(e) => {
            warn!(command, error = %e, "Command could not start");
            format!("{command}: {e}")
        }
    }
}

/// Re-runs one shell command every poll
#[derive(Clone, Debug)]
pub struct CommandSource {
    command: String,
}

impl CommandSource {
    /// Source for a `sh -c` command line
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// The command line being run
    pub fn command(&self) -> &str {
        &self.command
    }
}

#[async_trait]
impl Source for CommandSource {
    fn name(&self) -> &str {
        "command"
    }

    async fn poll(&mut self) -> Result<Poll, SourceError> {
        Ok(Poll::text(run_shell(&self.command).await))
    }
}
