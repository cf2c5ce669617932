//! Packet-forwarder restart
//!
//! The restart is an opaque external command. It sits behind
//! [`RestartInvoker`] so the apply pipeline can run without spawning a
//! process.

use std::process::Command;

use thiserror::Error;
use tracing::{debug, info};

/// Errors restarting the packet-forwarder
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RestartError {
    /// Restart command is empty
    #[error("no packet-forwarder restart command configured")]
    NoCommandConfigured,

    /// Command could not be launched or exited unsuccessfully
    #[error("execute command error ({command}): {cause}")]
    Execution { command: String, cause: String },
}

/// Something that can restart the packet-forwarder
pub trait RestartInvoker {
    /// Restart and report whether it succeeded
    fn restart(&self) -> Result<(), RestartError>;
}

/// Split a command line on whitespace into program and arguments
pub fn split_command(command: &str) -> Result<(&str, Vec<&str>), RestartError> {
    let mut parts = command.split_whitespace();
    let program = parts.next().ok_or(RestartError::NoCommandConfigured)?;
    Ok((program, parts.collect()))
}

/// Restarts by running a configured command
#[derive(Debug, Clone)]
pub struct CommandRestart {
    command: String,
}

impl CommandRestart {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl RestartInvoker for CommandRestart {
    fn restart(&self) -> Result<(), RestartError> {
        let (program, args) = split_command(&self.command)?;
        info!("Restarting packet-forwarder: {}", self.command);

        let execution_error = |cause: String| RestartError::Execution {
            command: self.command.clone(),
            cause,
        };

        let output = Command::new(program)
            .args(&args)
            .output()
            .map_err(|e| execution_error(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            let cause = if stderr.is_empty() {
                output.status.to_string()
            } else {
                format!("{}: {}", output.status, stderr)
            };
            return Err(execution_error(cause));
        }

        debug!("Restart command finished: {}", output.status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_split_command() {
        let (program, args) = split_command("  /etc/init.d/pkt-fwd \trestart ").unwrap();
        assert_eq!(program, "/etc/init.d/pkt-fwd");
        assert_eq!(args, vec!["restart"]);

        let (program, args) = split_command("reboot").unwrap();
        assert_eq!(program, "reboot");
        assert!(args.is_empty());
    }

    #[test]
    fn test_empty_command() {
        assert_eq!(split_command(""), Err(RestartError::NoCommandConfigured));
        assert_eq!(
            CommandRestart::new(" \t ").restart(),
            Err(RestartError::NoCommandConfigured)
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_command() {
        assert_eq!(CommandRestart::new("true").restart(), Ok(()));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command() {
        let err = CommandRestart::new("false").restart().unwrap_err();
        assert!(matches!(
            err,
            RestartError::Execution { ref command, .. } if command == "false"
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_stderr_in_cause() {
        let err = CommandRestart::new("ls /nonexistent-pf-reconf-dir")
            .restart()
            .unwrap_err();
        let RestartError::Execution { cause, .. } = err else {
            panic!("expected execution error");
        };
        assert!(cause.contains("nonexistent-pf-reconf-dir"));
    }

    #[test]
    fn test_missing_program() {
        let err = CommandRestart::new("/nonexistent/pf-restart now")
            .restart()
            .unwrap_err();
        assert!(matches!(err, RestartError::Execution { .. }));
    }

    proptest! {
        #[test]
        fn split_recovers_tokens(
            tokens in prop::collection::vec("[a-zA-Z0-9/._-]{1,12}", 1..6),
            sep in "[ \t]{1,3}"
        ) {
            let command = tokens.join(&sep);
            let (program, args) = split_command(&command).unwrap();

            prop_assert_eq!(program, tokens[0].as_str());
            prop_assert_eq!(args, tokens[1..].iter().map(String::as_str).collect::<Vec<_>>());
        }
    }
}
