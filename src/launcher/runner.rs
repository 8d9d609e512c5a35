use std::ffi::OsString;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

/// Process-invocation primitive: run a program with an argument vector and
/// report whether it exited successfully.
///
/// Arguments are passed to the program as-is; no shell ever parses them.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: Vec<OsString>) -> std::io::Result<bool>;
}

/// Runs commands with `tokio::process::Command`, waiting only for the
/// program's own exit status.
///
/// stdout goes to null since it is the protocol channel; stderr is inherited
/// as the diagnostic stream. Neither is piped, so processes the program leaves
/// behind cannot hold the call open.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioCommandRunner;

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: Vec<OsString>) -> std::io::Result<bool> {
        debug!(program, ?args, "running command");

        let status = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .status()
            .await?;

        if !status.success() {
            warn!(program, %status, "command exited unsuccessfully");
        }

        Ok(status.success())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn zero_exit_is_success() {
        let ok = TokioCommandRunner.run("true", Vec::new()).await.unwrap();
        assert!(ok);
    }

    #[tokio::test]
    async fn non_zero_exit_is_failure() {
        let ok = TokioCommandRunner.run("false", Vec::new()).await.unwrap();
        assert!(!ok);
    }

    #[tokio::test]
    async fn missing_program_is_io_error() {
        let result = TokioCommandRunner
            .run("app-launcher-no-such-program", Vec::new())
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn metacharacters_reach_program_verbatim() {
        // `test` compares its operands literally; a shell would have expanded them.
        let arg = OsString::from("$(echo pwned); `id` \"quoted\"");
        let ok = TokioCommandRunner
            .run("test", vec![arg.clone(), "=".into(), arg])
            .await
            .unwrap();
        assert!(ok);
    }

    #[tokio::test]
    async fn program_output_is_discarded() {
        // A chatty program still succeeds with stdout sent to null.
        let ok = TokioCommandRunner
            .run("echo", vec!["not a protocol frame".into()])
            .await
            .unwrap();
        assert!(ok);
    }
}
