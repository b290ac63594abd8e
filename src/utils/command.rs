//! Command execution primitives with consistent error handling.

use serde::Serialize;
use std::path::Path;
use std::process::{Command, Output};

use crate::error::{Error, Result};

/// Captured output from command execution.
/// Reusable primitive for any command that executes external processes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CapturedOutput {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stdout: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr: String,
}

impl CapturedOutput {
    pub fn new(stdout: String, stderr: String) -> Self {
        Self { stdout, stderr }
    }
}

/// Exit status and captured streams of a finished process.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub output: CapturedOutput,
}

impl ProcessResult {
    fn from_output(output: &Output) -> Self {
        Self {
            success: output.status.success(),
            exit_code: output.status.code(),
            output: CapturedOutput::new(
                String::from_utf8_lossy(&output.stdout).trim().to_string(),
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ),
        }
    }

    /// Prefers stderr, falls back to stdout if stderr is empty.
    pub fn error_text(&self) -> &str {
        if !self.output.stderr.is_empty() {
            &self.output.stderr
        } else {
            &self.output.stdout
        }
    }
}

/// Run a process to completion, capturing both streams.
///
/// `Command::output` reads stdout and stderr concurrently while the child runs,
/// so a chatty child can never block on a full pipe. A non-zero exit is not an
/// error here; callers inspect `ProcessResult::success`. Spawn failures are.
pub fn run_captured(program: &str, args: &[&str], dir: Option<&Path>) -> Result<ProcessResult> {
    let mut command = Command::new(program);
    command.args(args);
    if let Some(dir) = dir {
        command.current_dir(dir);
    }

    let output = command.output().map_err(|e| {
        Error::internal_io(
            format!("Failed to run {}: {}", program, e),
            Some(format!("{} {}", program, args.join(" "))),
        )
    })?;

    Ok(ProcessResult::from_output(&output))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(unix)]
    fn run_captured_collects_stdout() {
        let result = run_captured("echo", &["hello"], None).unwrap();
        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert_eq!(result.output.stdout, "hello");
    }

    #[test]
    #[cfg(unix)]
    fn run_captured_reports_non_zero_exit() {
        let result = run_captured("sh", &["-c", "echo oops >&2; exit 3"], None).unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
        assert_eq!(result.error_text(), "oops");
    }

    #[test]
    #[cfg(unix)]
    fn run_captured_drains_large_output() {
        // Larger than a pipe buffer on both streams.
        let script = "i=0; while [ $i -lt 20000 ]; do echo line$i; echo err$i >&2; i=$((i+1)); done";
        let result = run_captured("sh", &["-c", script], None).unwrap();
        assert!(result.success);
        assert!(result.output.stdout.ends_with("line19999"));
        assert!(result.output.stderr.ends_with("err19999"));
    }

    #[test]
    fn run_captured_fails_with_invalid_command() {
        let result = run_captured("nonexistent_command_xyz", &[], None);
        assert!(result.is_err());
    }

    #[test]
    #[cfg(unix)]
    fn error_text_prefers_stderr() {
        use std::os::unix::process::ExitStatusExt;
        let output = Output {
            status: std::process::ExitStatus::from_raw(0),
            stdout: b"stdout content".to_vec(),
            stderr: b"stderr content".to_vec(),
        };
        assert_eq!(ProcessResult::from_output(&output).error_text(), "stderr content");
    }

    #[test]
    #[cfg(unix)]
    fn error_text_falls_back_to_stdout() {
        use std::os::unix::process::ExitStatusExt;
        let output = Output {
            status: std::process::ExitStatus::from_raw(0),
            stdout: b"stdout content".to_vec(),
            stderr: b"".to_vec(),
        };
        assert_eq!(ProcessResult::from_output(&output).error_text(), "stdout content");
    }
}
