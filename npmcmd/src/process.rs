use async_trait::async_trait;
use npmcmd_core::{NpmError, Result};
use std::path::PathBuf;
use std::process::Stdio;
use tracing::{error, info, warn};

/// Options applied to every spawned npm process.
#[derive(Debug, Clone)]
pub struct ExecOptions {
    /// Directory the process is launched in; `None` inherits the caller's.
    /// Not validated up front, a bad path surfaces as a launch failure.
    pub working_directory: Option<PathBuf>,
    /// When true, child output is inherited by the console and nothing is
    /// captured, so a successful call returns empty text. When false,
    /// console streaming is suppressed, stdout is piped and returned, and
    /// stderr is discarded. Console routing and in-memory capture are
    /// mutually exclusive; there is no tee mode, so toggling visibility
    /// also selects which of the two the caller gets.
    pub show_output: bool,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            working_directory: None,
            show_output: true,
        }
    }
}

/// The one collaborator the builder talks to for side effects.
///
/// Keeping process spawning behind this seam lets the command-rendering
/// logic be tested with a recording runner instead of real subprocesses.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs a shell command and waits for it to exit.
    fn run_blocking(&self, command: &str, options: &ExecOptions) -> Result<String>;

    /// Runs a shell command without blocking the caller's thread.
    async fn run(&self, command: &str, options: &ExecOptions) -> Result<String>;
}

/// Real runner: executes the command string through the platform shell.
///
/// Both forms collapse spawn errors and non-zero exits into the single
/// payload-free [`NpmError::CommandFailed`]. Exit codes and stderr are
/// logged here and then dropped; callers only see pass or fail.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

#[async_trait]
impl CommandRunner for ShellRunner {
    fn run_blocking(&self, command: &str, options: &ExecOptions) -> Result<String> {
        info!(command = %command, "Running npm command");

        let mut cmd = if cfg!(target_os = "windows") {
            let mut c = std::process::Command::new("cmd");
            c.arg("/C").arg(command);
            c
        } else {
            let mut c = std::process::Command::new("sh");
            c.arg("-c").arg(command);
            c
        };

        if let Some(dir) = &options.working_directory {
            cmd.current_dir(dir);
        }

        if options.show_output {
            let status = cmd.status().map_err(|e| {
                error!(command = %command, error = %e, "Failed to launch npm command");
                NpmError::CommandFailed
            })?;
            check_status(command, status.success(), status.code())?;
            Ok(String::new())
        } else {
            cmd.stdout(Stdio::piped()).stderr(Stdio::null());
            let output = cmd.output().map_err(|e| {
                error!(command = %command, error = %e, "Failed to launch npm command");
                NpmError::CommandFailed
            })?;
            check_status(command, output.status.success(), output.status.code())?;
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        }
    }

    async fn run(&self, command: &str, options: &ExecOptions) -> Result<String> {
        info!(command = %command, "Running npm command");

        let mut cmd = if cfg!(target_os = "windows") {
            let mut c = tokio::process::Command::new("cmd");
            c.arg("/C").arg(command);
            c
        } else {
            let mut c = tokio::process::Command::new("sh");
            c.arg("-c").arg(command);
            c
        };

        if let Some(dir) = &options.working_directory {
            cmd.current_dir(dir);
        }

        if options.show_output {
            let status = cmd.status().await.map_err(|e| {
                error!(command = %command, error = %e, "Failed to launch npm command");
                NpmError::CommandFailed
            })?;
            check_status(command, status.success(), status.code())?;
            Ok(String::new())
        } else {
            cmd.stdout(Stdio::piped()).stderr(Stdio::null());
            let output = cmd.output().await.map_err(|e| {
                error!(command = %command, error = %e, "Failed to launch npm command");
                NpmError::CommandFailed
            })?;
            check_status(command, output.status.success(), output.status.code())?;
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        }
    }
}

fn check_status(command: &str, success: bool, code: Option<i32>) -> Result<()> {
    if success {
        Ok(())
    } else {
        warn!(command = %command, exit_code = ?code, "npm command exited non-zero");
        Err(NpmError::CommandFailed)
    }
}

/// Whether an `npm` executable is reachable on the current PATH.
pub fn npm_available() -> bool {
    which::which("npm").is_ok()
}
