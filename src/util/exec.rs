//! Process execution for admin-tool round trips.

use crate::error::KadminError;
use crate::models::shell_result::ShellResult;
use std::process::{Command, Stdio};

/// Runs an argument vector to completion and captures its output.
///
/// Implementations receive discrete arguments, never a shell string.
pub trait Executor {
    fn execute(&self, argv: &[String]) -> Result<ShellResult, KadminError>;
}

/// Executes commands with `std::process::Command`, blocking until exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl Executor for ProcessExecutor {
    fn execute(&self, argv: &[String]) -> Result<ShellResult, KadminError> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| KadminError::InvalidArgument("empty command".into()))?;

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| KadminError::Launch {
                program: program.clone(),
                source,
            })?;

        // Killed by signal: no exit code.
        let exit_code = output.status.code().unwrap_or(-1);
        Ok(ShellResult {
            exit_code,
            stdout: Some(String::from_utf8_lossy(&output.stdout).into_owned()),
            stderr: Some(String::from_utf8_lossy(&output.stderr).into_owned()),
        })
    }
}

impl<E: Executor + ?Sized> Executor for &E {
    fn execute(&self, argv: &[String]) -> Result<ShellResult, KadminError> {
        (**self).execute(argv)
    }
}
