//! External build-event commands (`beforeBuild` / `afterBuild`).
//!
//! A command runs through the platform shell in the project directory. Its output is captured; a command that
//! cannot be started or exits unsuccessfully is a [`HookFault`].

use std::fmt;
use std::path::Path;
use std::process::{Command, Output};

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    BeforeBuild,
    AfterBuild,
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HookStage::BeforeBuild => "beforeBuild",
            HookStage::AfterBuild => "afterBuild",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("Unable to run {stage} event command: {reason}")]
#[diagnostic(code(bridgejs::hook))]
pub struct HookFault {
    pub stage: HookStage,
    pub command: String,
    pub reason: String,
    /// Captured stdout and stderr of the command.
    #[help]
    pub output: Option<String>,
}

/// Output of a successful hook command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookOutput {
    pub stdout: String,
    pub stderr: String,
}

fn shell(command: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }
}

/// Run one hook command in `dir`.
#[tracing::instrument(skip_all, fields(stage = %stage, command = %command))]
pub fn run_hook(stage: HookStage, command: &str, dir: &Path) -> Result<HookOutput, HookFault> {
    let fault = |reason: String, output: Option<String>| HookFault {
        stage,
        command: command.to_string(),
        reason,
        output,
    };

    let Output { status, stdout, stderr } = shell(command)
        .current_dir(dir)
        .output()
        .map_err(|e| fault(format!("cannot start `{}`: {}", command, e), None))?;
    let stdout = String::from_utf8_lossy(&stdout).into_owned();
    let stderr = String::from_utf8_lossy(&stderr).into_owned();

    if !status.success() {
        let code = status
            .code()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "a signal".to_string());
        let captured = format!("{}{}", stdout, stderr);
        let captured = (!captured.trim().is_empty()).then(|| captured.trim_end().to_string());
        return Err(fault(format!("`{}` exited with {}", command, code), captured));
    }

    tracing::info!("build event command finished");
    if !stdout.trim().is_empty() {
        tracing::debug!(output = %stdout.trim_end(), "build event output");
    }
    Ok(HookOutput { stdout, stderr })
}
