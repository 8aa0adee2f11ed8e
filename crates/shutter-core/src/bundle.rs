//! Subprocess invocation for the external asset bundler and other argv-style
//! tools configured in `shutter.yaml`.
//!
//! The bundler owns the asset pipeline (stylesheets, scripts, fonts, images)
//! and writes `assets-manifest.json` into the build output directory; the
//! builder only reads that manifest.

use crate::builder::BuildMode;
use crate::error::{Result, ShutterError};
use crate::project::Project;
use std::path::Path;
use std::process::{Command, Output, Stdio};

/// Resolve `argv[0]` on PATH and build a [`Command`] for the full argv.
pub fn command_for(argv: &[String], cwd: &Path) -> Result<Command> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| ShutterError::ToolNotFound("(empty command)".to_string()))?;
    let resolved =
        which::which(program).map_err(|_| ShutterError::ToolNotFound(program.clone()))?;
    let mut cmd = Command::new(resolved);
    cmd.args(args).current_dir(cwd);
    Ok(cmd)
}

/// Run `cmd` to completion, capturing stdout and stderr.
pub fn capture(tool: &str, cmd: &mut Command) -> Result<Output> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| ShutterError::ToolSpawnFailed {
            tool: tool.to_string(),
            reason: e.to_string(),
        })
}

/// Run the configured bundler with `NODE_ENV` set to `mode`.
///
/// Returns `false` without running anything when no bundler is configured.
pub fn run_bundler(project: &Project, mode: BuildMode) -> Result<bool> {
    let argv = &project.config.tools.bundler;
    if argv.is_empty() {
        tracing::debug!("no bundler configured; skipping asset bundling");
        return Ok(false);
    }

    let tool = argv.join(" ");
    tracing::info!("Bundling assets ({mode}): {tool}");

    let mut cmd = command_for(argv, project.root())?;
    cmd.env("NODE_ENV", mode.as_str());
    // bundler output flows through so its progress shows in the terminal
    let status = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| ShutterError::ToolSpawnFailed {
            tool: tool.clone(),
            reason: e.to_string(),
        })?;

    if !status.success() {
        return Err(ShutterError::ToolFailed {
            tool,
            status: status.to_string(),
            output: "see bundler output above".to_string(),
        });
    }
    tracing::info!("Bundling complete");
    Ok(true)
}
