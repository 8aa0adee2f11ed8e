//! Thin wrappers over the `git` CLI.

use crate::error::{Result, ShutterError};
use std::path::Path;
use std::process::Command;

fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| ShutterError::Git(format!("failed to run git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ShutterError::Git(format!(
            "git {} failed: {}",
            args.first().copied().unwrap_or_default(),
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Names of files added or modified between `base...HEAD` that match
/// `pathspec`. Deletions are excluded.
pub fn changed_files(dir: &Path, base: &str, pathspec: &str) -> Result<Vec<String>> {
    let range = format!("{base}...HEAD");
    let stdout = run_git(
        dir,
        &[
            "diff",
            "--name-only",
            "--diff-filter=AM",
            &range,
            "--",
            pathspec,
        ],
    )?;
    Ok(stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// Stage `path` and commit it with `message`.
pub fn commit_path(dir: &Path, path: &Path, message: &str) -> Result<()> {
    let path_str = path
        .to_str()
        .ok_or_else(|| ShutterError::Git("path contains non-UTF8 characters".into()))?;
    run_git(dir, &["add", path_str])?;
    run_git(dir, &["commit", "-m", message])?;
    Ok(())
}
