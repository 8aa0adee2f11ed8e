use crate::cmd::load_project;
use crate::output::print_bracketed;
use shutter_core::screenshot::{self, ChromeLauncher};
use std::path::{Path, PathBuf};

pub fn run(root: &Path, services: &[String], output: Option<&Path>) -> anyhow::Result<()> {
    let project = load_project(root)?;
    let out_dir: PathBuf = match output {
        Some(dir) if dir.is_relative() => std::env::current_dir()?.join(dir),
        Some(dir) => dir.to_path_buf(),
        None => project.screenshots_dir(),
    };

    let report = screenshot::generate_screenshots(
        &project,
        &ChromeLauncher,
        services,
        &out_dir,
        &mut |_| Ok(()),
    )?;
    print_bracketed(&report)?;

    if !report.all_succeeded() {
        anyhow::bail!("{} screenshot(s) failed", report.failed());
    }
    tracing::info!("All screenshots generated successfully!");
    Ok(())
}
