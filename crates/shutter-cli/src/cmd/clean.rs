use anyhow::Context;
use shutter_core::project::Project;
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let project = Project::load(root).context("failed to load config")?;
    if !project.clean()? {
        println!("Nothing to clean: {} does not exist", project.dist_dir().display());
    }
    Ok(())
}
