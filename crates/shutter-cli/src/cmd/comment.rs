use anyhow::Context;
use shutter_core::comment;
use shutter_core::project::Project;
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    // the comment only needs the results file, not a full template checkout
    let project = Project::load(root).context("failed to load config")?;
    let comment = comment::compose(&project)?;
    println!("{}", comment.preview());

    if !comment.all_valid {
        anyhow::bail!("some shuttering pages have validation errors");
    }
    Ok(())
}
