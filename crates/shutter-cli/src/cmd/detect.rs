use crate::cmd::load_project;
use crate::output::print_json;
use shutter_core::changes::{self, ChangeSet};
use std::path::Path;

pub fn run(root: &Path, base_branch: Option<&str>, json: bool) -> anyhow::Result<()> {
    let project = load_project(root)?;
    let base = base_branch.unwrap_or(&project.config.git.base_branch);

    match changes::detect(&project, base)? {
        ChangeSet::Services(report) if json => print_json(&report)?,
        // single compact line, scraped by CI
        ChangeSet::Services(report) => println!("{}", serde_json::to_string(&report)?),
        ChangeSet::NoChanges | ChangeSet::NoServices { .. } => {}
    }
    Ok(())
}
