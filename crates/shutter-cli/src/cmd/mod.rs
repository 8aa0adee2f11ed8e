pub mod build;
pub mod clean;
pub mod comment;
pub mod config;
pub mod create;
pub mod detect;
pub mod interactive;
pub mod screenshot;
pub mod validate;
pub mod workflow;

use anyhow::Context;
use shutter_core::lint::HtmlValidate;
use shutter_core::project::Project;
use std::path::Path;

/// Load the project at `root` and check it looks like a shuttering template.
pub fn load_project(root: &Path) -> anyhow::Result<Project> {
    let project = Project::load(root)
        .with_context(|| format!("failed to load project at {}", root.display()))?;
    project.ensure_project_root()?;
    Ok(project)
}

pub fn linter(project: &Project) -> HtmlValidate {
    HtmlValidate::new(project.config.tools.linter.clone(), project.root())
}
