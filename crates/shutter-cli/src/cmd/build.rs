use crate::cmd::load_project;
use crate::output::print_json;
use shutter_core::builder::{self, BuildMode};
use shutter_core::bundle;
use std::path::Path;

pub fn run(root: &Path, service: Option<&str>, env: Option<&str>, json: bool) -> anyhow::Result<()> {
    let project = load_project(root)?;
    let service = service.unwrap_or(&project.config.site.default_service);
    let mode = BuildMode::from_env_value(env);

    let output = builder::build(&project, service, mode)?;

    if json {
        print_json(&serde_json::json!({
            "service": output.service,
            "mode": output.mode.as_str(),
            "pages": output.pages,
        }))?;
    } else {
        for page in &output.pages {
            println!("{}", page.display());
        }
    }
    Ok(())
}

pub fn bundle(root: &Path, env: Option<&str>) -> anyhow::Result<()> {
    let project = load_project(root)?;
    let mode = BuildMode::from_env_value(env);
    if !bundle::run_bundler(&project, mode)? {
        println!("No bundler configured (tools.bundler is empty); nothing to do.");
    }
    Ok(())
}
