use crate::cmd::load_project;
use crate::output::print_json;
use shutter_core::scaffold;
use std::path::Path;

pub fn run(root: &Path, service: &str, json: bool) -> anyhow::Result<()> {
    let project = load_project(root)?;
    let copied = scaffold::scaffold(&project, service)?;

    if json {
        print_json(&serde_json::json!({
            "service": service,
            "folder": project.tenant_dir(service),
            "files": copied,
        }))?;
    } else {
        println!("Created {} ({} file(s))", project.tenant_dir(service).display(), copied.len());
        println!("Edit {} to customise the page.", project.content_template(service).display());
    }
    Ok(())
}
