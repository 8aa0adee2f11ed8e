use crate::cmd::{linter, load_project};
use crate::output::print_bracketed;
use shutter_core::validate;
use std::path::Path;

pub fn run(root: &Path, services: &[String]) -> anyhow::Result<()> {
    let project = load_project(root)?;
    let linter = linter(&project);

    let report = validate::validate_services(&project, &linter, services)?;
    print_bracketed(&report)?;

    if !report.all_valid {
        anyhow::bail!(
            "{} of {} service(s) failed HTML validation",
            report.failed(),
            report.results.len()
        );
    }
    tracing::info!("All HTML validation passed!");
    Ok(())
}
