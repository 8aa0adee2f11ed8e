use crate::cmd::load_project;
use crate::prompt::DialoguerPrompter;
use shutter_core::interactive::{self, InteractiveOutcome};
use shutter_core::preview::SystemPreviewer;
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let project = load_project(root)?;
    let mut prompter = DialoguerPrompter::default();

    match interactive::run_interactive(&project, &mut prompter, &SystemPreviewer)? {
        InteractiveOutcome::NotReady { content } | InteractiveOutcome::Abandoned { content } => {
            println!("Content template: {}", content.display());
        }
        InteractiveOutcome::Finished {
            service_dir, page, ..
        } => {
            println!("Service folder: {}", service_dir.display());
            println!("HTML output: {}", page.display());
        }
    }
    Ok(())
}
