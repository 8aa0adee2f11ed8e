//! Guided flow for a service owner: scaffold content, build and preview it
//! until they are happy, then commit it.

use crate::builder::BuildMode;
use crate::error::{Result, ShutterError};
use crate::git;
use crate::paths;
use crate::preview::Previewer;
use crate::project::Project;
use crate::scaffold;
use crate::workflow::bundle_and_build;
use std::path::PathBuf;

/// Question-and-answer seam over the terminal.
pub trait Prompter {
    /// Ask for free text, re-asking until `validate` accepts the answer.
    fn input(
        &mut self,
        message: &str,
        validate: &dyn Fn(&str) -> std::result::Result<(), String>,
    ) -> Result<String>;

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractiveOutcome {
    /// The operator wanted to edit the content before the first build.
    NotReady { content: PathBuf },
    /// The operator was unhappy with a build and declined to rebuild.
    Abandoned { content: PathBuf },
    Finished {
        service_dir: PathBuf,
        page: PathBuf,
        committed: bool,
    },
}

pub fn commit_message(service: &str) -> String {
    format!("Committing {service} custom shuttering content")
}

pub fn run_interactive(
    project: &Project,
    prompter: &mut dyn Prompter,
    previewer: &dyn Previewer,
) -> Result<InteractiveOutcome> {
    let service = prompter.input("What is your service name?", &paths::tenant_prompt_check)?;
    let service = service.trim();

    tracing::info!("Creating folder structure for service: {service}");
    scaffold::scaffold(project, service)?;
    let service_dir = project.tenant_dir(service);
    let content = project.content_template(service);

    tracing::info!("Please edit the content.njk file at:\n  {}", content.display());
    if !prompter.confirm("Are you ready to build the HTML?", false)? {
        tracing::info!("Please edit the content.njk file and run this command again.");
        return Ok(InteractiveOutcome::NotReady { content });
    }

    let page = project.page_path();
    loop {
        tracing::info!("Building HTML...");
        bundle_and_build(project, service, BuildMode::Development)?;

        if !page.is_file() {
            return Err(ShutterError::PageNotBuilt(page.display().to_string()));
        }
        tracing::info!("Opening {} in browser...", page.display());
        previewer.open(&page)?;

        if prompter.confirm("Are you happy with the result?", true)? {
            break;
        }
        tracing::info!("Edit the content.njk file when ready:\n  {}", content.display());
        if !prompter.confirm("Ready to rebuild?", false)? {
            tracing::info!("Exiting. You can run this command again when ready.");
            return Ok(InteractiveOutcome::Abandoned { content });
        }
    }

    let mut committed = false;
    if prompter.confirm("Would you like to create a git commit with the new content?", true)? {
        tracing::info!("Creating git commit...");
        match git::commit_path(project.root(), &service_dir, &commit_message(service)) {
            Ok(()) => {
                tracing::info!("Git commit created successfully!");
                committed = true;
            }
            Err(e) => {
                tracing::error!("Git commit failed: {e}");
                tracing::info!("You can manually commit the changes later.");
            }
        }
    }

    tracing::info!("✅ All done! Your shuttering page is ready.");
    tracing::info!("Service folder: {}", service_dir.display());
    tracing::info!("HTML output: {}", page.display());
    Ok(InteractiveOutcome::Finished {
        service_dir,
        page,
        committed,
    })
}
