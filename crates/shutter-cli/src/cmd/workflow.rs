use crate::cmd::{linter, load_project};
use crate::output::print_json;
use clap::Args;
use shutter_core::preview::SystemPreviewer;
use shutter_core::screenshot::ChromeLauncher;
use shutter_core::workflow::{self, standalone, CiOptions, StandaloneOptions, Toolchain};
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct WorkflowArgs {
    /// Service name to test with
    #[arg(long, short = 's', default_value = standalone::DEFAULT_SERVICE)]
    service: String,

    /// Run in CI mode: validate tenants changed against the base branch
    #[arg(long)]
    ci: bool,

    /// Base ref to compare against (CI mode; default: git.base_branch from config)
    #[arg(long, short = 'b')]
    base_branch: Option<String>,

    /// Read captured `detect-changes` output instead of running git (CI mode)
    #[arg(long, value_name = "FILE")]
    changes_from: Option<PathBuf>,

    /// Keep the test tenant and build output
    #[arg(long)]
    skip_cleanup: bool,

    /// Skip screenshot generation
    #[arg(long)]
    skip_screenshot: bool,

    /// Open the built page in the default browser
    #[arg(long)]
    open_browser: bool,
}

pub fn run(root: &Path, args: WorkflowArgs, json: bool) -> anyhow::Result<()> {
    let project = load_project(root)?;
    let linter = linter(&project);
    let tools = Toolchain {
        linter: &linter,
        browser: &ChromeLauncher,
        previewer: &SystemPreviewer,
    };

    if args.ci {
        let opts = CiOptions {
            base_branch: args
                .base_branch
                .unwrap_or_else(|| project.config.git.base_branch.clone()),
            skip_screenshot: args.skip_screenshot,
            changes_from: args.changes_from,
        };
        let summary = workflow::run_ci(&project, &tools, &opts)?;
        if json {
            print_json(&serde_json::json!({
                "services": summary.services,
                "validation": summary.validation,
                "screenshots": summary.screenshots,
                "durationSecs": summary.duration.as_secs_f64(),
            }))?;
        }
        return Ok(());
    }

    let opts = StandaloneOptions {
        service: args.service,
        skip_cleanup: args.skip_cleanup,
        skip_screenshot: args.skip_screenshot,
        open_browser: args.open_browser,
    };
    let summary = workflow::run_standalone(&project, &tools, &opts)?;
    if json {
        print_json(&summary)?;
    }
    if !summary.succeeded() {
        anyhow::bail!(
            "{} of {} workflow step(s) failed",
            summary.failed,
            summary.steps.len()
        );
    }
    Ok(())
}
