//! Local smoke test: scaffold a throwaway tenant and push it through every
//! stage, recording each step.

use super::{bundle_and_build, verify_file, Toolchain, WorkflowSummary};
use crate::builder::BuildMode;
use crate::comment;
use crate::error::Result;
use crate::io;
use crate::paths;
use crate::project::Project;
use crate::scaffold;
use crate::screenshot;
use crate::validate;
use std::time::Instant;

pub const DEFAULT_SERVICE: &str = "test-service";

#[derive(Debug, Clone)]
pub struct StandaloneOptions {
    pub service: String,
    pub skip_cleanup: bool,
    pub skip_screenshot: bool,
    pub open_browser: bool,
}

impl Default for StandaloneOptions {
    fn default() -> Self {
        Self {
            service: DEFAULT_SERVICE.to_string(),
            skip_cleanup: false,
            skip_screenshot: false,
            open_browser: false,
        }
    }
}

/// Run every stage against `opts.service`.
///
/// Scaffolding and building abort the run with an error; every other stage is
/// recorded in the returned summary, which has failures if any step failed.
pub fn run_standalone(
    project: &Project,
    tools: &Toolchain<'_>,
    opts: &StandaloneOptions,
) -> Result<WorkflowSummary> {
    let started = Instant::now();
    let service = opts.service.as_str();
    let mut summary = WorkflowSummary::default();

    paths::validate_tenant(service)?;
    tracing::info!("Testing shuttering page workflow for service: {service}");

    tracing::info!("Checking prerequisites...");
    project.ensure_project_root()?;
    let has_browser = tools.browser.is_available();
    if !has_browser && !opts.skip_screenshot {
        tracing::warn!("No Chrome/Chromium found; skipping screenshot steps");
    }

    tracing::info!("Step 1: Cleaning previous build...");
    if let Err(e) = project.clean() {
        tracing::warn!("Clean build directory - failed (continuing): {e}");
    }
    summary.record("Clean build directory", true);

    tracing::info!("Step 2: Creating test service...");
    let tenant_dir = project.tenant_dir(service);
    if tenant_dir.exists() {
        tracing::warn!("Service folder already exists: {}", tenant_dir.display());
        tracing::info!("Removing existing folder...");
        io::remove_dir_if_exists(&tenant_dir)?;
    }
    scaffold::scaffold(project, service)?;
    summary.record(
        "Create service content",
        verify_file(&project.content_template(service), "Content template"),
    );

    tracing::info!("Step 3: Building shuttering page (production)...");
    bundle_and_build(project, service, BuildMode::Production)?;
    let mut built = verify_file(&project.page_path(), "Built HTML");
    if !project.config.tools.bundler.is_empty() {
        built &= verify_file(&project.assets_dir(), "Assets directory");
    }
    summary.record("Build production HTML", built);

    tracing::info!("Step 4: Validating HTML...");
    let services = [service.to_string()];
    let valid = match validate::validate_services(project, tools.linter, &services) {
        Ok(report) => {
            verify_file(&project.validation_results(), "Validation results");
            report.all_valid
        }
        Err(e) => {
            tracing::error!("Validate HTML - failed: {e}");
            false
        }
    };
    if !valid {
        tracing::warn!("HTML validation had issues (see above)");
    }
    summary.record("Validate HTML", valid);

    tracing::info!("Step 5: Generating validation comment...");
    let commented = match comment::compose(project) {
        Ok(c) => {
            tracing::info!("{}", c.preview());
            verify_file(&c.path, "Validation comment") && c.all_valid
        }
        Err(e) => {
            tracing::warn!("Failed to generate validation comment: {e}");
            false
        }
    };
    summary.record("Generate validation comment", commented);

    let screenshots = !opts.skip_screenshot && has_browser;
    if screenshots {
        tracing::info!("Step 6: Generating screenshot...");
        let out_dir = project.screenshots_dir();
        let captured = match screenshot::generate_screenshots(
            project,
            tools.browser,
            &services,
            &out_dir,
            &mut |_| Ok(()),
        ) {
            Ok(report) => {
                report.all_succeeded()
                    && verify_file(&out_dir.join(format!("{service}.png")), "Screenshot")
                    && verify_file(&project.screenshot_results(), "Screenshot results")
            }
            Err(e) => {
                tracing::warn!("Screenshot generation failed: {e}");
                false
            }
        };
        summary.record("Generate screenshot", captured);
    } else {
        tracing::info!("Step 6: Skipping screenshot (browser not available or --skip-screenshot)");
    }

    if opts.open_browser {
        let page = project.page_path();
        if page.is_file() {
            match tools.previewer.open(&page) {
                Ok(()) => tracing::info!("Opened in default browser"),
                Err(e) => tracing::warn!("Could not open {}: {e}", page.display()),
            }
        }
    }

    tracing::info!("Step 7: Verifying output files...");
    let mut expected = vec![
        (project.page_path(), "Built shuttering page"),
        (project.validation_results(), "Validation results"),
        (project.validation_comment(), "Validation comment"),
    ];
    if screenshots {
        expected.push((
            project.screenshots_dir().join(format!("{service}.png")),
            "Screenshot",
        ));
        expected.push((project.screenshot_results(), "Screenshot results"));
    }
    for (path, description) in &expected {
        verify_file(path, description);
    }

    if opts.skip_cleanup {
        tracing::info!("Skipping cleanup (--skip-cleanup)");
        tracing::info!("Service folder: {}", tenant_dir.display());
        tracing::info!("Build output: {}", project.dist_dir().display());
    } else {
        tracing::info!("Step 8: Cleaning up test files...");
        if io::remove_dir_if_exists(&tenant_dir)? {
            tracing::info!("Removed: {}", tenant_dir.display());
        }
        if let Err(e) = project.clean() {
            tracing::warn!("Clean build directory - failed (continuing): {e}");
        }
        summary.record("Cleanup", true);
    }

    summary.duration = started.elapsed();
    let total = summary.steps.len();
    tracing::info!(
        "Workflow test complete in {:.2}s: passed {}/{total}, failed {}/{total}",
        summary.duration.as_secs_f64(),
        summary.passed,
        summary.failed
    );
    if summary.succeeded() {
        tracing::info!("All workflow steps completed successfully!");
    } else {
        tracing::warn!("Failed steps:");
        for name in summary.failed_steps() {
            tracing::error!("  - {name}");
        }
    }
    Ok(summary)
}
