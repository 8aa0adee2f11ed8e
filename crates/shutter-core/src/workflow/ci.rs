//! CI run: build and validate every tenant whose content changed on the
//! branch, then compose one comment and screenshot them all.

use super::{bundle_and_build, Toolchain};
use crate::builder::BuildMode;
use crate::changes::{self, ChangeSet};
use crate::comment::{self, Comment};
use crate::error::{Result, ShutterError};
use crate::project::Project;
use crate::screenshot::{self, ScreenshotReport};
use crate::validate::{self, ValidationReport};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct CiOptions {
    pub base_branch: String,
    pub skip_screenshot: bool,
    /// Captured detector output to read instead of running detection.
    pub changes_from: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct CiSummary {
    pub services: Vec<String>,
    pub validation: Option<ValidationReport>,
    pub comment: Option<Comment>,
    pub screenshots: Option<ScreenshotReport>,
    pub duration: Duration,
}

fn detect(project: &Project, opts: &CiOptions) -> Result<ChangeSet> {
    match &opts.changes_from {
        Some(path) => {
            tracing::info!("Reading detector output from {}", path.display());
            let output = std::fs::read_to_string(path)?;
            Ok(changes::parse_detector_output(&output))
        }
        None => changes::detect(project, &opts.base_branch),
    }
}

/// Run the CI pipeline. The first tenant that fails validation ends the run
/// with [`ShutterError::ValidationFailed`]; screenshot problems only warn.
pub fn run_ci(project: &Project, tools: &Toolchain<'_>, opts: &CiOptions) -> Result<CiSummary> {
    let started = Instant::now();
    let mut summary = CiSummary::default();

    tracing::info!("CI workflow: validate shuttering pages");
    project.ensure_project_root()?;

    tracing::info!("Step 1: Detecting changed content files...");
    let services = match detect(project, opts)? {
        ChangeSet::NoChanges => {
            tracing::info!("No content.njk files changed - skipping validation");
            return Ok(summary);
        }
        ChangeSet::NoServices { .. } => {
            tracing::info!("No services to validate");
            return Ok(summary);
        }
        ChangeSet::Services(report) => report.services,
    };
    tracing::info!("Services to validate: {}", services.join(", "));

    let results_path = project.validation_results();
    let mut results = Vec::with_capacity(services.len());
    for service in &services {
        tracing::info!("Building service: {service}");
        bundle_and_build(project, service, BuildMode::Production)?;

        tracing::info!("Validating HTML for: {service}");
        let result = validate::validate_service(project, tools.linter, service);
        let valid = result.valid;
        results.push(result);
        ValidationReport::new(results.clone()).save(&results_path)?;
        if !valid {
            tracing::error!("HTML validation failed for {service}");
            return Err(ShutterError::ValidationFailed(service.clone()));
        }
    }
    let report = ValidationReport::new(results);

    tracing::info!("Generating validation comment");
    let comment = comment::compose_from(project, &report)?;
    tracing::info!("Comment preview:\n{}", comment.body);

    if opts.skip_screenshot {
        tracing::info!("Skipping screenshot generation (--skip-screenshot)");
    } else {
        tracing::info!("Generating screenshots");
        let out_dir = project.screenshots_dir();
        let mut rebuild = |service: &str| {
            bundle_and_build(project, service, BuildMode::Production).map(|_| ())
        };
        match screenshot::generate_screenshots(
            project,
            tools.browser,
            &services,
            &out_dir,
            &mut rebuild,
        ) {
            Ok(shots) => {
                for failed in shots.results.iter().filter(|r| !r.success) {
                    tracing::warn!("Screenshot generation failed for {}", failed.service);
                }
                summary.screenshots = Some(shots);
            }
            Err(e) => tracing::warn!("Screenshot generation failed: {e}"),
        }
    }

    summary.duration = started.elapsed();
    tracing::info!(
        "All shuttering pages passed validation in {:.2}s",
        summary.duration.as_secs_f64()
    );

    tracing::info!("Generated files:");
    let mut files = vec![results_path, comment.path.clone()];
    if !opts.skip_screenshot {
        files.push(project.screenshot_results());
        files.push(project.screenshots_dir().join("*.png"));
    }
    for file in &files {
        tracing::info!("  - {}", file.display());
    }

    summary.services = services;
    summary.validation = Some(report);
    summary.comment = Some(comment);
    Ok(summary)
}
