//! End-to-end runs of the whole pipeline: a local smoke test against a
//! throwaway tenant, and the CI run over tenants changed on a branch.

pub mod ci;
pub mod standalone;

pub use ci::{run_ci, CiOptions, CiSummary};
pub use standalone::{run_standalone, StandaloneOptions};

use crate::builder::{self, BuildMode, BuildOutput};
use crate::bundle;
use crate::error::Result;
use crate::io;
use crate::lint::Linter;
use crate::preview::Previewer;
use crate::project::Project;
use crate::screenshot::BrowserLauncher;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

/// The external collaborators a workflow drives.
#[derive(Clone, Copy)]
pub struct Toolchain<'a> {
    pub linter: &'a dyn Linter,
    pub browser: &'a dyn BrowserLauncher,
    pub previewer: &'a dyn Previewer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub name: String,
    pub success: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct WorkflowSummary {
    pub steps: Vec<StepRecord>,
    pub passed: usize,
    pub failed: usize,
    #[serde(skip)]
    pub duration: Duration,
}

impl WorkflowSummary {
    pub fn record(&mut self, name: &str, success: bool) {
        if success {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.steps.push(StepRecord {
            name: name.to_string(),
            success,
        });
    }

    pub fn failed_steps(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().filter(|s| !s.success).map(|s| s.name.as_str())
    }

    pub fn succeeded(&self) -> bool {
        self.failed == 0
    }

    pub fn step(&self, name: &str) -> Option<&StepRecord> {
        self.steps.iter().find(|s| s.name == name)
    }
}

/// Run the bundler, then render the tenant's pages.
pub fn bundle_and_build(project: &Project, service: &str, mode: BuildMode) -> Result<BuildOutput> {
    bundle::run_bundler(project, mode)?;
    builder::build(project, service, mode)
}

/// Log whether `path` exists, with its size. Returns whether it exists.
pub(crate) fn verify_file(path: &Path, description: &str) -> bool {
    match std::fs::metadata(path) {
        Ok(meta) => {
            tracing::info!(
                "✓ {description}: {} ({})",
                path.display(),
                io::format_bytes(meta.len())
            );
            true
        }
        Err(_) => {
            tracing::error!("✗ {description}: {} NOT FOUND", path.display());
            false
        }
    }
}
