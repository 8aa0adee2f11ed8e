//! Change detection: which tenants had their content template added or
//! modified relative to a base ref.

use crate::error::Result;
use crate::git;
use crate::paths;
use crate::project::Project;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const NO_CHANGES_MESSAGE: &str = "No content.njk files changed or added";
pub const NO_SERVICES_MESSAGE: &str = "No valid service names extracted";
pub const SERVICES_PREFIX: &str = "Services to build: ";

/// The JSON line printed by the detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeReport {
    pub services: Vec<String>,
    pub count: usize,
}

impl ChangeReport {
    pub fn new(services: Vec<String>) -> Self {
        let count = services.len();
        Self { services, count }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeSet {
    /// The diff matched no files at all.
    NoChanges,
    /// Files changed but none had the tenant path shape.
    NoServices { files: Vec<String> },
    Services(ChangeReport),
}

static TENANT_PATH_RE: OnceLock<Regex> = OnceLock::new();
static REPORT_LINE_RE: OnceLock<Regex> = OnceLock::new();
static SERVICES_LINE_RE: OnceLock<Regex> = OnceLock::new();

fn tenant_path_re() -> &'static Regex {
    TENANT_PATH_RE.get_or_init(|| Regex::new(r"tenants/([^/]+)/content\.njk").unwrap())
}

fn report_line_re() -> &'static Regex {
    REPORT_LINE_RE
        .get_or_init(|| Regex::new(r#"\{"services":\[([^\]]*)\],"count":\d+\}"#).unwrap())
}

fn services_line_re() -> &'static Regex {
    SERVICES_LINE_RE.get_or_init(|| Regex::new(r"Services to build: ([^\n]+)").unwrap())
}

/// Extract the tenant id from a changed path, if it has the tenant shape.
pub fn tenant_from_path(path: &str) -> Option<&str> {
    tenant_path_re()
        .captures(path)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Classify a list of changed file names.
pub fn classify(files: Vec<String>) -> ChangeSet {
    if files.is_empty() {
        return ChangeSet::NoChanges;
    }
    let services: Vec<String> = files
        .iter()
        .filter_map(|f| tenant_from_path(f))
        .map(str::to_string)
        .collect();
    if services.is_empty() {
        return ChangeSet::NoServices { files };
    }
    ChangeSet::Services(ChangeReport::new(services))
}

/// Diff `base...HEAD` for added or modified tenant content templates.
pub fn detect(project: &Project, base: &str) -> Result<ChangeSet> {
    tracing::info!(
        "Detecting changed/new {} files in tenants/ against {base}...",
        paths::CONTENT_TEMPLATE
    );

    let pathspec = format!(
        "{}/*/{}",
        project.config.paths.tenants.display(),
        paths::CONTENT_TEMPLATE
    );
    let files = git::changed_files(project.root(), base, &pathspec)?;

    let set = classify(files);
    match &set {
        ChangeSet::NoChanges => tracing::warn!("{NO_CHANGES_MESSAGE}"),
        ChangeSet::NoServices { files } => {
            tracing::info!("Changed/new files:\n{}", files.join("\n"));
            tracing::warn!("{NO_SERVICES_MESSAGE}");
        }
        ChangeSet::Services(report) => {
            tracing::info!("{SERVICES_PREFIX}{}", report.services.join(", "));
        }
    }
    Ok(set)
}

/// Recover a [`ChangeSet`] from captured detector output.
///
/// Tries the JSON line first, then the `Services to build:` log line, then
/// the "no changes" message. Output matching none of these yields
/// `NoServices`.
pub fn parse_detector_output(output: &str) -> ChangeSet {
    if let Some(m) = report_line_re().find(output) {
        match serde_json::from_str::<ChangeReport>(m.as_str()) {
            Ok(report) if !report.services.is_empty() => return ChangeSet::Services(report),
            Ok(_) => {}
            Err(e) => tracing::warn!("Could not parse JSON output ({e}), trying alternative parsing"),
        }
    }

    if let Some(caps) = services_line_re().captures(output) {
        let services: Vec<String> = caps[1]
            .split(", ")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if !services.is_empty() {
            return ChangeSet::Services(ChangeReport::new(services));
        }
    }

    if output.contains(NO_CHANGES_MESSAGE) {
        return ChangeSet::NoChanges;
    }

    if !output.contains(NO_SERVICES_MESSAGE) {
        tracing::warn!("Detector output contained no service list");
    }
    ChangeSet::NoServices { files: Vec::new() }
}
