use crate::error::{Result, ShutterError};
use crate::io;
use crate::lint::{LintMessage, Linter};
use crate::project::Project;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const HTML_NOT_GENERATED: &str = "HTML file not generated";

// ---------------------------------------------------------------------------
// ValidationResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub service: String,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_count: Option<usize>,
    #[serde(default)]
    pub errors: Vec<LintMessage>,
    /// Set when the page could not be linted at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn passed(service: &str) -> Self {
        Self {
            service: service.to_string(),
            valid: true,
            error_count: None,
            errors: Vec::new(),
            error: None,
        }
    }

    pub fn failed_with(service: &str, error: impl Into<String>) -> Self {
        Self {
            service: service.to_string(),
            valid: false,
            error_count: None,
            errors: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn lint_errors(service: &str, errors: Vec<LintMessage>) -> Self {
        Self {
            service: service.to_string(),
            valid: false,
            error_count: Some(errors.len()),
            errors,
            error: None,
        }
    }
}

// ---------------------------------------------------------------------------
// ValidationReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub all_valid: bool,
    pub results: Vec<ValidationResult>,
}

impl ValidationReport {
    pub fn new(results: Vec<ValidationResult>) -> Self {
        let all_valid = results.iter().all(|r| r.valid);
        Self { all_valid, results }
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.valid).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ShutterError::ResultsNotFound(path.display().to_string()));
        }
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        io::write_json(path, self)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Lint the built page for one service. Never fails: problems are recorded
/// in the returned result.
pub fn validate_service(project: &Project, linter: &dyn Linter, service: &str) -> ValidationResult {
    tracing::info!("Validating: {service}");

    let page = project.page_path();
    if !page.is_file() {
        tracing::error!("✗ HTML file not found: {}", page.display());
        return ValidationResult::failed_with(service, HTML_NOT_GENERATED);
    }

    let messages = match linter.lint(&page) {
        Ok(messages) => messages,
        Err(e) => {
            tracing::error!("✗ Error validating {service}: {e}");
            return ValidationResult::failed_with(service, e.to_string());
        }
    };

    let errors: Vec<LintMessage> = messages.into_iter().filter(|m| m.is_error()).collect();
    if errors.is_empty() {
        tracing::info!("✓ HTML validation passed for {service}");
        return ValidationResult::passed(service);
    }

    let n = errors.len();
    tracing::error!(
        "✗ HTML validation failed for {service} ({n} error{})",
        if n == 1 { "" } else { "s" }
    );
    for err in &errors {
        tracing::error!(
            "  Line {}:{} - {} ({})",
            err.line,
            err.column,
            err.message,
            err.rule_id
        );
    }
    ValidationResult::lint_errors(service, errors)
}

/// Validate every service in order and write the aggregate results file.
pub fn validate_services(
    project: &Project,
    linter: &dyn Linter,
    services: &[String],
) -> Result<ValidationReport> {
    if services.is_empty() {
        return Err(ShutterError::NoServices);
    }
    tracing::info!("Validating HTML for {} service(s)...", services.len());

    let results = services
        .iter()
        .map(|s| validate_service(project, linter, s))
        .collect();
    let report = ValidationReport::new(results);

    tracing::info!("=== Validation Summary ===");
    tracing::info!(
        "Total services: {}, Passed: {}, Failed: {}",
        report.results.len(),
        report.passed(),
        report.failed()
    );

    let out = project.validation_results();
    report.save(&out)?;
    tracing::info!("Results written to: {}", out.display());
    Ok(report)
}
