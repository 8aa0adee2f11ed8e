//! Markdown summary of a validation run, suitable for posting on a pull request.

use crate::error::Result;
use crate::io;
use crate::project::Project;
use crate::validate::{ValidationReport, ValidationResult};
use std::fmt::Write;
use std::path::PathBuf;

/// Lint errors listed per service before the remainder is summarised.
pub const MAX_LISTED_ERRORS: usize = 10;

pub const PREVIEW_START: &str = "=== COMMENT PREVIEW ===";
pub const PREVIEW_END: &str = "=== END PREVIEW ===";

fn icon(ok: bool) -> &'static str {
    if ok {
        "✅"
    } else {
        "❌"
    }
}

fn render_result(out: &mut String, result: &ValidationResult) {
    let _ = write!(out, "### {} {}\n\n", icon(result.valid), result.service);

    if result.valid {
        out.push_str("HTML validation passed - no errors found\n\n");
        return;
    }
    if let Some(error) = &result.error {
        let _ = write!(out, "**Error:** {error}\n\n");
        return;
    }

    let count = result.error_count.unwrap_or(result.errors.len());
    let _ = write!(
        out,
        "**{count} validation error{} found:**\n\n",
        if count > 1 { "s" } else { "" }
    );
    for err in result.errors.iter().take(MAX_LISTED_ERRORS) {
        let _ = writeln!(
            out,
            "- Line {}:{} - {} (`{}`)",
            err.line, err.column, err.message, err.rule_id
        );
    }
    if result.errors.len() > MAX_LISTED_ERRORS {
        let _ = writeln!(
            out,
            "\n... and {} more errors",
            result.errors.len() - MAX_LISTED_ERRORS
        );
    }
    out.push('\n');
}

/// Render the pull-request comment for `report`.
pub fn render_comment(report: &ValidationReport) -> String {
    let status = if report.all_valid {
        "All shuttering pages passed validation!"
    } else {
        "Some shuttering pages have validation errors"
    };
    let closing = if report.all_valid {
        "All pages are ready for preview below."
    } else {
        "Please fix validation errors before merging."
    };

    let mut results = String::new();
    for result in &report.results {
        render_result(&mut results, result);
    }

    format!(
        "## {} Shuttering Page Validation\n\n**Status:** {status}\n\n{results}\n\n{closing}",
        icon(report.all_valid)
    )
}

/// A composed comment and where it was written.
#[derive(Debug, Clone)]
pub struct Comment {
    pub body: String,
    pub all_valid: bool,
    pub path: PathBuf,
}

impl Comment {
    /// The body wrapped in preview marker lines.
    pub fn preview(&self) -> String {
        format!("{PREVIEW_START}\n{}\n{PREVIEW_END}", self.body)
    }
}

/// Read `validation-results.json`, render the comment and write
/// `validation-comment.md` next to it.
pub fn compose(project: &Project) -> Result<Comment> {
    let results_path = project.validation_results();
    let report = ValidationReport::load(&results_path).inspect_err(|_| {
        tracing::warn!("Run validation first: shutter validate --service=<service>");
    })?;
    compose_from(project, &report)
}

/// Render and write the comment for an in-memory report.
pub fn compose_from(project: &Project, report: &ValidationReport) -> Result<Comment> {
    let body = render_comment(report);
    let path = project.validation_comment();
    io::atomic_write(&path, body.as_bytes())?;
    tracing::info!("Comment markdown written to: {}", path.display());
    Ok(Comment {
        body,
        all_valid: report.all_valid,
        path,
    })
}
