//! HTML linting seam and the html-validate subprocess implementation.

use crate::bundle;
use crate::error::{Result, ShutterError};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Linter severity: 1 = warning, 2 = error.
pub const SEVERITY_WARNING: u8 = 1;
pub const SEVERITY_ERROR: u8 = 2;

/// Rules from the recommended preset that conflict with the design system's
/// own markup.
pub const DISABLED_RULES: [&str; 4] = [
    "require-sri",
    "no-inline-style",
    "attribute-boolean-style",
    "no-trailing-whitespace",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintMessage {
    pub line: u32,
    pub column: u32,
    pub message: String,
    pub rule_id: String,
    pub severity: u8,
}

impl LintMessage {
    pub fn is_error(&self) -> bool {
        self.severity == SEVERITY_ERROR
    }
}

pub trait Linter {
    /// Lint the HTML document at `page`, returning every message regardless of
    /// severity. `Err` means the linter itself could not run.
    fn lint(&self, page: &Path) -> Result<Vec<LintMessage>>;
}

// ---------------------------------------------------------------------------
// html-validate
// ---------------------------------------------------------------------------

/// Runs the `html-validate` CLI with the JSON formatter.
pub struct HtmlValidate {
    command: Vec<String>,
    cwd: PathBuf,
}

impl HtmlValidate {
    pub fn new(command: Vec<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            command,
            cwd: cwd.into(),
        }
    }

    /// The rule configuration passed via `--config`.
    pub fn config_json() -> serde_json::Value {
        let rules: serde_json::Map<String, serde_json::Value> = DISABLED_RULES
            .iter()
            .map(|r| (r.to_string(), serde_json::Value::from("off")))
            .collect();
        serde_json::json!({
            "extends": ["html-validate:recommended"],
            "rules": rules,
        })
    }
}

impl Linter for HtmlValidate {
    fn lint(&self, page: &Path) -> Result<Vec<LintMessage>> {
        let mut config = tempfile::Builder::new()
            .prefix("htmlvalidate")
            .suffix(".json")
            .tempfile()?;
        config.write_all(serde_json::to_string(&Self::config_json())?.as_bytes())?;
        config.flush()?;

        let tool = self.command.join(" ");
        let mut cmd = bundle::command_for(&self.command, &self.cwd)?;
        cmd.arg("--config")
            .arg(config.path())
            .args(["--formatter", "json"])
            .arg(page);
        let output = bundle::capture(&tool, &mut cmd)?;

        // html-validate exits 1 when it reports errors; the report is still
        // on stdout. Anything unparseable means the tool itself failed.
        let stdout = String::from_utf8_lossy(&output.stdout);
        match parse_report(&stdout) {
            Ok(messages) => Ok(messages),
            Err(_) if !output.status.success() => Err(ShutterError::ToolFailed {
                tool,
                status: output.status.to_string(),
                output: String::from_utf8_lossy(&output.stderr)
                    .chars()
                    .take(500)
                    .collect(),
            }),
            Err(e) => Err(e),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FileReport {
    #[serde(default)]
    messages: Vec<RawMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMessage {
    #[serde(default)]
    line: u32,
    #[serde(default)]
    column: u32,
    message: String,
    #[serde(default)]
    rule_id: String,
    severity: u8,
}

/// Parse html-validate's JSON formatter output. Empty output means no
/// messages.
pub fn parse_report(stdout: &str) -> Result<Vec<LintMessage>> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let files: Vec<FileReport> = serde_json::from_str(trimmed)?;
    Ok(files
        .into_iter()
        .flat_map(|f| f.messages)
        .map(|m| LintMessage {
            line: m.line,
            column: m.column,
            message: m.message,
            rule_id: m.rule_id,
            severity: m.severity,
        })
        .collect())
}
