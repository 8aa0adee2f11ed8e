use crate::error::{Result, ShutterError};
use regex::Regex;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Fixed file names
// ---------------------------------------------------------------------------

pub const CONFIG_FILE: &str = "shutter.yaml";
pub const PACKAGE_MANIFEST: &str = "package.json";

pub const CONTENT_TEMPLATE: &str = "content.njk";
pub const TEMPLATE_EXTENSION: &str = "njk";
pub const VIEWS_PREFIX: &str = "templates/views";

pub const INDEX_HTML: &str = "index.html";
pub const ASSETS_DIR: &str = "assets";
pub const ASSETS_MANIFEST: &str = "assets-manifest.json";
pub const VALIDATION_RESULTS: &str = "validation-results.json";
pub const VALIDATION_COMMENT: &str = "validation-comment.md";
pub const SCREENSHOT_RESULTS: &str = "screenshot-results.json";
pub const SCREENSHOTS_DIR: &str = "screenshots";

// ---------------------------------------------------------------------------
// Tenant id validation
// ---------------------------------------------------------------------------

static TENANT_RE: OnceLock<Regex> = OnceLock::new();

fn tenant_re() -> &'static Regex {
    TENANT_RE.get_or_init(|| Regex::new(r"^[a-z0-9-]+$").expect("static regex"))
}

pub fn is_valid_tenant(id: &str) -> bool {
    tenant_re().is_match(id)
}

pub fn validate_tenant(id: &str) -> Result<()> {
    if !is_valid_tenant(id) {
        return Err(ShutterError::InvalidTenant(id.to_string()));
    }
    Ok(())
}

/// Prompt-style check used by the interactive flow: returns the message to
/// show the operator instead of an error value.
pub fn tenant_prompt_check(input: &str) -> std::result::Result<(), String> {
    if input.trim().is_empty() {
        return Err("Service name cannot be empty".to_string());
    }
    if !is_valid_tenant(input) {
        return Err(
            "Service name can only contain lowercase letters, numbers, and hyphens".to_string(),
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
