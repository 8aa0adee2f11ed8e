#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use shutter_core::report::extract_bracketed;
use std::path::Path;
use tempfile::TempDir;

fn shutter(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("shutter").unwrap();
    cmd.current_dir(dir.path())
        .env("SHUTTER_ROOT", dir.path())
        .env_remove("NODE_ENV")
        .env("LOG_LEVEL", "warn");
    cmd
}

const CONFIG: &str = r#"paths:
  tenants: tenants
tools:
  linter: [sh, lint.sh]
  bundler: []
"#;

const LAYOUT: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <!-- layout -->
    <title>{{ pageTitle }}</title>
  </head>
  <body>
    {% block content %}{% endblock %}
  </body>
</html>
"#;

const INDEX_VIEW: &str = r#"{% extends "templates/layout.njk" %}
{% block content %}
    <h1>{{ serviceName }}</h1>
    {% include service ~ "/content.njk" %}
{% endblock %}
"#;

const CLEAN_LINT: &str = "echo '[]'\n";

const FAILING_LINT: &str = r#"printf '%s' '[{"filePath":"index.html","messages":[{"ruleId":"close-order","severity":2,"message":"Mismatched close-tag","line":3,"column":5}]}]'
exit 1
"#;

fn write(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, body).unwrap();
}

/// A shuttering template checkout with a shell script standing in for the
/// HTML linter.
fn init_project(dir: &TempDir) {
    let root = dir.path();
    write(root, "package.json", r#"{"dependencies":{"govuk-frontend":"5.10.2"}}"#);
    write(root, "shutter.yaml", CONFIG);
    write(root, "lint.sh", CLEAN_LINT);
    write(root, "src/templates/layout.njk", LAYOUT);
    write(root, "src/templates/views/index.njk", INDEX_VIEW);
    write(
        root,
        "src/templates/common/content.njk",
        "<p class=\"govuk-body\">You will be able to use the service later.</p>\n",
    );
}

fn create_tenant(dir: &TempDir, service: &str) {
    shutter(dir)
        .args(["create", &format!("--service={service}")])
        .assert()
        .success();
}

fn git(dir: &TempDir, args: &[&str]) {
    let status = std::process::Command::new("git")
        .args(args)
        .current_dir(dir.path())
        .status()
        .unwrap();
    assert!(status.success(), "git {args:?} failed");
}

// ---------------------------------------------------------------------------
// shutter create
// ---------------------------------------------------------------------------

#[test]
fn create_copies_common_template() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    shutter(&dir)
        .args(["create", "--service=tax-service"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tenants/tax-service"));

    let content = std::fs::read_to_string(dir.path().join("tenants/tax-service/content.njk")).unwrap();
    assert!(content.contains("You will be able to use the service later."));
}

#[test]
fn create_rejects_invalid_name() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    shutter(&dir)
        .args(["create", "--service=Tax_Service"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid service name"));
    assert!(!dir.path().join("tenants").exists());
}

#[test]
fn create_outside_project_fails() {
    let dir = TempDir::new().unwrap();
    shutter(&dir)
        .args(["create", "--service=tax-service"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("package.json"));
}

// ---------------------------------------------------------------------------
// shutter build
// ---------------------------------------------------------------------------

#[test]
fn build_production_minifies() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    create_tenant(&dir, "tax-service");

    shutter(&dir)
        .args(["build", "--service=tax-service"])
        .env("NODE_ENV", "production")
        .assert()
        .success();

    let html = std::fs::read_to_string(dir.path().join(".dist/index.html")).unwrap();
    assert!(html.contains("You will be able to use the service later."));
    assert!(html.contains("Service Unavailable"));
    assert!(!html.contains("<!-- layout -->"));
}

#[test]
fn build_development_keeps_formatting() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    create_tenant(&dir, "tax-service");

    shutter(&dir)
        .args(["build", "--service=tax-service", "--env=development"])
        .assert()
        .success();

    let html = std::fs::read_to_string(dir.path().join(".dist/index.html")).unwrap();
    assert!(html.contains("<!-- layout -->"));
}

#[test]
fn build_unknown_tenant_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    shutter(&dir)
        .args(["build", "--service=ghost"])
        .assert()
        .failure();
}

// ---------------------------------------------------------------------------
// shutter validate / comment
// ---------------------------------------------------------------------------

#[test]
fn validate_requires_a_service() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    shutter(&dir)
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--service"));
}

#[cfg(unix)]
#[test]
fn validate_clean_page_prints_bracketed_json() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    create_tenant(&dir, "tax-service");
    shutter(&dir).args(["build", "--service=tax-service"]).assert().success();

    let out = shutter(&dir)
        .args(["validate", "--service=tax-service"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(out).unwrap();
    let json: serde_json::Value = serde_json::from_str(extract_bracketed(&stdout).unwrap()).unwrap();
    assert_eq!(json["allValid"], true);
    assert_eq!(json["results"][0]["service"], "tax-service");
    assert!(dir.path().join(".dist/validation-results.json").exists());
}

#[cfg(unix)]
#[test]
fn validate_and_comment_report_lint_errors() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    write(dir.path(), "lint.sh", FAILING_LINT);
    create_tenant(&dir, "tax-service");
    shutter(&dir).args(["build", "--service=tax-service"]).assert().success();

    shutter(&dir)
        .args(["validate", "--service=tax-service"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("--- JSON OUTPUT START ---"));

    shutter(&dir)
        .arg("comment")
        .assert()
        .failure()
        .stdout(predicate::str::contains("=== COMMENT PREVIEW ==="))
        .stdout(predicate::str::contains("**1 validation error found:**"))
        .stdout(predicate::str::contains(
            "- Line 3:5 - Mismatched close-tag (`close-order`)",
        ));

    let comment = std::fs::read_to_string(dir.path().join(".dist/validation-comment.md")).unwrap();
    assert!(comment.ends_with("Please fix validation errors before merging."));
}

#[test]
fn validate_missing_page_is_recorded() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    shutter(&dir)
        .args(["validate", "--service=tax-service"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("HTML file not generated"));
}

#[test]
fn comment_without_results_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    shutter(&dir)
        .arg("comment")
        .assert()
        .failure()
        .stderr(predicate::str::contains("validation-results.json not found"));
}

#[test]
fn comment_for_valid_results_succeeds() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    write(
        dir.path(),
        ".dist/validation-results.json",
        r#"{"allValid":true,"results":[{"service":"tax-service","valid":true,"errors":[]}]}"#,
    );

    shutter(&dir)
        .arg("comment")
        .assert()
        .success()
        .stdout(predicate::str::contains("## ✅ Shuttering Page Validation"))
        .stdout(predicate::str::contains("HTML validation passed - no errors found"))
        .stdout(predicate::str::contains("- Line").not());
}

// ---------------------------------------------------------------------------
// shutter screenshot
// ---------------------------------------------------------------------------

#[test]
fn screenshot_requires_a_service() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    shutter(&dir).arg("screenshot").assert().failure();
    assert!(!dir.path().join(".dist/screenshot-results.json").exists());
}

// ---------------------------------------------------------------------------
// shutter detect-changes
// ---------------------------------------------------------------------------

#[test]
fn detect_changes_prints_json_line() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    git(&dir, &["init", "-q"]);
    git(&dir, &["config", "user.name", "test-user"]);
    git(&dir, &["config", "user.email", "test@example.com"]);
    git(&dir, &["config", "commit.gpgsign", "false"]);
    git(&dir, &["commit", "-q", "--allow-empty", "-m", "initial"]);
    git(&dir, &["tag", "base"]);
    write(dir.path(), "tenants/tax-service/content.njk", "<p>Tax</p>");
    write(dir.path(), "tenants/README.md", "notes");
    git(&dir, &["add", "tenants"]);
    git(&dir, &["commit", "-q", "-m", "tenant content"]);

    shutter(&dir)
        .args(["detect-changes", "--base-branch=base"])
        .assert()
        .success()
        .stdout(predicate::str::diff("{\"services\":[\"tax-service\"],\"count\":1}\n"));
}

#[test]
fn detect_changes_outside_git_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    shutter(&dir)
        .args(["detect-changes", "--base-branch=base"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("git"));
}

// ---------------------------------------------------------------------------
// shutter workflow --ci
// ---------------------------------------------------------------------------

#[test]
fn ci_workflow_with_no_changes_succeeds() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    write(dir.path(), "changes.txt", "No content.njk files changed or added\n");

    shutter(&dir)
        .args(["workflow", "--ci", "--changes-from=changes.txt"])
        .assert()
        .success();
    assert!(!dir.path().join(".dist/validation-results.json").exists());
}

#[cfg(unix)]
#[test]
fn ci_workflow_recovers_services_from_fallback_line() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    create_tenant(&dir, "tax-service");
    write(dir.path(), "changes.txt", "INFO Services to build: tax-service\n");

    shutter(&dir)
        .args([
            "workflow",
            "--ci",
            "--skip-screenshot",
            "--changes-from=changes.txt",
        ])
        .assert()
        .success();

    let comment = std::fs::read_to_string(dir.path().join(".dist/validation-comment.md")).unwrap();
    assert!(comment.contains("### ✅ tax-service"));
}

#[cfg(unix)]
#[test]
fn ci_workflow_fails_on_invalid_tenant() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    write(dir.path(), "lint.sh", FAILING_LINT);
    create_tenant(&dir, "tax-service");
    write(dir.path(), "changes.txt", r#"{"services":["tax-service"],"count":1}"#);

    shutter(&dir)
        .args([
            "workflow",
            "--ci",
            "--skip-screenshot",
            "--changes-from=changes.txt",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("HTML validation failed for tax-service"));
}

// ---------------------------------------------------------------------------
// shutter config / clean
// ---------------------------------------------------------------------------

#[test]
fn config_show_json_reports_effective_values() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let out = shutter(&dir)
        .args(["config", "show", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["paths"]["tenants"], "tenants");
    assert_eq!(json["paths"]["dist"], ".dist");
    assert_eq!(json["screenshot"]["width"], 1280);
    assert_eq!(json["git"]["base_branch"], "origin/main");
}

#[test]
fn config_init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();

    shutter(&dir).args(["config", "init"]).assert().success();
    assert!(dir.path().join("shutter.yaml").exists());

    shutter(&dir)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    shutter(&dir).args(["config", "init", "--force"]).assert().success();
}

#[test]
fn config_validate_flags_zero_viewport() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "shutter.yaml", "screenshot:\n  width: 0\n");

    shutter(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[warning] screenshot"));
}

#[test]
fn clean_removes_build_output() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    write(dir.path(), ".dist/index.html", "<html></html>");

    shutter(&dir).arg("clean").assert().success();
    assert!(!dir.path().join(".dist").exists());

    shutter(&dir)
        .arg("clean")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to clean"));
}

#[test]
fn numeric_log_level_still_logs() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    shutter(&dir)
        .env("LOG_LEVEL", "3")
        .args(["create", "--service=tax-service"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Copy complete!"));
}
