//! Render every page template for one tenant into static HTML.

use crate::error::Result;
use crate::io;
use crate::manifest::{self, AssetManifest};
use crate::paths;
use crate::project::Project;
use minijinja::{AutoEscape, Environment, ErrorKind, Value};
use regex::{Captures, Regex};
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// BuildMode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    Development,
    Production,
}

impl BuildMode {
    /// Interpret a `NODE_ENV`-style value: only `production` minifies.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("production") => BuildMode::Production,
            _ => BuildMode::Development,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BuildMode::Development => "development",
            BuildMode::Production => "production",
        }
    }

    pub fn minifies(self) -> bool {
        self == BuildMode::Production
    }
}

impl std::fmt::Display for BuildMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Build
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub service: String,
    pub mode: BuildMode,
    pub pages: Vec<PathBuf>,
}

/// Render all views for `service` into the build output directory.
pub fn build(project: &Project, service: &str, mode: BuildMode) -> Result<BuildOutput> {
    paths::validate_tenant(service)?;
    tracing::info!("Building html and assets for service: {service} ({mode})...");

    let assets = AssetManifest::load_or_empty(&project.assets_manifest());
    let design_system_version = manifest::dependency_version(
        &project.package_manifest(),
        &project.config.site.design_system_package,
    )?;
    match &design_system_version {
        Some(v) => tracing::info!(
            "{} version: {v}",
            project.config.site.design_system_package
        ),
        None => tracing::warn!(
            "{} is not declared in {}",
            project.config.site.design_system_package,
            project.package_manifest().display()
        ),
    }

    let env = environment(project, service, assets, design_system_version);

    let dist = project.dist_dir();
    io::ensure_dir(&dist)?;

    let prefix = view_prefix(project);
    let mut pages = Vec::new();
    for view in list_views(&project.views_dir())? {
        let name = format!("{prefix}/{view}");
        let rendered = env.get_template(&name)?.render(minijinja::context! {})?;
        let output = if mode.minifies() {
            minify(&rendered)
        } else {
            rendered
        };
        let dest = dist.join(output_name(&view));
        io::atomic_write(&dest, output.as_bytes())?;
        tracing::debug!("wrote {}", dest.display());
        pages.push(dest);
    }

    tracing::info!("Build complete! ({} page(s))", pages.len());
    Ok(BuildOutput {
        service: service.to_string(),
        mode,
        pages,
    })
}

fn environment(
    project: &Project,
    service: &str,
    assets: AssetManifest,
    design_system_version: Option<String>,
) -> Environment<'static> {
    let mut env = Environment::new();

    let roots = project.template_roots();
    env.set_loader(move |name| load_from_roots(&roots, name));
    env.set_auto_escape_callback(|_| AutoEscape::Html);

    let site = &project.config.site;
    env.add_global("pageTitle", site.page_title.clone());
    env.add_global("serviceName", site.service_name.clone());
    env.add_global("service", service.to_string());
    env.add_global(
        "govukFrontendVersion",
        design_system_version
            .map(Value::from)
            .unwrap_or(Value::UNDEFINED),
    );
    env.add_global("govukRebrand", site.rebrand);
    env.add_function("getAssetPath", move |asset: String| -> Value {
        assets
            .get(&asset)
            .map(Value::from)
            .unwrap_or(Value::UNDEFINED)
    });

    env
}

/// Look `name` up in each root in turn; the first root holding the file wins.
fn load_from_roots(
    roots: &[PathBuf],
    name: &str,
) -> std::result::Result<Option<String>, minijinja::Error> {
    let rel = Path::new(name);
    if rel
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return Ok(None);
    }
    for root in roots {
        let candidate = root.join(rel);
        if !candidate.is_file() {
            continue;
        }
        return std::fs::read_to_string(&candidate).map(Some).map_err(|e| {
            minijinja::Error::new(
                ErrorKind::InvalidOperation,
                format!("could not read template {}", candidate.display()),
            )
            .with_source(e)
        });
    }
    Ok(None)
}

/// Template-name prefix of the views directory relative to the template root.
fn view_prefix(project: &Project) -> String {
    project
        .views_dir()
        .strip_prefix(project.templates_dir())
        .ok()
        .and_then(|p| p.to_str())
        .map(|p| p.replace('\\', "/").trim_end_matches('/').to_string())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| paths::VIEWS_PREFIX.to_string())
}

fn list_views(views: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(views)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

fn output_name(view: &str) -> PathBuf {
    let path = Path::new(view);
    if path.extension().and_then(|e| e.to_str()) == Some(paths::TEMPLATE_EXTENSION) {
        path.with_extension("html")
    } else {
        path.to_path_buf()
    }
}

/// Collapse whitespace, strip comments and empty attributes, minify inline
/// scripts and styles, then drop elements left with no content.
pub fn minify(html: &str) -> String {
    let mut cfg = minify_html::Cfg::new();
    cfg.do_not_minify_doctype = true;
    cfg.ensure_spec_compliant_unquoted_attribute_values = true;
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_spaces_between_attributes = true;
    cfg.keep_comments = false;
    cfg.minify_js = true;
    cfg.minify_css = true;
    let out = minify_html::minify(html.as_bytes(), &cfg);
    remove_empty_elements(&String::from_utf8_lossy(&out))
}

static EMPTY_ELEMENT_RE: OnceLock<Regex> = OnceLock::new();
static ATTR_NAME_RE: OnceLock<Regex> = OnceLock::new();

// Open tag, optional whitespace, close tag. Void elements have no close tag
// and never match.
fn empty_element_re() -> &'static Regex {
    EMPTY_ELEMENT_RE.get_or_init(|| {
        Regex::new(
            r#"<([A-Za-z][A-Za-z0-9-]*)((?:\s+[^\s"'<>/=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'<>=`]+))?)*)\s*>\s*</([A-Za-z][A-Za-z0-9-]*)\s*>"#,
        )
        .expect("static regex")
    })
}

fn attr_name_re() -> &'static Regex {
    ATTR_NAME_RE.get_or_init(|| {
        Regex::new(r#"([^\s"'<>/=]+)(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'<>=`]+))?"#)
            .expect("static regex")
    })
}

/// Elements that still mean something with no content.
fn keep_when_empty(tag: &str, attrs: &str) -> bool {
    let has = |name: &str| {
        attr_name_re()
            .captures_iter(attrs)
            .any(|c| c[1].eq_ignore_ascii_case(name))
    };
    match tag.to_ascii_lowercase().as_str() {
        "textarea" => true,
        "audio" | "script" | "video" => has("src"),
        "iframe" => has("src") || has("srcdoc"),
        "object" => has("data"),
        _ => false,
    }
}

/// Remove empty non-void elements, repeating until parents emptied by the
/// previous pass are gone too.
fn remove_empty_elements(html: &str) -> String {
    let mut current = html.to_string();
    loop {
        let next = empty_element_re().replace_all(&current, |caps: &Captures| {
            if caps[1].eq_ignore_ascii_case(&caps[3]) && !keep_when_empty(&caps[1], &caps[2]) {
                String::new()
            } else {
                caps[0].to_string()
            }
        });
        if next == current {
            return current;
        }
        current = next.into_owned();
    }
}

// ---------------------------------------------------------------------------
// Test fixture
// ---------------------------------------------------------------------------


#[cfg(test)]
mod tests {
    use super::fixture;
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn build_mode_from_env() {
        assert_eq!(
            BuildMode::from_env_value(Some("production")),
            BuildMode::Production
        );
        assert_eq!(
            BuildMode::from_env_value(Some("development")),
            BuildMode::Development
        );
        assert_eq!(BuildMode::from_env_value(Some("test")), BuildMode::Development);
        assert_eq!(BuildMode::from_env_value(None), BuildMode::Development);
    }

    #[test]
    fn development_build_renders_globals_and_tenant_content() {
        let dir = TempDir::new().unwrap();
        let project = fixture::project(dir.path());
        fixture::tenant(&project, "tax-service", "<p>Tax is down</p>");
        std::fs::create_dir_all(project.dist_dir()).unwrap();
        std::fs::write(
            project.assets_manifest(),
            r#"{"application.css":"assets/css/application.123.css"}"#,
        )
        .unwrap();

        let out = build(&project, "tax-service", BuildMode::Development).unwrap();

        assert_eq!(out.pages, vec![project.page_path()]);
        let html = std::fs::read_to_string(project.page_path()).unwrap();
        assert!(html.contains("<title>Service Unavailable</title>"));
        assert!(html.contains("<p>Tax is down</p>"));
        assert!(html.contains("content=\"5.10.2\""));
        assert!(html.contains("application.123.css"));
        assert!(html.contains("<!-- layout comment -->"));
    }

    #[test]
    fn production_build_is_minified() {
        let dir = TempDir::new().unwrap();
        let project = fixture::project(dir.path());
        fixture::tenant(&project, "tax-service", "<p>Tax   is\n\n   down</p>");

        build(&project, "tax-service", BuildMode::Development).unwrap();
        let dev = std::fs::read_to_string(project.page_path()).unwrap();
        build(&project, "tax-service", BuildMode::Production).unwrap();
        let prod = std::fs::read_to_string(project.page_path()).unwrap();

        assert!(prod.len() < dev.len());
        assert!(!prod.contains("layout comment"));
        assert!(prod.contains("Tax is down"));
    }

    #[test]
    fn minify_drops_empty_elements_and_attributes() {
        let out = minify(
            "<div class=\"\" id=\"\"><p></p><span>keep</span><section> <p> </p> </section></div>",
        );
        assert!(out.contains("<span>keep</span>"), "{out}");
        assert!(!out.contains("<p"), "{out}");
        assert!(!out.contains("<section"), "{out}");
        assert!(!out.contains("class="), "{out}");
    }

    #[test]
    fn minify_keeps_empty_elements_that_carry_meaning() {
        let out = minify(
            "<textarea name=\"q\"></textarea><script src=\"app.js\"></script><iframe src=\"/x\"></iframe><br><p></p>",
        );
        assert!(out.contains("</textarea>"), "{out}");
        assert!(out.contains("app.js"), "{out}");
        assert!(out.contains("</iframe>"), "{out}");
        assert!(out.contains("<br>"), "{out}");
        assert!(!out.contains("<p>"), "{out}");
    }

    #[test]
    fn production_build_strips_empty_tenant_elements() {
        let dir = TempDir::new().unwrap();
        let project = fixture::project(dir.path());
        fixture::tenant(&project, "tax-service", "<p>Tax is down</p>\n<p class=\"\"></p>\n<div>\n</div>");

        build(&project, "tax-service", BuildMode::Production).unwrap();
        let prod = std::fs::read_to_string(project.page_path()).unwrap();

        assert!(prod.contains("<p>Tax is down</p>"), "{prod}");
        assert!(!prod.contains("<p></p>"), "{prod}");
        assert!(!prod.contains("<div></div>"), "{prod}");
    }

    #[test]
    fn missing_asset_manifest_renders_empty_asset_path() {
        let dir = TempDir::new().unwrap();
        let project = fixture::project(dir.path());
        fixture::tenant(&project, "tax-service", "<p>down</p>");

        build(&project, "tax-service", BuildMode::Development).unwrap();

        let html = std::fs::read_to_string(project.page_path()).unwrap();
        assert!(html.contains("<link href=\"\" rel=\"stylesheet\">"));
    }

    #[test]
    fn tenant_content_is_autoescaped_through_globals() {
        let dir = TempDir::new().unwrap();
        let mut project = fixture::project(dir.path());
        project.config.site.service_name = "<Tax & Duty>".to_string();
        fixture::tenant(&project, "tax-service", "<p>down</p>");

        build(&project, "tax-service", BuildMode::Development).unwrap();

        let html = std::fs::read_to_string(project.page_path()).unwrap();
        assert!(html.contains("<h1>&lt;Tax &amp; Duty&gt;</h1>"));
    }

    #[test]
    fn earlier_template_root_wins() {
        let dir = TempDir::new().unwrap();
        let project = fixture::project(dir.path());
        fixture::tenant(&project, "tax-service", "<p>down</p>");
        let override_dir = project.design_system_dir().join("templates");
        std::fs::create_dir_all(&override_dir).unwrap();
        std::fs::write(
            override_dir.join("layout.njk"),
            "<html><body>design system layout</body></html>",
        )
        .unwrap();

        build(&project, "tax-service", BuildMode::Development).unwrap();

        let html = std::fs::read_to_string(project.page_path()).unwrap();
        assert!(html.contains("design system layout"));
    }

    #[test]
    fn missing_tenant_content_fails() {
        let dir = TempDir::new().unwrap();
        let project = fixture::project(dir.path());
        assert!(build(&project, "nobody", BuildMode::Development).is_err());
    }

    #[test]
    fn output_name_swaps_extension() {
        assert_eq!(output_name("index.njk"), PathBuf::from("index.html"));
        assert_eq!(output_name("robots.txt"), PathBuf::from("robots.txt"));
    }

    #[test]
    fn loader_rejects_parent_traversal() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("secret.njk"), "x").unwrap();
        let roots = vec![dir.path().join("sub")];
        assert_eq!(load_from_roots(&roots, "../secret.njk").unwrap(), None);
    }
}
