use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub field: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// PathsConfig
// ---------------------------------------------------------------------------

/// Directory layout, relative to the project root unless absolute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Local template source root (second template search root).
    pub templates: PathBuf,
    /// Page templates rendered one-to-one into the build output.
    pub views: PathBuf,
    /// Common template directory copied for every new tenant.
    pub common: PathBuf,
    /// Shared tenants directory (third template search root).
    pub tenants: PathBuf,
    /// Build output directory.
    pub dist: PathBuf,
    /// Design-system template assets (first template search root).
    pub design_system: PathBuf,
    pub package_manifest: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            templates: PathBuf::from("src"),
            views: PathBuf::from("src/templates/views"),
            common: PathBuf::from("src/templates/common"),
            tenants: PathBuf::from("../tenants"),
            dist: PathBuf::from(".dist"),
            design_system: PathBuf::from("node_modules/govuk-frontend/dist"),
            package_manifest: PathBuf::from(paths::PACKAGE_MANIFEST),
        }
    }
}

// ---------------------------------------------------------------------------
// SiteConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub page_title: String,
    pub service_name: String,
    /// Dependency key in the package manifest whose version is exposed to
    /// templates.
    pub design_system_package: String,
    pub rebrand: bool,
    pub default_service: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            page_title: "Service Unavailable".to_string(),
            service_name: "Service Unavailable".to_string(),
            design_system_package: "govuk-frontend".to_string(),
            rebrand: true,
            default_service: "default-content".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// ToolsConfig
// ---------------------------------------------------------------------------

/// External commands, as argv vectors. An empty bundler command disables
/// bundling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub linter: Vec<String>,
    pub bundler: Vec<String>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            linter: vec![
                "npx".to_string(),
                "--no-install".to_string(),
                "html-validate".to_string(),
            ],
            bundler: vec!["npx".to_string(), "webpack".to_string()],
        }
    }
}

// ---------------------------------------------------------------------------
// ScreenshotConfig / GitConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenshotConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ScreenshotConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    pub base_branch: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            base_branch: "origin/main".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub site: SiteConfig,
    pub tools: ToolsConfig,
    pub screenshot: ScreenshotConfig,
    pub git: GitConfig,
}

impl Config {
    /// Load `shutter.yaml` from `root`. A missing file yields the defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(paths::CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = root.join(paths::CONFIG_FILE);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.tools.linter.is_empty() {
            warnings.push(ConfigWarning {
                field: "tools.linter".to_string(),
                message: "linter command is empty; validation will fail".to_string(),
            });
        }

        if self.screenshot.width == 0 || self.screenshot.height == 0 {
            warnings.push(ConfigWarning {
                field: "screenshot".to_string(),
                message: format!(
                    "viewport {}x{} has a zero dimension",
                    self.screenshot.width, self.screenshot.height
                ),
            });
        }

        if !paths::is_valid_tenant(&self.site.default_service) {
            warnings.push(ConfigWarning {
                field: "site.default_service".to_string(),
                message: format!(
                    "'{}' is not a valid service name",
                    self.site.default_service
                ),
            });
        }

        if self.git.base_branch.trim().is_empty() {
            warnings.push(ConfigWarning {
                field: "git.base_branch".to_string(),
                message: "base branch is empty".to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.paths.dist, PathBuf::from(".dist"));
        assert_eq!(cfg.git.base_branch, "origin/main");
        assert_eq!(cfg.screenshot.width, 1280);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("shutter.yaml"),
            "paths:\n  tenants: tenants\ntools:\n  bundler: []\n",
        )
        .unwrap();
        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg.paths.tenants, PathBuf::from("tenants"));
        assert_eq!(cfg.paths.dist, PathBuf::from(".dist"));
        assert!(cfg.tools.bundler.is_empty());
        assert_eq!(cfg.tools.linter[2], "html-validate");
        assert_eq!(cfg.site.page_title, "Service Unavailable");
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::default();
        cfg.site.rebrand = false;
        cfg.save(dir.path()).unwrap();
        let loaded = Config::load(dir.path()).unwrap();
        assert!(!loaded.site.rebrand);
    }

    #[test]
    fn default_config_has_no_warnings() {
        assert!(Config::default().validate().is_empty());
    }

    #[test]
    fn validate_flags_bad_values() {
        let mut cfg = Config::default();
        cfg.tools.linter.clear();
        cfg.screenshot.height = 0;
        cfg.site.default_service = "Not Valid".to_string();
        let fields: Vec<String> = cfg.validate().into_iter().map(|w| w.field).collect();
        assert_eq!(
            fields,
            vec!["tools.linter", "screenshot", "site.default_service"]
        );
    }
}
