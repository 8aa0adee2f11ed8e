//! A resolved project: root directory plus effective configuration, with the
//! path helpers every stage uses to find its inputs and outputs.

use crate::config::Config;
use crate::error::{Result, ShutterError};
use crate::paths;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    pub config: Config,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Load `shutter.yaml` (or defaults) for the project at `root`.
    pub fn load(root: &Path) -> Result<Self> {
        let config = Config::load(root)?;
        for warning in config.validate() {
            tracing::warn!("config {}: {}", warning.field, warning.message);
        }
        Ok(Self::new(root, config))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, p: &Path) -> PathBuf {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.root.join(p)
        }
    }

    /// Fail unless the project root carries its package manifest.
    pub fn ensure_project_root(&self) -> Result<()> {
        let manifest = self.package_manifest();
        if !manifest.is_file() {
            return Err(ShutterError::NotAProject(manifest.display().to_string()));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Source layout
    // -----------------------------------------------------------------------

    pub fn templates_dir(&self) -> PathBuf {
        self.resolve(&self.config.paths.templates)
    }

    pub fn views_dir(&self) -> PathBuf {
        self.resolve(&self.config.paths.views)
    }

    pub fn common_dir(&self) -> PathBuf {
        self.resolve(&self.config.paths.common)
    }

    pub fn tenants_dir(&self) -> PathBuf {
        self.resolve(&self.config.paths.tenants)
    }

    pub fn tenant_dir(&self, service: &str) -> PathBuf {
        self.tenants_dir().join(service)
    }

    pub fn content_template(&self, service: &str) -> PathBuf {
        self.tenant_dir(service).join(paths::CONTENT_TEMPLATE)
    }

    pub fn design_system_dir(&self) -> PathBuf {
        self.resolve(&self.config.paths.design_system)
    }

    pub fn package_manifest(&self) -> PathBuf {
        self.resolve(&self.config.paths.package_manifest)
    }

    /// Template search roots, highest priority first.
    pub fn template_roots(&self) -> Vec<PathBuf> {
        vec![
            self.design_system_dir(),
            self.templates_dir(),
            self.tenants_dir(),
        ]
    }

    // -----------------------------------------------------------------------
    // Build output
    // -----------------------------------------------------------------------

    pub fn dist_dir(&self) -> PathBuf {
        self.resolve(&self.config.paths.dist)
    }

    pub fn page_path(&self) -> PathBuf {
        self.dist_dir().join(paths::INDEX_HTML)
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.dist_dir().join(paths::ASSETS_DIR)
    }

    pub fn assets_manifest(&self) -> PathBuf {
        self.dist_dir().join(paths::ASSETS_MANIFEST)
    }

    pub fn validation_results(&self) -> PathBuf {
        self.dist_dir().join(paths::VALIDATION_RESULTS)
    }

    pub fn validation_comment(&self) -> PathBuf {
        self.dist_dir().join(paths::VALIDATION_COMMENT)
    }

    pub fn screenshot_results(&self) -> PathBuf {
        self.dist_dir().join(paths::SCREENSHOT_RESULTS)
    }

    pub fn screenshots_dir(&self) -> PathBuf {
        self.dist_dir().join(paths::SCREENSHOTS_DIR)
    }

    /// Remove the build output directory. Returns true if it existed.
    pub fn clean(&self) -> Result<bool> {
        let dist = self.dist_dir();
        let removed = crate::io::remove_dir_if_exists(&dist)?;
        if removed {
            tracing::info!("Removed build output: {}", dist.display());
        }
        Ok(removed)
    }
}
