//! Build inputs read from JSON manifests: the bundler's asset manifest and the
//! package manifest's declared design-system version.

use crate::error::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Logical asset name → hashed output path, as written by the bundler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct AssetManifest(BTreeMap<String, String>);

impl AssetManifest {
    /// Read the manifest at `path`. A missing or malformed file is logged and
    /// treated as empty so lookups resolve to nothing instead of failing.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(manifest) => manifest,
            Err(e) => {
                tracing::error!("could not read asset manifest {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn get(&self, asset: &str) -> Option<&str> {
        self.0.get(asset).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for AssetManifest {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Deserialize)]
struct PackageManifest {
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
}

/// The version string declared for `package` under `dependencies`.
///
/// Fails if the manifest is missing or not JSON; returns `None` when the
/// dependency is not declared.
pub fn dependency_version(manifest_path: &Path, package: &str) -> Result<Option<String>> {
    let data = std::fs::read_to_string(manifest_path)?;
    let manifest: PackageManifest = serde_json::from_str(&data)?;
    Ok(manifest.dependencies.get(package).cloned())
}
