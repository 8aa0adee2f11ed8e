use shutter_core::paths;
use std::path::{Path, PathBuf};

/// Resolve the project root directory.
///
/// Priority:
/// 1. `--root` flag / `SHUTTER_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `package.json` or `shutter.yaml`
/// 3. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_root_from(&cwd).unwrap_or(cwd)
}

fn is_project_root(dir: &Path) -> bool {
    dir.join(paths::PACKAGE_MANIFEST).is_file() || dir.join(paths::CONFIG_FILE).is_file()
}

fn find_root_from(start: &Path) -> Option<PathBuf> {
    start.ancestors().find(|d| is_project_root(d)).map(Path::to_path_buf)
}
