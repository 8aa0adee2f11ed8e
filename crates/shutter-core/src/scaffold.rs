use crate::error::{Result, ShutterError};
use crate::io;
use crate::paths;
use crate::project::Project;
use std::path::{Path, PathBuf};

/// Copy the common template directory into a new tenant directory.
///
/// Returns the destination path of every copied file.
pub fn scaffold(project: &Project, service: &str) -> Result<Vec<PathBuf>> {
    paths::validate_tenant(service)?;
    let source = project.common_dir();
    let dest = project.tenant_dir(service);
    copy_template(&source, &dest)
}

/// Copy `source` into `dest`. Fails if `source` is not a directory.
pub fn copy_template(source: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    if !source.is_dir() {
        return Err(ShutterError::TemplateDirNotFound(
            source.display().to_string(),
        ));
    }
    tracing::info!("Copying from {} to {}...", source.display(), dest.display());
    let copied = io::copy_dir_all(source, dest)?;
    tracing::info!("Copy complete! ({} files)", copied.len());
    Ok(copied)
}
