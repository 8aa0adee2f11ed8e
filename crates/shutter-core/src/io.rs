use crate::error::Result;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Write `value` as pretty-printed JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    atomic_write(path, json.as_bytes())
}

/// Create a directory and all parents, idempotent.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Remove a directory tree if it exists. Returns true if something was removed.
pub fn remove_dir_if_exists(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    std::fs::remove_dir_all(path)?;
    Ok(true)
}

/// Recursively copy `src` into `dest`, creating directories as needed.
///
/// Files already present in `dest` are overwritten; files in `dest` with no
/// counterpart in `src` are left alone. Returns the destination path of every
/// copied file, in directory-walk order.
pub fn copy_dir_all(src: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    let mut copied = Vec::new();
    copy_into(src, dest, &mut copied)?;
    Ok(copied)
}

fn copy_into(src: &Path, dest: &Path, copied: &mut Vec<PathBuf>) -> Result<()> {
    std::fs::create_dir_all(dest)?;

    let mut entries = std::fs::read_dir(src)?.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let src_path = entry.path();
        let dest_path = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_into(&src_path, &dest_path, copied)?;
        } else {
            std::fs::copy(&src_path, &dest_path)?;
            tracing::info!("Copied: {} -> {}", src_path.display(), dest_path.display());
            copied.push(dest_path);
        }
    }
    Ok(())
}

/// Human-readable byte size: `0 Bytes`, `512 Bytes`, `1.5 KB`, `2 MB`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 3] = ["Bytes", "KB", "MB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}
