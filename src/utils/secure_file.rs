//! Atomic, owner-only file writes for cache entries and config files.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write `contents` to `path` through a temporary file in the same
/// directory, so readers never observe a half-written file. On Unix the
/// file is readable by its owner only.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create directory {}", parent.display()))?;

    let mut temp_file =
        NamedTempFile::new_in(parent).context("Failed to create temporary file")?;
    temp_file
        .write_all(contents)
        .context("Failed to write temporary file")?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(temp_file.path())?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(temp_file.path(), perms).context("Failed to set file permissions")?;
    }

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist file to {}", path.display()))?;

    Ok(())
}

pub fn write_json_atomic<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
    write_atomic(path, json.as_bytes())
}
