//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Read file contents, mapping failures to `file.read_failed`.
pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::file_read(path.display().to_string(), e.to_string()))
}

/// Write content to file atomically (write to a uniquely named sibling temp
/// file, then rename).
///
/// The rename is atomic on POSIX filesystems, so readers always see either
/// the old content or the new content, never a partial write. A symlink is
/// resolved first so the link target is replaced and the link survives.
/// Permissions of an existing target are carried over to the replacement.
pub fn write_file_atomic(path: &Path, content: &str) -> Result<()> {
    let fail = |e: std::io::Error| Error::file_write(path.display().to_string(), e.to_string());

    let target = resolve_target(path).map_err(fail)?;
    let parent = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(parent).map_err(fail)?;
    tmp.write_all(content.as_bytes()).map_err(fail)?;

    if let Ok(metadata) = fs::metadata(&target) {
        tmp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(fail)?;
    }

    // A failed persist drops the temp file, which removes it.
    tmp.persist(&target).map_err(|e| fail(e.error))?;
    Ok(())
}

/// The path a write should land on: the final target of a symlink chain,
/// or `path` itself.
fn resolve_target(path: &Path) -> std::io::Result<PathBuf> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => fs::canonicalize(path),
        _ => Ok(path.to_path_buf()),
    }
}
