//! Loading and saving the blog collection document.
//!
//! The document is kept as an untyped [`serde_json::Value`] so keys this tool
//! does not know about survive a load/save cycle unchanged, in their original
//! order (`serde_json` is built with `preserve_order`).

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in '{path}': {source}")]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to encode blog document: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Reads and decodes the JSON document at `path`.
pub fn load_document(path: &Path) -> Result<Value, StoreError> {
    let content = std::fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| StoreError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `document` to `path` as two-space-indented UTF-8 JSON.
///
/// Non-ASCII text is written as-is rather than `\u` escaped. The content goes
/// to a temporary sibling file which is synced and then renamed over `path`,
/// so readers never observe a half-written document.
pub fn save_document(path: &Path, document: &Value) -> Result<(), StoreError> {
    let content = serde_json::to_string_pretty(document)?;
    write_atomic(path, content.as_bytes())?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "Saved blog document");
    Ok(())
}

/// Copies `path` to `<file name>.backup.<YYYYmmdd_HHMMSS>` in the same directory.
///
/// Returns the backup location. The copy is written atomically, so an
/// interrupted backup never leaves a truncated file behind.
pub fn backup(path: &Path) -> Result<PathBuf, StoreError> {
    let content = std::fs::read(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "blogs.json".to_string());
    let backup_name = format!(
        "{}.backup.{}",
        file_name,
        Local::now().format("%Y%m%d_%H%M%S")
    );
    let backup_path = path.with_file_name(backup_name);

    write_atomic(&backup_path, &content)?;
    tracing::info!(
        source = %path.display(),
        backup = %backup_path.display(),
        "Backed up blog document"
    );
    Ok(backup_path)
}

/// Write-to-temp-then-rename, so `dst` is either the old or the new content.
fn write_atomic(dst: &Path, content: &[u8]) -> Result<(), StoreError> {
    use std::time::{SystemTime, UNIX_EPOCH};

    let write_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| StoreError::Write { path, source }
    };

    // SEC-009: Randomized temp filename to prevent TOCTOU race conditions
    let random_suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let temp_path = dst.with_extension(format!("tmp.{:016x}", random_suffix));

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true) // Fails atomically if file exists (prevents symlink race)
        .open(&temp_path)
        .map_err(write_err(&temp_path))?;

    let written = file
        .write_all(content)
        .and_then(|()| file.sync_all())
        .map_err(write_err(&temp_path));
    drop(file);
    if let Err(e) = written {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e);
    }

    // On Windows, rename fails if destination exists, so remove it first
    #[cfg(windows)]
    if dst.exists() {
        if let Err(e) = std::fs::remove_file(dst) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(write_err(dst)(e));
        }
    }

    std::fs::rename(&temp_path, dst).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        write_err(dst)(e)
    })
}
