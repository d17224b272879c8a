use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Writes the raw upload to `<dir>/<basename>`. Failures are logged and swallowed:
/// losing the copy on disk must never fail the upload.
pub async fn persist_upload(dir: &Path, filename: &str, bytes: &[u8]) {
    match write_upload(dir, filename, bytes).await {
        Ok(path) => debug!(path = %path.display(), "Stored upload"),
        Err(e) => warn!(filename, "Could not store upload: {e:#}"),
    }
}

async fn write_upload(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
    let basename = Path::new(filename)
        .file_name()
        .with_context(|| format!("'{filename}' has no file name component"))?;
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(basename);
    tokio::fs::write(&path, bytes)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_persist_writes_basename_only() {
        let dir = tempfile::tempdir().unwrap();
        persist_upload(dir.path(), "../../etc/cv.txt", b"Python").await;
        let stored = tokio::fs::read(dir.path().join("cv.txt")).await.unwrap();
        assert_eq!(stored, b"Python");
    }

    #[tokio::test]
    async fn test_persist_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("uploads");
        persist_upload(&nested, "cv.pdf", b"%PDF").await;
        assert!(nested.join("cv.pdf").exists());
    }

    #[tokio::test]
    async fn test_persist_failure_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        tokio::fs::write(&blocker, b"x").await.unwrap();
        // Parent is a regular file, so the write fails; this must simply return.
        persist_upload(&blocker, "cv.txt", b"Python").await;
        assert!(write_upload(&blocker, "cv.txt", b"Python").await.is_err());
    }

    #[tokio::test]
    async fn test_filename_without_basename_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(write_upload(dir.path(), "..", b"x").await.is_err());
    }
}
