//! Batch intake — turns uploaded files into candidates ready for admission.

pub mod extract;
pub mod storage;

use std::path::Path;

use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;
use crate::ingest::extract::extract_text;
use crate::ingest::storage::persist_upload;
use crate::screening::models::NewCandidate;

/// One file from a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

/// Extracts every file of a batch. The first file that fails to parse rejects the
/// whole batch, so nothing is admitted unless every file succeeds.
///
/// Each file is parsed on the blocking pool. Raw bytes are persisted to
/// `uploads_dir` on a best-effort basis.
pub async fn prepare_batch(
    files: Vec<UploadedFile>,
    name: Option<String>,
    email: Option<String>,
    uploads_dir: &Path,
) -> Result<Vec<NewCandidate>, AppError> {
    if files.is_empty() {
        return Err(AppError::Validation("No files provided".to_string()));
    }

    let mut prepared = Vec::with_capacity(files.len());
    for file in files {
        // CPU-bound parse — spawn_blocking to avoid blocking the async executor.
        let bytes = file.bytes.clone();
        let filename = file.filename.clone();
        let extracted = tokio::task::spawn_blocking(move || extract_text(&bytes, &filename))
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("spawn_blocking failed in extraction: {e}"))
            })?;
        let raw_text = extracted.map_err(|source| AppError::Parse {
            filename: file.filename.clone(),
            source,
        })?;

        persist_upload(uploads_dir, &file.filename, &file.bytes).await;

        info!(
            filename = %file.filename,
            bytes = file.bytes.len(),
            chars = raw_text.chars().count(),
            "Extracted resume text"
        );
        prepared.push(NewCandidate {
            name: name.clone(),
            email: email.clone(),
            filename: file.filename,
            raw_text,
        });
    }

    Ok(prepared)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, body: &'static [u8]) -> UploadedFile {
        UploadedFile {
            filename: name.to_string(),
            bytes: Bytes::from_static(body),
        }
    }

    #[tokio::test]
    async fn test_empty_batch_is_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = prepare_batch(vec![], None, None, dir.path()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_batch_extracts_and_carries_contact_fields() {
        let dir = tempfile::tempdir().unwrap();
        let prepared = prepare_batch(
            vec![file("a.txt", b"Python, SQL"), file("b.log", b"Go\n\nRust")],
            Some("Sam".to_string()),
            Some("sam@example.com".to_string()),
            dir.path(),
        )
        .await
        .unwrap();

        assert_eq!(prepared.len(), 2);
        assert_eq!(prepared[0].raw_text, "Python, SQL");
        assert_eq!(prepared[1].raw_text, "Go Rust");
        assert_eq!(prepared[1].name.as_deref(), Some("Sam"));
        assert!(dir.path().join("a.txt").exists());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_blocking_extraction_keeps_upload_order() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![
            file("1.txt", b"Rust"),
            file("2.md", b"Go\n\tKafka"),
            file("3.txt", b"caf\xe9 SQL"),
        ];
        let prepared = prepare_batch(files, None, None, dir.path()).await.unwrap();
        let texts: Vec<&str> = prepared.iter().map(|p| p.raw_text.as_str()).collect();
        assert_eq!(texts, vec!["Rust", "Go Kafka", "café SQL"]);
    }

    #[tokio::test]
    async fn test_one_bad_file_rejects_batch() {
        let dir = tempfile::tempdir().unwrap();
        let err = prepare_batch(
            vec![file("a.txt", b"Python"), file("broken.docx", b"not a zip")],
            None,
            None,
            dir.path(),
        )
        .await
        .unwrap_err();

        match err {
            AppError::Parse { filename, .. } => assert_eq!(filename, "broken.docx"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
