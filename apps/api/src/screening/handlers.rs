use axum::{
    extract::{Multipart, State},
    http::header,
    response::IntoResponse,
    Form, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::errors::AppError;
use crate::export::{candidates_to_csv, EXPORT_FILENAME};
use crate::ingest::{prepare_batch, UploadedFile};
use crate::screening::models::{Candidate, JobPosting, ScreeningRun};
use crate::screening::scoring::ResumeScorer;
use crate::screening::store::ScreeningStore;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct JobForm {
    #[serde(default)]
    pub description: String,
}

#[derive(Serialize)]
pub struct JobResponse {
    pub job: JobPosting,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub count: usize,
    pub candidates: Vec<Candidate>,
}

#[derive(Serialize)]
pub struct CandidateListResponse {
    pub candidates: Vec<Candidate>,
}

/// POST /api/job
pub async fn handle_set_job(
    State(state): State<AppState>,
    Form(form): Form<JobForm>,
) -> Result<Json<JobResponse>, AppError> {
    let job = state.store.lock().await.set_job(&form.description)?;
    Ok(Json(JobResponse { job }))
}

/// POST /api/upload
///
/// Text is extracted before the store lock is taken; the batch is admitted
/// only if every file parses.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut files = Vec::new();
    let mut name = None;
    let mut email = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "files" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
                // Browsers send an empty part when no file is chosen.
                if filename.is_empty() && bytes.is_empty() {
                    continue;
                }
                files.push(UploadedFile { filename, bytes });
            }
            "name" | "email" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
                let value = Some(value).filter(|v| !v.trim().is_empty());
                if field_name == "name" {
                    name = value;
                } else {
                    email = value;
                }
            }
            _ => {}
        }
    }

    let prepared = prepare_batch(files, name, email, &state.config.uploads_dir).await?;

    let mut store = state.store.lock().await;
    let candidates: Vec<Candidate> = prepared.into_iter().map(|r| store.admit(r)).collect();
    info!(count = candidates.len(), "Upload batch admitted");

    Ok(Json(UploadResponse {
        count: candidates.len(),
        candidates,
    }))
}

/// GET /api/candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
) -> Json<CandidateListResponse> {
    let candidates = state.store.lock().await.candidates().to_vec();
    Json(CandidateListResponse { candidates })
}

/// POST /api/screen
pub async fn handle_screen(
    State(state): State<AppState>,
) -> Result<Json<ScreeningRun>, AppError> {
    let run = run_screening(state.store.clone(), state.scorer.clone()).await?;
    Ok(Json(run))
}

/// Runs a screening pass on the blocking pool. Scoring is CPU-bound and
/// grows with the candidate count; the store lock is held for the whole pass.
async fn run_screening(
    store: Arc<Mutex<ScreeningStore>>,
    scorer: Arc<dyn ResumeScorer>,
) -> Result<ScreeningRun, AppError> {
    tokio::task::spawn_blocking(move || {
        let mut store = store.blocking_lock();
        store.screen(scorer.as_ref())
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in screening: {e}")))?
}

/// GET /api/export
pub async fn handle_export(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let csv = candidates_to_csv(state.store.lock().await.candidates())?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={EXPORT_FILENAME}"),
            ),
        ],
        csv,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::models::NewCandidate;
    use crate::screening::scoring::TfIdfSkillScorer;

    fn seeded_store() -> Arc<Mutex<ScreeningStore>> {
        let mut store = ScreeningStore::new();
        store
            .set_job("Looking for a Python developer with SQL and AWS experience")
            .unwrap();
        for (filename, text) in [
            ("weak.txt", "Excel, Marketing"),
            ("strong.txt", "Python, SQL, AWS, Docker"),
        ] {
            store.admit(NewCandidate {
                name: None,
                email: None,
                filename: filename.to_string(),
                raw_text: text.to_string(),
            });
        }
        Arc::new(Mutex::new(store))
    }

    #[tokio::test]
    async fn test_screening_runs_off_the_async_executor() {
        let store = seeded_store();
        let scorer: Arc<dyn ResumeScorer> = Arc::new(TfIdfSkillScorer::default());

        let run = run_screening(store.clone(), scorer).await.unwrap();
        assert_eq!(run.results[0].filename, "strong.txt");

        let stored = store.lock().await;
        assert!(stored.candidates().iter().all(|c| c.scores.is_some()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_screening_passes_agree() {
        let store = seeded_store();
        let scorer: Arc<dyn ResumeScorer> = Arc::new(TfIdfSkillScorer::default());

        let (a, b) = tokio::join!(
            run_screening(store.clone(), scorer.clone()),
            run_screening(store.clone(), scorer.clone()),
        );
        let totals = |run: ScreeningRun| -> Vec<(u64, f64)> {
            run.results.iter().map(|r| (r.id, r.scores.total)).collect()
        };
        assert_eq!(totals(a.unwrap()), totals(b.unwrap()));
    }

    #[tokio::test]
    async fn test_screening_without_job_is_configuration_error() {
        let store = Arc::new(Mutex::new(ScreeningStore::new()));
        let scorer: Arc<dyn ResumeScorer> = Arc::new(TfIdfSkillScorer::default());
        let err = run_screening(store, scorer).await.unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }
}
