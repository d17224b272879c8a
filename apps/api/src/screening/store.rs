//! Screening Orchestrator — in-memory job and candidate state plus the ranking pass.
//!
//! Owned by `AppState` behind one mutex; every mutating operation takes `&mut self`.

use chrono::Utc;
use tracing::{debug, info, info_span};
use uuid::Uuid;

use crate::errors::AppError;
use crate::screening::models::{
    Candidate, JobPosting, NewCandidate, RankedCandidate, ScreeningRun,
};
use crate::screening::scoring::ResumeScorer;
use crate::screening::skills::extract_skills;

#[derive(Debug)]
pub struct ScreeningStore {
    job: Option<JobPosting>,
    candidates: Vec<Candidate>,
    next_job_id: u64,
    next_candidate_id: u64,
}

impl Default for ScreeningStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreeningStore {
    pub fn new() -> Self {
        Self {
            job: None,
            candidates: Vec::new(),
            next_job_id: 1,
            next_candidate_id: 1,
        }
    }

    /// Replaces the active job. Blank descriptions are rejected without
    /// consuming an id.
    pub fn set_job(&mut self, description: &str) -> Result<JobPosting, AppError> {
        if description.trim().is_empty() {
            return Err(AppError::Validation(
                "Job description is required".to_string(),
            ));
        }

        let job = JobPosting {
            id: self.next_job_id,
            description: description.to_string(),
            skills: extract_skills(description),
            created_at: Utc::now(),
        };
        self.next_job_id += 1;

        info!(job_id = job.id, skills = job.skills.len(), "Active job replaced");
        self.job = Some(job.clone());
        Ok(job)
    }

    /// Admits an extracted resume as a new candidate.
    ///
    /// The display name falls back to the filename, then to `"Unknown"`.
    pub fn admit(&mut self, resume: NewCandidate) -> Candidate {
        let name = resume
            .name
            .filter(|n| !n.trim().is_empty())
            .or_else(|| Some(resume.filename.clone()).filter(|f| !f.is_empty()))
            .unwrap_or_else(|| "Unknown".to_string());

        let candidate = Candidate {
            id: self.next_candidate_id,
            name,
            email: resume.email.filter(|e| !e.trim().is_empty()),
            filename: resume.filename,
            skills: extract_skills(&resume.raw_text),
            raw_text: resume.raw_text,
            scores: None,
            uploaded_at: Utc::now(),
        };
        self.next_candidate_id += 1;

        debug!(
            candidate_id = candidate.id,
            skills = candidate.skills.len(),
            "Candidate admitted"
        );
        self.candidates.push(candidate.clone());
        candidate
    }

    /// Candidates in insertion order.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Scores every candidate against the active job, overwrites their stored
    /// scores, and returns them ranked by `total` descending. Equal totals keep
    /// insertion order.
    pub fn screen(&mut self, scorer: &dyn ResumeScorer) -> Result<ScreeningRun, AppError> {
        let job = self
            .job
            .clone()
            .ok_or_else(|| AppError::Configuration("no job set".to_string()))?;

        let run_id = Uuid::new_v4();
        let span = info_span!("screening_run", %run_id, job_id = job.id);
        let _guard = span.enter();

        let mut results = Vec::with_capacity(self.candidates.len());
        for candidate in &mut self.candidates {
            let scores = scorer.score(
                &job.description,
                &candidate.raw_text,
                Some(&job.skills),
                Some(&candidate.skills),
            );
            candidate.scores = Some(scores);
            results.push(RankedCandidate {
                id: candidate.id,
                name: candidate.name.clone(),
                email: candidate.email.clone(),
                filename: candidate.filename.clone(),
                skills: candidate.skills.clone(),
                scores,
            });
        }

        // Stable: ties keep insertion order.
        results.sort_by(|a, b| b.scores.total.total_cmp(&a.scores.total));

        info!(
            candidates = results.len(),
            backend = scorer.backend(),
            top_total = results.first().map(|r| r.scores.total),
            "Screening pass complete"
        );

        Ok(ScreeningRun {
            run_id,
            screened_at: Utc::now(),
            job,
            results,
        })
    }
}
