use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The single active job description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: u64,
    pub description: String,
    pub skills: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
}

/// Scoring output for one candidate against the active job.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub similarity: f64,    // 0.0 – 1.0, 4 dp
    pub skill_overlap: f64, // 0.0 – 1.0, 4 dp
    pub total: f64,         // 0.0 – 100.0, 1 dp
}

/// An uploaded resume. `skills` is derived once at admission; `scores` is
/// overwritten by every screening pass.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub id: u64,
    pub name: String,
    pub email: Option<String>,
    pub filename: String,
    #[serde(skip_serializing)]
    pub raw_text: String,
    pub skills: BTreeSet<String>,
    pub scores: Option<ScoreResult>,
    pub uploaded_at: DateTime<Utc>,
}

/// Extracted resume waiting to be admitted as a candidate.
#[derive(Debug, Clone)]
pub struct NewCandidate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub filename: String,
    pub raw_text: String,
}

/// One row of a ranked screening result.
#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    pub id: u64,
    pub name: String,
    pub email: Option<String>,
    pub filename: String,
    pub skills: BTreeSet<String>,
    pub scores: ScoreResult,
}

/// Output of one screening pass, ordered by `total` descending.
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningRun {
    pub run_id: Uuid,
    pub screened_at: DateTime<Utc>,
    pub job: JobPosting,
    pub results: Vec<RankedCandidate>,
}
