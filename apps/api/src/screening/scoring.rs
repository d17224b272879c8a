//! Score Combiner — pluggable, trait-based scorer that blends text similarity with
//! lexicon skill overlap into a single percentage.
//!
//! Default: `TfIdfSkillScorer` (pure-Rust, deterministic, fully testable).
//!
//! `AppState` holds an `Arc<dyn ResumeScorer>`, chosen at startup.

use std::collections::BTreeSet;

use crate::screening::models::ScoreResult;
use crate::screening::similarity::TfIdfSimilarity;
use crate::screening::skills::{extract_skills, LEXICON};

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap scoring backends without touching the store or handlers.
///
/// Missing skill sets are derived from the raw texts. Never fails: blank or
/// degenerate inputs still produce a well-formed `ScoreResult`.
pub trait ResumeScorer: Send + Sync {
    fn score(
        &self,
        job_description: &str,
        resume_text: &str,
        job_skills: Option<&BTreeSet<String>>,
        resume_skills: Option<&BTreeSet<String>>,
    ) -> ScoreResult;

    /// Backend label for logs.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// TfIdfSkillScorer — default implementation
// ────────────────────────────────────────────────────────────────────────────

/// Weights of the linear blend. They sum to 1.0 so `total` stays in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub similarity: f64,
    pub skill_overlap: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            similarity: 0.7,
            skill_overlap: 0.3,
        }
    }
}

/// Algorithm:
/// 1. similarity = TF-IDF cosine of job description vs resume
/// 2. skill_overlap = covered fraction of the job's lexicon skills
/// 3. total = 100 × (0.7 × similarity + 0.3 × skill_overlap), 1 dp
#[derive(Debug, Clone, Default)]
pub struct TfIdfSkillScorer {
    similarity: TfIdfSimilarity,
    weights: ScoringWeights,
}

impl TfIdfSkillScorer {
    pub fn new(similarity: TfIdfSimilarity) -> Self {
        Self {
            similarity,
            weights: ScoringWeights::default(),
        }
    }
}

impl ResumeScorer for TfIdfSkillScorer {
    fn score(
        &self,
        job_description: &str,
        resume_text: &str,
        job_skills: Option<&BTreeSet<String>>,
        resume_skills: Option<&BTreeSet<String>>,
    ) -> ScoreResult {
        let derived_job;
        let job_skills = match job_skills {
            Some(s) => s,
            None => {
                derived_job = extract_skills(job_description);
                &derived_job
            }
        };
        let derived_resume;
        let resume_skills = match resume_skills {
            Some(s) => s,
            None => {
                derived_resume = extract_skills(resume_text);
                &derived_resume
            }
        };

        let similarity = self.similarity.similarity(job_description, resume_text);
        let overlap = skill_overlap(job_skills, resume_skills);
        let total = (self.weights.similarity * similarity
            + self.weights.skill_overlap * overlap)
            * 100.0;

        ScoreResult {
            similarity: round_to(similarity, 4),
            skill_overlap: round_to(overlap, 4),
            total: round_to(total, 1).clamp(0.0, 100.0),
        }
    }

    fn backend(&self) -> &'static str {
        "tfidf-skill"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Skill overlap
// ────────────────────────────────────────────────────────────────────────────

/// Fraction of the job's skills the resume covers. Extra resume skills are
/// never penalized.
///
/// When the job lists no lexicon skills, a resume with skills is credited for
/// breadth: `|resume| / |LEXICON|`, capped at 1.0.
pub fn skill_overlap(job_skills: &BTreeSet<String>, resume_skills: &BTreeSet<String>) -> f64 {
    if job_skills.is_empty() && resume_skills.is_empty() {
        return 0.0;
    }
    if job_skills.is_empty() {
        return (resume_skills.len() as f64 / LEXICON.len() as f64).min(1.0);
    }
    let covered = job_skills.intersection(resume_skills).count();
    covered as f64 / job_skills.len() as f64
}

/// Rounds the exact binary value half-to-even. Formatting is correctly rounded,
/// so this never double-rounds through a scaled intermediate.
fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}
