//! CSV export of every candidate in insertion order.

use anyhow::Context;

use crate::errors::AppError;
use crate::screening::models::Candidate;

pub const EXPORT_FILENAME: &str = "screening_results.csv";

const HEADER: [&str; 8] = [
    "id",
    "name",
    "email",
    "filename",
    "similarity",
    "skill_overlap",
    "total",
    "skills",
];

/// Renders all candidates as CSV. Unscored candidates get empty score columns.
pub fn candidates_to_csv(candidates: &[Candidate]) -> Result<String, AppError> {
    if candidates.is_empty() {
        return Err(AppError::Validation(
            "No candidates to export".to_string(),
        ));
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(HEADER)
        .context("writing CSV header")?;

    for c in candidates {
        let (similarity, overlap, total) = match &c.scores {
            Some(s) => (
                format!("{:.3}", s.similarity),
                format!("{:.3}", s.skill_overlap),
                format!("{:.1}", s.total),
            ),
            None => (String::new(), String::new(), String::new()),
        };
        let skills = c.skills.iter().map(String::as_str).collect::<Vec<_>>().join("; ");

        writer
            .write_record([
                c.id.to_string().as_str(),
                c.name.as_str(),
                c.email.as_deref().unwrap_or(""),
                c.filename.as_str(),
                similarity.as_str(),
                overlap.as_str(),
                total.as_str(),
                skills.as_str(),
            ])
            .with_context(|| format!("writing CSV row for candidate {}", c.id))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV writer: {}", e.error()))?;
    Ok(String::from_utf8(bytes).context("CSV output is not UTF-8")?)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::screening::models::ScoreResult;

    fn candidate(id: u64, skills: &[&str], scores: Option<ScoreResult>) -> Candidate {
        Candidate {
            id,
            name: format!("Candidate {id}"),
            email: None,
            filename: format!("cv{id}.txt"),
            raw_text: String::new(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            scores,
            uploaded_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_export_is_validation_error() {
        assert!(matches!(
            candidates_to_csv(&[]),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_scored_and_unscored_rows() {
        let scored = candidate(
            1,
            &["sql", "python"],
            Some(ScoreResult {
                similarity: 0.41237,
                skill_overlap: 0.6667,
                total: 48.9,
            }),
        );
        let mut unscored = candidate(2, &[], None);
        unscored.email = Some("b@example.com".to_string());

        let csv = candidates_to_csv(&[scored, unscored]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "id,name,email,filename,similarity,skill_overlap,total,skills"
        );
        assert_eq!(lines[1], "1,Candidate 1,,cv1.txt,0.412,0.667,48.9,python; sql");
        assert_eq!(lines[2], "2,Candidate 2,b@example.com,cv2.txt,,,,");
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let mut c = candidate(3, &[], None);
        c.name = "Doe, Jane".to_string();
        let csv = candidates_to_csv(&[c]).unwrap();
        assert!(csv.contains("\"Doe, Jane\""));
    }
}
