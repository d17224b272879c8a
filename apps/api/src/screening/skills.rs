//! Skill Extractor — matches a fixed lexicon of skill phrases against free text.

use std::collections::BTreeSet;

/// Recognized skill phrases, all lowercase.
pub const LEXICON: &[&str] = &[
    // Programming languages
    "python", "java", "javascript", "typescript", "c", "c++", "c#", "go", "ruby", "php",
    "swift", "kotlin", "rust", "sql",
    // Data / ML
    "machine learning", "deep learning", "nlp", "computer vision", "pandas", "numpy",
    "scikit-learn", "tensorflow", "pytorch", "data analysis", "data engineering", "etl",
    "airflow", "spark", "hadoop", "power bi", "tableau", "excel",
    // Cloud / DevOps
    "aws", "azure", "gcp", "docker", "kubernetes", "terraform", "ansible", "ci/cd",
    "jenkins", "gitlab ci", "github actions",
    // Web / frameworks
    "react", "angular", "vue", "django", "flask", "fastapi", "spring", "spring boot",
    "node.js", "express", ".net",
    // Databases
    "postgresql", "mysql", "mongodb", "redis", "elasticsearch", "snowflake", "redshift",
    "bigquery",
    // Testing / QA
    "unit testing", "integration testing", "pytest", "jest", "cypress", "selenium",
    // Misc
    "rest", "graphql", "microservices", "agile", "scrum", "jira", "linux", "bash", "shell",
    "oop", "design patterns",
];

/// Characters that continue a word; a lexicon hit must not touch one on either side.
fn is_word_internal(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '+' | '.' | '#' | '-')
}

/// Returns the lexicon phrases found at least once in `text`, case-insensitively.
///
/// `"go"` inside `"gopher"` or `"c"` inside `"c++"` do not count: the characters on
/// both sides of an occurrence must not be word-internal.
pub fn extract_skills(text: &str) -> BTreeSet<String> {
    let haystack = text.to_lowercase();
    LEXICON
        .iter()
        .filter(|skill| contains_phrase(&haystack, skill))
        .map(|skill| skill.to_string())
        .collect()
}

fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    haystack.match_indices(phrase).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + phrase.len()..].chars().next();
        !before.is_some_and(is_word_internal) && !after.is_some_and(is_word_internal)
    })
}
