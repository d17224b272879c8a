//! Similarity Engine — two-document TF-IDF vector space with cosine similarity.
//!
//! Every call builds a fresh vocabulary from exactly the two documents being
//! compared; nothing is shared between calls.

use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::screening::normalize::normalize;

/// Default cap on vocabulary size.
pub const DEFAULT_MAX_FEATURES: usize = 5000;

/// Vocabulary tokens: runs of two or more word characters.
static TERM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("term regex is valid"));

/// Standard English stop words excluded from the vocabulary.
static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
        "almost", "alone", "along", "already", "also", "although", "always", "am", "among",
        "amongst", "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone",
        "anything", "anyway", "anywhere", "are", "around", "as", "at", "back", "be", "became",
        "because", "become", "becomes", "becoming", "been", "before", "beforehand", "behind",
        "being", "below", "beside", "besides", "between", "beyond", "bill", "both", "bottom",
        "but", "by", "call", "can", "cannot", "cant", "co", "con", "could", "couldnt", "cry",
        "de", "describe", "detail", "do", "done", "down", "due", "during", "each", "eg",
        "eight", "either", "eleven", "else", "elsewhere", "empty", "enough", "etc", "even",
        "ever", "every", "everyone", "everything", "everywhere", "except", "few", "fifteen",
        "fifty", "fill", "find", "fire", "first", "five", "for", "former", "formerly", "forty",
        "found", "four", "from", "front", "full", "further", "get", "give", "go", "had", "has",
        "hasnt", "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein",
        "hereupon", "hers", "herself", "him", "himself", "his", "how", "however", "hundred",
        "i", "ie", "if", "in", "inc", "indeed", "interest", "into", "is", "it", "its", "itself",
        "keep", "last", "latter", "latterly", "least", "less", "ltd", "made", "many", "may",
        "me", "meanwhile", "might", "mill", "mine", "more", "moreover", "most", "mostly",
        "move", "much", "must", "my", "myself", "name", "namely", "neither", "never",
        "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
        "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
        "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own",
        "part", "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem",
        "seemed", "seeming", "seems", "serious", "several", "she", "should", "show", "side",
        "since", "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something",
        "sometime", "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than",
        "that", "the", "their", "them", "themselves", "then", "thence", "there", "thereafter",
        "thereby", "therefore", "therein", "thereupon", "these", "they", "thick", "thin",
        "third", "this", "those", "though", "three", "through", "throughout", "thru", "thus",
        "to", "together", "too", "top", "toward", "towards", "twelve", "twenty", "two", "un",
        "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well", "were",
        "what", "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas",
        "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while", "whither",
        "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without",
        "would", "yet", "you", "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

/// Splits normalized text into vocabulary terms, dropping stop words.
fn terms(text: &str) -> impl Iterator<Item = &str> {
    TERM_RE
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|t| !STOP_WORDS.contains(t))
}

fn term_counts(text: &str) -> BTreeMap<&str, u32> {
    let mut counts = BTreeMap::new();
    for term in terms(text) {
        *counts.entry(term).or_insert(0) += 1;
    }
    counts
}

/// TF-IDF cosine similarity over a two-document corpus.
#[derive(Debug, Clone)]
pub struct TfIdfSimilarity {
    max_features: usize,
}

impl Default for TfIdfSimilarity {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FEATURES)
    }
}

impl TfIdfSimilarity {
    pub fn new(max_features: usize) -> Self {
        Self { max_features }
    }

    /// Cosine similarity of `a` and `b` in `[0, 1]`.
    ///
    /// Returns exactly `0.0` when either text is blank or when either vector is
    /// zero (e.g. a text made only of stop words).
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        let a = normalize(a);
        let b = normalize(b);
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }

        let counts_a = term_counts(&a);
        let counts_b = term_counts(&b);
        let vocabulary = self.vocabulary(&counts_a, &counts_b);
        if vocabulary.is_empty() {
            return 0.0;
        }

        let mut dot = 0.0_f64;
        let mut norm_a = 0.0_f64;
        let mut norm_b = 0.0_f64;
        for term in &vocabulary {
            let tf_a = counts_a.get(term).copied().unwrap_or(0);
            let tf_b = counts_b.get(term).copied().unwrap_or(0);
            let df = u32::from(tf_a > 0) + u32::from(tf_b > 0);
            let idf = smoothed_idf(df);
            let wa = f64::from(tf_a) * idf;
            let wb = f64::from(tf_b) * idf;
            dot += wa * wb;
            norm_a += wa * wa;
            norm_b += wb * wb;
        }

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        let sim = dot / (norm_a.sqrt() * norm_b.sqrt());
        if sim.is_nan() {
            return 0.0;
        }
        sim.clamp(0.0, 1.0)
    }

    /// Terms kept for the vector space, sorted. When the corpus has more distinct
    /// terms than `max_features`, keeps the most frequent (ties alphabetical).
    fn vocabulary<'a>(
        &self,
        counts_a: &BTreeMap<&'a str, u32>,
        counts_b: &BTreeMap<&'a str, u32>,
    ) -> Vec<&'a str> {
        let mut corpus: BTreeMap<&'a str, u32> = counts_a.clone();
        for (&term, &n) in counts_b {
            *corpus.entry(term).or_insert(0) += n;
        }

        if corpus.len() <= self.max_features {
            return corpus.into_keys().collect();
        }

        let mut ranked: Vec<(&'a str, u32)> = corpus.into_iter().collect();
        // BTreeMap order is alphabetical and sort_by is stable.
        ranked.sort_by(|x, y| y.1.cmp(&x.1));
        ranked.truncate(self.max_features);
        let mut kept: Vec<&'a str> = ranked.into_iter().map(|(t, _)| t).collect();
        kept.sort_unstable();
        kept
    }
}

/// `ln((1 + n) / (1 + df)) + 1` with `n = 2` documents.
fn smoothed_idf(df: u32) -> f64 {
    (3.0 / (1.0 + f64::from(df))).ln() + 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const JD: &str = "Looking for a Python developer with SQL and AWS experience";

    #[test]
    fn test_blank_inputs_yield_zero() {
        let engine = TfIdfSimilarity::default();
        assert_eq!(engine.similarity("", "anything"), 0.0);
        assert_eq!(engine.similarity("anything", ""), 0.0);
        assert_eq!(engine.similarity("   \n", "anything"), 0.0);
    }

    #[test]
    fn test_stop_words_only_yields_zero_not_nan() {
        let engine = TfIdfSimilarity::default();
        let sim = engine.similarity("the and of with", "python developer");
        assert_eq!(sim, 0.0);
        assert!(!sim.is_nan());
    }

    #[test]
    fn test_identical_text_is_one() {
        let engine = TfIdfSimilarity::default();
        let sim = engine.similarity(JD, JD);
        assert!((sim - 1.0).abs() < 1e-12, "got {sim}");
    }

    #[test]
    fn test_self_similarity_is_maximal() {
        let engine = TfIdfSimilarity::default();
        let own = engine.similarity(JD, JD);
        let related = engine.similarity(JD, "Python, SQL, AWS, Docker");
        let unrelated = engine.similarity(JD, "Excel, Marketing");
        assert!(own >= related);
        assert!(related > unrelated);
        assert_eq!(unrelated, 0.0);
    }

    #[test]
    fn test_case_and_whitespace_do_not_matter() {
        let engine = TfIdfSimilarity::default();
        let a = engine.similarity("Rust  services\nand Kafka", "rust SERVICES");
        let b = engine.similarity("rust services and kafka", "rust services");
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_deterministic_across_calls() {
        let engine = TfIdfSimilarity::default();
        let resume = "Senior Python engineer. Built SQL pipelines on AWS, Docker and Airflow.";
        let first = engine.similarity(JD, resume);
        for _ in 0..10 {
            assert_eq!(engine.similarity(JD, resume).to_bits(), first.to_bits());
        }
    }

    #[test]
    fn test_result_within_unit_interval() {
        let engine = TfIdfSimilarity::default();
        let sim = engine.similarity("rust rust rust go", "rust go go java");
        assert!((0.0..=1.0).contains(&sim));
        assert!(sim > 0.0);
    }

    #[test]
    fn test_single_char_tokens_are_ignored() {
        assert_eq!(terms("a b c r").count(), 0);
        assert_eq!(terms("rust is great").collect::<Vec<_>>(), vec!["rust", "great"]);
    }

    #[test]
    fn test_vocabulary_cap_keeps_most_frequent() {
        let engine = TfIdfSimilarity::new(2);
        let a = term_counts("rust rust rust kafka kafka zebra");
        let b = term_counts("rust apple");
        let vocab = engine.vocabulary(&a, &b);
        assert_eq!(vocab, vec!["kafka", "rust"]);
    }

    #[test]
    fn test_vocabulary_cap_ties_break_alphabetically() {
        let engine = TfIdfSimilarity::new(2);
        let a = term_counts("delta charlie bravo");
        let b = term_counts("alpha");
        assert_eq!(engine.vocabulary(&a, &b), vec!["alpha", "bravo"]);
    }

    #[test]
    fn test_capped_vocabulary_with_no_shared_terms_is_zero() {
        let engine = TfIdfSimilarity::new(1);
        // "rust" dominates the corpus and only appears in the first document.
        assert_eq!(engine.similarity("rust rust rust", "kafka"), 0.0);
    }

    #[test]
    fn test_smoothed_idf_values() {
        assert!((smoothed_idf(2) - 1.0).abs() < 1e-12);
        assert!((smoothed_idf(1) - (1.5_f64.ln() + 1.0)).abs() < 1e-12);
    }
}
