//! Word-level spelling correction against the topic vocabulary.
//!
//! Scores use normalized InDel similarity (insertions and deletions only),
//! scaled to 0..=100. A word is replaced only when its best topic scores
//! strictly above [`CORRECTION_THRESHOLD`].

use crate::topics::Topic;

/// Minimum score (exclusive) for a word to be replaced by a topic.
pub const CORRECTION_THRESHOLD: f64 = 80.0;

/// Length of the longest common subsequence of two char slices.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Similarity in 0..=100: `100 * (1 - indel / (len(a) + len(b)))`.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    let indel = total - 2 * lcs_len(&a, &b);
    100.0 * (total - indel) as f64 / total as f64
}

/// Best-scoring topic for `word`. Ties keep the earliest topic.
pub fn best_match<'a>(word: &str, topics: &'a [Topic]) -> Option<(&'a str, f64)> {
    let mut best: Option<(&str, f64)> = None;
    for topic in topics {
        let score = ratio(word, topic);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((topic.as_str(), score));
            if score >= 100.0 {
                break;
            }
        }
    }
    best
}

/// Replace each whitespace-separated word with its closest topic when the
/// match is strong enough, then rejoin with single spaces.
pub fn correct_spelling(question: &str, topics: &[Topic]) -> String {
    question
        .split_whitespace()
        .map(|word| match best_match(word, topics) {
            Some((topic, score)) if score > CORRECTION_THRESHOLD => topic,
            _ => word,
        })
        .collect::<Vec<_>>()
        .join(" ")
}
