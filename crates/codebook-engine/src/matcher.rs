//! Tiered prompt matching.
//!
//! Lookup runs three tiers against the scoped candidate set, cheapest and
//! most trustworthy first:
//! 1. exact — case-folded, trimmed equality
//! 2. substring — containment in either direction
//! 3. fuzzy — word-overlap score, accepted only above the 0.5 threshold
//!
//! Candidate order is index order throughout, so the earliest record wins
//! every tie. The whole lookup is total: any input yields a response or
//! `None`, never an error.

use codebook_corpus::language::GENERIC_SCOPE;
use codebook_corpus::{PromptIndex, PromptRecord};

/// Words shorter than this are stopword noise and excluded from fuzzy
/// scoring.
const MIN_WORD_LEN: usize = 3;

/// A fuzzy candidate must overlap on strictly more than half its words.
const FUZZY_THRESHOLD: f32 = 0.5;

/// Finds the best stored response for a query, within an optional language
/// scope.
pub struct MatchEngine<'idx> {
    index: &'idx PromptIndex,
}

impl<'idx> MatchEngine<'idx> {
    pub fn new(index: &'idx PromptIndex) -> Self {
        Self { index }
    }

    /// Return the response of the best-matching record, or `None`.
    ///
    /// A restricting scope limits candidates to records with that exact
    /// language tag; an empty restricted set is a miss — there is no
    /// fallback to other languages. An absent scope, or the generic
    /// "plaintext" scope, searches the full index.
    pub fn find(&self, query: &str, scope: Option<&str>) -> Option<&'idx str> {
        let candidates: Vec<&'idx PromptRecord> = match scope {
            Some(tag) if tag != GENERIC_SCOPE => {
                let scoped: Vec<_> = self
                    .index
                    .records()
                    .iter()
                    .filter(|record| record.language.as_deref() == Some(tag))
                    .collect();
                if scoped.is_empty() {
                    return None;
                }
                scoped
            }
            _ => self.index.records().iter().collect(),
        };

        let query = normalize(query);
        if query.is_empty() {
            return None;
        }

        self.exact(&candidates, &query)
            .or_else(|| self.substring(&candidates, &query))
            .or_else(|| self.fuzzy(&candidates, &query))
    }

    fn exact(&self, candidates: &[&'idx PromptRecord], query: &str) -> Option<&'idx str> {
        candidates
            .iter()
            .find(|record| normalize(&record.prompt) == query)
            .map(|record| record.response.as_str())
    }

    fn substring(&self, candidates: &[&'idx PromptRecord], query: &str) -> Option<&'idx str> {
        candidates
            .iter()
            .find(|record| {
                let stored = normalize(&record.prompt);
                !stored.is_empty() && (query.contains(&stored) || stored.contains(query))
            })
            .map(|record| record.response.as_str())
    }

    /// Single-pass scan tracking the best score seen. Only a strictly higher
    /// score replaces the current best, so the first candidate at any score
    /// wins ties; only scores strictly above the threshold qualify at all.
    fn fuzzy(&self, candidates: &[&'idx PromptRecord], query: &str) -> Option<&'idx str> {
        let query_words = words(query);

        let mut best: Option<&'idx PromptRecord> = None;
        let mut best_score = 0.0f32;

        for &record in candidates {
            let stored = normalize(&record.prompt);
            let stored_words = words(&stored);
            let score = overlap_score(&query_words, &stored_words);
            if score > best_score && score > FUZZY_THRESHOLD {
                best_score = score;
                best = Some(record);
            }
        }

        best.map(|record| record.response.as_str())
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

fn words(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .filter(|word| word.len() >= MIN_WORD_LEN)
        .collect()
}

/// |shared words| / max(|query words|, |candidate words|), 0 when both sides
/// are empty.
fn overlap_score(query_words: &[&str], stored_words: &[&str]) -> f32 {
    let denominator = query_words.len().max(stored_words.len());
    if denominator == 0 {
        return 0.0;
    }
    let common = query_words
        .iter()
        .filter(|word| stored_words.contains(*word))
        .count();
    common as f32 / denominator as f32
}
