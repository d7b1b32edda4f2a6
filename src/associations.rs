//! Words that co-occur with a target word more than their corpus frequency predicts.
//! score = (co-occurrences / all co-occurring tokens) / corpus frequency.

use crate::rank::top_k_by;
use ahash::RandomState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Association {
    pub word: String,
    pub co_occurrences: u64,
    pub corpus_frequency: f64,
    pub score: f64,
}

/// Rank words found in the same document as `target`.
/// Candidates rarer than `min_corpus_frequency` across the whole corpus are ignored;
/// at most `max` associations are returned, best first.
pub fn associations<D, S>(docs: &[D], target: &str, min_corpus_frequency: f64, max: usize) -> Vec<Association>
where
    D: AsRef<[S]>,
    S: AsRef<str>,
{
    let mut corpus: HashMap<&str, u64, RandomState> = HashMap::default();
    let mut cooc: HashMap<&str, u64, RandomState> = HashMap::default();
    let mut corpus_total = 0u64;

    for doc in docs {
        let tokens = doc.as_ref();
        corpus_total += tokens.len() as u64;
        for t in tokens {
            *corpus.entry(t.as_ref()).or_insert(0) += 1;
        }
        if !tokens.iter().any(|t| t.as_ref() == target) {
            continue;
        }
        for t in tokens.iter().map(|t| t.as_ref()).filter(|t| *t != target) {
            *cooc.entry(t).or_insert(0) += 1;
        }
    }

    let cooc_total: u64 = cooc.values().sum();
    if corpus_total == 0 || cooc_total == 0 {
        return Vec::new();
    }

    let mut candidates: Vec<Association> = cooc
        .into_iter()
        .filter_map(|(word, c)| {
            let corpus_frequency = *corpus.get(word)? as f64 / corpus_total as f64;
            if corpus_frequency < min_corpus_frequency {
                return None;
            }
            Some(Association {
                word: word.to_string(),
                co_occurrences: c,
                corpus_frequency,
                score: (c as f64 / cooc_total as f64) / corpus_frequency,
            })
        })
        .collect();
    // hash order is arbitrary; fix it so ties rank reproducibly
    candidates.sort_by(|a, b| a.word.cmp(&b.word));
    top_k_by(&candidates, max, |a| a.score)
}
