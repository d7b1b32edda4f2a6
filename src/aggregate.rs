//! Mergeable aggregation state plus the (word, period) counter behind word frequencies.
//! Implement `Aggregator` for a state type and fold it with `aggregate_parallel`
//! (or per file via `TrendPipeline::aggregate_files_parallel`).

use ahash::RandomState;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub trait Aggregator: Send + Default {
    type Item: ?Sized;
    fn ingest(&mut self, item: &Self::Item);
    fn merge(&mut self, other: Self);
}

/// Fold `items` into per-split aggregators on the rayon pool and merge them.
pub fn aggregate_parallel<A, T>(items: &[T]) -> A
where
    A: Aggregator<Item = T>,
    T: Sync,
{
    items
        .par_iter()
        .fold(A::default, |mut acc, item| {
            acc.ingest(item);
            acc
        })
        .reduce(A::default, |mut a, b| {
            a.merge(b);
            a
        })
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordPeriodCount {
    pub word: String,
    pub period: String,
    pub occurrences: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordPeriodFrequency {
    pub word: String,
    pub period: String,
    pub frequency: f64,
}

type WordCounts = HashMap<String, u64, RandomState>;

/// Occurrence counts keyed by period, then word.
/// A period can be present with no words (records that produced no tokens);
/// such periods have a zero total and are skipped by `frequencies()`.
#[derive(Clone, Debug, Default)]
pub struct PeriodCounts {
    periods: BTreeMap<String, WordCounts>,
}

impl PeriodCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a period even if it ends up without tokens.
    pub fn add_period(&mut self, period: &str) {
        if !self.periods.contains_key(period) {
            self.periods.insert(period.to_string(), WordCounts::default());
        }
    }

    pub fn add(&mut self, period: &str, word: &str) {
        self.add_n(period, word, 1);
    }

    fn add_n(&mut self, period: &str, word: &str, n: u64) {
        self.add_period(period);
        if let Some(words) = self.periods.get_mut(period) {
            match words.get_mut(word) {
                Some(c) => *c += n,
                None => {
                    words.insert(word.to_string(), n);
                }
            }
        }
    }

    /// Add every token of one record to `period`.
    pub fn add_tokens<I, S>(&mut self, period: &str, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_period(period);
        for t in tokens {
            self.add(period, t.as_ref());
        }
    }

    pub fn period_count(&self) -> usize {
        self.periods.len()
    }

    /// Sum of occurrences over all words in `period` (0 if unknown).
    pub fn period_total(&self, period: &str) -> u64 {
        self.periods.get(period).map(|w| w.values().sum()).unwrap_or(0)
    }

    pub fn total_tokens(&self) -> u64 {
        self.periods.values().flat_map(|w| w.values()).sum()
    }

    /// Occurrences of each word across all periods.
    pub fn word_totals(&self) -> HashMap<String, u64, RandomState> {
        let mut out: HashMap<String, u64, RandomState> = HashMap::default();
        for words in self.periods.values() {
            for (w, c) in words {
                *out.entry(w.clone()).or_insert(0) += c;
            }
        }
        out
    }

    /// All (word, period, occurrences), sorted by word then period.
    pub fn counts(&self) -> Vec<WordPeriodCount> {
        let mut out: Vec<WordPeriodCount> = self
            .periods
            .iter()
            .flat_map(|(period, words)| {
                words.iter().map(move |(word, &occurrences)| WordPeriodCount {
                    word: word.clone(),
                    period: period.clone(),
                    occurrences,
                })
            })
            .collect();
        out.sort_by(|a, b| a.word.cmp(&b.word).then_with(|| a.period.cmp(&b.period)));
        out
    }

    /// Per-period relative frequencies, sorted by word then period.
    /// Periods with a zero total are excluded and logged.
    pub fn frequencies(&self) -> Vec<WordPeriodFrequency> {
        let mut out = Vec::new();
        for (period, words) in &self.periods {
            let total: u64 = words.values().sum();
            if total == 0 {
                tracing::warn!("period {} has no tokens; excluded from frequencies", period);
                continue;
            }
            let total = total as f64;
            out.extend(words.iter().map(|(word, &c)| WordPeriodFrequency {
                word: word.clone(),
                period: period.clone(),
                frequency: c as f64 / total,
            }));
        }
        out.sort_by(|a, b| a.word.cmp(&b.word).then_with(|| a.period.cmp(&b.period)));
        out
    }
}

/// Ingests `(period, word)` pairs.
impl Aggregator for PeriodCounts {
    type Item = (String, String);

    fn ingest(&mut self, item: &Self::Item) {
        self.add(&item.0, &item.1);
    }

    fn merge(&mut self, other: Self) {
        for (period, words) in other.periods {
            self.add_period(&period);
            for (word, c) in words {
                self.add_n(&period, &word, c);
            }
        }
    }
}
