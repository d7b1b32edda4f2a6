//! Ranked reports built on `group_top_k`: trending words per period, URIs per day,
//! top words and sentiment per group.

use crate::config::SortField;
use crate::rank::{group_top_k, top_k_by, RankedResult};
use crate::sentiment::Lexicon;
use crate::source::InputRecord;
use crate::tokenize::tokenize;
use crate::util::null_safe;
use crate::velocity::VelocityRecord;
use ahash::RandomState;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Per period, the `n` rising words with the highest combined velocity.
/// Records without a positive combined velocity never appear.
pub fn trending_by_period(records: &[VelocityRecord], n: usize) -> Vec<RankedResult<String, VelocityRecord>> {
    group_top_k(
        records,
        |r| r.is_trending().then(|| r.period.clone()),
        |r| r.combined_velocity.unwrap_or(f64::NEG_INFINITY),
        n,
    )
}

// ----------------- web logs -----------------

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub date: Option<String>,
    pub uri: Option<String>,
    pub bytes: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UriStat {
    pub uri: String,
    pub requests: u64,
    pub bytes: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UriDateReport {
    pub date: String,
    pub total_requests: u64,
    pub total_bytes: u64,
    pub top: Vec<UriStat>,
}

/// Per date: request/byte totals and the top `n` URIs by `sort_field`.
/// Records missing a date or URI are dropped; missing bytes count as 0.
pub fn uri_report_by_date(records: &[LogRecord], sort_field: SortField, n: usize) -> Vec<UriDateReport> {
    let mut per_uri: BTreeMap<(String, String), (u64, u64)> = BTreeMap::new();
    let mut dropped = 0u64;
    for r in records {
        let (Some(date), Some(uri)) = (r.date.as_deref(), r.uri.as_deref()) else {
            dropped += 1;
            continue;
        };
        let e = per_uri.entry((date.to_string(), uri.to_string())).or_insert((0, 0));
        e.0 += 1;
        e.1 += r.bytes.unwrap_or(0);
    }
    if dropped > 0 {
        tracing::debug!("uri report: dropped {} records without date/uri", dropped);
    }

    let stats: Vec<(String, UriStat)> = per_uri
        .into_iter()
        .map(|((date, uri), (requests, bytes))| (date, UriStat { uri, requests, bytes }))
        .collect();

    let mut totals: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for (date, s) in &stats {
        let t = totals.entry(date.as_str()).or_insert((0, 0));
        t.0 += s.requests;
        t.1 += s.bytes;
    }

    let ranked = group_top_k(
        &stats,
        |(date, _)| Some(date.clone()),
        |(_, s)| match sort_field {
            SortField::Count => s.requests as f64,
            SortField::Bytes => s.bytes as f64,
        },
        n,
    );

    ranked
        .into_iter()
        .map(|group| {
            let (total_requests, total_bytes) = totals.get(group.group_key.as_str()).copied().unwrap_or((0, 0));
            UriDateReport {
                total_requests,
                total_bytes,
                top: group.items.into_iter().map(|(_, s)| s).collect(),
                date: group.group_key,
            }
        })
        .collect()
}

// ----------------- text by group -----------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: u64,
}

/// Per group key, the `n` most frequent tokens. Records without a group are dropped.
pub fn top_words_by_group(records: &[InputRecord], min_word_len: usize, n: usize) -> Vec<RankedResult<String, WordCount>> {
    let mut counts: BTreeMap<&str, HashMap<String, u64, RandomState>> = BTreeMap::new();
    for r in records {
        let Some(group) = r.group.as_deref() else { continue };
        let words = counts.entry(group).or_default();
        for t in tokenize(r.text.as_deref(), min_word_len) {
            *words.entry(t).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .map(|(group, words)| {
            let mut wc: Vec<WordCount> = words.into_iter().map(|(word, count)| WordCount { word, count }).collect();
            wc.sort_by(|a, b| a.word.cmp(&b.word));
            RankedResult {
                group_key: group.to_string(),
                items: top_k_by(&wc, n, |w| w.count as f64),
            }
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupSentiment {
    pub group: String,
    pub records: u64,
    pub total: f64,
    pub mean: f64,
}

/// Sentiment summed per group key; the `n` groups with the highest total, best first.
/// Records missing text or group contribute nothing.
pub fn sentiment_by_group(records: &[InputRecord], lexicon: &Lexicon, min_word_len: usize, n: usize) -> Vec<GroupSentiment> {
    let score_text = null_safe(|text: &str| {
        let tokens: Vec<String> = tokenize(Some(text), min_word_len).collect();
        lexicon.score(&tokens)
    });

    let mut per_group: BTreeMap<&str, (u64, f64)> = BTreeMap::new();
    for r in records {
        let Some(group) = r.group.as_deref() else { continue };
        let Some(score) = score_text(r.text.as_deref()) else { continue };
        let e = per_group.entry(group).or_insert((0, 0.0));
        e.0 += 1;
        e.1 += score;
    }

    let groups: Vec<GroupSentiment> = per_group
        .into_iter()
        .map(|(group, (records, total))| GroupSentiment {
            group: group.to_string(),
            records,
            total,
            mean: total / records as f64,
        })
        .collect();
    top_k_by(&groups, n, |g| g.total)
}
