//! Month-over-month word velocity.
//!
//! For each point of a word's time series we compare against the previous point.
//! When the two periods are consecutive calendar months the absolute velocity is the
//! frequency delta and the relative velocity is a signed square-root of the ratio.
//! Otherwise (first appearance, or a gap in the timeline) the previous frequency is
//! treated as absent: the absolute velocity is the current frequency and the relative
//! velocity is pinned to `1.0`.
//!
//! `combined_velocity = 1e6 * abs * rel * (abs < 0 ? -1 : 1)`; only records with a
//! positive combined velocity count as trending.

use crate::aggregate::WordPeriodFrequency;
use crate::date::consecutive_periods;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const VELOCITY_SCALE: f64 = 1_000_000.0;

/// Relative velocity used when there is no consecutive predecessor.
pub const GAP_RELATIVE_VELOCITY: f64 = 1.0;

/// A word's frequencies ordered ascending by period. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct WordTimeSeries {
    word: String,
    points: Vec<(String, f64)>,
}

impl WordTimeSeries {
    pub fn new(word: impl Into<String>, mut points: Vec<(String, f64)>) -> Self {
        points.sort_by(|a, b| a.0.cmp(&b.0));
        Self { word: word.into(), points }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn points(&self) -> &[(String, f64)] {
        &self.points
    }

    /// Group frequencies by word; series come back in ascending word order.
    pub fn from_frequencies(freqs: &[WordPeriodFrequency]) -> Vec<WordTimeSeries> {
        let mut by_word: BTreeMap<&str, Vec<(String, f64)>> = BTreeMap::new();
        for f in freqs {
            by_word
                .entry(f.word.as_str())
                .or_default()
                .push((f.period.clone(), f.frequency));
        }
        by_word
            .into_iter()
            .map(|(word, points)| WordTimeSeries::new(word, points))
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VelocityRecord {
    pub word: String,
    pub period: String,
    pub frequency: f64,
    pub absolute_velocity: f64,
    pub relative_velocity: Option<f64>,
    pub combined_velocity: Option<f64>,
}

impl VelocityRecord {
    /// Rising in both absolute and relative terms.
    pub fn is_trending(&self) -> bool {
        matches!(self.combined_velocity, Some(c) if c > 0.0)
    }
}

/// Signed square-root ratio between two consecutive, strictly positive frequencies.
pub fn relative_velocity(prev: f64, cur: f64) -> Option<f64> {
    if !(prev > 0.0 && cur > 0.0) {
        return None;
    }
    let ratio = (1.0 + (cur - prev) / prev).abs();
    if cur >= prev {
        Some(ratio.sqrt())
    } else {
        Some(-(1.0 / ratio).sqrt())
    }
}

pub fn combined_velocity(absolute: f64, relative: Option<f64>) -> Option<f64> {
    let sign = if absolute < 0.0 { -1.0 } else { 1.0 };
    relative.map(|rel| VELOCITY_SCALE * absolute * rel * sign)
}

/// One record per point of `series`, in the same order.
pub fn velocities(series: &WordTimeSeries) -> Vec<VelocityRecord> {
    let mut out = Vec::with_capacity(series.points.len());
    let mut prev: Option<&(String, f64)> = None;
    for point in &series.points {
        let (period, freq) = point;
        let (absolute, relative) = match prev {
            Some((prev_period, prev_freq)) if consecutive_periods(prev_period, period) => {
                (freq - prev_freq, relative_velocity(*prev_freq, *freq))
            }
            _ => (*freq, Some(GAP_RELATIVE_VELOCITY)),
        };
        out.push(VelocityRecord {
            word: series.word.clone(),
            period: period.clone(),
            frequency: *freq,
            absolute_velocity: absolute,
            relative_velocity: relative,
            combined_velocity: combined_velocity(absolute, relative),
        });
        prev = Some(point);
    }
    out
}

/// Velocities for many series, computed per word on the rayon pool.
/// Output is flattened in the order of `series`.
pub fn velocities_parallel(series: &[WordTimeSeries]) -> Vec<VelocityRecord> {
    series.par_iter().flat_map_iter(velocities).collect()
}
