//! Grouped top-K: group by key, order each group by a numeric field (descending),
//! keep the first N. Sorting is stable, so equal scores keep their input order.
//! Inputs are borrowed and never reordered.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedResult<K, T> {
    pub group_key: K,
    pub items: Vec<T>,
}

/// NaN ranks below every number.
#[inline]
fn desc(a: f64, b: f64) -> Ordering {
    let fix = |x: f64| if x.is_nan() { f64::NEG_INFINITY } else { x };
    fix(b).total_cmp(&fix(a))
}

fn top_k_refs<'a, T, F>(items: impl IntoIterator<Item = &'a T>, n: usize, score: &F) -> Vec<T>
where
    T: Clone + 'a,
    F: Fn(&T) -> f64,
{
    let mut scored: Vec<(f64, &T)> = items.into_iter().map(|it| (score(it), it)).collect();
    scored.sort_by(|a, b| desc(a.0, b.0));
    scored.into_iter().take(n).map(|(_, it)| it.clone()).collect()
}

/// The `n` highest-scoring items of `items`, highest first; ties keep input order.
pub fn top_k_by<T, F>(items: &[T], n: usize, score: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> f64,
{
    top_k_refs(items, n, &score)
}

/// Group `items` by `key` (items with no key are dropped), then rank each group
/// with `top_k_by`. Groups are returned in ascending key order.
pub fn group_top_k<T, K, KF, SF>(items: &[T], key: KF, score: SF, n: usize) -> Vec<RankedResult<K, T>>
where
    T: Clone + Send + Sync,
    K: Ord + Send,
    KF: Fn(&T) -> Option<K>,
    SF: Fn(&T) -> f64 + Sync,
{
    let mut groups: BTreeMap<K, Vec<&T>> = BTreeMap::new();
    for it in items {
        if let Some(k) = key(it) {
            groups.entry(k).or_default().push(it);
        }
    }
    let groups: Vec<(K, Vec<&T>)> = groups.into_iter().collect();
    groups
        .into_par_iter()
        .map(|(group_key, members)| RankedResult {
            group_key,
            items: top_k_refs(members, n, &score),
        })
        .collect()
}
