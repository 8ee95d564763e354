//! Summary statistics over a customer's transaction history
//!
//! All of these treat an empty input as "insufficient data" and return
//! `None` or an empty set rather than pretending the statistic is zero.

use std::collections::HashMap;
use std::hash::Hash;

/// Arithmetic mean. `None` on empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Most frequent values. All tied values are kept; the result is sorted
/// for deterministic output. Empty on empty input.
pub fn modes<T>(values: &[T]) -> Vec<T>
where
    T: Eq + Hash + Ord + Clone,
{
    let mut counts: HashMap<&T, usize> = HashMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }

    let max = match counts.values().max() {
        Some(&m) => m,
        None => return Vec::new(),
    };

    let mut result: Vec<T> = counts
        .into_iter()
        .filter(|&(_, c)| c == max)
        .map(|(v, _)| v.clone())
        .collect();
    result.sort();
    result
}

/// Fraction of `values` equal to `target`. Zero on empty input (callers
/// that need to distinguish "no data" check emptiness first).
pub fn frequency_ratio<T: PartialEq>(values: &[T], target: &T) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let hits = values.iter().filter(|v| *v == target).count();
    hits as f64 / values.len() as f64
}

/// The `k` most frequent values, ties broken by value order so the result
/// is deterministic. Used for the categorical "usual locations" set.
pub fn top_frequent<T>(values: &[T], k: usize) -> Vec<T>
where
    T: Eq + Hash + Ord + Clone,
{
    let mut counts: HashMap<&T, usize> = HashMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }

    let mut ranked: Vec<(&T, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    ranked.into_iter().take(k).map(|(v, _)| v.clone()).collect()
}
