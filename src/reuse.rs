//! Reuse guard: bounds how much previously committed content a new slot may repeat.

use crate::types::Fingerprint;
use std::collections::HashSet;

/// Number of `candidate` fingerprints already present in `used`.
/// Duplicates and blank fingerprints in `candidate` are counted once / ignored.
pub fn overlap_count(candidate: &[Fingerprint], used: &HashSet<Fingerprint>) -> usize {
    let mut seen = HashSet::new();
    candidate
        .iter()
        .filter(|fp| !fp.is_blank())
        .filter(|fp| seen.insert(*fp))
        .filter(|fp| used.contains(*fp))
        .count()
}

/// Accept iff the overlap with `used` is at most `tolerance`.
pub fn accept(candidate: &[Fingerprint], used: &HashSet<Fingerprint>, tolerance: usize) -> bool {
    overlap_count(candidate, used) <= tolerance
}

/// Drop blank entries and duplicates, keeping first-seen order.
pub fn filter_fingerprints(fingerprints: Vec<Fingerprint>) -> Vec<Fingerprint> {
    let mut seen = HashSet::new();
    fingerprints
        .into_iter()
        .filter(|fp| !fp.is_blank())
        .filter(|fp| seen.insert(fp.clone()))
        .collect()
}
