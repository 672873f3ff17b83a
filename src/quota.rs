//! Tag quotas and per-run usage accounting.
//!
//! A quota caps how many committed slots may carry a tag. Limits are either an
//! absolute count or a ratio of the deck size, and ratios are evaluated against
//! the current deck size every time they are consulted.

use crate::generator::GeneratorDescriptor;
use crate::reuse;
use crate::types::{Fingerprint, GeneratorId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;

/// Per-tag cap. Configured as a single number: values strictly between 0 and 1
/// are ratios of the deck size, anything else is an absolute slot count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum QuotaLimit {
    Absolute(usize),
    Ratio(f64),
}

impl QuotaLimit {
    pub fn effective(&self, total_slots: usize) -> usize {
        match *self {
            QuotaLimit::Absolute(count) => count,
            QuotaLimit::Ratio(ratio) => (ratio * total_slots as f64).floor() as usize,
        }
    }
}

impl TryFrom<f64> for QuotaLimit {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("quota limit must be a non-negative number, got {value}"));
        }
        if value > 0.0 && value < 1.0 {
            return Ok(QuotaLimit::Ratio(value));
        }
        if value.fract() != 0.0 {
            return Err(format!(
                "quota limit {value} is neither a ratio in (0, 1) nor a whole slot count"
            ));
        }
        Ok(QuotaLimit::Absolute(value as usize))
    }
}

impl From<QuotaLimit> for f64 {
    fn from(value: QuotaLimit) -> Self {
        match value {
            QuotaLimit::Absolute(count) => count as f64,
            QuotaLimit::Ratio(ratio) => ratio,
        }
    }
}

impl fmt::Display for QuotaLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuotaLimit::Absolute(count) => write!(f, "{count}"),
            QuotaLimit::Ratio(ratio) => write!(f, "{ratio} of total"),
        }
    }
}

/// Tag -> limit mapping for one schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuotaTable {
    limits: BTreeMap<String, QuotaLimit>,
}

impl QuotaTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, tag: impl Into<String>, limit: QuotaLimit) -> Self {
        self.limits.insert(tag.into(), limit);
        self
    }

    pub fn set_limit(&mut self, tag: impl Into<String>, limit: QuotaLimit) {
        self.limits.insert(tag.into(), limit);
    }

    pub fn limit(&self, tag: &str) -> Option<QuotaLimit> {
        self.limits.get(tag).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &QuotaLimit)> {
        self.limits.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }

    /// Tags whose committed count has reached the effective limit.
    /// Tags never used count as zero, so a limit of zero is exhausted from the start.
    pub fn exhausted_tags(&self, usage: &UsageState, total_slots: usize) -> BTreeSet<String> {
        self.limits
            .iter()
            .filter(|(tag, limit)| usage.tag_count(tag) >= limit.effective(total_slots))
            .map(|(tag, _)| tag.clone())
            .collect()
    }

    /// Generators carrying at least one exhausted tag. Recomputed on every call.
    pub fn prohibited_generators<C>(
        &self,
        generators: &[GeneratorDescriptor<C>],
        usage: &UsageState,
        total_slots: usize,
    ) -> HashSet<GeneratorId> {
        let exhausted = self.exhausted_tags(usage, total_slots);
        if exhausted.is_empty() {
            return HashSet::new();
        }
        generators
            .iter()
            .filter(|generator| generator.tags().iter().any(|tag| exhausted.contains(tag)))
            .map(|generator| generator.id().clone())
            .collect()
    }

    /// Exhausted tags carried by one generator, for commit-time rechecks.
    pub fn exhausted_tags_of<C>(
        &self,
        generator: &GeneratorDescriptor<C>,
        usage: &UsageState,
        total_slots: usize,
    ) -> Vec<String> {
        let exhausted = self.exhausted_tags(usage, total_slots);
        generator
            .tags()
            .iter()
            .filter(|tag| exhausted.contains(*tag))
            .cloned()
            .collect()
    }
}

impl FromIterator<(String, QuotaLimit)> for QuotaTable {
    fn from_iter<T: IntoIterator<Item = (String, QuotaLimit)>>(iter: T) -> Self {
        Self {
            limits: iter.into_iter().collect(),
        }
    }
}

/// Mutable accounting owned by exactly one scheduling run.
#[derive(Debug, Clone, Default)]
pub struct UsageState {
    tag_counts: HashMap<String, usize>,
    fingerprints: HashSet<Fingerprint>,
}

impl UsageState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tag_count(&self, tag: &str) -> usize {
        self.tag_counts.get(tag).copied().unwrap_or(0)
    }

    pub fn tag_counts(&self) -> &HashMap<String, usize> {
        &self.tag_counts
    }

    pub fn fingerprints(&self) -> &HashSet<Fingerprint> {
        &self.fingerprints
    }

    /// Account for one committed slot.
    pub fn record<'a>(
        &mut self,
        tags: impl IntoIterator<Item = &'a String>,
        fingerprints: &[Fingerprint],
    ) {
        for tag in tags {
            *self.tag_counts.entry(tag.clone()).or_insert(0) += 1;
        }
        self.fingerprints
            .extend(reuse::filter_fingerprints(fingerprints.to_vec()));
    }
}
