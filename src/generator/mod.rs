//! Generator descriptors: a content source plus the metadata the scheduler
//! needs to place it (tags, weight, reuse tolerance, internal retries).

pub mod sources;

use crate::reuse;
use crate::types::{Fingerprint, GeneratorId, SlotContext};
use crate::weight::WeightPolicy;
use async_trait::async_trait;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

pub use sources::{FallbackSource, MapSource, StaticSource, TemplateSource};

/// Content for one slot plus the fingerprints identifying what it used.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedContent<C> {
    pub content: C,
    pub fingerprints: Vec<Fingerprint>,
}

impl<C> GeneratedContent<C> {
    pub fn new(content: C, fingerprints: Vec<Fingerprint>) -> Self {
        Self {
            content,
            fingerprints,
        }
    }
}

/// A leaf that produces slot content.
///
/// Implementations may be called concurrently for different slots and must
/// not hold on to `used`. Returning `None` means "nothing usable for this
/// context"; it is not an error.
#[async_trait]
pub trait ContentSource<C>: Send + Sync {
    async fn generate(
        &self,
        context: &SlotContext,
        used: &HashSet<Fingerprint>,
    ) -> Option<GeneratedContent<C>>;
}

/// A content source registered with the scheduler.
pub struct GeneratorDescriptor<C> {
    id: GeneratorId,
    tags: BTreeSet<String>,
    weight: WeightPolicy,
    repetition_tolerance: usize,
    retry_budget: usize,
    source: Arc<dyn ContentSource<C>>,
}

impl<C: Send + 'static> GeneratorDescriptor<C> {
    pub fn builder(
        id: impl Into<GeneratorId>,
        source: impl ContentSource<C> + 'static,
    ) -> GeneratorBuilder<C> {
        GeneratorBuilder::new(id.into(), Arc::new(source))
    }

    pub fn from_shared(
        id: impl Into<GeneratorId>,
        source: Arc<dyn ContentSource<C>>,
    ) -> GeneratorBuilder<C> {
        GeneratorBuilder::new(id.into(), source)
    }

    /// Invoke the source up to `1 + retry_budget` times, returning the first
    /// output whose reuse of `used` is within this generator's tolerance.
    pub async fn generate(
        &self,
        context: &SlotContext,
        used: &HashSet<Fingerprint>,
    ) -> Option<GeneratedContent<C>> {
        let attempts = self.retry_budget + 1;
        for attempt in 1..=attempts {
            match self.source.generate(context, used).await {
                Some(mut output) => {
                    output.fingerprints = reuse::filter_fingerprints(output.fingerprints);
                    let overlap = reuse::overlap_count(&output.fingerprints, used);
                    if overlap <= self.repetition_tolerance {
                        return Some(output);
                    }
                    debug!(
                        generator = %self.id,
                        slot_index = context.slot_index,
                        attempt,
                        overlap,
                        tolerance = self.repetition_tolerance,
                        "Discarding output that repeats used content"
                    );
                }
                None => {
                    debug!(
                        generator = %self.id,
                        slot_index = context.slot_index,
                        attempt,
                        "Source produced nothing"
                    );
                }
            }
        }
        None
    }
}

impl<C> GeneratorDescriptor<C> {
    pub fn id(&self) -> &GeneratorId {
        &self.id
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn weight_policy(&self) -> &WeightPolicy {
        &self.weight
    }

    pub fn weight(&self, slot_index: usize, total_slots: usize) -> f64 {
        self.weight.weight(slot_index, total_slots)
    }

    pub fn repetition_tolerance(&self) -> usize {
        self.repetition_tolerance
    }

    pub fn retry_budget(&self) -> usize {
        self.retry_budget
    }
}

impl<C> Clone for GeneratorDescriptor<C> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            tags: self.tags.clone(),
            weight: self.weight.clone(),
            repetition_tolerance: self.repetition_tolerance,
            retry_budget: self.retry_budget,
            source: Arc::clone(&self.source),
        }
    }
}

impl<C> fmt::Debug for GeneratorDescriptor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorDescriptor")
            .field("id", &self.id)
            .field("tags", &self.tags)
            .field("weight", &self.weight)
            .field("repetition_tolerance", &self.repetition_tolerance)
            .field("retry_budget", &self.retry_budget)
            .finish_non_exhaustive()
    }
}

pub struct GeneratorBuilder<C> {
    id: GeneratorId,
    tags: BTreeSet<String>,
    weight: WeightPolicy,
    repetition_tolerance: usize,
    retry_budget: usize,
    source: Arc<dyn ContentSource<C>>,
}

impl<C> GeneratorBuilder<C> {
    fn new(id: GeneratorId, source: Arc<dyn ContentSource<C>>) -> Self {
        Self {
            id,
            tags: BTreeSet::new(),
            weight: WeightPolicy::default(),
            repetition_tolerance: 0,
            retry_budget: 0,
            source,
        }
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn weight(mut self, weight: WeightPolicy) -> Self {
        self.weight = weight;
        self
    }

    pub fn repetition_tolerance(mut self, tolerance: usize) -> Self {
        self.repetition_tolerance = tolerance;
        self
    }

    pub fn retry_budget(mut self, retries: usize) -> Self {
        self.retry_budget = retries;
        self
    }

    pub fn build(self) -> GeneratorDescriptor<C> {
        GeneratorDescriptor {
            id: self.id,
            tags: self.tags,
            weight: self.weight,
            repetition_tolerance: self.repetition_tolerance,
            retry_budget: self.retry_budget,
            source: self.source,
        }
    }
}
