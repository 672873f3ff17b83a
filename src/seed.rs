//! Per-slot topic seeds.

use serde::{Deserialize, Serialize};

/// Yields the seed for a slot on demand. Implementations may adapt across
/// calls, so callers query each slot at most once per run and cache the value.
pub trait SeedSequence: Send {
    fn seed(&mut self, slot_index: usize) -> String;
}

/// Every slot is seeded with the topic itself.
#[derive(Debug, Clone)]
pub struct IdentitySeeds {
    topic: String,
}

impl IdentitySeeds {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
        }
    }
}

impl SeedSequence for IdentitySeeds {
    fn seed(&mut self, _slot_index: usize) -> String {
        self.topic.clone()
    }
}

/// Slot 0 gets the topic; later slots cycle through related seeds.
#[derive(Debug, Clone)]
pub struct CyclingSeeds {
    topic: String,
    related: Vec<String>,
}

impl CyclingSeeds {
    pub fn new(topic: impl Into<String>, related: Vec<String>) -> Self {
        Self {
            topic: topic.into(),
            related,
        }
    }
}

impl SeedSequence for CyclingSeeds {
    fn seed(&mut self, slot_index: usize) -> String {
        if slot_index == 0 || self.related.is_empty() {
            return self.topic.clone();
        }
        self.related[(slot_index - 1) % self.related.len()].clone()
    }
}

/// Configurable choice of seed sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeedStrategy {
    #[default]
    Identity,
    Cycle {
        seeds: Vec<String>,
    },
}

impl SeedStrategy {
    pub fn sequence(&self, topic: &str, _total_slots: usize) -> Box<dyn SeedSequence> {
        match self {
            SeedStrategy::Identity => Box::new(IdentitySeeds::new(topic)),
            SeedStrategy::Cycle { seeds } => Box::new(CyclingSeeds::new(topic, seeds.clone())),
        }
    }
}
