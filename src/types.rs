//! Core identifiers shared across the scheduler.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque generator identity, unique within a generator pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneratorId(String);

impl GeneratorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GeneratorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GeneratorId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for GeneratorId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identifies one piece of produced content (an image URL, a quote, a phrase).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Blank fingerprints carry no identity and are never tracked.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Fingerprint {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Fingerprint {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Immutable per-slot input handed to generators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotContext {
    pub topic: String,
    pub presenter: Option<String>,
    pub slot_index: usize,
    pub total_slots: usize,
    pub seed: String,
}

impl SlotContext {
    pub fn is_first(&self) -> bool {
        self.slot_index == 0
    }

    pub fn is_last(&self) -> bool {
        self.slot_index + 1 == self.total_slots
    }
}
