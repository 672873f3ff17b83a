//! Shared test utilities for integration tests
//!
//! Small generator sources with predictable behavior, plus isolated config
//! directories for tests that load configuration from disk.

use async_trait::async_trait;
use parking_lot::Mutex;
use slotdeck::generator::{ContentSource, GeneratedContent, GeneratorDescriptor};
use slotdeck::schedule::{RunRequest, ScheduleOutcome};
use slotdeck::types::{Fingerprint, SlotContext};
use slotdeck::weight::WeightPolicy;
use std::collections::HashSet;
use std::sync::Arc;
use tempfile::TempDir;

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Emits `<label>:<slot>` with that string as its only fingerprint.
pub struct Labelled {
    pub label: &'static str,
}

#[async_trait]
impl ContentSource<String> for Labelled {
    async fn generate(
        &self,
        context: &SlotContext,
        _used: &HashSet<Fingerprint>,
    ) -> Option<GeneratedContent<String>> {
        let text = format!("{}:{}", self.label, context.slot_index);
        Some(GeneratedContent::new(text.clone(), vec![Fingerprint::from(text)]))
    }
}

/// Never produces content. Counts how often it was asked.
#[derive(Default)]
pub struct AlwaysFails {
    pub calls: Arc<Mutex<usize>>,
}

#[async_trait]
impl ContentSource<String> for AlwaysFails {
    async fn generate(
        &self,
        _context: &SlotContext,
        _used: &HashSet<Fingerprint>,
    ) -> Option<GeneratedContent<String>> {
        *self.calls.lock() += 1;
        None
    }
}

/// Generator over `Labelled` tagged with its own label.
pub fn labelled(label: &'static str, weight: WeightPolicy) -> GeneratorDescriptor<String> {
    GeneratorDescriptor::builder(label, Labelled { label })
        .tag(label)
        .weight(weight)
        .build()
}

/// Generator ids of a finished deck, in slot order.
pub fn generator_ids<C>(outcome: &ScheduleOutcome<C>) -> Vec<String> {
    outcome
        .deck
        .iter()
        .unwrap()
        .map(|slot| slot.generator.to_string())
        .collect()
}

pub fn request(total_slots: usize) -> RunRequest {
    RunRequest::new("otters", total_slots)
}

/// Run `f` with XDG_CONFIG_HOME pointed into `test_dir` and SLOTDECK overrides cleared.
pub fn with_isolated_config<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let keys = ["XDG_CONFIG_HOME", "SLOTDECK_ENV", "SLOTDECK__SCHEDULE__RNG_SEED"];
    let saved: Vec<Option<String>> = keys.iter().map(|key| std::env::var(key).ok()).collect();

    let config_home = test_dir.path().join("xdg");
    std::fs::create_dir_all(&config_home).unwrap();
    std::env::set_var("XDG_CONFIG_HOME", config_home.to_str().unwrap());
    std::env::remove_var("SLOTDECK_ENV");
    std::env::remove_var("SLOTDECK__SCHEDULE__RNG_SEED");

    let result = f();

    for (key, value) in keys.iter().zip(saved) {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
    result
}
