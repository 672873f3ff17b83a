use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::deck::SlotDeck;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleMode {
    #[default]
    Serial,
    Parallel,
}

/// Scheduler tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleConfig {
    /// Round cap for parallel mode; exceeding it fails the run.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: usize,

    /// Concurrent fill attempts per round; 0 means one per pending slot.
    #[serde(default)]
    pub max_concurrency: usize,

    /// Base seed for selection randomness; drawn at random when absent.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

fn default_max_rounds() -> usize {
    64
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            max_rounds: default_max_rounds(),
            max_concurrency: 0,
            rng_seed: None,
        }
    }
}

impl ScheduleConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_rounds == 0 {
            return Err("max_rounds must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}

/// One scheduling run's inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRequest {
    pub topic: String,
    pub presenter: Option<String>,
    pub total_slots: usize,
    #[serde(default)]
    pub mode: ScheduleMode,
}

impl RunRequest {
    pub fn new(topic: impl Into<String>, total_slots: usize) -> Self {
        Self {
            topic: topic.into(),
            presenter: None,
            total_slots,
            mode: ScheduleMode::Serial,
        }
    }

    pub fn presenter(mut self, presenter: impl Into<String>) -> Self {
        self.presenter = Some(presenter.into());
        self
    }

    pub fn mode(mut self, mode: ScheduleMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Parallel-mode round accounting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundSummary {
    pub round_index: usize,
    pub attempted: usize,
    pub committed: usize,
    pub requeued: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub mode: ScheduleMode,
    pub base_seed: u64,
    pub total_slots: usize,
    /// Empty for serial runs.
    pub rounds: Vec<RoundSummary>,
    pub generator_failures: usize,
    pub validation_rejections: usize,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

impl RunSummary {
    pub fn new(mode: ScheduleMode, base_seed: u64, total_slots: usize) -> Self {
        Self {
            mode,
            base_seed,
            total_slots,
            rounds: Vec::new(),
            generator_failures: 0,
            validation_rejections: 0,
            started_at: Utc::now(),
            elapsed_ms: 0,
        }
    }
}

/// A completed run: the full deck plus its accounting.
#[derive(Debug, Clone)]
pub struct ScheduleOutcome<C> {
    pub deck: SlotDeck<C>,
    pub summary: RunSummary,
}
