//! Position-dependent selection weights.
//!
//! A weight policy maps `(slot_index, total_slots)` to a non-negative selection
//! mass. A weight of zero keeps a generator out of sampling for that slot
//! without marking it prohibited.

use serde::{Deserialize, Serialize};

/// Target position for a peaked weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeakPosition {
    /// Normalized position in [0, 1]; resolves to the nearest slot.
    Fraction(f64),
    /// Absolute slot index; negative values count from the end (-1 is the last slot).
    Index(i64),
}

impl PeakPosition {
    /// Resolve to a concrete slot index, or `None` if it falls outside the deck.
    pub fn resolve(&self, total_slots: usize) -> Option<usize> {
        if total_slots == 0 {
            return None;
        }
        match *self {
            PeakPosition::Fraction(fraction) => {
                if !(0.0..=1.0).contains(&fraction) {
                    return None;
                }
                let last = (total_slots - 1) as f64;
                Some((fraction * last).round() as usize)
            }
            PeakPosition::Index(index) => {
                let resolved = if index < 0 {
                    total_slots as i64 + index
                } else {
                    index
                };
                if resolved >= 0 && (resolved as usize) < total_slots {
                    Some(resolved as usize)
                } else {
                    None
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeightPolicy {
    Constant {
        weight: f64,
    },
    Peaked {
        targets: Vec<PeakPosition>,
        peak: f64,
        baseline: f64,
    },
}

impl WeightPolicy {
    pub fn constant(weight: f64) -> Self {
        WeightPolicy::Constant { weight }
    }

    /// Peaked weight over absolute slot indices (negative = from the end).
    pub fn peaked(indices: &[i64], peak: f64, baseline: f64) -> Self {
        WeightPolicy::Peaked {
            targets: indices.iter().copied().map(PeakPosition::Index).collect(),
            peak,
            baseline,
        }
    }

    /// Peaked weight over normalized positions in [0, 1].
    pub fn peaked_at_fractions(fractions: &[f64], peak: f64, baseline: f64) -> Self {
        WeightPolicy::Peaked {
            targets: fractions
                .iter()
                .copied()
                .map(PeakPosition::Fraction)
                .collect(),
            peak,
            baseline,
        }
    }

    /// Selection mass for a slot. Never negative; NaN is treated as zero.
    pub fn weight(&self, slot_index: usize, total_slots: usize) -> f64 {
        let raw = match self {
            WeightPolicy::Constant { weight } => *weight,
            WeightPolicy::Peaked {
                targets,
                peak,
                baseline,
            } => {
                let hit = targets
                    .iter()
                    .any(|target| target.resolve(total_slots) == Some(slot_index));
                if hit {
                    *peak
                } else {
                    *baseline
                }
            }
        };
        if raw.is_nan() {
            0.0
        } else {
            raw.max(0.0)
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let values: Vec<f64> = match self {
            WeightPolicy::Constant { weight } => vec![*weight],
            WeightPolicy::Peaked { peak, baseline, .. } => vec![*peak, *baseline],
        };
        if values.iter().any(|value| !value.is_finite() || *value < 0.0) {
            return Err(format!("weights must be finite and non-negative: {values:?}"));
        }
        Ok(())
    }
}

impl Default for WeightPolicy {
    fn default() -> Self {
        WeightPolicy::constant(1.0)
    }
}
