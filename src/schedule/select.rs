//! Weighted generator selection and per-slot randomness.

use crate::error::ScheduleError;
use crate::generator::GeneratorDescriptor;
use crate::types::GeneratorId;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// Non-excluded generators with positive weight at this slot, paired with that weight.
pub fn weighted_candidates<'a, C>(
    generators: &'a [GeneratorDescriptor<C>],
    slot_index: usize,
    total_slots: usize,
    excluded: &HashSet<GeneratorId>,
) -> Vec<(&'a GeneratorDescriptor<C>, f64)> {
    generators
        .iter()
        .filter(|generator| !excluded.contains(generator.id()))
        .map(|generator| (generator, generator.weight(slot_index, total_slots)))
        .filter(|(_, weight)| *weight > 0.0)
        .collect()
}

/// Sample one candidate with probability proportional to its weight.
pub fn select_generator<'a, C, R: Rng + ?Sized>(
    generators: &'a [GeneratorDescriptor<C>],
    slot_index: usize,
    total_slots: usize,
    excluded: &HashSet<GeneratorId>,
    rng: &mut R,
) -> Result<&'a GeneratorDescriptor<C>, ScheduleError> {
    let candidates = weighted_candidates(generators, slot_index, total_slots, excluded);
    if candidates.is_empty() {
        return Err(ScheduleError::NoEligibleGenerator { slot_index });
    }
    let distribution = WeightedIndex::new(candidates.iter().map(|(_, weight)| *weight))
        .map_err(|e| {
            ScheduleError::InvariantViolation(format!(
                "invalid selection weights for slot {slot_index}: {e}"
            ))
        })?;
    Ok(candidates[distribution.sample(rng)].0)
}

/// Deterministic RNG for one slot attempt. Serial runs use round 0, so a
/// parallel run that commits everything in its first round draws the same
/// numbers as a serial run with the same base seed.
pub fn slot_rng(base_seed: u64, slot_index: usize, round: usize) -> StdRng {
    let mixed = base_seed
        ^ (slot_index as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (round as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    StdRng::seed_from_u64(mixed)
}
