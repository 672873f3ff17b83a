//! Property-based tests for quota, deck and reuse invariants

use async_trait::async_trait;
use proptest::prelude::*;
use slotdeck::deck::{CommittedSlot, SlotDeck};
use slotdeck::error::ScheduleError;
use slotdeck::generator::{ContentSource, GeneratedContent, GeneratorDescriptor};
use slotdeck::quota::{QuotaLimit, QuotaTable, UsageState};
use slotdeck::reuse;
use slotdeck::schedule::{RunRequest, ScheduleConfig, ScheduleMode, Scheduler};
use slotdeck::seed::IdentitySeeds;
use slotdeck::types::{Fingerprint, GeneratorId, SlotContext};
use slotdeck::weight::{PeakPosition, WeightPolicy};
use std::collections::HashSet;

/// Emits `<label>:<slot>` so every fill is distinct.
struct Labelled(&'static str);

#[async_trait]
impl ContentSource<String> for Labelled {
    async fn generate(
        &self,
        context: &SlotContext,
        _used: &HashSet<Fingerprint>,
    ) -> Option<GeneratedContent<String>> {
        let text = format!("{}:{}", self.0, context.slot_index);
        Some(GeneratedContent::new(text.clone(), vec![Fingerprint::from(text)]))
    }
}

const LABELS: [&str; 3] = ["title", "chart", "body"];

fn pool(weights: &[f64]) -> Vec<GeneratorDescriptor<String>> {
    LABELS
        .iter()
        .zip(weights)
        .map(|(label, weight)| {
            GeneratorDescriptor::builder(*label, Labelled(*label))
                .tags([label.to_string(), "any".to_string()])
                .weight(WeightPolicy::constant(*weight))
                .build()
        })
        .collect()
}

fn limit_strategy() -> impl Strategy<Value = QuotaLimit> {
    prop_oneof![
        (0usize..6).prop_map(QuotaLimit::Absolute),
        (0.05f64..0.95).prop_map(QuotaLimit::Ratio),
    ]
}

/// Committed decks never exceed a quota; failures are only ever exhausted slots
#[test]
fn test_quota_never_exceeded_property() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let mut runner = proptest::test_runner::TestRunner::new(ProptestConfig::with_cases(64));

    runner
        .run(
            &(
                proptest::collection::vec(0.0f64..10.0, 3),
                limit_strategy(),
                limit_strategy(),
                0usize..12,
                any::<u64>(),
                any::<bool>(),
            ),
            |(weights, title_limit, chart_limit, slots, seed, parallel)| {
                let quotas = QuotaTable::new()
                    .with_limit("title", title_limit)
                    .with_limit("chart", chart_limit);
                let scheduler = Scheduler::new(
                    pool(&weights),
                    quotas.clone(),
                    ScheduleConfig::default().with_seed(seed),
                )
                .unwrap();
                let mode = if parallel {
                    ScheduleMode::Parallel
                } else {
                    ScheduleMode::Serial
                };
                let mut seeds = IdentitySeeds::new("otters");
                let result = runtime.block_on(
                    scheduler.run(&RunRequest::new("otters", slots).mode(mode), &mut seeds),
                );

                match result {
                    Ok(outcome) => {
                        prop_assert!(outcome.deck.is_complete());
                        let mut usage = UsageState::new();
                        for slot in outcome.deck.iter().unwrap() {
                            let generator = scheduler.generator(&slot.generator).unwrap();
                            usage.record(generator.tags(), &slot.fingerprints);
                        }
                        for (tag, limit) in quotas.iter() {
                            prop_assert!(usage.tag_count(tag) <= limit.effective(slots));
                        }
                        prop_assert_eq!(usage.tag_count("any"), slots);
                    }
                    Err(err) => {
                        prop_assert!(
                            matches!(err, ScheduleError::NoEligibleGenerator { .. }),
                            "unexpected error: {}",
                            err
                        );
                    }
                }
                Ok(())
            },
        )
        .unwrap();
}

/// A slot index can be committed once; later writes are rejected
#[test]
fn test_single_assignment_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(1usize..10, proptest::collection::vec(0usize..12, 0..30)),
            |(total, writes)| {
                let mut deck: SlotDeck<usize> = SlotDeck::new(total);
                let mut written = HashSet::new();
                for slot_index in writes {
                    let result = deck.commit(CommittedSlot {
                        slot_index,
                        generator: GeneratorId::from("g"),
                        seed: "s".to_string(),
                        fingerprints: Vec::new(),
                        content: slot_index,
                    });
                    let fresh = slot_index < total && written.insert(slot_index);
                    prop_assert_eq!(result.is_ok(), fresh);
                }
                prop_assert_eq!(deck.committed_count(), written.len());
                prop_assert_eq!(deck.pending().len(), total - written.len());
                Ok(())
            },
        )
        .unwrap();
}

/// Overlap counts distinct non-blank fingerprints already in use
#[test]
fn test_overlap_bounds_property() {
    let mut runner = proptest::test_runner::TestRunner::default();
    let fingerprint = "[a-e ]{0,2}".prop_map(Fingerprint::from);

    runner
        .run(
            &(
                proptest::collection::vec(fingerprint.clone(), 0..8),
                proptest::collection::hash_set(fingerprint, 0..8),
                0usize..4,
            ),
            |(candidate, used, tolerance)| {
                let overlap = reuse::overlap_count(&candidate, &used);
                let distinct: HashSet<&Fingerprint> =
                    candidate.iter().filter(|f| !f.is_blank()).collect();
                prop_assert!(overlap <= distinct.len());
                prop_assert!(overlap <= used.len());
                prop_assert_eq!(reuse::accept(&candidate, &used, tolerance), overlap <= tolerance);
                if reuse::accept(&candidate, &used, tolerance) {
                    prop_assert!(reuse::accept(&candidate, &used, tolerance + 1));
                }
                Ok(())
            },
        )
        .unwrap();
}

/// Peak positions always resolve inside the deck or not at all
#[test]
fn test_peak_resolution_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(-20i64..20, 0.0f64..=1.0, 0usize..15), |(index, fraction, total)| {
            for position in [PeakPosition::Index(index), PeakPosition::Fraction(fraction)] {
                if let Some(slot) = position.resolve(total) {
                    prop_assert!(slot < total);
                }
            }
            if total > 0 {
                prop_assert!(PeakPosition::Fraction(fraction).resolve(total).is_some());
            }
            Ok(())
        })
        .unwrap();
}

/// Ratio limits never allow more slots than the deck holds
#[test]
fn test_ratio_limit_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(0.001f64..0.999, 0usize..500), |(ratio, total)| {
            let limit = QuotaLimit::try_from(ratio).unwrap();
            prop_assert_eq!(limit, QuotaLimit::Ratio(ratio));
            prop_assert!(limit.effective(total) <= total);
            Ok(())
        })
        .unwrap();
}
