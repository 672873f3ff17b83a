//! Integration tests for serial scheduling

use crate::integration::test_utils::{generator_ids, labelled, request, AlwaysFails, Labelled};
use slotdeck::error::ScheduleError;
use slotdeck::generator::{GeneratorDescriptor, StaticSource};
use slotdeck::quota::{QuotaLimit, QuotaTable};
use slotdeck::schedule::{ScheduleConfig, ScheduleMode, Scheduler};
use slotdeck::seed::{CyclingSeeds, IdentitySeeds};
use slotdeck::types::Fingerprint;
use slotdeck::weight::WeightPolicy;
use std::sync::Arc;

fn config(seed: u64) -> ScheduleConfig {
    ScheduleConfig::default().with_seed(seed)
}

/// Title and body generators with the title capped at one slot
#[tokio::test]
async fn test_title_quota_holds_across_seeds() {
    for seed in 0..50 {
        let scheduler = Scheduler::new(
            vec![
                labelled("title", WeightPolicy::constant(1.0)),
                labelled("body", WeightPolicy::constant(1.0)),
            ],
            QuotaTable::new().with_limit("title", QuotaLimit::Absolute(1)),
            config(seed),
        )
        .unwrap();
        let mut seeds = IdentitySeeds::new("otters");
        let outcome = scheduler.run(&request(3), &mut seeds).await.unwrap();

        let ids = generator_ids(&outcome);
        assert_eq!(ids.len(), 3);
        assert!(ids.iter().filter(|id| id.as_str() == "title").count() <= 1);
        assert!(outcome.deck.is_complete());
    }
}

/// A title peaked at the first slot opens the deck and body fills the rest
#[tokio::test]
async fn test_peaked_title_opens_deck_in_both_modes() {
    for seed in 0..100 {
        let scheduler = Scheduler::new(
            vec![
                GeneratorDescriptor::<String>::builder("A", Labelled { label: "A" })
                    .tag("title")
                    .weight(WeightPolicy::peaked(&[0], 1e12, 1.0))
                    .build(),
                GeneratorDescriptor::<String>::builder("B", Labelled { label: "B" })
                    .tag("body")
                    .weight(WeightPolicy::constant(1.0))
                    .build(),
            ],
            QuotaTable::new().with_limit("title", QuotaLimit::Absolute(1)),
            config(seed),
        )
        .unwrap();

        for mode in [ScheduleMode::Serial, ScheduleMode::Parallel] {
            let mut seeds = IdentitySeeds::new("otters");
            let outcome = scheduler
                .run(&request(3).mode(mode), &mut seeds)
                .await
                .unwrap();
            assert_eq!(generator_ids(&outcome), vec!["A", "B", "B"], "seed {seed} {mode:?}");
        }
    }
}

/// A pool whose only generator always fails cannot fill the first slot
#[tokio::test]
async fn test_always_failing_generator_reports_no_eligible_generator() {
    let source = AlwaysFails::default();
    let calls = Arc::clone(&source.calls);
    let scheduler = Scheduler::new(
        vec![GeneratorDescriptor::<String>::builder("broken", source).build()],
        QuotaTable::new(),
        config(1),
    )
    .unwrap();
    let mut seeds = IdentitySeeds::new("otters");
    let err = scheduler.run(&request(3), &mut seeds).await.err().unwrap();

    assert!(matches!(err, ScheduleError::NoEligibleGenerator { slot_index: 0 }));
    assert_eq!(*calls.lock(), 1);
}

/// Retry budget gives a generator extra attempts before it is excluded
#[tokio::test]
async fn test_retry_budget_counts_attempts() {
    let source = AlwaysFails::default();
    let calls = Arc::clone(&source.calls);
    let scheduler = Scheduler::new(
        vec![GeneratorDescriptor::<String>::builder("broken", source)
            .retry_budget(2)
            .build()],
        QuotaTable::new(),
        config(1),
    )
    .unwrap();
    let mut seeds = IdentitySeeds::new("otters");
    assert!(scheduler.run(&request(1), &mut seeds).await.is_err());
    assert_eq!(*calls.lock(), 3);
}

/// The same base seed reproduces the same deck
#[tokio::test]
async fn test_same_seed_same_deck() {
    let build = || {
        Scheduler::new(
            vec![
                labelled("a", WeightPolicy::constant(1.0)),
                labelled("b", WeightPolicy::constant(2.0)),
                labelled("c", WeightPolicy::constant(3.0)),
            ],
            QuotaTable::new(),
            config(77),
        )
        .unwrap()
    };
    let mut first_seeds = IdentitySeeds::new("otters");
    let mut second_seeds = IdentitySeeds::new("otters");
    let first = build().run(&request(10), &mut first_seeds).await.unwrap();
    let second = build().run(&request(10), &mut second_seeds).await.unwrap();
    assert_eq!(generator_ids(&first), generator_ids(&second));
}

/// A zero-slot deck completes immediately
#[tokio::test]
async fn test_empty_deck() {
    let scheduler = Scheduler::new(
        vec![labelled("body", WeightPolicy::constant(1.0))],
        QuotaTable::new(),
        config(1),
    )
    .unwrap();
    let mut seeds = IdentitySeeds::new("otters");
    let outcome = scheduler.run(&request(0), &mut seeds).await.unwrap();
    assert!(outcome.deck.is_complete());
    assert_eq!(outcome.deck.total_slots(), 0);
}

/// Repetition tolerance bounds how often a fixed fingerprint can recur
#[tokio::test]
async fn test_repetition_tolerance() {
    let fixed = |tolerance: usize| {
        GeneratorDescriptor::builder(
            "fixed",
            StaticSource::new("fixed".to_string(), vec![Fingerprint::from("logo")]),
        )
        .weight(WeightPolicy::constant(1e12))
        .repetition_tolerance(tolerance)
        .build()
    };

    let strict = Scheduler::new(
        vec![fixed(0), labelled("body", WeightPolicy::constant(1e-12))],
        QuotaTable::new(),
        config(4),
    )
    .unwrap();
    let mut seeds = IdentitySeeds::new("otters");
    let outcome = strict.run(&request(3), &mut seeds).await.unwrap();
    assert_eq!(generator_ids(&outcome), vec!["fixed", "body", "body"]);

    let lenient = Scheduler::new(
        vec![fixed(1), labelled("body", WeightPolicy::constant(1e-12))],
        QuotaTable::new(),
        config(4),
    )
    .unwrap();
    let mut seeds = IdentitySeeds::new("otters");
    let outcome = lenient.run(&request(3), &mut seeds).await.unwrap();
    assert_eq!(generator_ids(&outcome), vec!["fixed", "fixed", "fixed"]);
}

/// Each slot records the seed it was generated from
#[tokio::test]
async fn test_slots_record_their_seed() {
    let scheduler = Scheduler::new(
        vec![labelled("body", WeightPolicy::constant(1.0))],
        QuotaTable::new(),
        config(1),
    )
    .unwrap();
    let mut seeds = CyclingSeeds::new("otters", vec!["rivers".to_string()]);
    let outcome = scheduler.run(&request(3), &mut seeds).await.unwrap();
    let recorded: Vec<&str> = outcome
        .deck
        .iter()
        .unwrap()
        .map(|slot| slot.seed.as_str())
        .collect();
    assert_eq!(recorded, vec!["otters", "rivers", "rivers"]);
}
