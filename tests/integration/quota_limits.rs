//! Integration tests for tag quotas

use crate::integration::test_utils::{generator_ids, labelled, request, Labelled};
use slotdeck::generator::GeneratorDescriptor;
use slotdeck::quota::{QuotaLimit, QuotaTable};
use slotdeck::schedule::{ScheduleConfig, ScheduleMode, Scheduler};
use slotdeck::seed::IdentitySeeds;
use slotdeck::weight::WeightPolicy;

fn count(ids: &[String], id: &str) -> usize {
    ids.iter().filter(|candidate| candidate.as_str() == id).count()
}

fn chart_heavy_pool() -> Vec<GeneratorDescriptor<String>> {
    vec![
        labelled("chart", WeightPolicy::constant(1e12)),
        labelled("filler", WeightPolicy::constant(1e-12)),
    ]
}

/// Ratio limits scale with the deck size and round down
#[tokio::test]
async fn test_ratio_limit_scales_with_deck_size() {
    let quotas = QuotaTable::new().with_limit("chart", QuotaLimit::Ratio(0.5));
    for (slots, expected) in [(4usize, 2usize), (5, 2), (10, 5), (1, 0)] {
        for mode in [ScheduleMode::Serial, ScheduleMode::Parallel] {
            let scheduler = Scheduler::new(
                chart_heavy_pool(),
                quotas.clone(),
                ScheduleConfig::default().with_seed(6),
            )
            .unwrap();
            let mut seeds = IdentitySeeds::new("otters");
            let outcome = scheduler
                .run(&request(slots).mode(mode), &mut seeds)
                .await
                .unwrap();
            let ids = generator_ids(&outcome);
            assert_eq!(count(&ids, "chart"), expected, "{slots} slots, {mode:?}");
        }
    }
}

/// A zero limit prohibits a tag from the first slot
#[tokio::test]
async fn test_zero_limit_prohibits_immediately() {
    let scheduler = Scheduler::new(
        chart_heavy_pool(),
        QuotaTable::new().with_limit("chart", QuotaLimit::Absolute(0)),
        ScheduleConfig::default().with_seed(2),
    )
    .unwrap();
    let mut seeds = IdentitySeeds::new("otters");
    let outcome = scheduler.run(&request(3), &mut seeds).await.unwrap();
    assert_eq!(count(&generator_ids(&outcome), "chart"), 0);
}

/// A generator is blocked when any one of its tags is exhausted
#[tokio::test]
async fn test_shared_tag_blocks_every_carrier() {
    let pool = vec![
        GeneratorDescriptor::builder(
            "quote",
            Labelled { label: "quote" },
        )
        .tags(["quote", "statement"])
        .weight(WeightPolicy::constant(1e12))
        .build(),
        GeneratorDescriptor::builder(
            "bold",
            Labelled { label: "bold" },
        )
        .tags(["bold", "statement"])
        .weight(WeightPolicy::constant(1e12))
        .build(),
        labelled("filler", WeightPolicy::constant(1e-12)),
    ];
    let scheduler = Scheduler::new(
        pool,
        QuotaTable::new().with_limit("statement", QuotaLimit::Absolute(2)),
        ScheduleConfig::default().with_seed(31),
    )
    .unwrap();
    let mut seeds = IdentitySeeds::new("otters");
    let outcome = scheduler.run(&request(6), &mut seeds).await.unwrap();
    let ids = generator_ids(&outcome);
    assert_eq!(count(&ids, "quote") + count(&ids, "bold"), 2);
    assert_eq!(count(&ids, "filler"), 4);
}

/// Untagged generators are never limited
#[tokio::test]
async fn test_untagged_generators_are_unlimited() {
    let pool = vec![GeneratorDescriptor::<String>::builder(
        "plain",
        Labelled { label: "plain" },
    )
    .build()];
    let scheduler = Scheduler::new(
        pool,
        QuotaTable::new().with_limit("plain", QuotaLimit::Absolute(0)),
        ScheduleConfig::default().with_seed(1),
    )
    .unwrap();
    let mut seeds = IdentitySeeds::new("otters");
    let outcome = scheduler.run(&request(4), &mut seeds).await.unwrap();
    assert_eq!(count(&generator_ids(&outcome), "plain"), 4);
}
