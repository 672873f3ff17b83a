//! Scheduler: fills every slot of a deck from a weighted generator pool while
//! honoring tag quotas and content reuse limits.
//! Serial mode fills slots in order; parallel mode fans out one fill attempt per
//! pending slot each round, then commits the results in slot order.

use crate::deck::{CommittedSlot, SlotDeck};
use crate::error::{ScheduleError, SlotRejection};
use crate::generator::GeneratorDescriptor;
use crate::quota::{QuotaTable, UsageState};
use crate::reuse;
use crate::schedule::plan::{
    RoundSummary, RunRequest, RunSummary, ScheduleConfig, ScheduleMode, ScheduleOutcome,
};
use crate::schedule::select::{select_generator, slot_rng, weighted_candidates};
use crate::seed::SeedSequence;
use crate::types::{Fingerprint, GeneratorId, SlotContext};
use futures::stream::{self, StreamExt};
use rand::rngs::StdRng;
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Output of a successful fill attempt, not yet validated or committed.
#[derive(Debug, Clone)]
pub struct SlotFill<C> {
    pub slot_index: usize,
    pub generator: GeneratorId,
    pub content: C,
    pub fingerprints: Vec<Fingerprint>,
    generator_index: usize,
}

/// One parallel-round task result.
struct SlotAttempt<C> {
    slot_index: usize,
    seed: String,
    result: Result<SlotFill<C>, ScheduleError>,
    failures: usize,
}

/// Lazily queried, cached per-slot contexts for one run.
struct SlotContexts<'a> {
    topic: String,
    presenter: Option<String>,
    total_slots: usize,
    seeds: &'a mut dyn SeedSequence,
    cache: Vec<Option<String>>,
}

impl<'a> SlotContexts<'a> {
    fn new(request: &RunRequest, seeds: &'a mut dyn SeedSequence) -> Self {
        Self {
            topic: request.topic.clone(),
            presenter: request.presenter.clone(),
            total_slots: request.total_slots,
            seeds,
            cache: vec![None; request.total_slots],
        }
    }

    fn context(&mut self, slot_index: usize) -> SlotContext {
        let seeds = &mut self.seeds;
        let seed = self.cache[slot_index]
            .get_or_insert_with(|| seeds.seed(slot_index))
            .clone();
        SlotContext {
            topic: self.topic.clone(),
            presenter: self.presenter.clone(),
            slot_index,
            total_slots: self.total_slots,
            seed,
        }
    }
}

pub struct Scheduler<C> {
    generators: Vec<GeneratorDescriptor<C>>,
    index: HashMap<GeneratorId, usize>,
    quotas: QuotaTable,
    config: ScheduleConfig,
}

impl<C: Send + Sync + 'static> Scheduler<C> {
    /// Build a scheduler over a generator pool. Generator ids must be unique
    /// and weights finite and non-negative.
    pub fn new(
        generators: Vec<GeneratorDescriptor<C>>,
        quotas: QuotaTable,
        config: ScheduleConfig,
    ) -> Result<Self, ScheduleError> {
        config.validate().map_err(ScheduleError::ConfigError)?;
        let mut index = HashMap::new();
        for (position, generator) in generators.iter().enumerate() {
            generator.weight_policy().validate().map_err(|e| {
                ScheduleError::ConfigError(format!("generator '{}': {}", generator.id(), e))
            })?;
            if index.insert(generator.id().clone(), position).is_some() {
                return Err(ScheduleError::ConfigError(format!(
                    "duplicate generator id '{}'",
                    generator.id()
                )));
            }
        }
        Ok(Self {
            generators,
            index,
            quotas,
            config,
        })
    }

    pub fn generators(&self) -> &[GeneratorDescriptor<C>] {
        &self.generators
    }

    pub fn generator(&self, id: &GeneratorId) -> Option<&GeneratorDescriptor<C>> {
        self.index.get(id).map(|position| &self.generators[*position])
    }

    pub fn quotas(&self) -> &QuotaTable {
        &self.quotas
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    pub fn prohibited_generators(
        &self,
        usage: &UsageState,
        total_slots: usize,
    ) -> HashSet<GeneratorId> {
        self.quotas
            .prohibited_generators(&self.generators, usage, total_slots)
    }

    pub fn select_generator(
        &self,
        slot_index: usize,
        total_slots: usize,
        excluded: &HashSet<GeneratorId>,
        rng: &mut StdRng,
    ) -> Result<&GeneratorDescriptor<C>, ScheduleError> {
        select_generator(&self.generators, slot_index, total_slots, excluded, rng)
    }

    /// Pick and invoke generators until one yields content. Every generator
    /// that fails is added to `excluded`, so the search shrinks until it
    /// succeeds or runs out of candidates.
    pub async fn fill_slot(
        &self,
        context: &SlotContext,
        used: &HashSet<Fingerprint>,
        excluded: &mut HashSet<GeneratorId>,
        rng: &mut StdRng,
    ) -> Result<SlotFill<C>, ScheduleError> {
        loop {
            let generator =
                self.select_generator(context.slot_index, context.total_slots, excluded, rng)?;
            debug!(
                slot_index = context.slot_index,
                seed = %context.seed,
                generator = %generator.id(),
                "Generating slot"
            );
            let started = Instant::now();
            match generator.generate(context, used).await {
                Some(output) => {
                    debug!(
                        slot_index = context.slot_index,
                        generator = %generator.id(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Generated slot"
                    );
                    let generator_index = self.index[generator.id()];
                    return Ok(SlotFill {
                        slot_index: context.slot_index,
                        generator: generator.id().clone(),
                        content: output.content,
                        fingerprints: output.fingerprints,
                        generator_index,
                    });
                }
                None => {
                    let rejection = SlotRejection::GeneratorFailure {
                        generator: generator.id().clone(),
                    };
                    debug!(
                        slot_index = context.slot_index,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "{}",
                        rejection
                    );
                    excluded.insert(generator.id().clone());
                }
            }
        }
    }

    /// Commit-time recheck against the current usage state.
    pub fn validate(
        &self,
        fill: &SlotFill<C>,
        usage: &UsageState,
        total_slots: usize,
    ) -> Result<(), SlotRejection> {
        let generator = &self.generators[fill.generator_index];
        let overlap = reuse::overlap_count(&fill.fingerprints, usage.fingerprints());
        if overlap > generator.repetition_tolerance() {
            return Err(SlotRejection::ContentReused {
                generator: fill.generator.clone(),
                overlap,
                tolerance: generator.repetition_tolerance(),
            });
        }
        let exhausted = self
            .quotas
            .exhausted_tags_of(generator, usage, total_slots);
        if !exhausted.is_empty() {
            return Err(SlotRejection::QuotaExhausted {
                generator: fill.generator.clone(),
                tags: exhausted,
            });
        }
        Ok(())
    }

    fn commit(
        &self,
        deck: &mut SlotDeck<C>,
        usage: &mut UsageState,
        fill: SlotFill<C>,
        seed: String,
    ) -> Result<(), ScheduleError> {
        let generator = &self.generators[fill.generator_index];
        deck.commit(CommittedSlot {
            slot_index: fill.slot_index,
            generator: fill.generator,
            seed,
            fingerprints: fill.fingerprints.clone(),
            content: fill.content,
        })?;
        usage.record(generator.tags(), &fill.fingerprints);
        Ok(())
    }

    /// Fill a deck of `request.total_slots` slots in the requested mode.
    pub async fn run(
        &self,
        request: &RunRequest,
        seeds: &mut dyn SeedSequence,
    ) -> Result<ScheduleOutcome<C>, ScheduleError> {
        let base_seed = self.config.rng_seed.unwrap_or_else(rand::random);
        let started = Instant::now();
        let mut summary = RunSummary::new(request.mode, base_seed, request.total_slots);
        info!(
            topic = %request.topic,
            total_slots = request.total_slots,
            mode = ?request.mode,
            base_seed,
            generators = self.generators.len(),
            "Scheduling run started"
        );

        let mut contexts = SlotContexts::new(request, seeds);
        let result = match request.mode {
            ScheduleMode::Serial => {
                self.run_serial(&mut contexts, base_seed, &mut summary)
                    .await
            }
            ScheduleMode::Parallel => {
                self.run_parallel(&mut contexts, base_seed, &mut summary)
                    .await
            }
        };
        summary.elapsed_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(deck) => {
                info!(
                    total_slots = request.total_slots,
                    rounds = summary.rounds.len(),
                    generator_failures = summary.generator_failures,
                    validation_rejections = summary.validation_rejections,
                    elapsed_ms = summary.elapsed_ms,
                    "Scheduling run completed"
                );
                Ok(ScheduleOutcome { deck, summary })
            }
            Err(err) => {
                warn!(error = %err, elapsed_ms = summary.elapsed_ms, "Scheduling run failed");
                Err(err)
            }
        }
    }

    async fn run_serial(
        &self,
        contexts: &mut SlotContexts<'_>,
        base_seed: u64,
        summary: &mut RunSummary,
    ) -> Result<SlotDeck<C>, ScheduleError> {
        let total_slots = contexts.total_slots;
        let mut deck = SlotDeck::new(total_slots);
        let mut usage = UsageState::new();

        for slot_index in 0..total_slots {
            let context = contexts.context(slot_index);
            let mut rng = slot_rng(base_seed, slot_index, 0);
            let mut excluded = self.prohibited_generators(&usage, total_slots);
            loop {
                let before = excluded.len();
                let fill = self
                    .fill_slot(&context, usage.fingerprints(), &mut excluded, &mut rng)
                    .await;
                summary.generator_failures += excluded.len() - before;
                let fill = fill?;
                match self.validate(&fill, &usage, total_slots) {
                    Ok(()) => {
                        self.commit(&mut deck, &mut usage, fill, context.seed.clone())?;
                        break;
                    }
                    Err(rejection) => {
                        warn!(slot_index, "Rejected slot fill: {}", rejection);
                        summary.validation_rejections += 1;
                        excluded.insert(rejection.generator().clone());
                    }
                }
            }
        }
        Ok(deck)
    }

    async fn run_parallel(
        &self,
        contexts: &mut SlotContexts<'_>,
        base_seed: u64,
        summary: &mut RunSummary,
    ) -> Result<SlotDeck<C>, ScheduleError> {
        let total_slots = contexts.total_slots;
        let mut deck = SlotDeck::new(total_slots);
        let mut usage = UsageState::new();
        let mut round = 0usize;

        loop {
            let pending = deck.pending();
            if pending.is_empty() {
                break;
            }
            if round >= self.config.max_rounds {
                return Err(ScheduleError::RoundLimitExceeded {
                    rounds: round,
                    pending,
                });
            }

            let prohibited = self.prohibited_generators(&usage, total_slots);
            let slot_contexts: Vec<SlotContext> = pending
                .iter()
                .map(|slot_index| contexts.context(*slot_index))
                .collect();
            let concurrency = match self.config.max_concurrency {
                0 => pending.len(),
                limit => limit,
            };
            info!(round, pending = pending.len(), concurrency, "Dispatching round");

            let mut attempts: Vec<SlotAttempt<C>> = {
                let used = usage.fingerprints();
                let prohibited = &prohibited;
                stream::iter(slot_contexts.into_iter().map(|context| async move {
                    let mut excluded = prohibited.clone();
                    let mut rng = slot_rng(base_seed, context.slot_index, round);
                    let result = self
                        .fill_slot(&context, used, &mut excluded, &mut rng)
                        .await;
                    SlotAttempt {
                        slot_index: context.slot_index,
                        failures: excluded.len() - prohibited.len(),
                        seed: context.seed,
                        result,
                    }
                }))
                .buffer_unordered(concurrency)
                .collect::<Vec<_>>()
                .await
            };
            attempts.sort_by_key(|attempt| attempt.slot_index);

            let mut committed = 0usize;
            let mut requeued = 0usize;
            let mut exhausted = Vec::new();
            for attempt in attempts {
                summary.generator_failures += attempt.failures;
                match attempt.result {
                    Ok(fill) => match self.validate(&fill, &usage, total_slots) {
                        Ok(()) => {
                            self.commit(&mut deck, &mut usage, fill, attempt.seed)?;
                            committed += 1;
                        }
                        Err(rejection) => {
                            warn!(
                                round,
                                slot_index = attempt.slot_index,
                                "Requeueing slot: {}",
                                rejection
                            );
                            summary.validation_rejections += 1;
                            requeued += 1;
                        }
                    },
                    Err(ScheduleError::NoEligibleGenerator { slot_index }) => {
                        debug!(round, slot_index, "Requeueing slot with exhausted candidates");
                        exhausted.push(slot_index);
                        requeued += 1;
                    }
                    Err(err) => return Err(err),
                }
            }

            info!(round, committed, requeued, "Round reconciled");
            summary.rounds.push(RoundSummary {
                round_index: round,
                attempted: pending.len(),
                committed,
                requeued,
            });

            // Usage did not change, so the next round would face the same pool.
            if committed == 0 && exhausted.len() == pending.len() {
                if let Some(slot_index) = exhausted.into_iter().min() {
                    return Err(ScheduleError::NoEligibleGenerator { slot_index });
                }
            }

            // Quota usage only grows, so a slot with no candidates left under
            // the current quotas can never be filled.
            let prohibited = self.prohibited_generators(&usage, total_slots);
            if let Some(slot_index) = deck.pending().into_iter().find(|slot_index| {
                weighted_candidates(&self.generators, *slot_index, total_slots, &prohibited)
                    .is_empty()
            }) {
                return Err(ScheduleError::NoEligibleGenerator { slot_index });
            }

            round += 1;
        }
        Ok(deck)
    }
}
