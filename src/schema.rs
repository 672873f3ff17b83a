//! Presentation schemas: a named bundle of generator pool, tag quotas and seed
//! strategy that assembles a deck in one call.

use crate::catalog::{slide_generators, SlideContent};
use crate::deck::SlotDeck;
use crate::error::{AppError, ScheduleError};
use crate::generator::GeneratorDescriptor;
use crate::quota::{QuotaLimit, QuotaTable};
use crate::render::DeckRenderer;
use crate::schedule::{RunRequest, ScheduleConfig, ScheduleOutcome, Scheduler};
use crate::seed::SeedStrategy;
use tracing::info;

/// Names of the schemas that ship with the crate.
pub const BUILTIN_SCHEMAS: [&str; 3] = ["default", "interview", "test"];

pub struct Schema<C> {
    name: String,
    scheduler: Scheduler<C>,
    seeds: SeedStrategy,
}

impl<C: Send + Sync + 'static> Schema<C> {
    pub fn new(
        name: impl Into<String>,
        generators: Vec<GeneratorDescriptor<C>>,
        quotas: QuotaTable,
        seeds: SeedStrategy,
        config: ScheduleConfig,
    ) -> Result<Self, ScheduleError> {
        Ok(Self {
            name: name.into(),
            scheduler: Scheduler::new(generators, quotas, config)?,
            seeds,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scheduler(&self) -> &Scheduler<C> {
        &self.scheduler
    }

    pub fn seeds(&self) -> &SeedStrategy {
        &self.seeds
    }

    /// Fill a deck for `request` using this schema's seed strategy.
    pub async fn assemble(&self, request: &RunRequest) -> Result<ScheduleOutcome<C>, ScheduleError> {
        info!(schema = %self.name, topic = %request.topic, "Assembling deck");
        let mut sequence = self.seeds.sequence(&request.topic, request.total_slots);
        self.scheduler.run(request, sequence.as_mut()).await
    }

    pub fn render<R: DeckRenderer<C>>(
        &self,
        deck: &SlotDeck<C>,
        renderer: &R,
    ) -> Result<R::Output, AppError> {
        renderer.render(deck)
    }
}

/// Quotas for an ordinary talk.
pub fn default_quotas() -> QuotaTable {
    QuotaTable::new()
        .with_limit("title", QuotaLimit::Absolute(1))
        .with_limit("about_me", QuotaLimit::Absolute(1))
        .with_limit("history", QuotaLimit::Absolute(1))
        .with_limit("anecdote", QuotaLimit::Absolute(1))
        .with_limit("location_chart", QuotaLimit::Absolute(1))
        .with_limit("two_captions", QuotaLimit::Ratio(0.3))
        .with_limit("three_captions", QuotaLimit::Ratio(0.2))
        .with_limit("multi_caption", QuotaLimit::Ratio(0.3))
        .with_limit("gif", QuotaLimit::Ratio(0.5))
        .with_limit("weird", QuotaLimit::Ratio(0.5))
        .with_limit("quote", QuotaLimit::Ratio(0.2))
        .with_limit("statement", QuotaLimit::Ratio(0.2))
        .with_limit("chart", QuotaLimit::Ratio(0.3))
}

/// Default quotas without the introduction slide.
pub fn interview_quotas() -> QuotaTable {
    default_quotas().with_limit("about_me", QuotaLimit::Absolute(0))
}

/// Quotas and seed strategy of a built-in schema, or `None` for unknown names.
pub fn builtin_parts(name: &str) -> Option<(QuotaTable, SeedStrategy)> {
    match name {
        "default" => Some((default_quotas(), SeedStrategy::Identity)),
        "interview" => Some((interview_quotas(), SeedStrategy::Identity)),
        "test" => Some((QuotaTable::new(), SeedStrategy::Identity)),
        _ => None,
    }
}

/// Build a slide schema over the built-in generator pool.
pub fn slide_schema(
    name: impl Into<String>,
    quotas: QuotaTable,
    seeds: SeedStrategy,
    config: ScheduleConfig,
) -> Result<Schema<SlideContent>, ScheduleError> {
    Schema::new(name, slide_generators(), quotas, seeds, config)
}
