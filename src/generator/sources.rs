//! Reusable content sources: fixed content, templated text, fallbacks and mapping.

use crate::generator::{ContentSource, GeneratedContent};
use crate::types::{Fingerprint, SlotContext};
use async_trait::async_trait;
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;

/// Always yields the same content and fingerprints.
pub struct StaticSource<C> {
    content: C,
    fingerprints: Vec<Fingerprint>,
}

impl<C> StaticSource<C> {
    pub fn new(content: C, fingerprints: Vec<Fingerprint>) -> Self {
        Self {
            content,
            fingerprints,
        }
    }
}

#[async_trait]
impl<C: Clone + Send + Sync> ContentSource<C> for StaticSource<C> {
    async fn generate(
        &self,
        _context: &SlotContext,
        _used: &HashSet<Fingerprint>,
    ) -> Option<GeneratedContent<C>> {
        Some(GeneratedContent::new(
            self.content.clone(),
            self.fingerprints.clone(),
        ))
    }
}

/// Renders text templates with `{seed}`, `{topic}` and `{presenter}` placeholders.
///
/// Templates are tried starting at an offset derived from the slot index, and
/// the first rendering not already in `used` wins. The rendered text is its
/// own fingerprint. Templates that mention `{presenter}` are skipped when the
/// context has no presenter.
#[derive(Debug, Clone)]
pub struct TemplateSource {
    templates: Vec<String>,
}

impl TemplateSource {
    pub fn new<I, S>(templates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            templates: templates.into_iter().map(Into::into).collect(),
        }
    }

    pub fn render(template: &str, context: &SlotContext) -> Option<String> {
        let mut text = template
            .replace("{seed}", &context.seed)
            .replace("{topic}", &context.topic);
        if text.contains("{presenter}") {
            text = text.replace("{presenter}", context.presenter.as_deref()?);
        }
        Some(text)
    }
}

#[async_trait]
impl ContentSource<String> for TemplateSource {
    async fn generate(
        &self,
        context: &SlotContext,
        used: &HashSet<Fingerprint>,
    ) -> Option<GeneratedContent<String>> {
        if self.templates.is_empty() {
            return None;
        }
        let offset = context.slot_index % self.templates.len();
        self.templates
            .iter()
            .cycle()
            .skip(offset)
            .take(self.templates.len())
            .filter_map(|template| Self::render(template, context))
            .find(|text| !used.contains(&Fingerprint::from(text.as_str())))
            .map(|text| {
                let fingerprint = Fingerprint::from(text.as_str());
                GeneratedContent::new(text, vec![fingerprint])
            })
    }
}

/// Tries `primary`, then `backup` when the primary produces nothing.
pub struct FallbackSource<C> {
    primary: Arc<dyn ContentSource<C>>,
    backup: Arc<dyn ContentSource<C>>,
}

impl<C> FallbackSource<C> {
    pub fn new(primary: Arc<dyn ContentSource<C>>, backup: Arc<dyn ContentSource<C>>) -> Self {
        Self { primary, backup }
    }
}

#[async_trait]
impl<C: Send> ContentSource<C> for FallbackSource<C> {
    async fn generate(
        &self,
        context: &SlotContext,
        used: &HashSet<Fingerprint>,
    ) -> Option<GeneratedContent<C>> {
        match self.primary.generate(context, used).await {
            Some(output) => Some(output),
            None => self.backup.generate(context, used).await,
        }
    }
}

/// Converts another source's content, keeping its fingerprints.
pub struct MapSource<S, F, A> {
    inner: S,
    map: F,
    _input: PhantomData<fn() -> A>,
}

impl<S, F, A> MapSource<S, F, A> {
    pub fn new(inner: S, map: F) -> Self {
        Self {
            inner,
            map,
            _input: PhantomData,
        }
    }
}

#[async_trait]
impl<S, F, A, B> ContentSource<B> for MapSource<S, F, A>
where
    S: ContentSource<A>,
    F: Fn(A, &SlotContext) -> B + Send + Sync,
    A: Send + 'static,
    B: Send + 'static,
{
    async fn generate(
        &self,
        context: &SlotContext,
        used: &HashSet<Fingerprint>,
    ) -> Option<GeneratedContent<B>> {
        let output = self.inner.generate(context, used).await?;
        Some(GeneratedContent::new(
            (self.map)(output.content, context),
            output.fingerprints,
        ))
    }
}
