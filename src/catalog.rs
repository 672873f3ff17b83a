//! Built-in slide generators.
//!
//! A text-only pool modelled on a typical talk: a title slide pinned to the
//! first slot, an introduction peaked at the second, history slides around the
//! third and fourth, a conclusion pinned to the last slot, and a body of
//! statements, quotes, anecdotes and charts in between.

use crate::generator::{
    ContentSource, FallbackSource, GeneratorDescriptor, MapSource, TemplateSource,
};
use crate::types::SlotContext;
use crate::weight::WeightPolicy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// One generated slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideContent {
    pub layout: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<String>,
}

impl fmt::Display for SlideContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.layout, self.title)?;
        for line in &self.lines {
            write!(f, "\n  {}", line)?;
        }
        Ok(())
    }
}

fn slide_source(
    layout: &'static str,
    templates: &[&str],
    lines: &'static [&'static str],
) -> impl ContentSource<SlideContent> {
    MapSource::new(
        TemplateSource::new(templates.iter().copied()),
        move |title: String, context: &SlotContext| SlideContent {
            layout: layout.to_string(),
            title,
            lines: lines
                .iter()
                .filter_map(|line| TemplateSource::render(line, context))
                .collect(),
        },
    )
}

fn title_slide() -> GeneratorDescriptor<SlideContent> {
    GeneratorDescriptor::builder(
        "title",
        slide_source(
            "title",
            &[
                "The Unexpected Benefits of {seed}",
                "{seed}: A Practical Guide",
                "Why Everyone Is Talking About {seed}",
            ],
            &["{presenter}"],
        ),
    )
    .tag("title")
    .weight(WeightPolicy::peaked(&[0], 100_000.0, 0.0))
    .build()
}

fn about_me_slide() -> GeneratorDescriptor<SlideContent> {
    let personal: Arc<dyn ContentSource<SlideContent>> = Arc::new(slide_source(
        "about_me",
        &["About {presenter}", "Who is {presenter}?"],
        &["How I got into {topic}"],
    ));
    let generic: Arc<dyn ContentSource<SlideContent>> = Arc::new(slide_source(
        "about_me",
        &["About me", "A little about myself"],
        &["How I got into {topic}"],
    ));
    GeneratorDescriptor::builder("about_me", FallbackSource::new(personal, generic))
        .tag("about_me")
        .weight(WeightPolicy::peaked(&[1], 10.0, 0.0))
        .repetition_tolerance(3)
        .build()
}

fn history_slide() -> GeneratorDescriptor<SlideContent> {
    GeneratorDescriptor::builder(
        "history",
        slide_source(
            "history",
            &[
                "A Brief History of {seed}",
                "How {seed} Came To Be",
                "{seed} Through the Ages",
            ],
            &["\"{seed} was never meant to last.\""],
        ),
    )
    .tags(["history", "quote"])
    .weight(WeightPolicy::peaked(&[2, 3], 20.0, 0.3))
    .build()
}

fn history_person_slide() -> GeneratorDescriptor<SlideContent> {
    GeneratorDescriptor::builder(
        "history_person",
        slide_source(
            "two_column",
            &[
                "The Inventor of {seed}",
                "The People Behind {seed}",
            ],
            &["Then", "Now"],
        ),
    )
    .tags(["history", "two_images"])
    .weight(WeightPolicy::peaked(&[2, 3], 12.0, 0.1))
    .build()
}

fn full_image_slide() -> GeneratorDescriptor<SlideContent> {
    GeneratorDescriptor::builder(
        "full_image",
        slide_source(
            "full_image",
            &[
                "{seed}",
                "Picture This: {seed}",
                "{seed} in the Wild",
                "What {seed} Really Looks Like",
                "A Closer Look at {seed}",
                "{seed}, Up Close",
                "Behold: {seed}",
                "Meanwhile, {seed}",
                "{seed} at Dawn",
                "Everyday {seed}",
            ],
            &[],
        ),
    )
    .tag("full_image")
    .weight(WeightPolicy::constant(1.0))
    .build()
}

fn inspiration_slide() -> GeneratorDescriptor<SlideContent> {
    GeneratorDescriptor::builder(
        "inspiration",
        slide_source(
            "statement",
            &[
                "Dream big about {seed}",
                "Never stop believing in {seed}",
                "{seed} is a state of mind",
            ],
            &[],
        ),
    )
    .tags(["inspiration", "statement"])
    .weight(WeightPolicy::constant(0.6))
    .build()
}

fn bold_statement_slide() -> GeneratorDescriptor<SlideContent> {
    GeneratorDescriptor::builder(
        "bold_statement",
        slide_source(
            "statement",
            &[
                "{seed} will change everything",
                "Nobody needs {seed}",
                "{seed} is overrated",
            ],
            &[],
        ),
    )
    .tags(["bold_statement", "statement"])
    .weight(WeightPolicy::constant(1.0))
    .build()
}

fn quote_slide() -> GeneratorDescriptor<SlideContent> {
    GeneratorDescriptor::builder(
        "quote",
        slide_source(
            "quote",
            &[
                "\"Whatever you do, do {seed}.\"",
                "\"There is no {seed} without courage.\"",
            ],
            &["Anonymous"],
        ),
    )
    .tags(["quote", "statement"])
    .weight(WeightPolicy::constant(0.6))
    .build()
}

fn anecdote_slide() -> GeneratorDescriptor<SlideContent> {
    GeneratorDescriptor::builder(
        "anecdote",
        slide_source(
            "anecdote",
            &[
                "The Day I Met {seed}",
                "My First Encounter With {seed}",
            ],
            &["Tell the story of the first time you saw {seed}"],
        ),
    )
    .tag("anecdote")
    .weight(WeightPolicy::constant(1.0))
    .build()
}

fn two_captions_slide() -> GeneratorDescriptor<SlideContent> {
    GeneratorDescriptor::builder(
        "two_captions",
        slide_source(
            "two_captions",
            &[
                "{seed}: Expectation vs Reality",
                "{seed}: Before and After",
            ],
            &["Expectation", "Reality"],
        ),
    )
    .tags(["multi_caption", "two_captions"])
    .weight(WeightPolicy::constant(2.0))
    .build()
}

fn chart_slide() -> GeneratorDescriptor<SlideContent> {
    GeneratorDescriptor::builder(
        "chart",
        slide_source(
            "chart",
            &[
                "{seed} by the Numbers",
                "The Rise of {seed}",
                "{seed} Over Time",
            ],
            &[],
        ),
    )
    .tag("chart")
    .weight(WeightPolicy::constant(4.0))
    .build()
}

fn yes_no_chart_slide() -> GeneratorDescriptor<SlideContent> {
    GeneratorDescriptor::builder(
        "yes_no_chart",
        slide_source(
            "pie_chart",
            &[
                "Do You Like {seed}?",
                "Have You Ever Tried {seed}?",
            ],
            &["Yes", "No"],
        ),
    )
    .tags(["pie_chart", "yes_no_chart", "chart"])
    .weight(WeightPolicy::constant(2.5))
    .repetition_tolerance(4)
    .retry_budget(1)
    .build()
}

fn conclusion_slide() -> GeneratorDescriptor<SlideContent> {
    GeneratorDescriptor::builder(
        "conclusion",
        slide_source(
            "conclusion",
            &["Conclusion", "In Conclusion: {seed}", "What We Learned About {topic}"],
            &["Thank you!"],
        ),
    )
    .tag("conclusion")
    .weight(WeightPolicy::peaked(&[-1], 10_000.0, 0.0))
    .repetition_tolerance(10)
    .build()
}

/// The full built-in pool.
pub fn slide_generators() -> Vec<GeneratorDescriptor<SlideContent>> {
    vec![
        title_slide(),
        about_me_slide(),
        history_slide(),
        history_person_slide(),
        full_image_slide(),
        inspiration_slide(),
        bold_statement_slide(),
        quote_slide(),
        anecdote_slide(),
        two_captions_slide(),
        chart_slide(),
        yes_no_chart_slide(),
        conclusion_slide(),
    ]
}
