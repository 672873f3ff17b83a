//! Deck renderers: turn a completed deck into an output document.

use crate::deck::SlotDeck;
use crate::error::AppError;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serde_json::json;
use std::fmt::Display;

/// Consumes a completed deck. Implementations decide the document format.
pub trait DeckRenderer<C> {
    type Output;

    fn render(&self, deck: &SlotDeck<C>) -> Result<Self::Output, AppError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineFormat {
    Text,
    Json,
}

impl OutlineFormat {
    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "text" => Ok(OutlineFormat::Text),
            "json" => Ok(OutlineFormat::Json),
            other => Err(AppError::ConfigError(format!(
                "Invalid output format: {} (must be 'text' or 'json')",
                other
            ))),
        }
    }
}

/// Renders a deck as a slot-by-slot outline.
#[derive(Debug, Clone)]
pub struct OutlineRenderer {
    format: OutlineFormat,
}

impl OutlineRenderer {
    pub fn new(format: OutlineFormat) -> Self {
        Self { format }
    }
}

impl<C: Serialize + Display> DeckRenderer<C> for OutlineRenderer {
    type Output = String;

    fn render(&self, deck: &SlotDeck<C>) -> Result<String, AppError> {
        let slots = deck.iter()?;
        match self.format {
            OutlineFormat::Json => {
                let slots: Vec<serde_json::Value> = slots
                    .map(|slot| {
                        json!({
                            "slot": slot.slot_index,
                            "generator": slot.generator,
                            "seed": slot.seed,
                            "content": slot.content,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(
                    &json!({ "total_slots": deck.total_slots(), "slots": slots }),
                )?)
            }
            OutlineFormat::Text => {
                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(vec!["#", "Generator", "Seed", "Content"]);
                for slot in slots {
                    table.add_row(vec![
                        (slot.slot_index + 1).to_string(),
                        slot.generator.to_string(),
                        slot.seed.clone(),
                        slot.content.to_string(),
                    ]);
                }
                Ok(table.to_string())
            }
        }
    }
}
