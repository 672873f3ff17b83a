//! Slotdeck: quota-aware slot scheduling for generated slide decks.
//!
//! A deck is a fixed number of slots. Each slot is filled by one generator drawn
//! from a weighted pool, subject to per-tag quotas and a limit on reused content.
//! Slots can be filled one after another or speculatively in parallel rounds
//! that commit in slot order.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod deck;
pub mod error;
pub mod generator;
pub mod logging;
pub mod quota;
pub mod render;
pub mod reuse;
pub mod schedule;
pub mod schema;
pub mod seed;
pub mod types;
pub mod weight;
