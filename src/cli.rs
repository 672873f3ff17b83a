//! CLI domain: parse, route and output only.
//! No scheduling logic; the route table dispatches to schemas and renderers.

mod output;
mod parse;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use route::RunContext;
