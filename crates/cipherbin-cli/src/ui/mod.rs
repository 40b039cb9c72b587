//! UI primitives for the cipherbin CLI.
//!
//! - **Context**: Environment detection (TTY, color, unicode)
//! - **Mode**: Plain vs pretty output
//! - **Theme**: Badge tokens and owo-colors styles
//! - **Render**: Key-value lines, badges, hints, errors
//!
//! Command results that scripts depend on (cleanup summaries, delete
//! messages) are printed verbatim and never pass through these helpers.

mod context;
mod mode;
pub mod render;
pub mod theme;

pub use context::UiContext;
pub use theme::Badge;

pub use render::{badge, kv, print_error};
