//! Line formatting for informational and diagnostic output.
//!
//! Stable script-facing lines (cleanup summaries, delete results) are
//! printed by the commands directly and never go through here.

use super::context::UiContext;
use super::theme::{styled, styles, Badge};

pub fn badge(ctx: &UiContext, kind: Badge, message: &str) -> String {
    let mark = styled(kind.display(ctx.unicode), kind.style(), ctx.color);
    match message {
        "" => mark,
        _ => format!("{} {}", mark, message),
    }
}

/// `Data dir: /srv` on a terminal, `data_dir=/srv` otherwise.
pub fn kv(ctx: &UiContext, key: &str, value: &str) -> String {
    if !ctx.mode.is_pretty() {
        return format!("{}={}", key.to_lowercase().replace(' ', "_"), value);
    }
    let label = styled(&format!("{}:", key), styles::dim(), ctx.color);
    format!("{} {}", label, value)
}

fn hint(ctx: &UiContext, text: &str) -> String {
    let text = text.strip_prefix("Hint: ").unwrap_or(text);
    if !ctx.mode.is_pretty() {
        return format!("hint={}", text);
    }
    format!("{} {}", styled("Hint:", styles::dim(), ctx.color), text)
}

pub fn error_message(ctx: &UiContext, message: &str, error_hint: Option<&str>) -> String {
    let headline = if ctx.mode.is_pretty() {
        badge(ctx, Badge::Err, message)
    } else {
        format!("error={}", message)
    };
    match error_hint {
        Some(h) => format!("{}\n{}", headline, hint(ctx, h)),
        None => headline,
    }
}

pub fn print_error(ctx: &UiContext, message: &str, error_hint: Option<&str>) {
    eprintln!("{}", error_message(ctx, message, error_hint));
}
