//! Tracing subscriber setup.
//!
//! Filter directives come from `KILN_LOG`, falling back to `RUST_LOG`, and
//! default to `warn` so translator warnings are always shown. Setting
//! `KILN_LOG_TREE` renders spans as an indented tree instead of flat lines.

use std::sync::Once;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static TRACING_INIT: Once = Once::new();

fn directives() -> String {
    std::env::var("KILN_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_default()
}

pub fn filter_from(directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(directives)
}

/// Install the global subscriber. Later calls do nothing.
pub fn init() {
    TRACING_INIT.call_once(|| {
        let filter = filter_from(&directives());

        if std::env::var_os("KILN_LOG_TREE").is_some() {
            tracing_subscriber::registry()
                .with(tracing_tree::HierarchicalLayer::new(2).with_targets(true))
                .with(filter)
                .init();
        } else {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .with(filter)
                .init();
        }
    });
}
