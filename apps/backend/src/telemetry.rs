use std::env;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "info,actix_web=info,sqlx=warn,sea_orm=warn";

/// Install the global subscriber.
///
/// `RUST_LOG` filters (quiet SQL by default). Output is flattened JSON unless
/// `LOG_FORMAT=text`, which gives compact human-readable lines for local runs.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let text = env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("text"));

    let json_layer = (!text).then(|| {
        fmt::layer()
            .with_target(true)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(false)
            .json()
            .flatten_event(true)
    });
    let text_layer = text.then(|| fmt::layer().compact().with_target(false));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}
