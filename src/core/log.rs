//! Diagnostics go to stderr so rendered screens on stdout stay pipeable.
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

const APP_TARGET: &str = "fintrack";
const HTTP_TARGET: &str = "reqwest";

/// Per-target levels. A failing command is always reported; request
/// tracing and the HTTP client's own events only with `verbose`.
fn app_targets(verbose: bool) -> Targets {
    if verbose {
        Targets::new()
            .with_target(APP_TARGET, LevelFilter::DEBUG)
            .with_target(HTTP_TARGET, LevelFilter::INFO)
    } else {
        Targets::new().with_target(APP_TARGET, LevelFilter::ERROR)
    }
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "error" }
}

/// Installs the global subscriber. `RUST_LOG` overrides the default level.
pub fn init_logging(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .pretty()
                .without_time(),
        )
        .with(app_targets(verbose))
        .with(env_filter)
        .init();
}
