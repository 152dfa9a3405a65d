use std::sync::OnceLock;

use eyre::{WrapErr as _, eyre};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

static INSTALLED: OnceLock<Result<(), String>> = OnceLock::new();

/// Install the global subscriber, filtered by `RUST_LOG` (default `info`)
///
/// Records from the `log` facade are forwarded. Later calls return the first outcome.
pub fn try_init() -> eyre::Result<()> {
    INSTALLED
        .get_or_init(|| install().map_err(|error| format!("{error:#}")))
        .clone()
        .map_err(|error| eyre!(error))
}

pub fn init() {
    if let Err(error) = try_init() {
        eprintln!("logging disabled: {error}");
    }
}

fn install() -> eyre::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();

    tracing_log::LogTracer::init().wrap_err("unable to forward log records")?;
    tracing::subscriber::set_global_default(subscriber)
        .wrap_err("a global tracing subscriber is already set")?;

    Ok(())
}
