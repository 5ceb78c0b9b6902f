use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Installs the global subscriber, writing to stderr so command output on
/// stdout stays clean. `RUST_LOG` overrides the verbosity switch.
pub fn init_logging(verbose: bool) -> Result<()> {
    let app_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let layer = fmt::layer()
        .pretty()
        .without_time()
        .with_writer(std::io::stderr);

    match EnvFilter::try_from_default_env() {
        Ok(env_filter) => tracing_subscriber::registry()
            .with(layer)
            .with(env_filter)
            .try_init()?,
        Err(_) => {
            let targets = Targets::new()
                .with_target("fxr", app_level)
                .with_default(LevelFilter::WARN);
            tracing_subscriber::registry()
                .with(layer)
                .with(targets)
                .try_init()?
        }
    }
    Ok(())
}
