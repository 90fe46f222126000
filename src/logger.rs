//! Tracing setup. [`init`] runs once at startup, after config is loaded.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

use crate::error::AppError;

/// HTTP-stack crates that drown request logs at debug level.
const QUIET_TARGETS: [&str; 3] = ["hyper=warn", "hyper_util=warn", "reqwest=warn"];

/// Install the global subscriber on stderr.
///
/// `prefer_level` is set when the level came from `-v` flags: it then beats
/// `RUST_LOG`. Otherwise `RUST_LOG` wins and `level` is the fallback.
pub fn init(level: &str, prefer_level: bool) -> Result<(), AppError> {
    let filter = build_filter(level, prefer_level)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| AppError::Logger(format!("failed to set subscriber: {e}")))
}

fn build_filter(level: &str, prefer_level: bool) -> Result<EnvFilter, AppError> {
    let from_env = || EnvFilter::try_from_default_env().ok();

    let filter = if prefer_level {
        EnvFilter::try_new(level).ok().or_else(from_env)
    } else {
        from_env().or_else(|| EnvFilter::try_new(level).ok())
    };
    let mut filter = filter.ok_or_else(|| AppError::Logger(format!("invalid log level '{level}'")))?;

    for directive in QUIET_TARGETS {
        let directive = directive
            .parse::<Directive>()
            .map_err(|e| AppError::Logger(format!("bad directive '{directive}': {e}")))?;
        filter = filter.add_directive(directive);
    }
    Ok(filter)
}
