use std::error::Error as _;

use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter, fmt, fmt::time::OffsetTime, layer::SubscriberExt, util::SubscriberInitExt,
    util::TryInitError,
};

use crate::logger::{config::LoggerConfig, error::LoggerError};

pub(crate) fn text(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    let layer = fmt::layer()
        .with_ansi(cfg.use_color)
        .with_target(cfg.with_targets)
        .with_timer(mk_timer());

    init_with(tracing_subscriber::registry().with(env_or(&cfg.level)?).with(layer))
}

pub(crate) fn json(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    let layer = fmt::layer()
        .json()
        .with_ansi(false)
        .with_target(cfg.with_targets)
        .with_current_span(true)
        .with_timer(mk_timer());

    init_with(tracing_subscriber::registry().with(env_or(&cfg.level)?).with(layer))
}

#[cfg(all(target_os = "linux", feature = "journald"))]
pub(crate) fn journald(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    let layer = tracing_journald::layer()
        .map_err(LoggerError::Journald)?;
    init_with(tracing_subscriber::registry().with(env_or(&cfg.level)?).with(layer))
}

#[cfg(not(all(target_os = "linux", feature = "journald")))]
pub(crate) fn journald(_cfg: &LoggerConfig) -> Result<(), LoggerError> {
    Err(LoggerError::JournaldUnavailable)
}

/// `RUST_LOG` if it is set and valid, otherwise the configured directives.
fn env_or(level: &str) -> Result<EnvFilter, LoggerError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => mk_filter(level),
    }
}

fn mk_filter(level: &str) -> Result<EnvFilter, LoggerError> {
    EnvFilter::try_new(level).map_err(|source| LoggerError::InvalidDirectives {
        directives: level.to_string(),
        source,
    })
}

fn mk_timer() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

fn as_error(e: TryInitError) -> LoggerError {
    match e.source() {
        Some(src) if src.is::<tracing::subscriber::SetGlobalDefaultError>() => {
            LoggerError::AlreadyInitialized
        }
        _ => LoggerError::Install(e),
    }
}

fn init_with<S>(subscriber: S) -> Result<(), LoggerError>
where
    S: Subscriber + Send + Sync + 'static,
{
    subscriber.try_init().map_err(as_error)
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn accepts_level_and_directives() {
        assert!(mk_filter("info").is_ok());
        assert!(mk_filter("warn,qs_core=trace").is_ok());
    }

    #[test]
    fn rejects_bad_level() {
        let err = mk_filter("qs_core=loud").unwrap_err();
        assert!(matches!(
            &err,
            LoggerError::InvalidDirectives { directives, .. } if directives == "qs_core=loud"
        ));
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with(r#"invalid log directives "qs_core=loud": "#));
    }

    #[test]
    fn second_init_reports_already_initialized() {
        let cfg = LoggerConfig::default();
        let _ = text(&cfg);
        assert!(matches!(text(&cfg), Err(LoggerError::AlreadyInitialized)));
    }
}
