use thiserror::Error;
use tracing_subscriber::{filter::ParseError, util::TryInitError};

/// Failures of [`logger_init`](crate::logger_init) and of parsing its configuration.
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("unknown log format {0:?}, expected text, json or journald")]
    UnknownFormat(String),

    /// Journald output needs Linux and the `journald` feature.
    #[error("journald output is not built into this binary")]
    JournaldUnavailable,

    #[error("invalid log directives {directives:?}: {source}")]
    InvalidDirectives {
        directives: String,
        #[source]
        source: ParseError,
    },

    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,

    #[error("cannot connect to journald: {0}")]
    Journald(#[source] std::io::Error),

    #[error("cannot install tracing subscriber: {0}")]
    Install(#[source] TryInitError),
}
