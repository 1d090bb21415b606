use thiserror::Error;

/// Top-level error type used across the entire application.
#[derive(Debug, Error)]
pub enum TreadError {
    #[error("config error: {0}")]
    Config(String),

    #[error("source error: {0}")]
    Source(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("invalid sample: {0}")]
    InvalidSample(String),

    #[error("out-of-order sample: elapsed {got}s is before {previous}s")]
    OutOfOrder { previous: f64, got: f64 },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = TreadError> = std::result::Result<T, E>;
