use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for the analyzer core and its I/O adapters.
///
/// Only configuration and startup I/O failures are meant to be fatal
/// (see `Error::Config` / `Error::Io`); everything else is recovered
/// locally by the caller (a malformed row is skipped and logged, not
/// propagated) per the data-path error handling design.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("internal invariant violated: {0}")]
    Internal(String),
}
