use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Incomplete identifying parameters: `sn` and a token must be supplied
    /// together or not at all.
    #[error("Precondition violation: {0}")]
    Precondition(&'static str),

    /// The server answered with a non-success HTTP status.
    #[error("Request rejected (HTTP {status}): {body}")]
    Rejected { status: StatusCode, body: String },

    /// HTTP 200 carrying the vendor's structured error payload, e.g. an
    /// unknown device serial number.
    #[error("Unknown device: {0}")]
    UnknownDevice(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Response parsed as JSON but did not have the projected shape.
    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ApiResult<T> = Result<T, Error>;
