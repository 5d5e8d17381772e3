use thiserror::Error;

/// Errors raised while validating or compiling a stub mapping.
#[derive(Debug, Error)]
pub enum StubError {
    #[error("invalid regex `{pattern}`: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("request pattern sets more than one URL matcher: {0}")]
    ConflictingUrlMatchers(String),

    #[error("invalid response status {0}")]
    InvalidStatus(u16),

    #[error("invalid response header name `{0}`")]
    InvalidHeaderName(String),

    #[error("invalid value for response header `{0}`")]
    InvalidHeaderValue(String),

    #[error("invalid JSON in equalToJson: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
