//! Error types
//!
//! Field misses are not errors. Extraction fails only when the caller's
//! selector configuration does not compile; the rate loader fails on
//! transport or sheet-format problems.

use thiserror::Error;

/// Failure of an extraction call as a whole.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid selector `{0}`")]
    Selector(String),
}

/// Failure while loading or parsing the zone rate sheet.
#[derive(Debug, Error)]
pub enum RateError {
    #[error("rate sheet URL is not valid: {0}")]
    Url(#[from] url::ParseError),
    #[error("rate sheet request failed: {0}")]
    Http(#[from] Box<ureq::Error>),
    #[error("rate sheet returned HTTP {0}")]
    Status(u16),
    #[error("rate sheet has no header row")]
    MissingHeader,
    #[error("rate sheet is missing column `{0}`")]
    MissingColumn(String),
}
