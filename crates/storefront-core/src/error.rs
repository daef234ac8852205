//! Error types shared by the page controllers.

use std::fmt;

/// Configuration could not be loaded or failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Malformed JSON or a field of the wrong type.
    Json(String),
    /// `debounce_ms` must be positive.
    ZeroDebounce,
    /// An endpoint or path was empty or not rooted at `/`.
    InvalidPath { field: &'static str, value: String },
    /// `log_level` is not one of trace/debug/info/warn/error.
    UnknownLogLevel(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "config JSON error: {msg}"),
            Self::ZeroDebounce => write!(f, "debounce_ms must be greater than zero"),
            Self::InvalidPath { field, value } => {
                write!(f, "{field} must be a path starting with '/', got {value:?}")
            }
            Self::UnknownLogLevel(level) => write!(f, "unknown log level: {level}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// A request failed before a usable response was available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request never completed (offline, DNS, CORS, aborted).
    Network(String),
    /// The body could not be decoded as the expected JSON shape.
    Decode(String),
    /// The server answered with a non-2xx status.
    Status { status: u16, body: String },
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "network error: {msg}"),
            Self::Decode(msg) => write!(f, "decode error: {msg}"),
            Self::Status { status, .. } => write!(f, "unexpected HTTP status {status}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Why a review action was refused before any request was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewRejection {
    /// No star selected.
    MissingRating,
    /// The modal holds no order id.
    MissingOrder,
    /// A rate button was pressed in a row without an order id.
    MissingOrderContext,
}

impl fmt::Display for ReviewRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRating => write!(f, "no rating selected"),
            Self::MissingOrder => write!(f, "no order id found for review submission"),
            Self::MissingOrderContext => {
                write!(f, "order details element or its id not found for this product")
            }
        }
    }
}

impl std::error::Error for ReviewRejection {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            ConfigError::InvalidPath {
                field: "feed_path",
                value: "feed".into()
            }
            .to_string(),
            "feed_path must be a path starting with '/', got \"feed\""
        );
        assert_eq!(
            FetchError::Status {
                status: 503,
                body: String::new()
            }
            .to_string(),
            "unexpected HTTP status 503"
        );
        assert_eq!(
            ReviewRejection::MissingRating.to_string(),
            "no rating selected"
        );
    }
}
