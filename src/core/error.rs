//! Error taxonomy for rate lookups.

use chrono::NaiveDate;

/// Errors raised while building a client or fetching rates.
///
/// `UnknownCurrencyCode` is a construction-time error and always reaches the
/// caller. Every other variant is a per-call error and is turned into
/// `Ok(None)` by a client configured to suppress errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown currency code: {0}")]
    UnknownCurrencyCode(String),

    #[error("Bid/ask rates are not published for {0}")]
    BidAskUnavailable(String),

    #[error("API error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Api {
        /// HTTP status, `None` when the request never got a response.
        status: Option<u16>,
        message: String,
    },

    #[error("Invalid date: '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid publication count: {0} (expected 1..=255)")]
    InvalidCount(u16),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
}

impl Error {
    /// HTTP status attached to an `Api` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => *status,
            _ => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
