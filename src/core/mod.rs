//! Core types: currencies, rates, errors and the transport seam

pub mod config;
pub mod currency;
pub mod error;
pub mod log;
pub mod rate;
pub mod transport;

// Re-export main types for cleaner imports
pub use currency::{Currency, CurrencyRegistry, Table};
pub use error::{Error, Result};
pub use rate::{ExchangeRate, Precision, Quote, RateValue};
pub use transport::{HttpResponse, Transport, TransportError};
