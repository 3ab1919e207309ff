//! Client for the NBP exchange rates API.
//!
//! A [`Client`] is bound to one currency. Every lookup goes through
//! [`Client::fetch`], which checks bid/ask availability and the request shape
//! before issuing exactly one GET against
//! `<base>/exchangerates/rates/<table>/<code>/<tail>`.

use crate::core::currency::{Currency, CurrencyRegistry, Table};
use crate::core::error::{Error, Result};
use crate::core::rate::{ExchangeRate, Precision, Quote};
use crate::core::transport::Transport;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.nbp.pl/api";

/// Largest `n` accepted by the `last/{n}` endpoint.
pub const MAX_LAST_COUNT: u16 = 255;

/// Which values a lookup asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RateKind {
    /// Mid rate from table A or B.
    #[default]
    Mid,
    /// Bid/ask quotes from table C.
    BidAsk,
}

impl From<bool> for RateKind {
    fn from(bid_ask: bool) -> Self {
        if bid_ask {
            RateKind::BidAsk
        } else {
            RateKind::Mid
        }
    }
}

/// Which publication(s) a lookup targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestShape {
    /// Most recently published rate.
    Current,
    /// Rate published today.
    Today,
    OnDate(NaiveDate),
    /// Inclusive range of effective dates.
    Range(NaiveDate, NaiveDate),
    /// Last `n` publications.
    Last(u16),
}

impl RequestShape {
    pub fn validate(&self) -> Result<()> {
        match *self {
            RequestShape::Range(start, end) if start > end => {
                Err(Error::InvalidRange { start, end })
            }
            RequestShape::Last(n) if n == 0 || n > MAX_LAST_COUNT => Err(Error::InvalidCount(n)),
            _ => Ok(()),
        }
    }

    /// Whether the response is returned as an ordered sequence.
    pub fn is_series(&self) -> bool {
        matches!(self, RequestShape::Range(..) | RequestShape::Last(_))
    }

    fn tail(&self) -> String {
        match self {
            RequestShape::Current => String::new(),
            RequestShape::Today => "today".to_string(),
            RequestShape::OnDate(date) => date.format("%Y-%m-%d").to_string(),
            RequestShape::Range(start, end) => {
                format!("{}/{}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))
            }
            RequestShape::Last(n) => format!("last/{n}"),
        }
    }
}

/// Result of [`Client::fetch`].
#[derive(Debug, Clone, PartialEq)]
pub enum Rates {
    Single(ExchangeRate),
    /// Rates in the order the publisher returned them.
    Series(Vec<ExchangeRate>),
}

impl Rates {
    pub fn into_vec(self) -> Vec<ExchangeRate> {
        match self {
            Rates::Single(rate) => vec![rate],
            Rates::Series(rates) => rates,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    table: String,
    currency: String,
    code: String,
    rates: Vec<RateRecord>,
}

#[derive(Debug, Deserialize)]
struct RateRecord {
    no: String,
    #[serde(rename = "effectiveDate")]
    effective_date: String,
    mid: Option<serde_json::Number>,
    bid: Option<serde_json::Number>,
    ask: Option<serde_json::Number>,
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_iso_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| Error::InvalidDate(value.to_string()))
}

pub struct Client {
    currency: Currency,
    mid_table: Table,
    registry: Arc<CurrencyRegistry>,
    transport: Arc<dyn Transport>,
    base_url: String,
    precision: Precision,
    suppress_errors: bool,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("currency", &self.currency.code)
            .field("base_url", &self.base_url)
            .field("precision", &self.precision)
            .field("suppress_errors", &self.suppress_errors)
            .finish()
    }
}

impl Client {
    /// Client for `currency_code` using the built-in NBP registry.
    pub fn new(currency_code: &str, transport: Arc<dyn Transport>) -> Result<Self> {
        Self::new_with_registry(currency_code, CurrencyRegistry::nbp(), transport)
    }

    pub fn new_with_registry(
        currency_code: &str,
        registry: Arc<CurrencyRegistry>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let currency = registry
            .lookup(currency_code)
            .cloned()
            .ok_or_else(|| Error::UnknownCurrencyCode(currency_code.to_uppercase()))?;
        let mid_table = currency
            .mid_table()
            .ok_or_else(|| Error::UnknownCurrencyCode(currency.code.clone()))?;

        Ok(Self {
            currency,
            mid_table,
            registry,
            transport,
            base_url: DEFAULT_BASE_URL.to_string(),
            precision: Precision::default(),
            suppress_errors: false,
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_suppress_errors(mut self, suppress: bool) -> Self {
        self.suppress_errors = suppress;
        self
    }

    pub fn currency_code(&self) -> &str {
        &self.currency.code
    }

    pub fn currency_name(&self) -> &str {
        &self.currency.name
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn suppress_errors(&self) -> bool {
        self.suppress_errors
    }

    /// Most recently published rate.
    pub async fn current(&self, kind: impl Into<RateKind>) -> Result<Option<ExchangeRate>> {
        let result = self.fetch_single(RequestShape::Current, kind.into()).await;
        self.settle(result)
    }

    /// Shorthand for [`Client::current`].
    pub async fn call(&self, kind: impl Into<RateKind>) -> Result<Option<ExchangeRate>> {
        self.current(kind).await
    }

    pub async fn today(&self, kind: impl Into<RateKind>) -> Result<Option<ExchangeRate>> {
        let result = self.fetch_single(RequestShape::Today, kind.into()).await;
        self.settle(result)
    }

    /// Rate effective on `date` (`YYYY-MM-DD`).
    pub async fn date(
        &self,
        date: &str,
        kind: impl Into<RateKind>,
    ) -> Result<Option<ExchangeRate>> {
        let kind = kind.into();
        let result = match self.table_for(kind).and_then(|_| parse_iso_date(date)) {
            Ok(date) => self.fetch_single(RequestShape::OnDate(date), kind).await,
            Err(e) => Err(e),
        };
        self.settle(result)
    }

    pub async fn on(
        &self,
        date: NaiveDate,
        kind: impl Into<RateKind>,
    ) -> Result<Option<ExchangeRate>> {
        let result = self.fetch_single(RequestShape::OnDate(date), kind.into()).await;
        self.settle(result)
    }

    /// Rates effective between `start` and `end` (`YYYY-MM-DD`, inclusive).
    pub async fn range(
        &self,
        start: &str,
        end: &str,
        kind: impl Into<RateKind>,
    ) -> Result<Option<Vec<ExchangeRate>>> {
        let kind = kind.into();
        let dates = self
            .table_for(kind)
            .and_then(|_| Ok((parse_iso_date(start)?, parse_iso_date(end)?)));
        let result = match dates {
            Ok((start, end)) => self.fetch_series(RequestShape::Range(start, end), kind).await,
            Err(e) => Err(e),
        };
        self.settle(result)
    }

    pub async fn range_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        kind: impl Into<RateKind>,
    ) -> Result<Option<Vec<ExchangeRate>>> {
        let result = self
            .fetch_series(RequestShape::Range(start, end), kind.into())
            .await;
        self.settle(result)
    }

    /// Last `count` publications.
    pub async fn last(
        &self,
        count: u16,
        kind: impl Into<RateKind>,
    ) -> Result<Option<Vec<ExchangeRate>>> {
        let result = self.fetch_series(RequestShape::Last(count), kind.into()).await;
        self.settle(result)
    }

    /// [`Client::fetch`] with the configured error suppression applied.
    pub async fn rates(&self, shape: RequestShape, kind: RateKind) -> Result<Option<Rates>> {
        let result = self.fetch(shape, kind).await;
        self.settle(result)
    }

    /// Runs one lookup without applying error suppression.
    #[instrument(name = "NbpFetch", skip(self), fields(code = %self.currency.code))]
    pub async fn fetch(&self, shape: RequestShape, kind: RateKind) -> Result<Rates> {
        let table = self.table_for(kind)?;
        shape.validate()?;

        let url = self.locator(table, &shape);
        debug!("Requesting rates from {}", url);

        let response = self
            .transport
            .get(&url)
            .await
            .map_err(|e| Error::Api {
                status: None,
                message: e.to_string(),
            })?;

        if !response.is_success() {
            let body = String::from_utf8_lossy(&response.body).trim().to_string();
            let message = if body.is_empty() {
                format!("HTTP {} for {}", response.status, url)
            } else {
                body
            };
            return Err(Error::Api {
                status: Some(response.status),
                message,
            });
        }

        let mut rates = self.parse(&response.body)?;
        if shape.is_series() {
            Ok(Rates::Series(rates))
        } else {
            // Single-day endpoints return a one-element list.
            Ok(Rates::Single(rates.swap_remove(0)))
        }
    }

    async fn fetch_single(&self, shape: RequestShape, kind: RateKind) -> Result<ExchangeRate> {
        match self.fetch(shape, kind).await? {
            Rates::Single(rate) => Ok(rate),
            Rates::Series(rates) => rates
                .into_iter()
                .next()
                .ok_or_else(|| Error::MalformedPayload("no rates in response".to_string())),
        }
    }

    async fn fetch_series(&self, shape: RequestShape, kind: RateKind) -> Result<Vec<ExchangeRate>> {
        Ok(self.fetch(shape, kind).await?.into_vec())
    }

    fn settle<T>(&self, result: Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) if self.suppress_errors => {
                warn!(error = %e, code = %self.currency.code, "Suppressed rate lookup error");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn table_for(&self, kind: RateKind) -> Result<Table> {
        match kind {
            RateKind::BidAsk if self.currency.has_bid_ask() => Ok(Table::C),
            RateKind::BidAsk => Err(Error::BidAskUnavailable(self.currency.code.clone())),
            RateKind::Mid => Ok(self.mid_table),
        }
    }

    fn locator(&self, table: Table, shape: &RequestShape) -> String {
        format!(
            "{}/exchangerates/rates/{}/{}/{}",
            self.base_url,
            table.as_path(),
            self.currency.code.to_lowercase(),
            shape.tail()
        )
    }

    /// Turns a response body into a non-empty list of rates.
    fn parse(&self, body: &[u8]) -> Result<Vec<ExchangeRate>> {
        let response: RatesResponse = serde_json::from_slice(body)
            .map_err(|e| Error::MalformedPayload(format!("Failed to parse rates response: {e}")))?;

        debug!(
            table = %response.table,
            currency = %response.currency,
            count = response.rates.len(),
            "Parsed rates response"
        );

        if !response.code.eq_ignore_ascii_case(&self.currency.code) {
            return Err(Error::MalformedPayload(format!(
                "expected rates for {}, got {}",
                self.currency.code, response.code
            )));
        }
        if response.rates.is_empty() {
            return Err(Error::MalformedPayload("no rates in response".to_string()));
        }

        response
            .rates
            .iter()
            .map(|record| self.rate_from_record(record))
            .collect()
    }

    fn rate_from_record(&self, record: &RateRecord) -> Result<ExchangeRate> {
        let date = NaiveDate::parse_from_str(&record.effective_date, "%Y-%m-%d").map_err(|_| {
            Error::MalformedPayload(format!("invalid effectiveDate '{}'", record.effective_date))
        })?;

        let value = |n: &Option<serde_json::Number>| {
            n.as_ref().map(|n| self.precision.parse(n)).transpose()
        };
        let quote = Quote::from_parts(value(&record.mid)?, value(&record.bid)?, value(&record.ask)?)?;

        ExchangeRate::new(
            &self.registry,
            &self.currency.code,
            date,
            record.no.clone(),
            quote,
        )
    }
}
