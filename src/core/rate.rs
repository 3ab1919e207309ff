//! Exchange rate value objects.

use super::currency::CurrencyRegistry;
use super::error::{Error, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Mul;
use std::str::FromStr;

/// Numeric representation used for parsed rates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// Fixed-point decimals, exactly as published.
    #[default]
    Exact,
    /// Binary floating point.
    Approximate,
}

impl Precision {
    /// Converts a JSON number into a rate value.
    pub fn parse(&self, number: &serde_json::Number) -> Result<RateValue> {
        match self {
            Precision::Exact => {
                let text = number.to_string();
                Decimal::from_str(&text)
                    .or_else(|_| Decimal::from_scientific(&text))
                    .map(RateValue::Exact)
                    .map_err(|e| Error::MalformedPayload(format!("invalid rate '{text}': {e}")))
            }
            Precision::Approximate => number
                .as_f64()
                .map(RateValue::Approximate)
                .ok_or_else(|| Error::MalformedPayload(format!("invalid rate '{number}'"))),
        }
    }
}

/// A single published value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateValue {
    Exact(Decimal),
    Approximate(f64),
}

impl RateValue {
    pub fn to_f64(&self) -> f64 {
        match self {
            RateValue::Exact(d) => d.to_f64().unwrap_or(f64::NAN),
            RateValue::Approximate(f) => *f,
        }
    }

    /// The exact value, if this was parsed with [`Precision::Exact`].
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            RateValue::Exact(d) => Some(*d),
            RateValue::Approximate(_) => None,
        }
    }

    pub fn precision(&self) -> Precision {
        match self {
            RateValue::Exact(_) => Precision::Exact,
            RateValue::Approximate(_) => Precision::Approximate,
        }
    }

    /// Multiplies by `amount`, `None` if an exact value overflows.
    pub fn checked_mul(self, amount: Decimal) -> Option<RateValue> {
        match self {
            RateValue::Exact(d) => d.checked_mul(amount).map(RateValue::Exact),
            RateValue::Approximate(f) => amount.to_f64().map(|a| RateValue::Approximate(f * a)),
        }
    }

    fn midpoint(bid: RateValue, ask: RateValue) -> RateValue {
        match (bid, ask) {
            (RateValue::Exact(b), RateValue::Exact(a)) => RateValue::Exact((b + a) / Decimal::TWO),
            (b, a) => RateValue::Approximate((b.to_f64() + a.to_f64()) / 2.0),
        }
    }
}

impl fmt::Display for RateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateValue::Exact(d) => write!(f, "{d}"),
            RateValue::Approximate(v) => write!(f, "{v}"),
        }
    }
}

impl From<Decimal> for RateValue {
    fn from(value: Decimal) -> Self {
        RateValue::Exact(value)
    }
}

impl From<f64> for RateValue {
    fn from(value: f64) -> Self {
        RateValue::Approximate(value)
    }
}

/// The values published for one day.
///
/// Bid and ask exist only for table C publications, so their presence is
/// part of the variant rather than a pair of optional fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Quote {
    Mid {
        mid: RateValue,
    },
    BidAsk {
        mid: RateValue,
        bid: RateValue,
        ask: RateValue,
    },
}

impl Quote {
    pub fn mid(mid: impl Into<RateValue>) -> Self {
        Quote::Mid { mid: mid.into() }
    }

    pub fn bid_ask(
        mid: impl Into<RateValue>,
        bid: impl Into<RateValue>,
        ask: impl Into<RateValue>,
    ) -> Self {
        Quote::BidAsk {
            mid: mid.into(),
            bid: bid.into(),
            ask: ask.into(),
        }
    }

    /// Builds a quote from the optional fields of a payload record.
    ///
    /// A lone bid or ask is ignored. Without a mid, both bid and ask are
    /// required and the mid is their midpoint.
    pub fn from_parts(
        mid: Option<RateValue>,
        bid: Option<RateValue>,
        ask: Option<RateValue>,
    ) -> Result<Self> {
        match (mid, bid, ask) {
            (Some(mid), Some(bid), Some(ask)) => Ok(Quote::BidAsk { mid, bid, ask }),
            (None, Some(bid), Some(ask)) => Ok(Quote::BidAsk {
                mid: RateValue::midpoint(bid, ask),
                bid,
                ask,
            }),
            (Some(mid), _, _) => Ok(Quote::Mid { mid }),
            (None, _, _) => Err(Error::MalformedPayload(
                "record has neither a mid rate nor a bid/ask pair".to_string(),
            )),
        }
    }

    pub fn mid_value(&self) -> RateValue {
        match self {
            Quote::Mid { mid } | Quote::BidAsk { mid, .. } => *mid,
        }
    }

    pub fn bid(&self) -> Option<RateValue> {
        match self {
            Quote::BidAsk { bid, .. } => Some(*bid),
            Quote::Mid { .. } => None,
        }
    }

    pub fn ask(&self) -> Option<RateValue> {
        match self {
            Quote::BidAsk { ask, .. } => Some(*ask),
            Quote::Mid { .. } => None,
        }
    }

    pub fn has_bid_ask(&self) -> bool {
        matches!(self, Quote::BidAsk { .. })
    }

    /// Multiplies every value by `amount`, keeping the shape.
    ///
    /// Returns `None` when any exact product overflows.
    pub fn scale(&self, amount: Decimal) -> Option<Quote> {
        match *self {
            Quote::Mid { mid } => Some(Quote::Mid {
                mid: mid.checked_mul(amount)?,
            }),
            Quote::BidAsk { mid, bid, ask } => Some(Quote::BidAsk {
                mid: mid.checked_mul(amount)?,
                bid: bid.checked_mul(amount)?,
                ask: ask.checked_mul(amount)?,
            }),
        }
    }
}

/// Rate of one currency published on one day.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRate {
    currency_code: String,
    currency_name: String,
    date: NaiveDate,
    source_id: String,
    quote: Quote,
}

impl ExchangeRate {
    /// Fails with [`Error::UnknownCurrencyCode`] when `currency_code` is not in
    /// `registry`.
    pub fn new(
        registry: &CurrencyRegistry,
        currency_code: &str,
        date: NaiveDate,
        source_id: impl Into<String>,
        quote: Quote,
    ) -> Result<Self> {
        let currency = registry
            .lookup(currency_code)
            .ok_or_else(|| Error::UnknownCurrencyCode(currency_code.to_uppercase()))?;

        Ok(Self {
            currency_code: currency.code.clone(),
            currency_name: currency.name.clone(),
            date,
            source_id: source_id.into(),
            quote,
        })
    }

    pub fn currency_code(&self) -> &str {
        &self.currency_code
    }

    pub fn currency_name(&self) -> &str {
        &self.currency_name
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn quote(&self) -> &Quote {
        &self.quote
    }

    pub fn mid(&self) -> RateValue {
        self.quote.mid_value()
    }

    pub fn bid(&self) -> Option<RateValue> {
        self.quote.bid()
    }

    pub fn ask(&self) -> Option<RateValue> {
        self.quote.ask()
    }

    pub fn has_bid_ask(&self) -> bool {
        self.quote.has_bid_ask()
    }

    /// Converts an amount in PLN using this day's values, `None` on overflow.
    pub fn scale(&self, amount: Decimal) -> Option<Quote> {
        self.quote.scale(amount)
    }

    /// Same as [`ExchangeRate::scale`] for callers holding a float amount.
    pub fn scale_f64(&self, amount: f64) -> Option<Quote> {
        Decimal::from_f64(amount).and_then(|a| self.scale(a))
    }
}

impl Mul<Decimal> for &ExchangeRate {
    type Output = Option<Quote>;

    fn mul(self, amount: Decimal) -> Option<Quote> {
        self.scale(amount)
    }
}

impl Mul<&ExchangeRate> for Decimal {
    type Output = Option<Quote>;

    fn mul(self, rate: &ExchangeRate) -> Option<Quote> {
        rate.scale(self)
    }
}

impl fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.quote {
            Quote::Mid { mid } => write!(
                f,
                "ExchangeRate({}, {}, mid={})",
                self.currency_code, self.date, mid
            ),
            Quote::BidAsk { mid, bid, ask } => write!(
                f,
                "ExchangeRate({}, {}, mid={}, bid={}, ask={})",
                self.currency_code, self.date, mid, bid, ask
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2017, 1, 2).unwrap()
    }

    fn usd(quote: Quote) -> ExchangeRate {
        ExchangeRate::new(&CurrencyRegistry::nbp(), "USD", date(), "1/A/NBP/2017", quote).unwrap()
    }

    #[test]
    fn test_mid_rate_has_no_bid_ask() {
        let rate = usd(Quote::mid(dec("4.1793")));

        assert_eq!(rate.currency_code(), "USD");
        assert_eq!(rate.currency_name(), "dolar amerykański");
        assert_eq!(rate.date(), date());
        assert_eq!(rate.source_id(), "1/A/NBP/2017");
        assert_eq!(rate.mid(), RateValue::Exact(dec("4.1793")));
        assert!(rate.bid().is_none());
        assert!(rate.ask().is_none());
        assert!(!rate.has_bid_ask());
    }

    #[test]
    fn test_bid_ask_rate() {
        let rate = usd(Quote::bid_ask(dec("4.2"), dec("4.1"), dec("4.3")));

        assert_eq!(rate.mid(), RateValue::Exact(dec("4.2")));
        assert_eq!(rate.bid(), Some(RateValue::Exact(dec("4.1"))));
        assert_eq!(rate.ask(), Some(RateValue::Exact(dec("4.3"))));
    }

    #[test]
    fn test_code_is_normalized() {
        let rate = ExchangeRate::new(
            &CurrencyRegistry::nbp(),
            "usd",
            date(),
            "1/A/NBP/2017",
            Quote::mid(dec("1")),
        )
        .unwrap();
        assert_eq!(rate.currency_code(), "USD");
    }

    #[test]
    fn test_unknown_code_is_rejected() {
        let result = ExchangeRate::new(
            &CurrencyRegistry::nbp(),
            "xxx",
            date(),
            "1/A/NBP/2017",
            Quote::mid(dec("1.0")),
        );
        match result {
            Err(Error::UnknownCurrencyCode(code)) => assert_eq!(code, "XXX"),
            other => panic!("Expected UnknownCurrencyCode, got {other:?}"),
        }
    }

    #[test]
    fn test_partial_bid_ask_is_ignored() {
        let mid = Some(RateValue::Exact(dec("4.0")));
        let bid = Some(RateValue::Exact(dec("3.9")));
        let ask = Some(RateValue::Exact(dec("4.1")));

        let only_bid = Quote::from_parts(mid, bid, None).unwrap();
        assert_eq!(only_bid, Quote::mid(dec("4.0")));

        let only_ask = Quote::from_parts(mid, None, ask).unwrap();
        assert_eq!(only_ask, Quote::mid(dec("4.0")));
        assert!(only_ask.bid().is_none());
    }

    #[test]
    fn test_bid_ask_without_mid_uses_midpoint() {
        let quote = Quote::from_parts(
            None,
            Some(RateValue::Exact(dec("4.4"))),
            Some(RateValue::Exact(dec("4.6"))),
        )
        .unwrap();
        assert_eq!(quote.mid_value(), RateValue::Exact(dec("4.5")));
        assert_eq!(quote.bid(), Some(RateValue::Exact(dec("4.4"))));
    }

    #[test]
    fn test_record_without_any_rate_is_rejected() {
        assert!(matches!(
            Quote::from_parts(None, Some(RateValue::Exact(dec("4.4"))), None),
            Err(Error::MalformedPayload(_))
        ));
        assert!(matches!(
            Quote::from_parts(None, None, None),
            Err(Error::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_scale_mid() {
        let rate = usd(Quote::mid(dec("4.12345")));

        for amount in ["0", "1", "2.5", "1000.01", "0.00001"] {
            let amount = dec(amount);
            let scaled = rate.scale(amount).unwrap();
            assert_eq!(scaled, Quote::mid(dec("4.12345") * amount));
            assert!(scaled.bid().is_none());
            assert!(scaled.ask().is_none());
        }
    }

    #[test]
    fn test_scale_bid_ask() {
        let rate = usd(Quote::bid_ask(dec("4.5"), dec("4.4"), dec("4.6")));
        let scaled = rate.scale(dec("10")).unwrap();

        assert_eq!(scaled.bid(), Some(RateValue::Exact(dec("44.0"))));
        assert_eq!(scaled.ask(), Some(RateValue::Exact(dec("46.0"))));
        assert_eq!(scaled.mid_value(), RateValue::Exact(dec("45.0")));
    }

    #[test]
    fn test_scale_spellings_agree() {
        let rate = usd(Quote::bid_ask(dec("4.5"), dec("4.4"), dec("4.6")));
        let amount = dec("2.5");

        let results = [rate.scale(amount), &rate * amount, amount * &rate];
        assert!(results[0].is_some());
        assert!(results.iter().all(|r| *r == results[0]));
        assert_eq!(rate.scale_f64(2.5), results[0]);
    }

    #[test]
    fn test_scale_does_not_mutate() {
        let rate = usd(Quote::mid(dec("4.0")));
        let _ = rate.scale(dec("100"));
        assert_eq!(rate.mid(), RateValue::Exact(dec("4.0")));
    }

    #[test]
    fn test_scale_approximate() {
        let rate = usd(Quote::mid(4.5_f64));
        let scaled = rate.scale(dec("2")).unwrap();
        assert_eq!(scaled.mid_value(), RateValue::Approximate(9.0));
    }

    #[test]
    fn test_scale_overflow_is_none() {
        let rate = usd(Quote::bid_ask(dec("4.5"), dec("4.4"), dec("4.6")));

        assert_eq!(rate.scale(Decimal::MAX), None);
        assert_eq!(&rate * Decimal::MAX, None);
        assert_eq!(rate.scale_f64(1e30), None);
        assert_eq!(rate.mid(), RateValue::Exact(dec("4.5")));
    }

    #[test]
    fn test_precision_parse() {
        let number: serde_json::Number = serde_json::from_str("4.2718").unwrap();

        let exact = Precision::Exact.parse(&number).unwrap();
        assert_eq!(exact, RateValue::Exact(dec("4.2718")));
        assert_eq!(exact.as_decimal(), Some(dec("4.2718")));

        let approx = Precision::Approximate.parse(&number).unwrap();
        assert_eq!(approx, RateValue::Approximate(4.2718));
        assert_eq!(approx.as_decimal(), None);
        assert_eq!(approx.precision(), Precision::Approximate);

        let long: serde_json::Number = serde_json::from_str("4.12345678901234567891").unwrap();
        assert_eq!(
            Precision::Exact.parse(&long).unwrap(),
            RateValue::Exact(dec("4.12345678901234567891"))
        );

        let integer: serde_json::Number = serde_json::from_str("4").unwrap();
        assert_eq!(
            Precision::Exact.parse(&integer).unwrap(),
            RateValue::Exact(dec("4"))
        );
    }

    #[test]
    fn test_display() {
        let rate = usd(Quote::mid(dec("4.1793")));
        assert_eq!(rate.to_string(), "ExchangeRate(USD, 2017-01-02, mid=4.1793)");

        let rate = usd(Quote::bid_ask(dec("4.5"), dec("4.4"), dec("4.6")));
        assert_eq!(
            rate.to_string(),
            "ExchangeRate(USD, 2017-01-02, mid=4.5, bid=4.4, ask=4.6)"
        );
    }
}
