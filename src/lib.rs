pub mod cli;
pub mod client;
pub mod core;
pub mod providers;

pub use crate::client::{Client, RateKind, Rates, RequestShape};
pub use crate::core::{
    Currency, CurrencyRegistry, Error, ExchangeRate, Precision, Quote, RateValue, Table,
};

use crate::core::config::AppConfig;
use crate::providers::HttpTransport;
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};

/// A rate lookup requested from the command line.
#[derive(Debug, Clone)]
pub struct RateQuery {
    pub currency_code: String,
    pub shape: RequestShape,
    pub kind: RateKind,
    pub amount: Option<Decimal>,
    /// Overrides the configured precision.
    pub precision: Option<Precision>,
    /// Forces error suppression on regardless of config.
    pub suppress_errors: bool,
}

#[derive(Debug, Clone)]
pub enum AppCommand {
    Rate(RateQuery),
    Currencies { bid_ask_only: bool },
}

/// Builds a client for `currency_code` from configuration.
pub fn build_client(config: &AppConfig, currency_code: &str) -> Result<Client> {
    let transport = HttpTransport::new(config.timeout(), &config.user_agent)?;
    let client = Client::new(currency_code, Arc::new(transport))?
        .with_base_url(&config.base_url)
        .with_precision(config.precision)
        .with_suppress_errors(config.suppress_errors);
    Ok(client)
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("nbpx starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Rate(query) => {
            let mut config = config;
            if let Some(precision) = query.precision {
                config.precision = precision;
            }
            config.suppress_errors |= query.suppress_errors;

            let client = build_client(&config, &query.currency_code)
                .with_context(|| format!("Cannot look up rates for {}", query.currency_code))?;
            cli::rates::show_rates(&client, query.shape, query.kind, query.amount).await
        }
        AppCommand::Currencies { bid_ask_only } => {
            let registry = CurrencyRegistry::nbp();
            println!("{}", cli::currencies::display_currencies(&registry, bid_ask_only));
            Ok(())
        }
    }
}
