use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, CommandFactory, Parser, Subcommand};
use nbpx::core::log::init_logging;
use nbpx::{AppCommand, Precision, RateKind, RateQuery, RequestShape};
use rust_decimal::Decimal;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show exchange rates for a currency
    Rate(RateArgs),
    /// List currencies published by NBP
    Currencies {
        /// Only currencies quoted with bid/ask
        #[arg(long)]
        bid_ask: bool,
    },
}

#[derive(Args)]
struct RateArgs {
    /// Currency code, e.g. EUR
    code: String,

    /// Rate effective on this date (YYYY-MM-DD)
    #[arg(long, conflicts_with_all = ["today", "from", "last"])]
    date: Option<NaiveDate>,

    /// Rate published today
    #[arg(long, conflicts_with_all = ["from", "last"])]
    today: bool,

    /// Start of a date range (YYYY-MM-DD), requires --to
    #[arg(long, requires = "to", conflicts_with = "last")]
    from: Option<NaiveDate>,

    /// End of a date range (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,

    /// Last N publications
    #[arg(long)]
    last: Option<u16>,

    /// Show bid/ask quotes instead of the mid rate
    #[arg(short, long)]
    bid_ask: bool,

    /// Convert this amount of PLN
    #[arg(short, long)]
    amount: Option<Decimal>,

    /// Parse rates as floating point numbers
    #[arg(long)]
    float: bool,

    /// Print nothing instead of failing when the lookup errors
    #[arg(long)]
    suppress_errors: bool,
}

impl From<RateArgs> for RateQuery {
    fn from(args: RateArgs) -> RateQuery {
        let shape = match (args.date, args.today, args.from, args.to, args.last) {
            (Some(date), ..) => RequestShape::OnDate(date),
            (_, true, ..) => RequestShape::Today,
            (_, _, Some(start), Some(end), _) => RequestShape::Range(start, end),
            (.., Some(n)) => RequestShape::Last(n),
            _ => RequestShape::Current,
        };

        RateQuery {
            currency_code: args.code,
            shape,
            kind: RateKind::from(args.bid_ask),
            amount: args.amount,
            precision: args.float.then_some(Precision::Approximate),
            suppress_errors: args.suppress_errors,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => nbpx::cli::setup::setup(),
        Some(Commands::Rate(args)) => {
            nbpx::run_command(AppCommand::Rate(args.into()), cli.config_path.as_deref()).await
        }
        Some(Commands::Currencies { bid_ask }) => {
            nbpx::run_command(
                AppCommand::Currencies {
                    bid_ask_only: bid_ask,
                },
                cli.config_path.as_deref(),
            )
            .await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate_query(args: &[&str]) -> RateQuery {
        let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
        match cli.command {
            Some(Commands::Rate(args)) => args.into(),
            _ => panic!("Expected rate command"),
        }
    }

    #[test]
    fn test_rate_options() {
        let query = rate_query(&["nbpx", "rate", "EUR", "--float", "--suppress-errors"]);
        assert_eq!(query.precision, Some(Precision::Approximate));
        assert!(query.suppress_errors);
        assert!(matches!(query.shape, RequestShape::Current));

        let query = rate_query(&["nbpx", "-v", "rate", "usd", "--last", "3", "-b"]);
        assert!(query.precision.is_none());
        assert!(matches!(query.shape, RequestShape::Last(3)));
        assert!(matches!(query.kind, RateKind::BidAsk));
    }

    #[test]
    fn test_rate_only_options_are_not_global() {
        assert!(Cli::try_parse_from(["nbpx", "--float", "currencies"]).is_err());
        assert!(Cli::try_parse_from(["nbpx", "currencies", "--suppress-errors"]).is_err());
        assert!(Cli::try_parse_from(["nbpx", "currencies", "--config-path", "x.yaml"]).is_ok());
    }
}
