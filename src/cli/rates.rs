use super::ui;
use crate::client::{Client, RateKind, RequestShape};
use crate::core::rate::{ExchangeRate, RateValue};
use anyhow::Result;
use comfy_table::Cell;
use rust_decimal::Decimal;

/// Renders rates, and their conversion of `amount` PLN if given.
pub fn display_rates(rates: &[ExchangeRate], amount: Option<Decimal>) -> String {
    let Some(first) = rates.first() else {
        return ui::style_text("No rates published", ui::StyleType::Subtle);
    };

    let bid_ask = rates.iter().any(ExchangeRate::has_bid_ask);
    let mut table = ui::new_styled_table();

    let mut header = vec![ui::header_cell("Date"), ui::header_cell("Table No.")];
    if bid_ask {
        header.push(ui::header_cell("Bid"));
        header.push(ui::header_cell("Ask"));
    } else {
        header.push(ui::header_cell("Mid"));
    }
    if let Some(amount) = amount {
        header.push(ui::header_cell(&format!("{amount} PLN")));
    }
    table.set_header(header);

    for rate in rates {
        let mut row = vec![
            Cell::new(rate.date().format("%Y-%m-%d").to_string()),
            Cell::new(rate.source_id()),
        ];
        if bid_ask {
            row.push(ui::format_optional_cell(rate.bid(), |v| v.to_string()));
            row.push(ui::format_optional_cell(rate.ask(), |v| v.to_string()));
        } else {
            row.push(ui::number_cell(rate.mid().to_string()));
        }
        if let Some(amount) = amount {
            let text = match rate.scale(amount) {
                Some(scaled) => match (scaled.bid(), scaled.ask()) {
                    (Some(bid), Some(ask)) => format!("{} / {}", round(bid), round(ask)),
                    _ => round(scaled.mid_value()),
                },
                None => "overflow".to_string(),
            };
            row.push(ui::number_cell(text));
        }
        table.add_row(row);
    }

    format!(
        "{} ({})\n\n{}",
        ui::style_text(first.currency_code(), ui::StyleType::Title),
        first.currency_name(),
        table
    )
}

fn round(value: RateValue) -> String {
    match value {
        RateValue::Exact(d) => d.round_dp(4).normalize().to_string(),
        RateValue::Approximate(f) => format!("{f:.4}"),
    }
}

/// Fetches and prints rates for one currency.
pub async fn show_rates(
    client: &Client,
    shape: RequestShape,
    kind: RateKind,
    amount: Option<Decimal>,
) -> Result<()> {
    match client.rates(shape, kind).await? {
        Some(rates) => println!("{}", display_rates(&rates.into_vec(), amount)),
        None => println!(
            "{}",
            ui::style_text(
                &format!("No rates available for {}", client.currency_code()),
                ui::StyleType::Error
            )
        ),
    }
    Ok(())
}
