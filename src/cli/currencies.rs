use super::ui;
use crate::core::currency::CurrencyRegistry;
use comfy_table::Cell;

/// Lists registry entries, optionally only those quoted with bid/ask.
pub fn display_currencies(registry: &CurrencyRegistry, bid_ask_only: bool) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Name"),
        ui::header_cell("Tables"),
    ]);

    for currency in registry
        .iter()
        .filter(|c| !bid_ask_only || c.has_bid_ask())
    {
        let tables = currency
            .tables
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(&currency.code),
            Cell::new(&currency.name),
            Cell::new(tables),
        ]);
    }

    table.to_string()
}
