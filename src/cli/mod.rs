pub mod currencies;
pub mod rates;
pub mod setup;
pub mod ui;
