//! Backend Config

use clap::Args;
use rusty_money::iso::Currency;

use crate::pricing::currency_from_code;

/// Lesson backend settings.
#[derive(Debug, Args)]
pub struct BackendConfig {
    /// Lesson backend base URL
    #[arg(long, env = "SEATCART_API_URL", default_value = "http://localhost:3000")]
    pub api_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "SEATCART_REQUEST_TIMEOUT_SECONDS", default_value_t = 10_u64)]
    pub request_timeout_seconds: u64,

    /// Delay before a typed search is sent, in milliseconds
    #[arg(long, env = "SEATCART_SEARCH_DEBOUNCE_MS", default_value_t = 300_u64)]
    pub search_debounce_ms: u64,

    /// Currency lesson prices are quoted in (GBP, USD, EUR)
    #[arg(
        long,
        env = "SEATCART_CURRENCY",
        default_value = "GBP",
        value_parser = parse_currency
    )]
    pub currency: &'static Currency,
}

fn parse_currency(code: &str) -> Result<&'static Currency, String> {
    currency_from_code(code).ok_or_else(|| format!("unsupported currency: {code}"))
}
