//! Text-returning operations exposed to a calling agent.
//!
//! Every operation returns a `String`. Failures are rendered as text too,
//! so the caller always gets something it can show.

pub mod render;

use crate::api::{ApiClient, BrokerApi};
use crate::auth::TokenManager;
use crate::error::Error;
use crate::stocks::StockDirectory;

/// Default number of results for `search_stocks`
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Render an error for the agent. Remote failures show their status and reason.
pub fn format_error(err: &Error, context: &str) -> String {
    match err.api_error() {
        Some(api) => match api.status() {
            Some(status) => format!(
                "❌ API Error during {}: {} - {}",
                context,
                status,
                api.reason()
            ),
            None => format!("❌ Error during {}: {}", context, api),
        },
        None => format!("❌ Error during {}: {}", context, err),
    }
}

pub struct UpstoxTools<A = ApiClient> {
    manager: TokenManager<A>,
    stocks: Option<StockDirectory>,
}

impl<A: BrokerApi> UpstoxTools<A> {
    pub fn new(manager: TokenManager<A>, stocks: Option<StockDirectory>) -> Self {
        Self { manager, stocks }
    }

    pub fn manager(&self) -> &TokenManager<A> {
        &self.manager
    }

    pub async fn get_user_profile(&self) -> String {
        match self.manager.fetch_profile().await {
            Ok(profile) => render::profile(&profile),
            Err(e) => format_error(&e, "fetching user profile"),
        }
    }

    pub async fn get_holdings(&self) -> String {
        match self.manager.fetch_holdings().await {
            Ok(holdings) => render::holdings(&holdings),
            Err(e) => format_error(&e, "fetching holdings"),
        }
    }

    pub async fn get_positions(&self) -> String {
        match self.manager.fetch_positions().await {
            Ok(positions) => render::positions(&positions),
            Err(e) => format_error(&e, "fetching positions"),
        }
    }

    pub async fn get_stock_price(&self, instrument_key: &str) -> String {
        match self.manager.fetch_ltp(instrument_key).await {
            Ok(quotes) => render::stock_price(instrument_key, &quotes),
            Err(e) => format_error(&e, "fetching stock price"),
        }
    }

    pub async fn get_full_market_quote(&self, instrument_key: &str) -> String {
        match self.manager.fetch_full_quote(instrument_key).await {
            Ok(quotes) => render::full_quote(instrument_key, &quotes),
            Err(e) => format_error(&e, "fetching full market quote"),
        }
    }

    pub async fn get_market_status(&self) -> String {
        match self.manager.fetch_market_status().await {
            Ok(statuses) => render::market_status(&statuses),
            Err(e) => format_error(&e, "fetching market status"),
        }
    }

    pub async fn check_connection(&self) -> String {
        render::connection(&self.manager.check_connection().await)
    }

    pub fn get_instrument_key(&self, symbol: &str) -> String {
        match &self.stocks {
            Some(stocks) => render::instrument_matches(symbol, &stocks.find_symbol(symbol)),
            None => "❌ Error: Stock data not available".to_string(),
        }
    }

    pub fn search_stocks(&self, term: &str, limit: usize) -> String {
        match &self.stocks {
            Some(stocks) => render::search_results(term, &stocks.search(term, limit)),
            None => "❌ Error: Stock data not available".to_string(),
        }
    }
}
