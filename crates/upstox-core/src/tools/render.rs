//! Plain-text rendering of API data for the tool surface.

use std::collections::HashMap;

use crate::auth::ConnectionStatus;
use crate::models::{FullQuote, Holding, LtpQuote, Position, Profile};
use crate::stocks::StockMatch;
use crate::utils::{format_currency, format_epoch_millis, format_percentage, format_quantity};

pub fn profile(profile: &Profile) -> String {
    format!(
        "👤 User Profile:\n\
         Name: {}\n\
         Email: {}\n\
         User ID: {}\n\
         Broker: {}\n\
         Exchanges: {}\n\
         Products: {}\n\
         Order Types: {}\n\
         User Type: {}\n\
         POA Status: {}\n\
         Active: {}",
        profile.user_name,
        profile.email,
        profile.user_id,
        profile.broker,
        profile.exchanges.join(", "),
        profile.products.join(", "),
        profile.order_types.join(", "),
        profile.user_type,
        profile.poa,
        profile.is_active
    )
}

pub fn holdings(holdings: &[Holding]) -> String {
    if holdings.is_empty() {
        return "📊 No holdings found in your portfolio.".to_string();
    }

    let mut out = format!("📊 Portfolio Holdings ({} stocks):\n\n", holdings.len());
    let mut total_investment = 0.0;
    let mut total_current = 0.0;

    for h in holdings {
        let investment = h.investment_value();
        let current = h.current_value();
        total_investment += investment;
        total_current += current;

        out.push_str(&format!(
            "🏢 {} ({})\n   Quantity: {}\n   Avg Price: {}\n   Last Price: {}\n   Investment: {}\n   Current Value: {}\n   P&L: {}\n   Day Change: {}\n   Exchange: {}\n\n",
            h.company_name,
            h.trading_symbol,
            h.quantity,
            format_currency(h.average_price),
            format_currency(h.last_price),
            format_currency(investment),
            format_currency(current),
            format_currency(h.pnl),
            format_percentage(h.day_change_percentage),
            h.exchange,
        ));
    }

    let total_pnl = total_current - total_investment;
    let pnl_pct = if total_investment > 0.0 {
        total_pnl / total_investment * 100.0
    } else {
        0.0
    };

    out.push_str(&format!(
        "💰 Portfolio Summary:\nTotal Investment: {}\nCurrent Value: {}\nTotal P&L: {} ({})",
        format_currency(total_investment),
        format_currency(total_current),
        format_currency(total_pnl),
        format_percentage(pnl_pct),
    ));
    out
}

pub fn positions(positions: &[Position]) -> String {
    if positions.is_empty() {
        return "📈 No open positions found.".to_string();
    }

    let mut out = format!("📈 Trading Positions ({} positions):\n\n", positions.len());
    let (mut total_pnl, mut total_unrealised, mut total_realised) = (0.0, 0.0, 0.0);

    for p in positions {
        total_pnl += p.pnl;
        total_unrealised += p.unrealised;
        total_realised += p.realised;

        let state = if p.is_closed() { "✅ CLOSED" } else { "🔄 OPEN" };
        out.push_str(&format!(
            "📊 {} ({}) {}\n   Quantity: {}\n   Buy Price: {}\n   Sell Price: {}\n   Last Price: {}\n   Value: {}\n   P&L: {}\n   Unrealised: {}\n   Realised: {}\n   Product: {}\n\n",
            p.trading_symbol,
            p.exchange,
            state,
            p.quantity,
            format_currency(p.buy_price.unwrap_or(0.0)),
            format_currency(p.sell_price.unwrap_or(0.0)),
            format_currency(p.last_price),
            format_currency(p.value),
            format_currency(p.pnl),
            format_currency(p.unrealised),
            format_currency(p.realised),
            p.product,
        ));
    }

    out.push_str(&format!(
        "💹 Positions Summary:\nTotal P&L: {}\nTotal Unrealised: {}\nTotal Realised: {}",
        format_currency(total_pnl),
        format_currency(total_unrealised),
        format_currency(total_realised),
    ));
    out
}

/// First quote in the response, or a "no data" line
pub fn stock_price(instrument_key: &str, quotes: &HashMap<String, LtpQuote>) -> String {
    match quotes.values().next() {
        Some(quote) => format!(
            "📈 Current Stock Price:\n\nInstrument Key: {}\nLast Price: {}\nStatus: Active ✅",
            instrument_key,
            format_currency(quote.last_price)
        ),
        None => format!(
            "❌ No price data available for instrument key: {}",
            instrument_key
        ),
    }
}

pub fn full_quote(instrument_key: &str, quotes: &HashMap<String, FullQuote>) -> String {
    let Some(quote) = quotes.values().next() else {
        return format!(
            "❌ No market data available for instrument key: {}",
            instrument_key
        );
    };

    let last_trade = quote
        .last_trade_time
        .as_deref()
        .map(format_epoch_millis)
        .unwrap_or_else(|| "N/A".to_string());

    format!(
        "📊 Full Market Quote:\n\n\
         Instrument Key: {}\n\n\
         💰 Price Information:\n   \
         Last Price: {}\n   \
         Open: {}\n   \
         High: {}\n   \
         Low: {}\n   \
         Close (Prev): {}\n\n\
         📈 Day Performance:\n   \
         Change: {} ({})\n\n\
         📊 Volume Information:\n   \
         Volume: {}\n\n\
         ⏰ Last Update: {}\n\n\
         Status: Active ✅",
        instrument_key,
        format_currency(quote.last_price),
        format_currency(quote.ohlc.open),
        format_currency(quote.ohlc.high),
        format_currency(quote.ohlc.low),
        format_currency(quote.ohlc.close),
        format_currency(quote.day_change()),
        format_percentage(quote.day_change_percentage()),
        format_quantity(quote.volume),
        last_trade,
    )
}

pub fn market_status(statuses: &[(String, String)]) -> String {
    if statuses.is_empty() {
        return "📊 No market status available.".to_string();
    }
    let mut out = String::from("📊 Market Status:");
    for (exchange, status) in statuses {
        out.push_str(&format!("\n  {}: {}", exchange, status));
    }
    out
}

pub fn connection(status: &ConnectionStatus) -> String {
    match status {
        ConnectionStatus::Connected {
            user_name,
            broker,
            exchanges,
        } => format!(
            "✅ Connected as: {}\nBroker: {}\nExchanges: {}",
            user_name,
            broker,
            exchanges.join(", ")
        ),
        ConnectionStatus::Disconnected { error } => format!("❌ Connection failed: {}", error),
    }
}

pub fn instrument_matches(symbol: &str, matches: &[StockMatch]) -> String {
    match matches {
        [] => format!("❌ Stock symbol '{}' not found in the database", symbol),
        [stock] => format!(
            "🔑 Instrument Key Found:\n\nSymbol: {}\nName: {}\nInstrument Key: {}\nCategory: {}",
            stock.symbol, stock.name, stock.instrument_key, stock.category
        ),
        _ => {
            let mut out = format!("🔑 Found {} matches for '{}':\n\n", matches.len(), symbol);
            for (idx, stock) in matches.iter().enumerate() {
                out.push_str(&format!(
                    "{}. Symbol: {}\n   Name: {}\n   Instrument Key: {}\n   Category: {}\n\n",
                    idx + 1,
                    stock.symbol,
                    stock.name,
                    stock.instrument_key,
                    stock.category
                ));
            }
            out
        }
    }
}

pub fn search_results(term: &str, matches: &[StockMatch]) -> String {
    if matches.is_empty() {
        return format!("❌ No stocks found matching '{}'", term);
    }
    let mut out = format!(
        "🔍 Search Results for '{}' ({} matches):\n\n",
        term,
        matches.len()
    );
    for (idx, stock) in matches.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} - {}\n   Instrument Key: {}\n   Category: {}\n\n",
            idx + 1,
            stock.symbol,
            stock.name,
            stock.instrument_key,
            stock.category
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holding(symbol: &str, qty: i64, avg: f64, last: f64) -> Holding {
        Holding {
            company_name: format!("{} LIMITED", symbol),
            trading_symbol: symbol.to_string(),
            exchange: "NSE".to_string(),
            quantity: qty,
            average_price: avg,
            last_price: last,
            pnl: (last - avg) * qty as f64,
            ..Holding::default()
        }
    }

    #[test]
    fn test_empty_portfolio_messages() {
        assert_eq!(holdings(&[]), "📊 No holdings found in your portfolio.");
        assert_eq!(positions(&[]), "📈 No open positions found.");
    }

    #[test]
    fn test_holdings_summary() {
        let text = holdings(&[holding("INFY", 10, 1000.0, 1100.0), holding("TCS", 5, 2000.0, 1900.0)]);
        assert!(text.starts_with("📊 Portfolio Holdings (2 stocks):"));
        assert!(text.contains("🏢 INFY LIMITED (INFY)"));
        assert!(text.contains("Total Investment: ₹20,000.00"));
        assert!(text.contains("Current Value: ₹20,500.00"));
        assert!(text.contains("Total P&L: ₹500.00 (+2.50%)"));
    }

    #[test]
    fn test_positions_mark_open_and_closed() {
        let open = Position {
            trading_symbol: "INFY".to_string(),
            exchange: "NSE".to_string(),
            quantity: 5,
            pnl: 50.0,
            unrealised: 50.0,
            ..Position::default()
        };
        let closed = Position {
            trading_symbol: "TCS".to_string(),
            exchange: "NSE".to_string(),
            quantity: 0,
            pnl: -20.0,
            realised: -20.0,
            ..Position::default()
        };
        let text = positions(&[open, closed]);
        assert!(text.contains("📊 INFY (NSE) 🔄 OPEN"));
        assert!(text.contains("📊 TCS (NSE) ✅ CLOSED"));
        assert!(text.contains("Buy Price: ₹0.00"));
        assert!(text.contains("Total P&L: ₹30.00"));
        assert!(text.contains("Total Realised: -₹20.00"));
    }

    #[test]
    fn test_stock_price_without_data() {
        assert_eq!(
            stock_price("NSE_EQ|X", &HashMap::new()),
            "❌ No price data available for instrument key: NSE_EQ|X"
        );
    }

    #[test]
    fn test_instrument_match_layouts() {
        let infy = StockMatch {
            symbol: "INFY".to_string(),
            name: "Infosys".to_string(),
            instrument_key: "NSE_EQ|INE009A01021".to_string(),
            category: "large_cap".to_string(),
        };
        assert_eq!(
            instrument_matches("WIPRO", &[]),
            "❌ Stock symbol 'WIPRO' not found in the database"
        );
        assert!(instrument_matches("infy", &[infy.clone()]).starts_with("🔑 Instrument Key Found:"));

        let many = instrument_matches("infy", &[infy.clone(), infy]);
        assert!(many.starts_with("🔑 Found 2 matches for 'infy':"));
        assert!(many.contains("2. Symbol: INFY"));
    }

    #[test]
    fn test_market_status_in_given_order() {
        let statuses = vec![
            ("NSE".to_string(), "NORMAL_OPEN".to_string()),
            ("BSE".to_string(), "CLOSED".to_string()),
        ];
        assert_eq!(
            market_status(&statuses),
            "📊 Market Status:\n  NSE: NORMAL_OPEN\n  BSE: CLOSED"
        );
        assert_eq!(market_status(&[]), "📊 No market status available.");
    }

    #[test]
    fn test_connection_text() {
        let down = ConnectionStatus::Disconnected {
            error: "Not authenticated".to_string(),
        };
        assert_eq!(connection(&down), "❌ Connection failed: Not authenticated");
    }
}
