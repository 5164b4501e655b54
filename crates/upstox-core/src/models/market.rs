use serde::{Deserialize, Serialize};

/// Exchange status from `/v2/market/status/{exchange}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketStatus {
    pub exchange: String,
    pub status: String,
    pub last_updated: Option<i64>,
}

/// Entry of `/v2/market-quote/ltp`, keyed by `EXCHANGE:SYMBOL`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LtpQuote {
    pub last_price: f64,
    pub instrument_token: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Ohlc {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Entry of `/v2/market-quote/quotes`, keyed by `EXCHANGE:SYMBOL`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FullQuote {
    pub symbol: String,
    pub instrument_token: String,
    pub last_price: f64,
    pub volume: i64,
    pub average_price: f64,
    pub net_change: f64,
    pub ohlc: Ohlc,
    pub timestamp: Option<String>,
    pub last_trade_time: Option<String>,
}

impl FullQuote {
    /// Change between open and previous close as reported in `ohlc`
    pub fn day_change(&self) -> f64 {
        if self.ohlc.open != 0.0 && self.ohlc.close != 0.0 {
            self.ohlc.close - self.ohlc.open
        } else {
            0.0
        }
    }

    pub fn day_change_percentage(&self) -> f64 {
        if self.ohlc.open != 0.0 {
            self.day_change() / self.ohlc.open * 100.0
        } else {
            0.0
        }
    }
}
