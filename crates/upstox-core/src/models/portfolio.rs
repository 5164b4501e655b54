use serde::{Deserialize, Serialize};

/// Long-term holding from `/v2/portfolio/long-term-holdings`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Holding {
    pub company_name: String,
    pub trading_symbol: String,
    pub exchange: String,
    pub isin: String,
    pub instrument_token: String,
    pub product: String,
    pub quantity: i64,
    pub average_price: f64,
    pub last_price: f64,
    pub close_price: f64,
    pub pnl: f64,
    pub day_change: f64,
    pub day_change_percentage: f64,
}

impl Holding {
    pub fn investment_value(&self) -> f64 {
        self.average_price * self.quantity as f64
    }

    pub fn current_value(&self) -> f64 {
        self.last_price * self.quantity as f64
    }
}

/// Intraday/short-term position from `/v2/portfolio/short-term-positions`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    pub trading_symbol: String,
    pub exchange: String,
    pub instrument_token: String,
    pub product: String,
    pub quantity: i64,
    pub buy_price: Option<f64>,
    pub sell_price: Option<f64>,
    pub last_price: f64,
    pub value: f64,
    pub pnl: f64,
    pub unrealised: f64,
    pub realised: f64,
}

impl Position {
    pub fn is_closed(&self) -> bool {
        self.quantity == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ApiResponse;

    #[test]
    fn test_parse_holdings() {
        let json = r#"{"status":"success","data":[{"isin":"INE009A01021","cnc_used_quantity":0,"collateral_type":"WC","company_name":"INFOSYS LIMITED","haircut":0.2,"product":"D","quantity":10,"trading_symbol":"INFY","last_price":1500.5,"close_price":1490.0,"pnl":505.0,"day_change":10.5,"day_change_percentage":0.7,"instrument_token":"NSE_EQ|INE009A01021","average_price":1450.0,"exchange":"NSE"}]}"#;
        let resp: ApiResponse<Vec<Holding>> = serde_json::from_str(json).expect("holdings");
        let h = &resp.data[0];
        assert_eq!(h.trading_symbol, "INFY");
        assert_eq!(h.investment_value(), 14500.0);
        assert_eq!(h.current_value(), 15005.0);
    }

    #[test]
    fn test_parse_position_without_prices() {
        let json = r#"{"trading_symbol":"NIFTY24JANFUT","exchange":"NFO","quantity":0,"last_price":21500.0,"pnl":-120.0,"realised":-120.0,"unrealised":0.0,"buy_price":null,"product":"I"}"#;
        let p: Position = serde_json::from_str(json).expect("position");
        assert!(p.is_closed());
        assert_eq!(p.buy_price, None);
        assert_eq!(p.sell_price, None);
    }
}
