//! In-process stand-in for the remote API.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::api::{ApiError, BrokerApi};
use crate::auth::Credentials;
use crate::models::{
    FullQuote, Holding, LtpQuote, MarketStatus, Ohlc, Position, Profile, TokenResponse,
};

#[derive(Clone, Default)]
pub(crate) struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub(crate) fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Answers every call from canned data, or fails every call
pub(crate) struct FakeBroker {
    calls: CallCounter,
    token: String,
    reject: Option<fn() -> ApiError>,
    pub(crate) holdings: Vec<Holding>,
    pub(crate) positions: Vec<Position>,
    pub(crate) quotes: HashMap<String, FullQuote>,
}

impl FakeBroker {
    pub(crate) fn accepting(token: &str) -> Self {
        let mut quotes = HashMap::new();
        quotes.insert(
            "NSE_EQ:INFY".to_string(),
            FullQuote {
                symbol: "INFY".to_string(),
                instrument_token: "NSE_EQ|INE009A01021".to_string(),
                last_price: 1512.4,
                volume: 4821093,
                ohlc: Ohlc {
                    open: 1500.0,
                    high: 1530.0,
                    low: 1490.0,
                    close: 1515.0,
                },
                last_trade_time: Some("1704880799000".to_string()),
                ..FullQuote::default()
            },
        );

        Self {
            calls: CallCounter::default(),
            token: token.to_string(),
            reject: None,
            holdings: Vec::new(),
            positions: Vec::new(),
            quotes,
        }
    }

    pub(crate) fn rejecting(error: fn() -> ApiError) -> Self {
        Self {
            reject: Some(error),
            ..Self::accepting("")
        }
    }

    pub(crate) fn calls(&self) -> CallCounter {
        self.calls.clone()
    }

    fn enter(&self) -> Result<(), ApiError> {
        self.calls.bump();
        match self.reject {
            Some(make) => Err(make()),
            None => Ok(()),
        }
    }

    fn profile_data() -> Profile {
        Profile {
            user_name: "Asha Trader".to_string(),
            email: "trader@example.com".to_string(),
            user_id: "AB1234".to_string(),
            broker: "UPSTOX".to_string(),
            exchanges: vec!["NSE".to_string(), "BSE".to_string()],
            products: vec!["D".to_string(), "I".to_string()],
            order_types: vec!["MARKET".to_string(), "LIMIT".to_string()],
            user_type: "individual".to_string(),
            poa: false,
            is_active: true,
        }
    }
}

#[async_trait]
impl BrokerApi for FakeBroker {
    async fn exchange_code(
        &self,
        _credentials: &Credentials,
        _code: &str,
    ) -> Result<TokenResponse, ApiError> {
        self.enter()?;
        let profile = Self::profile_data();
        Ok(TokenResponse {
            access_token: self.token.clone(),
            user_id: profile.user_id,
            user_name: profile.user_name,
            email: profile.email,
            broker: profile.broker,
            exchanges: profile.exchanges,
            ..TokenResponse::default()
        })
    }

    async fn profile(&self, _token: &str) -> Result<Profile, ApiError> {
        self.enter()?;
        Ok(Self::profile_data())
    }

    async fn market_status(&self, _token: &str, exchange: &str) -> Result<MarketStatus, ApiError> {
        self.enter()?;
        Ok(MarketStatus {
            exchange: exchange.to_string(),
            status: "NORMAL_OPEN".to_string(),
            last_updated: None,
        })
    }

    async fn holdings(&self, _token: &str) -> Result<Vec<Holding>, ApiError> {
        self.enter()?;
        Ok(self.holdings.clone())
    }

    async fn positions(&self, _token: &str) -> Result<Vec<Position>, ApiError> {
        self.enter()?;
        Ok(self.positions.clone())
    }

    async fn ltp(
        &self,
        _token: &str,
        instrument_key: &str,
    ) -> Result<HashMap<String, LtpQuote>, ApiError> {
        self.enter()?;
        Ok(self
            .quotes
            .iter()
            .filter(|(_, q)| q.instrument_token == instrument_key)
            .map(|(k, q)| {
                (
                    k.clone(),
                    LtpQuote {
                        last_price: q.last_price,
                        instrument_token: q.instrument_token.clone(),
                    },
                )
            })
            .collect())
    }

    async fn full_quote(
        &self,
        _token: &str,
        instrument_key: &str,
    ) -> Result<HashMap<String, FullQuote>, ApiError> {
        self.enter()?;
        Ok(self
            .quotes
            .iter()
            .filter(|(_, q)| q.instrument_token == instrument_key)
            .map(|(k, q)| (k.clone(), q.clone()))
            .collect())
    }
}
