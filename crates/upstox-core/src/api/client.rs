//! API client for communicating with the Upstox v2 REST API.
//!
//! This module provides the `ApiClient` struct for the OAuth token
//! exchange and the authenticated account/market data endpoints, and the
//! `BrokerApi` trait that the token manager is written against.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth::Credentials;
use crate::models::{
    ApiResponse, FullQuote, Holding, LtpQuote, MarketStatus, Position, Profile, TokenResponse,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Base URL for all Upstox API endpoints
pub const API_BASE_URL: &str = "https://api.upstox.com";

/// Value of the `Api-Version` header expected by the v2 endpoints
const API_VERSION: &str = "2.0";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

const TOKEN_PATH: &str = "/v2/login/authorization/token";
const PROFILE_PATH: &str = "/v2/user/profile";
const MARKET_STATUS_PATH: &str = "/v2/market/status";
const HOLDINGS_PATH: &str = "/v2/portfolio/long-term-holdings";
const POSITIONS_PATH: &str = "/v2/portfolio/short-term-positions";
const LTP_PATH: &str = "/v2/market-quote/ltp";
const FULL_QUOTE_PATH: &str = "/v2/market-quote/quotes";

/// Remote operations the token manager relies on.
///
/// Every authenticated call takes the bearer token explicitly; the
/// implementation holds no session state of its own.
#[async_trait]
pub trait BrokerApi: Send + Sync {
    /// Exchange a single-use authorization code for an access token
    async fn exchange_code(
        &self,
        credentials: &Credentials,
        code: &str,
    ) -> Result<TokenResponse, ApiError>;

    async fn profile(&self, token: &str) -> Result<Profile, ApiError>;

    async fn market_status(&self, token: &str, exchange: &str) -> Result<MarketStatus, ApiError>;

    async fn holdings(&self, token: &str) -> Result<Vec<Holding>, ApiError>;

    async fn positions(&self, token: &str) -> Result<Vec<Position>, ApiError>;

    async fn ltp(
        &self,
        token: &str,
        instrument_key: &str,
    ) -> Result<HashMap<String, LtpQuote>, ApiError>;

    async fn full_quote(
        &self,
        token: &str,
        instrument_key: &str,
    ) -> Result<HashMap<String, FullQuote>, ApiError>;
}

/// API client for Upstox.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client pointed at the production API
    pub fn new() -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different host, sharing the connection pool
    pub fn with_base_url(&self, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: self.client.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn parse_body<T: DeserializeOwned>(
        response: reqwest::Response,
        what: &str,
    ) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse {}: {}", what, e)))
    }

    /// Authenticated GET of an endpoint wrapped in the `{"status", "data"}` envelope
    async fn get<T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "GET");

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .header("Api-Version", API_VERSION)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let envelope: ApiResponse<T> = Self::parse_body(response, path).await?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl BrokerApi for ApiClient {
    async fn exchange_code(
        &self,
        credentials: &Credentials,
        code: &str,
    ) -> Result<TokenResponse, ApiError> {
        let url = self.url(TOKEN_PATH);
        debug!(url = %url, "Exchanging authorization code");

        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .header("Api-Version", API_VERSION)
            .form(&[
                ("code", code),
                ("client_id", credentials.api_key()),
                ("client_secret", credentials.api_secret()),
                ("redirect_uri", credentials.redirect_uri()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Self::parse_body(response, "token response").await
    }

    async fn profile(&self, token: &str) -> Result<Profile, ApiError> {
        self.get(token, PROFILE_PATH, &[]).await
    }

    async fn market_status(&self, token: &str, exchange: &str) -> Result<MarketStatus, ApiError> {
        let path = format!("{}/{}", MARKET_STATUS_PATH, exchange);
        self.get(token, &path, &[]).await
    }

    async fn holdings(&self, token: &str) -> Result<Vec<Holding>, ApiError> {
        self.get(token, HOLDINGS_PATH, &[]).await
    }

    async fn positions(&self, token: &str) -> Result<Vec<Position>, ApiError> {
        self.get(token, POSITIONS_PATH, &[]).await
    }

    async fn ltp(
        &self,
        token: &str,
        instrument_key: &str,
    ) -> Result<HashMap<String, LtpQuote>, ApiError> {
        self.get(token, LTP_PATH, &[("instrument_key", instrument_key)])
            .await
    }

    async fn full_quote(
        &self,
        token: &str,
        instrument_key: &str,
    ) -> Result<HashMap<String, FullQuote>, ApiError> {
        self.get(token, FULL_QUOTE_PATH, &[("instrument_key", instrument_key)])
            .await
    }
}
