//! OAuth token lifecycle: authorization URL, code exchange, persistence
//! and the authenticated reads gated on the session.

use std::collections::HashMap;
use std::path::Path;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError, BrokerApi};
use crate::error::{Error, Result};
use crate::models::{FullQuote, Holding, LtpQuote, Position, Profile, UserIdentity};

use super::session::{Session, TokenRecord, TOKEN_VALIDITY};
use super::Credentials;

/// Login dialog the user opens in a browser
pub const AUTHORIZATION_DIALOG_URL: &str = "https://api.upstox.com/v2/login/authorization/dialog";

/// Anti-CSRF state used when the caller has no preference
pub const DEFAULT_STATE: &str = "upstox_auth";

/// Exchanges queried for market status unless configured otherwise
pub const DEFAULT_MARKET_EXCHANGES: &[&str] = &["NSE", "BSE"];

/// Result of a successful code exchange
#[derive(Debug, Clone)]
pub struct ExchangeOutcome {
    pub session: Session,
    pub user: UserIdentity,
}

/// Outcome of a connection probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConnectionStatus {
    Connected {
        user_name: String,
        broker: String,
        exchanges: Vec<String>,
    },
    Disconnected {
        error: String,
    },
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected { .. })
    }
}

/// Pull the authorization code out of a pasted callback URL or query string.
///
/// Takes everything after the first `code=` up to the next `&`. Input
/// without `code=` is returned trimmed. No percent-decoding is applied.
pub fn extract_authorization_code(raw: &str) -> String {
    let raw = raw.trim();
    match raw.split_once("code=") {
        Some((_, rest)) => rest.split('&').next().unwrap_or_default().to_string(),
        None => raw.to_string(),
    }
}

/// Owns the session and is the only thing that changes it.
pub struct TokenManager<A = ApiClient> {
    credentials: Credentials,
    api: A,
    session: Session,
    market_exchanges: Vec<String>,
}

impl<A: BrokerApi> TokenManager<A> {
    pub fn new(credentials: Credentials, api: A) -> Self {
        Self {
            credentials,
            api,
            session: Session::default(),
            market_exchanges: DEFAULT_MARKET_EXCHANGES
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }

    /// Replace the exchanges used by `fetch_market_status`
    pub fn with_market_exchanges(mut self, exchanges: Vec<String>) -> Self {
        if !exchanges.is_empty() {
            self.market_exchanges = exchanges;
        }
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn market_exchanges(&self) -> &[String] {
        &self.market_exchanges
    }

    /// Browser URL that starts the OAuth flow. Values are inserted verbatim.
    pub fn authorization_url(&self, state: &str) -> String {
        format!(
            "{}?response_type=code&client_id={}&redirect_uri={}&state={}",
            AUTHORIZATION_DIALOG_URL,
            self.credentials.api_key(),
            self.credentials.redirect_uri(),
            state
        )
    }

    /// Trade an authorization code for an access token.
    ///
    /// Codes are single-use, so a rejection is returned as-is and never
    /// retried. The session is only replaced on success.
    pub async fn exchange_code(&mut self, code: &str) -> Result<ExchangeOutcome> {
        if code.is_empty() {
            return Err(Error::AuthExchange(ApiError::InvalidAuthCode {
                status: None,
                message: "authorization code is empty".to_string(),
            }));
        }

        let response = self
            .api
            .exchange_code(&self.credentials, code)
            .await
            .map_err(Error::AuthExchange)?;

        if response.access_token.is_empty() {
            return Err(Error::AuthExchange(ApiError::InvalidResponse(
                "token response did not include an access token".to_string(),
            )));
        }

        let user = response.identity();
        self.session = Session::new(response.access_token, Some(TOKEN_VALIDITY.to_string()));
        info!(user_id = %user.user_id, "Authorization code exchanged");

        Ok(ExchangeOutcome {
            session: self.session.clone(),
            user,
        })
    }

    /// Save the session to `path`, overwriting any previous file.
    ///
    /// Returns false instead of failing; the in-memory session stays valid.
    pub fn persist(&self, path: &Path) -> bool {
        let Some(record) = TokenRecord::from_session(&self.session, Utc::now()) else {
            debug!("No access token to persist");
            return false;
        };

        match record.write(path) {
            Ok(()) => {
                debug!(path = %path.display(), "Token saved");
                true
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to save token");
                false
            }
        }
    }

    /// Load a previously saved session. Returns whether one was restored.
    ///
    /// A restored token is trusted until a remote call rejects it.
    pub fn restore(&mut self, path: &Path) -> bool {
        let record = match TokenRecord::read(path) {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!(path = %path.display(), "No saved token");
                return false;
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Ignoring unreadable token file");
                return false;
            }
        };

        if record.likely_expired(Utc::now()) {
            warn!(
                saved_at = %record.saved_at,
                "Saved token predates the last nightly reset and may be rejected"
            );
        }

        match record.into_session() {
            Some(session) => {
                self.session = session;
                info!(path = %path.display(), "Restored saved session");
                true
            }
            None => {
                debug!(path = %path.display(), "Saved token is empty");
                false
            }
        }
    }

    fn token(&self) -> Result<&str> {
        self.session.access_token().ok_or(Error::NotAuthenticated)
    }

    pub async fn fetch_profile(&self) -> Result<Profile> {
        let token = self.token()?;
        Ok(self.api.profile(token).await?)
    }

    /// `(exchange, status)` for each configured exchange, in query order
    pub async fn fetch_market_status(&self) -> Result<Vec<(String, String)>> {
        let token = self.token()?;
        let mut statuses = Vec::with_capacity(self.market_exchanges.len());
        for exchange in &self.market_exchanges {
            let status = self.api.market_status(token, exchange).await?;
            let name = if status.exchange.is_empty() {
                exchange.clone()
            } else {
                status.exchange
            };
            statuses.push((name, status.status));
        }
        Ok(statuses)
    }

    pub async fn fetch_holdings(&self) -> Result<Vec<Holding>> {
        let token = self.token()?;
        Ok(self.api.holdings(token).await?)
    }

    pub async fn fetch_positions(&self) -> Result<Vec<Position>> {
        let token = self.token()?;
        Ok(self.api.positions(token).await?)
    }

    pub async fn fetch_ltp(&self, instrument_key: &str) -> Result<HashMap<String, LtpQuote>> {
        let token = self.token()?;
        Ok(self.api.ltp(token, instrument_key).await?)
    }

    pub async fn fetch_full_quote(
        &self,
        instrument_key: &str,
    ) -> Result<HashMap<String, FullQuote>> {
        let token = self.token()?;
        Ok(self.api.full_quote(token, instrument_key).await?)
    }

    /// Probe the connection by fetching the profile. Never fails.
    pub async fn check_connection(&self) -> ConnectionStatus {
        match self.fetch_profile().await {
            Ok(profile) => ConnectionStatus::Connected {
                user_name: profile.user_name,
                broker: profile.broker,
                exchanges: profile.exchanges,
            },
            Err(Error::NotAuthenticated) => ConnectionStatus::Disconnected {
                error: "Not authenticated".to_string(),
            },
            Err(e) => ConnectionStatus::Disconnected {
                error: e.to_string(),
            },
        }
    }
}
