use std::fmt;

use crate::error::{Error, Result};

pub const API_KEY_VAR: &str = "UPSTOX_API_KEY";
pub const API_SECRET_VAR: &str = "UPSTOX_API_SECRET";
pub const REDIRECT_URI_VAR: &str = "UPSTOX_REDIRECT_URI";

/// Redirect target used when neither an argument nor the environment supplies one
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8080";

/// Upstox app credentials. All three values are non-empty once constructed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
    redirect_uri: String,
}

impl Credentials {
    /// Build credentials, falling back to the process environment for any
    /// value not given explicitly.
    pub fn new(
        api_key: Option<String>,
        api_secret: Option<String>,
        redirect_uri: Option<String>,
    ) -> Result<Self> {
        Self::resolve(api_key, api_secret, redirect_uri, |name| std::env::var(name).ok())
    }

    /// Build credentials entirely from the environment
    pub fn from_env() -> Result<Self> {
        Self::new(None, None, None)
    }

    /// Same as `new`, with the environment lookup supplied by the caller.
    pub fn resolve<F>(
        api_key: Option<String>,
        api_secret: Option<String>,
        redirect_uri: Option<String>,
        lookup: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |explicit: Option<String>, var: &str| {
            explicit
                .filter(|v| !v.is_empty())
                .or_else(|| lookup(var).filter(|v| !v.is_empty()))
        };

        let api_key = pick(api_key, API_KEY_VAR);
        let api_secret = pick(api_secret, API_SECRET_VAR);
        let redirect_uri = pick(redirect_uri, REDIRECT_URI_VAR)
            .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string());

        match (api_key, api_secret) {
            (Some(api_key), Some(api_secret)) => Ok(Self {
                api_key,
                api_secret,
                redirect_uri,
            }),
            _ => Err(Error::Configuration(format!(
                "API key and secret are required. Provide them as arguments or set {} and {}.",
                API_KEY_VAR, API_SECRET_VAR
            ))),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    pub fn masked_api_key(&self) -> String {
        mask(&self.api_key)
    }

    pub fn masked_api_secret(&self) -> String {
        mask(&self.api_secret)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.masked_api_key())
            .field("api_secret", &"***")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

/// Show the first 6 and last 4 characters of a secret
fn mask(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 10 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
