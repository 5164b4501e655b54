use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Token file name, relative to the working directory
pub const DEFAULT_TOKEN_FILE: &str = "upstox_token.json";

/// Upstox does not report token expiry; tokens stop working at the
/// nightly reset.
pub const TOKEN_VALIDITY: &str = "3:30 AM next trading day";

/// Offset of IST from UTC in seconds (+05:30)
const IST_OFFSET_SECS: i64 = 5 * 3600 + 30 * 60;

/// Time of the nightly token reset, in seconds after IST midnight (03:30)
const TOKEN_RESET_SECS: i64 = 3 * 3600 + 30 * 60;

const SECS_PER_DAY: i64 = 86_400;

/// In-memory authentication state.
///
/// Authenticated exactly when an access token is present and non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    access_token: Option<String>,
    expires_at: Option<String>,
}

impl Session {
    pub fn new(access_token: impl Into<String>, expires_at: Option<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            expires_at,
        }
    }

    /// The bearer token, if the session holds a usable one
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn expires_at(&self) -> Option<&str> {
        self.expires_at.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }
}

/// Missing and `null` both read as an empty string
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// On-disk form of the last successful session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub access_token: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub expires_at: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub saved_at: String,
}

impl TokenRecord {
    /// Snapshot a session for saving. `None` when there is no token.
    pub fn from_session(session: &Session, now: DateTime<Utc>) -> Option<Self> {
        let token = session.access_token()?;
        Some(Self {
            access_token: token.to_string(),
            expires_at: session.expires_at().unwrap_or(TOKEN_VALIDITY).to_string(),
            saved_at: now.to_rfc3339(),
        })
    }

    /// Read a record from disk. A missing file is `Ok(None)`.
    pub fn read(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read token file {}", path.display()))?;
        let record = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse token file {}", path.display()))?;
        Ok(Some(record))
    }

    /// Write the record, replacing whatever was there
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write token file {}", path.display()))?;
        Ok(())
    }

    /// Turn the record back into a session. `None` when the token is empty.
    pub fn into_session(self) -> Option<Session> {
        if self.access_token.is_empty() {
            return None;
        }
        let expires_at = Some(self.expires_at).filter(|e| !e.is_empty());
        Some(Session::new(self.access_token, expires_at))
    }

    /// When the record was written. Timestamps without an offset are read as IST.
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.saved_at) {
            return Some(dt.with_timezone(&Utc));
        }
        let naive = NaiveDateTime::parse_from_str(&self.saved_at, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
        let ist = FixedOffset::east_opt(IST_OFFSET_SECS as i32)?;
        ist.from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Whether the token was saved before the most recent nightly reset.
    ///
    /// Unknown save times count as not expired.
    pub fn likely_expired(&self, now: DateTime<Utc>) -> bool {
        self.saved_at()
            .map(|saved| saved < last_token_reset(now))
            .unwrap_or(false)
    }
}

/// The most recent 03:30 IST at or before `now`
pub fn last_token_reset(now: DateTime<Utc>) -> DateTime<Utc> {
    let local = now.timestamp() + IST_OFFSET_SECS;
    let mut reset = local.div_euclid(SECS_PER_DAY) * SECS_PER_DAY + TOKEN_RESET_SECS;
    if reset > local {
        reset -= SECS_PER_DAY;
    }
    DateTime::from_timestamp(reset - IST_OFFSET_SECS, 0).unwrap_or(now)
}
