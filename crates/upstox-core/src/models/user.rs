use serde::{Deserialize, Serialize};

/// Body of a successful `/v2/login/authorization/token` call.
///
/// Unlike the data endpoints this one is not wrapped in `ApiResponse`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TokenResponse {
    pub access_token: String,
    pub extended_token: Option<String>,
    pub user_id: String,
    pub user_name: String,
    pub email: String,
    pub broker: String,
    pub user_type: String,
    pub exchanges: Vec<String>,
    pub products: Vec<String>,
    pub order_types: Vec<String>,
    pub poa: bool,
    pub is_active: bool,
}

impl TokenResponse {
    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            user_name: self.user_name.clone(),
            email: self.email.clone(),
            user_id: self.user_id.clone(),
            broker: self.broker.clone(),
        }
    }
}

/// Identity fields reported alongside a freshly issued token
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub user_name: String,
    pub email: String,
    pub user_id: String,
    pub broker: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub user_name: String,
    pub email: String,
    pub user_id: String,
    pub broker: String,
    pub exchanges: Vec<String>,
    pub products: Vec<String>,
    pub order_types: Vec<String>,
    pub user_type: String,
    pub poa: bool,
    pub is_active: bool,
}
