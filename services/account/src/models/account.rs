//! Account model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;
use sqlx::FromRow;

use crate::validation::ValidationError;

/// Account entity, including the stored password hash.
///
/// Only used inside the service. Anything leaving the process goes through
/// [`AccountProfile`].
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public projection of an account, without the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AccountProfile {
    pub id: i64,
    pub email: String,
    #[serde(rename = "first")]
    pub first_name: String,
    #[serde(rename = "last")]
    pub last_name: String,
}

impl From<Account> for AccountProfile {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            first_name: account.first_name,
            last_name: account.last_name,
        }
    }
}

/// Authenticated principal for the current request.
///
/// Built by the auth middleware from a validated bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDetails {
    pub email: String,
}

impl AccountDetails {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

/// Reads an optional text field, accepting numbers and booleans as their
/// JSON text so they reach field validation instead of failing extraction.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(Value::Array(_)) => Err(de::Error::custom("expected a string, found an array")),
        Some(Value::Object(_)) => Err(de::Error::custom("expected a string, found an object")),
    }
}

/// Registration payload
///
/// Every field is optional at the wire level so a missing field can be
/// reported with the same message as a blank one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub first: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub password: Option<String>,
}

/// Login payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub password: Option<String>,
}

/// Response for a successful login
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Update payload, discriminated by `type`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub curr_password: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub new_password: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub first: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last: Option<String>,
}

/// A decoded update request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountUpdate {
    Password {
        current: String,
        new: String,
    },
    Name {
        first: String,
        last: String,
    },
}

impl UpdateRequest {
    /// Resolve the `type` discriminator and its required fields.
    ///
    /// Field contents are not validated here.
    pub fn into_update(self) -> Result<AccountUpdate, ValidationError> {
        match self.kind.as_deref() {
            Some("password") => match (self.curr_password, self.new_password) {
                (Some(current), Some(new)) => Ok(AccountUpdate::Password { current, new }),
                _ => Err(ValidationError::MissingPasswordFields),
            },
            Some("name") => match (self.first, self.last) {
                (Some(first), Some(last)) => Ok(AccountUpdate::Name { first, last }),
                _ => Err(ValidationError::MissingNameFields),
            },
            _ => Err(ValidationError::InvalidUpdateType),
        }
    }
}
