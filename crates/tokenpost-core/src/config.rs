//! OAuth2 client configuration

use crate::{CoreError, CoreResult};
use std::fmt;

/// Environment variable holding the OAuth2 client ID
pub const CLIENT_ID_VAR: &str = "TOKENPOST_CLIENT_ID";
/// Environment variable holding the OAuth2 client secret
pub const CLIENT_SECRET_VAR: &str = "TOKENPOST_CLIENT_SECRET";

/// OAuth2 client registered with the mail provider
///
/// Shared by every send made through one [`crate::MailSender`].
#[derive(Clone, PartialEq, Eq)]
pub struct OAuth2ClientConfig {
    pub client_id: String,
    pub client_secret: String,
}

impl OAuth2ClientConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Read the client from `TOKENPOST_CLIENT_ID` and `TOKENPOST_CLIENT_SECRET`
    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CoreResult<Self> {
        let require = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| CoreError::MissingConfig(key.to_string()))
        };

        Ok(Self {
            client_id: require(CLIENT_ID_VAR)?,
            client_secret: require(CLIENT_SECRET_VAR)?,
        })
    }
}

impl fmt::Debug for OAuth2ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2ClientConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}
