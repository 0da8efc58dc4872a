//! Per-call OAuth2 credentials

use serde::Deserialize;
use std::fmt;
use tokenpost_smtp::Service;

/// OAuth2 credential bundle for one mail account
///
/// Produced by whatever authentication flow the caller runs. The access
/// token must already be valid; it is not checked or refreshed here.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCredentials {
    /// Mail provider profile (e.g. "gmail")
    pub service: Service,
    /// Account address, also used as the SMTP user
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl UserCredentials {
    pub fn new(
        service: Service,
        email: impl Into<String>,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            service,
            email: email.into(),
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

impl fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredentials")
            .field("service", &self.service)
            .field("email", &self.email)
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}
