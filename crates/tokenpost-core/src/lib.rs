//! Core of tokenpost
//!
//! Provides the mail sender together with the per-call credential bundle
//! and the OAuth2 client configuration it is constructed with.

mod config;
mod credentials;
mod error;
mod sender;

pub use config::{OAuth2ClientConfig, CLIENT_ID_VAR, CLIENT_SECRET_VAR};
pub use credentials::UserCredentials;
pub use error::{CoreError, CoreResult};
pub use sender::MailSender;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smtp_error_converts() {
        let message = tokenpost_smtp::OutgoingMessage::new("Hi").to("b@y.com");
        let err: CoreError = tokenpost_smtp::build_lettre_message(&message, "not-an-address")
            .unwrap_err()
            .into();
        assert!(matches!(err, CoreError::Smtp(_)));
    }
}
