//! Transport configuration and the SMTP transport
//!
//! A [`TransportFactory`] turns one [`TransportConfig`] into one
//! [`MailTransport`]. The production factory builds a lettre
//! `AsyncSmtpTransport` that authenticates with XOAUTH2.

use crate::service::{Security, Service};
use crate::{build_lettre_message, OutgoingMessage, SmtpResult};
use async_trait::async_trait;
use lettre::{
    transport::smtp::authentication::{Credentials, Mechanism},
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

/// OAuth2 auth block of a transport configuration
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuth2Auth {
    /// Account to authenticate as
    pub user: String,
    pub access_token: String,
    pub refresh_token: String,
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for OAuth2Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2Auth")
            .field("user", &self.user)
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Authentication used by a transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum TransportAuth {
    OAuth2(OAuth2Auth),
}

/// Everything needed to open a transport to a mail provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransportConfig {
    pub service: Service,
    pub auth: TransportAuth,
}

/// Something that can hand a message off to an outbound relay
#[async_trait]
pub trait MailTransport: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send a single message
    async fn send_mail(&self, message: OutgoingMessage) -> Result<(), Self::Error>;
}

/// Builds a fresh transport for every configuration it is given
pub trait TransportFactory: Send + Sync {
    type Transport: MailTransport;

    fn create_transport(
        &self,
        config: TransportConfig,
    ) -> Result<Self::Transport, <Self::Transport as MailTransport>::Error>;
}

/// Error type produced by the transports of a factory
pub type TransportError<F> = <<F as TransportFactory>::Transport as MailTransport>::Error;

/// Factory for lettre-backed SMTP transports
#[derive(Debug, Clone, Copy, Default)]
pub struct LettreTransportFactory;

impl TransportFactory for LettreTransportFactory {
    type Transport = LettreTransport;

    fn create_transport(&self, config: TransportConfig) -> SmtpResult<LettreTransport> {
        LettreTransport::new(config)
    }
}

/// SMTP transport authenticating with XOAUTH2
///
/// No connection is opened until a message is sent, and none is kept
/// afterwards.
pub struct LettreTransport {
    inner: AsyncSmtpTransport<Tokio1Executor>,
    user: String,
}

impl LettreTransport {
    /// Create a transport from a configuration
    pub fn new(config: TransportConfig) -> SmtpResult<Self> {
        let endpoint = config.service.endpoint();
        let TransportAuth::OAuth2(auth) = config.auth;

        debug!(
            "Configuring SMTP transport for {} ({}:{}, {:?})",
            config.service, endpoint.host, endpoint.port, endpoint.security
        );

        let builder = match endpoint.security {
            Security::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&endpoint.host)?
            }
            Security::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&endpoint.host)?,
        };

        // lettre's Xoauth2 mechanism expects the access token directly -
        // it constructs and encodes the XOAUTH2 string internally
        let inner = builder
            .port(endpoint.port)
            .credentials(Credentials::new(auth.user.clone(), auth.access_token))
            .authentication(vec![Mechanism::Xoauth2])
            .build();

        Ok(Self {
            inner,
            user: auth.user,
        })
    }
}

#[async_trait]
impl MailTransport for LettreTransport {
    type Error = crate::SmtpError;

    async fn send_mail(&self, message: OutgoingMessage) -> SmtpResult<()> {
        info!("Sending email via SMTP with XOAUTH2");

        let lettre_message = build_lettre_message(&message, &self.user)?;
        self.inner.send(lettre_message).await?;

        info!("Email sent successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::Endpoint;
    use crate::SmtpError;

    fn config(service: Service) -> TransportConfig {
        TransportConfig {
            service,
            auth: TransportAuth::OAuth2(OAuth2Auth {
                user: "a@x.com".to_string(),
                access_token: "ya29.tok".to_string(),
                refresh_token: "1//ref".to_string(),
                client_id: "client".to_string(),
                client_secret: "shh-secret".to_string(),
            }),
        }
    }

    #[test]
    fn test_transport_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LettreTransport>();
        assert_send_sync::<LettreTransportFactory>();
    }

    #[test]
    fn test_config_json_shape() {
        let value = serde_json::to_value(config(Service::Gmail)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "service": "gmail",
                "auth": {
                    "type": "OAuth2",
                    "user": "a@x.com",
                    "accessToken": "ya29.tok",
                    "refreshToken": "1//ref",
                    "clientId": "client",
                    "clientSecret": "shh-secret",
                }
            })
        );
    }

    #[test]
    fn test_debug_hides_secrets() {
        let rendered = format!("{:?}", config(Service::Gmail));
        assert!(rendered.contains("a@x.com"));
        assert!(!rendered.contains("ya29.tok"));
        assert!(!rendered.contains("1//ref"));
        assert!(!rendered.contains("shh-secret"));
    }

    #[tokio::test]
    async fn test_factory_builds_for_every_security_mode() {
        let factory = LettreTransportFactory;
        assert!(factory.create_transport(config(Service::Gmail)).is_ok());
        assert!(factory.create_transport(config(Service::Yahoo)).is_ok());
    }

    #[tokio::test]
    async fn test_invalid_recipient_fails_before_connecting() {
        let transport = LettreTransport::new(config(Service::Gmail)).unwrap();
        let message = OutgoingMessage::new("Hi").to("nobody").text("Hello");

        let err = transport.send_mail(message).await.unwrap_err();
        assert!(matches!(err, SmtpError::InvalidAddress { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_server_surfaces_transport_error() {
        let endpoint = Endpoint::new("localhost", 1, Security::StartTls);
        let transport = LettreTransport::new(config(Service::Custom(endpoint))).unwrap();
        let message = OutgoingMessage::new("Hi").to("b@y.com").text("Hello");

        let err = transport.send_mail(message).await.unwrap_err();
        assert!(matches!(err, SmtpError::Transport(_)));
    }
}
