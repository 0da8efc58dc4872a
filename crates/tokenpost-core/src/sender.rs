//! Sending mail on behalf of an OAuth2-authenticated user

use crate::{OAuth2ClientConfig, UserCredentials};
use tokenpost_smtp::{
    LettreTransportFactory, MailTransport, OAuth2Auth, OutgoingMessage, TransportAuth,
    TransportConfig, TransportError, TransportFactory,
};
use tracing::debug;

/// Sends messages through a freshly built transport per call
///
/// Holds nothing but the OAuth2 client and the transport factory, so one
/// sender can serve concurrent calls for any number of accounts.
pub struct MailSender<F = LettreTransportFactory> {
    client: OAuth2ClientConfig,
    factory: F,
}

impl MailSender {
    /// Create a sender that submits over SMTP with lettre
    pub fn new(client: OAuth2ClientConfig) -> Self {
        Self::with_factory(client, LettreTransportFactory)
    }
}

impl<F: TransportFactory> MailSender<F> {
    /// Create a sender with a custom transport factory
    pub fn with_factory(client: OAuth2ClientConfig, factory: F) -> Self {
        Self { client, factory }
    }

    /// Transport configuration for one account
    pub fn transport_config(&self, credentials: &UserCredentials) -> TransportConfig {
        TransportConfig {
            service: credentials.service.clone(),
            auth: TransportAuth::OAuth2(OAuth2Auth {
                user: credentials.email.clone(),
                access_token: credentials.access_token.clone(),
                refresh_token: credentials.refresh_token.clone(),
                client_id: self.client.client_id.clone(),
                client_secret: self.client.client_secret.clone(),
            }),
        }
    }

    /// Send `message` as the account described by `credentials`
    ///
    /// Resolves once the relay has accepted the message. Any failure from
    /// building the transport or sending is returned exactly as the
    /// transport reported it.
    pub async fn send_email(
        &self,
        message: OutgoingMessage,
        credentials: &UserCredentials,
    ) -> Result<(), TransportError<F>> {
        debug!("Sending as {} via {}", credentials.email, credentials.service);

        let transport = self
            .factory
            .create_transport(self.transport_config(credentials))?;
        transport.send_mail(message).await
    }
}
