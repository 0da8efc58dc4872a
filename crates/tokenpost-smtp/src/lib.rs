//! SMTP transport for tokenpost
//!
//! Builds MIME messages, resolves provider names to SMTP endpoints and
//! submits mail over STARTTLS or TLS with XOAUTH2 authentication.

mod error;
mod message;
mod service;
mod transport;

pub use error::{ServiceError, SmtpError, SmtpResult};
pub use message::{build_lettre_message, OutgoingAttachment, OutgoingMessage};
pub use service::{Endpoint, Security, Service};
pub use transport::{
    LettreTransport, LettreTransportFactory, MailTransport, OAuth2Auth, TransportAuth,
    TransportConfig, TransportError, TransportFactory,
};
