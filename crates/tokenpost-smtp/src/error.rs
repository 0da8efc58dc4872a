//! Error types for SMTP operations

use thiserror::Error;

/// Result type for SMTP operations
pub type SmtpResult<T> = Result<T, SmtpError>;

/// Errors that can occur during SMTP operations
#[derive(Debug, Error)]
pub enum SmtpError {
    /// Invalid email address
    #[error("Invalid email address {address}: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    /// Attachment content type could not be parsed
    #[error("Invalid content type: {0}")]
    InvalidContentType(#[from] lettre::message::header::ContentTypeErr),

    /// Message building error
    #[error("Failed to build message: {0}")]
    MessageBuildError(#[from] lettre::error::Error),

    /// Connection, authentication or delivery failure reported by lettre
    #[error(transparent)]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Errors that can occur while resolving a mail service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Service name is not one of the well-known providers
    #[error("Unknown mail service: {0}")]
    Unknown(String),
}
