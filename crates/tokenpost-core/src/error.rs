//! Error types for the core module

use thiserror::Error;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
///
/// [`crate::MailSender`] never produces these; it returns the transport's
/// own error untouched.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Required configuration value is missing or empty
    #[error("Missing configuration: {0} is not set")]
    MissingConfig(String),

    /// SMTP error
    #[error(transparent)]
    Smtp(#[from] tokenpost_smtp::SmtpError),
}
