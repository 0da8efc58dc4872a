//! tokenpost - send one email over OAuth2-authenticated SMTP
//!
//! The OAuth2 client is read from `TOKENPOST_CLIENT_ID` and
//! `TOKENPOST_CLIENT_SECRET` (a `.env` file is honored). The message and
//! the account credentials are read from JSON files.

use anyhow::{Context, Result};
use clap::Parser;
use serde::de::DeserializeOwned;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokenpost_core::{CoreResult, MailSender, OAuth2ClientConfig, UserCredentials};
use tokenpost_smtp::{build_lettre_message, OutgoingMessage};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "tokenpost", version, about = "Send an email over OAuth2-authenticated SMTP")]
struct Args {
    /// Message JSON: to, cc, bcc, subject, text, html, attachments
    #[arg(short, long)]
    message: PathBuf,

    /// Credentials JSON: service, email, accessToken, refreshToken
    #[arg(short, long)]
    credentials: PathBuf,

    /// Print the MIME message instead of sending it
    #[arg(long)]
    dry_run: bool,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Formatted RFC 5322 message as it would be submitted
fn render_message(
    message: &OutgoingMessage,
    credentials: &UserCredentials,
) -> CoreResult<Vec<u8>> {
    Ok(build_lettre_message(message, &credentials.email)?.formatted())
}

/// Write the message to `out` without contacting any server
fn dry_run(
    out: &mut impl Write,
    message: &OutgoingMessage,
    credentials: &UserCredentials,
) -> Result<()> {
    out.write_all(&render_message(message, credentials)?)?;
    out.flush()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("tokenpost=debug".parse()?))
        .init();

    let args = Args::parse();
    let message: OutgoingMessage = read_json(&args.message)?;
    let credentials: UserCredentials = read_json(&args.credentials)?;

    if args.dry_run {
        return dry_run(&mut std::io::stdout().lock(), &message, &credentials);
    }

    let sender = MailSender::new(OAuth2ClientConfig::from_env()?);
    sender
        .send_email(message, &credentials)
        .await
        .with_context(|| format!("Failed to send as {}", credentials.email))?;

    info!("Message accepted by {}", credentials.service);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tokenpost_core::CoreError;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_args() {
        let args = Args::try_parse_from([
            "tokenpost",
            "--message",
            "msg.json",
            "-c",
            "creds.json",
            "--dry-run",
        ])
        .unwrap();

        assert_eq!(args.message, PathBuf::from("msg.json"));
        assert_eq!(args.credentials, PathBuf::from("creds.json"));
        assert!(args.dry_run);
    }

    fn credentials() -> UserCredentials {
        serde_json::from_str(
            r#"{"service": "gmail", "email": "a@x.com", "accessToken": "tok", "refreshToken": "ref"}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_dry_run_writes_formatted_message() {
        let message = OutgoingMessage::new("Hi").to("b@y.com").text("Hello");
        let mut out = Vec::new();

        dry_run(&mut out, &message, &credentials()).unwrap();

        let rendered = String::from_utf8(out).unwrap();
        assert!(rendered.contains("Subject: Hi"));
        assert!(rendered.contains("From: a@x.com"));
        assert!(rendered.contains("To: b@y.com"));
        assert!(rendered.contains("Hello"));
    }

    #[test]
    fn test_dry_run_reports_invalid_message() {
        let message = OutgoingMessage::new("Hi").to("nobody").text("Hello");
        let mut out = Vec::new();

        let err = dry_run(&mut out, &message, &credentials()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CoreError>(),
            Some(CoreError::Smtp(_))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = read_json::<UserCredentials>(Path::new("/nonexistent/creds.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/creds.json"));
    }
}
