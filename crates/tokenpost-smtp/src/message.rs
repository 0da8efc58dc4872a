//! Outgoing message model and MIME building

use crate::{SmtpError, SmtpResult};
use base64::Engine;
use lettre::message::{
    header::ContentType, Attachment, Mailbox, MessageBuilder, MultiPart, SinglePart,
};
use lettre::Message;
use serde::{Deserialize, Deserializer};

/// An attachment to include in an outgoing message
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutgoingAttachment {
    /// Filename to display
    pub filename: String,
    /// MIME type (e.g., "application/pdf")
    #[serde(rename = "contentType", default = "default_mime_type")]
    pub mime_type: String,
    /// Raw file data, base64 in JSON
    #[serde(rename = "content", deserialize_with = "base64_bytes")]
    pub data: Vec<u8>,
}

/// Email message to send
///
/// Recipient fields accept either a single address or a list when
/// deserialized. An address may carry a display name (`"Ann <ann@x.com>"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessage {
    /// From address, defaults to the authenticated user
    #[serde(default)]
    pub from: Option<String>,
    /// From display name
    #[serde(default)]
    pub from_name: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub to: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub cc: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub bcc: Vec<String>,
    pub subject: String,
    /// Plain text body
    #[serde(default, rename = "text")]
    pub text_body: Option<String>,
    /// HTML body
    #[serde(default, rename = "html")]
    pub html_body: Option<String>,
    /// In-Reply-To header
    #[serde(default)]
    pub in_reply_to: Option<String>,
    /// References header
    #[serde(default, deserialize_with = "one_or_many")]
    pub references: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<OutgoingAttachment>,
}

impl OutgoingMessage {
    /// Create a new message with a subject and no recipients
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            ..Self::default()
        }
    }

    /// Set an explicit from address
    pub fn sender(mut self, address: impl Into<String>) -> Self {
        self.from = Some(address.into());
        self
    }

    /// Set the from display name
    pub fn from_name(mut self, name: impl Into<String>) -> Self {
        self.from_name = Some(name.into());
        self
    }

    /// Add a To recipient
    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.to.push(address.into());
        self
    }

    /// Add a CC recipient
    pub fn cc(mut self, address: impl Into<String>) -> Self {
        self.cc.push(address.into());
        self
    }

    /// Add a BCC recipient
    pub fn bcc(mut self, address: impl Into<String>) -> Self {
        self.bcc.push(address.into());
        self
    }

    /// Set the plain text body
    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.text_body = Some(body.into());
        self
    }

    /// Set the HTML body
    pub fn html(mut self, body: impl Into<String>) -> Self {
        self.html_body = Some(body.into());
        self
    }

    /// Set the In-Reply-To header
    pub fn reply_to_message(mut self, message_id: impl Into<String>) -> Self {
        self.in_reply_to = Some(message_id.into());
        self
    }

    /// Add a reference
    pub fn reference(mut self, message_id: impl Into<String>) -> Self {
        self.references.push(message_id.into());
        self
    }

    /// Add an attachment
    pub fn attachment(
        mut self,
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        self.attachments.push(OutgoingAttachment {
            filename: filename.into(),
            mime_type: mime_type.into(),
            data,
        });
        self
    }
}

fn default_mime_type() -> String {
    "application/octet-stream".to_string()
}

fn base64_bytes<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let encoded = String::deserialize(deserializer)?;
    base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(serde::de::Error::custom)
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(address) => vec![address],
        OneOrMany::Many(addresses) => addresses,
    })
}

fn parse_mailbox(address: &str) -> SmtpResult<Mailbox> {
    address.parse().map_err(|source| SmtpError::InvalidAddress {
        address: address.to_string(),
        source,
    })
}

fn sender_mailbox(msg: &OutgoingMessage, fallback_from: &str) -> SmtpResult<Mailbox> {
    let address = msg.from.as_deref().unwrap_or(fallback_from);
    let mut mailbox = parse_mailbox(address)?;
    if let Some(ref name) = msg.from_name {
        mailbox.name = Some(name.clone());
    }
    Ok(mailbox)
}

/// Build a lettre Message from OutgoingMessage
///
/// `fallback_from` is used when the message has no explicit from address,
/// normally the account the transport authenticates as.
pub fn build_lettre_message(msg: &OutgoingMessage, fallback_from: &str) -> SmtpResult<Message> {
    let mut builder: MessageBuilder = Message::builder()
        .from(sender_mailbox(msg, fallback_from)?)
        .subject(msg.subject.clone());

    for to in &msg.to {
        builder = builder.to(parse_mailbox(to)?);
    }
    for cc in &msg.cc {
        builder = builder.cc(parse_mailbox(cc)?);
    }
    for bcc in &msg.bcc {
        builder = builder.bcc(parse_mailbox(bcc)?);
    }

    if let Some(ref reply_to) = msg.in_reply_to {
        builder = builder.in_reply_to(reply_to.clone());
    }
    if !msg.references.is_empty() {
        builder = builder.references(msg.references.join(" "));
    }

    let text_part = |body: &str| {
        SinglePart::builder()
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
    };
    let html_part = |body: &str| {
        SinglePart::builder()
            .header(ContentType::TEXT_HTML)
            .body(body.to_string())
    };

    let body_part = match (&msg.text_body, &msg.html_body) {
        (Some(text), Some(html)) => MultiPart::alternative()
            .singlepart(text_part(text))
            .singlepart(html_part(html)),
        (Some(text), None) => MultiPart::alternative().singlepart(text_part(text)),
        (None, Some(html)) => MultiPart::alternative().singlepart(html_part(html)),
        (None, None) => MultiPart::alternative().singlepart(text_part("")),
    };

    if msg.attachments.is_empty() {
        return Ok(builder.multipart(body_part)?);
    }

    let mut mixed = MultiPart::mixed().multipart(body_part);
    for att in &msg.attachments {
        let content_type = match ContentType::parse(&att.mime_type) {
            Ok(content_type) => content_type,
            Err(_) => ContentType::parse(&default_mime_type())?,
        };
        let attachment = Attachment::new(att.filename.clone()).body(att.data.clone(), content_type);
        mixed = mixed.singlepart(attachment);
    }

    Ok(builder.multipart(mixed)?)
}
