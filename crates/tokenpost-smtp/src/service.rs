//! Mail service resolution
//!
//! Maps a provider name such as `"gmail"` to the SMTP endpoint that accepts
//! XOAUTH2 submissions for it. Names are normalized before lookup, so
//! `"Gmail"`, `"googlemail"` and `"Google Mail"` all resolve to Gmail.

use crate::ServiceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the SMTP connection is secured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Security {
    /// Plain connection upgraded with STARTTLS (usually port 587)
    StartTls,
    /// TLS from the first byte (usually port 465)
    Tls,
}

/// An SMTP server endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub security: Security,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16, security: Security) -> Self {
        Self {
            host: host.into(),
            port,
            security,
        }
    }
}

/// A mail provider profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ServiceRepr", try_from = "ServiceRepr")]
pub enum Service {
    Gmail,
    Outlook365,
    Hotmail,
    Yahoo,
    Zoho,
    /// Any other server that accepts XOAUTH2
    Custom(Endpoint),
}

impl Service {
    /// Canonical name, `None` for custom endpoints
    pub fn name(&self) -> Option<&'static str> {
        match self {
            Service::Gmail => Some("gmail"),
            Service::Outlook365 => Some("outlook365"),
            Service::Hotmail => Some("hotmail"),
            Service::Yahoo => Some("yahoo"),
            Service::Zoho => Some("zoho"),
            Service::Custom(_) => None,
        }
    }

    /// SMTP endpoint to submit mail to
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Service::Gmail => Endpoint::new("smtp.gmail.com", 587, Security::StartTls),
            Service::Outlook365 => Endpoint::new("smtp.office365.com", 587, Security::StartTls),
            Service::Hotmail => Endpoint::new("smtp-mail.outlook.com", 587, Security::StartTls),
            Service::Yahoo => Endpoint::new("smtp.mail.yahoo.com", 465, Security::Tls),
            Service::Zoho => Endpoint::new("smtp.zoho.com", 465, Security::Tls),
            Service::Custom(endpoint) => endpoint.clone(),
        }
    }
}

/// Strip everything but alphanumerics, dots and dashes, then lowercase
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl FromStr for Service {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "gmail" | "googlemail" | "gmail.com" | "googlemail.com" => Ok(Service::Gmail),
            "outlook365" | "office365" => Ok(Service::Outlook365),
            "hotmail" | "hotmail.com" | "outlook" | "outlook.com" | "live" | "live.com" => {
                Ok(Service::Hotmail)
            }
            "yahoo" | "yahoomail" | "ymail" | "yahoo.com" | "ymail.com" => Ok(Service::Yahoo),
            "zoho" | "zoho.com" => Ok(Service::Zoho),
            _ => Err(ServiceError::Unknown(s.to_string())),
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => {
                let endpoint = self.endpoint();
                write!(f, "{}:{}", endpoint.host, endpoint.port)
            }
        }
    }
}

/// JSON shape: either a provider name or an explicit endpoint
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ServiceRepr {
    Name(String),
    Endpoint(Endpoint),
}

impl From<Service> for ServiceRepr {
    fn from(service: Service) -> Self {
        match service {
            Service::Custom(endpoint) => ServiceRepr::Endpoint(endpoint),
            known => ServiceRepr::Name(known.to_string()),
        }
    }
}

impl TryFrom<ServiceRepr> for Service {
    type Error = ServiceError;

    fn try_from(repr: ServiceRepr) -> Result<Self, Self::Error> {
        match repr {
            ServiceRepr::Name(name) => name.parse(),
            ServiceRepr::Endpoint(endpoint) => Ok(Service::Custom(endpoint)),
        }
    }
}
