//! Subject identifiers carried by CAEP payloads.
//!
//! Each variant is a format tag plus the named properties that format needs.
//! Serialized as a flat object: `{"format": "email", "email": "a@b.c"}`.

use serde::{Deserialize, Serialize};

/// Subject identifier in one of the supported formats.
///
/// Construct through the format-specific functions, which return `None` when
/// a required value is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum Subject {
    Email { email: String },
    PhoneNumber { phone_number: String },
    Account { uri: String },
    IssSub { iss: String, sub: String },
    Opaque { id: String },
    Did { did: String },
    Uri { uri: String },
}

fn present(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}

impl Subject {
    #[must_use]
    pub fn email(email: &str) -> Option<Self> {
        Some(Self::Email {
            email: present(email)?,
        })
    }

    #[must_use]
    pub fn phone_number(phone_number: &str) -> Option<Self> {
        Some(Self::PhoneNumber {
            phone_number: present(phone_number)?,
        })
    }

    /// Account subject, identified by an `acct:` URI.
    #[must_use]
    pub fn account(uri: &str) -> Option<Self> {
        Some(Self::Account { uri: present(uri)? })
    }

    /// Issuer and subject pair; both must be non-empty.
    #[must_use]
    pub fn iss_sub(iss: &str, sub: &str) -> Option<Self> {
        Some(Self::IssSub {
            iss: present(iss)?,
            sub: present(sub)?,
        })
    }

    #[must_use]
    pub fn opaque(id: &str) -> Option<Self> {
        Some(Self::Opaque { id: present(id)? })
    }

    /// Decentralized identifier.
    #[must_use]
    pub fn did(url: &str) -> Option<Self> {
        Some(Self::Did { did: present(url)? })
    }

    #[must_use]
    pub fn uri(uri: &str) -> Option<Self> {
        Some(Self::Uri { uri: present(uri)? })
    }

    /// The format tag used on the wire.
    #[must_use]
    pub const fn format(&self) -> &'static str {
        match self {
            Self::Email { .. } => "email",
            Self::PhoneNumber { .. } => "phone_number",
            Self::Account { .. } => "account",
            Self::IssSub { .. } => "iss_sub",
            Self::Opaque { .. } => "opaque",
            Self::Did { .. } => "did",
            Self::Uri { .. } => "uri",
        }
    }
}
