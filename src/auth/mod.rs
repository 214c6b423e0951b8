//! Caller identity carried in the `x-rh-identity` header.
//!
//! The header is the base64 encoding of a JSON document such as
//! `{"identity": {"account_number": "12345", "user": {"username": "..."}}}`.
//! The username is the owner every report lookup is scoped to.

mod extractor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

pub use extractor::{AdminIdentity, Identity};

#[derive(Debug, Serialize, Deserialize)]
struct IdentityDocument {
    identity: IdentityBody,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct IdentityBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    account_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    internal: Option<InternalBody>,
    #[serde(default)]
    user: Option<UserBody>,
}

#[derive(Debug, Serialize, Deserialize)]
struct InternalBody {
    #[serde(default)]
    org_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct UserBody {
    #[serde(default)]
    username: Option<String>,
}

/// Decode an identity header value. `None` when it is not base64, not the
/// expected JSON, or has no username.
pub fn decode_identity(header: &str) -> Option<Identity> {
    let bytes = STANDARD.decode(header.trim()).ok()?;
    let document: IdentityDocument = serde_json::from_slice(&bytes).ok()?;
    let body = document.identity;

    let username = body
        .user
        .and_then(|u| u.username)
        .filter(|u| !u.trim().is_empty())?;

    Some(Identity {
        username,
        account_number: body.account_number,
        org_id: body.internal.and_then(|i| i.org_id),
    })
}

/// Encode an identity header value for `username`.
pub fn encode_identity(username: &str) -> String {
    let document = IdentityDocument {
        identity: IdentityBody {
            user: Some(UserBody {
                username: Some(username.to_string()),
            }),
            ..Default::default()
        },
    };
    // Serializing plain strings cannot fail.
    let json = serde_json::to_vec(&document).unwrap_or_default();
    STANDARD.encode(json)
}
