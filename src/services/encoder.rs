// src/services/encoder.rs

//! Roster → portal upload body.
//!
//! ```text
//! ra;data\r\n
//! 123;09/02/2026\r\n
//! 456;09/02/2026\r\n
//! ```
//!
//! The portal rejects bodies without the trailing CRLF, so the terminator
//! follows every line including the last.

use std::fmt;

use sha2::{Digest, Sha256};

/// Literal first line of every upload.
pub const HEADER: &str = "ra;data";

/// Line terminator expected by the portal.
pub const CRLF: &str = "\r\n";

/// Upload body, byte-exact as sent in phase 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedBody(String);

impl EncodedBody {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of identifier records (header excluded).
    pub fn record_count(&self) -> usize {
        self.0.matches(CRLF).count().saturating_sub(1)
    }

    /// Lowercase hex SHA-256 of the body bytes.
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(self.0.as_bytes()))
    }
}

impl fmt::Display for EncodedBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encode identifiers and an ISO date into the upload body.
///
/// Identifiers are trimmed and blanks dropped; order is preserved and no
/// deduplication happens here.
pub fn encode<S: AsRef<str>>(identifiers: &[S], date: &str) -> EncodedBody {
    let date = format_portal_date(date);
    let mut body = String::with_capacity(HEADER.len() + CRLF.len() + identifiers.len() * 24);
    body.push_str(HEADER);
    body.push_str(CRLF);

    for id in identifiers
        .iter()
        .map(|id| id.as_ref().trim())
        .filter(|id| !id.is_empty())
    {
        body.push_str(id);
        body.push(';');
        body.push_str(&date);
        body.push_str(CRLF);
    }

    EncodedBody(body)
}

/// Reorder `YYYY-MM-DD` into `DD/MM/YYYY`.
///
/// Anything that is not exactly three non-empty numeric components is returned
/// unchanged.
pub fn format_portal_date(iso: &str) -> String {
    let parts: Vec<&str> = iso.split('-').collect();
    match parts.as_slice() {
        [y, m, d] if [y, m, d].iter().all(|p| is_numeric(p)) => format!("{d}/{m}/{y}"),
        _ => iso.to_string(),
    }
}

fn is_numeric(part: &str) -> bool {
    !part.is_empty() && part.chars().all(|c| c.is_ascii_digit())
}
