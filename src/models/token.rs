//! Submission token decoded from a scanned QR code.

use std::fmt;

use url::Url;

/// A validated portal endpoint, good for one import.
///
/// Only [`TokenParser`](crate::services::TokenParser) builds these, so holding
/// one means the host matched the portal domain and both required query
/// parameters were present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionToken {
    endpoint: Url,
    key: String,
    transaction: String,
}

impl SubmissionToken {
    pub(crate) fn new(endpoint: Url, key: String, transaction: String) -> Self {
        Self {
            endpoint,
            key,
            transaction,
        }
    }

    /// Fully-qualified endpoint used for both submission phases.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Access key carried by the URL.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Transaction (date-usage) identifier carried by the URL.
    pub fn transaction(&self) -> &str {
        &self.transaction
    }
}

impl fmt::Display for SubmissionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint.as_str())
    }
}
