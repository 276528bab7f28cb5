// src/error.rs

//! Unified error handling for the import client.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Result type alias for application operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be built
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Portal import failed
    #[error(transparent)]
    Import(#[from] ImportError),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

/// The two requests of a portal submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Raw roster upload
    Upload,
    /// Hidden-field confirmation ("Salvar")
    Confirmation,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Upload => f.write_str("upload"),
            Phase::Confirmation => f.write_str("confirmation"),
        }
    }
}

/// Where a roster stands on the portal after a failed import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Delivery {
    /// Nothing reached the portal; safe to try again.
    NotUploaded,
    /// The upload landed but was never confirmed; needs manual reconciliation.
    UploadedUnconfirmed,
}

impl fmt::Display for Delivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delivery::NotUploaded => f.write_str("not uploaded"),
            Delivery::UploadedUnconfirmed => f.write_str("uploaded but not confirmed"),
        }
    }
}

/// Failures of the scan → upload → confirm flow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// Scanned text is not an HTTP(S) URL
    #[error("invalid QR code: not an HTTP(S) URL")]
    InvalidFormat,

    /// URL host is not on the portal's domain
    #[error("invalid QR code: host '{host}' is not on the portal domain")]
    WrongDomain { host: String },

    /// A required query parameter is absent or empty
    #[error("invalid QR code: missing '{0}' parameter")]
    MissingParameter(String),

    /// Phase 1 answered with a non-2xx status
    #[error("upload rejected ({status}): {}", or_no_details(.body))]
    UploadRejected { status: u16, body: String },

    /// Phase 1 succeeded but carried no hidden `sql` field
    #[error("portal did not return the hidden 'sql' field needed to confirm the upload")]
    ConfirmationFieldMissing { upload_body: String },

    /// Phase 2 answered with a non-2xx status
    #[error("confirmation rejected ({status}): {}", or_no_details(.body))]
    ConfirmationRejected { status: u16, body: String },

    /// Network-level failure (DNS, connection reset, timeout)
    #[error("transport error during {phase}: {message}")]
    Transport { phase: Phase, message: String },

    /// Caller cancelled the submission
    #[error("submission aborted during {phase}")]
    Aborted { phase: Phase, uploaded: bool },
}

impl ImportError {
    /// Classify how far the roster got before the failure.
    pub fn delivery(&self) -> Delivery {
        match self {
            ImportError::InvalidFormat
            | ImportError::WrongDomain { .. }
            | ImportError::MissingParameter(_)
            | ImportError::UploadRejected { .. } => Delivery::NotUploaded,
            ImportError::ConfirmationFieldMissing { .. }
            | ImportError::ConfirmationRejected { .. } => Delivery::UploadedUnconfirmed,
            ImportError::Transport { phase, .. } => match phase {
                Phase::Upload => Delivery::NotUploaded,
                Phase::Confirmation => Delivery::UploadedUnconfirmed,
            },
            ImportError::Aborted { uploaded, .. } => {
                if *uploaded {
                    Delivery::UploadedUnconfirmed
                } else {
                    Delivery::NotUploaded
                }
            }
        }
    }

    /// HTTP status that caused the failure, when there was one.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ImportError::UploadRejected { status, .. }
            | ImportError::ConfirmationRejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn or_no_details(body: &str) -> &str {
    if body.trim().is_empty() {
        "no details"
    } else {
        body
    }
}
