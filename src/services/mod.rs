//! Service layer for the import client.
//!
//! This module contains the business logic for:
//! - QR token validation (`TokenParser`)
//! - Roster encoding (`encoder`)
//! - Hidden-field scraping (`hidden`)
//! - The two-phase submission (`SubmissionEngine`)
//! - End-to-end imports (`Importer`)

pub mod encoder;
pub mod hidden;
pub mod importer;
pub mod submission;
pub mod token;

pub use encoder::EncodedBody;
pub use importer::Importer;
pub use submission::{SubmissionAbort, SubmissionEngine, SubmissionState};
pub use token::TokenParser;
