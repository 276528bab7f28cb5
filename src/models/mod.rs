// src/models/mod.rs

//! Domain models for the import client.

mod config;
mod response;
mod result;
mod roster;
mod token;

// Re-export all public types
pub use config::{ClientConfig, Config, PortalConfig};
pub use response::{HiddenFieldSet, PortalResponse};
pub use result::{Confirmed, SubmissionResult};
pub use roster::Roster;
pub use token::SubmissionToken;
