// src/services/importer.rs

//! End-to-end import: scan → roster body → submission → result.

use std::sync::Arc;

use crate::error::Result;
use crate::models::{Config, PortalConfig, Roster, SubmissionResult};
use crate::services::submission::{SubmissionAbort, SubmissionEngine};
use crate::services::token::TokenParser;
use crate::transport::{HttpTransport, Transport};

/// Service tying token parsing, encoding, and submission together.
#[derive(Clone)]
pub struct Importer {
    parser: TokenParser,
    engine: SubmissionEngine,
}

impl Importer {
    /// Create an importer that talks to the real portal.
    pub fn new(config: &Config) -> Result<Self> {
        let transport = HttpTransport::new(&config.client)?;
        Ok(Self::with_transport(
            config.portal.clone(),
            Arc::new(transport),
        ))
    }

    /// Create an importer over any transport.
    pub fn with_transport(portal: PortalConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            parser: TokenParser::new(portal),
            engine: SubmissionEngine::new(transport),
        }
    }

    /// Import a roster using a freshly scanned QR code.
    pub async fn import(&self, scanned: &str, roster: &Roster) -> SubmissionResult {
        self.import_inner(scanned, roster, None).await
    }

    /// Import a roster, cancellable through the paired abort handle.
    pub async fn import_abortable(
        &self,
        scanned: &str,
        roster: &Roster,
        abort: SubmissionAbort,
    ) -> SubmissionResult {
        self.import_inner(scanned, roster, Some(abort)).await
    }

    async fn import_inner(
        &self,
        scanned: &str,
        roster: &Roster,
        abort: Option<SubmissionAbort>,
    ) -> SubmissionResult {
        let token = match self.parser.parse(scanned) {
            Ok(token) => token,
            Err(error) => {
                log::warn!("Rejected scanned code: {}", error);
                return error.into();
            }
        };

        let body = roster.encode();
        if body.record_count() == 0 {
            log::warn!("Roster for {} has no identifiers; sending header only", roster.date);
        }

        let result = match abort {
            Some(abort) => self.engine.submit_abortable(&token, &body, abort).await,
            None => self.engine.submit(&token, &body).await,
        };

        match &result {
            SubmissionResult::Success { .. } => {
                log::info!("Roster for {} confirmed by the portal", roster.date)
            }
            SubmissionResult::Failure {
                reason, delivery, ..
            } => log::error!("Roster for {} {}: {}", roster.date, delivery, reason),
        }
        result
    }
}
