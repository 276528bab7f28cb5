// src/services/submission.rs

//! Two-phase portal submission.
//!
//! The portal has no API, only the form a browser would use: the roster is
//! uploaded as raw text, the portal answers with a page holding hidden fields,
//! and those fields are posted back to the same URL to confirm ("Salvar").
//!
//! ```text
//! Idle → Uploading → AwaitingConfirmation → Confirming → Done
//!            └──────────────┴───────────────────┴──────→ Failed
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::{AbortHandle, AbortRegistration, Abortable};

use crate::error::{ImportError, Phase};
use crate::models::{Confirmed, HiddenFieldSet, PortalResponse, SubmissionResult, SubmissionToken};
use crate::services::encoder::EncodedBody;
use crate::services::hidden;
use crate::transport::{Transport, TransportRequest, TransportResponse};

pub const UPLOAD_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
pub const UPLOAD_ACCEPT: &str = "application/json, text/html;q=0.9,*/*;q=0.8";
pub const CONFIRM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";
pub const CONFIRM_ACCEPT: &str = "text/html,application/json;q=0.9,*/*;q=0.8";

/// States of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Uploading,
    AwaitingConfirmation {
        upload: PortalResponse,
    },
    Confirming {
        upload: PortalResponse,
        fields: HiddenFieldSet,
    },
    Done(Confirmed),
    Failed(ImportError),
}

impl SubmissionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionState::Done(_) | SubmissionState::Failed(_))
    }

    fn name(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "Idle",
            SubmissionState::Uploading => "Uploading",
            SubmissionState::AwaitingConfirmation { .. } => "AwaitingConfirmation",
            SubmissionState::Confirming { .. } => "Confirming",
            SubmissionState::Done(_) => "Done",
            SubmissionState::Failed(_) => "Failed",
        }
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Cancellation side of an abortable submission.
///
/// Create with [`SubmissionAbort::new`], keep the returned [`AbortHandle`], and
/// hand this value to [`SubmissionEngine::submit_abortable`].
#[derive(Debug)]
pub struct SubmissionAbort {
    handle: AbortHandle,
    registration: AbortRegistration,
}

impl SubmissionAbort {
    pub fn new() -> (AbortHandle, Self) {
        let (handle, registration) = AbortHandle::new_pair();
        (
            handle.clone(),
            Self {
                handle,
                registration,
            },
        )
    }
}

/// How far a submission got, readable after it was aborted.
#[derive(Debug, Default)]
struct Progress {
    uploaded: AtomicBool,
    confirming: AtomicBool,
}

impl Progress {
    fn phase(&self) -> Phase {
        if self.confirming.load(Ordering::SeqCst) {
            Phase::Confirmation
        } else {
            Phase::Upload
        }
    }

    fn aborted(&self) -> ImportError {
        ImportError::Aborted {
            phase: self.phase(),
            uploaded: self.uploaded.load(Ordering::SeqCst),
        }
    }
}

/// Drives submissions over a transport.
///
/// Holds no per-submission state; every call is an independent run of the
/// state machine. No retries and no timeouts are applied here.
#[derive(Clone)]
pub struct SubmissionEngine {
    transport: Arc<dyn Transport>,
}

impl SubmissionEngine {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Upload and confirm a roster.
    pub async fn submit(&self, token: &SubmissionToken, body: &EncodedBody) -> SubmissionResult {
        self.run(token, body, &Progress::default(), None).await.into()
    }

    /// Like [`submit`](Self::submit), but cancellable through the paired
    /// [`AbortHandle`].
    ///
    /// Once aborted, the confirmation request is never issued, even if the
    /// upload response already arrived.
    pub async fn submit_abortable(
        &self,
        token: &SubmissionToken,
        body: &EncodedBody,
        abort: SubmissionAbort,
    ) -> SubmissionResult {
        let progress = Progress::default();
        let run = self.run(token, body, &progress, Some(&abort.handle));
        match Abortable::new(run, abort.registration).await {
            Ok(outcome) => outcome.into(),
            Err(_) => {
                let error = progress.aborted();
                log::warn!("Submission {}", error);
                error.into()
            }
        }
    }

    async fn run(
        &self,
        token: &SubmissionToken,
        body: &EncodedBody,
        progress: &Progress,
        abort: Option<&AbortHandle>,
    ) -> Result<Confirmed, ImportError> {
        let mut state = SubmissionState::Idle;

        loop {
            match state {
                SubmissionState::Done(done) => return Ok(done),
                SubmissionState::Failed(error) => return Err(error),
                _ if abort.is_some_and(AbortHandle::is_aborted) => {
                    return Err(progress.aborted());
                }
                current => {
                    let from = current.name();
                    state = self.step(current, token, body, progress).await;
                    log::debug!("Submission state: {} → {}", from, state);
                }
            }
        }
    }

    /// Advance the state machine by one transition.
    async fn step(
        &self,
        state: SubmissionState,
        token: &SubmissionToken,
        body: &EncodedBody,
        progress: &Progress,
    ) -> SubmissionState {
        match state {
            SubmissionState::Idle => SubmissionState::Uploading,

            SubmissionState::Uploading => {
                // Set before sending: once the request is in flight the portal
                // may have received it, so an abort from here on is unconfirmed.
                progress.uploaded.store(true, Ordering::SeqCst);
                match self.upload(token, body).await {
                    Ok(upload) => SubmissionState::AwaitingConfirmation { upload },
                    Err(error) => SubmissionState::Failed(error),
                }
            }

            SubmissionState::AwaitingConfirmation { upload } => {
                let fields = hidden::extract(upload.html());
                log::debug!("Found {} hidden field(s) in upload response", fields.len());

                if fields.has_confirmation() {
                    SubmissionState::Confirming { upload, fields }
                } else {
                    log::warn!("Upload accepted but no usable hidden 'sql' field was returned");
                    SubmissionState::Failed(ImportError::ConfirmationFieldMissing {
                        upload_body: upload.into_raw(),
                    })
                }
            }

            SubmissionState::Confirming { upload, fields } => {
                progress.confirming.store(true, Ordering::SeqCst);
                match self.confirm(token, &fields).await {
                    Ok(confirmation) => SubmissionState::Done(Confirmed {
                        upload_response: upload.into_raw(),
                        confirmation_response: confirmation.body,
                    }),
                    Err(error) => SubmissionState::Failed(error),
                }
            }

            terminal => terminal,
        }
    }

    /// Phase 1: post the roster as a raw text stream.
    async fn upload(
        &self,
        token: &SubmissionToken,
        body: &EncodedBody,
    ) -> Result<PortalResponse, ImportError> {
        log::info!(
            "Uploading {} record(s) ({} bytes, sha256 {}) to {}",
            body.record_count(),
            body.len(),
            body.digest(),
            redacted(token)
        );

        let request = TransportRequest::post(token.endpoint().clone(), body.as_str())
            .header("Content-Type", UPLOAD_CONTENT_TYPE)
            .header("Accept", UPLOAD_ACCEPT);
        let response = self.send(Phase::Upload, request).await?;

        if !response.is_success() {
            return Err(ImportError::UploadRejected {
                status: response.status,
                body: response.body,
            });
        }

        let upload = PortalResponse::parse(response.body);
        if let Some(status) = upload.status() {
            log::info!("Portal status: {}", status);
        }
        if let Some(portal_log) = upload.log() {
            log::debug!("Portal log: {}", portal_log);
        }
        Ok(upload)
    }

    /// Phase 2: post every hidden field back to the same URL.
    async fn confirm(
        &self,
        token: &SubmissionToken,
        fields: &HiddenFieldSet,
    ) -> Result<TransportResponse, ImportError> {
        log::info!(
            "Confirming upload with {} hidden field(s) to {}",
            fields.len(),
            redacted(token)
        );

        let request = TransportRequest::post(token.endpoint().clone(), fields.to_form_body())
            .header("Content-Type", CONFIRM_CONTENT_TYPE)
            .header("Accept", CONFIRM_ACCEPT);
        let response = self.send(Phase::Confirmation, request).await?;

        if !response.is_success() {
            return Err(ImportError::ConfirmationRejected {
                status: response.status,
                body: response.body,
            });
        }

        log::info!("Portal confirmed the upload ({})", response.status);
        Ok(response)
    }

    async fn send(
        &self,
        phase: Phase,
        request: TransportRequest,
    ) -> Result<TransportResponse, ImportError> {
        let response = self
            .transport
            .post(request)
            .await
            .map_err(|e| ImportError::Transport {
                phase,
                message: e.to_string(),
            })?;
        log::debug!("{} answered {}", phase, response.status);
        Ok(response)
    }
}

/// Endpoint without its query string; the query carries the access key.
fn redacted(token: &SubmissionToken) -> String {
    let endpoint = token.endpoint();
    format!(
        "{}://{}{}",
        endpoint.scheme(),
        endpoint.host_str().unwrap_or_default(),
        endpoint.path()
    )
}
