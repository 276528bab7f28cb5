//! Caller-facing outcome of an import.

use serde::Serialize;

use crate::error::{Delivery, ImportError};

/// Both portal bodies of a confirmed import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmed {
    pub upload_response: String,
    pub confirmation_response: String,
}

/// Final outcome of one submission attempt.
///
/// There is no partial success: a roster is either confirmed or it is not.
/// A failure still says whether anything reached the portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmissionResult {
    Success {
        upload_response: String,
        confirmation_response: String,
    },
    Failure {
        reason: String,
        http_status: Option<u16>,
        delivery: Delivery,
        #[serde(skip)]
        error: ImportError,
    },
}

impl SubmissionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionResult::Success { .. })
    }

    /// Body of the confirmation response, on success.
    pub fn final_body(&self) -> Option<&str> {
        match self {
            SubmissionResult::Success {
                confirmation_response,
                ..
            } => Some(confirmation_response),
            SubmissionResult::Failure { .. } => None,
        }
    }

    /// Underlying error, on failure.
    pub fn error(&self) -> Option<&ImportError> {
        match self {
            SubmissionResult::Success { .. } => None,
            SubmissionResult::Failure { error, .. } => Some(error),
        }
    }

    /// Whether the failure left an unconfirmed upload on the portal.
    pub fn needs_reconciliation(&self) -> bool {
        matches!(
            self,
            SubmissionResult::Failure {
                delivery: Delivery::UploadedUnconfirmed,
                ..
            }
        )
    }
}

impl From<Confirmed> for SubmissionResult {
    fn from(done: Confirmed) -> Self {
        SubmissionResult::Success {
            upload_response: done.upload_response,
            confirmation_response: done.confirmation_response,
        }
    }
}

impl From<ImportError> for SubmissionResult {
    fn from(error: ImportError) -> Self {
        SubmissionResult::Failure {
            reason: error.to_string(),
            http_status: error.http_status(),
            delivery: error.delivery(),
            error,
        }
    }
}

impl From<std::result::Result<Confirmed, ImportError>> for SubmissionResult {
    fn from(outcome: std::result::Result<Confirmed, ImportError>) -> Self {
        match outcome {
            Ok(done) => done.into(),
            Err(error) => error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_carries_final_body() {
        let result = SubmissionResult::from(Ok(Confirmed {
            upload_response: "step1".into(),
            confirmation_response: "step2".into(),
        }));
        assert!(result.is_success());
        assert_eq!(result.final_body(), Some("step2"));
        assert!(result.error().is_none());
    }

    #[test]
    fn test_upload_rejection_is_not_uploaded() {
        let result = SubmissionResult::from(ImportError::UploadRejected {
            status: 500,
            body: "boom".into(),
        });
        match &result {
            SubmissionResult::Failure {
                reason,
                http_status,
                delivery,
                ..
            } => {
                assert_eq!(reason, "upload rejected (500): boom");
                assert_eq!(*http_status, Some(500));
                assert_eq!(*delivery, Delivery::NotUploaded);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(!result.needs_reconciliation());
    }

    #[test]
    fn test_missing_field_needs_reconciliation() {
        let result = SubmissionResult::from(ImportError::ConfirmationFieldMissing {
            upload_body: "<p>ok</p>".into(),
        });
        assert!(result.needs_reconciliation());
        assert_eq!(result.final_body(), None);
    }

    #[test]
    fn test_serialized_shape() {
        let result = SubmissionResult::from(ImportError::ConfirmationRejected {
            status: 502,
            body: String::new(),
        });
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["outcome"], "failure");
        assert_eq!(json["http_status"], 502);
        assert_eq!(json["delivery"], "uploaded_unconfirmed");
        assert!(json.get("error").is_none());
    }
}
