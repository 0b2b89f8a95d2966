//! Submission coordination: full-form validation, payload dispatch,
//! and the success/failure state transitions.
//!
//! The network seam is the [`Submitter`] trait. The engine ships an
//! HTTP implementation behind the `client` feature and a static one
//! for hosts and tests that want to stub the endpoint. One submission
//! runs at a time: a `submit()` call while another is in flight is a
//! no-op, guarded by the submission status rather than a queue. The
//! request is not cancellable and has no timeout; it runs to
//! completion or transport failure.

use std::collections::BTreeMap;

use async_trait::async_trait;
use intake_schema::FormSchema;

use crate::config::EngineConfig;
use crate::payload::{self, HoneypotCapture, PayloadPart};
use crate::state::{FormState, SubmissionStatus};
use crate::validate;

// ──────────────────────────────────────────────
// Errors and replies
// ──────────────────────────────────────────────

/// Successful response data: an identifier, plus an optional title used
/// only for the analytics callback.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitReply {
    pub id: String,
    pub title: Option<String>,
}

/// Errors from a submission attempt.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SubmitError {
    /// The server rejected the submission, possibly with per-field
    /// errors to merge into the client error map.
    #[error("submission rejected: {message}")]
    Rejected {
        message: String,
        field_errors: BTreeMap<String, String>,
    },
    /// Transport-level failure: the request never completed.
    #[error("network error: {0}")]
    Network(String),
    /// The server responded but the body was not usable.
    #[error("unexpected response from server: {0}")]
    BadResponse(String),
}

/// Parse a success body. Accepts a string or numeric `id`.
pub fn reply_from_json(body: &serde_json::Value) -> Result<SubmitReply, SubmitError> {
    let id = match body.get("id") {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => {
            return Err(SubmitError::BadResponse(
                "success body is missing an 'id'".to_string(),
            ))
        }
    };
    let title = body
        .get("title")
        .and_then(|v| v.as_str())
        .map(str::to_string);
    Ok(SubmitReply { id, title })
}

/// Parse a failure body into a rejection: a top-level `message` and an
/// optional `errors` object of per-field messages.
pub fn rejection_from_json(body: &serde_json::Value, fallback: &str) -> SubmitError {
    let message = body
        .get("message")
        .and_then(|v| v.as_str())
        .unwrap_or(fallback)
        .to_string();
    let field_errors = body
        .get("errors")
        .and_then(|v| v.as_object())
        .map(|map| {
            map.iter()
                .map(|(k, v)| {
                    let text = v
                        .as_str()
                        .map(str::to_string)
                        .unwrap_or_else(|| v.to_string());
                    (k.clone(), text)
                })
                .collect()
        })
        .unwrap_or_default();
    SubmitError::Rejected {
        message,
        field_errors,
    }
}

// ──────────────────────────────────────────────
// Submitter seam
// ──────────────────────────────────────────────

/// Delivers an assembled payload to the application endpoint.
#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, parts: &[PayloadPart]) -> Result<SubmitReply, SubmitError>;
}

/// A submitter that returns a fixed result. Useful for hosts without a
/// live endpoint and for tests.
pub struct StaticSubmitter {
    result: Result<SubmitReply, SubmitError>,
}

impl StaticSubmitter {
    pub fn new(result: Result<SubmitReply, SubmitError>) -> StaticSubmitter {
        StaticSubmitter { result }
    }

    pub fn accepting(id: &str) -> StaticSubmitter {
        StaticSubmitter::new(Ok(SubmitReply {
            id: id.to_string(),
            title: None,
        }))
    }
}

#[async_trait]
impl Submitter for StaticSubmitter {
    async fn submit(&self, _parts: &[PayloadPart]) -> Result<SubmitReply, SubmitError> {
        self.result.clone()
    }
}

// ──────────────────────────────────────────────
// Coordinator
// ──────────────────────────────────────────────

/// Host callback invoked once per accepted submission.
pub type AnalyticsHook = Box<dyn Fn(&SubmitReply) + Send + Sync>;

/// Outcome of a `submit()` call, including the UI signal the caller
/// should act on.
pub enum SubmitOutcome {
    /// Client validation failed. The caller should scroll to and focus
    /// the named field, the first failing one in document order.
    Invalid { first_invalid: String },
    /// Another submission is in flight; this call did nothing.
    AlreadyInFlight,
    /// The submission was accepted. The caller should scroll to the top
    /// of the form.
    Submitted { reply: SubmitReply },
    /// The submission failed; the message is ready for display and the
    /// form stays editable for retry.
    Failed { message: String },
}

/// Orchestrates validation, payload assembly, and the network call.
pub struct SubmissionCoordinator<S: Submitter> {
    submitter: S,
    analytics: Option<AnalyticsHook>,
}

impl<S: Submitter> SubmissionCoordinator<S> {
    pub fn new(submitter: S) -> SubmissionCoordinator<S> {
        SubmissionCoordinator {
            submitter,
            analytics: None,
        }
    }

    pub fn with_analytics(mut self, hook: AnalyticsHook) -> SubmissionCoordinator<S> {
        self.analytics = Some(hook);
        self
    }

    /// Run one submission attempt end to end.
    pub async fn submit(
        &self,
        schema: &FormSchema,
        config: &EngineConfig,
        state: &mut FormState,
        honeypot: Option<&HoneypotCapture>,
    ) -> SubmitOutcome {
        if state.status == SubmissionStatus::Submitting {
            return SubmitOutcome::AlreadyInFlight;
        }

        if let Some(first_invalid) = validate::validate_all(schema, config, state) {
            return SubmitOutcome::Invalid { first_invalid };
        }

        state.status = SubmissionStatus::Submitting;
        let parts = payload::assemble(schema, state, honeypot);

        match self.submitter.submit(&parts).await {
            Ok(reply) => {
                state.status = SubmissionStatus::Submitted;
                if let Some(hook) = &self.analytics {
                    hook(&reply);
                }
                SubmitOutcome::Submitted { reply }
            }
            Err(SubmitError::Rejected {
                message,
                field_errors,
            }) => {
                // Server-side errors can land on fields the client
                // considered valid; they render like client errors.
                state.errors.extend(field_errors);
                state.status = SubmissionStatus::Failed;
                SubmitOutcome::Failed { message }
            }
            Err(_) => {
                state.status = SubmissionStatus::Failed;
                SubmitOutcome::Failed {
                    message: config.messages.get("submit_failed"),
                }
            }
        }
    }
}

// ──────────────────────────────────────────────
// HTTP submitter
// ──────────────────────────────────────────────

/// Multipart POST submitter over a blocking HTTP client, wrapped in
/// `tokio::task::spawn_blocking` to keep the async runtime unblocked.
#[cfg(feature = "client")]
pub struct HttpSubmitter {
    endpoint: String,
    auth_token: Option<String>,
}

#[cfg(feature = "client")]
impl HttpSubmitter {
    pub fn new(endpoint: impl Into<String>) -> HttpSubmitter {
        HttpSubmitter {
            endpoint: endpoint.into(),
            auth_token: None,
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> HttpSubmitter {
        self.auth_token = Some(token.into());
        self
    }
}

#[cfg(feature = "client")]
#[async_trait]
impl Submitter for HttpSubmitter {
    async fn submit(&self, parts: &[PayloadPart]) -> Result<SubmitReply, SubmitError> {
        let endpoint = self.endpoint.clone();
        let auth_token = self.auth_token.clone();
        let parts = parts.to_vec();

        let result = tokio::task::spawn_blocking(move || {
            let mut form = reqwest::blocking::multipart::Form::new();
            for part in parts {
                match part {
                    PayloadPart::Field { key, value } => {
                        form = form.text(key, value);
                    }
                    PayloadPart::File { key, file } => {
                        let file_part = reqwest::blocking::multipart::Part::bytes(file.data)
                            .file_name(file.name)
                            .mime_str(&file.mime_type)
                            .map_err(|e| SubmitError::Network(e.to_string()))?;
                        form = form.part(key, file_part);
                    }
                }
            }

            let client = reqwest::blocking::Client::new();
            let mut request = client.post(&endpoint).multipart(form);
            if let Some(token) = &auth_token {
                request = request.bearer_auth(token);
            }

            let response = request
                .send()
                .map_err(|e| SubmitError::Network(e.to_string()))?;
            let status = response.status();

            if status.is_success() {
                let body: serde_json::Value = response
                    .json()
                    .map_err(|e| SubmitError::BadResponse(e.to_string()))?;
                reply_from_json(&body)
            } else {
                let body: serde_json::Value = response.json().unwrap_or(serde_json::Value::Null);
                Err(rejection_from_json(
                    &body,
                    &format!("server returned status {}", status.as_u16()),
                ))
            }
        })
        .await
        .map_err(|e| SubmitError::Network(format!("task join error: {}", e)))?;

        result
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reply_accepts_string_or_numeric_id() {
        let reply = reply_from_json(&json!({ "id": "app-9", "title": "Backend Engineer" })).unwrap();
        assert_eq!(reply.id, "app-9");
        assert_eq!(reply.title.as_deref(), Some("Backend Engineer"));

        let reply = reply_from_json(&json!({ "id": 42 })).unwrap();
        assert_eq!(reply.id, "42");
        assert_eq!(reply.title, None);
    }

    #[test]
    fn reply_without_id_is_bad_response() {
        let err = reply_from_json(&json!({ "ok": true })).unwrap_err();
        assert!(matches!(err, SubmitError::BadResponse(_)));
    }

    #[test]
    fn rejection_parses_message_and_field_errors() {
        let err = rejection_from_json(
            &json!({
                "message": "Please review your answers.",
                "errors": { "email": "Address already used.", "age": 17 }
            }),
            "fallback",
        );
        match err {
            SubmitError::Rejected {
                message,
                field_errors,
            } => {
                assert_eq!(message, "Please review your answers.");
                assert_eq!(
                    field_errors.get("email").map(String::as_str),
                    Some("Address already used.")
                );
                assert_eq!(field_errors.get("age").map(String::as_str), Some("17"));
            }
            other => panic!("expected rejection, got {}", other),
        }
    }

    #[cfg(feature = "client")]
    #[tokio::test]
    async fn http_submitter_surfaces_transport_failure() {
        // Discard port on loopback: refused immediately, no traffic
        // leaves the machine.
        let submitter = HttpSubmitter::new("http://127.0.0.1:9/apply");
        let parts = vec![PayloadPart::Field {
            key: "name".to_string(),
            value: "Robin".to_string(),
        }];
        let err = submitter.submit(&parts).await.unwrap_err();
        assert!(matches!(err, SubmitError::Network(_)));
    }

    #[test]
    fn rejection_falls_back_when_body_is_unusable() {
        let err = rejection_from_json(&serde_json::Value::Null, "server returned status 502");
        match err {
            SubmitError::Rejected {
                message,
                field_errors,
            } => {
                assert_eq!(message, "server returned status 502");
                assert!(field_errors.is_empty());
            }
            other => panic!("expected rejection, got {}", other),
        }
    }
}
