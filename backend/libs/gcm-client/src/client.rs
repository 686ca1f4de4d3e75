use indexmap::IndexMap;
use reqwest::StatusCode;
use resilience::with_retry;
use tracing::{debug, error, info, warn};

use crate::config::GcmConfig;
use crate::errors::{DeliveryErrorCode, DeliveryFailure, GcmError};
use crate::models::*;

/// Google Cloud Messaging HTTP Client
///
/// Sends one JSON POST per attempt to the GCM endpoint and maps the
/// gateway's status codes and per-recipient errors onto [`GcmError`].
#[derive(Clone)]
pub struct GcmClient {
    config: GcmConfig,
    http_client: reqwest::Client,
}

impl GcmClient {
    /// Create new GCM client
    pub fn new(config: GcmConfig) -> Result<Self, GcmError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GcmError::Config(format!("failed to build HTTP client: {}", e)))?;

        info!(
            "Initialized GCM client for app={}, project={}, endpoint={}",
            config.app_name, config.project_number, config.endpoint
        );

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Create a client around an existing `reqwest::Client`
    pub fn with_http_client(config: GcmConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    pub fn config(&self) -> &GcmConfig {
        &self.config
    }

    /// Send message to the GCM endpoint
    ///
    /// `retries` is the number of extra attempts made after a transient
    /// failure (5xx or transport error). Delivery errors reported in the
    /// response body are never retried.
    pub async fn send(&self, message: &GcmMessage, retries: u32) -> Result<GcmResponse, GcmError> {
        if message.registration_ids.is_empty() {
            return Err(GcmError::EmptyRecipients);
        }

        let payload = serde_json::to_string(message)
            .map_err(|e| GcmError::SendRequest(format!("failed to serialize request: {}", e)))?;

        debug!(
            "Sending GCM message to {} recipients (first token {})",
            message.registration_ids.len(),
            token_prefix(&message.registration_ids[0])
        );

        let retry = self.config.retry.clone().with_max_retries(retries);
        let (status, body) = with_retry(retry, GcmError::is_retryable, || self.post(&payload))
            .await
            .map_err(|e| e.into_inner())?;

        classify_response(&message.registration_ids, status, body)
    }

    /// One POST attempt, returning the status and parsed body of a non-error response
    async fn post(&self, payload: &str) -> Result<(u16, GcmResponseBody), GcmError> {
        let response = self
            .http_client
            .post(&self.config.endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("key={}", self.config.api_key))
            .body(payload.to_owned())
            .send()
            .await
            .map_err(|e| {
                error!("GCM send request failed: {}", e);
                GcmError::SendRequest(e.to_string())
            })?;

        let status = response.status();
        match status {
            StatusCode::BAD_REQUEST => return Err(GcmError::MalformedRequest),
            StatusCode::UNAUTHORIZED => return Err(GcmError::Authentication),
            s if s.as_u16() >= 500 => {
                return Err(GcmError::GatewayUnavailable {
                    status: s.as_u16(),
                })
            }
            _ => {}
        }

        let body: GcmResponseBody = response
            .json()
            .await
            .map_err(|e| GcmError::ResponseParse(e.to_string()))?;

        Ok((status.as_u16(), body))
    }
}

/// Normalize canonical ids and turn per-recipient errors into a [`DeliveryFailure`]
fn classify_response(
    registration_ids: &[String],
    status: u16,
    body: GcmResponseBody,
) -> Result<GcmResponse, GcmError> {
    let canonical_ids: IndexMap<String, Vec<String>> = if body.canonical_count() != 0 {
        group_by_result(registration_ids, &body.results, |r| {
            r.registration_id.as_deref()
        })
        .into_iter()
        .map(|(canonical, ids)| (canonical.to_string(), ids))
        .collect()
    } else {
        IndexMap::new()
    };

    if !canonical_ids.is_empty() {
        warn!(
            "GCM reported {} canonical ids, stored registration ids must be migrated",
            canonical_ids.len()
        );
    }

    let errors: Vec<_> = if body.failure_count() != 0 {
        group_by_result(registration_ids, &body.results, |r| r.error.as_deref())
            .into_iter()
            .map(|(code, ids)| DeliveryErrorCode::parse(code).into_error(ids))
            .collect()
    } else {
        Vec::new()
    };

    let response = GcmResponse {
        status,
        body,
        canonical_ids,
    };

    let mut errors = errors.into_iter();
    let Some(first) = errors.next() else {
        return Ok(response);
    };

    let failure = DeliveryFailure::new(first, errors.collect(), response);
    warn!(
        "GCM delivery failed: {} ({} stale registration ids)",
        failure,
        failure.stale_registration_ids().len()
    );
    Err(GcmError::Delivery(Box::new(failure)))
}

fn token_prefix(token: &str) -> String {
    token.chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DeliveryError;
    use serde_json::json;

    fn ids(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    fn body(value: serde_json::Value) -> GcmResponseBody {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_gcm_client_creation() {
        let client = GcmClient::new(GcmConfig::new("123456", "api-key", "moodlemobile")).unwrap();
        assert_eq!(client.config().project_number, "123456");
        assert_eq!(client.config().endpoint, crate::config::GCM_ENDPOINT);
    }

    #[test]
    fn test_clean_response_is_unmodified() {
        let raw = json!({
            "multicast_id": 1,
            "success": 2,
            "failure": 0,
            "canonical_ids": 0,
            "results": [{ "message_id": "1:1" }, { "message_id": "1:2" }]
        });

        let response = classify_response(&ids(&["A", "B"]), 200, body(raw.clone())).unwrap();
        assert_eq!(response.status, 200);
        assert!(!response.has_canonical_ids());
        assert_eq!(serde_json::to_value(&response.body).unwrap(), raw);
    }

    #[test]
    fn test_canonical_ids_grouped() {
        let raw = json!({
            "success": 3,
            "failure": 0,
            "canonical_ids": 2,
            "results": [
                { "message_id": "1:1", "registration_id": "X" },
                { "message_id": "1:2" },
                { "message_id": "1:3", "registration_id": "X" }
            ]
        });

        let response = classify_response(&ids(&["A", "B", "C"]), 200, body(raw)).unwrap();
        assert_eq!(response.canonical_ids.len(), 1);
        assert_eq!(response.canonical_ids["X"], vec!["A", "C"]);
    }

    #[test]
    fn test_canonical_ids_ignored_when_count_is_zero() {
        let raw = json!({
            "failure": 0,
            "canonical_ids": 0,
            "results": [{ "message_id": "1:1", "registration_id": "X" }]
        });

        let response = classify_response(&ids(&["A"]), 200, body(raw)).unwrap();
        assert!(response.canonical_ids.is_empty());
    }

    #[test]
    fn test_failures_aggregated_in_first_seen_order() {
        let raw = json!({
            "failure": 2,
            "results": [{ "error": "NotRegistered" }, { "error": "InvalidRegistration" }]
        });

        let err = classify_response(&ids(&["A", "B"]), 200, body(raw)).unwrap_err();
        let failure = err.as_delivery().expect("delivery failure");

        assert_eq!(failure.first(), &DeliveryError::NotRegistered(ids(&["A"])));
        assert_eq!(
            failure.errors()[1],
            DeliveryError::InvalidRegistration(ids(&["B"]))
        );
        assert_eq!(failure.stale_registration_ids(), vec!["A", "B"]);
        assert!(err.to_string().starts_with("Not Registered"));
    }

    #[test]
    fn test_failure_count_without_error_entries_succeeds() {
        let raw = json!({
            "failure": 1,
            "results": [{ "message_id": "1:1" }]
        });

        assert!(classify_response(&ids(&["A"]), 200, body(raw)).is_ok());
    }

    #[test]
    fn test_token_prefix() {
        assert_eq!(token_prefix("APA91bHun4MxP5egoKMwt2KZFBaFUH"), "APA91bHu");
        assert_eq!(token_prefix("abc"), "abc");
    }
}
