/// GCM Client Library
///
/// Client for the Google Cloud Messaging HTTP gateway.
///
/// It handles:
/// - Request building for multi-recipient messages (data, collapse key, TTL)
/// - Status code classification (400, 401, 5xx)
/// - Canonical registration id grouping
/// - Per-recipient delivery error aggregation
/// - Retry with exponential backoff for transient gateway failures

pub mod client;
pub mod config;
pub mod errors;
pub mod models;

pub use client::GcmClient;
pub use config::{GcmConfig, GCM_ENDPOINT};
pub use errors::{DeliveryError, DeliveryErrorCode, DeliveryFailure, GcmError};
pub use models::{GcmMessage, GcmResponse, GcmResponseBody, GcmResult};
pub use resilience::RetryConfig;
