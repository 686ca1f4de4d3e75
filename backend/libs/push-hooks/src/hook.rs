use serde_json::Value;

use crate::errors::HookError;
use crate::models::{AccessKeyRecord, NotificationRecord};

/// Trait for application payload hooks
///
/// The dispatch pipeline calls a hook before handing a record to the platform
/// clients. Hooks return a new record and never mutate their input.
#[async_trait::async_trait]
pub trait PayloadHook: Send + Sync {
    /// Shapes a notification record into per-platform payload fragments
    async fn process_push_payload(
        &self,
        record: &NotificationRecord,
    ) -> Result<NotificationRecord, HookError>;

    /// Decides which API permissions an access key request receives
    async fn process_accesskey_payload(
        &self,
        record: &AccessKeyRecord,
    ) -> Result<AccessKeyRecord, HookError>;

    /// Token registration payloads are forwarded unchanged by default
    async fn process_token_payload(&self, record: Value) -> Result<Value, HookError> {
        Ok(pass_through(record))
    }
}

pub type DynPayloadHook = Box<dyn PayloadHook>;

/// Identity hook
pub fn pass_through<T>(record: T) -> T {
    record
}
