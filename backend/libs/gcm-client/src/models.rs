use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// GCM Message Request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GcmMessage {
    pub registration_ids: Vec<String>,
    #[serde(skip_serializing_if = "is_empty_data")]
    pub data: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_live: Option<u32>,
    #[serde(skip_serializing_if = "is_empty_str")]
    pub collapse_key: Option<String>,
}

fn is_empty_data(data: &Option<Map<String, Value>>) -> bool {
    data.as_ref().map_or(true, Map::is_empty)
}

fn is_empty_str(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

impl GcmMessage {
    pub fn new<I, S>(registration_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            registration_ids: registration_ids.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_collapse_key(mut self, collapse_key: impl Into<String>) -> Self {
        self.collapse_key = Some(collapse_key.into());
        self
    }

    /// Seconds the gateway keeps the message while the device is offline
    pub fn with_time_to_live(mut self, seconds: u32) -> Self {
        self.time_to_live = Some(seconds);
        self
    }
}

/// GCM API Response body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GcmResponseBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multicast_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_ids: Option<u64>,
    #[serde(default)]
    pub results: Vec<GcmResult>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GcmResponseBody {
    pub fn failure_count(&self) -> u64 {
        self.failure.unwrap_or(0)
    }

    pub fn canonical_count(&self) -> u64 {
        self.canonical_ids.unwrap_or(0)
    }
}

/// Per-recipient result entry, aligned with `registration_ids` by position
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GcmResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// GCM send result
#[derive(Debug, Clone, PartialEq)]
pub struct GcmResponse {
    pub status: u16,
    pub body: GcmResponseBody,
    /// Canonical registration id → original registration ids it replaces.
    /// Empty unless the gateway reported a non-zero `canonical_ids` count.
    pub canonical_ids: IndexMap<String, Vec<String>>,
}

impl GcmResponse {
    pub fn has_canonical_ids(&self) -> bool {
        !self.canonical_ids.is_empty()
    }
}

/// Group the original registration ids by the value `select` picks out of
/// each positionally-aligned result. Keys and ids keep first-seen order.
pub(crate) fn group_by_result<'a, F>(
    registration_ids: &[String],
    results: &'a [GcmResult],
    select: F,
) -> IndexMap<&'a str, Vec<String>>
where
    F: Fn(&'a GcmResult) -> Option<&'a str>,
{
    let mut groups: IndexMap<&str, Vec<String>> = IndexMap::new();
    for (id, result) in registration_ids.iter().zip(results) {
        if let Some(key) = select(result) {
            groups.entry(key).or_default().push(id.clone());
        }
    }
    groups
}
