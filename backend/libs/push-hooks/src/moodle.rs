use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::HubConfig;
use crate::errors::HookError;
use crate::hook::PayloadHook;
use crate::models::*;
use crate::permissions::Permissions;

pub const APP_TITLE: &str = "Moodle Mobile";

/// Payload hook for the Moodle mobile app
#[derive(Clone)]
pub struct MoodleHook {
    config: HubConfig,
    http_client: reqwest::Client,
}

impl MoodleHook {
    /// Creates a new Moodle hook
    ///
    /// # Arguments
    /// * `config` - Hub URL and request timeout used by site verification
    pub fn new(config: HubConfig) -> Result<Self, HookError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| HookError::Config(format!("failed to build HTTP client: {e}")))?;

        info!("Initialized Moodle hook with hub_url={}", config.hub_url);

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn with_http_client(config: HubConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    /// Checks the site against the hub and grants every API permission when
    /// it is registered.
    ///
    /// # Returns
    /// A copy of `record` with `permission` set to [`Permissions::ALL`], or
    /// `Err(HookError::SiteNotRegistered)` when the hub answers `0`
    pub async fn verify_site(
        &self,
        record: &AccessKeyRecord,
    ) -> Result<AccessKeyRecord, HookError> {
        let response = self
            .http_client
            .get(&self.config.hub_url)
            .query(&[("siteid", record.siteid.as_str()), ("url", record.url.as_str())])
            .send()
            .await
            .map_err(|e| HookError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Hub check for site {} returned {}", record.url, status);
            return Err(HookError::HubUnavailable(status.as_u16()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| HookError::Request(e.to_string()))?;
        let result: i64 = text
            .trim()
            .parse()
            .map_err(|_| HookError::InvalidHubResponse(text.trim().to_string()))?;

        if result == 0 {
            warn!("Site {} ({}) is not registered on the hub", record.url, record.siteid);
            return Err(HookError::SiteNotRegistered);
        }

        debug!("Site {} verified by hub, granting {}", record.url, Permissions::ALL);

        Ok(AccessKeyRecord {
            permission: Some(Permissions::ALL),
            ..record.clone()
        })
    }
}

#[async_trait::async_trait]
impl PayloadHook for MoodleHook {
    async fn process_push_payload(
        &self,
        record: &NotificationRecord,
    ) -> Result<NotificationRecord, HookError> {
        Ok(adapt_for_push(record))
    }

    async fn process_accesskey_payload(
        &self,
        record: &AccessKeyRecord,
    ) -> Result<AccessKeyRecord, HookError> {
        self.verify_site(record).await
    }
}

/// Builds the per-platform fragments of a Moodle notification.
///
/// `gcm` and `apns` are always rewritten from `extra`, whatever shape they
/// arrived in. `alert`, `extra.wns`
/// and `extra.mpns` are only filled in when missing, so applying this twice
/// yields the same record.
pub fn adapt_for_push(record: &NotificationRecord) -> NotificationRecord {
    let mut adapted = record.clone();
    let extra = &record.extra;

    let message = extra
        .smallmessage
        .as_deref()
        .filter(|m| !m.is_empty())
        .or(extra.fullmessage.as_deref());

    let fragment = AppFragment {
        title: APP_TITLE.to_string(),
        site: extra.site.clone(),
        userfrom: extra.userfromfullname.clone(),
        notif: extra.notification.clone(),
    };
    adapted.gcm = Some(Fragment::Built(GcmPayload {
        data: fragment.clone(),
    }));
    adapted.apns = Some(Fragment::Built(ApnsPayload { custom: fragment }));

    if adapted.alert.is_none() {
        adapted.alert = message.map(|m| Value::String(m.to_string()));
    }
    let alert = adapted.alert.as_ref();

    if adapted.extra.wns.is_none() {
        adapted.extra.wns = Some(Fragment::Built(WnsToast::new(alert)));
    }
    if adapted.extra.mpns.is_none() {
        adapted.extra.mpns = Some(Fragment::Built(MpnsToast::new(alert)));
    }

    adapted
}
