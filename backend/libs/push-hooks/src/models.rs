use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::permissions::Permissions;

/// Notification record handed over by the dispatch pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// Usually a string, but APNs style `{title, body}` objects are kept as-is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<Value>,
    #[serde(default)]
    pub extra: NotificationExtra,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gcm: Option<Fragment<GcmPayload>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apns: Option<Fragment<ApnsPayload>>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Application specific part of a notification record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationExtra {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub userfromfullname: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timecreated: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smallmessage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fullmessage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wns: Option<Fragment<WnsToast>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mpns: Option<Fragment<MpnsToast>>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// A platform fragment built by a hook, or whatever the pipeline sent in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fragment<T> {
    Built(T),
    Raw(Value),
}

impl<T> Fragment<T> {
    pub fn built(&self) -> Option<&T> {
        match self {
            Fragment::Built(fragment) => Some(fragment),
            Fragment::Raw(_) => None,
        }
    }
}

/// Fragment shared by the GCM and APNs payloads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppFragment {
    pub title: String,
    pub site: Option<Value>,
    pub userfrom: Option<Value>,
    pub notif: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GcmPayload {
    pub data: AppFragment,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApnsPayload {
    pub custom: AppFragment,
}

/// WNS toast notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WnsToast {
    #[serde(rename = "type")]
    pub kind: String,
    pub template: String,
    pub text: Vec<Value>,
}

impl WnsToast {
    pub fn new(alert: Option<&Value>) -> Self {
        Self {
            kind: "toast".to_string(),
            template: "ToastText01".to_string(),
            text: alert.cloned().into_iter().collect(),
        }
    }
}

/// MPNS toast notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MpnsToast {
    #[serde(rename = "type")]
    pub kind: String,
    pub text1: Vec<Value>,
}

impl MpnsToast {
    pub fn new(alert: Option<&Value>) -> Self {
        Self {
            kind: "toast".to_string(),
            text1: alert.cloned().into_iter().collect(),
        }
    }
}

/// Access key request sent by a site asking for API permissions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessKeyRecord {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub siteid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<Permissions>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_keeps_unknown_fields() {
        let raw = json!({
            "appname": "com.moodle.moodlemobile",
            "device": "android",
            "extra": {
                "site": "c8b2d1",
                "smallmessage": "New forum post",
                "courseid": 7
            }
        });

        let record: NotificationRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(record.extra.site, Some(json!("c8b2d1")));
        assert_eq!(record.other.get("device"), Some(&json!("android")));
        assert_eq!(record.extra.other.get("courseid"), Some(&json!(7)));
        assert_eq!(serde_json::to_value(&record).unwrap(), raw);
    }

    #[test]
    fn test_toast_shapes() {
        let wns = serde_json::to_value(WnsToast::new(Some(&json!("hi")))).unwrap();
        assert_eq!(
            wns,
            json!({ "type": "toast", "template": "ToastText01", "text": ["hi"] })
        );

        let mpns = serde_json::to_value(MpnsToast::new(None)).unwrap();
        assert_eq!(mpns, json!({ "type": "toast", "text1": [] }));
    }

    #[test]
    fn test_lenient_field_shapes() {
        let raw = json!({
            "alert": { "title": "Forum", "body": "New post" },
            "gcm": { "collapse_key": "forum" },
            "apns": { "badge": 3 },
            "extra": {
                "timecreated": "1400000000",
                "site": 42,
                "wns": { "type": "tile" }
            }
        });

        let record: NotificationRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(record.extra.site, Some(json!(42)));
        assert_eq!(record.extra.timecreated, Some(json!("1400000000")));
        assert_eq!(
            record.gcm,
            Some(Fragment::Raw(json!({ "collapse_key": "forum" })))
        );
        assert!(matches!(record.extra.wns, Some(Fragment::Raw(_))));
        assert_eq!(serde_json::to_value(&record).unwrap(), raw);
    }

    #[test]
    fn test_built_toast_parses_back_as_built() {
        let raw = json!({ "type": "toast", "text1": ["hi"] });
        let fragment: Fragment<MpnsToast> = serde_json::from_value(raw).unwrap();
        assert_eq!(fragment.built(), Some(&MpnsToast::new(Some(&json!("hi")))));
    }
}
