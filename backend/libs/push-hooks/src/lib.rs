/// Push Hooks Library
///
/// Application hooks that run before a notification reaches the platform
/// clients.
///
/// It handles:
/// - Per-platform payload shaping (GCM, APNs, WNS, MPNS) for Moodle notifications
/// - Site verification against the moodle.net hub
/// - API permission grants for access keys
pub mod config;
pub mod errors;
pub mod hook;
pub mod models;
pub mod moodle;
pub mod permissions;

pub use config::{HubConfig, MOODLE_HUB_URL};
pub use errors::HookError;
pub use hook::{pass_through, DynPayloadHook, PayloadHook};
pub use models::{AccessKeyRecord, Fragment, NotificationExtra, NotificationRecord};
pub use moodle::{adapt_for_push, MoodleHook};
pub use permissions::Permissions;
