use thiserror::Error;

/// Payload hook errors
#[derive(Error, Debug)]
pub enum HookError {
    #[error("Site not registered on moodle.net")]
    SiteNotRegistered,

    #[error("Hub verification request failed: {0}")]
    Request(String),

    #[error("Hub returned status {0}")]
    HubUnavailable(u16),

    #[error("Invalid hub response: {0}")]
    InvalidHubResponse(String),

    #[error("Hook configuration error: {0}")]
    Config(String),
}
