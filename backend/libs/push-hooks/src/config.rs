use std::env;
use std::time::Duration;

use crate::errors::HookError;

pub const MOODLE_HUB_URL: &str = "https://moodle.net/local/sitecheck/check.php";

/// Hub verification configuration
#[derive(Debug, Clone)]
pub struct HubConfig {
    pub hub_url: String,
    pub timeout: Duration,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            hub_url: MOODLE_HUB_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl HubConfig {
    /// Create new hub configuration pointing at `hub_url`
    pub fn new(hub_url: impl Into<String>) -> Self {
        Self {
            hub_url: hub_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration from `MOODLE_HUB_*` environment variables
    pub fn from_env() -> Result<Self, HookError> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();
        if let Ok(url) = env::var("MOODLE_HUB_URL") {
            config.hub_url = url;
        }
        if let Ok(raw) = env::var("MOODLE_HUB_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                HookError::Config("MOODLE_HUB_TIMEOUT_SECS must be a valid u64".to_string())
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hub_config_default() {
        let cfg = HubConfig::default();
        assert_eq!(cfg.hub_url, MOODLE_HUB_URL);
        assert_eq!(cfg.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_hub_config_override() {
        let cfg = HubConfig::new("http://localhost:9000/check.php")
            .with_timeout(Duration::from_secs(1));
        assert_eq!(cfg.hub_url, "http://localhost:9000/check.php");
        assert_eq!(cfg.timeout, Duration::from_secs(1));
    }
}
