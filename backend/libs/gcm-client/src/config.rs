use std::env;
use std::time::Duration;

use resilience::RetryConfig;

use crate::errors::GcmError;

pub const GCM_ENDPOINT: &str = "https://android.googleapis.com/gcm/send";

/// GCM Configuration
#[derive(Debug, Clone)]
pub struct GcmConfig {
    /// Sender project number (informational, not sent)
    pub project_number: String,
    pub api_key: String,
    /// Application name (informational, not sent)
    pub app_name: String,
    /// Instance id (informational, not sent)
    pub instance_id: u64,
    pub endpoint: String,
    /// Per-request timeout, applied to the HTTP client
    pub timeout: Duration,
    /// Backoff used between retried attempts. `max_retries` is taken from
    /// the `retries` argument of each send.
    pub retry: RetryConfig,
}

impl GcmConfig {
    /// Create new GCM configuration
    pub fn new(
        project_number: impl Into<String>,
        api_key: impl Into<String>,
        app_name: impl Into<String>,
    ) -> Self {
        Self {
            project_number: project_number.into(),
            api_key: api_key.into(),
            app_name: app_name.into(),
            instance_id: 0,
            endpoint: GCM_ENDPOINT.to_string(),
            timeout: Duration::from_secs(10),
            retry: RetryConfig::default(),
        }
    }

    pub fn with_instance_id(mut self, instance_id: u64) -> Self {
        self.instance_id = instance_id;
        self
    }

    /// Override the gateway URL (used by tests and staging setups)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Load configuration from `GCM_*` environment variables
    ///
    /// `GCM_API_KEY` is required; everything else has a default.
    pub fn from_env() -> Result<Self, GcmError> {
        dotenvy::dotenv().ok();

        let api_key = env::var("GCM_API_KEY")
            .map_err(|_| GcmError::Config("GCM_API_KEY must be set".to_string()))?;

        let mut config = Self::new(
            env::var("GCM_PROJECT_NUMBER").unwrap_or_default(),
            api_key,
            env::var("GCM_APP_NAME").unwrap_or_default(),
        );

        if let Ok(endpoint) = env::var("GCM_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Some(instance_id) = parse_var::<u64>("GCM_INSTANCE_ID")? {
            config.instance_id = instance_id;
        }
        if let Some(secs) = parse_var::<u64>("GCM_TIMEOUT_SECS")? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = parse_var::<u64>("GCM_RETRY_INITIAL_BACKOFF_MS")? {
            config.retry.initial_backoff = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64>("GCM_RETRY_MAX_BACKOFF_MS")? {
            config.retry.max_backoff = Duration::from_millis(ms);
        }

        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, GcmError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| GcmError::Config(format!("{name} must be a valid number"))),
        Err(_) => Ok(None),
    }
}
