use std::fmt;

use thiserror::Error;

use crate::models::GcmResponse;

/// GCM Client Error Types
#[derive(Error, Debug)]
pub enum GcmError {
    #[error("Registration IDs cannot be empty")]
    EmptyRecipients,

    #[error("Request could not be parsed as JSON, or it contained invalid fields")]
    MalformedRequest,

    #[error("There was an error authenticating the sender account")]
    Authentication,

    #[error("GCM server is temporarily unavailable (status {status})")]
    GatewayUnavailable { status: u16 },

    #[error("GCM send request failed: {0}")]
    SendRequest(String),

    #[error("Failed to parse GCM response: {0}")]
    ResponseParse(String),

    #[error("{0}")]
    Delivery(Box<DeliveryFailure>),

    #[error("GCM configuration error: {0}")]
    Config(String),
}

impl GcmError {
    /// Transient failures that are worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GcmError::GatewayUnavailable { .. } | GcmError::SendRequest(_)
        )
    }

    /// Delivery details when the gateway rejected one or more recipients
    pub fn as_delivery(&self) -> Option<&DeliveryFailure> {
        match self {
            GcmError::Delivery(failure) => Some(failure),
            _ => None,
        }
    }
}

impl From<GcmError> for String {
    fn from(err: GcmError) -> Self {
        err.to_string()
    }
}

/// Error code reported by the gateway in a per-recipient result
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeliveryErrorCode {
    NotRegistered,
    InvalidRegistration,
    MismatchSenderId,
    MissingRegistration,
    MessageTooBig,
    InvalidDataKey,
    InvalidTtl,
    InvalidPackageName,
    Unknown(String),
}

impl DeliveryErrorCode {
    pub fn parse(code: &str) -> Self {
        match code {
            "NotRegistered" => Self::NotRegistered,
            "InvalidRegistration" => Self::InvalidRegistration,
            "MismatchSenderId" => Self::MismatchSenderId,
            "MissingRegistration" => Self::MissingRegistration,
            "MessageTooBig" => Self::MessageTooBig,
            "InvalidDataKey" => Self::InvalidDataKey,
            "InvalidTtl" => Self::InvalidTtl,
            "InvalidPackageName" => Self::InvalidPackageName,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::NotRegistered => "NotRegistered",
            Self::InvalidRegistration => "InvalidRegistration",
            Self::MismatchSenderId => "MismatchSenderId",
            Self::MissingRegistration => "MissingRegistration",
            Self::MessageTooBig => "MessageTooBig",
            Self::InvalidDataKey => "InvalidDataKey",
            Self::InvalidTtl => "InvalidTtl",
            Self::InvalidPackageName => "InvalidPackageName",
            Self::Unknown(code) => code,
        }
    }

    /// Attach the affected registration ids to build the delivery outcome.
    ///
    /// Only the two purge kinds keep the ids; the other codes are
    /// non-actionable rejections with a fixed message.
    pub fn into_error(self, registration_ids: Vec<String>) -> DeliveryError {
        match self {
            Self::NotRegistered => DeliveryError::NotRegistered(registration_ids),
            Self::InvalidRegistration => DeliveryError::InvalidRegistration(registration_ids),
            Self::MismatchSenderId => DeliveryError::MismatchSenderId,
            Self::MissingRegistration => DeliveryError::MissingRegistration,
            Self::MessageTooBig => DeliveryError::MessageTooBig,
            Self::InvalidDataKey => DeliveryError::InvalidDataKey,
            Self::InvalidTtl => DeliveryError::InvalidTtl,
            Self::InvalidPackageName => DeliveryError::InvalidPackageName,
            Self::Unknown(code) => DeliveryError::Unknown(code),
        }
    }
}

impl fmt::Display for DeliveryErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-code delivery outcome
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The app was uninstalled or can no longer receive messages.
    /// Remove these registration ids from storage.
    #[error("Not Registered")]
    NotRegistered(Vec<String>),

    /// Remove these registration ids from storage.
    #[error("Invalid Registration")]
    InvalidRegistration(Vec<String>),

    #[error("Mismatch sender Id")]
    MismatchSenderId,

    #[error("Missing registration")]
    MissingRegistration,

    #[error("Message too big")]
    MessageTooBig,

    #[error("Invalid data key")]
    InvalidDataKey,

    #[error("Invalid Ttl")]
    InvalidTtl,

    #[error("Invalid package name")]
    InvalidPackageName,

    #[error("Unknown error, contact admin")]
    Unknown(String),
}

impl DeliveryError {
    /// Registration ids the caller should purge, if any
    pub fn stale_registration_ids(&self) -> &[String] {
        match self {
            DeliveryError::NotRegistered(ids) | DeliveryError::InvalidRegistration(ids) => ids,
            _ => &[],
        }
    }
}

/// All delivery errors reported in one gateway response.
///
/// Errors are kept in the order their codes first appear in `results`, so
/// [`DeliveryFailure::first`] is the group a first-match classifier would
/// have reported.
#[derive(Debug, Clone)]
pub struct DeliveryFailure {
    errors: Vec<DeliveryError>,
    response: GcmResponse,
}

impl DeliveryFailure {
    pub fn new(first: DeliveryError, rest: Vec<DeliveryError>, response: GcmResponse) -> Self {
        let mut errors = Vec::with_capacity(rest.len() + 1);
        errors.push(first);
        errors.extend(rest);
        Self { errors, response }
    }

    pub fn first(&self) -> &DeliveryError {
        &self.errors[0]
    }

    pub fn errors(&self) -> &[DeliveryError] {
        &self.errors
    }

    /// The normalized gateway response, canonical ids included
    pub fn response(&self) -> &GcmResponse {
        &self.response
    }

    /// Union of the not-registered and invalid-registration ids
    pub fn stale_registration_ids(&self) -> Vec<&str> {
        self.errors
            .iter()
            .flat_map(|e| e.stale_registration_ids())
            .map(String::as_str)
            .collect()
    }
}

impl fmt::Display for DeliveryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first())?;
        if self.errors.len() > 1 {
            write!(f, " (and {} more error kinds)", self.errors.len() - 1)?;
        }
        Ok(())
    }
}
