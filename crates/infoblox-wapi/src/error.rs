//! WAPI client errors

use thiserror::Error;

/// Errors that can occur when talking to the Infoblox WAPI
///
/// Transport failures are reported as values: callers branch on
/// [`WapiError::status_code`] to tell a remote rejection (`Some`) from a
/// connection-level failure (`None`).
#[derive(Debug, Error)]
pub enum WapiError {
    /// The appliance answered with a 4xx/5xx status
    #[error("WAPI error: {message}")]
    Remote {
        /// HTTP status code returned by the appliance
        status: u16,
        /// Method, path, status and response body
        message: String,
    },

    /// The request never got a response (DNS, TLS handshake, refused, timeout)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A 2xx response body was not valid JSON
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Client construction failed (missing setting, bad certificate, ...)
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl WapiError {
    /// HTTP status of a remote rejection, `None` for every other failure
    pub fn status_code(&self) -> Option<u16> {
        match self {
            WapiError::Remote { status, .. } => Some(*status),
            WapiError::Http(e) => e.status().map(|s| s.as_u16()),
            WapiError::Decode(_) | WapiError::Config(_) => None,
        }
    }

    /// Human readable failure message
    pub fn message(&self) -> String {
        match self {
            WapiError::Remote { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// True when the appliance reported 404 for the request
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

/// Result alias used throughout the client
pub type WapiResult<T> = Result<T, WapiError>;
