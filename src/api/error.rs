//! Unified client error handling for BloodSync.
//!
//! Every fallible operation in the library returns [`ClientError`]. The view
//! layer turns these into transient notices; none of them terminate the
//! process.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::session::StorageError;

/// Errors surfaced by the session store, the API client and the pages
#[derive(Debug, Error)]
pub enum ClientError {
    /// A form constraint failed before any request was made
    #[error("{0}")]
    Validation(ValidationErrors),

    /// The login endpoint rejected the supplied credentials
    #[error("Login failed: {0}")]
    Authentication(String),

    /// The server rejected a previously accepted token
    #[error("Your session has expired. Please log in again.")]
    SessionExpired,

    /// Network or server failure on any API call
    #[error("{message}")]
    RemoteFailure {
        /// HTTP status when the server answered, `None` for transport failures
        status: Option<u16>,
        message: String,
    },

    /// A successful response whose body did not match the expected schema
    #[error("Unexpected response from server: {0}")]
    MalformedResponse(String),

    /// The durable session storage could not be read or written
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ClientError {
    /// Failure reported by the server with a non-success status
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        ClientError::RemoteFailure {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Failure before the server produced a response
    pub fn transport(message: impl Into<String>) -> Self {
        ClientError::RemoteFailure {
            status: None,
            message: message.into(),
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, ClientError::SessionExpired)
    }

    /// Field-level errors when this is a validation failure
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            ClientError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for ClientError {
    fn from(errors: ValidationErrors) -> Self {
        ClientError::Validation(errors)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::MalformedResponse(err.to_string())
        } else if err.is_timeout() {
            ClientError::transport("Request to server timed out")
        } else if err.is_connect() {
            ClientError::transport(format!("Failed to connect to server: {}", err))
        } else {
            ClientError::transport(format!("Request failed: {}", err))
        }
    }
}

// -------------------------------------------------------------------------
// Field-level validation errors
// -------------------------------------------------------------------------

/// Collected validation messages, keyed by form field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validation error for a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) -> &mut Self {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
        self
    }

    /// Record the error of a `Result<(), String>` check, if any
    pub fn check(&mut self, field: &str, result: Result<(), String>) -> &mut Self {
        if let Err(message) = result {
            self.add(field, message);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Messages reported for one field
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    /// Iterate fields in a stable order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Return Ok(()) if no errors, or the collected errors otherwise
    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.errors.len() == 1 {
            if let Some((field, messages)) = self.errors.iter().next() {
                return write!(f, "{}: {}", field, messages.join(", "));
            }
        }
        write!(f, "Validation failed for {} fields", self.errors.len())
    }
}
