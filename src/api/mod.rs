//! Client for the BloodSync REST service.
//!
//! One [`ApiClient`] is configured at startup with the service's base URL. It
//! attaches the current session token as a bearer credential and maps every
//! response onto [`ClientError`], so callers can tell a rejected session from
//! an ordinary failure.

mod auth;
mod donations;
pub mod error;
mod hospitals;
mod inventory;
mod requests;
mod users;
pub mod validation;

pub use error::{ClientError, ValidationErrors};

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::session::CredentialProvider;

/// Longest server error body echoed back to the user
const MAX_ERROR_BODY: usize = 200;

pub struct ApiClient {
    client: Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl ApiClient {
    pub fn new(
        config: &ApiConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("bloodsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request carrying the session credential, if any.
    ///
    /// A 401 answer to a request that carried the current token means the
    /// server no longer accepts it; the session ends and `SessionExpired` is
    /// returned. A 401 for a token already replaced by a newer login is an
    /// ordinary failure.
    async fn execute(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let token = self.credentials.bearer_token();
        let request = match &token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "API response");

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            if let Some(token) = token {
                if self.credentials.credential_rejected(&token)? {
                    return Err(ClientError::SessionExpired);
                }
            }
        }

        Err(failure(response).await)
    }

    /// Send a request without a credential (login, registration).
    async fn execute_public(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request.send().await?;
        debug!(status = response.status().as_u16(), url = %response.url(), "API response");
        Ok(response)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.execute(self.client.get(self.url(path))).await?;
        decode(response).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .execute(self.client.post(self.url(path)).json(body))
            .await?;
        decode(response).await
    }

    async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .execute(self.client.put(self.url(path)).json(body))
            .await?;
        decode(response).await
    }

    async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.execute(self.client.delete(self.url(path))).await?;
        Ok(())
    }
}

/// Decode a successful response body against its schema
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let url = response.url().to_string();
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| {
        warn!(url = %url, error = %e, "Response did not match the expected schema");
        ClientError::MalformedResponse(e.to_string())
    })
}

/// Build a `RemoteFailure` from a non-success response
async fn failure(response: Response) -> ClientError {
    let status = response.status();
    let message = error_message(response).await;
    warn!(status = status.as_u16(), message = %message, "API request failed");
    ClientError::remote(
        status.as_u16(),
        format!("Server returned error {}: {}", status.as_u16(), message),
    )
}

/// Extract a human-readable message from an error response.
///
/// Understands `{"message": ..}`, `{"error": ".."}` and
/// `{"error": {"message": ..}}` bodies; falls back to the raw text and then to
/// the status reason.
async fn error_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    message_from_body(status, &body)
}

fn message_from_body(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        let candidates = [
            json.get("message"),
            json.get("error").filter(|e| e.is_string()),
            json.get("error").and_then(|e| e.get("message")),
        ];
        if let Some(message) = candidates
            .into_iter()
            .flatten()
            .find_map(|v| v.as_str())
            .filter(|m| !m.trim().is_empty())
        {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string();
    }

    truncate(trimmed, MAX_ERROR_BODY)
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
