//! Login and registration. Both go out without a bearer credential.

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{info, warn};

use super::{decode, error_message, failure, ApiClient, ClientError};
use crate::models::{Credentials, LoginResponse, RegisterRequest};
use crate::session::Authenticator;

const DEFAULT_LOGIN_FAILURE: &str = "Invalid email or password";

#[async_trait]
impl Authenticator for ApiClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<LoginResponse, ClientError> {
        let response = self
            .execute_public(self.client.post(self.url("/auth/login")).json(credentials))
            .await?;

        let status = response.status();
        if matches!(
            status,
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            let message = error_message(response).await;
            warn!(status = status.as_u16(), "Login rejected");
            let message = if message == status.canonical_reason().unwrap_or_default() {
                DEFAULT_LOGIN_FAILURE.to_string()
            } else {
                message
            };
            return Err(ClientError::Authentication(message));
        }
        if !status.is_success() {
            return Err(failure(response).await);
        }

        decode(response).await
    }
}

impl ApiClient {
    /// Create an account. The server's message is surfaced on rejection.
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ClientError> {
        let response = self
            .execute_public(self.client.post(self.url("/auth/register")).json(request))
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = error_message(response).await;
            warn!(status, message = %message, "Registration rejected");
            return Err(ClientError::remote(status, message));
        }

        info!(email = %request.email, "Registered account");
        Ok(())
    }
}
