use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Extracts the bearer token from the `Authorization` header, if present
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_owned)
}

/// Resolves bearer tokens to usernames against the external auth service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Returns the username the token belongs to, or `None` for an invalid
    /// or expired token. Errors are reserved for the service being unreachable.
    async fn verify_token(&self, token: &str) -> AppResult<Option<String>>;
}

/// HTTP client for the external authentication service
pub struct HttpTokenVerifier {
    http_client: HttpClient,
    api_url: String,
}

impl HttpTokenVerifier {
    pub fn new(api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    user: String,
}

#[async_trait]
impl TokenVerifier for HttpTokenVerifier {
    async fn verify_token(&self, token: &str) -> AppResult<Option<String>> {
        let url = format!("{}/verify", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED
            || response.status() == reqwest::StatusCode::FORBIDDEN
        {
            tracing::debug!("Auth service rejected token");
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Auth service returned status {}: {}",
                status, body
            )));
        }

        let verified: VerifyResponse = response.json().await?;
        Ok(Some(verified.user))
    }
}
