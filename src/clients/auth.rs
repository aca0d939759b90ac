use crate::clients::{ApiEnvelope, ClientError, join_base};
use crate::domain::session::TokenPair;
use async_trait::async_trait;
use serde::Serialize;

/// Boundary to the backend Auth module.
#[async_trait]
pub trait AuthApi: Send + Sync + std::fmt::Debug {
    /// Exchanges a refresh token for a rotated token pair.
    ///
    /// `Ok(None)` is the "no session" signal: the collaborator answered but
    /// rejected the token (or returned no data). Transport and decode
    /// failures surface as `Err` and are degraded by the caller.
    async fn refresh_token(&self, refresh_token: &str) -> Result<Option<TokenPair>, ClientError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Clone, Debug)]
pub struct HttpAuthApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self { client, base_url: base_url.into() }
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn refresh_token(&self, refresh_token: &str) -> Result<Option<TokenPair>, ClientError> {
        let url = join_base(&self.base_url, "/api/Auth/refresh-token");
        let response = self
            .client
            .post(url)
            .header("X-Module", "Auth")
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;

        // Rejections come back as a non-2xx carrying the same envelope, so
        // the body is decoded regardless of status.
        let envelope: ApiEnvelope<TokenPair> = response.json().await?;
        if envelope.is_success {
            Ok(envelope.data)
        } else {
            tracing::debug!(message = ?envelope.message, "Refresh rejected by Auth module");
            Ok(None)
        }
    }
}
