use crate::clients::{ApiEnvelope, ClientError, join_base};
use crate::domain::business::DetailedBusiness;
use async_trait::async_trait;

/// Boundary to the backend BusinessUser module.
#[async_trait]
pub trait BusinessDirectory: Send + Sync + std::fmt::Debug {
    /// Lists the businesses the access token's principal owns or staffs.
    async fn active_user_businesses(
        &self,
        access_token: &str,
    ) -> Result<Vec<DetailedBusiness>, ClientError>;
}

#[derive(Clone, Debug)]
pub struct HttpBusinessDirectory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBusinessDirectory {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self { client, base_url: base_url.into() }
    }
}

#[async_trait]
impl BusinessDirectory for HttpBusinessDirectory {
    async fn active_user_businesses(
        &self,
        access_token: &str,
    ) -> Result<Vec<DetailedBusiness>, ClientError> {
        let url = join_base(&self.base_url, "/api/BusinessUser/active-user-businesses");
        let response = self.client.get(url).bearer_auth(access_token).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }

        let envelope: ApiEnvelope<Vec<DetailedBusiness>> = response.json().await?;
        if envelope.is_success {
            Ok(envelope.data.unwrap_or_default())
        } else {
            Ok(Vec::new())
        }
    }
}
