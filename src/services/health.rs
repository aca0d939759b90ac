/// Readiness checks for the management endpoints.
#[derive(Clone, Debug)]
pub struct HealthService {
    client: reqwest::Client,
    backend_base: String,
}

impl HealthService {
    pub fn new(client: reqwest::Client, backend_base: impl Into<String>) -> Self {
        Self { client, backend_base: backend_base.into() }
    }

    /// Checks that the backend answers at all. Any HTTP response counts as
    /// reachable; only connection-level failures make the probe fail.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be reached.
    pub async fn check_backend(&self) -> anyhow::Result<()> {
        self.client.get(&self.backend_base).send().await?;
        Ok(())
    }
}
