use crate::app::dto::{CountResponse, HealthResponse, MappingsResponse, RequestsResponse};
use crate::domain::mapping::{RequestPattern, StubMapping};
use anyhow::{Context as _, Result, bail};
use reqwest::StatusCode;
use uuid::Uuid;

/// Remote control for a stub server's `/__admin` API.
#[derive(Debug, Clone)]
pub struct AdminClient {
    base_url: String,
    http: reqwest::Client,
}

impl AdminClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn configure_for(host: &str, port: u16) -> Self {
        Self::new(format!("http://{host}:{port}"))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn admin_url(&self, path: &str) -> String {
        format!("{}/__admin{}", self.base_url, path)
    }

    async fn ensure_success(res: reqwest::Response) -> Result<reqwest::Response> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let body = res.text().await.unwrap_or_default();
        bail!("admin request failed with {status}: {body}")
    }

    /// Register a stub and return it as stored (with its id).
    pub async fn stub_for(&self, mapping: StubMapping) -> Result<StubMapping> {
        let label = mapping.request.describe();
        let res = self
            .http
            .post(self.admin_url("/mappings"))
            .json(&mapping)
            .send()
            .await
            .with_context(|| format!("Failed to register stub `{label}`"))?;
        Ok(Self::ensure_success(res).await?.json().await?)
    }

    pub async fn mappings(&self) -> Result<MappingsResponse> {
        let res = self.http.get(self.admin_url("/mappings")).send().await?;
        Ok(Self::ensure_success(res).await?.json().await?)
    }

    /// Returns `false` when no mapping had that id.
    pub async fn remove(&self, id: Uuid) -> Result<bool> {
        let res = self
            .http
            .delete(self.admin_url(&format!("/mappings/{id}")))
            .send()
            .await?;
        if res.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        Self::ensure_success(res).await?;
        Ok(true)
    }

    pub async fn reset(&self) -> Result<()> {
        let res = self.http.post(self.admin_url("/reset")).send().await?;
        Self::ensure_success(res).await?;
        Ok(())
    }

    pub async fn requests(&self) -> Result<RequestsResponse> {
        let res = self.http.get(self.admin_url("/requests")).send().await?;
        Ok(Self::ensure_success(res).await?.json().await?)
    }

    pub async fn count(&self, pattern: &RequestPattern) -> Result<usize> {
        let res = self
            .http
            .post(self.admin_url("/requests/count"))
            .json(pattern)
            .send()
            .await?;
        let body: CountResponse = Self::ensure_success(res).await?.json().await?;
        Ok(body.count)
    }

    /// Fail unless exactly `expected` journaled requests match `pattern`.
    pub async fn verify(&self, expected: usize, pattern: &RequestPattern) -> Result<()> {
        let actual = self.count(pattern).await?;
        if actual != expected {
            bail!(
                "expected {expected} request(s) matching `{}`, found {actual}",
                pattern.describe()
            );
        }
        Ok(())
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let res = self.http.get(self.admin_url("/health")).send().await?;
        Ok(Self::ensure_success(res).await?.json().await?)
    }
}
