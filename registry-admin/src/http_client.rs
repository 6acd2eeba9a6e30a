//! reqwest-backed [`Backend`] talking to the records REST API.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde_json::Value;

use crate::error::RemoteError;
use crate::models::EntityId;
use crate::registry::Backend;

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, RemoteError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            RemoteError::network(format!("invalid base URL `{}`: {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(RemoteError::network(format!(
                "base URL `{}` cannot carry a path",
                base_url
            )));
        }

        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, RemoteError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("❌ API returned {}: {}", status, body);
            return Err(RemoteError::from_status(status.as_u16(), &body));
        }

        Ok(response)
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, RemoteError> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list(&self, resource: &str) -> Result<Vec<Value>, RemoteError> {
        let url = self.endpoint(&[resource]);
        log::debug!("📋 GET {}", url);

        let records: Vec<Value> = self.send_json(self.client.get(url)).await?;
        log::debug!("✅ Retrieved {} {}", records.len(), resource);
        Ok(records)
    }

    async fn list_by(
        &self,
        resource: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Value>, RemoteError> {
        let url = self.endpoint(&[resource, field, value]);
        log::debug!("📋 GET {}", url);

        self.send_json(self.client.get(url)).await
    }

    async fn get(&self, resource: &str, id: EntityId) -> Result<Value, RemoteError> {
        let url = self.endpoint(&[resource, &id.to_string()]);
        log::debug!("📄 GET {}", url);

        self.send_json(self.client.get(url)).await
    }

    async fn create(&self, resource: &str, payload: Value) -> Result<Value, RemoteError> {
        let url = self.endpoint(&[resource]);
        log::debug!("➕ POST {}", url);

        self.send_json(self.client.post(url).json(&payload)).await
    }

    async fn update(
        &self,
        resource: &str,
        id: EntityId,
        payload: Value,
    ) -> Result<Value, RemoteError> {
        let url = self.endpoint(&[resource, &id.to_string()]);
        log::debug!("✏️ PUT {}", url);

        self.send_json(self.client.put(url).json(&payload)).await
    }

    async fn delete(&self, resource: &str, id: EntityId) -> Result<(), RemoteError> {
        let url = self.endpoint(&[resource, &id.to_string()]);
        log::debug!("🗑️ DELETE {}", url);

        self.send(self.client.delete(url)).await?;
        Ok(())
    }
}
