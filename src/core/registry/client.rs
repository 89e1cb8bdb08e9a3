use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::models::{RegistryProject, RegistryVersion};
use crate::core::error::{SyncError, SyncResult};

/// The two batch lookups the remote producer needs.
#[async_trait]
pub trait ContentRegistry: Send + Sync {
    /// Version metadata for every id the registry recognizes.
    async fn versions(&self, ids: &[String]) -> SyncResult<Vec<RegistryVersion>>;

    /// Project metadata for every id the registry recognizes.
    async fn projects(&self, ids: &[String]) -> SyncResult<Vec<RegistryProject>>;
}

/// HTTP client for the Modrinth v2 API (or any server with the same shape).
pub struct ModrinthClient {
    client: Client,
    base_url: Url,
}

impl ModrinthClient {
    pub fn new(client: Client, base_url: &str) -> SyncResult<Self> {
        // `Url::join` replaces the last segment unless the base ends in '/'.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized).map_err(|source| SyncError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> SyncResult<Url> {
        self.base_url
            .join(path)
            .map_err(|source| SyncError::InvalidUrl {
                url: format!("{}{}", self.base_url, path),
                source,
            })
    }

    /// `GET {base}/{endpoint}?ids=<JSON array>`.
    async fn get_batch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        ids: &[String],
    ) -> SyncResult<Vec<T>> {
        if ids.is_empty() {
            debug!("No ids for /{}, skipping request", endpoint);
            return Ok(Vec::new());
        }

        let url = self.endpoint(endpoint)?;
        let ids_json = serde_json::to_string(ids)?;

        debug!("GET {} ({} ids)", url, ids.len());
        let resp = self
            .client
            .get(url.clone())
            .query(&[("ids", ids_json)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::RegistryStatus {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.json::<Vec<T>>().await?)
    }
}

#[async_trait]
impl ContentRegistry for ModrinthClient {
    async fn versions(&self, ids: &[String]) -> SyncResult<Vec<RegistryVersion>> {
        self.get_batch("versions", ids).await
    }

    async fn projects(&self, ids: &[String]) -> SyncResult<Vec<RegistryProject>> {
        self.get_batch("projects", ids).await
    }
}
