//! Blob storage access for charts and their schemas.
//!
//! Artifact locators use the `gs://bucket/object` convention. They are
//! rewritten to HTTPS by swapping the scheme for a configured base URL; the
//! schema of an artifact lives next to it under a fixed suffix. Any other
//! scheme is rejected before a request is made.

use crate::error::{RegistryError, Result};
use osb_core::{BlobConfig, Schema};
use reqwest::{Client, Response};
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// Scheme prefix every artifact locator must carry.
pub const GCS_SCHEME: &str = "gs://";

/// Timeout for blob downloads. Charts can be large.
const DOWNLOAD_TIMEOUT_SECS: u64 = 120;

/// HTTP client for `gs://` artifacts and schema sidecars.
#[derive(Debug, Clone)]
pub struct BlobClient {
    client: Client,
    base_url: String,
    schema_suffix: String,
}

impl BlobClient {
    /// Create a blob client from configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: &BlobConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            schema_suffix: config.schema_suffix.clone(),
        })
    }

    /// Create a blob client with a custom HTTPS base and the default suffix.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::new(&BlobConfig {
            base_url: base_url.into(),
            ..BlobConfig::default()
        })
    }

    /// HTTPS URL of the object a locator points at.
    pub fn object_url(&self, locator: &str) -> Result<String> {
        let object = locator
            .strip_prefix(GCS_SCHEME)
            .ok_or_else(|| RegistryError::InvalidLocator {
                locator: locator.to_string(),
            })?;
        Ok(format!("{}{object}", self.base_url))
    }

    /// HTTPS URL of the schema sidecar for a locator.
    pub fn schema_url(&self, locator: &str) -> Result<String> {
        let url = self.object_url(locator)?;
        Ok(url + &self.schema_suffix)
    }

    /// Fetch the validation schema of an artifact.
    ///
    /// The schema body must be valid UTF-8.
    pub async fn fetch_schema(&self, locator: &str) -> Result<Schema> {
        let url = self.schema_url(locator)?;
        let response = self.get(&url).await?;

        let body = response.bytes().await?;
        let inputs = String::from_utf8(body.to_vec()).map_err(|e| RegistryError::Parse {
            url: url.clone(),
            message: e.to_string(),
        })?;

        debug!(locator, bytes = inputs.len(), "fetched schema");
        Ok(Schema { inputs })
    }

    /// Download an artifact into `sink`, returning the number of bytes written.
    pub async fn fetch_artifact<W>(&self, locator: &str, sink: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let url = self.object_url(locator)?;
        let mut response = self.get(&url).await?;

        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            sink.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        sink.flush().await?;

        debug!(locator, bytes = written, "fetched artifact");
        Ok(written)
    }

    async fn get(&self, url: &str) -> Result<Response> {
        debug!(url, "fetching blob");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(RegistryError::Fetch {
                url: url.to_string(),
                status: status.as_u16(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> BlobClient {
        BlobClient::new(&BlobConfig::default()).expect("create blob client")
    }

    #[test]
    fn test_schema_url_rewrite() {
        let url = client()
            .schema_url("gs://bucket/chart")
            .expect("rewrite locator");
        assert_eq!(url, "https://storage.googleapis.com/bucket/chart.schema");
    }

    #[test]
    fn test_object_url_rewrite() {
        let url = client()
            .object_url("gs://bucket/charts/mysql-1.0.tgz")
            .expect("rewrite locator");
        assert_eq!(
            url,
            "https://storage.googleapis.com/bucket/charts/mysql-1.0.tgz"
        );
    }

    #[test]
    fn test_only_prefix_is_rewritten() {
        let url = client()
            .object_url("gs://bucket/gs://nested")
            .expect("rewrite locator");
        assert_eq!(url, "https://storage.googleapis.com/bucket/gs://nested");
    }

    #[test]
    fn test_invalid_schemes_rejected() {
        for locator in [
            "s3://bucket/chart",
            "https://storage.googleapis.com/bucket/chart",
            "bucket/chart",
            "GS://bucket/chart",
            "",
        ] {
            let err = client().schema_url(locator).expect_err("reject locator");
            assert!(
                matches!(&err, RegistryError::InvalidLocator { locator: l } if l == locator),
                "unexpected error for {locator}: {err}"
            );
        }
    }
}
