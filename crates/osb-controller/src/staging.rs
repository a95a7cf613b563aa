//! Charts staged on local disk for the duration of one request.

use crate::error::{ControllerError, Result};
use osb_core::StagingConfig;
use osb_registry::BlobClient;
use std::path::Path;
use tempfile::{Builder, NamedTempFile};
use tokio::fs::File;
use tracing::debug;

/// A chart downloaded into a temporary file.
///
/// The file is deleted when the value is dropped, on success and error paths
/// alike.
#[derive(Debug)]
pub struct StagedArtifact {
    file: NamedTempFile,
    locator: String,
    size: u64,
}

impl StagedArtifact {
    /// Download `locator` into a fresh temporary file.
    ///
    /// If the download fails the partially written file is removed before the
    /// error is returned.
    pub async fn fetch(blobs: &BlobClient, locator: &str, config: &StagingConfig) -> Result<Self> {
        let staging_error = |source: std::io::Error| ControllerError::Staging {
            locator: locator.to_string(),
            source,
        };

        let mut builder = Builder::new();
        builder.prefix(&config.prefix);

        let created = match &config.dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        };
        let file = created.map_err(staging_error)?;

        let mut sink = File::from_std(file.reopen().map_err(staging_error)?);
        let size = blobs.fetch_artifact(locator, &mut sink).await?;
        debug!(locator, path = %file.path().display(), size, "staged chart");

        Ok(Self {
            file,
            locator: locator.to_string(),
            size,
        })
    }

    /// Location of the staged chart.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Locator the chart was fetched from.
    #[must_use]
    pub fn locator(&self) -> &str {
        &self.locator
    }

    /// Size of the staged chart in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }
}

impl Drop for StagedArtifact {
    fn drop(&mut self) {
        debug!(locator = %self.locator, path = %self.file.path().display(), "releasing staged chart");
    }
}
