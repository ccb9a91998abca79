//! The export pipeline: fetch, encode, write.

use std::path::PathBuf;

use crate::encode::encode_document;
use crate::fetch::MetadataClient;
use crate::storage::ArtifactWriter;
use crate::types::{ExportConfig, ExportReport, ExportResult};

/// Runs one metadata export.
pub struct MetadataExporter {
    client: MetadataClient,
    output_path: PathBuf,
}

impl MetadataExporter {
    pub fn new(config: &ExportConfig) -> ExportResult<Self> {
        Ok(Self {
            client: MetadataClient::new(config)?,
            output_path: config.output_path.clone(),
        })
    }

    /// Fetch the metadata and replace the pack on disk.
    ///
    /// Any failure leaves the previous pack, if there was one, untouched.
    pub async fn run(&self) -> ExportResult<ExportReport> {
        let document = self.client.fetch().await?;
        let bytes = encode_document(&document)?;
        let top_level_keys = document.as_object().map_or(0, |m| m.len());
        tracing::debug!(
            "Encoded {} top-level keys into {} BSON bytes",
            top_level_keys,
            bytes.len()
        );

        ArtifactWriter::write_to_file(&bytes, &self.output_path)?;

        Ok(ExportReport {
            output_path: self.output_path.clone(),
            bytes_written: bytes.len(),
            top_level_keys,
        })
    }
}

/// Build an exporter from `config` and run it once.
pub async fn export(config: &ExportConfig) -> ExportResult<ExportReport> {
    MetadataExporter::new(config)?.run().await
}
