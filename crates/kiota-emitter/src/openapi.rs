//! API description emission
//!
//! Producing the OpenAPI document is somebody else's job. The pipeline only
//! asks an [`ApiDescriptionEmitter`] to place it at
//! `<root>/`[`OPENAPI_FILE_NAME`] and then checks that it is there.

use crate::generate::OPENAPI_FILE_NAME;
use async_trait::async_trait;
use kiota_emitter_core::{EmitterError, EmitterResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Options handed to the description emitter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OpenApiEmitterOptions {
    pub file_type: String,
    pub omit_unreachable_types: bool,
    pub openapi_versions: Vec<String>,
}

impl Default for OpenApiEmitterOptions {
    fn default() -> Self {
        Self {
            file_type: "json".to_string(),
            omit_unreachable_types: true,
            openapi_versions: vec!["3.2.0".to_string()],
        }
    }
}

/// Writes the API description beneath the root output folder
#[async_trait]
pub trait ApiDescriptionEmitter: Send + Sync {
    /// Emit the description into `root`
    async fn emit(&self, root: &Path, options: &OpenApiEmitterOptions) -> EmitterResult<()>;
}

/// Uses an existing description document as the emitted one
#[derive(Debug, Clone)]
pub struct CopyDescription {
    source: PathBuf,
}

impl CopyDescription {
    /// Copy `source` on every emission
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Document being copied
    pub fn source(&self) -> &Path {
        &self.source
    }
}

#[async_trait]
impl ApiDescriptionEmitter for CopyDescription {
    async fn emit(&self, root: &Path, options: &OpenApiEmitterOptions) -> EmitterResult<()> {
        let failed = |err: std::io::Error| {
            EmitterError::DescriptionEmitFailed(format!("{}: {err}", self.source.display()))
        };

        let destination = root.join(OPENAPI_FILE_NAME);
        tracing::debug!(
            source = %self.source.display(),
            destination = %destination.display(),
            file_type = %options.file_type,
            "Copying API description"
        );

        tokio::fs::create_dir_all(root).await.map_err(failed)?;
        tokio::fs::copy(&self.source, &destination)
            .await
            .map_err(failed)?;
        Ok(())
    }
}
