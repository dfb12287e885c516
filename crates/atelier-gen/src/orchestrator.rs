//! Job orchestration
//!
//! Turns one [`GenerationRequest`] into the upstream call chain
//! `upload (sketch only) → generate → share` and folds every outcome into a
//! [`GenerationResult`]. Nothing escapes as an error past [`Orchestrator::generate`].

use crate::request::{GenerationRequest, GenerationResult};
use crate::store::AssetStore;
use atelier_core::{Asset, AtelierError, Result, Visibility};
use std::fmt;
use std::sync::Arc;

/// Stage of a single `generate` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validated,
    Uploading,
    Generating,
    Sharing,
    Completed,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validated => "validated",
            Stage::Uploading => "uploading",
            Stage::Generating => "generating",
            Stage::Sharing => "sharing",
            Stage::Completed => "completed",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Composes store calls into one logical generation
#[derive(Clone)]
pub struct Orchestrator {
    store: Arc<dyn AssetStore>,
}

impl Orchestrator {
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn AssetStore {
        self.store.as_ref()
    }

    /// Run a generation request to completion.
    ///
    /// Invalid requests fail without touching the store. A failed sharing step
    /// still returns the asset, flagged as partial.
    pub fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        if let Err(e) = request.validate() {
            tracing::debug!(error = %e, "Rejected generation request");
            return GenerationResult::from(e);
        }
        let kind = request.kind();
        tracing::debug!(%kind, stage = %Stage::Validated, store = self.store.name(), "Generation started");

        let mut asset = match self.create_asset(request) {
            Ok(asset) => asset,
            Err(e) => {
                tracing::warn!(%kind, stage = %Stage::Failed, error = %e, "Generation failed");
                return GenerationResult::from(e);
            }
        };

        tracing::debug!(id = %asset.id, stage = %Stage::Sharing, "Sharing asset");
        let share_error = match self.store.set_shared(&asset.id) {
            Ok(()) => {
                asset.visibility = Visibility::Shared;
                None
            }
            Err(e) => Some(e),
        };

        let url = self.store.preview_url(&asset.id, kind, request.prompt());
        let source = self.store.url_source();

        match share_error {
            None => {
                tracing::info!(id = %asset.id, %kind, shared = asset.is_shared(), stage = %Stage::Completed, "Asset generated");
                GenerationResult::completed(asset.id, url, source)
            }
            Some(e) => {
                tracing::warn!(id = %asset.id, error = %e, "Asset generated but could not be shared");
                let warning = format!(
                    "Asset was generated but sharing failed; its preview URL may not be reachable: {}",
                    e
                );
                GenerationResult::partial(asset.id, url, source, warning)
            }
        }
    }

    fn create_asset(&self, request: &GenerationRequest) -> Result<Asset> {
        let kind = request.kind();
        let id = match request {
            GenerationRequest::TextToImage { prompt } | GenerationRequest::TextToModel { prompt } => {
                tracing::debug!(%kind, stage = %Stage::Generating, "Requesting generation from prompt");
                self.store.generate_from_prompt(kind, prompt)?
            }
            GenerationRequest::SketchToModel { image_bytes, .. } => {
                tracing::debug!(bytes = image_bytes.len(), stage = %Stage::Uploading, "Uploading sketch");
                let upload_id = self.store.upload_asset(image_bytes)?;
                tracing::debug!(upload_id = %upload_id, stage = %Stage::Generating, "Requesting generation from asset");
                self.store.generate_from_asset(&upload_id, request.prompt())?
            }
        };

        if id.trim().is_empty() {
            return Err(AtelierError::MalformedResponse(
                "store returned an empty asset id".to_string(),
            ));
        }
        Ok(Asset::submitted(id, kind))
    }
}
