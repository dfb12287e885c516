//! Asset store trait and the records it returns

use atelier_core::{AssetId, AssetKind, AssetStatus, Result};
use serde::{Deserialize, Serialize};

/// A single status reading, fetched fresh on every call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub status: AssetStatus,
    /// Human-readable detail reported by the upstream, possibly empty
    #[serde(default)]
    pub details: String,
    /// The full upstream status record
    #[serde(default)]
    pub raw: serde_json::Value,
}

impl StatusSnapshot {
    pub fn new(status: AssetStatus) -> Self {
        Self {
            status,
            details: String::new(),
            raw: serde_json::Value::Null,
        }
    }
}

/// A preview binary as served by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryPayload {
    pub bytes: Vec<u8>,
    /// Content type reported by the upstream, if any
    pub content_type: Option<String>,
}

/// Trait implemented by each asset store (Generio, Mock).
///
/// Every method is a single request/response: no retries, no caching and no
/// local state. Implementations report failures as
/// [`AtelierError::Transport`](atelier_core::AtelierError::Transport),
/// [`AtelierError::UpstreamRejected`](atelier_core::AtelierError::UpstreamRejected) or
/// [`AtelierError::MalformedResponse`](atelier_core::AtelierError::MalformedResponse).
pub trait AssetStore: Send + Sync {
    /// Store name (e.g. "generio", "mock")
    fn name(&self) -> &str;

    /// Upload raw image bytes as a new private asset
    fn upload_asset(&self, bytes: &[u8]) -> Result<AssetId>;

    /// Start a text-driven generation job
    fn generate_from_prompt(&self, kind: AssetKind, prompt: &str) -> Result<AssetId>;

    /// Start a model generation job from an uploaded asset, with optional text guidance
    fn generate_from_asset(&self, asset_id: &str, prompt: Option<&str>) -> Result<AssetId>;

    /// Flip an asset's visibility to shared
    fn set_shared(&self, asset_id: &str) -> Result<()>;

    /// Query the job status once
    fn fetch_status(&self, asset_id: &str) -> Result<StatusSnapshot>;

    /// Fetch the shared preview binary, whether or not the job is known to be ready
    fn fetch_binary(&self, asset_id: &str, kind: AssetKind) -> Result<BinaryPayload>;

    /// Public URL of the asset's preview. Placeholder stores may derive it from the prompt.
    fn preview_url(&self, asset_id: &str, kind: AssetKind, prompt: Option<&str>) -> String;

    /// Label for what [`AssetStore::preview_url`] points at
    fn url_source(&self) -> &str {
        "shared-url"
    }
}
