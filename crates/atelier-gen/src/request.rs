//! Generation requests and the normalized result every path returns

use atelier_core::{AssetId, AssetKind, AtelierError};
use serde::{Deserialize, Serialize};

/// A request to generate an asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GenerationRequest {
    TextToImage { prompt: String },
    TextToModel { prompt: String },
    /// Model from a sketch or photo, with optional text guidance
    SketchToModel {
        #[serde(skip)]
        image_bytes: Vec<u8>,
        #[serde(default)]
        prompt: Option<String>,
    },
}

impl GenerationRequest {
    /// Kind of asset the request produces
    pub fn kind(&self) -> AssetKind {
        match self {
            GenerationRequest::TextToImage { .. } => AssetKind::Image,
            GenerationRequest::TextToModel { .. } | GenerationRequest::SketchToModel { .. } => {
                AssetKind::Model
            }
        }
    }

    /// The text prompt, if one was given and is non-empty
    pub fn prompt(&self) -> Option<&str> {
        let prompt = match self {
            GenerationRequest::TextToImage { prompt } | GenerationRequest::TextToModel { prompt } => {
                Some(prompt.as_str())
            }
            GenerationRequest::SketchToModel { prompt, .. } => prompt.as_deref(),
        };
        prompt.filter(|p| !p.trim().is_empty())
    }

    /// Reject requests that cannot succeed, before any upstream call
    pub fn validate(&self) -> Result<(), AtelierError> {
        match self {
            GenerationRequest::TextToImage { prompt } | GenerationRequest::TextToModel { prompt }
                if prompt.trim().is_empty() =>
            {
                Err(AtelierError::Validation("Prompt is required.".to_string()))
            }
            GenerationRequest::SketchToModel { image_bytes, .. } if image_bytes.is_empty() => Err(
                AtelierError::Validation("Sketch image is required.".to_string()),
            ),
            _ => Ok(()),
        }
    }
}

/// The single result shape every generation path returns.
///
/// `success` implies a non-empty `id`; failure implies a non-empty `error`.
/// A set `warning` marks a partial success: the asset exists but a secondary
/// step (sharing) failed, so `url` may not be reachable yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AssetId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "error", default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Where `url` points: "mock" or "shared-url"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl GenerationResult {
    pub fn completed(id: AssetId, url: String, source: &str) -> Self {
        Self {
            success: true,
            id: Some(id),
            url: Some(url),
            error_message: None,
            source: Some(source.to_string()),
            warning: None,
        }
    }

    /// A usable asset whose sharing step failed
    pub fn partial(id: AssetId, url: String, source: &str, warning: String) -> Self {
        Self {
            warning: Some(warning),
            ..Self::completed(id, url, source)
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = "Generation failed".to_string();
        }
        Self {
            success: false,
            id: None,
            url: None,
            error_message: Some(message),
            source: None,
            warning: None,
        }
    }

    pub fn is_partial(&self) -> bool {
        self.success && self.warning.is_some()
    }
}

impl From<AtelierError> for GenerationResult {
    fn from(err: AtelierError) -> Self {
        match err {
            // Shown to users as-is
            AtelierError::Validation(message) => GenerationResult::failed(message),
            other => GenerationResult::failed(other.to_string()),
        }
    }
}
