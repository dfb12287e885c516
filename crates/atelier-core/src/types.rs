//! Upstream asset model

use crate::error::{AtelierError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier assigned by the upstream service
pub type AssetId = String;

/// Characters that would change the meaning of an upstream URL or a header
/// value if an id carried them.
const FORBIDDEN_ID_CHARS: &[char] = &['/', '\\', '?', '#', '%', '"', '&', ';'];

/// Check that `id` stands alone as one URL path segment.
///
/// Ids are opaque, so only what could escape the segment is refused: path
/// separators, query and fragment markers, percent escapes, quotes, dot
/// segments, whitespace and control characters.
pub fn validate_asset_id(id: &str) -> Result<()> {
    let invalid = id.is_empty()
        || id == "."
        || id == ".."
        || id
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || FORBIDDEN_ID_CHARS.contains(&c));

    if invalid {
        return Err(AtelierError::Validation(format!("Invalid asset id '{}'", id.escape_debug())));
    }
    Ok(())
}

/// The kind of asset an upstream job produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Image,
    Model,
}

impl AssetKind {
    /// File extension of the shared preview
    pub fn preview_extension(&self) -> &'static str {
        match self {
            AssetKind::Image => "png",
            AssetKind::Model => "glb",
        }
    }

    /// MIME type used when the upstream does not report one
    pub fn content_type(&self) -> &'static str {
        match self {
            AssetKind::Image => "image/png",
            AssetKind::Model => "model/gltf-binary",
        }
    }

    /// Parse a user-supplied kind name
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" | "png" => Some(AssetKind::Image),
            "model" | "glb" => Some(AssetKind::Model),
            _ => None,
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Image => write!(f, "image"),
            AssetKind::Model => write!(f, "model"),
        }
    }
}

/// Visibility of an asset on the upstream service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Private,
    Shared,
}

/// Upstream-reported state of a generation job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetStatus {
    Submitted,
    Pending,
    Ready,
    Failed,
    Unknown,
}

impl AssetStatus {
    /// Interpret an upstream status string. Matching is case-insensitive and
    /// anything unrecognized is `Unknown`.
    pub fn from_upstream(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "submitted" => AssetStatus::Submitted,
            "pending" => AssetStatus::Pending,
            "ready" => AssetStatus::Ready,
            "failed" => AssetStatus::Failed,
            _ => AssetStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Submitted => "submitted",
            AssetStatus::Pending => "pending",
            AssetStatus::Ready => "ready",
            AssetStatus::Failed => "failed",
            AssetStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An asset as seen during a single request/response cycle.
///
/// Never persisted: the upstream service owns the lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub kind: AssetKind,
    pub visibility: Visibility,
    pub status: AssetStatus,
}

impl Asset {
    /// A freshly created, still private asset
    pub fn submitted(id: impl Into<AssetId>, kind: AssetKind) -> Self {
        Self {
            id: id.into(),
            kind,
            visibility: Visibility::Private,
            status: AssetStatus::Submitted,
        }
    }

    pub fn is_shared(&self) -> bool {
        self.visibility == Visibility::Shared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_asset_id_accepts_opaque_ids() {
        for id in ["mock-id", "a1", "6f9c2d1e-7b3a-4c5d-9e8f-0a1b2c3d4e5f", "v1.2_final", "..x"] {
            assert!(validate_asset_id(id).is_ok(), "{} should be accepted", id);
        }
    }

    #[test]
    fn test_validate_asset_id_rejects_segment_escapes() {
        for id in [
            "",
            " ",
            ".",
            "..",
            "x/../../admin",
            "abc?debug=1&",
            "abc#frag",
            "x%2F..",
            "a\\b",
            "say\"hi",
            "a b",
            "line\nbreak",
        ] {
            assert!(
                matches!(validate_asset_id(id), Err(AtelierError::Validation(_))),
                "{:?} should be rejected",
                id
            );
        }
    }

    #[test]
    fn test_status_from_upstream() {
        assert_eq!(AssetStatus::from_upstream("ready"), AssetStatus::Ready);
        assert_eq!(AssetStatus::from_upstream("READY"), AssetStatus::Ready);
        assert_eq!(AssetStatus::from_upstream(" Pending "), AssetStatus::Pending);
        assert_eq!(AssetStatus::from_upstream("failed"), AssetStatus::Failed);
        assert_eq!(AssetStatus::from_upstream("processing"), AssetStatus::Unknown);
        assert_eq!(AssetStatus::from_upstream(""), AssetStatus::Unknown);
    }

    #[test]
    fn test_kind_preview_metadata() {
        assert_eq!(AssetKind::Image.preview_extension(), "png");
        assert_eq!(AssetKind::Model.preview_extension(), "glb");
        assert_eq!(AssetKind::Model.content_type(), "model/gltf-binary");
        assert_eq!(AssetKind::parse("GLB"), Some(AssetKind::Model));
        assert_eq!(AssetKind::parse("audio"), None);
    }

    #[test]
    fn test_asset_serializes_lowercase() {
        let asset = Asset::submitted("abc", AssetKind::Model);
        let json = serde_json::to_value(&asset).unwrap();
        assert_eq!(json["kind"], "model");
        assert_eq!(json["visibility"], "private");
        assert_eq!(json["status"], "submitted");
        assert!(!asset.is_shared());
    }
}
