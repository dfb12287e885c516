//! Binary preview proxy
//!
//! Fetches an asset's shared preview and hands the bytes back untouched, with
//! the metadata a boundary layer needs to serve them. Readiness is not checked
//! first: if the job is still running, the upstream download fails and the
//! caller sees [`AtelierError::UpstreamUnavailable`]. No retry happens here.

use crate::store::AssetStore;
use atelier_core::{validate_asset_id, AssetKind, AtelierError, ContentHash, Result};

/// A preview ready to be served to a caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxiedBinary {
    pub bytes: Vec<u8>,
    pub content_type: String,
    /// `inline; filename="{id}.{ext}"`
    pub content_disposition: String,
    pub file_name: String,
}

impl ProxiedBinary {
    pub fn content_hash(&self) -> ContentHash {
        ContentHash::from_bytes(&self.bytes)
    }
}

/// Fetch the shared preview of `asset_id`.
///
/// Store failures are reported as `UpstreamUnavailable`, carrying the
/// upstream status code when there was one.
pub fn proxy_binary(store: &dyn AssetStore, asset_id: &str, kind: AssetKind) -> Result<ProxiedBinary> {
    // The id lands in the upstream path and in the quoted filename
    validate_asset_id(asset_id)?;

    let payload = store
        .fetch_binary(asset_id, kind)
        .map_err(|e| unavailable(asset_id, e))?;

    let file_name = format!("{}.{}", asset_id, kind.preview_extension());
    tracing::debug!(asset_id, %kind, bytes = payload.bytes.len(), "Proxied preview");

    Ok(ProxiedBinary {
        bytes: payload.bytes,
        content_type: payload
            .content_type
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or_else(|| kind.content_type().to_string()),
        content_disposition: format!("inline; filename=\"{}\"", file_name),
        file_name,
    })
}

fn unavailable(asset_id: &str, err: AtelierError) -> AtelierError {
    match err {
        AtelierError::Validation(_) | AtelierError::UpstreamUnavailable { .. } => err,
        AtelierError::UpstreamRejected { status, body } => AtelierError::UpstreamUnavailable {
            status: Some(status),
            detail: if body.is_empty() {
                format!("preview for {} not available", asset_id)
            } else {
                body
            },
        },
        other => AtelierError::UpstreamUnavailable {
            status: None,
            detail: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::BinaryPayload;
    use crate::stores::mock::MockStore;
    use crate::testing::ScriptedStore;

    #[test]
    fn test_bytes_pass_through_unmodified() {
        let payload: Vec<u8> = (0..=255u8).rev().chain(0..=255u8).collect();
        let store = ScriptedStore::new().with_binaries(vec![Ok(BinaryPayload {
            bytes: payload.clone(),
            content_type: Some("model/gltf-binary".to_string()),
        })]);

        let proxied = proxy_binary(&store, "m-1", AssetKind::Model).unwrap();
        assert_eq!(proxied.bytes, payload);
        assert_eq!(proxied.content_hash(), ContentHash::from_bytes(&payload));
        assert_eq!(proxied.content_type, "model/gltf-binary");
        assert_eq!(proxied.content_disposition, "inline; filename=\"m-1.glb\"");
        assert_eq!(proxied.file_name, "m-1.glb");
    }

    #[test]
    fn test_missing_content_type_falls_back_to_kind() {
        let store = ScriptedStore::new().with_binaries(vec![Ok(BinaryPayload {
            bytes: vec![1, 2, 3],
            content_type: None,
        })]);
        let proxied = proxy_binary(&store, "i-1", AssetKind::Image).unwrap();
        assert_eq!(proxied.content_type, "image/png");
    }

    #[test]
    fn test_rejection_carries_status() {
        let store = ScriptedStore::new();
        match proxy_binary(&store, "m-1", AssetKind::Model) {
            Err(AtelierError::UpstreamUnavailable { status, .. }) => assert_eq!(status, Some(404)),
            other => panic!("expected UpstreamUnavailable, got {:?}", other),
        }
        // Single fetch, no retry
        assert_eq!(store.call_count(), 1);
    }

    #[test]
    fn test_transport_error_has_no_status() {
        let store = ScriptedStore::new().with_binaries(vec![Err(AtelierError::Transport(
            "connection refused".to_string(),
        ))]);
        let err = proxy_binary(&store, "m-1", AssetKind::Model).unwrap_err();
        assert!(matches!(err, AtelierError::UpstreamUnavailable { status: None, .. }));
    }

    #[test]
    fn test_invalid_id_makes_no_call() {
        let store = ScriptedStore::new();
        assert!(matches!(
            proxy_binary(&store, "  ", AssetKind::Model),
            Err(AtelierError::Validation(_))
        ));
        assert!(proxy_binary(&store, "../etc", AssetKind::Model).is_err());
        assert_eq!(store.call_count(), 0);
    }

    #[test]
    fn test_quoted_or_query_ids_rejected_before_fetch() {
        let store = ScriptedStore::new();
        for id in ["say\"hi", "m-1?x=1", "m-1#top", ".."] {
            assert!(matches!(
                proxy_binary(&store, id, AssetKind::Image),
                Err(AtelierError::Validation(_))
            ));
        }
        assert_eq!(store.call_count(), 0);
    }

    #[test]
    fn test_mock_preview() {
        let proxied = proxy_binary(&MockStore::new(), "mock-id", AssetKind::Model).unwrap();
        assert_eq!(&proxied.bytes[..4], b"glTF");
    }
}
