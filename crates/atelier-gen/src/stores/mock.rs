//! Mock store for offline use and testing
//!
//! Returns canned, deterministic results without any network calls. Previews
//! are real files: a solid-colour PNG for images and a single-triangle GLB for
//! models, so downstream viewers can load them.

use crate::store::{AssetStore, BinaryPayload, StatusSnapshot};
use atelier_core::{AssetId, AssetKind, AssetStatus, AtelierError, Result};
use std::io::Cursor;

/// Id returned for every generation call
pub const MOCK_ASSET_ID: &str = "mock-id";
/// Id returned for every upload
pub const MOCK_UPLOAD_ID: &str = "mock-upload-id";
const PLACEHOLDER_BASE: &str = "https://via.placeholder.com/512x512";
const PREVIEW_SIZE: u32 = 64;

/// A store that answers every call locally
#[derive(Default)]
pub struct MockStore;

impl MockStore {
    pub fn new() -> Self {
        Self
    }
}

impl AssetStore for MockStore {
    fn name(&self) -> &str {
        "mock"
    }

    fn upload_asset(&self, _bytes: &[u8]) -> Result<AssetId> {
        Ok(MOCK_UPLOAD_ID.to_string())
    }

    fn generate_from_prompt(&self, _kind: AssetKind, _prompt: &str) -> Result<AssetId> {
        Ok(MOCK_ASSET_ID.to_string())
    }

    fn generate_from_asset(&self, _asset_id: &str, _prompt: Option<&str>) -> Result<AssetId> {
        Ok(MOCK_ASSET_ID.to_string())
    }

    fn set_shared(&self, _asset_id: &str) -> Result<()> {
        Ok(())
    }

    fn fetch_status(&self, _asset_id: &str) -> Result<StatusSnapshot> {
        // Mock jobs complete instantly
        Ok(StatusSnapshot {
            status: AssetStatus::Ready,
            details: "mock".to_string(),
            raw: serde_json::json!({ "status": "ready" }),
        })
    }

    fn fetch_binary(&self, asset_id: &str, kind: AssetKind) -> Result<BinaryPayload> {
        let bytes = match kind {
            AssetKind::Image => solid_png(asset_id, PREVIEW_SIZE, PREVIEW_SIZE)?,
            AssetKind::Model => minimal_glb()?,
        };
        Ok(BinaryPayload {
            bytes,
            content_type: Some(kind.content_type().to_string()),
        })
    }

    fn preview_url(&self, _asset_id: &str, kind: AssetKind, prompt: Option<&str>) -> String {
        placeholder_url(kind, prompt.unwrap_or_default())
    }

    fn url_source(&self) -> &str {
        "mock"
    }
}

/// Placeholder image URL whose caption echoes the prompt, words joined by `+`
pub fn placeholder_url(kind: AssetKind, prompt: &str) -> String {
    let label = match kind {
        AssetKind::Image => "Image",
        AssetKind::Model => "Model",
    };
    let caption = std::iter::once(label.to_string())
        .chain(prompt.split_whitespace().map(|w| urlencoding::encode(w).into_owned()))
        .collect::<Vec<_>>()
        .join("+");
    format!("{}.{}?text={}", PLACEHOLDER_BASE, kind.preview_extension(), caption)
}

/// Encode a solid-colour PNG whose colour is derived from `seed`
fn solid_png(seed: &str, width: u32, height: u32) -> Result<Vec<u8>> {
    let hash_val = seed
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
    let r = ((hash_val >> 16) & 0xFF) as u8;
    let g = ((hash_val >> 8) & 0xFF) as u8;
    let b = (hash_val & 0xFF) as u8;

    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([r, g, b, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .map_err(|e| encode_error("PNG", e))?;
    Ok(out.into_inner())
}

fn encode_error(what: &str, e: impl std::fmt::Display) -> AtelierError {
    AtelierError::Io(std::io::Error::other(format!(
        "Failed to encode mock {}: {}",
        what, e
    )))
}

/// Build the smallest valid glTF 2.0 binary: one triangle
fn minimal_glb() -> Result<Vec<u8>> {
    const TRIANGLE: [[f32; 3]; 3] = [[-1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
    const GL_FLOAT: u32 = 5126;
    const GL_UNSIGNED_SHORT: u32 = 5123;

    let mut bin_chunk: Vec<u8> = TRIANGLE
        .iter()
        .flatten()
        .flat_map(|c| c.to_le_bytes())
        .collect();
    let positions_len = bin_chunk.len();
    bin_chunk.extend((0u16..3).flat_map(|i| i.to_le_bytes()));
    let indices_len = bin_chunk.len() - positions_len;
    bin_chunk.resize(align4(bin_chunk.len()), 0);

    let gltf = serde_json::json!({
        "asset": { "version": "2.0", "generator": "atelier-mock" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "mesh": 0 }],
        "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1 }] }],
        "accessors": [
            { "bufferView": 0, "componentType": GL_FLOAT, "count": 3, "type": "VEC3",
              "min": [-1.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
            { "bufferView": 1, "componentType": GL_UNSIGNED_SHORT, "count": 3, "type": "SCALAR",
              "min": [0], "max": [2] }
        ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": positions_len, "target": 34962 },
            { "buffer": 0, "byteOffset": positions_len, "byteLength": indices_len, "target": 34963 }
        ],
        "buffers": [{ "byteLength": bin_chunk.len() }]
    });

    let mut json_chunk = serde_json::to_vec(&gltf).map_err(|e| encode_error("GLB", e))?;
    json_chunk.resize(align4(json_chunk.len()), b' ');

    let total_len = (12 + 8 + json_chunk.len() + 8 + bin_chunk.len()) as u32;

    let mut out = Vec::with_capacity(total_len as usize);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&total_len.to_le_bytes());
    for (kind, chunk) in [(b"JSON", &json_chunk), (b"BIN\0", &bin_chunk)] {
        out.extend_from_slice(&(chunk.len() as u32).to_le_bytes());
        out.extend_from_slice(kind);
        out.extend_from_slice(chunk);
    }

    Ok(out)
}

fn align4(len: usize) -> usize {
    (len + 3) & !3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_url_echoes_prompt() {
        let url = placeholder_url(AssetKind::Image, "a red cube");
        assert_eq!(url, "https://via.placeholder.com/512x512.png?text=Image+a+red+cube");
    }

    #[test]
    fn test_placeholder_url_encodes_words() {
        let url = placeholder_url(AssetKind::Model, "  chair & table ");
        assert!(url.starts_with("https://via.placeholder.com/512x512.glb?text=Model+"));
        assert!(url.ends_with("chair+%26+table"));
    }

    #[test]
    fn test_mock_ids_are_deterministic() {
        let store = MockStore::new();
        assert_eq!(store.generate_from_prompt(AssetKind::Image, "x").unwrap(), MOCK_ASSET_ID);
        assert_eq!(store.upload_asset(b"png").unwrap(), MOCK_UPLOAD_ID);
        assert_eq!(
            store.generate_from_asset(MOCK_UPLOAD_ID, None).unwrap(),
            MOCK_ASSET_ID
        );
        assert_eq!(store.fetch_status("anything").unwrap().status, AssetStatus::Ready);
    }

    #[test]
    fn test_mock_png_preview_decodes() {
        let store = MockStore::new();
        let binary = store.fetch_binary("mock-id", AssetKind::Image).unwrap();
        assert_eq!(binary.content_type.as_deref(), Some("image/png"));

        let img = image::load_from_memory(&binary.bytes).unwrap();
        assert_eq!(img.width(), PREVIEW_SIZE);
        assert_eq!(img.height(), PREVIEW_SIZE);
    }

    #[test]
    fn test_mock_glb_preview_header() {
        let store = MockStore::new();
        let binary = store.fetch_binary("mock-id", AssetKind::Model).unwrap();
        let bytes = binary.bytes;

        assert_eq!(&bytes[..4], b"glTF");
        let declared = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        assert_eq!(declared as usize, bytes.len());
        assert_eq!(bytes.len() % 4, 0);
    }
}
