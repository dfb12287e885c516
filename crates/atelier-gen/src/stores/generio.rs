//! Generio asset store
//!
//! Talks to the Generio creative-asset API over blocking HTTP. Every call is a
//! single request: readiness retries live in [`crate::poller`], not here.

use crate::config::AtelierConfig;
use crate::store::{AssetStore, BinaryPayload, StatusSnapshot};
use atelier_core::{validate_asset_id, AssetId, AssetKind, AssetStatus, AtelierError, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{json, Value};
use ureq::http::Response;
use ureq::Body;

/// Longest edge, in pixels, the upstream keeps for uploaded images
pub const UPLOAD_RESOLUTION: u32 = 1024;
const IMAGE_RESOLUTION: u32 = 1024;
const FILE_KEY: &str = "default";
const PREVIEW_NAME: &str = "preview";
const PROMPT_APP: &str = "generio-ui-dev";
const UPLOAD_APP: &str = "library";
const SKETCH_APP: &str = "sketch";
const MAX_BINARY_BYTES: u64 = 256 * 1024 * 1024;
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Generio store backed by a shared `ureq` agent
pub struct GenerioStore {
    agent: ureq::Agent,
    api_base: String,
    bearer: String,
    execution_mode: String,
}

impl GenerioStore {
    /// Create a store from config; fails if no auth token is configured
    pub fn from_config(config: &AtelierConfig) -> Result<Self> {
        let token = config.require_token()?;

        let agent_config = ureq::Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .http_status_as_error(false)
            .build();

        Ok(Self {
            agent: agent_config.into(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            bearer: format!("Bearer {}", token),
            execution_mode: config.execution_mode.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn post_json(&self, path: &str, payload: &Value) -> Result<Value> {
        tracing::debug!(path, "POST upstream");
        let response = self
            .agent
            .post(&self.url(path))
            .header("Authorization", &self.bearer)
            .header("x-execution-mode", &self.execution_mode)
            .send_json(payload)
            .map_err(transport_error)?;
        read_json(ensure_success(response)?)
    }

    fn put_json(&self, path: &str, payload: &Value) -> Result<()> {
        tracing::debug!(path, "PUT upstream");
        let response = self
            .agent
            .put(&self.url(path))
            .header("Authorization", &self.bearer)
            .header("x-execution-mode", &self.execution_mode)
            .send_json(payload)
            .map_err(transport_error)?;
        ensure_success(response)?;
        Ok(())
    }

    fn get_json(&self, path: &str) -> Result<Value> {
        tracing::debug!(path, "GET upstream");
        let response = self
            .agent
            .get(&self.url(path))
            .header("Authorization", &self.bearer)
            .header("x-execution-mode", &self.execution_mode)
            .call()
            .map_err(transport_error)?;
        read_json(ensure_success(response)?)
    }

    /// Shared files are public, so this request goes out without credentials.
    fn get_public_bytes(&self, path: &str) -> Result<BinaryPayload> {
        tracing::debug!(path, "GET shared file");
        let response = self
            .agent
            .get(&self.url(path))
            .call()
            .map_err(transport_error)?;
        let mut response = ensure_success(response)?;

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response
            .body_mut()
            .with_config()
            .limit(MAX_BINARY_BYTES)
            .read_to_vec()
            .map_err(transport_error)?;

        Ok(BinaryPayload {
            bytes,
            content_type,
        })
    }
}

impl AssetStore for GenerioStore {
    fn name(&self) -> &str {
        "generio"
    }

    fn upload_asset(&self, bytes: &[u8]) -> Result<AssetId> {
        let response = self.post_json("/assets", &upload_payload(bytes))?;
        parse_first_asset_id(&response)
    }

    fn generate_from_prompt(&self, kind: AssetKind, prompt: &str) -> Result<AssetId> {
        let (path, payload) = match kind {
            AssetKind::Image => ("/images/from-prompt", image_payload(prompt)),
            AssetKind::Model => ("/models/from-prompt", model_payload(prompt)),
        };
        let response = self.post_json(path, &payload)?;
        parse_first_asset_id(&response)
    }

    fn generate_from_asset(&self, asset_id: &str, prompt: Option<&str>) -> Result<AssetId> {
        let payload = model_from_asset_payload(asset_id, prompt);
        let response = self.post_json("/models/from-assets", &payload)?;
        parse_first_asset_id(&response)
    }

    fn set_shared(&self, asset_id: &str) -> Result<()> {
        let path = format!("/assets/{}/shared", asset_segment(asset_id)?);
        self.put_json(&path, &json!({ "shared": 1 }))
    }

    fn fetch_status(&self, asset_id: &str) -> Result<StatusSnapshot> {
        let path = format!("/assets/{}/files/{}/status", asset_segment(asset_id)?, FILE_KEY);
        parse_status(self.get_json(&path)?)
    }

    fn fetch_binary(&self, asset_id: &str, kind: AssetKind) -> Result<BinaryPayload> {
        validate_asset_id(asset_id)?;
        self.get_public_bytes(&shared_preview_path(asset_id, kind))
    }

    fn preview_url(&self, asset_id: &str, kind: AssetKind, _prompt: Option<&str>) -> String {
        self.url(&shared_preview_path(asset_id, kind))
    }
}

/// Validated, percent-encoded `asset_id` for use as one path segment
fn asset_segment(asset_id: &str) -> Result<String> {
    validate_asset_id(asset_id)?;
    Ok(urlencoding::encode(asset_id).into_owned())
}

/// `/assets/{id}/shared/files/default/preview.{ext}`, id percent-encoded
pub fn shared_preview_path(asset_id: &str, kind: AssetKind) -> String {
    format!(
        "/assets/{}/shared/files/{}/{}.{}",
        urlencoding::encode(asset_id),
        FILE_KEY,
        PREVIEW_NAME,
        kind.preview_extension()
    )
}

/// Request body for `POST /assets`
pub fn upload_payload(bytes: &[u8]) -> Value {
    let data_url = format!("data:image/png;base64,{}", BASE64.encode(bytes));
    json!({
        "app": UPLOAD_APP,
        "file_key": FILE_KEY,
        "file_data": data_url,
        "file_process": { "mode": "limit", "resolution": UPLOAD_RESOLUTION },
        "shared": 0
    })
}

/// Request body for `POST /images/from-prompt`
pub fn image_payload(prompt: &str) -> Value {
    json!({
        "app": PROMPT_APP,
        "prompt_positive": prompt,
        "seeds": [-1],
        "resolution": IMAGE_RESOLUTION,
        "diffusion": {
            "adherence": 2,
            "denoising": 1,
            "model": "generio-v1-sfw",
            "steps": 6
        },
        "alpha": { "active": false, "fill": { "active": false, "margin": 10 } },
        "additional": {}
    })
}

/// Request body for `POST /models/from-prompt`
pub fn model_payload(prompt: &str) -> Value {
    let mut payload = model_settings(PROMPT_APP);
    payload["prompt_positive"] = json!(prompt);
    payload
}

/// Request body for `POST /models/from-assets`.
///
/// `prompt_positive` is omitted unless the prompt has content; the upstream
/// treats an empty string differently from an absent field.
pub fn model_from_asset_payload(asset_id: &str, prompt: Option<&str>) -> Value {
    let mut payload = model_settings(SKETCH_APP);
    payload["assets"] = json!([{ "id": asset_id, "file_key": FILE_KEY }]);
    if let Some(p) = prompt.filter(|p| !p.is_empty()) {
        payload["prompt_positive"] = json!(p);
    }
    payload
}

fn model_settings(app: &str) -> Value {
    json!({
        "app": app,
        "seeds": [-1],
        "quality": "high",
        "keep_ratio": 0.95,
        "geometry_adherence": 7.5,
        "material_adherence": 3,
        "material_active": true,
        "texture_active": true,
        "additional": {}
    })
}

/// Extract `assets[0].id` from a creation response
pub fn parse_first_asset_id(response: &Value) -> Result<AssetId> {
    let assets = response
        .get("assets")
        .and_then(|a| a.as_array())
        .ok_or_else(|| AtelierError::MalformedResponse("response has no 'assets' list".to_string()))?;

    assets
        .first()
        .and_then(|a| a.get("id"))
        .and_then(|id| id.as_str())
        .filter(|id| !id.is_empty())
        .map(|id| id.to_string())
        .ok_or_else(|| AtelierError::MalformedResponse("No asset ID returned.".to_string()))
}

/// Interpret a status record. A missing `status` field reads as `unknown`.
pub fn parse_status(response: Value) -> Result<StatusSnapshot> {
    if !response.is_object() {
        return Err(AtelierError::MalformedResponse(format!(
            "status record is not an object: {}",
            response
        )));
    }

    let status = response
        .get("status")
        .and_then(|s| s.as_str())
        .map(AssetStatus::from_upstream)
        .unwrap_or(AssetStatus::Unknown);

    let details = response
        .get("details")
        .and_then(|d| d.as_str())
        .unwrap_or_default()
        .to_string();

    Ok(StatusSnapshot {
        status,
        details,
        raw: response,
    })
}

fn ensure_success(mut response: Response<Body>) -> Result<Response<Body>> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.body_mut().read_to_string().unwrap_or_default();
    Err(AtelierError::UpstreamRejected {
        status: status.as_u16(),
        body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
    })
}

fn read_json(mut response: Response<Body>) -> Result<Value> {
    let text = response.body_mut().read_to_string().map_err(transport_error)?;
    serde_json::from_str(&text)
        .map_err(|e| AtelierError::MalformedResponse(format!("invalid JSON body: {}", e)))
}

fn transport_error(e: ureq::Error) -> AtelierError {
    match e {
        ureq::Error::StatusCode(status) => AtelierError::UpstreamRejected {
            status,
            body: String::new(),
        },
        other => AtelierError::Transport(other.to_string()),
    }
}
