//! Per-asset endpoints: status, readiness wait, preview proxy

use atelier_core::{validate_asset_id, AssetKind, AssetStatus};
use atelier_gen::{await_ready, proxy_binary, BinaryProbe, PollPolicy, Readiness, StatusProbe};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use super::error::{too_early, ApiError};
use super::blocking;
use crate::AppState;

/// Cap on attempts a single wait request may ask for
const MAX_WAIT_ATTEMPTS: u32 = 60;
const MAX_WAIT_DELAY_MS: u64 = 10_000;

/// GET /status/:asset_id
///
/// 200 ready, 425 pending, 202 anything else, 400 for an unusable id, 502 when
/// the upstream call fails.
pub async fn get_status(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
) -> Result<Response, ApiError> {
    validate_asset_id(&asset_id)?;
    let store = Arc::clone(&state.store);
    let snapshot = blocking(move || store.fetch_status(&asset_id)).await?;

    let code = match snapshot.status {
        AssetStatus::Ready => StatusCode::OK,
        AssetStatus::Pending => too_early(),
        _ => StatusCode::ACCEPTED,
    };
    let body = Json(json!({
        "success": snapshot.status == AssetStatus::Ready,
        "status": snapshot.status,
    }));
    Ok((code, body).into_response())
}

/// Which readiness signal a wait request uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeKind {
    #[default]
    Status,
    Binary,
}

/// Query string of GET /wait/:asset_id
#[derive(Debug, Default, Deserialize)]
pub struct WaitParams {
    pub attempts: Option<u32>,
    pub delay_ms: Option<u64>,
    #[serde(default)]
    pub probe: ProbeKind,
    /// Preview kind for the binary probe; defaults to model
    pub kind: Option<AssetKind>,
}

impl WaitParams {
    fn policy(&self) -> PollPolicy {
        let preset = match self.probe {
            ProbeKind::Status => PollPolicy::status_endpoint(),
            ProbeKind::Binary => PollPolicy::binary_endpoint(),
        };
        PollPolicy::new(
            self.attempts
                .unwrap_or(preset.max_attempts)
                .min(MAX_WAIT_ATTEMPTS),
            self.delay_ms
                .map(|ms| Duration::from_millis(ms.min(MAX_WAIT_DELAY_MS)))
                .unwrap_or(preset.delay),
        )
    }
}

/// GET /wait/:asset_id
///
/// Blocks until the asset is ready, failed, or attempts run out. Always 200;
/// the body says which.
pub async fn wait_ready(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
    Query(params): Query<WaitParams>,
) -> Result<Response, ApiError> {
    validate_asset_id(&asset_id)?;
    let policy = params.policy();
    let probe = params.probe;
    let kind = params.kind.unwrap_or(AssetKind::Model);
    let store = Arc::clone(&state.store);

    let outcome = blocking(move || {
        let store = store.as_ref();
        Ok(match probe {
            ProbeKind::Status => await_ready(&StatusProbe::new(store), &asset_id, policy),
            ProbeKind::Binary => await_ready(&BinaryProbe::new(store, kind), &asset_id, policy),
        })
    })
    .await?;

    let status = match outcome.last {
        Some(Readiness::Ready) => "ready",
        Some(Readiness::Failed) => "failed",
        Some(Readiness::Pending) => "pending",
        None => "unknown",
    };
    let body = Json(json!({
        "ready": outcome.ready,
        "attempts": outcome.attempts,
        "status": status,
    }));
    Ok(body.into_response())
}

/// GET /proxy-glb/:asset_id
pub async fn proxy_glb(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
) -> Result<Response, ApiError> {
    proxy(state, asset_id, AssetKind::Model).await
}

/// GET /proxy-image/:asset_id
pub async fn proxy_image(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
) -> Result<Response, ApiError> {
    proxy(state, asset_id, AssetKind::Image).await
}

async fn proxy(state: AppState, asset_id: String, kind: AssetKind) -> Result<Response, ApiError> {
    let store = Arc::clone(&state.store);
    let binary = blocking(move || proxy_binary(store.as_ref(), &asset_id, kind)).await?;

    let etag = binary.content_hash().etag();
    let headers = [
        (header::CONTENT_TYPE, binary.content_type),
        (header::CONTENT_DISPOSITION, binary.content_disposition),
        (header::ETAG, etag),
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*".to_string()),
    ];
    Ok((headers, binary.bytes).into_response())
}
