//! Generation endpoints
//!
//! Every route answers 200 with a `GenerationResult`; failures are reported in
//! the body (`success: false`), never as an HTTP error.

use atelier_gen::{GenerationRequest, GenerationResult};
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::AppState;

/// JSON body of the text generation routes
#[derive(Debug, Default, Deserialize)]
pub struct PromptBody {
    #[serde(default)]
    pub prompt: Option<String>,
}

impl PromptBody {
    /// Parse a request body leniently: no content-type requirement, and an
    /// empty body, `null` or a null prompt all read as "no prompt".
    pub fn from_body(body: &[u8]) -> Result<Self, String> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice::<Option<PromptBody>>(body)
            .map(Option::unwrap_or_default)
            .map_err(|e| format!("Invalid JSON body: {}", e))
    }
}

/// Query string of the sketch routes
#[derive(Debug, Default, Deserialize)]
pub struct SketchParams {
    #[serde(default)]
    pub prompt: Option<String>,
}

/// POST /generate/text-to-image
pub async fn text_to_image(State(state): State<AppState>, body: Bytes) -> Json<GenerationResult> {
    match PromptBody::from_body(&body) {
        Ok(body) => {
            let prompt = body.prompt.unwrap_or_default();
            run(state, GenerationRequest::TextToImage { prompt }).await
        }
        Err(message) => Json(GenerationResult::failed(message)),
    }
}

/// POST /generate/text-to-model
pub async fn text_to_model(State(state): State<AppState>, body: Bytes) -> Json<GenerationResult> {
    match PromptBody::from_body(&body) {
        Ok(body) => {
            let prompt = body.prompt.unwrap_or_default();
            run(state, GenerationRequest::TextToModel { prompt }).await
        }
        Err(message) => Json(GenerationResult::failed(message)),
    }
}

/// POST /generate/sketch-to-model (also mounted as image-to-model)
///
/// The raw request body is the image; `?prompt=` adds optional guidance.
pub async fn sketch_to_model(
    State(state): State<AppState>,
    Query(params): Query<SketchParams>,
    body: Bytes,
) -> Json<GenerationResult> {
    run(
        state,
        GenerationRequest::SketchToModel {
            image_bytes: body.to_vec(),
            prompt: params.prompt,
        },
    )
    .await
}

async fn run(state: AppState, request: GenerationRequest) -> Json<GenerationResult> {
    let orchestrator = state.orchestrator.clone();
    let result = tokio::task::spawn_blocking(move || orchestrator.generate(&request))
        .await
        .unwrap_or_else(|e| GenerationResult::failed(format!("generation task failed: {}", e)));
    Json(result)
}
