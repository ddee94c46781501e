use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::{error, info};

use crate::config::OcrMode;
use crate::llm::{self, CompletionError};
use crate::ocr::{self, OcrError};
use crate::AppState;

use super::models::{ErrorResponse, OcrRequest, OcrResponse, ParseRequest};

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: &str) -> HandlerError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

fn upstream_failure(message: impl Into<String>) -> HandlerError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

pub async fn ocr(
    State(state): State<AppState>,
    Json(payload): Json<OcrRequest>,
) -> Result<Json<OcrResponse>, HandlerError> {
    let image_url = payload.image_url.as_deref().unwrap_or("");
    if image_url.is_empty() {
        return Err(bad_request("imageUrl is required"));
    }

    info!(image_url, "received /ocr request");

    let outcome = match state.config.ocr_mode {
        OcrMode::Reference => {
            ocr::recognize_by_reference(&state, image_url, payload.filetype.as_deref()).await
        }
        OcrMode::Upload => ocr::recognize_by_upload(&state, image_url).await,
    };

    match outcome {
        Ok(text) => Ok(Json(OcrResponse { text })),
        Err(OcrError::Processing(message)) => {
            error!(%message, "OCR provider reported a processing error");
            Err(upstream_failure(message))
        }
        Err(err) => {
            error!(%err, "OCR relay failed");
            Err(upstream_failure("Unexpected OCR failure."))
        }
    }
}

pub async fn parse(
    State(state): State<AppState>,
    Json(payload): Json<ParseRequest>,
) -> Result<Json<Value>, HandlerError> {
    let text = payload.text.as_deref().unwrap_or("").trim();
    if text.is_empty() {
        return Err(bad_request("Missing OCR text"));
    }

    info!(text_len = text.len(), "received /parse request");

    match llm::extract_receipt(&state, text).await {
        Ok(reply) => Ok(Json(llm::reply_to_json(&reply))),
        Err(CompletionError::EmptyReply) => {
            error!("completion provider returned no content");
            Err(upstream_failure("Failed to parse receipt with LLM"))
        }
        Err(err) => {
            error!(%err, "LLM parse failed");
            Err(upstream_failure("Failed to parse receipt with LLM"))
        }
    }
}

pub async fn live() -> &'static str {
    "Receipt OCR/LLM relay is live."
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "route not found".to_string(),
        }),
    )
        .into_response()
}
