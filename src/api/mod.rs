mod handlers;
mod models;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::AppState;

pub use handlers::{live, not_found, ocr, parse};
pub use models::{ErrorResponse, OcrRequest, OcrResponse, ParseRequest};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ocr", post(ocr))
        .route("/parse", post(parse))
        .route("/", get(live))
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
