//! Service status handlers.

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;

use super::super::AppState;
use crate::knowledge::KnowledgeBaseLookup;
use crate::ocr::OcrBackend;

/// Health report.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ocr_backend: String,
    pub ocr_available: bool,
    pub knowledge_base: String,
    pub threshold: u8,
}

/// Health check with collaborator availability.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    // Availability probes the filesystem for the OCR binary.
    let ocr = state.ocr.clone();
    let ocr_available = tokio::task::spawn_blocking(move || ocr.is_available())
        .await
        .unwrap_or(false);

    Json(HealthResponse {
        status: "ok",
        ocr_backend: state.ocr.backend_type().to_string(),
        ocr_available,
        knowledge_base: state.knowledge.name().to_string(),
        threshold: state.pipeline.threshold(),
    })
}
