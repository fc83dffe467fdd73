//! Screenshot upload handler.

use std::io::Write;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::super::AppState;
use crate::ocr::{OcrBackend, OcrError};
use crate::pipeline::ResolutionStatus;

/// Multipart field carrying the screenshot.
pub const IMAGE_FIELD: &str = "image";

/// Successful resolution, shaped for the existing front-end.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// The extracted error message (not the full OCR text).
    pub ocr_text: String,
    /// Answer, or a fallback sentence.
    pub response: String,
}

/// Returned when no error message could be isolated.
#[derive(Debug, Serialize)]
pub struct NoMessageResponse {
    pub response: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Accept a screenshot, OCR it, and resolve the error message it shows.
pub async fn upload_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(m) => m,
        Err(e) => {
            debug!("Rejected upload without multipart body: {}", e);
            return error_response(StatusCode::BAD_REQUEST, "No image provided");
        }
    };

    let image = match read_field(&mut multipart, IMAGE_FIELD).await {
        Ok(Some(bytes)) if !bytes.is_empty() => bytes,
        Ok(_) => return error_response(StatusCode::BAD_REQUEST, "No image provided"),
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("Invalid multipart body: {}", e),
            )
        }
    };

    let extension = match infer::get(&image) {
        Some(kind) if kind.matcher_type() == infer::MatcherType::Image => kind.extension(),
        other => {
            debug!(
                "Rejected upload with MIME type {:?}",
                other.map(|k| k.mime_type())
            );
            return error_response(StatusCode::BAD_REQUEST, "Unsupported image format");
        }
    };

    let text = match recognize(state.ocr.clone(), image, extension).await {
        Ok(text) => text,
        Err(e) => {
            warn!("OCR failed: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };
    info!("Full OCR text: {}", text);

    let resolution = state
        .pipeline
        .resolve(&text, state.knowledge.as_ref())
        .await;

    if resolution.status == ResolutionStatus::NoMessageFound {
        return Json(NoMessageResponse {
            response: resolution.response_text().to_string(),
        })
        .into_response();
    }

    Json(UploadResponse {
        response: resolution.response_text().to_string(),
        ocr_text: resolution.extracted_message,
    })
    .into_response()
}

/// Read the first field named `name`, skipping any others.
async fn read_field(
    multipart: &mut Multipart,
    name: &str,
) -> Result<Option<Bytes>, axum::extract::multipart::MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(name) {
            return Ok(Some(field.bytes().await?));
        }
    }
    Ok(None)
}

/// Write the upload to a temp file and OCR it off the async runtime.
async fn recognize(
    backend: Arc<dyn OcrBackend>,
    image: Bytes,
    extension: &str,
) -> Result<String, OcrError> {
    let mut file = tempfile::Builder::new()
        .prefix("errorlens-upload-")
        .suffix(&format!(".{}", extension))
        .tempfile()?;
    file.write_all(&image)?;
    file.flush()?;

    let result = tokio::task::spawn_blocking(move || backend.ocr_image(file.path()))
        .await
        .map_err(|e| OcrError::OcrFailed(format!("OCR task panicked: {}", e)))??;

    debug!(
        "{} OCR finished in {}ms",
        result.backend, result.processing_time_ms
    );
    Ok(result.text)
}
