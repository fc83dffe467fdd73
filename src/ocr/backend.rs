//! OCR backend abstraction.
//!
//! The resolution pipeline only consumes text, so any engine that can turn an
//! image file into a string can sit behind [`OcrBackend`].

use std::path::Path;
use std::time::Instant;
use thiserror::Error;

/// Errors from OCR backends.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Backend not available: {0}")]
    BackendNotAvailable(String),

    #[error("OCR failed: {0}")]
    OcrFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of OCR processing.
#[derive(Debug, Clone)]
pub struct OcrResult {
    /// Extracted text content.
    pub text: String,
    /// Which backend produced this result.
    pub backend: OcrBackendType,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Available OCR backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OcrBackendType {
    /// Tesseract OCR via command-line.
    Tesseract,
    /// Text supplied directly, no recognition performed.
    Passthrough,
}

impl OcrBackendType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OcrBackendType::Tesseract => "tesseract",
            OcrBackendType::Passthrough => "passthrough",
        }
    }
}

impl std::fmt::Display for OcrBackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trait for OCR backends.
pub trait OcrBackend: Send + Sync {
    /// Get the backend type.
    fn backend_type(&self) -> OcrBackendType;

    /// Check if this backend is available (binary installed, languages present).
    fn is_available(&self) -> bool;

    /// Get a description of what's needed to make this backend available.
    fn availability_hint(&self) -> String;

    /// Core OCR: extract text from an image file.
    fn run_ocr(&self, image_path: &Path) -> Result<String, OcrError>;

    /// Run OCR on an image file, returning a timed result.
    fn ocr_image(&self, image_path: &Path) -> Result<OcrResult, OcrError> {
        let start = Instant::now();
        let text = self.run_ocr(image_path)?;
        Ok(OcrResult {
            text,
            backend: self.backend_type(),
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Configuration for OCR backends.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Tesseract executable, either a bare name looked up in PATH or a full path.
    pub tesseract_cmd: String,
    /// Tesseract language spec (e.g., "eng", "tha+eng").
    pub language: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_cmd: "tesseract".to_string(),
            language: "tha+eng".to_string(),
        }
    }
}

/// Backend that returns fixed text regardless of the image.
///
/// Used to drive the pipeline from already-recognised text.
#[derive(Debug, Clone, Default)]
pub struct PassthroughBackend {
    text: String,
}

impl PassthroughBackend {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl OcrBackend for PassthroughBackend {
    fn backend_type(&self) -> OcrBackendType {
        OcrBackendType::Passthrough
    }

    fn is_available(&self) -> bool {
        true
    }

    fn availability_hint(&self) -> String {
        "Passthrough is always available".to_string()
    }

    fn run_ocr(&self, _image_path: &Path) -> Result<String, OcrError> {
        Ok(self.text.clone())
    }
}
