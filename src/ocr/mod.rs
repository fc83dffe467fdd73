//! OCR for error dialog screenshots.
//!
//! ## OCR Backends
//!
//! - **Tesseract**: command-line OCR, reads mixed Thai/English text (default)
//! - **Passthrough**: returns text that was recognised elsewhere
//!
//! Image preprocessing is not performed; the screenshot is handed to the
//! engine as uploaded.

mod backend;
mod model_utils;
mod tesseract;

pub use backend::{
    OcrBackend, OcrBackendType, OcrConfig, OcrError, OcrResult, PassthroughBackend,
};
pub use model_utils::check_binary;
pub use tesseract::TesseractBackend;
