//! Tesseract OCR backend implementation.
//!
//! Uses Tesseract OCR via command-line for text extraction. The executable is
//! taken from [`OcrConfig::tesseract_cmd`], so installs outside PATH (such as
//! `C:\Program Files\Tesseract-OCR\tesseract.exe`) work without touching
//! global state.

use std::path::Path;
use std::process::Command;

use super::backend::{OcrBackend, OcrBackendType, OcrConfig, OcrError};
use super::model_utils::check_binary;

/// Tesseract OCR backend.
pub struct TesseractBackend {
    config: OcrConfig,
}

impl TesseractBackend {
    /// Create a new Tesseract backend with default configuration.
    pub fn new() -> Self {
        Self {
            config: OcrConfig::default(),
        }
    }

    /// Create a new Tesseract backend with custom configuration.
    pub fn with_config(config: OcrConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OcrConfig {
        &self.config
    }

    /// Build the command line for `image_path`.
    fn command(&self, image_path: &Path) -> Command {
        let mut cmd = Command::new(&self.config.tesseract_cmd);
        cmd.arg(image_path)
            .arg("stdout")
            .args(["-l", &self.config.language]);
        cmd
    }

    /// Run Tesseract on an image file.
    fn run_tesseract(&self, image_path: &Path) -> Result<String, OcrError> {
        let output = self.command(image_path).output();

        match output {
            Ok(output) => {
                if output.status.success() {
                    Ok(String::from_utf8_lossy(&output.stdout).to_string())
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    Err(OcrError::OcrFailed(format!(
                        "tesseract failed: {}",
                        stderr.trim()
                    )))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(OcrError::BackendNotAvailable(format!(
                    "{} not found (install tesseract-ocr or set ocr.tesseract_cmd)",
                    self.config.tesseract_cmd
                )))
            }
            Err(e) => Err(OcrError::Io(e)),
        }
    }
}

impl Default for TesseractBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrBackend for TesseractBackend {
    fn backend_type(&self) -> OcrBackendType {
        OcrBackendType::Tesseract
    }

    fn is_available(&self) -> bool {
        check_binary(&self.config.tesseract_cmd)
    }

    fn availability_hint(&self) -> String {
        if !check_binary(&self.config.tesseract_cmd) {
            format!(
                "Tesseract not found at '{}'. Install with: apt install tesseract-ocr tesseract-ocr-tha",
                self.config.tesseract_cmd
            )
        } else {
            "Tesseract is available".to_string()
        }
    }

    fn run_ocr(&self, image_path: &Path) -> Result<String, OcrError> {
        self.run_tesseract(image_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line() {
        let backend = TesseractBackend::with_config(OcrConfig {
            tesseract_cmd: "/opt/tesseract/bin/tesseract".to_string(),
            language: "tha+eng".to_string(),
        });
        let cmd = backend.command(Path::new("/tmp/shot.png"));

        assert_eq!(cmd.get_program(), "/opt/tesseract/bin/tesseract");
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, ["/tmp/shot.png", "stdout", "-l", "tha+eng"]);
    }

    #[test]
    fn test_missing_binary() {
        let backend = TesseractBackend::with_config(OcrConfig {
            tesseract_cmd: "/nonexistent/tesseract-binary".to_string(),
            ..OcrConfig::default()
        });
        assert!(!backend.is_available());
        assert!(backend.availability_hint().contains("/nonexistent/tesseract-binary"));

        let err = backend.run_ocr(Path::new("shot.png")).unwrap_err();
        assert!(matches!(err, OcrError::BackendNotAvailable(_)));
    }
}
