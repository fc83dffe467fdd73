//! Shared utilities for OCR backends.

use std::path::Path;

/// Check if a binary is available, either as a path or by name in PATH.
pub fn check_binary(name: &str) -> bool {
    let path = Path::new(name);
    if path.components().count() > 1 {
        return path.is_file();
    }
    which::which(name).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_binary_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("tesseract");
        std::fs::write(&bin, b"").unwrap();

        assert!(check_binary(bin.to_str().unwrap()));
        assert!(!check_binary(dir.path().join("missing").to_str().unwrap()));
    }

    #[test]
    fn test_check_binary_unknown_name() {
        assert!(!check_binary("errorlens-no-such-binary-xyz"));
    }
}
