//! Text extraction from screenshots through an external OCR binary.

use std::io;
use std::path::Path;
use std::process::Command;

use tracing::{debug, trace};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

/// Anything that can turn an image file into plain text.
pub trait OcrEngine: Send + Sync {
    /// Short engine name, used in logs.
    fn name(&self) -> &'static str;

    /// Recognise the text of `image` using page segmentation mode `psm`.
    fn recognize(&self, image: &Path, psm: &str) -> Result<String, OcrError>;
}

/// Runs `tesseract <image> stdout --psm <psm>` and captures stdout.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    binary: String,
}

impl TesseractEngine {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn from_config(config: &OcrConfig) -> Self {
        Self::new(config.binary.clone())
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::from_config(&OcrConfig::default())
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn recognize(&self, image: &Path, psm: &str) -> Result<String, OcrError> {
        debug!("Running {} on {} (psm {})", self.binary, image.display(), psm);

        let output = Command::new(&self.binary)
            .arg(image)
            .arg("stdout")
            .args(["--psm", psm])
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => OcrError::BinaryNotFound {
                    binary: self.binary.clone(),
                },
                _ => OcrError::Spawn(e),
            })?;

        if !output.status.success() {
            return Err(OcrError::Failed {
                path: image.to_path_buf(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8(output.stdout).map_err(|_| OcrError::InvalidOutput {
            path: image.to_path_buf(),
        })?;
        trace!("OCR produced {} characters", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_is_reported() {
        let engine = TesseractEngine::new("evcharge-no-such-ocr-binary");
        let err = engine
            .recognize(Path::new("screenshot.png"), "6")
            .unwrap_err();

        match err {
            OcrError::BinaryNotFound { binary } => {
                assert_eq!(binary, "evcharge-no-such-ocr-binary")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_config_uses_binary() {
        let config = OcrConfig {
            binary: "/opt/bin/tesseract".to_string(),
            ..OcrConfig::default()
        };
        assert_eq!(TesseractEngine::from_config(&config).binary(), "/opt/bin/tesseract");
        assert_eq!(TesseractEngine::default().binary(), "tesseract");
    }
}
