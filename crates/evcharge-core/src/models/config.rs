//! Configuration structures for the charge pipeline.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ChargeError, Result};

/// Main configuration for evcharge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EvChargeConfig {
    /// OCR collaborator configuration.
    pub ocr: OcrConfig,

    /// CSV output configuration.
    pub output: OutputConfig,

    /// Image discovery configuration.
    pub discovery: DiscoveryConfig,
}

/// External OCR binary configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Name or path of the tesseract binary.
    pub binary: String,

    /// Page segmentation mode passed through as `--psm`.
    pub psm: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            binary: "tesseract".to_string(),
            psm: "6".to_string(),
        }
    }
}

/// CSV output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// CSV file to create or merge into.
    pub path: PathBuf,

    /// Merge into the existing file instead of overwriting it.
    pub append: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("charges.csv"),
            append: false,
        }
    }
}

/// Which files count as screenshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Accepted extensions, lowercase, without the dot.
    pub image_extensions: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            image_extensions: ["png", "jpg", "jpeg", "heic", "tif", "tiff", "bmp"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

impl DiscoveryConfig {
    /// Whether `path` has one of the configured extensions (case-insensitive).
    pub fn is_image(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.image_extensions.iter().any(|known| *known == ext)
            })
            .unwrap_or(false)
    }
}

impl EvChargeConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| ChargeError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ChargeError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "ocr": { "psm": "4" } }"#).unwrap();

        let config = EvChargeConfig::from_file(&path).unwrap();
        assert_eq!(config.ocr.psm, "4");
        assert_eq!(config.ocr.binary, "tesseract");
        assert_eq!(config.output.path, PathBuf::from("charges.csv"));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = EvChargeConfig::default();
        config.output.append = true;
        config.save(&path).unwrap();

        let loaded = EvChargeConfig::from_file(&path).unwrap();
        assert!(loaded.output.append);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            EvChargeConfig::from_file(&path),
            Err(ChargeError::Config(_))
        ));
    }

    #[test]
    fn test_is_image() {
        let discovery = DiscoveryConfig::default();
        assert!(discovery.is_image(Path::new("shot.PNG")));
        assert!(discovery.is_image(Path::new("a/b/c.jpeg")));
        assert!(!discovery.is_image(Path::new("notes.txt")));
        assert!(!discovery.is_image(Path::new("README")));
    }
}
