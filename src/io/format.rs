//! Serialization format definitions

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported model serialization formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelFormat {
    /// JSON format (human-readable, larger file size)
    Json,

    /// YAML format (human-readable)
    Yaml,

    /// SafeTensors format (compact binary, the default)
    SafeTensors,
}

impl ModelFormat {
    /// All formats, in lookup order
    pub const ALL: [ModelFormat; 3] = [ModelFormat::SafeTensors, ModelFormat::Json, ModelFormat::Yaml];

    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ModelFormat::Json => "json",
            ModelFormat::Yaml => "yaml",
            ModelFormat::SafeTensors => "safetensors",
        }
    }

    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(ModelFormat::Json),
            "yaml" | "yml" => Some(ModelFormat::Yaml),
            "safetensors" => Some(ModelFormat::SafeTensors),
            _ => None,
        }
    }

    /// Detect the format of a model file
    ///
    /// The extension wins when it is recognized. Otherwise the content is
    /// sniffed: a leading `{` is JSON, an 8-byte header length followed by
    /// `{` is SafeTensors, anything else is treated as YAML.
    pub fn detect(path: &Path, data: &[u8]) -> Self {
        if let Some(format) = path
            .extension()
            .and_then(|s| s.to_str())
            .and_then(ModelFormat::from_extension)
        {
            return format;
        }

        if looks_like_safetensors(data) {
            return ModelFormat::SafeTensors;
        }

        let first = data.iter().find(|b| !b.is_ascii_whitespace());
        if first == Some(&b'{') {
            ModelFormat::Json
        } else {
            ModelFormat::Yaml
        }
    }
}

impl std::str::FromStr for ModelFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelFormat::from_extension(s).ok_or_else(|| {
            format!(
                "Unknown model format: {}. Valid formats: json, yaml, safetensors",
                s
            )
        })
    }
}

/// Header length fits in the data and the JSON header starts right after it
fn looks_like_safetensors(data: &[u8]) -> bool {
    let Some(len_bytes) = data.get(..8) else {
        return false;
    };
    let mut buf = [0u8; 8];
    buf.copy_from_slice(len_bytes);
    let header_len = u64::from_le_bytes(buf);
    data.get(8) == Some(&b'{') && header_len <= (data.len() - 8) as u64
}

/// Configuration for saving models
#[derive(Debug, Clone)]
pub struct SaveConfig {
    /// Serialization format
    pub format: ModelFormat,

    /// Whether to pretty-print (for JSON)
    pub pretty: bool,
}

impl SaveConfig {
    /// Create new save config with format
    pub fn new(format: ModelFormat) -> Self {
        Self {
            format,
            pretty: true,
        }
    }

    /// Enable/disable pretty printing
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self::new(ModelFormat::SafeTensors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_extension() {
        assert_eq!(ModelFormat::Json.extension(), "json");
        assert_eq!(ModelFormat::Yaml.extension(), "yaml");
        assert_eq!(ModelFormat::SafeTensors.extension(), "safetensors");
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ModelFormat::from_extension("json"), Some(ModelFormat::Json));
        assert_eq!(ModelFormat::from_extension("JSON"), Some(ModelFormat::Json));
        assert_eq!(ModelFormat::from_extension("yml"), Some(ModelFormat::Yaml));
        assert_eq!(
            ModelFormat::from_extension("SafeTensors"),
            Some(ModelFormat::SafeTensors)
        );
        assert_eq!(ModelFormat::from_extension("pkl"), None);
    }

    #[test]
    fn test_detect_prefers_extension() {
        let format = ModelFormat::detect(Path::new("model.yaml"), b"{\"class_name\": 1}");
        assert_eq!(format, ModelFormat::Yaml);
    }

    #[test]
    fn test_detect_sniffs_unknown_extension() {
        assert_eq!(
            ModelFormat::detect(Path::new("model.pkl"), b"  {\"a\": 1}"),
            ModelFormat::Json
        );
        assert_eq!(
            ModelFormat::detect(Path::new("model.pkl"), b"\x10\0\0\0\0\0\0\0{\"__metadata__\"}"),
            ModelFormat::SafeTensors
        );
        assert_eq!(
            ModelFormat::detect(Path::new("model"), b"class_name: TransE\n"),
            ModelFormat::Yaml
        );
    }

    #[test]
    fn test_save_config_default() {
        let config = SaveConfig::default();
        assert_eq!(config.format, ModelFormat::SafeTensors);
        assert!(config.pretty);
    }

    #[test]
    fn test_save_config_builder() {
        let config = SaveConfig::new(ModelFormat::Json).with_pretty(false);
        assert_eq!(config.format, ModelFormat::Json);
        assert!(!config.pretty);
    }

    #[test]
    fn test_model_format_serde() {
        let format = ModelFormat::SafeTensors;
        let serialized = serde_json::to_string(&format).unwrap();
        let deserialized: ModelFormat = serde_json::from_str(&serialized).unwrap();
        assert_eq!(format, deserialized);
    }
}
