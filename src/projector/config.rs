//! TensorBoard projector configuration (`projector_config.pbtxt`)

use crate::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// File name TensorBoard looks for in the log directory
pub const PROJECTOR_CONFIG_FILE: &str = "projector_config.pbtxt";

/// One embedding tensor shown by the projector
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EmbeddingInfo {
    pub tensor_name: String,
    /// Label file, relative to the log directory
    pub metadata_path: Option<String>,
    /// TSV file holding the tensor values, relative to the log directory
    pub tensor_path: Option<String>,
    pub tensor_shape: Vec<usize>,
}

impl EmbeddingInfo {
    pub fn new(tensor_name: impl Into<String>) -> Self {
        Self {
            tensor_name: tensor_name.into(),
            ..Self::default()
        }
    }

    pub fn with_metadata_path(mut self, path: impl Into<String>) -> Self {
        self.metadata_path = Some(path.into());
        self
    }

    pub fn with_tensor_path(mut self, path: impl Into<String>) -> Self {
        self.tensor_path = Some(path.into());
        self
    }

    pub fn with_tensor_shape(mut self, shape: &[usize]) -> Self {
        self.tensor_shape = shape.to_vec();
        self
    }
}

/// Projector plugin configuration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectorConfig {
    pub embeddings: Vec<EmbeddingInfo>,
}

impl ProjectorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an embedding; more than one can be shown at a time
    pub fn add(&mut self, embedding: EmbeddingInfo) -> &mut Self {
        self.embeddings.push(embedding);
        self
    }

    /// Render in protobuf text format
    pub fn to_pbtxt(&self) -> String {
        let mut output = String::new();
        for embedding in &self.embeddings {
            output.push_str("embeddings {\n");
            output.push_str(&format!(
                "  tensor_name: \"{}\"\n",
                escape(&embedding.tensor_name)
            ));
            if let Some(path) = &embedding.metadata_path {
                output.push_str(&format!("  metadata_path: \"{}\"\n", escape(path)));
            }
            if let Some(path) = &embedding.tensor_path {
                output.push_str(&format!("  tensor_path: \"{}\"\n", escape(path)));
            }
            for dim in &embedding.tensor_shape {
                output.push_str(&format!("  tensor_shape: {dim}\n"));
            }
            output.push_str("}\n");
        }
        output
    }

    /// Write `projector_config.pbtxt` into `loc`
    pub fn write(&self, loc: impl AsRef<Path>) -> Result<PathBuf> {
        let path = loc.as_ref().join(PROJECTOR_CONFIG_FILE);
        fs::write(&path, self.to_pbtxt())?;
        Ok(path)
    }
}

/// Escape a string for a protobuf text-format literal
fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_to_pbtxt_full_entry() {
        let mut config = ProjectorConfig::new();
        config.add(
            EmbeddingInfo::new("graph_embedding")
                .with_metadata_path("metadata.tsv")
                .with_tensor_path("embeddings_projector.tsv")
                .with_tensor_shape(&[6, 10]),
        );

        assert_eq!(
            config.to_pbtxt(),
            "embeddings {\n  tensor_name: \"graph_embedding\"\n  metadata_path: \"metadata.tsv\"\n  tensor_path: \"embeddings_projector.tsv\"\n  tensor_shape: 6\n  tensor_shape: 10\n}\n"
        );
    }

    #[test]
    fn test_to_pbtxt_omits_unset_fields() {
        let mut config = ProjectorConfig::new();
        config.add(EmbeddingInfo::new("e"));
        assert_eq!(config.to_pbtxt(), "embeddings {\n  tensor_name: \"e\"\n}\n");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"a"b\c"#), r#"a\"b\\c"#);
        assert_eq!(escape("line\nbreak"), "line\\nbreak");
    }

    #[test]
    fn test_write_config_file() {
        let dir = tempdir().unwrap();
        let mut config = ProjectorConfig::new();
        config
            .add(EmbeddingInfo::new("entities"))
            .add(EmbeddingInfo::new("relations"));

        let path = config.write(dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), PROJECTOR_CONFIG_FILE);
        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(content.matches("embeddings {").count(), 2);
    }
}
