//! YAML schema for declarative projector exports

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete export specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSpec {
    /// Model file; the latest default-named model in the working directory
    /// when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<PathBuf>,

    /// TensorBoard log directory
    pub output_dir: PathBuf,

    /// Optional label file; entity names are used otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<LabelsSpec>,

    /// Write metadata.tsv
    #[serde(default = "default_true")]
    pub write_metadata: bool,

    /// Write embeddings_projector.tsv
    #[serde(default = "default_true")]
    pub export_tsv_embeddings: bool,
}

/// Label file reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelsSpec {
    pub path: PathBuf,

    /// First row names the columns
    #[serde(default)]
    pub header: bool,
}

fn default_true() -> bool {
    true
}
