//! Declarative YAML configuration and CLI arguments
//!
//! An export spec describes a TensorBoard projector export in YAML.
//!
//! # Example
//!
//! ```yaml
//! model: models/2024_01_01-00_00_00.model.safetensors
//! output_dir: tensorboard_files
//!
//! labels:
//!   path: labels.tsv
//!   header: true
//!
//! write_metadata: true
//! export_tsv_embeddings: true
//! ```

mod cli;
mod export;
mod schema;
mod validate;


pub use cli::{
    parse_args, Cli, Command, ConvertArgs, ExportArgs, InspectArgs, LabelArgs, OutputFormat,
    PredictArgs, ProjectorArgs, VisualizeArgs,
};
pub use export::{export_from_yaml, load_spec, run_export};
pub use schema::{ExportSpec, LabelsSpec};
pub use validate::{validate_spec, ValidationError};
