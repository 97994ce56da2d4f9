//! CLI argument parsing
//!
//! # Usage
//!
//! ```bash
//! kgembed inspect model.safetensors
//! kgembed convert model.safetensors --output model.json --format json
//! kgembed predict model.safetensors triples.tsv
//! kgembed projector model.safetensors --output embeddings_projector.tsv
//! kgembed visualize --output-dir tensorboard_files --labels labels.tsv --header
//! kgembed export export.yaml
//! ```
//!
//! Commands taking an optional `MODEL` fall back to the latest
//! `*.model.<ext>` file in the working directory.

use crate::io::ModelFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// kgembed: knowledge-graph embedding persistence and projector export
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "kgembed")]
#[command(version)]
#[command(about = "Save, restore and visualize knowledge-graph embedding models")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Show a summary of a saved model
    Inspect(InspectArgs),

    /// Re-save a model in another format
    Convert(ConvertArgs),

    /// Score triples with a saved model
    Predict(PredictArgs),

    /// Write the embedding TSV and metadata for the online projector
    Projector(ProjectorArgs),

    /// Write TensorBoard projector files into a log directory
    Visualize(VisualizeArgs),

    /// Run a visualization export described in a YAML file
    Export(ExportArgs),
}

/// Arguments for the inspect command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InspectArgs {
    /// Path to model file
    #[arg(value_name = "MODEL")]
    pub model: Option<PathBuf>,

    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the convert command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ConvertArgs {
    /// Path to model file
    #[arg(value_name = "MODEL")]
    pub model: PathBuf,

    /// Output path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Output format (json, yaml, safetensors); defaults to the output extension
    #[arg(short, long)]
    pub format: Option<ModelFormat>,
}

/// Arguments for the predict command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct PredictArgs {
    /// `[MODEL] TRIPLES`: optional model file, then a TSV of `s\tp\to` triples
    #[arg(value_name = "PATH", num_args = 1..=2, required = true)]
    pub paths: Vec<PathBuf>,
}

impl PredictArgs {
    /// `(model, triples)`, with `model` absent when only one path was given
    pub fn split(&self) -> (Option<&PathBuf>, Option<&PathBuf>) {
        match self.paths.as_slice() {
            [triples] => (None, Some(triples)),
            [model, triples] => (Some(model), Some(triples)),
            _ => (None, None),
        }
    }
}

/// Label options shared by the export commands
#[derive(Args, Debug, Clone, PartialEq, Default)]
pub struct LabelArgs {
    /// Label file, one label per line (or a TSV table with --header)
    #[arg(short, long)]
    pub labels: Option<PathBuf>,

    /// The label file's first row names its columns
    #[arg(long, requires = "labels")]
    pub header: bool,

    /// Do not write metadata.tsv
    #[arg(long)]
    pub no_metadata: bool,
}

/// Arguments for the projector command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ProjectorArgs {
    /// Path to model file
    #[arg(value_name = "MODEL")]
    pub model: Option<PathBuf>,

    /// Path of the embedding TSV to write
    #[arg(short, long)]
    pub output: PathBuf,

    #[command(flatten)]
    pub labels: LabelArgs,
}

/// Arguments for the visualize command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct VisualizeArgs {
    /// Path to model file
    #[arg(value_name = "MODEL")]
    pub model: Option<PathBuf>,

    /// TensorBoard log directory
    #[arg(long)]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub labels: LabelArgs,

    /// Do not write embeddings_projector.tsv
    #[arg(long)]
    pub no_tsv: bool,
}

/// Arguments for the export command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ExportArgs {
    /// Path to YAML export file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,
}

/// Output format for the inspect command
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            _ => Err(format!(
                "Unknown output format: {}. Valid formats: text, json, yaml",
                s
            )),
        }
    }
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
