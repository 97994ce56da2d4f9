//! TensorBoard projector export

use super::config::{EmbeddingInfo, ProjectorConfig};
use super::labels::{write_metadata_tsv, Labels, METADATA_FILE};
use super::tsv::{write_embeddings_tsv, EMBEDDINGS_TSV_FILE};
use crate::model::EmbeddingModel;
use crate::{Error, Result};
use ndarray::Array2;
use safetensors::tensor::{Dtype, TensorView};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Checkpoint holding the embedding tensor
pub const CHECKPOINT_FILE: &str = "graph_embedding.safetensors";

/// Tensor name in the checkpoint and in the projector config
pub const EMBEDDING_TENSOR_NAME: &str = "graph_embedding";

/// Export options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Write `metadata.tsv` with the point labels
    pub write_metadata: bool,
    /// Write `embeddings_projector.tsv`
    pub export_tsv_embeddings: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            write_metadata: true,
            export_tsv_embeddings: true,
        }
    }
}

impl ExportOptions {
    pub fn with_metadata(mut self, write_metadata: bool) -> Self {
        self.write_metadata = write_metadata;
        self
    }

    pub fn with_tsv_embeddings(mut self, export_tsv_embeddings: bool) -> Self {
        self.export_tsv_embeddings = export_tsv_embeddings;
        self
    }
}

/// Files written by an export, in write order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub files: Vec<PathBuf>,
}

impl ExportSummary {
    fn push(&mut self, path: PathBuf) {
        self.files.push(path);
    }

    /// Whether a file with this name was written
    pub fn contains(&self, file_name: &str) -> bool {
        self.files
            .iter()
            .any(|p| p.file_name().is_some_and(|n| n == file_name))
    }
}

/// Export a model's entity embeddings for the TensorBoard projector
///
/// Writes into `loc` (created if missing):
///
/// - `metadata.tsv`: the point labels, unless `options.write_metadata` is off
/// - `embeddings_projector.tsv`: the embeddings as text, unless
///   `options.export_tsv_embeddings` is off
/// - `graph_embedding.safetensors`: the embedding tensor
/// - `projector_config.pbtxt`: the projector configuration
///
/// Without `labels` the model's entity names are used, in index order.
/// Fails before touching the filesystem if the model is not fitted, a list
/// label contains a line break, or the label count differs from the number
/// of entities.
///
/// After export, run `tensorboard --logdir <loc>` and open the projector tab.
pub fn create_tensorboard_visualizations(
    model: &dyn EmbeddingModel,
    loc: impl AsRef<Path>,
    labels: Option<&Labels>,
    options: &ExportOptions,
) -> Result<ExportSummary> {
    let loc = loc.as_ref();
    let (embeddings, labels) = resolve_inputs(model, labels)?;

    if !loc.exists() {
        debug!("Creating Tensorboard visualization directory: {}", loc.display());
        fs::create_dir_all(loc)?;
    }

    let mut summary = ExportSummary::default();
    let mut info_entry =
        EmbeddingInfo::new(EMBEDDING_TENSOR_NAME).with_tensor_shape(embeddings.shape());

    if options.write_metadata {
        summary.push(write_metadata_tsv(loc, &labels)?);
        info_entry = info_entry.with_metadata_path(METADATA_FILE);
    }

    if options.export_tsv_embeddings {
        let tsv_path = loc.join(EMBEDDINGS_TSV_FILE);
        write_embeddings_tsv(&tsv_path, embeddings)?;
        summary.push(tsv_path);
        info_entry = info_entry.with_tensor_path(EMBEDDINGS_TSV_FILE);
    } else {
        warn!(
            "TSV embeddings disabled; the projector reads {} only through a checkpoint-aware loader",
            CHECKPOINT_FILE
        );
    }

    let checkpoint = loc.join(CHECKPOINT_FILE);
    write_checkpoint(&checkpoint, embeddings)?;
    summary.push(checkpoint);

    let mut config = ProjectorConfig::new();
    config.add(info_entry);
    summary.push(config.write(loc)?);

    info!(
        "Wrote {} projector files to {}",
        summary.files.len(),
        loc.display()
    );
    Ok(summary)
}

/// Write the embeddings TSV at `path` and, optionally, `metadata.tsv` in the
/// same directory
///
/// These are the two files the online projector (projector.tensorflow.org)
/// loads by hand. Preconditions match [`create_tensorboard_visualizations`].
pub fn create_tensorboard_projector_files(
    model: &dyn EmbeddingModel,
    path: impl AsRef<Path>,
    labels: Option<&Labels>,
    write_metadata: bool,
) -> Result<ExportSummary> {
    let path = path.as_ref();
    let (embeddings, labels) = resolve_inputs(model, labels)?;

    let loc = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut summary = ExportSummary::default();
    if write_metadata {
        summary.push(write_metadata_tsv(&loc, &labels)?);
    }

    write_embeddings_tsv(path, embeddings)?;
    summary.push(path.to_path_buf());

    info!("Wrote projector embeddings to {}", path.display());
    Ok(summary)
}

/// Check preconditions and pick the labels to write
fn resolve_inputs<'m>(
    model: &'m dyn EmbeddingModel,
    labels: Option<&Labels>,
) -> Result<(&'m Array2<f32>, Labels)> {
    if !model.is_fitted() {
        return Err(Error::NotFitted);
    }
    let embeddings = model.entity_embeddings().ok_or(Error::NotFitted)?;
    let expected = embeddings.nrows();

    let labels = match labels {
        Some(labels) => labels.clone(),
        None => Labels::List(model.vocabulary().entity_labels()),
    };

    labels.validate()?;
    if labels.len() != expected {
        return Err(Error::LabelCountMismatch {
            expected,
            got: labels.len(),
        });
    }

    Ok((embeddings, labels))
}

fn write_checkpoint(path: &Path, embeddings: &Array2<f32>) -> Result<()> {
    let values: Vec<f32> = embeddings.iter().copied().collect();
    let bytes: Vec<u8> = bytemuck::cast_slice(&values).to_vec();
    let view = TensorView::new(Dtype::F32, embeddings.shape().to_vec(), &bytes)
        .map_err(|e| Error::Serialization(format!("Invalid embedding tensor: {e}")))?;

    let mut metadata = HashMap::new();
    metadata.insert("tensor_name".to_string(), EMBEDDING_TENSOR_NAME.to_string());

    let data = safetensors::serialize(vec![(EMBEDDING_TENSOR_NAME, view)], Some(metadata))
        .map_err(|e| Error::Serialization(format!("SafeTensors serialization failed: {e}")))?;
    fs::write(path, data)?;
    debug!("Saved embedding checkpoint to {}", path.display());
    Ok(())
}
