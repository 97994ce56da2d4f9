//! TensorBoard projector export
//!
//! Writes a fitted model's entity embeddings and their labels in the layout
//! the TensorBoard embedding projector reads: `metadata.tsv`, a TSV of the
//! embedding values, a SafeTensors checkpoint and `projector_config.pbtxt`.

mod config;
mod export;
mod labels;
mod tsv;


pub use config::{EmbeddingInfo, ProjectorConfig, PROJECTOR_CONFIG_FILE};
pub use export::{
    create_tensorboard_projector_files, create_tensorboard_visualizations, ExportOptions,
    ExportSummary, CHECKPOINT_FILE, EMBEDDING_TENSOR_NAME,
};
pub use labels::{read_labels, write_metadata_tsv, LabelTable, Labels, METADATA_FILE};
pub use tsv::{format_scientific, write_embeddings_tsv, EMBEDDINGS_TSV_FILE};
