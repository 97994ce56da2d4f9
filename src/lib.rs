//! # kgembed: knowledge-graph embedding persistence and visualization
//!
//! kgembed saves and restores knowledge-graph embedding models and exports
//! their entity embeddings for the TensorBoard embedding projector.
//!
//! ## Architecture
//!
//! - **model**: Embedding model trait, built-in scoring models, class registry
//! - **io**: Model saving and restoring (SafeTensors, JSON, YAML formats)
//! - **projector**: TensorBoard projector files and label metadata
//! - **config**: Declarative YAML export configuration and CLI arguments
//! - **cli**: Command handlers behind the `kgembed` binary
//!
//! ## Example
//!
//! ```no_run
//! use kgembed::io::{restore_model, save_model, ModelFormat, SaveConfig};
//! use kgembed::projector::{create_tensorboard_visualizations, ExportOptions};
//! use std::path::Path;
//!
//! let model = restore_model(Some(Path::new("model.safetensors")))?;
//! create_tensorboard_visualizations(model.as_ref(), "tensorboard_files", None, &ExportOptions::default())?;
//! save_model(model.as_ref(), Some(Path::new("copy.json")), &SaveConfig::new(ModelFormat::Json))?;
//! # Ok::<(), kgembed::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod io;
pub mod model;
pub mod projector;

pub mod error;

// Re-export commonly used types
pub use error::{Error, Result};
pub use io::{restore_model, save_model, ModelFormat, SaveConfig};
pub use model::{EmbeddingModel, KgeModel, ModelRegistry, Triple};
pub use projector::{
    create_tensorboard_projector_files, create_tensorboard_visualizations, write_metadata_tsv,
    ExportOptions, Labels,
};
