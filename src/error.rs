//! Error types for kgembed

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot write embeddings if model is not fitted")]
    NotFitted,

    #[error("Label data rows must equal number of embeddings: expected {expected}, got {got}")]
    LabelCountMismatch { expected: usize, got: usize },

    #[error("No default model found in {0}. Please specify a model path")]
    NoDefaultModel(PathBuf),

    #[error("Model file not found: {0}")]
    ModelNotFound(PathBuf),

    #[error("Unknown model class: {0}")]
    UnknownModelClass(String),

    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    #[error("Unknown relation: {0}")]
    UnknownRelation(String),

    #[error("Shape mismatch for {name}: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        name: String,
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;
