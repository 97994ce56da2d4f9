//! Embedding models
//!
//! The model layer the persistence and export utilities operate on: a
//! trait every model implements, the hyperparameter and vocabulary types
//! it carries, the built-in scoring-function models, and the registry used
//! to reconstruct a model from its class name.

mod hyperparams;
mod kge;
mod registry;
mod scoring;
mod traits;
mod vocab;

pub use hyperparams::{Hyperparams, ACCEPTED_KEYS, DEFAULT_EMBEDDING_SIZE};
pub use kge::{KgeModel, ENTITY_PARAM, RELATION_PARAM};
pub use registry::{ModelFactory, ModelRegistry};
pub use scoring::ScoringFunction;
pub use traits::EmbeddingModel;
pub use vocab::{Triple, Vocabulary};
