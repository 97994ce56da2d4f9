//! Embedding model trait

use super::hyperparams::Hyperparams;
use super::vocab::{Triple, Vocabulary};
use crate::io::ModelRecord;
use crate::Result;
use ndarray::Array2;

/// A knowledge-graph embedding model that can be persisted and exported
///
/// `trained_model_params` holds the model's learned matrices; the first one
/// is always the entity embedding matrix (one row per entity, in vocabulary
/// index order).
pub trait EmbeddingModel {
    /// Name the model is registered under in a [`ModelRegistry`](super::ModelRegistry)
    fn class_name(&self) -> &str;

    /// All hyperparameters, defaults included
    fn hyperparams(&self) -> &Hyperparams;

    fn is_fitted(&self) -> bool;

    fn set_fitted(&mut self, fitted: bool);

    fn vocabulary(&self) -> &Vocabulary;

    fn set_vocabulary(&mut self, vocab: Vocabulary);

    /// Learned parameter matrices, entity embeddings first
    fn trained_model_params(&self) -> &[Array2<f32>];

    /// Entity embedding matrix, if the model holds trained parameters
    fn entity_embeddings(&self) -> Option<&Array2<f32>> {
        self.trained_model_params().first()
    }

    /// Add the model-specific parameters to a record being saved
    fn get_embedding_model_params(&self, record: &mut ModelRecord);

    /// Load the model-specific parameters from a restored record
    fn restore_model_params(&mut self, record: &ModelRecord) -> Result<()>;

    /// Score each triple
    fn predict(&self, triples: &[Triple]) -> Result<Vec<f32>>;
}
