//! Built-in embedding model

use super::hyperparams::{Hyperparams, ACCEPTED_KEYS};
use super::scoring::ScoringFunction;
use super::traits::EmbeddingModel;
use super::vocab::{Triple, Vocabulary};
use crate::io::ModelRecord;
use crate::{Error, Result};
use ndarray::Array2;

/// Record parameter name of the entity embedding matrix
pub const ENTITY_PARAM: &str = "ent_emb";

/// Record parameter name of the relation embedding matrix
pub const RELATION_PARAM: &str = "rel_emb";

/// Embedding model backed by one of the built-in scoring functions
///
/// The model holds an entity matrix of shape `[num_entities, width]` and a
/// relation matrix of shape `[num_relations, width]`, where `width` is `k`
/// (or `2k` for ComplEx). Parameters are installed with
/// [`KgeModel::set_trained_params`] or restored from a saved record.
#[derive(Debug, Clone)]
pub struct KgeModel {
    scoring: ScoringFunction,
    hyperparams: Hyperparams,
    k: usize,
    vocab: Vocabulary,
    is_fitted: bool,
    trained_model_params: Vec<Array2<f32>>,
}

impl KgeModel {
    /// Construct an unfitted model of the named class
    ///
    /// Fails on unknown class names and on hyperparameters the class does
    /// not accept. Missing hyperparameters take their defaults.
    pub fn new(class_name: &str, hyperparams: Hyperparams) -> Result<Self> {
        let scoring = ScoringFunction::from_class_name(class_name, &hyperparams)?;
        hyperparams.check_keys(class_name, ACCEPTED_KEYS)?;
        let hyperparams = hyperparams.merged_over(&Hyperparams::with_defaults());
        let k = hyperparams.positive_usize("k")?;

        Ok(Self {
            scoring,
            hyperparams,
            k,
            vocab: Vocabulary::default(),
            is_fitted: false,
            trained_model_params: Vec::new(),
        })
    }

    pub fn scoring_function(&self) -> ScoringFunction {
        self.scoring
    }

    /// Embedding size
    pub fn k(&self) -> usize {
        self.k
    }

    /// Width of each embedding row
    pub fn embedding_width(&self) -> usize {
        self.scoring.embedding_width(self.k)
    }

    /// Install trained embeddings and mark the model as fitted
    pub fn set_trained_params(
        &mut self,
        vocab: Vocabulary,
        ent_emb: Array2<f32>,
        rel_emb: Array2<f32>,
    ) -> Result<()> {
        vocab.validate()?;
        let width = self.embedding_width();
        check_shape(ENTITY_PARAM, &ent_emb, [vocab.num_entities(), width])?;
        check_shape(RELATION_PARAM, &rel_emb, [vocab.num_relations(), width])?;

        self.vocab = vocab;
        self.trained_model_params = vec![ent_emb, rel_emb];
        self.is_fitted = true;
        Ok(())
    }

    fn relation_embeddings(&self) -> Option<&Array2<f32>> {
        self.trained_model_params.get(1)
    }
}

impl EmbeddingModel for KgeModel {
    fn class_name(&self) -> &str {
        self.scoring.class_name()
    }

    fn hyperparams(&self) -> &Hyperparams {
        &self.hyperparams
    }

    fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    fn set_fitted(&mut self, fitted: bool) {
        self.is_fitted = fitted;
    }

    fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    fn set_vocabulary(&mut self, vocab: Vocabulary) {
        self.vocab = vocab;
    }

    fn trained_model_params(&self) -> &[Array2<f32>] {
        &self.trained_model_params
    }

    fn get_embedding_model_params(&self, record: &mut ModelRecord) {
        let names = [ENTITY_PARAM, RELATION_PARAM];
        for (name, param) in names.iter().zip(&self.trained_model_params) {
            record.push_param(*name, param.clone());
        }
    }

    fn restore_model_params(&mut self, record: &ModelRecord) -> Result<()> {
        self.vocab.validate()?;
        if record.model_params.is_empty() && !record.is_fitted {
            self.trained_model_params.clear();
            return Ok(());
        }

        let missing =
            |name: &str| Error::Serialization(format!("record has no '{name}' parameter"));
        let ent_emb = record
            .param(ENTITY_PARAM)
            .ok_or_else(|| missing(ENTITY_PARAM))?;
        let rel_emb = record
            .param(RELATION_PARAM)
            .ok_or_else(|| missing(RELATION_PARAM))?;

        let width = self.embedding_width();
        check_shape(ENTITY_PARAM, ent_emb, [self.vocab.num_entities(), width])?;
        check_shape(RELATION_PARAM, rel_emb, [self.vocab.num_relations(), width])?;

        self.trained_model_params = vec![ent_emb.clone(), rel_emb.clone()];
        Ok(())
    }

    fn predict(&self, triples: &[Triple]) -> Result<Vec<f32>> {
        if !self.is_fitted {
            return Err(Error::NotFitted);
        }
        let (Some(ent), Some(rel)) = (self.entity_embeddings(), self.relation_embeddings()) else {
            return Err(Error::NotFitted);
        };

        triples
            .iter()
            .map(|t| {
                let s = self
                    .vocab
                    .entity_index(&t.subject)
                    .ok_or_else(|| Error::UnknownEntity(t.subject.clone()))?;
                let p = self
                    .vocab
                    .relation_index(&t.predicate)
                    .ok_or_else(|| Error::UnknownRelation(t.predicate.clone()))?;
                let o = self
                    .vocab
                    .entity_index(&t.object)
                    .ok_or_else(|| Error::UnknownEntity(t.object.clone()))?;
                Ok(self.scoring.score(ent.row(s), rel.row(p), ent.row(o)))
            })
            .collect()
    }
}

fn check_shape(name: &str, param: &Array2<f32>, expected: [usize; 2]) -> Result<()> {
    if param.shape() != expected.as_slice() {
        return Err(Error::ShapeMismatch {
            name: name.to_string(),
            expected: expected.to_vec(),
            got: param.shape().to_vec(),
        });
    }
    Ok(())
}
