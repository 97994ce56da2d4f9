//! On-disk model record

use crate::model::{EmbeddingModel, Hyperparams, Vocabulary};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named trained parameter matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedParam {
    pub name: String,
    pub value: Array2<f32>,
}

/// Everything needed to rebuild a model: written once by `save_model`,
/// read once by `restore_model`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    /// Registry name of the model class
    pub class_name: String,

    /// Constructor arguments of the model
    pub hyperparams: Hyperparams,

    pub is_fitted: bool,

    pub ent_to_idx: BTreeMap<String, usize>,

    pub rel_to_idx: BTreeMap<String, usize>,

    /// Model-specific trained parameters, in the order the model supplied them
    #[serde(default)]
    pub model_params: Vec<NamedParam>,
}

impl ModelRecord {
    /// Capture the state of a model
    pub fn from_model(model: &dyn EmbeddingModel) -> Self {
        let vocab = model.vocabulary();
        let mut record = Self {
            class_name: model.class_name().to_string(),
            hyperparams: model.hyperparams().clone(),
            is_fitted: model.is_fitted(),
            ent_to_idx: vocab.ent_to_idx.clone(),
            rel_to_idx: vocab.rel_to_idx.clone(),
            model_params: Vec::new(),
        };
        model.get_embedding_model_params(&mut record);
        record
    }

    pub fn vocabulary(&self) -> Vocabulary {
        Vocabulary::new(self.ent_to_idx.clone(), self.rel_to_idx.clone())
    }

    /// Get parameter by name
    pub fn param(&self, name: &str) -> Option<&Array2<f32>> {
        self.model_params
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }

    /// Append a parameter
    pub fn push_param(&mut self, name: impl Into<String>, value: Array2<f32>) {
        self.model_params.push(NamedParam {
            name: name.into(),
            value,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{KgeModel, Triple};
    use ndarray::array;

    fn fitted_model() -> KgeModel {
        let vocab = Vocabulary::from_triples(&[Triple::new("a", "r", "b")]);
        let mut model = KgeModel::new("TransE", Hyperparams::new().with("k", 2)).unwrap();
        model
            .set_trained_params(vocab, array![[0.1, 0.2], [0.3, 0.4]], array![[0.5, 0.6]])
            .unwrap();
        model
    }

    #[test]
    fn test_from_model_captures_state() {
        let record = ModelRecord::from_model(&fitted_model());
        assert_eq!(record.class_name, "TransE");
        assert!(record.is_fitted);
        assert_eq!(record.ent_to_idx.len(), 2);
        assert_eq!(record.rel_to_idx.get("r"), Some(&0));
        assert_eq!(record.param("ent_emb").unwrap().shape(), &[2, 2]);
        assert!(record.param("missing").is_none());
    }

    #[test]
    fn test_unfitted_model_has_no_params() {
        let model = KgeModel::new("DistMult", Hyperparams::new()).unwrap();
        let record = ModelRecord::from_model(&model);
        assert!(!record.is_fitted);
        assert!(record.model_params.is_empty());
    }

    #[test]
    fn test_json_round_trip() {
        let record = ModelRecord::from_model(&fitted_model());
        let json = serde_json::to_string(&record).unwrap();
        let back: ModelRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }

    #[test]
    fn test_missing_model_params_defaults_to_empty() {
        let json = r#"{
            "class_name": "HolE",
            "hyperparams": {"k": 3},
            "is_fitted": false,
            "ent_to_idx": {},
            "rel_to_idx": {}
        }"#;
        let record: ModelRecord = serde_json::from_str(json).unwrap();
        assert!(record.model_params.is_empty());
        assert_eq!(record.hyperparams.get("k"), Some(&serde_json::json!(3)));
    }
}
