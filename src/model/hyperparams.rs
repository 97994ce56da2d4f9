//! Model hyperparameters
//!
//! Hyperparameters are kept as an ordered map of JSON values so that any
//! model class can persist its full constructor arguments without the
//! record format knowing about them.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Default embedding size
pub const DEFAULT_EMBEDDING_SIZE: u64 = 100;

/// Keys accepted by every built-in model constructor
pub const ACCEPTED_KEYS: &[&str] = &[
    "k",
    "eta",
    "epochs",
    "batches_count",
    "seed",
    "embedding_model_params",
    "optimizer",
    "optimizer_params",
    "loss",
    "loss_params",
    "regularizer",
    "regularizer_params",
    "initializer",
    "initializer_params",
    "verbose",
    "large_graphs",
];

/// Complete set of hyperparameters a model was constructed with
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hyperparams {
    params: BTreeMap<String, Value>,
}

impl Hyperparams {
    /// Create an empty set (every key falls back to its default)
    pub fn new() -> Self {
        Self::default()
    }

    /// Hyperparameters with the built-in defaults filled in
    pub fn with_defaults() -> Self {
        Self::new()
            .with("k", DEFAULT_EMBEDDING_SIZE)
            .with("eta", 2)
            .with("epochs", 100)
            .with("batches_count", 100)
            .with("seed", 0)
            .with("embedding_model_params", serde_json::json!({}))
    }

    /// Set a hyperparameter
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Set a hyperparameter in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.params.insert(key.into(), value.into());
    }

    /// Get a raw hyperparameter value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.params.iter()
    }

    /// Fill every missing key from `defaults`
    pub fn merged_over(mut self, defaults: &Hyperparams) -> Self {
        for (key, value) in &defaults.params {
            self.params
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
        self
    }

    /// Reject keys a constructor does not accept
    pub fn check_keys(&self, class_name: &str, accepted: &[&str]) -> Result<()> {
        match self.params.keys().find(|k| !accepted.contains(&k.as_str())) {
            Some(key) => Err(Error::InvalidParameter(format!(
                "{class_name} got an unexpected hyperparameter '{key}'"
            ))),
            None => Ok(()),
        }
    }

    /// Read a strictly positive integer hyperparameter
    pub fn positive_usize(&self, key: &str) -> Result<usize> {
        let value = self
            .get(key)
            .ok_or_else(|| Error::InvalidParameter(format!("missing hyperparameter '{key}'")))?;
        match value.as_u64() {
            Some(n) if n > 0 => Ok(n as usize),
            _ => Err(Error::InvalidParameter(format!(
                "hyperparameter '{key}' must be a positive integer, got {value}"
            ))),
        }
    }

    /// Read a nested `embedding_model_params` entry
    pub fn embedding_model_param(&self, key: &str) -> Option<&Value> {
        self.get("embedding_model_params")
            .and_then(Value::as_object)
            .and_then(|m| m.get(key))
    }
}
