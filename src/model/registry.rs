//! Model class registry
//!
//! Restoring a model only knows its class name and hyperparameters. The
//! registry maps class names to constructors so a saved record can be
//! turned back into a live model. Additional classes can be registered by
//! callers that implement [`EmbeddingModel`] themselves.

use super::hyperparams::Hyperparams;
use super::kge::KgeModel;
use super::scoring::ScoringFunction;
use super::traits::EmbeddingModel;
use crate::{Error, Result};
use std::collections::BTreeMap;

/// Constructor for a registered model class
pub type ModelFactory =
    Box<dyn Fn(Hyperparams) -> Result<Box<dyn EmbeddingModel>> + Send + Sync>;

/// Name -> constructor table for model classes
pub struct ModelRegistry {
    factories: BTreeMap<String, ModelFactory>,
}

impl ModelRegistry {
    /// Create a registry with no classes
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Register (or replace) a model class
    pub fn register<F>(&mut self, class_name: impl Into<String>, factory: F)
    where
        F: Fn(Hyperparams) -> Result<Box<dyn EmbeddingModel>> + Send + Sync + 'static,
    {
        self.factories.insert(class_name.into(), Box::new(factory));
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.factories.contains_key(class_name)
    }

    /// Registered class names, sorted
    pub fn class_names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Construct an unfitted model of the named class
    pub fn create(&self, class_name: &str, hyperparams: Hyperparams) -> Result<Box<dyn EmbeddingModel>> {
        let factory = self
            .factories
            .get(class_name)
            .ok_or_else(|| Error::UnknownModelClass(class_name.to_string()))?;
        factory(hyperparams)
    }
}

impl Default for ModelRegistry {
    /// Registry with the built-in TransE, DistMult, ComplEx and HolE classes
    fn default() -> Self {
        let mut registry = Self::empty();
        for name in ScoringFunction::CLASS_NAMES {
            registry.register(name, move |params| {
                Ok(Box::new(KgeModel::new(name, params)?) as Box<dyn EmbeddingModel>)
            });
        }
        registry
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("classes", &self.class_names())
            .finish()
    }
}
