//! Entity and relation index mappings

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A `(subject, predicate, object)` statement
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl Triple {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

/// Name -> row index mappings for entities and relations
///
/// Indices are dense (`0..len`) and address rows of the embedding matrices.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Vocabulary {
    pub ent_to_idx: BTreeMap<String, usize>,
    pub rel_to_idx: BTreeMap<String, usize>,
}

impl Vocabulary {
    pub fn new(ent_to_idx: BTreeMap<String, usize>, rel_to_idx: BTreeMap<String, usize>) -> Self {
        Self {
            ent_to_idx,
            rel_to_idx,
        }
    }

    /// Build mappings from the unique, sorted names found in `triples`
    pub fn from_triples(triples: &[Triple]) -> Self {
        let mut entities = BTreeSet::new();
        let mut relations = BTreeSet::new();
        for t in triples {
            entities.insert(t.subject.as_str());
            entities.insert(t.object.as_str());
            relations.insert(t.predicate.as_str());
        }

        let index = |names: BTreeSet<&str>| {
            names
                .into_iter()
                .enumerate()
                .map(|(i, name)| (name.to_string(), i))
                .collect()
        };

        Self {
            ent_to_idx: index(entities),
            rel_to_idx: index(relations),
        }
    }

    pub fn num_entities(&self) -> usize {
        self.ent_to_idx.len()
    }

    pub fn num_relations(&self) -> usize {
        self.rel_to_idx.len()
    }

    pub fn entity_index(&self, name: &str) -> Option<usize> {
        self.ent_to_idx.get(name).copied()
    }

    pub fn relation_index(&self, name: &str) -> Option<usize> {
        self.rel_to_idx.get(name).copied()
    }

    /// Check that both mappings use every index in `0..len` exactly once
    ///
    /// Indices address embedding rows, so a gap or a duplicate would point
    /// past the matrix or pair a label with the wrong row.
    pub fn validate(&self) -> Result<()> {
        check_dense("entity", &self.ent_to_idx)?;
        check_dense("relation", &self.rel_to_idx)
    }

    /// Entity names ordered by row index
    pub fn entity_labels(&self) -> Vec<String> {
        labels_by_index(&self.ent_to_idx)
    }

    /// Relation names ordered by row index
    pub fn relation_labels(&self) -> Vec<String> {
        labels_by_index(&self.rel_to_idx)
    }
}

fn check_dense(kind: &str, mapping: &BTreeMap<String, usize>) -> Result<()> {
    let mut seen = vec![false; mapping.len()];
    for (name, &idx) in mapping {
        match seen.get_mut(idx) {
            Some(slot) if !*slot => *slot = true,
            Some(_) => {
                return Err(Error::InvalidParameter(format!(
                    "{kind} index {idx} of '{name}' is used more than once"
                )))
            }
            None => {
                return Err(Error::InvalidParameter(format!(
                    "{kind} index {idx} of '{name}' is out of range for {} {kind}s",
                    mapping.len()
                )))
            }
        }
    }
    Ok(())
}

fn labels_by_index(mapping: &BTreeMap<String, usize>) -> Vec<String> {
    let mut pairs: Vec<(&String, usize)> = mapping.iter().map(|(k, &v)| (k, v)).collect();
    pairs.sort_by_key(|&(_, idx)| idx);
    pairs.into_iter().map(|(k, _)| k.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_triples() -> Vec<Triple> {
        vec![
            Triple::new("c", "likes", "a"),
            Triple::new("a", "knows", "b"),
            Triple::new("b", "likes", "c"),
        ]
    }

    #[test]
    fn test_from_triples_sorted_dense_indices() {
        let vocab = Vocabulary::from_triples(&sample_triples());
        assert_eq!(vocab.num_entities(), 3);
        assert_eq!(vocab.num_relations(), 2);
        assert_eq!(vocab.entity_index("a"), Some(0));
        assert_eq!(vocab.entity_index("c"), Some(2));
        assert_eq!(vocab.relation_index("knows"), Some(0));
        assert_eq!(vocab.relation_index("likes"), Some(1));
    }

    #[test]
    fn test_entity_labels_follow_index_not_key_order() {
        let mut ent_to_idx = BTreeMap::new();
        ent_to_idx.insert("zebra".to_string(), 0);
        ent_to_idx.insert("apple".to_string(), 1);
        ent_to_idx.insert("mango".to_string(), 2);
        let vocab = Vocabulary::new(ent_to_idx, BTreeMap::new());

        assert_eq!(vocab.entity_labels(), vec!["zebra", "apple", "mango"]);
    }

    fn mapping(pairs: &[(&str, usize)]) -> BTreeMap<String, usize> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_validate_dense_indices() {
        assert!(Vocabulary::from_triples(&sample_triples()).validate().is_ok());
        assert!(Vocabulary::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_index_gap() {
        let vocab = Vocabulary::new(mapping(&[("a", 0), ("b", 7)]), BTreeMap::new());
        let err = vocab.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(msg) if msg.contains("out of range")));
    }

    #[test]
    fn test_validate_rejects_duplicate_index() {
        let vocab = Vocabulary::new(
            mapping(&[("a", 0)]),
            mapping(&[("x", 1), ("y", 1)]),
        );
        let err = vocab.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(msg) if msg.contains("more than once")));
    }

    #[test]
    fn test_unknown_names() {
        let vocab = Vocabulary::from_triples(&sample_triples());
        assert!(vocab.entity_index("z").is_none());
        assert!(vocab.relation_index("hates").is_none());
    }
}
