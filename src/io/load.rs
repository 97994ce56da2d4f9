//! Model restoring functionality

use super::format::ModelFormat;
use super::record::{ModelRecord, NamedParam};
use super::save::DEFAULT_MODEL_SUFFIX;
use crate::model::{EmbeddingModel, Hyperparams, ModelRegistry};
use crate::{Error, Result};
use ndarray::Array2;
use safetensors::tensor::Dtype;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Restore a saved model from disk using the built-in model classes
///
/// When `path` is `None` the latest default-named model
/// (`*.model.<ext>`) in the working directory is loaded.
///
/// # Example
///
/// ```no_run
/// use kgembed::io::restore_model;
/// use kgembed::model::Triple;
/// use std::path::Path;
///
/// let model = restore_model(Some(Path::new("helloworld.safetensors")))?;
/// let scores = model.predict(&[Triple::new("f", "y", "e")])?;
/// # Ok::<(), kgembed::Error>(())
/// ```
pub fn restore_model(path: Option<&Path>) -> Result<Box<dyn EmbeddingModel>> {
    restore_model_with(path, &ModelRegistry::default())
}

/// Restore a saved model, resolving its class through `registry`
pub fn restore_model_with(
    path: Option<&Path>,
    registry: &ModelRegistry,
) -> Result<Box<dyn EmbeddingModel>> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            warn!("No model path specified, looking up the latest default saved model");
            let found = find_default_model(Path::new("."))?;
            info!("Will load the model {} in the current directory", found.display());
            found
        }
    };

    info!("Will load model {}.", path.display());
    let record = read_record(&path)?;

    debug!("Restoring model {}...", record.class_name);
    let mut model = registry.create(&record.class_name, record.hyperparams.clone())?;
    model.set_fitted(record.is_fitted);
    model.set_vocabulary(record.vocabulary());
    model.restore_model_params(&record)?;

    Ok(model)
}

/// Find the latest default-named model file in `dir`
///
/// Default names start with a `%Y_%m_%d-%H_%M_%S` timestamp, so the
/// lexicographically last match is the most recent one.
pub fn find_default_model(dir: &Path) -> Result<PathBuf> {
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_default_model_name(path))
        .collect();

    candidates.sort();
    candidates
        .pop()
        .ok_or_else(|| Error::NoDefaultModel(dir.to_path_buf()))
}

fn is_default_model_name(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    ModelFormat::ALL.iter().any(|format| {
        name.ends_with(&format!("{DEFAULT_MODEL_SUFFIX}.{}", format.extension()))
    }) || name.ends_with(&format!("{DEFAULT_MODEL_SUFFIX}.yml"))
}

/// Read a model record from a file
///
/// The format is detected from the extension, falling back to content
/// sniffing for unrecognized extensions.
pub fn read_record(path: &Path) -> Result<ModelRecord> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("No model found at {}", path.display());
            return Err(Error::ModelNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    match ModelFormat::detect(path, &data) {
        ModelFormat::SafeTensors => load_safetensors(&data),
        ModelFormat::Json => serde_json::from_slice(&data)
            .map_err(|e| Error::Serialization(format!("JSON deserialization failed: {e}"))),
        ModelFormat::Yaml => serde_yaml::from_slice(&data)
            .map_err(|e| Error::Serialization(format!("YAML deserialization failed: {e}"))),
    }
}

/// Rebuild a record from SafeTensors bytes
fn load_safetensors(data: &[u8]) -> Result<ModelRecord> {
    let (_, st_metadata) = safetensors::SafeTensors::read_metadata(data)
        .map_err(|e| Error::Serialization(format!("SafeTensors parsing failed: {e}")))?;

    let meta = st_metadata
        .metadata()
        .as_ref()
        .ok_or_else(|| Error::Serialization("SafeTensors file has no model metadata".to_string()))?;
    let field = |key: &str| {
        meta.get(key)
            .ok_or_else(|| Error::Serialization(format!("SafeTensors metadata is missing '{key}'")))
    };

    let class_name = field("class_name")?.clone();
    let hyperparams: Hyperparams = from_json(field("hyperparams")?)?;
    let is_fitted = field("is_fitted")?
        .parse::<bool>()
        .map_err(|e| Error::Serialization(format!("Invalid is_fitted flag: {e}")))?;
    let ent_to_idx: BTreeMap<String, usize> = from_json(field("ent_to_idx")?)?;
    let rel_to_idx: BTreeMap<String, usize> = from_json(field("rel_to_idx")?)?;
    let order: Vec<String> = from_json(field("param_order")?)?;

    let safetensors = safetensors::SafeTensors::deserialize(data)
        .map_err(|e| Error::Serialization(format!("SafeTensors parsing failed: {e}")))?;

    let model_params = order
        .into_iter()
        .map(|name| {
            let view = safetensors
                .tensor(&name)
                .map_err(|e| Error::Serialization(format!("Missing tensor {name}: {e}")))?;
            if view.dtype() != Dtype::F32 {
                return Err(Error::Serialization(format!(
                    "Tensor {name} has dtype {:?}, expected F32",
                    view.dtype()
                )));
            }
            let value = view_to_array(&name, view.shape(), view.data())?;
            Ok(NamedParam { name, value })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ModelRecord {
        class_name,
        hyperparams,
        is_fitted,
        ent_to_idx,
        rel_to_idx,
        model_params,
    })
}

fn view_to_array(name: &str, shape: &[usize], bytes: &[u8]) -> Result<Array2<f32>> {
    let &[rows, cols] = shape else {
        return Err(Error::Serialization(format!(
            "Tensor {name} must be 2-dimensional, got shape {shape:?}"
        )));
    };
    if bytes.len() != rows * cols * std::mem::size_of::<f32>() {
        return Err(Error::Serialization(format!(
            "Tensor {name} holds {} bytes, expected {rows}x{cols} f32 values",
            bytes.len()
        )));
    }
    // Copies, so the buffer does not need f32 alignment
    let values: Vec<f32> = bytemuck::pod_collect_to_vec(bytes);
    Array2::from_shape_vec((rows, cols), values)
        .map_err(|e| Error::Serialization(format!("Tensor {name} has inconsistent data: {e}")))
}

fn from_json<T: serde::de::DeserializeOwned>(text: &str) -> Result<T> {
    serde_json::from_str(text)
        .map_err(|e| Error::Serialization(format!("JSON deserialization failed: {e}")))
}
