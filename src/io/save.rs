//! Model saving functionality

use super::format::{ModelFormat, SaveConfig};
use super::record::ModelRecord;
use crate::model::EmbeddingModel;
use crate::{Error, Result};
use safetensors::tensor::{Dtype, TensorView};
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Suffix of default model file names, followed by the format extension
pub const DEFAULT_MODEL_SUFFIX: &str = ".model";

/// Version tag written into SafeTensors metadata
pub const RECORD_FORMAT_VERSION: &str = "1";

/// Default file name for a model saved without an explicit path:
/// `<UTC timestamp>.model.<ext>`
pub fn default_model_name(format: ModelFormat) -> String {
    let stamp = chrono::Utc::now().format("%Y_%m_%d-%H_%M_%S");
    format!("{stamp}{DEFAULT_MODEL_SUFFIX}.{}", format.extension())
}

/// Save a trained model to disk
///
/// # Arguments
///
/// * `model` - The model to save
/// * `path` - Output file path; when `None` a timestamped default name in
///   the working directory is used
/// * `config` - Save configuration (format, options)
///
/// Returns the path the model was written to.
///
/// # Example
///
/// ```no_run
/// use kgembed::io::{save_model, SaveConfig};
/// use kgembed::model::{Hyperparams, KgeModel};
/// use std::path::Path;
///
/// let model = KgeModel::new("ComplEx", Hyperparams::new().with("k", 10))?;
/// let path = save_model(&model, Some(Path::new("helloworld.safetensors")), &SaveConfig::default())?;
/// # Ok::<(), kgembed::Error>(())
/// ```
pub fn save_model(
    model: &dyn EmbeddingModel,
    path: Option<&Path>,
    config: &SaveConfig,
) -> Result<PathBuf> {
    debug!("Saving model {}.", model.class_name());

    let record = ModelRecord::from_model(model);

    debug!(
        hyperparams = ?record.hyperparams,
        is_fitted = record.is_fitted,
        "Saving hyperparams"
    );

    let path = match path {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(default_model_name(config.format)),
    };

    write_record(&record, &path, config)?;
    Ok(path)
}

/// Write a model record in the configured format
pub fn write_record(record: &ModelRecord, path: &Path, config: &SaveConfig) -> Result<()> {
    match config.format {
        ModelFormat::SafeTensors => {
            // SafeTensors is binary format - handle separately
            return save_safetensors(record, path);
        }
        ModelFormat::Json => {
            let data = if config.pretty {
                serde_json::to_string_pretty(record)
                    .map_err(|e| Error::Serialization(format!("JSON serialization failed: {e}")))?
            } else {
                serde_json::to_string(record)
                    .map_err(|e| Error::Serialization(format!("JSON serialization failed: {e}")))?
            };
            let mut file = File::create(path)?;
            file.write_all(data.as_bytes())?;
        }
        ModelFormat::Yaml => {
            let data = serde_yaml::to_string(record)
                .map_err(|e| Error::Serialization(format!("YAML serialization failed: {e}")))?;
            let mut file = File::create(path)?;
            file.write_all(data.as_bytes())?;
        }
    }

    Ok(())
}

/// Save a record in SafeTensors format
///
/// Every trained parameter becomes an F32 tensor of shape `[rows, cols]`;
/// the remaining record fields go into the string metadata.
fn save_safetensors(record: &ModelRecord, path: &Path) -> Result<()> {
    let tensor_data: Vec<(&str, Vec<u8>, Vec<usize>)> = record
        .model_params
        .iter()
        .map(|param| {
            let values: Vec<f32> = param.value.iter().copied().collect();
            let bytes: Vec<u8> = bytemuck::cast_slice(&values).to_vec();
            (param.name.as_str(), bytes, param.value.shape().to_vec())
        })
        .collect();

    let views = tensor_data
        .iter()
        .map(|(name, bytes, shape)| {
            TensorView::new(Dtype::F32, shape.clone(), bytes)
                .map(|view| (*name, view))
                .map_err(|e| Error::Serialization(format!("Invalid tensor {name}: {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    let order: Vec<&str> = record.model_params.iter().map(|p| p.name.as_str()).collect();

    let mut metadata = HashMap::new();
    metadata.insert("format_version".to_string(), RECORD_FORMAT_VERSION.to_string());
    metadata.insert("class_name".to_string(), record.class_name.clone());
    metadata.insert("hyperparams".to_string(), to_json(&record.hyperparams)?);
    metadata.insert("is_fitted".to_string(), record.is_fitted.to_string());
    metadata.insert("ent_to_idx".to_string(), to_json(&record.ent_to_idx)?);
    metadata.insert("rel_to_idx".to_string(), to_json(&record.rel_to_idx)?);
    metadata.insert("param_order".to_string(), to_json(&order)?);

    let safetensor_bytes = safetensors::serialize(views, Some(metadata))
        .map_err(|e| Error::Serialization(format!("SafeTensors serialization failed: {e}")))?;

    std::fs::write(path, safetensor_bytes)?;

    Ok(())
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value)
        .map_err(|e| Error::Serialization(format!("JSON serialization failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Hyperparams, KgeModel, Triple, Vocabulary};
    use ndarray::array;
    use tempfile::NamedTempFile;

    fn fitted_model() -> KgeModel {
        let triples = vec![Triple::new("a", "y", "b"), Triple::new("b", "y", "c")];
        let mut model = KgeModel::new("DistMult", Hyperparams::new().with("k", 2)).unwrap();
        model
            .set_trained_params(
                Vocabulary::from_triples(&triples),
                array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]],
                array![[0.5, -0.5]],
            )
            .unwrap();
        model
    }

    #[test]
    fn test_save_model_json() {
        let temp_file = NamedTempFile::new().unwrap();
        let config = SaveConfig::new(ModelFormat::Json);
        save_model(&fitted_model(), Some(temp_file.path()), &config).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("\"class_name\": \"DistMult\""));
        assert!(content.contains("ent_to_idx"));
        assert!(content.contains("ent_emb"));
    }

    #[test]
    fn test_save_model_json_compact() {
        let temp_file = NamedTempFile::new().unwrap();
        let config = SaveConfig::new(ModelFormat::Json).with_pretty(false);
        save_model(&fitted_model(), Some(temp_file.path()), &config).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert_eq!(content.lines().count(), 1);
    }

    #[test]
    fn test_save_model_yaml() {
        let temp_file = NamedTempFile::new().unwrap();
        let config = SaveConfig::new(ModelFormat::Yaml);
        save_model(&fitted_model(), Some(temp_file.path()), &config).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("class_name: DistMult"));
        assert!(content.contains("is_fitted: true"));
    }

    #[test]
    fn test_save_safetensors_layout() {
        let temp_file = NamedTempFile::new().unwrap();
        save_model(&fitted_model(), Some(temp_file.path()), &SaveConfig::default()).unwrap();

        let data = std::fs::read(temp_file.path()).unwrap();
        let loaded = safetensors::SafeTensors::deserialize(&data).unwrap();
        let ent = loaded.tensor("ent_emb").unwrap();
        assert_eq!(ent.shape(), &[3, 2]);
        assert_eq!(ent.dtype(), Dtype::F32);

        let (_, st_metadata) = safetensors::SafeTensors::read_metadata(&data).unwrap();
        let meta = st_metadata.metadata().as_ref().unwrap();
        assert_eq!(meta.get("class_name").unwrap(), "DistMult");
        assert_eq!(meta.get("is_fitted").unwrap(), "true");
        assert_eq!(meta.get("param_order").unwrap(), r#"["ent_emb","rel_emb"]"#);
        assert_eq!(meta.get("format_version").unwrap(), RECORD_FORMAT_VERSION);
    }

    #[test]
    fn test_save_unfitted_model_safetensors() {
        let model = KgeModel::new("TransE", Hyperparams::new()).unwrap();
        let temp_file = NamedTempFile::new().unwrap();
        save_model(&model, Some(temp_file.path()), &SaveConfig::default()).unwrap();

        let data = std::fs::read(temp_file.path()).unwrap();
        let loaded = safetensors::SafeTensors::deserialize(&data).unwrap();
        assert_eq!(loaded.len(), 0);
    }

    #[test]
    fn test_save_model_invalid_path() {
        let result = save_model(
            &fitted_model(),
            Some(Path::new("/nonexistent/directory/model.json")),
            &SaveConfig::new(ModelFormat::Json),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_default_model_name_shape() {
        let name = default_model_name(ModelFormat::SafeTensors);
        assert!(name.ends_with(".model.safetensors"));
        // %Y_%m_%d-%H_%M_%S
        let stamp = name.trim_end_matches(".model.safetensors");
        assert_eq!(stamp.len(), 19);
        assert_eq!(&stamp[10..11], "-");
    }
}
