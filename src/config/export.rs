//! Single-command projector export from YAML configuration

use super::schema::ExportSpec;
use super::validate::validate_spec;
use crate::error::{Error, Result};
use crate::io::restore_model;
use crate::projector::{create_tensorboard_visualizations, read_labels, ExportOptions, ExportSummary};
use std::fs;
use std::path::Path;
use tracing::info;

/// Run a TensorBoard export described by a YAML file
///
/// Loads and validates the spec, restores the model, reads the optional
/// label file and writes the projector files into `output_dir`.
///
/// # Example
///
/// ```no_run
/// use kgembed::config::export_from_yaml;
///
/// let summary = export_from_yaml("export.yaml")?;
/// # Ok::<(), kgembed::Error>(())
/// ```
pub fn export_from_yaml<P: AsRef<Path>>(config_path: P) -> Result<ExportSummary> {
    let spec = load_spec(config_path)?;
    run_export(&spec)
}

/// Run an already-loaded export specification
pub fn run_export(spec: &ExportSpec) -> Result<ExportSummary> {
    let model = restore_model(spec.model.as_deref())?;

    let labels = spec
        .labels
        .as_ref()
        .map(|l| read_labels(&l.path, l.header))
        .transpose()?;

    let options = ExportOptions::default()
        .with_metadata(spec.write_metadata)
        .with_tsv_embeddings(spec.export_tsv_embeddings);

    info!(
        "Exporting {} embeddings to {}",
        model.class_name(),
        spec.output_dir.display()
    );
    create_tensorboard_visualizations(model.as_ref(), &spec.output_dir, labels.as_ref(), &options)
}

/// Load and validate an export spec from a YAML file
pub fn load_spec<P: AsRef<Path>>(config_path: P) -> Result<ExportSpec> {
    let yaml_content = fs::read_to_string(config_path.as_ref()).map_err(|e| {
        Error::ConfigError(format!(
            "Failed to read config file {}: {}",
            config_path.as_ref().display(),
            e
        ))
    })?;

    let spec: ExportSpec = serde_yaml::from_str(&yaml_content)
        .map_err(|e| Error::ConfigError(format!("Failed to parse YAML config: {}", e)))?;

    validate_spec(&spec).map_err(|e| Error::ConfigError(format!("Invalid config: {}", e)))?;

    Ok(spec)
}
