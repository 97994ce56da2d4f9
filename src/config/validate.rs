//! Export specification validation

use super::schema::ExportSpec;

/// Validation error type
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Output directory must not be empty")]
    EmptyOutputDir,

    #[error("Model path does not exist: {0}")]
    ModelPathNotFound(String),

    #[error("Labels file does not exist: {0}")]
    LabelsNotFound(String),
}

/// Validate an export specification
///
/// Checks:
/// - `output_dir` is set
/// - The model and label files exist, when given
pub fn validate_spec(spec: &ExportSpec) -> Result<(), ValidationError> {
    if spec.output_dir.as_os_str().is_empty() {
        return Err(ValidationError::EmptyOutputDir);
    }

    if let Some(model) = &spec.model {
        if !model.exists() {
            return Err(ValidationError::ModelPathNotFound(
                model.display().to_string(),
            ));
        }
    }

    if let Some(labels) = &spec.labels {
        if !labels.path.exists() {
            return Err(ValidationError::LabelsNotFound(
                labels.path.display().to_string(),
            ));
        }
    }

    Ok(())
}
