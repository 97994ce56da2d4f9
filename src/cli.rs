//! Command handlers for the `kgembed` binary
//!
//! Each handler writes its human-readable output to `out` so the commands
//! can be exercised without a subprocess.

use crate::config::{
    export_from_yaml, ConvertArgs, ExportArgs, InspectArgs, LabelArgs, OutputFormat, PredictArgs,
    ProjectorArgs, VisualizeArgs,
};
use crate::io::{
    find_default_model, read_record, restore_model, write_record, ModelFormat, ModelRecord,
    SaveConfig,
};
use crate::model::{Hyperparams, Triple};
use crate::projector::{
    create_tensorboard_projector_files, create_tensorboard_visualizations, read_labels,
    ExportOptions, ExportSummary, Labels,
};
use crate::{Error, Result};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Summary of a saved model printed by `inspect`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub path: PathBuf,
    pub class_name: String,
    pub is_fitted: bool,
    pub num_entities: usize,
    pub num_relations: usize,
    pub hyperparams: Hyperparams,
    pub params: Vec<ParamSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamSummary {
    pub name: String,
    pub shape: Vec<usize>,
}

impl ModelSummary {
    pub fn from_record(path: &Path, record: &ModelRecord) -> Self {
        Self {
            path: path.to_path_buf(),
            class_name: record.class_name.clone(),
            is_fitted: record.is_fitted,
            num_entities: record.ent_to_idx.len(),
            num_relations: record.rel_to_idx.len(),
            hyperparams: record.hyperparams.clone(),
            params: record
                .model_params
                .iter()
                .map(|p| ParamSummary {
                    name: p.name.clone(),
                    shape: p.value.shape().to_vec(),
                })
                .collect(),
        }
    }
}

pub fn run_inspect(args: &InspectArgs, out: &mut dyn Write) -> Result<()> {
    let path = resolve_model_path(args.model.as_deref())?;
    let record = read_record(&path)?;
    let summary = ModelSummary::from_record(&path, &record);

    match args.format {
        OutputFormat::Text => {
            writeln!(out, "Model: {}", summary.path.display())?;
            writeln!(out, "  Class: {}", summary.class_name)?;
            writeln!(out, "  Fitted: {}", summary.is_fitted)?;
            writeln!(out, "  Entities: {}", summary.num_entities)?;
            writeln!(out, "  Relations: {}", summary.num_relations)?;
            writeln!(out, "  Hyperparameters:")?;
            for (key, value) in summary.hyperparams.iter() {
                writeln!(out, "    {key}: {value}")?;
            }
            if !summary.params.is_empty() {
                writeln!(out, "  Parameters:")?;
                for param in &summary.params {
                    writeln!(out, "    {}: {:?}", param.name, param.shape)?;
                }
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)
                .map_err(|e| Error::Serialization(format!("JSON serialization failed: {e}")))?;
            writeln!(out, "{json}")?;
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&summary)
                .map_err(|e| Error::Serialization(format!("YAML serialization failed: {e}")))?;
            write!(out, "{yaml}")?;
        }
    }
    Ok(())
}

pub fn run_convert(args: &ConvertArgs, out: &mut dyn Write) -> Result<()> {
    let format = match args.format {
        Some(format) => format,
        None => args
            .output
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ModelFormat::from_extension)
            .ok_or_else(|| {
                Error::InvalidParameter(format!(
                    "Cannot infer a model format from {}; pass --format",
                    args.output.display()
                ))
            })?,
    };

    let record = read_record(&args.model)?;
    write_record(&record, &args.output, &SaveConfig::new(format))?;
    writeln!(
        out,
        "Converted {} to {} ({})",
        args.model.display(),
        args.output.display(),
        format.extension()
    )?;
    Ok(())
}

pub fn run_predict(args: &PredictArgs, out: &mut dyn Write) -> Result<()> {
    let (model_path, triples_path) = args.split();
    let triples_path = triples_path
        .ok_or_else(|| Error::InvalidParameter("No triples file given".to_string()))?;

    let triples = read_triples(triples_path)?;
    let model = restore_model(model_path.map(PathBuf::as_path))?;
    let scores = model.predict(&triples)?;

    for (triple, score) in triples.iter().zip(scores) {
        writeln!(
            out,
            "{}\t{}\t{}\t{score}",
            triple.subject, triple.predicate, triple.object
        )?;
    }
    Ok(())
}

pub fn run_projector(args: &ProjectorArgs, out: &mut dyn Write) -> Result<()> {
    let labels = load_labels(&args.labels)?;
    let model = restore_model(args.model.as_deref())?;

    let summary = create_tensorboard_projector_files(
        model.as_ref(),
        &args.output,
        labels.as_ref(),
        !args.labels.no_metadata,
    )?;
    print_summary(&summary, out)
}

pub fn run_visualize(args: &VisualizeArgs, out: &mut dyn Write) -> Result<()> {
    let labels = load_labels(&args.labels)?;
    let model = restore_model(args.model.as_deref())?;

    let options = ExportOptions::default()
        .with_metadata(!args.labels.no_metadata)
        .with_tsv_embeddings(!args.no_tsv);
    let summary =
        create_tensorboard_visualizations(model.as_ref(), &args.output_dir, labels.as_ref(), &options)?;
    print_summary(&summary, out)?;
    writeln!(
        out,
        "Run `tensorboard --logdir {}` and open the projector tab",
        args.output_dir.display()
    )?;
    Ok(())
}

pub fn run_export(args: &ExportArgs, out: &mut dyn Write) -> Result<()> {
    let summary = export_from_yaml(&args.config)?;
    print_summary(&summary, out)
}

/// Parse a TSV file of `subject\tpredicate\tobject` lines; blank lines are skipped
pub fn read_triples(path: &Path) -> Result<Vec<Triple>> {
    let content = std::fs::read_to_string(path)?;
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| match line.split('\t').collect::<Vec<_>>().as_slice() {
            [s, p, o] => Ok(Triple::new(s.trim(), p.trim(), o.trim())),
            fields => Err(Error::InvalidParameter(format!(
                "{}:{}: expected 3 tab-separated fields, got {}",
                path.display(),
                i + 1,
                fields.len()
            ))),
        })
        .collect()
}

fn resolve_model_path(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(p) => Ok(p.to_path_buf()),
        None => find_default_model(Path::new(".")),
    }
}

fn load_labels(args: &LabelArgs) -> Result<Option<Labels>> {
    args.labels
        .as_ref()
        .map(|path| read_labels(path, args.header))
        .transpose()
}

fn print_summary(summary: &ExportSummary, out: &mut dyn Write) -> Result<()> {
    for file in &summary.files {
        writeln!(out, "Wrote {}", file.display())?;
    }
    Ok(())
}
