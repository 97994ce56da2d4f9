//! Integration tests for the command handlers

use kgembed::cli::{run_convert, run_export, run_inspect};
use kgembed::config::{parse_args, Command};
use kgembed::io::{read_record, save_model, SaveConfig};
use kgembed::model::{Hyperparams, Vocabulary};
use kgembed::{KgeModel, ModelFormat, Triple};
use ndarray::Array2;
use std::fs;
use tempfile::tempdir;

fn save_fitted(path: &std::path::Path, format: ModelFormat) {
    let triples = vec![Triple::new("x", "r", "y"), Triple::new("y", "r", "z")];
    let mut model = KgeModel::new("HolE", Hyperparams::new().with("k", 4)).unwrap();
    model
        .set_trained_params(
            Vocabulary::from_triples(&triples),
            Array2::from_elem((3, 4), 0.25),
            Array2::from_elem((1, 4), -0.5),
        )
        .unwrap();
    save_model(&model, Some(path), &SaveConfig::new(format)).unwrap();
}

#[test]
fn test_parsed_convert_runs() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("model.safetensors");
    let output = dir.path().join("model.yaml");
    save_fitted(&input, ModelFormat::SafeTensors);

    let cli = parse_args([
        "kgembed",
        "convert",
        input.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
    ])
    .unwrap();
    let Command::Convert(args) = cli.command else {
        panic!("Expected Convert command");
    };

    let mut out: Vec<u8> = Vec::new();
    run_convert(&args, &mut out).unwrap();

    assert!(String::from_utf8(out).unwrap().contains("(yaml)"));
    assert_eq!(read_record(&output).unwrap(), read_record(&input).unwrap());
}

#[test]
fn test_parsed_inspect_yaml() {
    let dir = tempdir().unwrap();
    let model = dir.path().join("model.json");
    save_fitted(&model, ModelFormat::Json);

    let cli = parse_args([
        "kgembed",
        "inspect",
        model.to_str().unwrap(),
        "--format",
        "yaml",
    ])
    .unwrap();
    let Command::Inspect(args) = cli.command else {
        panic!("Expected Inspect command");
    };

    let mut out: Vec<u8> = Vec::new();
    run_inspect(&args, &mut out).unwrap();
    let yaml = String::from_utf8(out).unwrap();
    assert!(yaml.contains("class_name: HolE"));
    assert!(yaml.contains("num_entities: 3"));
}

#[test]
fn test_export_command_from_yaml() {
    let dir = tempdir().unwrap();
    let model = dir.path().join("model.safetensors");
    save_fitted(&model, ModelFormat::SafeTensors);
    let output_dir = dir.path().join("tb");
    let config = dir.path().join("export.yaml");
    fs::write(
        &config,
        format!(
            "model: {}\noutput_dir: {}\nexport_tsv_embeddings: false\n",
            model.display(),
            output_dir.display()
        ),
    )
    .unwrap();

    let cli = parse_args(["kgembed", "export", config.to_str().unwrap()]).unwrap();
    let Command::Export(args) = cli.command else {
        panic!("Expected Export command");
    };

    let mut out: Vec<u8> = Vec::new();
    run_export(&args, &mut out).unwrap();

    assert_eq!(String::from_utf8(out).unwrap().lines().count(), 3);
    assert_eq!(
        fs::read_to_string(output_dir.join("metadata.tsv")).unwrap(),
        "x\ny\nz\n"
    );
}
