//! kgembed CLI
//!
//! # Usage
//!
//! ```bash
//! # Summarize the latest default-named model in the working directory
//! kgembed inspect
//!
//! # Convert between formats
//! kgembed convert model.safetensors --output model.json
//!
//! # Score triples
//! kgembed predict model.safetensors triples.tsv
//!
//! # TensorBoard projector files
//! kgembed visualize model.safetensors --output-dir tensorboard_files
//!
//! # Export described in YAML
//! kgembed export export.yaml
//! ```

use clap::Parser;
use kgembed::cli::{run_convert, run_export, run_inspect, run_predict, run_projector, run_visualize};
use kgembed::config::{Cli, Command};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v/-q
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.quiet {
            EnvFilter::new("error")
        } else if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut stdout = std::io::stdout().lock();
    let result = match &cli.command {
        Command::Inspect(args) => run_inspect(args, &mut stdout),
        Command::Convert(args) => run_convert(args, &mut stdout),
        Command::Predict(args) => run_predict(args, &mut stdout),
        Command::Projector(args) => run_projector(args, &mut stdout),
        Command::Visualize(args) => run_visualize(args, &mut stdout),
        Command::Export(args) => run_export(args, &mut stdout),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
