//! Embeddable command-line runner.
//!
//! There is no way to import "some module's app instance" at runtime in Rust,
//! so the host binary links its app statically and hands it over:
//!
//! ```no_run
//! use openapi_from_routes::{app::App, cli};
//!
//! fn main() -> anyhow::Result<()> {
//!     let app = App::new();
//!     // ... register routes, attach_docs ...
//!     cli::main(&app)
//! }
//! ```
//!
//! Errors propagate raw through `anyhow::Result` as a non-zero exit; no
//! structured CLI error handling is performed.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::path::PathBuf;

use crate::app::App;
use crate::document::build_document;
use crate::serializer::{serialize_json, serialize_yaml, write_to_file};

/// Print the app's swagger 2.0 document without serving it
#[derive(Parser, Debug)]
#[command(name = "openapi-from-routes")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Output format (json or yaml)
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Prefix prepended to every path key, for gateway path rewrites
    #[arg(short = 'p', long = "prefix", value_name = "PREFIX")]
    pub path_prefix: Option<String>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Builds the document from the app's route table and writes it out.
pub fn run(app: &App, args: CliArgs) -> Result<()> {
    debug!("Parsed arguments: {:?}", args);
    info!("Building swagger document...");

    let document = build_document(app, args.path_prefix.as_deref());
    info!("Document built with {} paths", document.paths.len());

    let content = match args.output_format {
        OutputFormat::Json => serialize_json(&document)?,
        OutputFormat::Yaml => serialize_yaml(&document)?,
    };

    if let Some(output_path) = &args.output_path {
        write_to_file(&content, output_path)?;
        info!("Wrote swagger document to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    Ok(())
}

/// Parses arguments from the process command line, initializes logging based
/// on the verbose flag and runs the workflow.
pub fn main(app: &App) -> Result<()> {
    let args = CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    run(app, args)
}
