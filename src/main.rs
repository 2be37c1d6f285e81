use anyhow::Context;
use clap::Parser;
use datadata::app::{handle_fatal_error, init_logging, AppConfig, PipelineConfig, ReduceStrategy};
use datadata::load::FileType;
use datadata::{datadata, DataError};
use std::path::PathBuf;
use tracing::{debug, info};

/// Group and aggregate tabular or JSON data
#[derive(Parser)]
#[command(name = "datadata")]
#[command(
    about = "Load CSV, TSV or JSON data and reshape it with map/reduce",
    long_about = None
)]
struct Cli {
    /// Enable verbose output (-v for info, -vv for debug, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// File path or http(s) URL to load
    source: Option<String>,

    /// Attribute to group records by
    #[arg(short, long)]
    key: Option<String>,

    /// How to combine the records of a group
    #[arg(short, long, value_enum)]
    reduce: Option<ReduceStrategy>,

    /// Field pattern to add up with `--reduce sum` (wildcards: * and ?)
    #[arg(long)]
    include: Vec<String>,

    /// Field pattern never added up with `--reduce sum`
    #[arg(long)]
    exclude: Vec<String>,

    /// Override the file type guessed from the extension
    #[arg(short = 't', long = "type", value_enum)]
    file_type: Option<FileType>,

    /// Keep CSV/TSV fields as strings instead of converting numbers
    #[arg(long)]
    raw: bool,

    /// Pipeline definition (.toml, .yaml or .yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print only the ordered values instead of the key/value object
    #[arg(long)]
    values: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::new(cli.verbose) {
        Ok(config) => config,
        Err(e) => handle_fatal_error(e, cli.verbose),
    };
    init_logging(&config);

    let verbose = cli.verbose;
    if let Err(e) = run(cli, config).await {
        handle_fatal_error(e, verbose);
    }
}

async fn run(cli: Cli, mut config: AppConfig) -> anyhow::Result<()> {
    let mut pipeline = match &cli.config {
        Some(path) => {
            let pipeline = PipelineConfig::from_path(path)
                .await
                .with_context(|| format!("Failed to load pipeline {}", path.display()))?;
            if cli.source.is_none() {
                // Sources named in a pipeline file are relative to that file
                if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                    let working_dir = config.working_dir.join(dir);
                    config = config.with_working_dir(working_dir);
                }
            }
            pipeline
        }
        None => PipelineConfig::default(),
    };
    apply_overrides(&mut pipeline, &cli);
    debug!("Effective pipeline: {:?}", pipeline);

    let source = pipeline
        .source
        .clone()
        .ok_or(DataError::NoDataSpecification)?;
    let location = config.resolve(&source);
    info!("Processing {}", location);

    let mut reducer = pipeline.reducer()?;
    let result = datadata(
        location.as_str(),
        pipeline.mapper(),
        Some(reducer.as_mut()),
        &pipeline.load_options(),
    )
    .await
    .with_context(|| format!("Failed to process {}", source))?;

    let output = if cli.values {
        serde_json::to_string_pretty(&result.values())?
    } else {
        serde_json::to_string_pretty(&result)?
    };
    println!("{output}");
    Ok(())
}

/// Command line flags take precedence over the pipeline file
fn apply_overrides(pipeline: &mut PipelineConfig, cli: &Cli) {
    if let Some(source) = &cli.source {
        pipeline.source = Some(source.clone());
    }
    if let Some(key) = &cli.key {
        pipeline.key = Some(key.clone());
    }
    if let Some(reduce) = cli.reduce {
        pipeline.reduce = reduce;
    }
    if !cli.include.is_empty() {
        pipeline.include = cli.include.clone();
    }
    if !cli.exclude.is_empty() {
        pipeline.exclude = cli.exclude.clone();
    }
    if let Some(file_type) = cli.file_type {
        pipeline.file_type = Some(file_type);
    }
    if cli.raw {
        pipeline.raw = true;
    }
}
