use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use credit_lens::config::{load_config, LoadedConfig};
use credit_lens::error::FieldProblem;
use credit_lens::explain::{AttributionEngine, ExplainerArtifact};
use credit_lens::model::ModelArtifact;
use credit_lens::output;
use credit_lens::{ClientRecord, Error, ScoreReport, Scorer, ValidationError};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_ARTIFACT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score one or more client records (JSON files)
    Score {
        /// Client record files
        #[arg(required = true)]
        records: Vec<PathBuf>,

        /// Print reports as JSON instead of text
        #[arg(long)]
        json: bool,

        /// Print one tab-separated line per record
        #[arg(long, conflicts_with = "json")]
        tsv: bool,
    },
    /// Show what the configured artifacts contain
    Inspect,
    /// Fit the explainer artifact for the configured model
    CreateExplainer {
        /// Where to write the explainer (defaults to the configured path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "credit-lens")]
#[command(about = "Explainable loan eligibility scoring", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/credit-lens/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let start_time = Instant::now();

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let loaded = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let code = match cli.command {
        Commands::Score { records, json, tsv } => run_score(&loaded, &records, json, tsv),
        Commands::Inspect => run_inspect(&loaded),
        Commands::CreateExplainer { output } => run_create_explainer(&loaded, output),
    };

    if cli.verbose {
        eprintln!("Done in {:?}", start_time.elapsed());
    }
    std::process::exit(code);
}

fn read_record(path: &Path) -> Result<ClientRecord, Error> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ValidationError::single(
            "record",
            FieldProblem::Malformed(format!("cannot read {}: {}", path.display(), e)),
        )
    })?;
    Ok(ClientRecord::from_json(&content)?)
}

fn run_score(loaded: &LoadedConfig, paths: &[PathBuf], json: bool, tsv: bool) -> i32 {
    let artifact_paths = loaded.config.artifact_paths(&loaded.base_dir);
    let scorer = match Scorer::load(&artifact_paths, loaded.policy) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Artifact error [{}]: {}", e.error_code(), e);
            return EXIT_ARTIFACT;
        }
    };

    // Parse everything first, then score the parseable records as one batch.
    let mut slots: Vec<Option<Result<ScoreReport, Error>>> = Vec::with_capacity(paths.len());
    let mut indices = Vec::new();
    let mut records = Vec::new();
    for (index, path) in paths.iter().enumerate() {
        match read_record(path) {
            Ok(record) => {
                indices.push(index);
                records.push(record);
                slots.push(None);
            }
            Err(e) => slots.push(Some(Err(e))),
        }
    }
    for (index, result) in indices.into_iter().zip(scorer.score_batch(&records)) {
        slots[index] = Some(result);
    }
    let results: Vec<Result<ScoreReport, Error>> = slots.into_iter().flatten().collect();

    let mut exit_code = EXIT_SUCCESS;
    for result in &results {
        if let Err(e) = result {
            let code = if e.is_client_error() {
                EXIT_INPUT
            } else {
                EXIT_ARTIFACT
            };
            exit_code = exit_code.max(code);
        }
    }

    if json {
        let entries: Vec<(String, &Result<ScoreReport, Error>)> = paths
            .iter()
            .map(|path| path.display().to_string())
            .zip(&results)
            .collect();
        match output::format_json(&entries) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Failed to serialize reports: {}", e);
                return EXIT_ARTIFACT;
            }
        }
        return exit_code;
    }

    if tsv {
        let rows: Vec<(String, ScoreReport)> = paths
            .iter()
            .zip(&results)
            .filter_map(|(path, result)| {
                result
                    .as_ref()
                    .ok()
                    .map(|r| (path.display().to_string(), r.clone()))
            })
            .collect();
        let output = output::format_tsv(&rows);
        if !output.is_empty() {
            println!("{}", output);
        }
    }

    let use_colors = output::should_use_colors();
    for (path, result) in paths.iter().zip(&results) {
        match result {
            Ok(report) if !tsv => {
                if paths.len() > 1 {
                    println!("{}", path.display());
                }
                println!("{}", output::format_report(report, use_colors));
            }
            Ok(_) => {}
            Err(e) => eprintln!("{}: {}", path.display(), e),
        }
    }

    exit_code
}

fn run_inspect(loaded: &LoadedConfig) -> i32 {
    let paths = loaded.config.artifact_paths(&loaded.base_dir);
    let model = match ModelArtifact::load(&paths.model) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Artifact error: {}", e);
            return EXIT_ARTIFACT;
        }
    };

    let explainer = if paths.explainer.exists() {
        match ExplainerArtifact::load(&paths.explainer) {
            Ok(x) => Some(x),
            Err(e) => {
                eprintln!("Artifact error: {}", e);
                return EXIT_ARTIFACT;
            }
        }
    } else {
        None
    };

    println!(
        "{}",
        output::format_artifact_summary(&model, explainer.as_ref(), output::should_use_colors())
    );

    // Confirm the pair binds, as `score` would.
    if let Some(explainer) = &explainer {
        if let Err(e) = Scorer::from_artifacts(model, explainer, loaded.policy) {
            eprintln!("Artifact error [{}]: {}", e.error_code(), e);
            return EXIT_ARTIFACT;
        }
    }

    EXIT_SUCCESS
}

fn run_create_explainer(loaded: &LoadedConfig, output: Option<PathBuf>) -> i32 {
    let paths = loaded.config.artifact_paths(&loaded.base_dir);
    let target = output.unwrap_or(paths.explainer);

    let model = match ModelArtifact::load(&paths.model).and_then(ModelArtifact::into_parts) {
        Ok((_, model)) => model,
        Err(e) => {
            eprintln!("Artifact error: {}", e);
            return EXIT_ARTIFACT;
        }
    };

    let explainer = AttributionEngine::fit(&model);
    if let Err(e) = explainer.save(&target) {
        eprintln!("Artifact error: {}", e);
        return EXIT_ARTIFACT;
    }

    println!(
        "Wrote explainer for {} to {} (baseline {:.6})",
        explainer.model_version,
        target.display(),
        explainer.expected_value
    );
    EXIT_SUCCESS
}
