use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use elastic_io::{ExperimentName, LabelMap, ResultWriter, UcrReader};
use elastic_nn::{ClassifierConfig, Dataset};

#[derive(Parser)]
#[command(name = "elastic")]
#[command(about = "Nearest-neighbour time series classification with elastic distances")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// RNG seed for the noise that fills missing values
    #[arg(long, default_value_t = 0, global = true)]
    seed: u64,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Classifier selection and output options shared by both subcommands.
#[derive(Args, Debug, Clone)]
struct RunArgs {
    /// Classifiers as `measure[-eap|-plain][-incremental|-loocv0]`, comma separated
    #[arg(long, value_delimiter = ',', default_value = "dtw")]
    classifiers: Vec<String>,

    /// Skip the search and use this grid entry (0..99 on the standard grid)
    #[arg(long)]
    param_id: Option<usize>,

    /// Z-normalize every series after loading
    #[arg(long, default_value_t = false)]
    normalize: bool,

    /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
    #[arg(long)]
    experiment: String,

    /// Output directory for result files
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Select parameters by leave-one-out cross-validation on a training file
    Train {
        /// Path to the UCR-format training file
        #[arg(long)]
        train: PathBuf,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Train on one file, then classify every series of a test file
    Evaluate {
        /// Path to the UCR-format training file
        #[arg(long)]
        train: PathBuf,

        /// Path to the UCR-format test file
        #[arg(long)]
        test: PathBuf,

        #[command(flatten)]
        run: RunArgs,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct RunOutput {
    experiment: String,
    problem: String,
    n_train: usize,
    n_test: Option<usize>,
    n_classes: usize,
    results: Vec<ClassifierOutput>,
}

#[derive(Serialize)]
struct ClassifierOutput {
    classifier: String,
    param_id: usize,
    params: String,
    train_accuracy: f64,
    test_accuracy: Option<f64>,
    train_secs: f64,
    test_secs: Option<f64>,
    distance_calls: u64,
}

/// Dataset name from a UCR file name: `Coffee_TRAIN.tsv` gives `Coffee`.
fn problem_name(path: &Path) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("dataset");
    stem.strip_suffix("_TRAIN").unwrap_or(stem).to_owned()
}

fn parse_configs(run: &RunArgs) -> Result<Vec<ClassifierConfig>> {
    run.classifiers
        .iter()
        .map(|name| {
            ClassifierConfig::from_name(name)
                .map(|c| c.with_param_id(run.param_id))
                .with_context(|| format!("invalid classifier \"{name}\""))
        })
        .collect()
}

/// Train every configuration (in parallel), evaluating on `test` when given, and write
/// one JSON file per stage and classifier.
fn run_all(
    configs: &[ClassifierConfig],
    problem: &str,
    train: &Dataset,
    test: Option<&Dataset>,
    labels: &LabelMap,
    writer: &ResultWriter,
) -> Result<Vec<ClassifierOutput>> {
    configs
        .par_iter()
        .map(|config| -> Result<ClassifierOutput> {
            let mut classifier = config.build();
            let trained = classifier
                .train(problem, train)
                .with_context(|| format!("training {config} failed"))?;
            writer.write_train(&trained, labels)?;

            let tested = match test {
                Some(test) => {
                    let tested = classifier
                        .evaluate(test)
                        .with_context(|| format!("evaluating {config} failed"))?;
                    writer.write_test(&trained.classifier, &tested, labels)?;
                    Some(tested)
                }
                None => None,
            };

            let mut distance_calls = trained.counters.distance_calls;
            if let Some(t) = &tested {
                distance_calls += t.counters.distance_calls;
            }
            Ok(ClassifierOutput {
                classifier: trained.classifier,
                param_id: trained.param_id,
                params: trained.params,
                train_accuracy: trained.accuracy,
                test_accuracy: tested.as_ref().map(|t| t.accuracy),
                train_secs: trained.elapsed_secs,
                test_secs: tested.as_ref().map(|t| t.elapsed_secs),
                distance_calls,
            })
        })
        .collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    let output = match cli.command {
        Command::Train { train, run } => {
            let configs = parse_configs(&run)?;
            let experiment_name = ExperimentName::new(run.experiment.clone())?;
            let problem = problem_name(&train);

            let (train_set, labels) = UcrReader::new()
                .with_seed(cli.seed)
                .with_normalize(run.normalize)
                .read(&train)
                .context("failed to read training file")?;

            let writer = ResultWriter::new(&run.output_dir, experiment_name)?;
            let results = run_all(&configs, &problem, &train_set, None, &labels, &writer)?;

            RunOutput {
                experiment: run.experiment,
                problem,
                n_train: train_set.len(),
                n_test: None,
                n_classes: labels.len(),
                results,
            }
        }

        Command::Evaluate { train, test, run } => {
            let configs = parse_configs(&run)?;
            let experiment_name = ExperimentName::new(run.experiment.clone())?;
            let problem = problem_name(&train);

            let split = UcrReader::new()
                .with_seed(cli.seed)
                .with_normalize(run.normalize)
                .read_split(&train, &test)
                .context("failed to read train/test files")?;

            let writer = ResultWriter::new(&run.output_dir, experiment_name)?;
            let results = run_all(
                &configs,
                &problem,
                &split.train,
                Some(&split.test),
                &split.labels,
                &writer,
            )?;

            RunOutput {
                experiment: run.experiment,
                problem,
                n_train: split.train.len(),
                n_test: Some(split.test.len()),
                n_classes: split.labels.len(),
                results,
            }
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
