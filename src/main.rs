use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use uuid::Uuid;

use harmonizer_worker::config::Config;
use harmonizer_worker::infra::HttpStatusReporter;
use harmonizer_worker::intake::JobIntake;
use harmonizer_worker::logging;
use harmonizer_worker::metrics;
use harmonizer_worker::pipeline::dispatcher::output_path_in;
use harmonizer_worker::pipeline::{Dispatcher, ProcessorRegistry};
use harmonizer_worker::types::{Category, JobRequest, JobResult, JobSpec};
use harmonizer_worker::worker::WorkerPool;

#[derive(Parser)]
#[command(name = "harmonizer-worker")]
#[command(about = "Normalizes tabular healthcare records with a pool of concurrent workers")]
#[command(version = "0.1.0")]
struct Cli {
    /// TOML config file; environment variables override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Harmonize a single file and print the result as JSON
    Process {
        /// Data category: patients, vitals, medications, lab_results, generic
        #[arg(long)]
        category: Category,
        #[arg(long)]
        input: PathBuf,
        /// Defaults to <parent of input dir>/results/<stem>_<category>_harmonized.csv
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Harmonize many files through the worker pool
    Run {
        #[arg(long)]
        category: Category,
        /// Files to process (default: every *.csv in the configured input dir)
        files: Vec<PathBuf>,
    },
    /// List the registered categories
    Categories,
}

fn csv_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("reading input directory {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e.eq_ignore_ascii_case("csv")) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

async fn process_one(category: Category, input: PathBuf, output: Option<PathBuf>) -> Result<ExitCode> {
    let dispatcher = Dispatcher::new(Arc::new(ProcessorRegistry::with_builtin()));
    let mut spec = JobSpec::new(Uuid::new_v4().to_string(), category.as_str(), input);
    if let Some(output) = output {
        spec = spec.with_output(output);
    }

    let result = tokio::task::spawn_blocking(move || dispatcher.dispatch(&spec)).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(if result.is_completed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn run_pool(config: &Config, category: Category, files: Vec<PathBuf>) -> Result<ExitCode> {
    config.ensure_dirs()?;
    let files = if files.is_empty() {
        csv_files_in(&config.input_dir)?
    } else {
        files
    };
    if files.is_empty() {
        warn!(input_dir = %config.input_dir.display(), "No input files found");
        return Ok(ExitCode::SUCCESS);
    }

    let dispatcher = Dispatcher::new(Arc::new(ProcessorRegistry::with_builtin()));
    let pool = Arc::new(WorkerPool::new(dispatcher, config.queue_size)?);
    pool.start(config.worker_count)?;

    let mut intake = JobIntake::new(Arc::clone(&pool));
    if let Some(url) = &config.status_callback_url {
        intake = intake.with_reporter(Arc::new(HttpStatusReporter::new(url.as_str())?));
    }

    // Ctrl-C drains the pool; queued jobs then come back abandoned
    let interrupt = {
        let pool = Arc::clone(&pool);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received interrupt, stopping worker pool");
                pool.stop().await;
            }
        })
    };

    let mut pending = Vec::with_capacity(files.len());
    for file in &files {
        let request = JobRequest {
            job_id: Uuid::new_v4().to_string(),
            input_file: file.clone(),
            harmonization_type: category.as_str().to_string(),
            output_file: Some(output_path_in(&config.output_dir, file, category.as_str())),
        };
        match intake.submit_with_callback(request).await {
            Ok(task) => pending.push((file.clone(), task)),
            Err(e) => {
                warn!(file = %file.display(), "Could not submit job: {}", e);
                break;
            }
        }
    }

    let mut completed = 0usize;
    let mut failed = files.len() - pending.len();
    for (file, task) in pending {
        let outcome: harmonizer_worker::Result<JobResult> = task.await?;
        match outcome {
            Ok(result) if result.is_completed() => {
                completed += 1;
                let output = result.output_file().map(|p| p.display().to_string()).unwrap_or_default();
                println!("✅ {} -> {}", file.display(), output);
            }
            Ok(result) => {
                failed += 1;
                println!("❌ {}: {}", file.display(), result.error().unwrap_or("unknown error"));
            }
            Err(e) => {
                failed += 1;
                println!("❌ {}: {}", file.display(), e);
            }
        }
    }

    pool.stop().await;
    interrupt.abort();

    println!("\n📊 Harmonization summary ({}):", category);
    println!("   Files: {}", files.len());
    println!("   Completed: {}", completed);
    println!("   Failed: {}", failed);
    info!(category = %category, completed, failed, "Run finished");

    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let _guard = logging::init_logging(&config.log_dir);
    metrics::init_metrics(config.metrics_addr);

    match cli.command {
        Commands::Process { category, input, output } => process_one(category, input, output).await,
        Commands::Run { category, files } => {
            info!(
                workers = config.worker_count,
                queue_size = config.queue_size,
                "Starting harmonization run"
            );
            run_pool(&config, category, files).await
        }
        Commands::Categories => {
            for label in ProcessorRegistry::with_builtin().categories() {
                println!("{}", label);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
