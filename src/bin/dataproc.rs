//! dataproc CLI: run the pipeline and report on its output.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use dataproc_rs::audit::AuditLog;
use dataproc_rs::config::PipelineConfig;
use dataproc_rs::engine::{Coordinator, CoordinatorConfig};
use dataproc_rs::model::preload_tasks;
use dataproc_rs::sink::{FileWriter, ResultSink};
use dataproc_rs::summary::{RunReport, Summary};
use dataproc_rs::telemetry::{TelemetryConfig, init_telemetry};
use dataproc_rs::transform::DoubleAndOffset;

#[derive(Parser)]
#[command(name = "dataproc", about = "Worker-pool data processing pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Preload tasks and drain them through the worker pool
    Run(RunArgs),
    /// Summarize the output of a previous run
    Summary {
        /// Results file to count
        #[arg(long)]
        results: Option<PathBuf>,
        /// Audit log path to report
        #[arg(long)]
        log: Option<PathBuf>,
    },
}

#[derive(Args)]
struct RunArgs {
    /// TOML config file (otherwise environment variables are used)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Worker pool size
    #[arg(long)]
    workers: Option<usize>,
    /// Number of tasks to preload
    #[arg(long)]
    tasks: Option<usize>,
    /// Lower bound of the simulated work delay
    #[arg(long)]
    delay_min_ms: Option<u64>,
    /// Upper bound (exclusive) of the simulated work delay
    #[arg(long)]
    delay_max_ms: Option<u64>,
    /// Results output file
    #[arg(long)]
    results: Option<PathBuf>,
    /// Audit log output file
    #[arg(long)]
    log: Option<PathBuf>,
    /// Print the run report as JSON instead of the text summary
    #[arg(long)]
    json: bool,
}

impl RunArgs {
    fn resolve(&self) -> anyhow::Result<PipelineConfig> {
        let mut config = match self.config {
            Some(ref path) => PipelineConfig::from_file(path)?,
            None => PipelineConfig::from_env()?,
        };
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(tasks) = self.tasks {
            config.tasks = tasks;
        }
        if let Some(ms) = self.delay_min_ms {
            config.delay_min_ms = ms;
        }
        if let Some(ms) = self.delay_max_ms {
            config.delay_max_ms = ms;
        }
        if let Some(ref path) = self.results {
            config.results_path = path.clone();
        }
        if let Some(ref path) = self.log {
            config.log_path = path.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => cmd_run(args).await,
        Command::Summary { results, log } => {
            let defaults = PipelineConfig::from_env()?;
            let summary = Summary::load(
                &results.unwrap_or(defaults.results_path),
                &log.unwrap_or(defaults.log_path),
            )
            .await?;
            println!("{summary}");
            Ok(())
        }
    }
}

async fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let config = args.resolve()?;

    let _guard = init_telemetry(TelemetryConfig {
        endpoint: config.otel_endpoint.clone(),
        service_name: "dataproc".to_string(),
        log_level: config.log_level.clone(),
    })?;

    let audit = AuditLog::<FileWriter>::create(&config.log_path).await?;
    let results = ResultSink::<FileWriter>::create("results", &config.results_path).await?;

    let coordinator = Coordinator::new(CoordinatorConfig::try_from(&config)?, DoubleAndOffset)?;
    let outcome = coordinator
        .run(preload_tasks(config.tasks), results, audit)
        .await?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&RunReport::from(&outcome))?
        );
    } else {
        let summary = Summary::load(&config.results_path, &config.log_path).await?;
        println!("{summary}");
    }

    Ok(())
}
