//! costwatch CLI
//!
//! Entry point for the scheduler: `costwatch run` performs one invocation.

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing::{error, info};

use costwatch::aws::AwsBackends;
use costwatch::render::{format_summary, CsvExporter};
use costwatch::{Config, CostReportJob};

/// costwatch - previous-month cloud cost report and alerts
#[derive(Parser)]
#[command(name = "costwatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "COSTWATCH_CONFIG")]
    config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (for commands that support it)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch last month's costs and send notifications
    Run,

    /// Fetch and print last month's costs without notifying
    Report,

    /// Print the effective configuration
    Config,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    // Parse CLI arguments
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        generate_completions(shell);
        return ExitCode::SUCCESS;
    }

    // Load configuration
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config, cli.verbose);

    let result = match cli.command {
        Commands::Run => run_job(&config).await,
        Commands::Report => run_report(&config, cli.format).await,
        Commands::Config => show_config(&config),
        Commands::Completions { .. } => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "Invocation failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(config: &Config, verbose: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn build_job(
    config: &Config,
) -> anyhow::Result<
    CostReportJob<
        costwatch::aws::CostExplorerSource,
        costwatch::aws::S3ObjectStore,
        costwatch::aws::SesTransport,
    >,
> {
    let backends = AwsBackends::from_config(config).await;
    CostReportJob::new(config, backends.billing, backends.storage, backends.mail)
        .context("failed to set up cost report job")
}

async fn run_job(config: &Config) -> anyhow::Result<()> {
    info!(
        threshold = %config.alerting.cost_threshold,
        billing_region = %config.billing.region,
        "Starting cost report"
    );

    let job = build_job(config).await?;
    let outcome = job.run().await.context("cost report failed")?;

    info!(
        total = %outcome.total,
        exceeded = outcome.threshold_exceeded,
        "Cost report finished"
    );
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

async fn run_report(config: &Config, format: OutputFormat) -> anyhow::Result<()> {
    let job = build_job(config).await?;
    let (period, report) = job
        .report_at(Utc::now())
        .await
        .context("failed to build cost report")?;

    match format {
        OutputFormat::Text => {
            println!("Period: {period}");
            print!("{}", format_summary(&report));
        }
        OutputFormat::Json => {
            let body = serde_json::json!({ "period": period, "report": report });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Csv => {
            CsvExporter::new().write(&report, std::io::stdout().lock())?;
        }
    }
    Ok(())
}

fn show_config(config: &Config) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "costwatch", &mut io::stdout());
}
