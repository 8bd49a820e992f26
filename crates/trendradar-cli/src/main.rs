mod scan;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "trendradar")]
#[command(about = "Niche research from autocomplete, marketplace and forum signals")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Expand a seed keyword, enrich each suggestion and print the ranked report
    Scan {
        /// Seed keyword to expand via autocomplete
        seed: String,

        /// Autocomplete suggestions to check (1-50, default from TRENDRADAR_MAX_SUGGESTIONS)
        #[arg(long, value_parser = parse_max_suggestions)]
        max_suggestions: Option<usize>,

        /// Keywords enriched concurrently (default from TRENDRADAR_MAX_CONCURRENT_KEYWORDS)
        #[arg(long, value_parser = parse_positive)]
        concurrency: Option<usize>,

        /// Report format written to stdout
        #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,

        /// Also write the CSV export to this path
        #[arg(long)]
        csv: Option<std::path::PathBuf>,
    },
    /// Print the product-idea suggestion for a keyword (no network)
    Suggest {
        /// Keyword to classify
        keyword: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Markdown,
    Json,
}

fn parse_positive(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn parse_max_suggestions(raw: &str) -> Result<usize, String> {
    let limit = trendradar_core::config::MAX_SUGGESTIONS_LIMIT;
    let n = parse_positive(raw)?;
    if n > limit {
        return Err(format!("must be between 1 and {limit}"));
    }
    Ok(n)
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            seed,
            max_suggestions,
            concurrency,
            format,
            csv,
        } => {
            let config =
                trendradar_core::load_app_config().context("failed to load configuration")?;
            init_tracing(&config.log_level);
            tracing::debug!(?config, "configuration loaded");

            scan::run_scan_command(
                &config,
                scan::ScanArgs {
                    seed,
                    max_suggestions,
                    concurrency,
                    format,
                    csv,
                },
            )
            .await?;
        }
        Commands::Suggest { keyword } => {
            println!("{}", trendradar_pipeline::suggest(&keyword));
        }
    }

    Ok(())
}
