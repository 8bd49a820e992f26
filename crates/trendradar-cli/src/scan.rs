//! `scan` command: builds the source clients for one run and renders the report.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context;
use trendradar_core::{AppConfig, Keyword};
use trendradar_pipeline::{run_scan, RankedReport, ScanOptions, Sources};
use trendradar_sources::{AutocompleteClient, ClientOptions, MarketplaceClient, RedditClient};

use crate::OutputFormat;

pub(crate) struct ScanArgs {
    pub seed: String,
    pub max_suggestions: Option<usize>,
    pub concurrency: Option<usize>,
    pub format: OutputFormat,
    pub csv: Option<PathBuf>,
}

/// Flags win over environment settings.
fn scan_options(config: &AppConfig, args: &ScanArgs) -> ScanOptions {
    ScanOptions {
        max_suggestions: args.max_suggestions.unwrap_or(config.max_suggestions),
        concurrency: args.concurrency.unwrap_or(config.max_concurrent_keywords),
    }
}

/// Runs one scan and prints it to stdout, optionally exporting CSV.
///
/// # Errors
///
/// Returns an error if the seed is blank, a client cannot be built from the
/// configured endpoints, or the report cannot be written. Source failures
/// during the scan are not errors.
pub(crate) async fn run_scan_command(config: &AppConfig, args: ScanArgs) -> anyhow::Result<()> {
    let seed = Keyword::parse(&args.seed)
        .ok_or_else(|| anyhow::anyhow!("seed keyword must not be empty"))?;

    let client_options = ClientOptions::from_config(config);
    let endpoints = &config.endpoints;

    let autocomplete = AutocompleteClient::new(&endpoints.autocomplete_url, &client_options)
        .context("failed to build autocomplete client")?;
    let marketplace = MarketplaceClient::new(&endpoints.marketplace_url, &client_options)
        .context("failed to build marketplace client")?;

    if config.reddit.is_none() {
        tracing::warn!("Reddit credentials not configured; forum mention counts will be 0");
    }
    let forum = RedditClient::new(
        &endpoints.reddit_auth_url,
        &endpoints.reddit_api_url,
        config.reddit.clone(),
        &client_options,
    )
    .context("failed to build Reddit client")?;

    let report = run_scan(
        &seed,
        scan_options(config, &args),
        Sources {
            autocomplete: &autocomplete,
            marketplace: &marketplace,
            forum: &forum,
        },
    )
    .await;

    print_report(&report, args.format)?;

    if let Some(path) = &args.csv {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        report
            .write_csv(BufWriter::new(file))
            .with_context(|| format!("failed to write CSV to {}", path.display()))?;
        tracing::info!(path = %path.display(), rows = report.records.len(), "wrote CSV export");
    }

    Ok(())
}

fn print_report(report: &RankedReport, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Markdown => print!("{}", report.to_markdown()),
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(report).context("failed to serialize report")?;
            println!("{json}");
        }
    }
    Ok(())
}
