//! CLI entry point for the harvester tool.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use harvester_core::{
    CatalogNavigator, ChromiumSession, ManifestPaths, ManifestWriter, PollConfig,
    RetrievalPipeline, run_harvest,
};
use tracing::{debug, info, warn};
use url::Url;

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");
    info!(class = %args.class, "harvester starting");

    let entry_url = Url::parse(&args.entry_url).context("invalid catalog entry URL")?;

    let session = ChromiumSession::launch(entry_url.as_str())
        .await
        .context("failed to launch browser session")?;
    let poll = PollConfig::with_timeout(Duration::from_secs(args.poll_timeout_secs));
    let mut navigator = CatalogNavigator::new(session, entry_url, poll);

    let pipeline = RetrievalPipeline::new(&args.output_dir);
    let writer = ManifestWriter::new();
    let manifest_paths = ManifestPaths::in_dir(&args.manifest_dir);

    let outcome = run_harvest(&mut navigator, &pipeline, writer, args.class, &manifest_paths).await;

    // Teardown is unconditional: the session is released whether the run
    // succeeded, skipped entries, or aborted.
    if let Err(error) = navigator.close().await {
        warn!(error = %error, "session teardown failed");
    }

    let stats = outcome?;
    info!(
        discovered = stats.discovered,
        retrieved = stats.retrieved,
        skipped = stats.skipped,
        "harvest complete"
    );

    Ok(())
}
