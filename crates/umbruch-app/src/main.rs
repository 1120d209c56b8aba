// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Umbruch — Manual print-pagination and issue PDF generation.
//
// Entry point. Initialises logging, wires the content-store adapter and the
// headless print exporter into the generation service, and runs the
// requested command.

mod services;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use umbruch_core::config::GeneratorConfig;
use umbruch_core::error::Result;
use umbruch_core::human_errors::humanize_error;
use umbruch_render::PdfExporter;

use services::generation::GenerationService;
use services::store::JsonContentStore;

/// Umbruch — turn a manually paginated issue into a print PDF.
#[derive(Parser)]
#[command(
    name = "umbruch",
    version,
    about = "Generate fixed-layout print PDFs from manually paginated magazine issues."
)]
struct Cli {
    /// Root directory of the content store export bundles.
    #[arg(long, default_value = "content", global = true)]
    store: PathBuf,

    /// Generator configuration file (JSON). Defaults apply when absent.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the print artifact for one issue.
    Generate {
        /// Issue number to generate.
        issue: u32,

        /// Output directory for the artifact (overrides config).
        #[arg(long)]
        out: Option<PathBuf>,

        /// Browser binary to render with (overrides config and PATH probe).
        #[arg(long)]
        browser: Option<PathBuf>,

        /// Render settle timeout in seconds (overrides config).
        #[arg(long)]
        timeout: Option<u64>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        let human = humanize_error(&err);
        eprintln!("error: {}", human.message);
        eprintln!("  {}", human.suggestion);
        tracing::debug!(error = %err, "generation request failed");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };

    match cli.command {
        Command::Generate {
            issue,
            out,
            browser,
            timeout,
        } => {
            if let Some(out) = out {
                config.output_dir = out;
            }
            if let Some(browser) = browser {
                config.browser_binary = Some(browser);
            }
            if let Some(timeout) = timeout {
                config.settle_timeout_secs = timeout;
            }

            let store = JsonContentStore::new(cli.store);
            let exporter = PdfExporter::new(config.clone());
            let service = GenerationService::new(store, exporter, config);

            let outcome = service.generate(issue).await?;
            println!("artifact: {}", outcome.artifact.display());
            println!("sha256:   {}", outcome.sha256);
            println!("sheets:   {}", outcome.sheets);
            if outcome.skipped_unassigned > 0 || outcome.rejected_assignments > 0 {
                println!(
                    "placement gaps: {} unassigned, {} rejected",
                    outcome.skipped_unassigned, outcome.rejected_assignments
                );
            }
            Ok(())
        }
    }
}
