//! `license-report-mcp`: query a license scan report over MCP, and build
//! that report from ScanCode output.
//!
//! # Flow (`serve`)
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load config ([`config::load_config`]) and merge CLI overrides.
//! 3. Spawn the one-time report load into the shared [`store::ReportStore`].
//! 4. Answer tool calls on stdio ([`mcp`]) until stdin closes; calls made
//!    before the load finishes see an empty report.
//!
//! # Flow (`build`)
//! 1. Read ScanCode JSON ([`scancode::read_results`]).
//! 2. Fold every file into a [`scancode::ReportBuilder`].
//! 3. Write the report JSON and render a terminal summary ([`report`]).

mod cli;
mod config;
mod error;
mod files;
mod license;
mod mcp;
mod models;
mod report;
mod scancode;
mod store;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use config::{load_config, Settings};
use mcp::{McpServer, ToolContext};
use scancode::ReportBuilder;
use store::ReportStore;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let config = load_config(&cwd, cli.config.as_deref())?;

    // stdout carries protocol traffic, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log.level.as_str())),
        )
        .with_target(false)
        .init();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let settings = config.resolve(cli.report.as_deref(), cli.base_path.as_deref())?;
            serve(settings).await
        }
        Command::Build { input, output, verbose, quiet } => {
            build(&input, &output, verbose, quiet)
        }
    }
}

async fn serve(settings: Settings) -> Result<()> {
    tracing::info!(
        report = %settings.report_path.display(),
        base = %settings.base_path.display(),
        "starting license report server"
    );

    let store = Arc::new(ReportStore::new());

    let loader = store.clone();
    let report_path = settings.report_path.clone();
    tokio::spawn(async move {
        let report = store::load_report(&report_path).await;
        loader.install(report);
    });

    let server = McpServer::new(ToolContext {
        store,
        base_path: settings.base_path,
        lines_to_read: settings.lines_to_read,
    });
    server.run().await?;

    Ok(())
}

fn build(input: &Path, output: &Path, verbose: bool, quiet: bool) -> Result<()> {
    let results = scancode::read_results(input)?;
    tracing::info!(files = results.files.len(), input = %input.display(), "parsed ScanCode results");

    let pb = if !quiet {
        let pb = ProgressBar::new(results.files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut builder = ReportBuilder::new();
    for file in &results.files {
        builder.add_file(file);
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let analysis_date = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string();
    let report = builder.finish(&input.display().to_string(), &analysis_date);

    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(output, json)
        .with_context(|| format!("cannot write report to {}", output.display()))?;
    tracing::info!(output = %output.display(), "license report written");

    report::terminal::render(&report, output, verbose, quiet);

    Ok(())
}
