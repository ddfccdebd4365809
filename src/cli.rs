use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_REPORT_FILE;

#[derive(Parser, Debug)]
#[command(
    name = "license-report-mcp",
    about = "Query ScanCode license reports and canned license guidance over MCP",
    version
)]
pub struct Cli {
    /// Config file [default: ./.license-report/config.toml, fallback ~/.config/license-report/config.toml]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// License report to serve [default: license_analysis_detailed.json next to the binary]
    #[arg(long, global = true, env = "LICENSE_REPORT_PATH", value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Directory that relative file paths are resolved against [default: current directory]
    #[arg(long, global = true, env = "LICENSE_REPORT_BASE", value_name = "DIR")]
    pub base_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the report tools over stdio (default)
    Serve,

    /// Build a license report from ScanCode JSON output
    Build {
        /// ScanCode JSON results
        input: PathBuf,

        /// Where to write the report
        #[arg(short, long, default_value = DEFAULT_REPORT_FILE, value_name = "FILE")]
        output: PathBuf,

        /// List every problematic finding, not just the first few per category
        #[arg(short, long)]
        verbose: bool,

        /// Only print summary line
        #[arg(short, long)]
        quiet: bool,
    },
}
