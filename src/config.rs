use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::files;

/// File name of the report written by `build` and read by `serve`.
pub const DEFAULT_REPORT_FILE: &str = "license_analysis_detailed.json";

pub const DEFAULT_LINES_TO_READ: usize = 100;

/// Root configuration structure, deserialized from `.license-report/config.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub report: ReportConfig,
    pub files: FilesConfig,
    pub log: LogConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Report location. Defaults to [`DEFAULT_REPORT_FILE`] next to the executable.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Directory that relative tool paths resolve against. Defaults to the
    /// working directory.
    pub base_path: Option<PathBuf>,
    /// Snippet length for `analyze_license_file` when the caller gives none.
    pub lines_to_read: usize,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            base_path: None,
            lines_to_read: DEFAULT_LINES_TO_READ,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Effective settings after config file and CLI overrides are merged.
#[derive(Debug, Clone)]
pub struct Settings {
    pub report_path: PathBuf,
    pub base_path: PathBuf,
    pub lines_to_read: usize,
}

impl Config {
    /// Merge CLI overrides over the file values and fill in defaults.
    pub fn resolve(&self, report: Option<&Path>, base_path: Option<&Path>) -> Result<Settings> {
        let report_path = match report.or(self.report.path.as_deref()) {
            Some(p) => p.to_path_buf(),
            None => default_report_path(),
        };

        let base_path = base_path
            .or(self.files.base_path.as_deref())
            .unwrap_or(Path::new("."));
        let base_path =
            files::absolute(base_path).context("cannot determine working directory")?;

        Ok(Settings {
            report_path,
            base_path,
            lines_to_read: self.files.lines_to_read.max(1),
        })
    }
}

/// [`DEFAULT_REPORT_FILE`] in the executable's directory, or the working
/// directory when that cannot be determined.
fn default_report_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_REPORT_FILE)))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_FILE))
}

/// Load the configuration, searching in order:
///
/// 1. `config_override`: path passed via `--config`
/// 2. `<project_path>/.license-report/config.toml`
/// 3. `~/.config/license-report/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(".license-report").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("license-report")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("invalid config {}", path.display()))
}
