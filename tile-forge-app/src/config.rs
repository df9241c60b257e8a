use crate::error::AppError;
use clap::{Parser, ValueEnum};
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use wfc_core::runner::DEFAULT_MAX_RESTARTS;
use wfc_core::SymmetryPolicy;

/// Prefix of environment variables read into [`SolverSettings`].
pub const ENV_PREFIX: &str = "TILE_FORGE_";

/// Format of the solved grid written to `--output-path`.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Tile names separated by spaces, one row per line, a blank line between layers.
    #[default]
    Text,
    /// Grid size, cell size and one placement per non-empty cell.
    Json,
}

/// Log level for everything except progress reports.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GlobalLogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

/// Log level used for progress reports.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProgressLogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
}

/// Command-line configuration for the Tile Forge application.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct AppConfig {
    /// Path to the rule file (RON or JSON) defining the tile catalog.
    #[arg(short, long, value_name = "FILE")]
    pub rule_file: PathBuf,

    /// Width of the output grid. Overrides the settings file.
    #[arg(long)]
    pub width: Option<usize>,

    /// Height of the output grid. Overrides the settings file.
    #[arg(long)]
    pub height: Option<usize>,

    /// Depth of the output grid. Overrides the settings file.
    #[arg(long)]
    pub depth: Option<usize>,

    /// Seed for the random number generator. A time-based seed is used if unset.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Path to save the generated output grid.
    #[arg(short, long, value_name = "FILE", default_value = "output.txt")]
    pub output_path: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output_format: OutputFormat,

    /// Restarts allowed before giving up.
    #[arg(long, conflicts_with = "unlimited_restarts")]
    pub max_restarts: Option<u32>,

    /// Keep restarting until a solution is found.
    #[arg(long, default_value_t = false)]
    pub unlimited_restarts: bool,

    /// What to do when the catalog's adjacency is not symmetric.
    #[arg(long, value_enum)]
    pub symmetry_policy: Option<SymmetryPolicy>,

    /// Report progress updates every specified interval (e.g., "1s", "500ms").
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub report_progress_interval: Option<Duration>,

    /// Global log level. `RUST_LOG` is still honoured for per-module filters.
    #[arg(long = "log-level", value_enum, default_value_t = GlobalLogLevel::Info)]
    pub global_log_level: GlobalLogLevel,

    /// Log level for progress reports.
    #[arg(long, value_enum, default_value_t = ProgressLogLevel::Info)]
    pub progress_log_level: ProgressLogLevel,

    /// Optional TOML settings file providing solver defaults.
    #[arg(short = 'c', long = "config", value_name = "FILE", env = "TILE_FORGE_CONFIG")]
    pub settings_file: Option<PathBuf>,
}

/// Solver settings merged from defaults, a TOML settings file, `TILE_FORGE_*`
/// environment variables and finally the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    pub width: usize,
    pub height: usize,
    pub depth: usize,
    pub seed: Option<u64>,
    pub max_restarts: u32,
    pub unlimited_restarts: bool,
    pub symmetry_policy: SymmetryPolicy,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            depth: 10,
            seed: None,
            max_restarts: DEFAULT_MAX_RESTARTS,
            unlimited_restarts: false,
            symmetry_policy: SymmetryPolicy::Fail,
        }
    }
}

impl SolverSettings {
    /// Loads settings from an optional TOML file and the environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file is missing or a value has the
    /// wrong type.
    pub fn load(settings_file: Option<&Path>) -> Result<Self, AppError> {
        let mut figment = Figment::new();
        if let Some(path) = settings_file {
            if !path.exists() {
                return Err(AppError::Config(format!(
                    "Settings file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]))
            .extract()
            .map_err(|e| AppError::Config(format!("Invalid settings: {e}")))
    }

    /// Applies the flags given explicitly on the command line.
    #[must_use]
    pub fn with_overrides(mut self, config: &AppConfig) -> Self {
        if let Some(width) = config.width {
            self.width = width;
        }
        if let Some(height) = config.height {
            self.height = height;
        }
        if let Some(depth) = config.depth {
            self.depth = depth;
        }
        if config.seed.is_some() {
            self.seed = config.seed;
        }
        if let Some(max_restarts) = config.max_restarts {
            self.max_restarts = max_restarts;
            self.unlimited_restarts = false;
        }
        if config.unlimited_restarts {
            self.unlimited_restarts = true;
        }
        if let Some(policy) = config.symmetry_policy {
            self.symmetry_policy = policy;
        }
        self
    }
}
