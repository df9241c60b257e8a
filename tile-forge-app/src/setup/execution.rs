//! Handles the execution of a standard solve run.

use crate::{
    config::{AppConfig, SolverSettings},
    error::AppError,
    output,
    progress::{ConsoleProgressReporter, ProgressReporter},
};
use log::{info, warn};
use std::sync::{Arc, Mutex};
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use wfc_core::{ProgressCallback, ProgressInfo, Solver, SolverConfig, WfcError};
use wfc_rules::load_from_file;

fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |now| now.as_nanos() as u64);
        info!("No seed given, using time-based seed {}", seed);
        seed
    })
}

fn progress_callback(reporter: Arc<Mutex<ConsoleProgressReporter>>) -> ProgressCallback {
    Box::new(move |info: ProgressInfo| -> Result<(), WfcError> {
        if let Ok(mut reporter) = reporter.lock() {
            if let Err(e) = reporter.report(&info) {
                warn!("Progress reporting failed: {}", e);
            }
        }
        Ok(())
    })
}

/// Builds the solver configuration from merged settings.
pub fn solver_config(
    settings: &SolverSettings,
    callback: Option<ProgressCallback>,
) -> SolverConfig {
    let mut builder = SolverConfig::builder().symmetry_policy(settings.symmetry_policy);
    builder = if settings.unlimited_restarts {
        builder.unlimited_restarts()
    } else {
        builder.max_restarts(settings.max_restarts)
    };
    if let Some(callback) = callback {
        builder = builder.progress_callback(callback);
    }
    builder.build()
}

/// Loads the rules, solves the grid and writes it to the output path.
///
/// # Errors
///
/// Returns an error if the settings or rule file are invalid, the grid
/// cannot be solved, or the output cannot be written.
pub fn run_standard_mode(config: &AppConfig) -> Result<(), AppError> {
    let settings = SolverSettings::load(config.settings_file.as_deref())?.with_overrides(config);
    log::debug!("Solver settings: {:?}", settings);

    info!("Loading rules from: {:?}", config.rule_file);
    let catalog = Arc::new(load_from_file(&config.rule_file)?);

    let seed = resolve_seed(settings.seed);
    info!(
        "Solving {}x{}x{} grid with {} tiles (seed {})",
        settings.width,
        settings.height,
        settings.depth,
        catalog.num_tiles(),
        seed
    );

    let reporter = Arc::new(Mutex::new(ConsoleProgressReporter::new(
        config.report_progress_interval.unwrap_or_default(),
    )));
    let callback = config
        .report_progress_interval
        .map(|_| progress_callback(Arc::clone(&reporter)));

    let mut solver = Solver::with_config(
        catalog,
        (settings.width, settings.height, settings.depth),
        seed,
        solver_config(&settings, callback),
    )?;

    let start = Instant::now();
    let result = solver.solve_fully();
    if let Ok(mut reporter) = reporter.lock() {
        let outcome = match &result {
            Ok(()) => reporter.finish(),
            Err(e) => reporter.fail(e),
        };
        if let Err(e) = outcome {
            warn!("Progress reporting failed: {}", e);
        }
    }
    result?;
    info!("Solved in {:?}", start.elapsed());

    output::save_grid_to_file(&solver, &config.output_path, config.output_format)?;
    info!("Grid written to {:?}", config.output_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use wfc_core::SymmetryPolicy;

    #[test]
    fn test_solver_config_from_settings() {
        let settings = SolverSettings {
            max_restarts: 7,
            symmetry_policy: SymmetryPolicy::Warn,
            ..SolverSettings::default()
        };
        let config = solver_config(&settings, None);
        assert_eq!(config.max_restarts, Some(7));
        assert_eq!(config.symmetry_policy, SymmetryPolicy::Warn);
        assert!(config.progress_callback.is_none());

        let unlimited = SolverSettings {
            unlimited_restarts: true,
            ..SolverSettings::default()
        };
        assert_eq!(solver_config(&unlimited, None).max_restarts, None);
    }

    #[test]
    fn test_resolve_seed_keeps_explicit_seed() {
        assert_eq!(resolve_seed(Some(42)), 42);
    }

    #[test]
    fn test_run_standard_mode_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let rules = dir.path().join("rules.json");
        std::fs::write(
            &rules,
            r#"{ "tiles": [ { "name": "Sand", "neighbors": {
                "+x": ["Sand"], "-x": ["Sand"], "+y": ["Sand"],
                "-y": ["Sand"], "+z": ["Sand"], "-z": ["Sand"] } } ] }"#,
        )
        .unwrap();
        let output = dir.path().join("out.txt");
        let config = AppConfig::try_parse_from([
            "tile-forge",
            "-r",
            rules.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--width",
            "2",
            "--height",
            "1",
            "--depth",
            "1",
            "--seed",
            "5",
            "--report-progress-interval",
            "1ms",
        ])
        .unwrap();
        run_standard_mode(&config).unwrap();
        assert_eq!(std::fs::read_to_string(output).unwrap(), "Sand Sand\n");
    }

    #[test]
    fn test_missing_rule_file() {
        let config =
            AppConfig::try_parse_from(["tile-forge", "-r", "/nonexistent/rules.ron"]).unwrap();
        assert!(matches!(
            run_standard_mode(&config),
            Err(AppError::Rules(_))
        ));
    }
}
