use crate::solver::Solver;
use crate::{ProgressInfo, WfcError};
use log::{error, info, warn};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Alias for the progress callback function type.
///
/// Called after every iteration of [`Solver::solve_fully`]. Returning an error
/// aborts the run with that error; [`WfcError::Interrupted`] is the
/// conventional choice.
pub type ProgressCallback = Box<dyn Fn(ProgressInfo) -> Result<(), WfcError> + Send + Sync>;

/// Default cap on restarts in [`SolverConfig`].
pub const DEFAULT_MAX_RESTARTS: u32 = 1000;

/// What [`Solver::solve_fully`] does when the catalog's adjacency is not
/// symmetric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum SymmetryPolicy {
    /// Log every violation and return `WfcError::AsymmetricAdjacency`.
    #[default]
    Fail,
    /// Log every violation as a warning and solve anyway.
    Warn,
}

/// Configuration options for [`Solver::solve_fully`].
pub struct SolverConfig {
    /// Restarts allowed before giving up. `None` keeps restarting forever.
    pub max_restarts: Option<u32>,
    /// Reaction to asymmetric catalog adjacency.
    pub symmetry_policy: SymmetryPolicy,
    /// Called after every iteration, if set.
    pub progress_callback: Option<ProgressCallback>,
}

impl SolverConfig {
    /// Creates a new builder for `SolverConfig`.
    pub fn builder() -> SolverConfigBuilder {
        SolverConfigBuilder::default()
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_restarts: Some(DEFAULT_MAX_RESTARTS),
            symmetry_policy: SymmetryPolicy::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for SolverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolverConfig")
            .field("max_restarts", &self.max_restarts)
            .field("symmetry_policy", &self.symmetry_policy)
            .field("progress_callback", &self.progress_callback.is_some())
            .finish()
    }
}

/// Builder for `SolverConfig`.
pub struct SolverConfigBuilder {
    max_restarts: Option<u32>,
    symmetry_policy: SymmetryPolicy,
    progress_callback: Option<ProgressCallback>,
}

impl Default for SolverConfigBuilder {
    fn default() -> Self {
        Self {
            max_restarts: Some(DEFAULT_MAX_RESTARTS),
            symmetry_policy: SymmetryPolicy::default(),
            progress_callback: None,
        }
    }
}

impl SolverConfigBuilder {
    /// Caps the number of restarts.
    pub fn max_restarts(mut self, max: u32) -> Self {
        self.max_restarts = Some(max);
        self
    }

    /// Removes the restart cap.
    pub fn unlimited_restarts(mut self) -> Self {
        self.max_restarts = None;
        self
    }

    pub fn symmetry_policy(mut self, policy: SymmetryPolicy) -> Self {
        self.symmetry_policy = policy;
        self
    }

    /// Sets the progress callback function.
    pub fn progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Builds the `SolverConfig` instance.
    pub fn build(self) -> SolverConfig {
        SolverConfig {
            max_restarts: self.max_restarts,
            symmetry_policy: self.symmetry_policy,
            progress_callback: self.progress_callback,
        }
    }
}

/// Seed for a restarted attempt, derived from the wall clock.
fn time_seed(attempt: u32) -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |now| (now.as_secs() << 30) ^ u64::from(now.subsec_nanos()))
        .wrapping_add(u64::from(attempt))
}

impl Solver {
    /// Solves the whole grid.
    ///
    /// 1. **Symmetry check**: the catalog's adjacency is checked first. Under
    ///    [`SymmetryPolicy::Fail`] any violation ends the run with
    ///    `WfcError::AsymmetricAdjacency`; under [`SymmetryPolicy::Warn`] the
    ///    violations are logged and solving continues.
    /// 2. **Iteration**: [`Solver::single_iteration`] runs until every cell is
    ///    collapsed, at most `X * Y * Z` times per attempt.
    /// 3. **Restart**: when an attempt runs out of iterations (usually because
    ///    a cell was contradicted) or ends with a max-count exceeded, the grid
    ///    is re-initialized with a fresh time-based seed. Restarts are capped
    ///    by `max_restarts`.
    ///
    /// Returns immediately if the grid is already solved.
    ///
    /// # Errors
    ///
    /// - `WfcError::AsymmetricAdjacency` under the fail policy.
    /// - `WfcError::RestartLimitExceeded` when the restart cap is exhausted.
    /// - Any error returned by the progress callback.
    pub fn solve_fully(&mut self) -> Result<(), WfcError> {
        self.check_symmetry()?;

        let start = Instant::now();
        let total_cells = self.size().cell_count();
        let iteration_cap = total_cells as u64;
        let mut iterations: u64 = 0;
        let mut attempt: u32 = 0;

        loop {
            if self.is_solved() {
                if self.max_counts_satisfied() {
                    info!(
                        "Solved {} cells in {} attempt(s), {:?}",
                        total_cells,
                        attempt + 1,
                        start.elapsed()
                    );
                    return Ok(());
                }
                warn!("Attempt {} collapsed every cell but exceeds a max-count", attempt);
            } else if iterations < iteration_cap {
                self.single_iteration();
                iterations += 1;
                if let Some(callback) = &self.config.progress_callback {
                    callback(ProgressInfo {
                        collapsed_cells: self.collapsed_count(),
                        total_cells,
                        iterations,
                        attempt,
                        elapsed_time: start.elapsed(),
                    })?;
                }
                continue;
            } else {
                warn!(
                    "Attempt {} not solved after {} iterations (contradiction: {})",
                    attempt,
                    iterations,
                    self.has_contradiction()
                );
            }

            if let Some(max) = self.config.max_restarts {
                if attempt >= max {
                    error!("Giving up after {} restarts", max);
                    return Err(WfcError::RestartLimitExceeded(max));
                }
            }
            attempt += 1;
            let seed = time_seed(attempt);
            warn!("Restarting (attempt {}) with seed {}", attempt, seed);
            self.reset(seed);
            iterations = 0;
        }
    }

    fn check_symmetry(&self) -> Result<(), WfcError> {
        let violations = self.catalog().check_adjacency_symmetry();
        if violations.is_empty() {
            return Ok(());
        }
        match self.config.symmetry_policy {
            SymmetryPolicy::Fail => {
                for violation in &violations {
                    error!("Asymmetric adjacency: {}", violation);
                }
                Err(WfcError::AsymmetricAdjacency(violations))
            }
            SymmetryPolicy::Warn => {
                for violation in &violations {
                    warn!("Asymmetric adjacency: {}", violation);
                }
                Ok(())
            }
        }
    }
}
