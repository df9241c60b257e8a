//! Core library for the 3D Wave Function Collapse solver.
//!
//! A [`Solver`] owns a grid of [`Cell`]s, each holding the set of tiles still
//! possible at that position. Cells are collapsed one at a time (lowest
//! entropy first) and every change is propagated to the neighbors through the
//! adjacency allow-lists of the shared [`TileCatalog`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use wfc_rules::{CatalogError, SymmetryViolation};

pub mod cell;
/// Collapse hooks run after every collapse.
pub mod decorator;
/// Minimum-entropy cell selection.
pub mod entropy;
/// Grid geometry and the generic grid container.
pub mod grid;
/// Read projection of a solved grid for spawning and export.
pub mod projection;
/// Constraint propagation.
pub mod propagator;
/// Read-only and tag-removal queries over the solver state.
pub mod queries;
/// Run-to-completion loop and solver configuration.
pub mod runner;
/// Weighted tile selection.
pub mod selection;
pub mod solver;
/// Randomized walkable-distance search.
pub mod walk;

pub use crate::cell::Cell;
pub use crate::decorator::{MutuallyExclusive, SolverDecorator};
pub use crate::entropy::min_entropy_cell;
pub use crate::grid::{borders, neighbor, neighbors, opposite, Grid, GridSize};
pub use crate::projection::TilePlacement;
pub use crate::runner::{ProgressCallback, SolverConfig, SolverConfigBuilder, SymmetryPolicy};
pub use crate::selection::select_tag;
pub use crate::solver::{Collapse, Solver};

pub use wfc_rules::{Direction, TileCatalog, TileId, TileModel, TileSet};

/// Errors that can occur while setting up or running the solver.
#[derive(Error, Debug)]
pub enum WfcError {
    /// An error related to grid dimensions or cell access.
    #[error("Grid error: {0}")]
    GridError(String),
    /// Invalid solver or catalog configuration.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    /// The catalog declares neighbors that do not point back.
    #[error("Catalog adjacency is not symmetric ({} violations, first: {})", .0.len(), first_violation(.0))]
    AsymmetricAdjacency(Vec<SymmetryViolation>),
    /// `solve_fully` restarted more often than the configured limit allows.
    #[error("No solution found after {0} restarts")]
    RestartLimitExceeded(u32),
    /// The progress callback asked the run to stop.
    #[error("WFC run interrupted by progress callback")]
    Interrupted,
    /// An error from the tile catalog.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

fn first_violation(violations: &[SymmetryViolation]) -> String {
    violations
        .first()
        .map_or_else(|| "none".to_owned(), ToString::to_string)
}

/// Snapshot of solver progress handed to the progress callback.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProgressInfo {
    /// Cells holding exactly one option.
    pub collapsed_cells: usize,
    /// The total number of cells in the grid.
    pub total_cells: usize,
    /// Iterations completed in the current attempt.
    pub iterations: u64,
    /// Zero-based index of the current attempt; increases on every restart.
    pub attempt: u32,
    /// Time elapsed since `solve_fully` started.
    pub elapsed_time: Duration,
}
