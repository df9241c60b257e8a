//! The solver engine: grid state, initialization and single-step collapse.

use crate::cell::Cell;
use crate::decorator::{hooks_from_specs, SolverDecorator};
use crate::entropy::min_entropy_cell;
use crate::grid::{borders, Grid, GridSize};
use crate::runner::SolverConfig;
use crate::selection::select_tag;
use crate::WfcError;
use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use std::sync::Arc;
use wfc_rules::{TileCatalog, TileId, TileSet};

/// Result of one successful collapse step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collapse {
    /// Linear index of the collapsed cell.
    pub index: usize,
    /// Tile the cell was committed to.
    pub tile: TileId,
}

/// A Wave Function Collapse solver over one 3D grid.
///
/// The solver exclusively owns its cells; the catalog is shared and never
/// mutated. All randomness comes from a `StdRng` seeded at [`Solver::init`],
/// so a fixed catalog, size and seed reproduce the same sequence of collapses.
pub struct Solver {
    catalog: Arc<TileCatalog>,
    cells: Grid<Cell>,
    pub(crate) rng: StdRng,
    seed: u64,
    has_max_counts: bool,
    catalog_hooks: Vec<Arc<dyn SolverDecorator>>,
    hooks: Vec<Arc<dyn SolverDecorator>>,
    pub(crate) config: SolverConfig,
}

impl Solver {
    /// Creates a solver with the default configuration and initializes it.
    ///
    /// # Errors
    ///
    /// Returns `WfcError::GridError` if any dimension of `size` is zero or
    /// the cell count overflows `usize`.
    pub fn new(
        catalog: Arc<TileCatalog>,
        size: impl Into<GridSize>,
        seed: u64,
    ) -> Result<Self, WfcError> {
        Self::with_config(catalog, size, seed, SolverConfig::default())
    }

    /// Creates a solver with an explicit configuration and initializes it.
    ///
    /// # Errors
    ///
    /// Returns `WfcError::GridError` if any dimension of `size` is zero or
    /// the cell count overflows `usize`.
    pub fn with_config(
        catalog: Arc<TileCatalog>,
        size: impl Into<GridSize>,
        seed: u64,
        config: SolverConfig,
    ) -> Result<Self, WfcError> {
        let size = size.into();
        Self::check_size(size)?;
        let has_max_counts = catalog.tiles().any(|(_, model)| model.max_count.is_some());
        let mut solver = Self {
            catalog_hooks: hooks_from_specs(catalog.decorators()),
            has_max_counts,
            cells: Grid::filled(size, Cell::new(catalog.all_tiles())),
            catalog,
            rng: StdRng::seed_from_u64(seed),
            seed,
            hooks: Vec::new(),
            config,
        };
        solver.reset(seed);
        Ok(solver)
    }

    /// (Re)initializes the grid for `catalog`, `size` and `seed`.
    ///
    /// Every cell starts with the full tile universe. Border rules are then
    /// applied cell by cell, in canonical direction order, each followed by
    /// propagation from the restricted cell. Hooks registered with
    /// [`Solver::add_decorator`] are kept; catalog hooks are rebuilt.
    ///
    /// # Errors
    ///
    /// Returns `WfcError::GridError` if any dimension of `size` is zero or
    /// the cell count overflows `usize`. The
    /// solver is left untouched in that case.
    pub fn init(
        &mut self,
        catalog: Arc<TileCatalog>,
        size: impl Into<GridSize>,
        seed: u64,
    ) -> Result<(), WfcError> {
        let size = size.into();
        Self::check_size(size)?;
        self.catalog_hooks = hooks_from_specs(catalog.decorators());
        self.has_max_counts = catalog.tiles().any(|(_, model)| model.max_count.is_some());
        self.cells = Grid::filled(size, Cell::new(catalog.all_tiles()));
        self.catalog = catalog;
        self.reset(seed);
        Ok(())
    }

    fn check_size(size: GridSize) -> Result<(), WfcError> {
        if size.is_empty() {
            return Err(WfcError::GridError(format!(
                "Grid dimensions must be non-zero, got {}x{}x{}",
                size.x, size.y, size.z
            )));
        }
        if size.checked_cell_count().is_none() {
            return Err(WfcError::GridError(format!(
                "Grid of {}x{}x{} cells is too large",
                size.x, size.y, size.z
            )));
        }
        Ok(())
    }

    /// Discards all progress and starts a fresh attempt with `seed`, keeping
    /// catalog and size.
    pub(crate) fn reset(&mut self, seed: u64) {
        let size = self.size();
        info!(
            "Initializing {}x{}x{} grid with {} tiles, seed {}",
            size.x,
            size.y,
            size.z,
            self.catalog.num_tiles(),
            seed
        );
        self.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
        self.cells = Grid::filled(size, Cell::new(self.catalog.all_tiles()));

        let catalog = Arc::clone(&self.catalog);
        for index in 0..size.cell_count() {
            for direction in borders(size, index) {
                let Some(rule) = catalog.border(direction) else {
                    continue;
                };
                if rule.is_empty() {
                    continue;
                }
                trace!("Applying {} border rule to cell {}", direction, index);
                self.cells[index].options.intersect_with(rule);
                self.propagate_from(index);
            }
        }
        self.enforce_max_counts();
    }

    /// Collapses the lowest-entropy cell and propagates the consequences.
    ///
    /// Runs every collapse hook (catalog hooks first, then hooks added with
    /// [`Solver::add_decorator`], each in registration order) before
    /// propagating from the collapsed cell.
    ///
    /// Returns `None` without changing anything if the grid is already
    /// collapsed or the selected cell has no options left.
    pub fn single_iteration(&mut self) -> Option<Collapse> {
        let Some(index) = min_entropy_cell(self.cells.as_slice(), &mut self.rng) else {
            warn!("single_iteration called on a fully collapsed grid");
            return None;
        };
        let tile = select_tag(&self.cells[index].options, &self.catalog, &mut self.rng)?;
        debug!(
            "Collapsing cell {} to {} ({})",
            index,
            tile,
            self.catalog.name_of(tile)
        );
        self.cells[index].options = TileSet::from_ids(self.catalog.num_tiles(), [tile]);

        let hooks: Vec<Arc<dyn SolverDecorator>> = self
            .catalog_hooks
            .iter()
            .chain(self.hooks.iter())
            .cloned()
            .collect();
        for hook in &hooks {
            hook.on_cell_collapsed(index, tile, self);
        }

        self.propagate_from(index);
        self.enforce_max_counts();
        Some(Collapse { index, tile })
    }

    /// Registers a collapse hook. Hooks run in registration order after the
    /// hooks declared by the catalog.
    pub fn add_decorator<D: SolverDecorator + 'static>(&mut self, decorator: D) {
        self.hooks.push(Arc::new(decorator));
    }

    /// True if every cell holds exactly one option.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.cells.iter().all(Cell::is_collapsed)
    }

    /// True if any cell has run out of options.
    #[must_use]
    pub fn has_contradiction(&self) -> bool {
        self.cells.iter().any(Cell::is_contradicted)
    }

    /// Number of cells holding exactly one option.
    #[must_use]
    pub fn collapsed_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_collapsed()).count()
    }

    /// Number of collapsed cells per tile, indexed by `TileId`.
    pub(crate) fn collapsed_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.catalog.num_tiles()];
        for tile in self.cells.iter().filter_map(Cell::collapsed_tile) {
            counts[tile.0] += 1;
        }
        counts
    }

    /// Tiles whose max-count is already reached by collapsed cells.
    pub(crate) fn capped_tiles(&self) -> TileSet {
        let mut capped = TileSet::empty(self.catalog.num_tiles());
        if !self.has_max_counts {
            return capped;
        }
        let counts = self.collapsed_counts();
        for (id, model) in self.catalog.tiles() {
            if let Some(max) = model.max_count {
                if counts[id.0] >= max as usize {
                    capped.insert(id);
                }
            }
        }
        capped
    }

    /// True if no tile appears in more collapsed cells than its max-count.
    #[must_use]
    pub fn max_counts_satisfied(&self) -> bool {
        if !self.has_max_counts {
            return true;
        }
        let counts = self.collapsed_counts();
        self.catalog.tiles().all(|(id, model)| {
            model
                .max_count
                .map_or(true, |max| counts[id.0] <= max as usize)
        })
    }

    /// Removes every tile whose max-count is reached from all uncollapsed
    /// cells, propagating each change, until nothing more is removed.
    pub fn enforce_max_counts(&mut self) {
        if !self.has_max_counts {
            return;
        }
        loop {
            let capped = self.capped_tiles();
            if capped.is_empty() || !self.remove_tags_from_uncollapsed(&capped) {
                return;
            }
        }
    }

    /// The shared tile catalog.
    #[must_use]
    pub fn catalog(&self) -> &Arc<TileCatalog> {
        &self.catalog
    }

    /// Grid dimensions.
    #[must_use]
    pub fn size(&self) -> GridSize {
        self.cells.size()
    }

    /// Seed of the current attempt.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// All cells in index order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        self.cells.as_slice()
    }

    /// One cell, or `None` if `index` is out of range.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub(crate) fn cell_mut(&mut self, index: usize) -> Option<&mut Cell> {
        self.cells.get_mut(index)
    }

    /// Configuration used by `solve_fully`.
    #[must_use]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Replaces the configuration used by `solve_fully`.
    pub fn set_config(&mut self, config: SolverConfig) {
        self.config = config;
    }
}

impl fmt::Debug for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Solver")
            .field("size", &self.size())
            .field("seed", &self.seed)
            .field("num_tiles", &self.catalog.num_tiles())
            .field("collapsed", &self.collapsed_count())
            .field("hooks", &(self.catalog_hooks.len() + self.hooks.len()))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wfc_rules::{Direction, TileDef};

    fn open_catalog() -> Arc<TileCatalog> {
        Arc::new(
            TileCatalog::builder()
                .tile(TileDef::new("A").allow_all(["A", "B"]))
                .tile(TileDef::new("B").allow_all(["A", "B"]))
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_new_fills_full_universe() {
        let solver = Solver::new(open_catalog(), (2, 2, 2), 1).unwrap();
        assert_eq!(solver.cells().len(), 8);
        assert!(solver.cells().iter().all(|cell| cell.entropy() == 2));
        assert!(!solver.is_solved());
        assert!(!solver.has_contradiction());
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let result = Solver::new(open_catalog(), (0, 2, 2), 1);
        assert!(matches!(result, Err(WfcError::GridError(_))));
    }

    #[test]
    fn test_init_replaces_state() {
        let mut solver = Solver::new(open_catalog(), (2, 1, 1), 1).unwrap();
        solver.single_iteration();
        solver.init(open_catalog(), (3, 1, 1), 5).unwrap();
        assert_eq!(solver.size(), GridSize::new(3, 1, 1));
        assert_eq!(solver.seed(), 5);
        assert_eq!(solver.collapsed_count(), 0);
    }

    #[test]
    fn test_failed_init_keeps_state() {
        let mut solver = Solver::new(open_catalog(), (2, 1, 1), 1).unwrap();
        assert!(solver.init(open_catalog(), (2, 0, 1), 5).is_err());
        assert_eq!(solver.size(), GridSize::new(2, 1, 1));
    }

    #[test]
    fn test_border_rule_applies_only_on_boundary() {
        let catalog = Arc::new(
            TileCatalog::builder()
                .tile(TileDef::new("A").allow_all(["A", "B"]))
                .tile(TileDef::new("B").allow_all(["A", "B"]))
                .border(Direction::XMinus, ["A"])
                .build()
                .unwrap(),
        );
        let solver = Solver::new(catalog, (3, 1, 1), 1).unwrap();
        assert_eq!(solver.cell(0).unwrap().collapsed_tile(), Some(TileId(0)));
        assert_eq!(solver.cell(1).unwrap().entropy(), 2);
        assert_eq!(solver.cell(2).unwrap().entropy(), 2);
    }

    #[test]
    fn test_single_iteration_collapses_one_cell() {
        let mut solver = Solver::new(open_catalog(), (2, 2, 1), 3).unwrap();
        let collapse = solver.single_iteration().unwrap();
        let cell = solver.cell(collapse.index).unwrap();
        assert_eq!(cell.collapsed_tile(), Some(collapse.tile));
        assert_eq!(solver.collapsed_count(), 1);
    }

    #[test]
    fn test_single_iteration_on_solved_grid() {
        let mut solver = Solver::new(open_catalog(), (1, 1, 1), 3).unwrap();
        assert!(solver.single_iteration().is_some());
        assert!(solver.is_solved());
        assert_eq!(solver.single_iteration(), None);
    }

    #[test]
    fn test_closure_hook_sees_collapse_before_propagation() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        // Self-only tiles: propagation would collapse the neighbor too.
        let catalog = Arc::new(
            TileCatalog::builder()
                .tile(TileDef::new("A").allow_all(["A"]))
                .tile(TileDef::new("B").allow_all(["B"]))
                .build()
                .unwrap(),
        );
        let neighbor_entropy = Arc::new(AtomicUsize::new(usize::MAX));
        let seen = Arc::clone(&neighbor_entropy);
        let mut solver = Solver::new(catalog, (2, 1, 1), 8).unwrap();
        solver.add_decorator(move |cell: usize, tile: TileId, solver: &mut Solver| {
            assert_eq!(solver.cell(cell).unwrap().collapsed_tile(), Some(tile));
            let other = solver.cell(1 - cell).unwrap().entropy();
            seen.store(other, Ordering::SeqCst);
        });

        let collapse = solver.single_iteration().unwrap();
        assert_eq!(neighbor_entropy.load(Ordering::SeqCst), 2);
        assert!(solver.is_solved());
        assert_eq!(
            solver.cell(1 - collapse.index).unwrap().collapsed_tile(),
            Some(collapse.tile)
        );
    }

    #[test]
    fn test_oversized_grid_rejected() {
        let side = 1usize << (usize::BITS / 3 + 1);
        let result = Solver::new(open_catalog(), (side, side, side), 1);
        assert!(matches!(result, Err(WfcError::GridError(_))));

        let mut solver = Solver::new(open_catalog(), (2, 1, 1), 1).unwrap();
        assert!(solver.init(open_catalog(), (usize::MAX, 2, 1), 5).is_err());
        assert_eq!(solver.size(), GridSize::new(2, 1, 1));
    }

    #[test]
    fn test_debug_output() {
        let solver = Solver::new(open_catalog(), (1, 2, 3), 42).unwrap();
        let text = format!("{solver:?}");
        assert!(text.contains("seed: 42"));
    }
}
