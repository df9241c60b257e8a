use crate::solver::Solver;
use log::debug;
use std::sync::Arc;
use wfc_rules::{DecoratorSpec, TileId, TileSet};

/// A hook invoked after every collapse, before the solver propagates from the
/// collapsed cell.
///
/// Hooks may change any cell through the solver's public methods. Methods that
/// remove tiles from uncollapsed cells propagate on their own; a hook that
/// edits cells with [`Solver::remove_tag`] must call
/// [`Solver::propagate_from`] itself.
///
/// Closures of the form `Fn(usize, TileId, &mut Solver)` implement this trait.
pub trait SolverDecorator: Send + Sync {
    /// Called with the linear index of the collapsed cell and its tile.
    fn on_cell_collapsed(&self, cell: usize, tile: TileId, solver: &mut Solver);
}

impl<F> SolverDecorator for F
where
    F: Fn(usize, TileId, &mut Solver) + Send + Sync,
{
    fn on_cell_collapsed(&self, cell: usize, tile: TileId, solver: &mut Solver) {
        self(cell, tile, solver);
    }
}

/// Allows at most one tile out of a group to appear: as soon as one of them
/// is collapsed anywhere, the whole group is removed from every uncollapsed
/// cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutuallyExclusive {
    tags: TileSet,
}

impl MutuallyExclusive {
    /// Creates the hook for the given group of tiles.
    #[must_use]
    pub const fn new(tags: TileSet) -> Self {
        Self { tags }
    }

    /// The excluded group.
    #[must_use]
    pub const fn tags(&self) -> &TileSet {
        &self.tags
    }
}

impl SolverDecorator for MutuallyExclusive {
    fn on_cell_collapsed(&self, cell: usize, tile: TileId, solver: &mut Solver) {
        if self.tags.contains(tile) {
            debug!(
                "Cell {} collapsed to exclusive tile {}, removing group from open cells",
                cell, tile
            );
            solver.remove_tags_from_uncollapsed(&self.tags);
        }
    }
}

/// Instantiates the hooks declared by a catalog, preserving their order.
pub(crate) fn hooks_from_specs(specs: &[DecoratorSpec]) -> Vec<Arc<dyn SolverDecorator>> {
    specs
        .iter()
        .map(|decorator| match decorator {
            DecoratorSpec::MutuallyExclusive { tags } => {
                Arc::new(MutuallyExclusive::new(tags.clone())) as Arc<dyn SolverDecorator>
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wfc_rules::{TileCatalog, TileDef};

    fn catalog(with_spec: bool) -> Arc<TileCatalog> {
        let mut builder = TileCatalog::builder()
            .tile(TileDef::new("Floor").allow_all(["Floor", "Chest", "Altar"]))
            .tile(TileDef::new("Chest").allow_all(["Floor", "Chest", "Altar"]))
            .tile(TileDef::new("Altar").allow_all(["Floor", "Chest", "Altar"]));
        if with_spec {
            builder = builder.mutually_exclusive(["Chest", "Altar"]);
        }
        Arc::new(builder.build().unwrap())
    }

    #[test]
    fn test_hooks_from_specs() {
        let hooks = hooks_from_specs(catalog(true).decorators());
        assert_eq!(hooks.len(), 1);
        assert!(hooks_from_specs(&[]).is_empty());
    }

    #[test]
    fn test_mutually_exclusive_removes_group() {
        let catalog = catalog(false);
        let mut solver = Solver::new(Arc::clone(&catalog), (3, 1, 1), 2).unwrap();
        let group = catalog.set_of(["Chest", "Altar"]).unwrap();
        let hook = MutuallyExclusive::new(group);

        // Pretend cell 0 collapsed to Chest.
        assert!(solver.remove_tag(0, TileId(0)));
        assert!(solver.remove_tag(0, TileId(2)));
        hook.on_cell_collapsed(0, TileId(1), &mut solver);

        assert_eq!(solver.cell(0).unwrap().collapsed_tile(), Some(TileId(1)));
        assert_eq!(solver.cell(1).unwrap().collapsed_tile(), Some(TileId(0)));
        assert_eq!(solver.cell(2).unwrap().collapsed_tile(), Some(TileId(0)));
    }

    #[test]
    fn test_mutually_exclusive_ignores_other_tiles() {
        let catalog = catalog(false);
        let mut solver = Solver::new(Arc::clone(&catalog), (2, 1, 1), 2).unwrap();
        let hook = MutuallyExclusive::new(catalog.set_of(["Chest", "Altar"]).unwrap());
        hook.on_cell_collapsed(0, TileId(0), &mut solver);
        assert_eq!(solver.cell(1).unwrap().entropy(), 3);
    }

    #[test]
    fn test_catalog_spec_limits_group_to_one_cell() {
        for seed in 0..20 {
            let mut solver = Solver::new(catalog(true), (4, 4, 1), seed).unwrap();
            while !solver.is_solved() {
                solver.single_iteration();
            }
            let exclusive = solver
                .cells()
                .iter()
                .filter_map(|cell| cell.collapsed_tile())
                .filter(|&tile| tile != TileId(0))
                .count();
            assert!(exclusive <= 1, "seed {seed}: {exclusive} exclusive tiles");
        }
    }
}
