use crate::grid::neighbors;
use crate::solver::Solver;
use log::{trace, warn};
use wfc_rules::{Direction, TileSet};

impl Solver {
    /// Tiles allowed next to cell `index` in `direction`: the union of the
    /// allow-lists of every option still possible at `index`.
    #[must_use]
    pub fn valid_neighbors(&self, index: usize, direction: Direction) -> TileSet {
        let catalog = self.catalog();
        let mut allowed = TileSet::empty(catalog.num_tiles());
        let Some(cell) = self.cell(index) else {
            warn!("valid_neighbors called with out-of-range index {}", index);
            return allowed;
        };
        for option in cell.options.iter() {
            if let Some(model) = catalog.tile(option) {
                allowed.union_with(model.neighbors(direction));
            }
        }
        allowed
    }

    /// Propagates constraints outwards from `origin` until no cell changes.
    ///
    /// Uses a worklist seeded with `origin`. For each popped cell, every
    /// existing neighbor is intersected with [`Solver::valid_neighbors`] minus
    /// the tiles whose max-count is already reached. Collapsed neighbors keep
    /// their tile even if it is at its cap, since they are part of the count.
    /// A neighbor whose option count changed is pushed unless it is already
    /// queued.
    ///
    /// Cells may end up with zero options; that is left for the caller to
    /// notice through [`Solver::is_solved`].
    pub fn propagate_from(&mut self, origin: usize) {
        let size = self.size();
        if !size.contains(origin) {
            warn!("propagate_from called with out-of-range index {}", origin);
            return;
        }

        let mut queued = vec![false; size.cell_count()];
        let mut stack = vec![origin];
        queued[origin] = true;
        let mut visits = 0_usize;

        while let Some(current) = stack.pop() {
            queued[current] = false;
            visits += 1;
            let capped = self.capped_tiles();

            for (direction, neighbor_index) in neighbors(size, current) {
                let mut allowed = self.valid_neighbors(current, direction);
                let Some(neighbor) = self.cell_mut(neighbor_index) else {
                    continue;
                };
                if !neighbor.is_collapsed() {
                    allowed.subtract(&capped);
                }
                let before = neighbor.entropy();
                neighbor.options.intersect_with(&allowed);
                if neighbor.entropy() != before && !queued[neighbor_index] {
                    queued[neighbor_index] = true;
                    stack.push(neighbor_index);
                }
            }
        }
        trace!("Propagation from cell {} visited {} cells", origin, visits);
    }
}
