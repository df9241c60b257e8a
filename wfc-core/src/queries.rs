use crate::grid::neighbors;
use crate::solver::Solver;
use log::warn;
use wfc_rules::{Direction, TileId, TileSet};

impl Solver {
    /// Indices of cells that still have `tag` as an option.
    #[must_use]
    pub fn cells_with_tag(&self, tag: TileId) -> Vec<usize> {
        self.indices_where(|options| options.contains(tag))
    }

    /// Indices of cells holding at least one of `tags`.
    #[must_use]
    pub fn cells_with_any_tag(&self, tags: &TileSet) -> Vec<usize> {
        self.indices_where(|options| options.intersects(tags))
    }

    /// Indices of cells holding every one of `tags`.
    #[must_use]
    pub fn cells_with_all_tags(&self, tags: &TileSet) -> Vec<usize> {
        self.indices_where(|options| tags.is_subset(options))
    }

    fn indices_where<P: Fn(&TileSet) -> bool>(&self, predicate: P) -> Vec<usize> {
        self.cells()
            .iter()
            .enumerate()
            .filter(|(_, cell)| predicate(&cell.options))
            .map(|(index, _)| index)
            .collect()
    }

    /// Number of collapsed cells whose single option is `tag`.
    #[must_use]
    pub fn count_cells_with_tag(&self, tag: TileId) -> usize {
        self.cells()
            .iter()
            .filter(|cell| cell.collapsed_tile() == Some(tag))
            .count()
    }

    /// True if the cell at `index` holds exactly one option. Out-of-range
    /// indices are reported as not collapsed.
    #[must_use]
    pub fn is_cell_collapsed(&self, index: usize) -> bool {
        self.cell(index).is_some_and(|cell| cell.is_collapsed())
    }

    /// Copy of the options of the cell at `index`, or an empty set if the
    /// index is out of range.
    #[must_use]
    pub fn tags_for_index(&self, index: usize) -> TileSet {
        self.cell(index).map_or_else(
            || {
                warn!("tags_for_index called with out-of-range index {}", index);
                TileSet::empty(self.catalog().num_tiles())
            },
            |cell| cell.options.clone(),
        )
    }

    /// Squared distance between two cells in the XY plane, in cells. The Z
    /// coordinate is ignored.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn cell_horizontal_distance_squared(&self, a: usize, b: usize) -> f32 {
        let size = self.size();
        if !size.contains(a) || !size.contains(b) {
            warn!(
                "cell_horizontal_distance_squared called with out-of-range index ({}, {})",
                a, b
            );
            return -1.0;
        }
        let (ax, ay, _) = size.coords(a);
        let (bx, by, _) = size.coords(b);
        let dx = ax.abs_diff(bx);
        let dy = ay.abs_diff(by);
        (dx * dx + dy * dy) as f32
    }

    /// Collapsed neighbors of `index`, in canonical direction order.
    #[must_use]
    pub fn collapsed_neighbors(&self, index: usize) -> Vec<(Direction, usize)> {
        neighbors(self.size(), index)
            .into_iter()
            .filter(|&(_, neighbor)| self.is_cell_collapsed(neighbor))
            .collect()
    }

    /// Collapsed neighbors a walker standing on the collapsed cell `index`
    /// can step to, following the walk directions of that cell's tile.
    ///
    /// Returns nothing for uncollapsed cells.
    #[must_use]
    pub fn walkable_neighbors(&self, index: usize) -> Vec<usize> {
        let Some(tile) = self.cell(index).and_then(|cell| cell.collapsed_tile()) else {
            return Vec::new();
        };
        let Some(model) = self.catalog().tile(tile) else {
            return Vec::new();
        };
        self.collapsed_neighbors(index)
            .into_iter()
            .filter(|&(direction, _)| model.is_walkable(direction))
            .map(|(_, neighbor)| neighbor)
            .collect()
    }

    /// Removes `tag` from the cell at `index` without propagating.
    ///
    /// Returns true if the cell still has options afterwards, false if it is
    /// now contradicted or `index` is out of range.
    pub fn remove_tag(&mut self, index: usize, tag: TileId) -> bool {
        let Some(cell) = self.cell_mut(index) else {
            warn!("remove_tag called with out-of-range index {}", index);
            return false;
        };
        cell.options.remove(tag);
        !cell.options.is_empty()
    }

    /// Removes `tag` from every cell with more than one option, propagating
    /// from each changed cell. Returns true if any cell changed.
    pub fn remove_tag_from_uncollapsed_cells(&mut self, tag: TileId) -> bool {
        let tags = TileSet::from_ids(self.catalog().num_tiles(), [tag]);
        self.remove_tags_from_uncollapsed(&tags)
    }

    /// Removes all of `tags` from every cell with more than one option that
    /// holds any of them, propagating from each changed cell. Returns true if
    /// any cell changed.
    pub fn remove_tags_from_uncollapsed(&mut self, tags: &TileSet) -> bool {
        let mut changed = false;
        for index in 0..self.cells().len() {
            let Some(cell) = self.cell_mut(index) else {
                continue;
            };
            if cell.entropy() > 1 && cell.options.intersects(tags) {
                cell.options.subtract(tags);
                changed = true;
                self.propagate_from(index);
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use crate::solver::Solver;
    use std::sync::Arc;
    use wfc_rules::{Direction, TileCatalog, TileDef, TileId, TileSet};

    fn catalog() -> Arc<TileCatalog> {
        Arc::new(
            TileCatalog::builder()
                .tile(
                    TileDef::new("Path")
                        .allow_all(["Path", "Rock", "Tree"])
                        .walkable([Direction::XPlus, Direction::XMinus]),
                )
                .tile(TileDef::new("Rock").allow_all(["Path", "Rock", "Tree"]))
                .tile(TileDef::new("Tree").allow_all(["Path", "Rock", "Tree"]))
                .build()
                .unwrap(),
        )
    }

    fn collapse_to(solver: &mut Solver, index: usize, tile: TileId) {
        for other in 0..3 {
            if other != tile.0 {
                solver.remove_tag(index, TileId(other));
            }
        }
    }

    #[test]
    fn test_tag_filters() {
        let mut solver = Solver::new(catalog(), (3, 1, 1), 0).unwrap();
        solver.remove_tag(0, TileId(2));
        collapse_to(&mut solver, 1, TileId(2));

        assert_eq!(solver.cells_with_tag(TileId(2)), vec![1, 2]);
        let path_or_tree = TileSet::from_ids(3, [TileId(0), TileId(2)]);
        assert_eq!(solver.cells_with_any_tag(&path_or_tree), vec![0, 1, 2]);
        assert_eq!(solver.cells_with_all_tags(&path_or_tree), vec![2]);
        assert_eq!(solver.count_cells_with_tag(TileId(2)), 1);
        assert_eq!(solver.count_cells_with_tag(TileId(0)), 0);
    }

    #[test]
    fn test_tags_for_index() {
        let mut solver = Solver::new(catalog(), (2, 1, 1), 0).unwrap();
        solver.remove_tag(1, TileId(1));
        let tags = solver.tags_for_index(1);
        assert_eq!(tags.iter().collect::<Vec<_>>(), vec![TileId(0), TileId(2)]);
        assert!(solver.tags_for_index(5).is_empty());
    }

    #[test]
    fn test_horizontal_distance_ignores_z() {
        let solver = Solver::new(catalog(), (4, 4, 2), 0).unwrap();
        let a = solver.size().index(0, 0, 0).unwrap();
        let b = solver.size().index(3, 2, 1).unwrap();
        assert!((solver.cell_horizontal_distance_squared(a, b) - 13.0).abs() < f32::EPSILON);
        assert!(solver.cell_horizontal_distance_squared(b, b).abs() < f32::EPSILON);
    }

    #[test]
    fn test_remove_tag_reports_contradiction() {
        let mut solver = Solver::new(catalog(), (1, 1, 1), 0).unwrap();
        assert!(solver.remove_tag(0, TileId(0)));
        assert!(solver.remove_tag(0, TileId(1)));
        assert!(!solver.remove_tag(0, TileId(2)));
        assert!(!solver.remove_tag(1, TileId(0)));
    }

    #[test]
    fn test_remove_from_uncollapsed_skips_collapsed() {
        let mut solver = Solver::new(catalog(), (3, 1, 1), 0).unwrap();
        collapse_to(&mut solver, 0, TileId(1));
        assert!(solver.remove_tag_from_uncollapsed_cells(TileId(1)));
        assert_eq!(solver.cell(0).unwrap().collapsed_tile(), Some(TileId(1)));
        assert!(!solver.cell(1).unwrap().options.contains(TileId(1)));
        assert!(!solver.cell(2).unwrap().options.contains(TileId(1)));
        assert!(!solver.remove_tag_from_uncollapsed_cells(TileId(1)));
    }

    #[test]
    fn test_walkable_neighbors_follow_walk_directions() {
        let mut solver = Solver::new(catalog(), (3, 2, 1), 0).unwrap();
        // Row 0: Path Path Rock, cell 4 (above the middle) is Path.
        collapse_to(&mut solver, 0, TileId(0));
        collapse_to(&mut solver, 1, TileId(0));
        collapse_to(&mut solver, 2, TileId(1));
        collapse_to(&mut solver, 4, TileId(0));

        assert_eq!(
            solver.collapsed_neighbors(1),
            vec![(Direction::XPlus, 2), (Direction::XMinus, 0), (Direction::YPlus, 4)]
        );
        // Path walks along X only, so cell 4 is not reachable from cell 1.
        assert_eq!(solver.walkable_neighbors(1), vec![2, 0]);
        // Rock is not walkable at all.
        assert!(solver.walkable_neighbors(2).is_empty());
        // Uncollapsed cells have no walkable neighbors.
        assert!(solver.walkable_neighbors(3).is_empty());
        assert!(solver.is_cell_collapsed(4));
        assert!(!solver.is_cell_collapsed(5));
    }
}
