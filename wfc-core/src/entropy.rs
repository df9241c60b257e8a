use crate::cell::Cell;
use rand::Rng;

/// Finds the cell with the fewest remaining options among cells that are not
/// collapsed.
///
/// Contradicted cells (zero options) are candidates too and always win, which
/// keeps a stuck attempt stuck until the runner restarts it. Ties are broken
/// uniformly at random among all cells sharing the minimum count.
///
/// Returns `None` if every cell is collapsed.
pub fn min_entropy_cell<R: Rng + ?Sized>(cells: &[Cell], rng: &mut R) -> Option<usize> {
    let min = cells
        .iter()
        .map(Cell::entropy)
        .filter(|&entropy| entropy != 1)
        .min()?;

    let candidates: Vec<usize> = cells
        .iter()
        .enumerate()
        .filter(|(_, cell)| cell.entropy() == min)
        .map(|(index, _)| index)
        .collect();

    match candidates.len() {
        0 => None,
        1 => Some(candidates[0]),
        len => Some(candidates[rng.gen_range(0..len)]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use wfc_rules::{TileId, TileSet};

    fn cell_with(count: usize) -> Cell {
        Cell::new(TileSet::from_ids(4, (0..count).map(TileId)))
    }

    #[test]
    fn test_picks_lowest_uncollapsed() {
        let cells = vec![cell_with(4), cell_with(1), cell_with(2), cell_with(3)];
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(min_entropy_cell(&cells, &mut rng), Some(2));
    }

    #[test]
    fn test_all_collapsed_returns_none() {
        let cells = vec![cell_with(1), cell_with(1)];
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(min_entropy_cell(&cells, &mut rng), None);
    }

    #[test]
    fn test_contradiction_is_selected_first() {
        let cells = vec![cell_with(2), cell_with(0), cell_with(3)];
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(min_entropy_cell(&cells, &mut rng), Some(1));
    }

    #[test]
    fn test_ties_cover_every_candidate() {
        let cells = vec![cell_with(2), cell_with(3), cell_with(2), cell_with(2)];
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = [false; 4];
        for _ in 0..200 {
            let index = min_entropy_cell(&cells, &mut rng).unwrap();
            seen[index] = true;
        }
        assert_eq!(seen, [true, false, true, true]);
    }
}
