use proptest::prelude::*;
use std::sync::Arc;
use wfc_core::{Direction, Solver, TileCatalog, TileId};
use wfc_rules::TileDef;

/// A symmetric catalog with some structure: water only next to water or sand,
/// grass only next to sand or grass, sand next to everything. Trees sit only
/// on top of grass.
fn island_catalog() -> Arc<TileCatalog> {
    let planar = [
        Direction::XPlus,
        Direction::XMinus,
        Direction::YPlus,
        Direction::YMinus,
    ];
    let mut water = TileDef::new("Water").weight(2.0);
    let mut sand = TileDef::new("Sand");
    let mut grass = TileDef::new("Grass").weight(3.0);
    let mut tree = TileDef::new("Tree").weight(0.5);
    for direction in planar {
        water = water.allow(direction, ["Water", "Sand"]);
        sand = sand.allow(direction, ["Water", "Sand", "Grass"]);
        grass = grass.allow(direction, ["Sand", "Grass"]);
        tree = tree.allow(direction, ["Tree"]);
    }
    water = water.allow(Direction::ZPlus, ["Water"]).allow(Direction::ZMinus, ["Water"]);
    sand = sand.allow(Direction::ZPlus, ["Sand"]).allow(Direction::ZMinus, ["Sand"]);
    grass = grass
        .allow(Direction::ZPlus, ["Grass", "Tree"])
        .allow(Direction::ZMinus, ["Grass"]);
    tree = tree
        .allow(Direction::ZMinus, ["Grass", "Tree"])
        .allow(Direction::ZPlus, ["Tree"]);
    let catalog = TileCatalog::builder()
        .tile(water)
        .tile(sand)
        .tile(grass)
        .tile(tree)
        .build()
        .expect("island catalog should build");
    assert!(catalog.check_adjacency_symmetry().is_empty());
    Arc::new(catalog)
}

fn entropies(solver: &Solver) -> Vec<usize> {
    solver.cells().iter().map(|cell| cell.entropy()).collect()
}

#[test]
fn test_collapse_constrains_neighbors() {
    let mut solver = Solver::new(island_catalog(), (3, 3, 1), 4).unwrap();
    let center = solver.size().index(1, 1, 0).unwrap();
    for tile in [1, 2, 3] {
        solver.remove_tag(center, TileId(tile));
    }
    solver.propagate_from(center);

    // Water in the middle leaves water or sand in every planar neighbor.
    for index in [1, 3, 5, 7] {
        let options: Vec<TileId> = solver.tags_for_index(index).iter().collect();
        assert_eq!(options, vec![TileId(0), TileId(1)], "cell {index}");
    }
    // Diagonal cells are reached through water-or-sand cells, which still
    // allow grass but never trees.
    for index in [0, 2, 6, 8] {
        let options: Vec<TileId> = solver.tags_for_index(index).iter().collect();
        assert_eq!(options, vec![TileId(0), TileId(1), TileId(2)], "cell {index}");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_propagation_is_monotonic(seed in any::<u64>()) {
        let mut solver = Solver::new(island_catalog(), (4, 4, 2), seed).unwrap();
        let mut previous = entropies(&solver);
        while !solver.is_solved() && !solver.has_contradiction() {
            solver.single_iteration();
            let current = entropies(&solver);
            for (before, after) in previous.iter().zip(&current) {
                prop_assert!(after <= before);
            }
            previous = current;
        }
    }

    #[test]
    fn prop_collapsed_cells_stay_collapsed(seed in any::<u64>()) {
        let mut solver = Solver::new(island_catalog(), (4, 4, 2), seed).unwrap();
        let mut fixed: Vec<Option<TileId>> = vec![None; solver.cells().len()];
        while !solver.is_solved() && !solver.has_contradiction() {
            solver.single_iteration();
            for (index, cell) in solver.cells().iter().enumerate() {
                if let Some(tile) = fixed[index] {
                    // A collapsed cell keeps its tile unless propagation has
                    // emptied it, which only ever shrinks the set further.
                    prop_assert!(cell.entropy() <= 1);
                    if let Some(current) = cell.collapsed_tile() {
                        prop_assert_eq!(current, tile);
                    }
                } else if let Some(tile) = cell.collapsed_tile() {
                    fixed[index] = Some(tile);
                }
            }
        }
    }

    #[test]
    fn prop_solved_grid_respects_adjacency(seed in any::<u64>()) {
        let catalog = island_catalog();
        let mut solver = Solver::new(Arc::clone(&catalog), (4, 3, 2), seed).unwrap();
        solver.solve_fully().unwrap();
        let size = solver.size();
        for index in 0..size.cell_count() {
            let tile = solver.cell(index).unwrap().collapsed_tile().unwrap();
            let model = catalog.tile(tile).unwrap();
            for (direction, n) in wfc_core::neighbors(size, index) {
                let other = solver.cell(n).unwrap().collapsed_tile().unwrap();
                prop_assert!(model.neighbors(direction).contains(other));
            }
        }
    }
}
