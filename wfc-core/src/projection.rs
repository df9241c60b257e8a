use crate::solver::Solver;
#[cfg(feature = "serde")]
use serde::Serialize;
use wfc_rules::{Rotation, TileId};

/// Where and how to spawn the tile of one collapsed cell.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TilePlacement {
    /// Linear index of the cell.
    pub index: usize,
    /// Cell coordinates.
    pub coords: (usize, usize, usize),
    pub tile: TileId,
    /// Tile name from the catalog.
    pub name: String,
    pub prefab: Option<String>,
    /// World position of the cell, `coords * cell_size`.
    pub position: [f32; 3],
    pub rotation: Rotation,
    pub scale: [f32; 3],
}

impl Solver {
    /// Lists a placement for every collapsed cell in index order.
    ///
    /// Cells collapsed to the catalog's Empty tile are skipped; uncollapsed
    /// and contradicted cells produce nothing.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn placements(&self) -> Vec<TilePlacement> {
        let catalog = self.catalog();
        let size = self.size();
        let cell_size = catalog.cell_size();
        let empty = catalog.empty_tile();

        self.cells()
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| {
                let tile = cell.collapsed_tile()?;
                if Some(tile) == empty {
                    return None;
                }
                let model = catalog.tile(tile)?;
                let (x, y, z) = size.coords(index);
                Some(TilePlacement {
                    index,
                    coords: (x, y, z),
                    tile,
                    name: model.name.clone(),
                    prefab: model.prefab.clone(),
                    position: [
                        x as f32 * cell_size,
                        y as f32 * cell_size,
                        z as f32 * cell_size,
                    ],
                    rotation: model.rotation,
                    scale: model.scale,
                })
            })
            .collect()
    }
}
