use crate::types::{
    CatalogError, Direction, Rotation, TileId, TileModel, TileSet, BORDER_TILE_NAME,
    EMPTY_TILE_NAME,
};
use log::debug;
use std::collections::HashMap;
use std::fmt;

/// Declarative description of a collapse hook, authored alongside the tiles.
///
/// The solver turns these into live hooks when it is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecoratorSpec {
    /// Once any of `tags` is collapsed somewhere, all tiles of `tags` are
    /// removed from every uncollapsed cell.
    MutuallyExclusive {
        /// The mutually exclusive tiles.
        tags: TileSet,
    },
}

/// One broken back-reference found by [`TileCatalog::check_adjacency_symmetry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymmetryViolation {
    /// Tile declaring the neighbor.
    pub tile: TileId,
    /// Direction the neighbor was declared in.
    pub direction: Direction,
    /// Declared neighbor that does not point back.
    pub neighbor: TileId,
}

impl fmt::Display for SymmetryViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tile {} allows {} in {} but {} does not allow it back in {}",
            self.tile,
            self.neighbor,
            self.direction,
            self.neighbor,
            self.direction.opposite()
        )
    }
}

/// The static description of every tile type a solver may place.
///
/// A catalog is read-only once built and can be shared between any number of
/// solvers.
#[derive(Debug, Clone)]
pub struct TileCatalog {
    tiles: Vec<TileModel>,
    name_to_id: HashMap<String, TileId>,
    borders: [Option<TileSet>; Direction::COUNT],
    cell_size: f32,
    decorators: Vec<DecoratorSpec>,
}

impl TileCatalog {
    /// Starts building a catalog.
    pub fn builder() -> TileCatalogBuilder {
        TileCatalogBuilder::default()
    }

    /// Number of tiles in the catalog.
    #[must_use]
    pub fn num_tiles(&self) -> usize {
        self.tiles.len()
    }

    /// Model of a tile, or `None` if the id is not part of this catalog.
    #[must_use]
    pub fn tile(&self, id: TileId) -> Option<&TileModel> {
        self.tiles.get(id.0)
    }

    /// Iterates `(id, model)` pairs in catalog order.
    pub fn tiles(&self) -> impl Iterator<Item = (TileId, &TileModel)> {
        self.tiles
            .iter()
            .enumerate()
            .map(|(index, model)| (TileId(index), model))
    }

    /// Looks a tile up by name.
    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<TileId> {
        self.name_to_id.get(name).copied()
    }

    /// Name of a tile, or `"<invalid>"` for ids outside the catalog.
    #[must_use]
    pub fn name_of(&self, id: TileId) -> &str {
        self.tile(id).map_or("<invalid>", |model| model.name.as_str())
    }

    /// The set of every tile in the catalog.
    #[must_use]
    pub fn all_tiles(&self) -> TileSet {
        TileSet::full(self.tiles.len())
    }

    /// Builds a set from tile names.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownTile` for names not in the catalog.
    pub fn set_of<'a, I: IntoIterator<Item = &'a str>>(
        &self,
        names: I,
    ) -> Result<TileSet, CatalogError> {
        let mut set = TileSet::empty(self.tiles.len());
        for name in names {
            let id = self.id_of(name).ok_or_else(|| CatalogError::UnknownTile {
                owner: "<query>".to_owned(),
                missing: name.to_owned(),
            })?;
            set.insert(id);
        }
        Ok(set)
    }

    /// Border allow-list for cells on the `direction` boundary, if one is set.
    #[must_use]
    pub fn border(&self, direction: Direction) -> Option<&TileSet> {
        self.borders[direction.index()].as_ref()
    }

    /// Edge length of one cell in world units.
    #[must_use]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Hooks declared with the catalog, in declaration order.
    #[must_use]
    pub fn decorators(&self) -> &[DecoratorSpec] {
        &self.decorators
    }

    /// The "nothing here" tile, if the catalog defines one.
    #[must_use]
    pub fn empty_tile(&self) -> Option<TileId> {
        self.id_of(EMPTY_TILE_NAME)
    }

    /// The border bookkeeping tile, if the catalog defines one.
    #[must_use]
    pub fn border_tile(&self) -> Option<TileId> {
        self.id_of(BORDER_TILE_NAME)
    }

    /// Checks that every declared adjacency is mirrored by the neighbor in the
    /// opposite direction. Returns every violation found, in catalog order.
    #[must_use]
    pub fn check_adjacency_symmetry(&self) -> Vec<SymmetryViolation> {
        let mut violations = Vec::new();
        for (id, model) in self.tiles() {
            for direction in Direction::ALL {
                for neighbor in model.neighbors(direction).iter() {
                    let mirrored = self
                        .tile(neighbor)
                        .map_or(false, |other| other.neighbors(direction.opposite()).contains(id));
                    if !mirrored {
                        violations.push(SymmetryViolation {
                            tile: id,
                            direction,
                            neighbor,
                        });
                    }
                }
            }
        }
        violations
    }
}

/// Authoring-side description of a tile, referencing neighbors by name.
#[derive(Debug, Clone, PartialEq)]
pub struct TileDef {
    name: String,
    weight: f32,
    max_count: Option<u32>,
    neighbors: [Vec<String>; Direction::COUNT],
    walk_directions: Vec<Direction>,
    prefab: Option<String>,
    rotation: Rotation,
    scale: [f32; 3],
}

impl TileDef {
    /// A tile with weight 1.0, no cap and no neighbors.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weight: 1.0,
            max_count: None,
            neighbors: Default::default(),
            walk_directions: Vec::new(),
            prefab: None,
            rotation: Rotation::default(),
            scale: [1.0, 1.0, 1.0],
        }
    }

    /// Sets the selection weight.
    pub fn weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    /// Caps the number of collapsed cells holding this tile.
    pub fn max_count(mut self, max_count: u32) -> Self {
        self.max_count = Some(max_count);
        self
    }

    /// Allows the named tiles as neighbors in `direction`.
    pub fn allow<I, S>(mut self, direction: Direction, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.neighbors[direction.index()].extend(names.into_iter().map(Into::into));
        self
    }

    /// Allows the named tiles as neighbors in every direction.
    pub fn allow_all<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        for direction in Direction::ALL {
            self.neighbors[direction.index()].extend(names.iter().cloned());
        }
        self
    }

    /// Marks the tile walkable through the given directions.
    pub fn walkable<I: IntoIterator<Item = Direction>>(mut self, directions: I) -> Self {
        self.walk_directions.extend(directions);
        self
    }

    /// Sets the prefab spawned for this tile.
    pub fn prefab(mut self, prefab: impl Into<String>) -> Self {
        self.prefab = Some(prefab.into());
        self
    }

    /// Sets the placement rotation.
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets the placement scale.
    pub fn scale(mut self, scale: [f32; 3]) -> Self {
        self.scale = scale;
        self
    }
}

/// Builder for [`TileCatalog`]. Names are resolved to ids in [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct TileCatalogBuilder {
    tiles: Vec<TileDef>,
    borders: Vec<(Direction, Vec<String>)>,
    cell_size: Option<f32>,
    mutually_exclusive: Vec<Vec<String>>,
}

impl TileCatalogBuilder {
    /// Adds a tile. Ids are handed out in insertion order.
    pub fn tile(mut self, tile: TileDef) -> Self {
        self.tiles.push(tile);
        self
    }

    /// Restricts cells on the `direction` boundary to the named tiles.
    pub fn border<I, S>(mut self, direction: Direction, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.borders
            .push((direction, names.into_iter().map(Into::into).collect()));
        self
    }

    /// Sets the world-space edge length of a cell.
    pub fn cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = Some(cell_size);
        self
    }

    /// Declares a mutually exclusive group of tiles.
    pub fn mutually_exclusive<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mutually_exclusive
            .push(names.into_iter().map(Into::into).collect());
        self
    }

    /// Resolves names and validates the catalog.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` for an empty catalog, duplicate names,
    /// invalid weights or references to undefined tiles. Asymmetric adjacency
    /// is *not* an error here; see [`TileCatalog::check_adjacency_symmetry`].
    pub fn build(self) -> Result<TileCatalog, CatalogError> {
        if self.tiles.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }
        let num_tiles = self.tiles.len();

        let mut name_to_id = HashMap::with_capacity(num_tiles);
        for (index, def) in self.tiles.iter().enumerate() {
            if !def.weight.is_finite() || def.weight < 0.0 {
                return Err(CatalogError::InvalidWeight(def.name.clone(), def.weight));
            }
            if name_to_id.insert(def.name.clone(), TileId(index)).is_some() {
                return Err(CatalogError::DuplicateTile(def.name.clone()));
            }
        }

        let resolve = |owner: &str, names: &[String]| -> Result<TileSet, CatalogError> {
            let mut set = TileSet::empty(num_tiles);
            for name in names {
                let id = name_to_id
                    .get(name)
                    .ok_or_else(|| CatalogError::UnknownTile {
                        owner: owner.to_owned(),
                        missing: name.clone(),
                    })?;
                set.insert(*id);
            }
            Ok(set)
        };

        let mut tiles = Vec::with_capacity(num_tiles);
        for def in &self.tiles {
            let mut options: [TileSet; Direction::COUNT] = Default::default();
            for direction in Direction::ALL {
                options[direction.index()] =
                    resolve(&def.name, &def.neighbors[direction.index()])?;
            }
            let mut walk_directions = def.walk_directions.clone();
            walk_directions.sort();
            walk_directions.dedup();
            tiles.push(TileModel {
                name: def.name.clone(),
                weight: def.weight,
                max_count: def.max_count,
                options,
                walk_directions,
                prefab: def.prefab.clone(),
                rotation: def.rotation,
                scale: def.scale,
            });
        }

        let mut borders: [Option<TileSet>; Direction::COUNT] = Default::default();
        for (direction, names) in &self.borders {
            let set = resolve(&format!("border {direction}"), names)?;
            let slot = &mut borders[direction.index()];
            *slot = Some(match slot.take() {
                Some(mut existing) => {
                    existing.union_with(&set);
                    existing
                }
                None => set,
            });
        }

        let mut decorators = Vec::with_capacity(self.mutually_exclusive.len());
        for group in &self.mutually_exclusive {
            decorators.push(DecoratorSpec::MutuallyExclusive {
                tags: resolve("mutually exclusive decorator", group)?,
            });
        }

        debug!(
            "Built tile catalog: {} tiles, {} border rules, {} decorators",
            num_tiles,
            borders.iter().filter(|border| border.is_some()).count(),
            decorators.len()
        );

        Ok(TileCatalog {
            tiles,
            name_to_id,
            borders,
            cell_size: self.cell_size.unwrap_or(1.0),
            decorators,
        })
    }
}
