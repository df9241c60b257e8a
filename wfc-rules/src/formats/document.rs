use crate::catalog::{TileCatalog, TileDef};
use crate::types::{Direction, Rotation};
use crate::LoadError;
use serde::Deserialize;
use std::collections::BTreeMap;

fn default_weight() -> f32 {
    1.0
}

fn default_cell_size() -> f32 {
    1.0
}

fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

/// Top-level structure of a rule file, shared by every text format.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleDocument {
    /// Edge length of one cell in world units.
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
    /// Tile definitions. Ids are assigned in this order.
    pub tiles: Vec<TileDocument>,
    /// Border allow-lists keyed by direction name (`"+x"`, `"-z"`, ...).
    #[serde(default)]
    pub borders: BTreeMap<String, Vec<String>>,
    /// Collapse hooks declared with the catalog.
    #[serde(default)]
    pub decorators: Vec<DecoratorDocument>,
}

/// One tile entry of a rule file.
#[derive(Debug, Clone, Deserialize)]
pub struct TileDocument {
    /// The unique identifier name for the tile used in rule definitions.
    pub name: String,
    /// The weight associated with this tile, influencing its selection probability.
    #[serde(default = "default_weight")]
    pub weight: f32,
    /// Optional cap on collapsed occurrences.
    #[serde(default)]
    pub max_count: Option<u32>,
    /// Allowed neighbor names keyed by direction name.
    #[serde(default)]
    pub neighbors: BTreeMap<String, Vec<String>>,
    /// Direction names a walker may leave this tile through.
    #[serde(default)]
    pub walk: Vec<String>,
    #[serde(default)]
    pub prefab: Option<String>,
    #[serde(default)]
    pub rotation: Rotation,
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],
}

/// A collapse hook entry of a rule file.
#[derive(Debug, Clone, Deserialize)]
pub enum DecoratorDocument {
    /// See [`crate::DecoratorSpec::MutuallyExclusive`].
    MutuallyExclusive {
        /// Names of the mutually exclusive tiles.
        tags: Vec<String>,
    },
}

impl RuleDocument {
    /// Converts the document into a validated catalog.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::InvalidData` for unknown direction names and for
    /// every catalog validation failure.
    pub fn into_catalog(self) -> Result<TileCatalog, LoadError> {
        let mut builder = TileCatalog::builder().cell_size(self.cell_size);

        for tile in self.tiles {
            let mut def = TileDef::new(tile.name)
                .weight(tile.weight)
                .rotation(tile.rotation)
                .scale(tile.scale);
            if let Some(max_count) = tile.max_count {
                def = def.max_count(max_count);
            }
            if let Some(prefab) = tile.prefab {
                def = def.prefab(prefab);
            }
            for (direction_name, names) in tile.neighbors {
                def = def.allow(Direction::from_name(&direction_name)?, names);
            }
            let walk = tile
                .walk
                .iter()
                .map(|name| Direction::from_name(name))
                .collect::<Result<Vec<_>, _>>()?;
            builder = builder.tile(def.walkable(walk));
        }

        for (direction_name, names) in self.borders {
            builder = builder.border(Direction::from_name(&direction_name)?, names);
        }

        for decorator in self.decorators {
            match decorator {
                DecoratorDocument::MutuallyExclusive { tags } => {
                    builder = builder.mutually_exclusive(tags);
                }
            }
        }

        Ok(builder.build()?)
    }
}
