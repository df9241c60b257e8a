//! Tile catalog model for the Wave Function Collapse solver.
//!
//! Defines tile identifiers, tile sets, per-direction adjacency allow-lists,
//! border rules and the rule-file formats catalogs are loaded from.

use thiserror::Error;

pub mod catalog;
#[cfg(feature = "serde")]
pub mod formats;
#[cfg(feature = "serde")]
pub mod loader;
pub mod types;

pub use catalog::{DecoratorSpec, SymmetryViolation, TileCatalog, TileCatalogBuilder, TileDef};
#[cfg(feature = "serde")]
pub use loader::{load_from_file, load_from_str};
pub use types::{
    CatalogError, Direction, Rotation, TileId, TileModel, TileSet, BORDER_TILE_NAME,
    EMPTY_TILE_NAME,
};

/// Errors that can occur while loading a rule file.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error reading file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse rules format (e.g., RON/JSON): {0}")]
    ParseError(String),
    #[error("Invalid rule data: {0}")]
    InvalidData(String),
    #[error("Unsupported rule file format: {0}")]
    UnsupportedFormat(String),
}

impl From<CatalogError> for LoadError {
    fn from(error: CatalogError) -> Self {
        Self::InvalidData(error.to_string())
    }
}
