use bitvec::prelude::*;
use std::fmt;
use thiserror::Error;

/// Reserved tile name marking a catalog border bookkeeping entry.
pub const BORDER_TILE_NAME: &str = "WFC.Constraints.Border";
/// Reserved tile name for the "nothing here" tile.
pub const EMPTY_TILE_NAME: &str = "WFC.Constraints.Empty";

/// Represents a unique identifier for a tile.
///
/// The wrapped value is the tile's position in its catalog, so ordering by id
/// is the catalog's declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileId(pub usize);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One of the six axis-aligned neighbor directions of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// X+ (right).
    XPlus,
    /// X- (left).
    XMinus,
    /// Y+ (forward).
    YPlus,
    /// Y- (back).
    YMinus,
    /// Z+ (up).
    ZPlus,
    /// Z- (down).
    ZMinus,
}

impl Direction {
    /// Number of directions.
    pub const COUNT: usize = 6;

    /// All directions in canonical order. Border rules and neighbor scans walk
    /// this order so results stay reproducible for a fixed seed.
    pub const ALL: [Direction; Direction::COUNT] = [
        Direction::XPlus,
        Direction::XMinus,
        Direction::YPlus,
        Direction::YMinus,
        Direction::ZPlus,
        Direction::ZMinus,
    ];

    /// The direction pointing back the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::XPlus => Self::XMinus,
            Self::XMinus => Self::XPlus,
            Self::YPlus => Self::YMinus,
            Self::YMinus => Self::YPlus,
            Self::ZPlus => Self::ZMinus,
            Self::ZMinus => Self::ZPlus,
        }
    }

    /// Position of this direction in [`Direction::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::XPlus => 0,
            Self::XMinus => 1,
            Self::YPlus => 2,
            Self::YMinus => 3,
            Self::ZPlus => 4,
            Self::ZMinus => 5,
        }
    }

    /// Short rule-file name of the direction (`"+x"`, `"-x"`, ...).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::XPlus => "+x",
            Self::XMinus => "-x",
            Self::YPlus => "+y",
            Self::YMinus => "-y",
            Self::ZPlus => "+z",
            Self::ZMinus => "-z",
        }
    }

    /// Parses a rule-file direction name. Accepts the short axis form (`"+x"`)
    /// as well as the enum spelling (`"XPlus"`).
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownDirection` for anything else.
    pub fn from_name(name: &str) -> Result<Self, CatalogError> {
        match name {
            "+x" | "XPlus" => Ok(Self::XPlus),
            "-x" | "XMinus" => Ok(Self::XMinus),
            "+y" | "YPlus" => Ok(Self::YPlus),
            "-y" | "YMinus" => Ok(Self::YMinus),
            "+z" | "ZPlus" => Ok(Self::ZPlus),
            "-z" | "ZMinus" => Ok(Self::ZMinus),
            _ => Err(CatalogError::UnknownDirection(name.to_owned())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors that can occur while building or validating a tile catalog.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// The catalog defines no tiles at all.
    #[error("Tile catalog must define at least one tile.")]
    EmptyCatalog,
    /// Two tiles share the same name.
    #[error("Duplicate tile name: {0}")]
    DuplicateTile(String),
    /// A rule references a tile name that is not defined.
    #[error("Tile {owner} references unknown tile {missing}")]
    UnknownTile {
        /// Tile (or border/decorator) holding the reference.
        owner: String,
        /// Name that could not be resolved.
        missing: String,
    },
    /// A weight was negative, NaN or infinite.
    #[error("Tile {0} has an invalid weight {1}; weights must be finite and >= 0")]
    InvalidWeight(String, f32),
    /// A direction name could not be parsed.
    #[error("Unknown direction name: {0}")]
    UnknownDirection(String),
}

/// A set of tile ids drawn from one catalog's universe.
///
/// Backed by a bit vector sized to the catalog, so iteration is always in
/// ascending id (catalog declaration) order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TileSet {
    bits: BitVec<usize, Lsb0>,
}

impl TileSet {
    /// Creates an empty set over a universe of `num_tiles` tiles.
    #[must_use]
    pub fn empty(num_tiles: usize) -> Self {
        Self {
            bits: BitVec::repeat(false, num_tiles),
        }
    }

    /// Creates a set containing every tile of a universe of `num_tiles` tiles.
    #[must_use]
    pub fn full(num_tiles: usize) -> Self {
        Self {
            bits: BitVec::repeat(true, num_tiles),
        }
    }

    /// Creates a set over `num_tiles` tiles holding the given ids.
    /// Ids outside the universe are ignored.
    #[must_use]
    pub fn from_ids<I: IntoIterator<Item = TileId>>(num_tiles: usize, ids: I) -> Self {
        let mut set = Self::empty(num_tiles);
        for id in ids {
            set.insert(id);
        }
        set
    }

    /// Size of the universe this set is drawn from.
    #[must_use]
    pub fn universe_len(&self) -> usize {
        self.bits.len()
    }

    /// Number of tiles in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.count_ones()
    }

    /// True if the set holds no tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// True if `id` is in the set.
    #[must_use]
    pub fn contains(&self, id: TileId) -> bool {
        self.bits.get(id.0).map_or(false, |bit| *bit)
    }

    /// Adds `id`. Returns `false` if it was already present or lies outside
    /// the universe.
    pub fn insert(&mut self, id: TileId) -> bool {
        if id.0 >= self.bits.len() || self.bits[id.0] {
            return false;
        }
        self.bits.set(id.0, true);
        true
    }

    /// Removes `id`. Returns `true` if it was present.
    pub fn remove(&mut self, id: TileId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.bits.set(id.0, false);
        true
    }

    /// Removes every tile.
    pub fn clear(&mut self) {
        self.bits.fill(false);
    }

    /// Adds every tile of `other`.
    pub fn union_with(&mut self, other: &Self) {
        for index in other.bits.iter_ones() {
            if index < self.bits.len() {
                self.bits.set(index, true);
            }
        }
    }

    /// Keeps only the tiles also present in `other`.
    pub fn intersect_with(&mut self, other: &Self) {
        let doomed: Vec<usize> = self
            .bits
            .iter_ones()
            .filter(|&index| !other.contains(TileId(index)))
            .collect();
        for index in doomed {
            self.bits.set(index, false);
        }
    }

    /// Removes every tile of `other`.
    pub fn subtract(&mut self, other: &Self) {
        for index in other.bits.iter_ones() {
            if index < self.bits.len() {
                self.bits.set(index, false);
            }
        }
    }

    /// True if the two sets share at least one tile.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.iter().any(|id| other.contains(id))
    }

    /// True if every tile of `self` is in `other`.
    #[must_use]
    pub fn is_subset(&self, other: &Self) -> bool {
        self.iter().all(|id| other.contains(id))
    }

    /// The lowest id in the set.
    #[must_use]
    pub fn first(&self) -> Option<TileId> {
        self.bits.first_one().map(TileId)
    }

    /// Iterates the set in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = TileId> + '_ {
        self.bits.iter_ones().map(TileId)
    }
}

/// Euler rotation applied when a tile is placed, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rotation {
    /// Rotation around the lateral axis.
    #[cfg_attr(feature = "serde", serde(default))]
    pub pitch: f32,
    /// Rotation around the vertical axis.
    #[cfg_attr(feature = "serde", serde(default))]
    pub yaw: f32,
    /// Rotation around the forward axis.
    #[cfg_attr(feature = "serde", serde(default))]
    pub roll: f32,
}

/// Describes one tile type of a catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct TileModel {
    /// Unique name of the tile.
    pub name: String,
    /// Selection weight. Higher favours the tile; 0.0 means "always pick this
    /// one if it is still possible".
    pub weight: f32,
    /// Cap on how many collapsed cells may hold this tile. `None` is unbounded.
    pub max_count: Option<u32>,
    /// Allowed neighbors per direction, indexed by [`Direction::index`].
    pub options: [TileSet; Direction::COUNT],
    /// Directions a walker standing on this tile may leave through.
    pub walk_directions: Vec<Direction>,
    /// Name of the prefab spawned for this tile, if any.
    pub prefab: Option<String>,
    /// Rotation applied to the spawned prefab.
    pub rotation: Rotation,
    /// Scale applied to the spawned prefab.
    pub scale: [f32; 3],
}

impl TileModel {
    /// Tiles allowed next to this one in `direction`.
    #[must_use]
    pub fn neighbors(&self, direction: Direction) -> &TileSet {
        &self.options[direction.index()]
    }

    /// True if a walker may leave this tile through `direction`.
    #[must_use]
    pub fn is_walkable(&self, direction: Direction) -> bool {
        self.walk_directions.contains(&direction)
    }
}
