//! Grid geometry: linear cell indices, 3D coordinates, neighbors and borders.
//!
//! Cells are laid out X-fastest: `index = x + y * X + z * X * Y`.

use log::warn;
use std::ops::{Index, IndexMut};
use wfc_rules::Direction;

/// Dimensions of a grid in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridSize {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl GridSize {
    #[must_use]
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    /// Total number of cells, `X * Y * Z`.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.x * self.y * self.z
    }

    /// `X * Y * Z`, or `None` if it overflows `usize`.
    #[must_use]
    pub const fn checked_cell_count(&self) -> Option<usize> {
        match self.x.checked_mul(self.y) {
            Some(xy) => xy.checked_mul(self.z),
            None => None,
        }
    }

    /// True if any dimension is zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.x == 0 || self.y == 0 || self.z == 0
    }

    /// True if `index` addresses a cell of this grid.
    #[must_use]
    pub const fn contains(&self, index: usize) -> bool {
        index < self.cell_count()
    }

    /// Converts a linear index to `(x, y, z)`. The caller guarantees
    /// `self.contains(index)`.
    #[must_use]
    pub const fn coords(&self, index: usize) -> (usize, usize, usize) {
        let x = index % self.x;
        let y = (index / self.x) % self.y;
        let z = index / (self.x * self.y);
        (x, y, z)
    }

    /// Converts coordinates to a linear index, or `None` if out of bounds.
    #[must_use]
    pub const fn index(&self, x: usize, y: usize, z: usize) -> Option<usize> {
        if x < self.x && y < self.y && z < self.z {
            Some(x + y * self.x + z * self.x * self.y)
        } else {
            None
        }
    }
}

impl From<(usize, usize, usize)> for GridSize {
    fn from((x, y, z): (usize, usize, usize)) -> Self {
        Self::new(x, y, z)
    }
}

/// Returns the neighbor of `index` in `direction`, or `None` when the cell
/// sits on the grid boundary in that direction.
#[must_use]
pub fn neighbor(size: GridSize, index: usize, direction: Direction) -> Option<usize> {
    if !size.contains(index) {
        warn!(
            "Neighbor lookup for out-of-range index {} in grid {:?}",
            index, size
        );
        return None;
    }
    let (x, y, z) = size.coords(index);
    match direction {
        Direction::XPlus => (x + 1 < size.x).then(|| index + 1),
        Direction::XMinus => (x > 0).then(|| index - 1),
        Direction::YPlus => (y + 1 < size.y).then(|| index + size.x),
        Direction::YMinus => (y > 0).then(|| index - size.x),
        Direction::ZPlus => (z + 1 < size.z).then(|| index + size.x * size.y),
        Direction::ZMinus => (z > 0).then(|| index - size.x * size.y),
    }
}

/// The direction pointing back the other way.
#[must_use]
pub const fn opposite(direction: Direction) -> Direction {
    direction.opposite()
}

/// Directions in which `index` has no neighbor, in canonical order.
#[must_use]
pub fn borders(size: GridSize, index: usize) -> Vec<Direction> {
    if !size.contains(index) {
        return Vec::new();
    }
    Direction::ALL
        .into_iter()
        .filter(|&direction| neighbor(size, index, direction).is_none())
        .collect()
}

/// Neighbors that exist, as `(direction, index)` pairs in canonical order.
#[must_use]
pub fn neighbors(size: GridSize, index: usize) -> Vec<(Direction, usize)> {
    Direction::ALL
        .into_iter()
        .filter_map(|direction| neighbor(size, index, direction).map(|n| (direction, n)))
        .collect()
}

/// A dense 3D grid of values stored in one contiguous vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    size: GridSize,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Creates a grid of the given size with every cell set to `value`.
    pub fn filled(size: GridSize, value: T) -> Self {
        Self {
            size,
            data: vec![value; size.cell_count()],
        }
    }
}

impl<T> Grid<T> {
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the element at `index`, or `None` if out of bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    /// Returns the element at `index` mutably, or `None` if out of bounds.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.data.get_mut(index)
    }

    /// Returns the element at the given coordinates, or `None` if out of bounds.
    #[must_use]
    pub fn get_xyz(&self, x: usize, y: usize, z: usize) -> Option<&T> {
        self.size.index(x, y, z).and_then(|index| self.data.get(index))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }
}

impl<T> Index<usize> for Grid<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.data[index]
    }
}

impl<T> IndexMut<usize> for Grid<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.data[index]
    }
}
