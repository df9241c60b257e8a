use wfc_rules::{TileId, TileSet};

/// The still-possible tiles of one grid position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Remaining options. Shrinks monotonically within one solve attempt.
    pub options: TileSet,
}

impl Cell {
    #[must_use]
    pub const fn new(options: TileSet) -> Self {
        Self { options }
    }

    /// Number of remaining options.
    #[must_use]
    pub fn entropy(&self) -> usize {
        self.options.len()
    }

    /// Exactly one option left.
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.entropy() == 1
    }

    /// No option left.
    #[must_use]
    pub fn is_contradicted(&self) -> bool {
        self.options.is_empty()
    }

    /// The tile of a collapsed cell.
    #[must_use]
    pub fn collapsed_tile(&self) -> Option<TileId> {
        if self.is_collapsed() {
            self.options.first()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_states() {
        let open = Cell::new(TileSet::full(3));
        assert_eq!(open.entropy(), 3);
        assert!(!open.is_collapsed());
        assert_eq!(open.collapsed_tile(), None);

        let collapsed = Cell::new(TileSet::from_ids(3, [TileId(2)]));
        assert!(collapsed.is_collapsed());
        assert_eq!(collapsed.collapsed_tile(), Some(TileId(2)));

        let contradicted = Cell::new(TileSet::empty(3));
        assert!(contradicted.is_contradicted());
        assert!(!contradicted.is_collapsed());
    }
}
