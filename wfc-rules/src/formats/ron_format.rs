use crate::formats::{FormatParser, RuleDocument};
use crate::{LoadError, TileCatalog};
use log::debug;

/// A parser implementation for RON (Rusty Object Notation) format rules.
pub struct RonFormatParser;

impl Default for RonFormatParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RonFormatParser {
    /// Creates a new RON format parser
    pub fn new() -> Self {
        Self
    }
}

impl FormatParser for RonFormatParser {
    fn format_name(&self) -> &'static str {
        "Rusty Object Notation (RON)"
    }

    fn parse(&self, ron_content: &str) -> Result<TileCatalog, LoadError> {
        let document: RuleDocument = ron::from_str(ron_content)
            .map_err(|e| LoadError::ParseError(format!("RON deserialization failed: {e}")))?;
        debug!("Parsed RON rule document with {} tiles", document.tiles.len());
        document.into_catalog()
    }
}

/// Parses a tile catalog from a RON string.
pub fn parse_ron_rules(ron_content: &str) -> Result<TileCatalog, LoadError> {
    RonFormatParser::new().parse(ron_content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Direction, TileId};

    const FLOOR_AND_WALL: &str = r#"
        (
            cell_size: 50.0,
            tiles: [
                (
                    name: "Floor",
                    weight: 2.0,
                    neighbors: {
                        "+x": ["Floor"], "-x": ["Floor"],
                        "+y": ["Floor"], "-y": ["Floor"],
                    },
                    walk: ["+x", "-x"],
                    prefab: Some("/Game/Floor"),
                    rotation: (yaw: 90.0),
                ),
                ( name: "Wall", max_count: Some(3) ),
            ],
            borders: { "-z": ["Floor"] },
            decorators: [ MutuallyExclusive(tags: ["Wall"]) ],
        )
    "#;

    #[test]
    fn test_parse_full_document() {
        let catalog = parse_ron_rules(FLOOR_AND_WALL).expect("valid RON should parse");
        assert_eq!(catalog.num_tiles(), 2);
        assert_eq!(catalog.cell_size(), 50.0);

        let floor = catalog.tile(TileId(0)).unwrap();
        assert_eq!(floor.weight, 2.0);
        assert!(floor.neighbors(Direction::XPlus).contains(TileId(0)));
        assert!(floor.neighbors(Direction::ZPlus).is_empty());
        assert!(floor.is_walkable(Direction::XMinus));
        assert_eq!(floor.prefab.as_deref(), Some("/Game/Floor"));
        assert_eq!(floor.rotation.yaw, 90.0);
        assert_eq!(floor.scale, [1.0, 1.0, 1.0]);

        let wall = catalog.tile(TileId(1)).unwrap();
        assert_eq!(wall.weight, 1.0, "weight defaults to 1.0");
        assert_eq!(wall.max_count, Some(3));

        assert!(catalog.border(Direction::ZMinus).unwrap().contains(TileId(0)));
        assert_eq!(catalog.decorators().len(), 1);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let result = parse_ron_rules("( tiles: [ ( weight: 1.0 ) ] )");
        match result {
            Err(LoadError::ParseError(msg)) => assert!(msg.contains("RON deserialization failed")),
            other => panic!("Expected ParseError, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_direction_is_invalid_data() {
        let result = parse_ron_rules(
            r#"( tiles: [ ( name: "A", neighbors: { "sideways": ["A"] } ) ] )"#,
        );
        match result {
            Err(LoadError::InvalidData(msg)) => {
                assert!(msg.contains("Unknown direction name: sideways"))
            }
            other => panic!("Expected InvalidData, got {other:?}"),
        }
    }
}
