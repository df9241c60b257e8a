use crate::formats::{FormatParser, RuleDocument};
use crate::{LoadError, TileCatalog};

/// A parser implementation for JSON rule files. Uses the same document
/// schema as the RON format.
#[derive(Default)]
pub struct JsonFormatParser;

impl FormatParser for JsonFormatParser {
    fn format_name(&self) -> &'static str {
        "JSON"
    }

    fn parse(&self, content: &str) -> Result<TileCatalog, LoadError> {
        let document: RuleDocument = serde_json::from_str(content)
            .map_err(|e| LoadError::ParseError(format!("JSON deserialization failed: {e}")))?;
        document.into_catalog()
    }
}
