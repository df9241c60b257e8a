use crate::formats::{FormatParser, JsonFormatParser, RonFormatParser};
use crate::{LoadError, TileCatalog};
use log::info;
use std::path::Path;

/// Picks a parser from a file extension (`ron` or `json`, case-insensitive).
fn parser_for_extension(extension: &str) -> Result<Box<dyn FormatParser>, LoadError> {
    match extension.to_ascii_lowercase().as_str() {
        "ron" => Ok(Box::new(RonFormatParser::new())),
        "json" => Ok(Box::new(JsonFormatParser)),
        other => Err(LoadError::UnsupportedFormat(other.to_owned())),
    }
}

/// Loads a tile catalog from a rule file.
///
/// The format is chosen from the file extension; files without an extension
/// are read as RON.
///
/// # Errors
///
/// Returns `LoadError::Io` if the file cannot be read,
/// `LoadError::UnsupportedFormat` for unknown extensions, and parse or
/// validation errors from the format parser.
pub fn load_from_file(path: &Path) -> Result<TileCatalog, LoadError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("ron");
    let parser = parser_for_extension(extension)?;
    let content = std::fs::read_to_string(path)?;
    let catalog = parser.parse(&content)?;
    info!(
        "Loaded {} tiles from {:?} ({})",
        catalog.num_tiles(),
        path,
        parser.format_name()
    );
    Ok(catalog)
}

/// Parses a tile catalog from an in-memory string in the named format.
///
/// # Errors
///
/// Same as [`load_from_file`], minus I/O.
pub fn load_from_str(content: &str, extension: &str) -> Result<TileCatalog, LoadError> {
    parser_for_extension(extension)?.parse(content)
}
