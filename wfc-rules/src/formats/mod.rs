//! Module defining parsers for different rule file formats.

// Export the core parser trait
pub mod parser;
pub use parser::FormatParser;

// Shared document schema both text formats deserialize into
pub mod document;
pub use document::RuleDocument;

// Format-specific implementations
pub mod json_format;
pub mod ron_format;
pub use json_format::JsonFormatParser;
pub use ron_format::RonFormatParser;
