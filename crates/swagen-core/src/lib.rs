pub mod assemble;
pub mod compile;
pub mod config;
pub mod error;
pub mod parse;
pub mod pipeline;
pub mod templates;
pub mod transform;

/// A generated file with path and content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}
