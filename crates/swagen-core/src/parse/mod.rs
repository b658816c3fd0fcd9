pub mod operation;
pub mod parameter;
pub mod response;
pub mod schema;
pub mod spec;

use std::path::Path;

use crate::error::ParseError;
use spec::SwaggerSpec;

/// Parse a Swagger document from YAML.
pub fn from_yaml(input: &str) -> Result<SwaggerSpec, ParseError> {
    let spec: SwaggerSpec = serde_yaml_ng::from_str(input)?;
    Ok(spec)
}

/// Parse a Swagger document from JSON.
pub fn from_json(input: &str) -> Result<SwaggerSpec, ParseError> {
    let spec: SwaggerSpec = serde_json::from_str(input)?;
    Ok(spec)
}

/// Parse document content, picking the format from the file extension.
/// Anything that is not `.json` is read as YAML.
pub fn from_str_with_path(input: &str, path: &Path) -> Result<SwaggerSpec, ParseError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => from_json(input),
        _ => from_yaml(input),
    }
}
