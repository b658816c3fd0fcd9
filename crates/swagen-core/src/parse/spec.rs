use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use super::operation::{HttpMethod, Operation, PathItem};
use super::parameter::Parameter;
use super::response::Response;
use super::schema::{Schema, ref_name};
use crate::transform::name_normalizer::normalize_definition_name;

/// Info object describing the API.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub version: String,
}

/// Tag definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Top-level Swagger 2.0 document.
///
/// The version marker is kept optional so that OpenAPI 3 documents still
/// deserialize and can be rejected with a proper validation error.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SwaggerSpec {
    #[serde(default, deserialize_with = "deserialize_version")]
    pub swagger: Option<String>,

    #[serde(default, deserialize_with = "deserialize_version")]
    pub openapi: Option<String>,

    #[serde(default)]
    pub info: Info,

    #[serde(default)]
    pub host: Option<String>,

    #[serde(rename = "basePath", default)]
    pub base_path: Option<String>,

    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,

    #[serde(default)]
    pub definitions: IndexMap<String, Schema>,

    #[serde(default)]
    pub parameters: IndexMap<String, Parameter>,

    #[serde(default)]
    pub responses: IndexMap<String, Response>,

    #[serde(default)]
    pub tags: Option<Vec<Tag>>,
}

/// Accept `swagger: 2.0` written as a YAML number as well as a string.
fn deserialize_version<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

impl SwaggerSpec {
    /// The version string used in diagnostics.
    pub fn version_marker(&self) -> &str {
        self.swagger
            .as_deref()
            .or(self.openapi.as_deref())
            .unwrap_or("<missing>")
    }

    /// Look up an operation by url and method.
    pub fn operation(&self, url: &str, method: HttpMethod) -> Option<&Operation> {
        self.paths.get(url)?.operations.get(&method)
    }

    /// Resolve a `#/definitions/...` reference. The referenced name is
    /// canonicalized first, so it matches normalized definition keys.
    pub fn resolve_definition(&self, ref_path: &str) -> Option<(String, &Schema)> {
        let name = normalize_definition_name(ref_name(ref_path));
        let schema = self.definitions.get(&name)?;
        Some((name, schema))
    }

    /// Description of a declared tag, if any.
    pub fn tag_description(&self, tag: &str) -> Option<&str> {
        self.tags
            .as_ref()?
            .iter()
            .find(|t| t.name == tag)?
            .description
            .as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_version_marker() {
        let spec: SwaggerSpec = serde_yaml_ng::from_str("swagger: 2.0\n").unwrap();
        assert_eq!(spec.swagger.as_deref(), Some("2.0"));
        assert_eq!(spec.version_marker(), "2.0");
    }

    #[test]
    fn test_resolve_definition_normalizes_ref() {
        let yaml = r##"
swagger: "2.0"
definitions:
  ComZooPet:
    type: object
"##;
        let spec: SwaggerSpec = serde_yaml_ng::from_str(yaml).unwrap();
        let (name, _) = spec
            .resolve_definition("#/definitions/com.zoo.Pet")
            .expect("should resolve dotted ref");
        assert_eq!(name, "ComZooPet");
        assert!(spec.resolve_definition("#/definitions/Missing").is_none());
    }
}
