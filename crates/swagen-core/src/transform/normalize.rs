use std::collections::BTreeSet;

use indexmap::IndexMap;
use log::{debug, warn};

use crate::error::ValidationError;
use crate::parse::operation::PathItem;
use crate::parse::schema::Schema;
use crate::parse::spec::{SwaggerSpec, Tag};

use super::name_normalizer::normalize_definition_name;

/// Repair a raw document before anything else consumes it: synthesize
/// missing tags and canonicalize definition names. The input is left untouched.
pub fn normalize(spec: &SwaggerSpec) -> Result<SwaggerSpec, ValidationError> {
    validate_version(spec)?;

    let mut normalized = spec.clone();
    if normalized.tags.is_none() {
        let tags = create_tags_by_paths(&spec.paths);
        debug!("document declares no tags, synthesized {}", tags.len());
        normalized.tags = Some(tags);
    }
    normalized.definitions = normalize_definitions(&spec.definitions);

    Ok(normalized)
}

/// Only Swagger 2.x documents are accepted.
pub fn validate_version(spec: &SwaggerSpec) -> Result<(), ValidationError> {
    match spec.swagger.as_deref() {
        Some(version) if version.starts_with("2.") || version == "2" => Ok(()),
        _ => Err(ValidationError::UnsupportedVersion(
            spec.version_marker().to_string(),
        )),
    }
}

/// One tag per distinct tag name referenced by any operation, sorted.
pub fn create_tags_by_paths(paths: &IndexMap<String, PathItem>) -> Vec<Tag> {
    let names: BTreeSet<&str> = paths
        .values()
        .flat_map(|item| item.operations.values())
        .flat_map(|op| op.tags.iter().map(String::as_str))
        .collect();

    names
        .into_iter()
        .map(|name| Tag {
            name: name.to_string(),
            description: None,
        })
        .collect()
}

/// Rename every definition key with [`normalize_definition_name`].
/// When two keys collapse into the same name the later definition wins.
pub fn normalize_definitions(definitions: &IndexMap<String, Schema>) -> IndexMap<String, Schema> {
    let mut normalized = IndexMap::with_capacity(definitions.len());
    for (name, schema) in definitions {
        let canonical = normalize_definition_name(name);
        if normalized.insert(canonical.clone(), schema.clone()).is_some() {
            warn!("definition `{name}` collides with an earlier definition named `{canonical}`, keeping the last one");
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    const DOC: &str = r#"
swagger: "2.0"
info:
  title: Zoo
  version: "1"
paths:
  /pets:
    get:
      tags: [pet, zoo]
  /keepers:
    post:
      tags: [keeper]
    get:
      tags: [zoo]
definitions:
  com.zoo.Pet:
    type: object
  keeper:
    type: object
"#;

    #[test]
    fn test_synthesizes_sorted_tags() {
        let spec = parse::from_yaml(DOC).unwrap();
        let normalized = normalize(&spec).unwrap();
        let names: Vec<&str> = normalized
            .tags
            .as_ref()
            .unwrap()
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["keeper", "pet", "zoo"]);
    }

    #[test]
    fn test_keeps_declared_tags() {
        let mut spec = parse::from_yaml(DOC).unwrap();
        spec.tags = Some(vec![Tag {
            name: "pet".to_string(),
            description: Some("Pets".to_string()),
        }]);
        let normalized = normalize(&spec).unwrap();
        assert_eq!(normalized.tags, spec.tags);
    }

    #[test]
    fn test_renames_definitions_without_touching_input() {
        let spec = parse::from_yaml(DOC).unwrap();
        let normalized = normalize(&spec).unwrap();
        let keys: Vec<&String> = normalized.definitions.keys().collect();
        assert_eq!(keys, vec!["ComZooPet", "Keeper"]);
        assert!(spec.definitions.contains_key("com.zoo.Pet"));
        assert!(spec.tags.is_none());
    }

    #[test]
    fn test_collision_last_wins() {
        let mut definitions = IndexMap::new();
        definitions.insert(
            "a.b".to_string(),
            Schema {
                title: Some("first".to_string()),
                ..Schema::default()
            },
        );
        definitions.insert(
            "AB".to_string(),
            Schema {
                title: Some("second".to_string()),
                ..Schema::default()
            },
        );
        let normalized = normalize_definitions(&definitions);
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized["AB"].title.as_deref(), Some("second"));
    }

    #[test]
    fn test_rejects_openapi_3() {
        let spec = parse::from_yaml("openapi: 3.0.0\ninfo: {title: x, version: '1'}\n").unwrap();
        let err = normalize(&spec).unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedVersion(ref v) if v == "3.0.0"));
    }

    #[test]
    fn test_rejects_missing_marker() {
        let spec = SwaggerSpec::default();
        assert!(validate_version(&spec).is_err());
    }
}
