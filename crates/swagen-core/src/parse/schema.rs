use indexmap::IndexMap;
use serde::Deserialize;

/// A JSON Schema type keyword value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    File,
    Null,
}

/// The `type` field. Swagger 2.0 only allows a single type, but some
/// generators emit arrays anyway.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(SchemaType),
    Multiple(Vec<SchemaType>),
}

/// A reference or inline schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Schema(Box<Schema>),
}

/// A Swagger 2.0 schema object.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Schema {
    #[serde(rename = "type", default)]
    pub schema_type: Option<TypeSet>,

    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(rename = "default", default)]
    pub default_value: Option<serde_json::Value>,

    #[serde(default)]
    pub properties: IndexMap<String, SchemaOrRef>,

    #[serde(default)]
    pub required: Vec<String>,

    #[serde(rename = "additionalProperties", default)]
    pub additional_properties: Option<AdditionalProperties>,

    #[serde(default)]
    pub items: Option<Box<SchemaOrRef>>,

    #[serde(rename = "allOf", default)]
    pub all_of: Vec<SchemaOrRef>,

    #[serde(rename = "enum", default)]
    pub enum_values: Vec<serde_json::Value>,

    #[serde(default)]
    pub example: Option<serde_json::Value>,

    #[serde(rename = "readOnly", default)]
    pub read_only: bool,
}

/// `additionalProperties` can be a boolean or a schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<SchemaOrRef>),
}

/// Last segment of a local reference: `#/definitions/Pet` → `Pet`.
pub fn ref_name(ref_path: &str) -> &str {
    ref_path.rsplit('/').next().unwrap_or(ref_path)
}
