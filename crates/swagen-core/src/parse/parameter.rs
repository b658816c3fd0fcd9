use serde::Deserialize;

use super::schema::{Schema, SchemaOrRef, SchemaType, TypeSet};

/// Parameter location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    Query,
    Header,
    Path,
    Body,
    FormData,
}

/// A Swagger 2.0 parameter. Body parameters carry a `schema`; every other
/// location describes its type inline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub schema: Option<SchemaOrRef>,

    #[serde(rename = "type", default)]
    pub param_type: Option<SchemaType>,

    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub items: Option<Box<SchemaOrRef>>,

    #[serde(rename = "enum", default)]
    pub enum_values: Vec<serde_json::Value>,

    #[serde(rename = "default", default)]
    pub default_value: Option<serde_json::Value>,
}

impl Parameter {
    /// View a non-body parameter's inline type information as a schema.
    pub fn inline_schema(&self) -> SchemaOrRef {
        SchemaOrRef::Schema(Box::new(Schema {
            schema_type: self.param_type.clone().map(TypeSet::Single),
            format: self.format.clone(),
            description: self.description.clone(),
            items: self.items.clone(),
            enum_values: self.enum_values.clone(),
            default_value: self.default_value.clone(),
            ..Schema::default()
        }))
    }
}

/// A reference or inline parameter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParameterOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Parameter(Parameter),
}
