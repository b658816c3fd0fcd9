use serde::Deserialize;

use super::schema::SchemaOrRef;

/// A response definition.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub schema: Option<SchemaOrRef>,
}

/// A reference or inline response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ResponseOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Response(Response),
}
