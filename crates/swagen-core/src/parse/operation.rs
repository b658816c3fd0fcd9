use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::parameter::ParameterOrRef;
use super::response::ResponseOrRef;

/// HTTP method of a Swagger 2.0 operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
}

impl HttpMethod {
    /// Lowercase form, as used in documents and generated request calls.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
        }
    }

    pub fn as_upper(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_upper())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "put" => Ok(HttpMethod::Put),
            "post" => Ok(HttpMethod::Post),
            "delete" => Ok(HttpMethod::Delete),
            "options" => Ok(HttpMethod::Options),
            "head" => Ok(HttpMethod::Head),
            "patch" => Ok(HttpMethod::Patch),
            other => Err(format!("unknown HTTP method: {other}")),
        }
    }
}

/// An API operation.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Operation {
    #[serde(rename = "operationId", default)]
    pub operation_id: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub parameters: Vec<ParameterOrRef>,

    #[serde(default)]
    pub responses: IndexMap<String, ResponseOrRef>,

    #[serde(default)]
    pub deprecated: bool,
}

/// A path item. Operations keep the order in which their methods appear in
/// the document, so grouping and generated files follow that order.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(try_from = "IndexMap<String, serde_json::Value>")]
pub struct PathItem {
    pub parameters: Vec<ParameterOrRef>,
    pub operations: IndexMap<HttpMethod, Operation>,
}

impl TryFrom<IndexMap<String, serde_json::Value>> for PathItem {
    type Error = serde_json::Error;

    fn try_from(raw: IndexMap<String, serde_json::Value>) -> Result<Self, Self::Error> {
        let mut item = PathItem::default();
        for (key, value) in raw {
            if key == "parameters" {
                item.parameters = serde_json::from_value(value)?;
            } else if let Ok(method) = key.parse::<HttpMethod>() {
                item.operations.insert(method, serde_json::from_value(value)?);
            }
            // `$ref` path items and `x-` extensions are not supported and skipped.
        }
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_round_trip() {
        assert_eq!("GET".parse::<HttpMethod>(), Ok(HttpMethod::Get));
        assert_eq!("delete".parse::<HttpMethod>(), Ok(HttpMethod::Delete));
        assert!("trace".parse::<HttpMethod>().is_err());
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
        assert_eq!(HttpMethod::Patch.as_str(), "patch");
    }

    #[test]
    fn test_path_item_keeps_document_order() {
        let yaml = r#"
delete:
  tags: [pet]
x-internal: true
get:
  tags: [pet]
parameters:
  - name: id
    in: path
    required: true
    type: integer
"#;
        let item: PathItem = serde_yaml_ng::from_str(yaml).unwrap();
        let methods: Vec<HttpMethod> = item.operations.keys().copied().collect();
        assert_eq!(methods, vec![HttpMethod::Delete, HttpMethod::Get]);
        assert_eq!(item.parameters.len(), 1);
    }
}
