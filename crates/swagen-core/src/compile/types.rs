use crate::parse::schema::{AdditionalProperties, Schema, SchemaOrRef, SchemaType, TypeSet};
use crate::parse::spec::SwaggerSpec;
use crate::transform::name_normalizer::{property_key, string_literal};

/// A resolved type, independent of the target language.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    String,
    StringLiteral(String),
    Number,
    Boolean,
    Null,
    File,
    Any,
    Void,
    Array(Box<TypeExpr>),
    Map(Box<TypeExpr>),
    Object(Vec<Field>),
    /// A normalized definition name.
    Ref(String),
    Union(Vec<TypeExpr>),
    Intersection(Vec<TypeExpr>),
}

/// A named member of an inline object or argument group.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: TypeExpr,
    pub required: bool,
    pub description: Option<String>,
}

/// A `$ref` that does not point at an existing definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedRef(pub String);

/// Convert a schema (or reference) into a [`TypeExpr`]. References are not
/// followed, only checked against the document's definitions.
pub fn resolve_type(spec: &SwaggerSpec, schema: &SchemaOrRef) -> Result<TypeExpr, UnresolvedRef> {
    match schema {
        SchemaOrRef::Ref { ref_path } => match spec.resolve_definition(ref_path) {
            Some((name, _)) => Ok(TypeExpr::Ref(name)),
            None => Err(UnresolvedRef(ref_path.clone())),
        },
        SchemaOrRef::Schema(schema) => resolve_schema(spec, schema),
    }
}

pub fn resolve_schema(spec: &SwaggerSpec, schema: &Schema) -> Result<TypeExpr, UnresolvedRef> {
    if !schema.all_of.is_empty() {
        let mut parts = schema
            .all_of
            .iter()
            .map(|s| resolve_type(spec, s))
            .collect::<Result<Vec<_>, _>>()?;
        if !schema.properties.is_empty() {
            parts.push(resolve_object(spec, schema)?);
        }
        if parts.len() == 1 {
            return Ok(parts.remove(0));
        }
        return Ok(TypeExpr::Intersection(parts));
    }

    if !schema.enum_values.is_empty() {
        let literals: Vec<TypeExpr> = schema
            .enum_values
            .iter()
            .filter_map(|v| v.as_str().map(|s| TypeExpr::StringLiteral(s.to_string())))
            .collect();
        return Ok(match literals.len() {
            0 => scalar_type(schema.schema_type.as_ref()),
            1 => literals.into_iter().next().unwrap_or(TypeExpr::String),
            _ => TypeExpr::Union(literals),
        });
    }

    match &schema.schema_type {
        Some(TypeSet::Single(SchemaType::Array)) => {
            let items = match &schema.items {
                Some(items) => resolve_type(spec, items)?,
                None => TypeExpr::Any,
            };
            Ok(TypeExpr::Array(Box::new(items)))
        }
        Some(TypeSet::Single(SchemaType::Object)) => resolve_object(spec, schema),
        Some(TypeSet::Multiple(types)) => {
            let variants: Vec<TypeExpr> = types.iter().map(single_type).collect();
            Ok(match variants.len() {
                1 => variants.into_iter().next().unwrap_or(TypeExpr::Any),
                _ => TypeExpr::Union(variants),
            })
        }
        Some(TypeSet::Single(other)) => Ok(single_type(other)),
        None if !schema.properties.is_empty() || schema.additional_properties.is_some() => {
            resolve_object(spec, schema)
        }
        None => match &schema.items {
            Some(items) => Ok(TypeExpr::Array(Box::new(resolve_type(spec, items)?))),
            None => Ok(TypeExpr::Any),
        },
    }
}

fn scalar_type(types: Option<&TypeSet>) -> TypeExpr {
    match types {
        Some(TypeSet::Single(t)) => single_type(t),
        _ => TypeExpr::Any,
    }
}

fn single_type(t: &SchemaType) -> TypeExpr {
    match t {
        SchemaType::String => TypeExpr::String,
        SchemaType::Number | SchemaType::Integer => TypeExpr::Number,
        SchemaType::Boolean => TypeExpr::Boolean,
        SchemaType::File => TypeExpr::File,
        SchemaType::Null => TypeExpr::Null,
        SchemaType::Array => TypeExpr::Array(Box::new(TypeExpr::Any)),
        SchemaType::Object => TypeExpr::Map(Box::new(TypeExpr::Any)),
    }
}

fn resolve_object(spec: &SwaggerSpec, schema: &Schema) -> Result<TypeExpr, UnresolvedRef> {
    if schema.properties.is_empty() {
        return Ok(match &schema.additional_properties {
            Some(AdditionalProperties::Schema(s)) => TypeExpr::Map(Box::new(resolve_type(spec, s)?)),
            _ => TypeExpr::Map(Box::new(TypeExpr::Any)),
        });
    }
    object_fields(spec, schema).map(TypeExpr::Object)
}

/// The properties of an object schema as fields.
pub fn object_fields(spec: &SwaggerSpec, schema: &Schema) -> Result<Vec<Field>, UnresolvedRef> {
    schema
        .properties
        .iter()
        .map(|(name, prop)| {
            let description = match prop {
                SchemaOrRef::Schema(s) => s.description.clone(),
                SchemaOrRef::Ref { .. } => None,
            };
            Ok(Field {
                name: name.clone(),
                ty: resolve_type(spec, prop)?,
                required: schema.required.contains(name),
                description,
            })
        })
        .collect()
}

impl TypeExpr {
    /// Append every referenced definition name, keeping first-appearance
    /// order and skipping names already present.
    pub fn collect_refs(&self, out: &mut Vec<String>) {
        match self {
            TypeExpr::Ref(name) => push_unique(out, name),
            TypeExpr::Array(inner) | TypeExpr::Map(inner) => inner.collect_refs(out),
            TypeExpr::Union(variants) | TypeExpr::Intersection(variants) => {
                for v in variants {
                    v.collect_refs(out);
                }
            }
            TypeExpr::Object(fields) => {
                for f in fields {
                    f.ty.collect_refs(out);
                }
            }
            _ => {}
        }
    }

    /// Render as a TypeScript type.
    pub fn to_ts(&self) -> String {
        match self {
            TypeExpr::String => "string".to_string(),
            TypeExpr::StringLiteral(s) => string_literal(s),
            TypeExpr::Number => "number".to_string(),
            TypeExpr::Boolean => "boolean".to_string(),
            TypeExpr::Null => "null".to_string(),
            TypeExpr::File => "File".to_string(),
            TypeExpr::Any => "any".to_string(),
            TypeExpr::Void => "void".to_string(),
            TypeExpr::Ref(name) => name.clone(),
            TypeExpr::Array(inner) => {
                let inner_ts = inner.to_ts();
                if inner_ts.contains('|') || inner_ts.contains('&') {
                    format!("({inner_ts})[]")
                } else {
                    format!("{inner_ts}[]")
                }
            }
            TypeExpr::Map(value) => format!("Record<string, {}>", value.to_ts()),
            TypeExpr::Object(fields) => {
                if fields.is_empty() {
                    return "Record<string, any>".to_string();
                }
                let field_strs: Vec<String> = fields
                    .iter()
                    .map(|f| {
                        let optional = if f.required { "" } else { "?" };
                        format!("{}{optional}: {}", property_key(&f.name), f.ty.to_ts())
                    })
                    .collect();
                format!("{{ {} }}", field_strs.join("; "))
            }
            TypeExpr::Union(variants) => {
                let strs: Vec<String> = variants.iter().map(TypeExpr::to_ts).collect();
                strs.join(" | ")
            }
            TypeExpr::Intersection(parts) => {
                let strs: Vec<String> = parts.iter().map(TypeExpr::to_ts).collect();
                strs.join(" & ")
            }
        }
    }

    /// Render as a JSDoc type expression.
    pub fn to_jsdoc(&self) -> String {
        match self {
            TypeExpr::String => "string".to_string(),
            TypeExpr::StringLiteral(s) => string_literal(s),
            TypeExpr::Number => "number".to_string(),
            TypeExpr::Boolean => "boolean".to_string(),
            TypeExpr::Null => "null".to_string(),
            TypeExpr::File => "File".to_string(),
            TypeExpr::Any => "*".to_string(),
            TypeExpr::Void => "void".to_string(),
            TypeExpr::Ref(name) => name.clone(),
            TypeExpr::Array(inner) => format!("Array<{}>", inner.to_jsdoc()),
            TypeExpr::Map(value) => format!("Object<string, {}>", value.to_jsdoc()),
            TypeExpr::Object(_) | TypeExpr::Intersection(_) => "Object".to_string(),
            TypeExpr::Union(variants) => {
                let strs: Vec<String> = variants.iter().map(TypeExpr::to_jsdoc).collect();
                format!("({})", strs.join("|"))
            }
        }
    }
}

/// Push `name` unless it is already present.
pub fn push_unique(out: &mut Vec<String>, name: &str) {
    if !out.iter().any(|n| n == name) {
        out.push(name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn spec() -> SwaggerSpec {
        parse::from_yaml(
            r##"
swagger: "2.0"
definitions:
  Pet:
    type: object
  Tag:
    type: object
"##,
        )
        .unwrap()
    }

    fn schema(json: &str) -> SchemaOrRef {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_primitives() {
        let spec = spec();
        assert_eq!(
            resolve_type(&spec, &schema(r#"{"type": "integer", "format": "int64"}"#)),
            Ok(TypeExpr::Number)
        );
        assert_eq!(
            resolve_type(&spec, &schema(r#"{"type": "file"}"#)),
            Ok(TypeExpr::File)
        );
        assert_eq!(resolve_type(&spec, &schema("{}")), Ok(TypeExpr::Any));
    }

    #[test]
    fn test_array_of_refs() {
        let spec = spec();
        let ty = resolve_type(
            &spec,
            &schema(r##"{"type": "array", "items": {"$ref": "#/definitions/Pet"}}"##),
        )
        .unwrap();
        assert_eq!(ty.to_ts(), "Pet[]");
        assert_eq!(ty.to_jsdoc(), "Array<Pet>");
    }

    #[test]
    fn test_unresolved_ref() {
        let spec = spec();
        let err = resolve_type(&spec, &schema(r##"{"$ref": "#/definitions/Nope"}"##)).unwrap_err();
        assert_eq!(err, UnresolvedRef("#/definitions/Nope".to_string()));
    }

    #[test]
    fn test_string_enum_union() {
        let spec = spec();
        let ty = resolve_type(&spec, &schema(r#"{"type": "string", "enum": ["a", "b"]}"#)).unwrap();
        assert_eq!(ty.to_ts(), "\"a\" | \"b\"");
        assert_eq!(ty.to_jsdoc(), "(\"a\"|\"b\")");
    }

    #[test]
    fn test_enum_literals_escaped() {
        let spec = spec();
        let ty = resolve_type(
            &spec,
            &schema(r#"{"type": "string", "enum": ["say \"hi\"", "a\\b"]}"#),
        )
        .unwrap();
        assert_eq!(ty.to_ts(), r#""say \"hi\"" | "a\\b""#);
        assert_eq!(ty.to_jsdoc(), r#"("say \"hi\""|"a\\b")"#);
    }

    #[test]
    fn test_inline_object() {
        let spec = spec();
        let ty = resolve_type(
            &spec,
            &schema(
                r##"{"type": "object", "required": ["id"], "properties": {
                    "id": {"type": "integer"},
                    "x-trace": {"type": "string"},
                    "owner": {"$ref": "#/definitions/Tag"}
                }}"##,
            ),
        )
        .unwrap();
        assert_eq!(ty.to_ts(), "{ id: number; \"x-trace\"?: string; owner?: Tag }");
        let mut refs = Vec::new();
        ty.collect_refs(&mut refs);
        assert_eq!(refs, vec!["Tag"]);
    }

    #[test]
    fn test_map() {
        let spec = spec();
        let ty = resolve_type(
            &spec,
            &schema(r#"{"type": "object", "additionalProperties": {"type": "integer"}}"#),
        )
        .unwrap();
        assert_eq!(ty.to_ts(), "Record<string, number>");
        assert_eq!(ty.to_jsdoc(), "Object<string, number>");
    }

    #[test]
    fn test_collect_refs_first_appearance() {
        let ty = TypeExpr::Union(vec![
            TypeExpr::Ref("B".to_string()),
            TypeExpr::Array(Box::new(TypeExpr::Ref("A".to_string()))),
            TypeExpr::Ref("B".to_string()),
            TypeExpr::Ref("C".to_string()),
        ]);
        let mut refs = Vec::new();
        ty.collect_refs(&mut refs);
        assert_eq!(refs, vec!["B", "A", "C"]);
    }
}
