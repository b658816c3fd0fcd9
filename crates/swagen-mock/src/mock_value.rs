use serde_json::{Map, Value, json};
use swagen_core::parse::schema::{AdditionalProperties, Schema, SchemaOrRef, SchemaType, TypeSet};
use swagen_core::parse::spec::SwaggerSpec;

/// A `$ref` with no matching definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedRef(pub String);

/// Builds sample JSON values from schemas.
///
/// Definitions currently being expanded are tracked so that self-referencing
/// models terminate: a reference back into the stack becomes `null`.
pub struct MockValueBuilder<'a> {
    spec: &'a SwaggerSpec,
    stack: Vec<String>,
}

impl<'a> MockValueBuilder<'a> {
    pub fn new(spec: &'a SwaggerSpec) -> Self {
        Self {
            spec,
            stack: Vec::new(),
        }
    }

    pub fn value_for(&mut self, schema: &SchemaOrRef) -> Result<Value, UnresolvedRef> {
        match schema {
            SchemaOrRef::Ref { ref_path } => {
                let (name, target) = self
                    .spec
                    .resolve_definition(ref_path)
                    .ok_or_else(|| UnresolvedRef(ref_path.clone()))?;
                if self.stack.contains(&name) {
                    return Ok(Value::Null);
                }
                self.stack.push(name);
                let value = self.schema_value(target);
                self.stack.pop();
                value
            }
            SchemaOrRef::Schema(schema) => self.schema_value(schema),
        }
    }

    pub fn schema_value(&mut self, schema: &Schema) -> Result<Value, UnresolvedRef> {
        if let Some(example) = &schema.example {
            return Ok(example.clone());
        }
        if let Some(first) = schema.enum_values.first() {
            return Ok(first.clone());
        }
        if !schema.all_of.is_empty() {
            return self.merged_value(schema);
        }

        match &schema.schema_type {
            Some(TypeSet::Single(t)) => self.typed_value(t, schema),
            // The first listed type decides the sample.
            Some(TypeSet::Multiple(types)) => match types.first() {
                Some(t) => self.typed_value(t, schema),
                None => Ok(Value::Null),
            },
            None if !schema.properties.is_empty() || schema.additional_properties.is_some() => {
                self.object_value(schema)
            }
            None if schema.items.is_some() => self.array_value(schema),
            None => Ok(Value::Null),
        }
    }

    fn typed_value(&mut self, t: &SchemaType, schema: &Schema) -> Result<Value, UnresolvedRef> {
        Ok(match t {
            SchemaType::String => string_value(schema.format.as_deref()),
            SchemaType::Integer | SchemaType::Number => json!(0),
            SchemaType::Boolean => Value::Bool(true),
            SchemaType::File => Value::String("file".to_string()),
            SchemaType::Null => Value::Null,
            SchemaType::Array => return self.array_value(schema),
            SchemaType::Object => return self.object_value(schema),
        })
    }

    fn array_value(&mut self, schema: &Schema) -> Result<Value, UnresolvedRef> {
        match &schema.items {
            Some(items) => Ok(Value::Array(vec![self.value_for(items)?])),
            None => Ok(Value::Array(Vec::new())),
        }
    }

    fn object_value(&mut self, schema: &Schema) -> Result<Value, UnresolvedRef> {
        let mut map = Map::new();
        for (name, prop) in &schema.properties {
            map.insert(name.clone(), self.value_for(prop)?);
        }
        if map.is_empty()
            && let Some(AdditionalProperties::Schema(extra)) = &schema.additional_properties
        {
            map.insert("key".to_string(), self.value_for(extra)?);
        }
        Ok(Value::Object(map))
    }

    /// `allOf` parts are expanded in order; object members are merged, later
    /// parts overriding earlier ones.
    fn merged_value(&mut self, schema: &Schema) -> Result<Value, UnresolvedRef> {
        let mut map = Map::new();
        for part in &schema.all_of {
            if let Value::Object(members) = self.value_for(part)? {
                map.extend(members);
            }
        }
        if let Value::Object(own) = self.object_value(schema)? {
            map.extend(own);
        }
        Ok(Value::Object(map))
    }
}

fn string_value(format: Option<&str>) -> Value {
    let sample = match format {
        Some("date-time") => "2020-01-01T00:00:00.000Z",
        Some("date") => "2020-01-01",
        Some("uuid") => "00000000-0000-0000-0000-000000000000",
        Some("email") => "user@example.com",
        _ => "string",
    };
    Value::String(sample.to_string())
}
