use std::collections::VecDeque;

use crate::config::{Config, Lang};
use crate::parse::schema::{AdditionalProperties, Schema};
use crate::parse::spec::SwaggerSpec;
use crate::transform::name_normalizer::property_key;

use super::doc::{doc_block, inline_description};
use super::types::{UnresolvedRef, object_fields, push_unique, resolve_schema, resolve_type};

/// Render a definition as a TypeScript declaration. Object schemas become
/// interfaces; everything else becomes a type alias.
pub fn interface_declaration(
    spec: &SwaggerSpec,
    name: &str,
    schema: &Schema,
) -> Result<String, UnresolvedRef> {
    let mut out = String::new();
    if let Some(description) = schema.description.as_deref() {
        out.push_str(&format!("/** {} */\n", inline_description(description)));
    }

    if schema.properties.is_empty() || !schema.all_of.is_empty() {
        let ty = resolve_schema(spec, schema)?;
        out.push_str(&format!("export type {name} = {};", ty.to_ts()));
        return Ok(out);
    }

    out.push_str(&format!("export interface {name} {{\n"));
    for field in object_fields(spec, schema)? {
        if let Some(description) = field.description.as_deref() {
            out.push_str(&format!("  /** {} */\n", inline_description(description)));
        }
        let optional = if field.required { "" } else { "?" };
        out.push_str(&format!(
            "  {}{optional}: {};\n",
            property_key(&field.name),
            field.ty.to_ts()
        ));
    }
    match &schema.additional_properties {
        Some(AdditionalProperties::Schema(extra)) => {
            let ty = resolve_type(spec, extra)?;
            out.push_str(&format!("  [key: string]: {};\n", ty.to_ts()));
        }
        Some(AdditionalProperties::Bool(true)) => out.push_str("  [key: string]: any;\n"),
        _ => {}
    }
    out.push('}');
    Ok(out)
}

/// Render a definition as a JSDoc `@typedef` block.
pub fn typedef_declaration(
    spec: &SwaggerSpec,
    name: &str,
    schema: &Schema,
) -> Result<String, UnresolvedRef> {
    let mut lines = Vec::new();
    if let Some(description) = schema.description.as_deref() {
        lines.push(inline_description(description));
    }

    if schema.properties.is_empty() || !schema.all_of.is_empty() {
        let ty = resolve_schema(spec, schema)?;
        lines.push(format!("@typedef {{{}}} {name}", ty.to_jsdoc()));
        return Ok(doc_block(&lines));
    }

    lines.push(format!("@typedef {{Object}} {name}"));
    for field in object_fields(spec, schema)? {
        let key = if field.required {
            field.name.clone()
        } else {
            format!("[{}]", field.name)
        };
        let mut line = format!("@property {{{}}} {key}", field.ty.to_jsdoc());
        if let Some(description) = field.description.as_deref() {
            line.push_str(&format!(" - {}", inline_description(description)));
        }
        lines.push(line);
    }
    Ok(doc_block(&lines))
}

/// The given definitions plus every definition they reference, transitively.
/// Roots keep their order; dependencies follow in discovery order.
pub fn dependency_closure(spec: &SwaggerSpec, roots: &[String]) -> Result<Vec<String>, UnresolvedRef> {
    let mut names: Vec<String> = Vec::new();
    let mut queue: VecDeque<String> = roots.iter().cloned().collect();

    while let Some(name) = queue.pop_front() {
        if names.contains(&name) {
            continue;
        }
        let schema = spec
            .definitions
            .get(&name)
            .ok_or_else(|| UnresolvedRef(name.clone()))?;
        let mut refs = Vec::new();
        resolve_schema(spec, schema)?.collect_refs(&mut refs);
        queue.extend(refs);
        push_unique(&mut names, &name);
    }

    Ok(names)
}

/// Declarations to inline ahead of a single compiled operation, honoring the
/// `interface`/`typedef`/`recursive` switches.
pub fn inline_declarations(
    config: &Config,
    spec: &SwaggerSpec,
    referenced: &[String],
) -> Result<Vec<String>, UnresolvedRef> {
    let wanted = match config.lang {
        Lang::Ts => config.interface,
        Lang::Js => config.typedef,
    };
    if !wanted || referenced.is_empty() {
        return Ok(Vec::new());
    }

    let names = if config.recursive {
        dependency_closure(spec, referenced)?
    } else {
        referenced.to_vec()
    };

    names
        .iter()
        .map(|name| {
            let schema = spec
                .definitions
                .get(name)
                .ok_or_else(|| UnresolvedRef(name.clone()))?;
            match config.lang {
                Lang::Ts => interface_declaration(spec, name, schema),
                Lang::Js => typedef_declaration(spec, name, schema),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    const DOC: &str = r##"
swagger: "2.0"
definitions:
  Pet:
    type: object
    description: A pet.
    required: [id]
    properties:
      id:
        type: integer
        description: Unique id
      category:
        $ref: "#/definitions/Category"
  Category:
    type: object
    properties:
      parent:
        $ref: "#/definitions/Category"
      label:
        $ref: "#/definitions/Label"
  Label:
    type: string
    enum: [red, blue]
"##;

    #[test]
    fn test_interface_declaration() {
        let spec = parse::from_yaml(DOC).unwrap();
        let decl = interface_declaration(&spec, "Pet", &spec.definitions["Pet"]).unwrap();
        assert_eq!(
            decl,
            "/** A pet. */\nexport interface Pet {\n  /** Unique id */\n  id: number;\n  category?: Category;\n}"
        );
    }

    #[test]
    fn test_enum_becomes_alias() {
        let spec = parse::from_yaml(DOC).unwrap();
        let decl = interface_declaration(&spec, "Label", &spec.definitions["Label"]).unwrap();
        assert_eq!(decl, "export type Label = \"red\" | \"blue\";");
    }

    #[test]
    fn test_typedef_declaration() {
        let spec = parse::from_yaml(DOC).unwrap();
        let decl = typedef_declaration(&spec, "Pet", &spec.definitions["Pet"]).unwrap();
        assert!(decl.contains(" * @typedef {Object} Pet\n"));
        assert!(decl.contains(" * @property {number} id - Unique id\n"));
        assert!(decl.contains(" * @property {Category} [category]\n"));
    }

    #[test]
    fn test_dependency_closure_handles_cycles() {
        let spec = parse::from_yaml(DOC).unwrap();
        let names = dependency_closure(&spec, &["Pet".to_string()]).unwrap();
        assert_eq!(names, vec!["Pet", "Category", "Label"]);
    }

    #[test]
    fn test_inline_declarations_respect_switches() {
        let spec = parse::from_yaml(DOC).unwrap();
        let roots = vec!["Pet".to_string()];

        let config = Config {
            lang: Lang::Ts,
            ..Config::default()
        };
        assert!(inline_declarations(&config, &spec, &roots).unwrap().is_empty());

        let config = Config {
            lang: Lang::Ts,
            interface: true,
            ..Config::default()
        };
        assert_eq!(inline_declarations(&config, &spec, &roots).unwrap().len(), 1);

        let config = Config {
            lang: Lang::Ts,
            interface: true,
            recursive: true,
            ..Config::default()
        };
        assert_eq!(inline_declarations(&config, &spec, &roots).unwrap().len(), 3);
    }
}
