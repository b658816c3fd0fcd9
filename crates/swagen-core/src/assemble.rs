use log::debug;
use minijinja::context;

use crate::compile::Fragment;
use crate::compile::declarations::{interface_declaration, typedef_declaration};
use crate::compile::doc::inline_description;
use crate::config::{Config, INTERFACE_IMPORT};
use crate::error::GenerateError;
use crate::parse::spec::SwaggerSpec;
use crate::templates;

/// Values shown in the banner at the top of every generated file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderInfo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub file_description: Option<String>,
    pub host: Option<String>,
    pub version: Option<String>,
    pub date: Option<String>,
}

impl HeaderInfo {
    /// Banner for a document, optionally scoped to one tag's file.
    pub fn from_spec(spec: &SwaggerSpec, tag: Option<&str>, date: Option<String>) -> Self {
        let non_empty = |s: &str| (!s.trim().is_empty()).then(|| inline_description(s));
        Self {
            title: non_empty(&spec.info.title),
            description: spec.info.description.as_deref().and_then(non_empty),
            file_description: tag
                .and_then(|t| spec.tag_description(t))
                .and_then(non_empty),
            host: spec.host.clone(),
            version: non_empty(&spec.info.version),
            date,
        }
    }
}

pub fn render_header(header: &HeaderInfo) -> Result<String, minijinja::Error> {
    let env = templates::environment()?;
    let tmpl = env.get_template("header.j2")?;
    tmpl.render(context! {
        title => header.title,
        description => header.description,
        file_description => header.file_description,
        host => header.host,
        version => header.version,
        date => header.date,
    })
}

/// Assemble one tag's request module from its compiled fragments.
pub fn assemble(
    tag: &str,
    fragments: &[Fragment],
    config: &Config,
    header: &HeaderInfo,
) -> Result<String, minijinja::Error> {
    debug!("assembling `{tag}` from {} fragments", fragments.len());

    let mut sections = vec![render_header(header)?];

    let mut preamble = Vec::new();
    if config.lang.is_typed() {
        let mut imports: Vec<&str> = Vec::new();
        for name in fragments.iter().flat_map(|f| f.imports.iter()) {
            if !imports.contains(&name.as_str()) {
                imports.push(name);
            }
        }
        if !imports.is_empty() {
            preamble.push(format!(
                "import {{ {} }} from \"{INTERFACE_IMPORT}\";",
                imports.join(", ")
            ));
        }
    }
    if !config.custom_import_code.is_empty() {
        preamble.push(config.custom_import_code.clone());
    }
    if !preamble.is_empty() {
        sections.push(preamble.join("\n"));
    }

    sections.extend(fragments.iter().map(Fragment::body));

    let mut out = sections.join("\n\n");
    out.push('\n');
    Ok(out)
}

/// `interface/index.ts`: one declaration per definition.
pub fn assemble_interfaces(spec: &SwaggerSpec, header: &HeaderInfo) -> Result<String, GenerateError> {
    let mut sections = vec![render_header(header)?];
    for (name, schema) in &spec.definitions {
        let decl = interface_declaration(spec, name, schema)
            .map_err(|e| GenerateError::UnresolvedDefinition(e.0))?;
        sections.push(decl);
    }
    let mut out = sections.join("\n\n");
    out.push('\n');
    Ok(out)
}

/// `typedef/index.js`: one `@typedef` block per definition.
pub fn assemble_typedefs(spec: &SwaggerSpec, header: &HeaderInfo) -> Result<String, GenerateError> {
    let mut sections = vec![render_header(header)?];
    for (name, schema) in &spec.definitions {
        let decl = typedef_declaration(spec, name, schema)
            .map_err(|e| GenerateError::UnresolvedDefinition(e.0))?;
        sections.push(decl);
    }
    // Makes the file a module so editors pick up the typedefs.
    sections.push("export {};".to_string());
    let mut out = sections.join("\n\n");
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Lang;
    use crate::parse;

    fn fragment(name: &str, imports: &[&str]) -> Fragment {
        Fragment {
            name: name.to_string(),
            code: format!("export const {name} = () => axios.request({{}});"),
            js_doc: None,
            declarations: Vec::new(),
            imports: imports.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn ts() -> Config {
        Config {
            lang: Lang::Ts,
            ..Config::default()
        }
    }

    #[test]
    fn test_header_lines() {
        let header = HeaderInfo {
            title: Some("Petstore".into()),
            file_description: Some("Everything */ about pets".into()),
            host: Some("petstore.io".into()),
            version: Some("1.0".into()),
            ..HeaderInfo::default()
        };
        let out = render_header(&header).unwrap();
        assert_eq!(
            out,
            "/* eslint-disable */\n// @ts-nocheck\n\n/**\n * generated by swagen\n * @title Petstore\n * @fileDescription Everything *\\/ about pets\n * @host petstore.io\n * @version 1.0\n **/"
        );
    }

    #[test]
    fn test_header_from_spec() {
        let spec = parse::from_yaml(
            r#"
swagger: "2.0"
info: {title: Zoo, version: "2"}
host: zoo.io
tags:
  - name: pet
    description: Pets
"#,
        )
        .unwrap();
        let header = HeaderInfo::from_spec(&spec, Some("pet"), None);
        assert_eq!(header.title.as_deref(), Some("Zoo"));
        assert_eq!(header.file_description.as_deref(), Some("Pets"));
        assert_eq!(header.host.as_deref(), Some("zoo.io"));
        assert!(header.date.is_none());
    }

    #[test]
    fn test_imports_keep_first_appearance_order() {
        let fragments = vec![
            fragment("getB", &["B", "A"]),
            fragment("getC", &["B", "C"]),
        ];
        let out = assemble("pet", &fragments, &ts(), &HeaderInfo::default()).unwrap();
        assert!(out.contains("import { B, A, C } from \"./interface\";\nimport axios from \"axios\";\n\n"));
    }

    #[test]
    fn test_js_has_no_interface_import() {
        let fragments = vec![fragment("getB", &["B"])];
        let out = assemble("pet", &fragments, &Config::default(), &HeaderInfo::default()).unwrap();
        assert!(!out.contains("./interface"));
    }

    #[test]
    fn test_custom_import_code_verbatim() {
        let config = Config {
            custom_import_code: "import axios from \"./http\";\n// keep me  \n".to_string(),
            ..ts()
        };
        let out = assemble("pet", &[fragment("a", &[])], &config, &HeaderInfo::default()).unwrap();
        assert!(out.contains(
            " **/\n\nimport axios from \"./http\";\n// keep me  \n\n\nexport const a ="
        ));
    }

    #[test]
    fn test_fragments_separated_by_blank_line() {
        let fragments = vec![fragment("a", &[]), fragment("b", &[])];
        let config = Config {
            custom_import_code: String::new(),
            ..ts()
        };
        let out = assemble("pet", &fragments, &config, &HeaderInfo::default()).unwrap();
        assert!(out.ends_with(
            " **/\n\nexport const a = () => axios.request({});\n\nexport const b = () => axios.request({});\n"
        ));
    }

    #[test]
    fn test_assemble_interfaces() {
        let spec = parse::from_yaml(
            r##"
swagger: "2.0"
definitions:
  Pet:
    type: object
    properties:
      tags:
        type: object
        additionalProperties:
          type: string
  Status:
    type: string
    enum: [a, b]
"##,
        )
        .unwrap();
        let out = assemble_interfaces(&spec, &HeaderInfo::default()).unwrap();
        assert!(out.contains("export interface Pet {\n  tags?: Record<string, string>;\n}"));
        assert!(out.contains("export type Status = \"a\" | \"b\";"));

        let out = assemble_typedefs(&spec, &HeaderInfo::default()).unwrap();
        assert!(out.contains(" * @typedef {Object} Pet\n"));
        assert!(out.ends_with("export {};\n"));
    }

    #[test]
    fn test_unresolved_definition() {
        let spec = parse::from_yaml(
            r##"
swagger: "2.0"
definitions:
  Pet:
    type: object
    properties:
      owner:
        $ref: "#/definitions/Owner"
"##,
        )
        .unwrap();
        let err = assemble_interfaces(&spec, &HeaderInfo::default()).unwrap_err();
        assert!(matches!(err, GenerateError::UnresolvedDefinition(r) if r == "#/definitions/Owner"));
    }
}
