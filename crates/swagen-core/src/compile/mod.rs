pub mod declarations;
pub mod doc;
pub mod params;
pub mod types;

use minijinja::context;

use crate::config::{Config, Lang};
use crate::error::CompileError;
use crate::parse::operation::{HttpMethod, Operation};
use crate::parse::response::ResponseOrRef;
use crate::parse::schema::ref_name;
use crate::parse::spec::SwaggerSpec;
use crate::templates;
use crate::transform::name_normalizer::function_name;

use doc::{doc_block, inline_description, summary_lines};
use params::{ArgGroup, ArgKind, RequestArgs};
use types::{TypeExpr, resolve_type};

/// The compiled form of a single operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub name: String,
    pub code: String,
    /// Type documentation for untyped targets.
    pub js_doc: Option<String>,
    /// Inline `interface` or `@typedef` declarations the function relies on.
    pub declarations: Vec<String>,
    /// Referenced definition names, first appearance first.
    pub imports: Vec<String>,
}

impl Fragment {
    /// The fragment as it appears in an assembled module: declarations first,
    /// then the function with its doc block directly above it.
    pub fn body(&self) -> String {
        let function = match &self.js_doc {
            Some(doc) => format!("{doc}\n{}", self.code),
            None => self.code.clone(),
        };
        if self.declarations.is_empty() {
            return function;
        }
        format!("{}\n\n{function}", self.declarations.join("\n\n"))
    }

    /// The same fragment exported under another name.
    pub fn renamed(self, name: &str) -> Self {
        let code = self.code.replacen(
            &format!("export const {} =", self.name),
            &format!("export const {name} ="),
            1,
        );
        Self {
            name: name.to_string(),
            code,
            ..self
        }
    }
}

/// Location of the operation being compiled, used for error context.
#[derive(Debug, Clone, Copy)]
pub struct Site<'a> {
    pub url: &'a str,
    pub method: HttpMethod,
}

impl Site<'_> {
    fn not_found(&self) -> CompileError {
        CompileError::OperationNotFound {
            url: self.url.to_string(),
            method: self.method,
        }
    }

    pub(crate) fn unresolved(&self, reference: &str) -> CompileError {
        CompileError::UnresolvedRef {
            url: self.url.to_string(),
            method: self.method,
            reference: reference.to_string(),
        }
    }

    pub(crate) fn malformed(&self, name: &str, reason: &str) -> CompileError {
        CompileError::MalformedParameter {
            url: self.url.to_string(),
            method: self.method,
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    fn render_failed(&self, source: minijinja::Error) -> CompileError {
        CompileError::Render {
            url: self.url.to_string(),
            method: self.method,
            source,
        }
    }
}

/// Compile one operation of a normalized document into a request function.
pub fn compile_operation(
    config: &Config,
    spec: &SwaggerSpec,
    url: &str,
    method: HttpMethod,
) -> Result<Fragment, CompileError> {
    let site = Site { url, method };
    let item = spec.paths.get(url).ok_or_else(|| site.not_found())?;
    let op = item.operations.get(&method).ok_or_else(|| site.not_found())?;

    let params = params::collect_parameters(spec, item, op, &site)?;
    let args = params::build_args(spec, &params, &site)?;
    let response = response_type(spec, op, &site)?;

    let mut imports = Vec::new();
    for group in &args.groups {
        group.ty.collect_refs(&mut imports);
    }
    response.collect_refs(&mut imports);

    let declarations = declarations::inline_declarations(config, spec, &imports)
        .map_err(|e| site.unresolved(&e.0))?;

    let name = function_name(method, url);
    let url_expr = params::url_expression(url, &args);
    let options = request_options(&args);
    let summary = if config.js_doc {
        summary_lines(op.summary.as_deref(), op.description.as_deref(), op.deprecated)
    } else {
        Vec::new()
    };

    let env = templates::environment().map_err(|e| site.render_failed(e))?;
    let (code, js_doc) = match config.lang {
        Lang::Ts => {
            let doc = (!summary.is_empty()).then(|| doc_block(&summary));
            let code = env
                .get_template("request.ts.j2")
                .and_then(|tmpl| {
                    tmpl.render(context! {
                        doc => doc,
                        name => name,
                        signature => ts_signature(&args),
                        return_type => response.to_ts(),
                        url => url_expr,
                        method => method.as_str(),
                        options => options,
                    })
                })
                .map_err(|e| site.render_failed(e))?;
            (code, None)
        }
        Lang::Js => {
            let code = env
                .get_template("request.js.j2")
                .and_then(|tmpl| {
                    tmpl.render(context! {
                        name => name,
                        signature => js_signature(&args),
                        url => url_expr,
                        method => method.as_str(),
                        options => options,
                    })
                })
                .map_err(|e| site.render_failed(e))?;
            let mut lines = summary;
            lines.extend(param_doc_lines(&args));
            lines.push(format!("@return {{Promise<{}>}}", response.to_jsdoc()));
            (code, Some(doc_block(&lines)))
        }
    };

    Ok(Fragment {
        name,
        code,
        js_doc,
        declarations,
        imports: if config.lang.is_typed() {
            imports
        } else {
            Vec::new()
        },
    })
}

/// Type of the first successful response with a schema, `200` preferred.
fn response_type(spec: &SwaggerSpec, op: &Operation, site: &Site<'_>) -> Result<TypeExpr, CompileError> {
    let success = op.responses.get("200").or_else(|| {
        op.responses
            .iter()
            .find(|(status, _)| status.starts_with('2'))
            .map(|(_, response)| response)
    });

    let response = match success {
        None => return Ok(TypeExpr::Void),
        Some(ResponseOrRef::Response(response)) => response,
        Some(ResponseOrRef::Ref { ref_path }) => spec
            .responses
            .get(ref_name(ref_path))
            .ok_or_else(|| site.unresolved(ref_path))?,
    };

    match &response.schema {
        Some(schema) => resolve_type(spec, schema).map_err(|e| site.unresolved(&e.0)),
        None => Ok(TypeExpr::Void),
    }
}

fn ts_signature(args: &RequestArgs) -> String {
    args.groups
        .iter()
        .map(|g| {
            let optional = if g.required { "" } else { "?" };
            format!("{}{optional}: {}", g.kind.arg_name(), g.ty.to_ts())
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn js_signature(args: &RequestArgs) -> String {
    args.groups
        .iter()
        .map(|g| g.kind.arg_name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Extra properties of the request config object, after `url` and `method`.
fn request_options(args: &RequestArgs) -> Vec<String> {
    let mut options = Vec::new();
    if args.has(ArgKind::Query) {
        options.push("params".to_string());
    }
    if args.has(ArgKind::Body) {
        options.push("data: body".to_string());
    }
    match (args.form_data, args.has(ArgKind::Header)) {
        (true, true) => options.push(
            "headers: { \"Content-Type\": \"multipart/form-data\", ...headers }".to_string(),
        ),
        (true, false) => {
            options.push("headers: { \"Content-Type\": \"multipart/form-data\" }".to_string())
        }
        (false, true) => options.push("headers".to_string()),
        (false, false) => {}
    }
    options
}

/// `@param` lines describing every argument and, for object arguments, each member.
fn param_doc_lines(args: &RequestArgs) -> Vec<String> {
    let mut lines = Vec::new();
    for group in &args.groups {
        lines.push(param_line(group));
        let arg = group.kind.arg_name();
        for field in group.fields() {
            let path = format!("{arg}.{}", field.name);
            let key = if field.required { path } else { format!("[{path}]") };
            let mut line = format!("@param {{{}}} {key}", field.ty.to_jsdoc());
            if let Some(description) = &field.description {
                line.push_str(&format!(" - {}", inline_description(description)));
            }
            lines.push(line);
        }
    }
    lines
}

fn param_line(group: &ArgGroup) -> String {
    let arg = group.kind.arg_name();
    let key = if group.required {
        arg.to_string()
    } else {
        format!("[{arg}]")
    };
    let mut line = format!("@param {{{}}} {key}", group.ty.to_jsdoc());
    if let Some(description) = &group.description {
        line.push_str(&format!(" - {description}"));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use crate::transform::normalize;

    const DOC: &str = r##"
swagger: "2.0"
info: {title: Petstore, version: "1.0"}
paths:
  /pets:
    get:
      tags: [pet]
      summary: List pets
      parameters:
        - name: limit
          in: query
          type: integer
          description: How many items to return
      responses:
        "200":
          description: ok
          schema:
            type: array
            items:
              $ref: "#/definitions/pet.Pet"
  /pets/{id}:
    delete:
      tags: [pet]
      deprecated: true
      parameters:
        - name: id
          in: path
          required: true
          type: integer
      responses:
        "204":
          description: deleted
    put:
      tags: [pet]
      parameters:
        - name: id
          in: path
          required: true
          type: integer
        - name: body
          in: body
          required: true
          schema:
            $ref: "#/definitions/Missing"
definitions:
  pet.Pet:
    type: object
    properties:
      id:
        type: integer
"##;

    fn spec() -> SwaggerSpec {
        normalize(&parse::from_yaml(DOC).unwrap()).unwrap()
    }

    fn ts() -> Config {
        Config {
            lang: Lang::Ts,
            ..Config::default()
        }
    }

    #[test]
    fn test_ts_fragment() {
        let fragment = compile_operation(&ts(), &spec(), "/pets", HttpMethod::Get).unwrap();
        assert_eq!(fragment.name, "getPets");
        assert_eq!(fragment.imports, vec!["PetPet"]);
        assert!(fragment.js_doc.is_none());
        assert_eq!(
            fragment.code,
            r#"/**
 * List pets
 **/
export const getPets = (params?: { limit?: number }) =>
  axios.request<PetPet[]>({
    url: "/pets",
    method: "get",
    params,
  });"#
        );
    }

    #[test]
    fn test_ts_path_params() {
        let fragment = compile_operation(&ts(), &spec(), "/pets/{id}", HttpMethod::Delete).unwrap();
        assert_eq!(fragment.name, "deletePetsId");
        assert!(fragment.imports.is_empty());
        assert!(fragment.code.contains("@deprecated"));
        assert!(fragment.code.contains("(pathParams: { id: number }) =>"));
        assert!(fragment.code.contains("axios.request<void>"));
        assert!(fragment.code.contains("url: `/pets/${pathParams.id}`,"));
    }

    #[test]
    fn test_js_fragment_carries_type_docs() {
        let config = Config::default();
        let fragment = compile_operation(&config, &spec(), "/pets", HttpMethod::Get).unwrap();
        assert!(fragment.imports.is_empty());
        assert_eq!(
            fragment.js_doc.as_deref(),
            Some(
                r#"/**
 * List pets
 * @param {Object} [params]
 * @param {number} [params.limit] - How many items to return
 * @return {Promise<Array<PetPet>>}
 **/"#
            )
        );
        assert!(fragment.code.starts_with("export const getPets = (params) =>"));
        assert!(!fragment.code.contains("<PetPet"));
        assert!(fragment.body().starts_with("/**\n * List pets"));
    }

    #[test]
    fn test_js_doc_disabled_keeps_types() {
        let config = Config {
            js_doc: false,
            ..Config::default()
        };
        let fragment = compile_operation(&config, &spec(), "/pets", HttpMethod::Get).unwrap();
        let doc = fragment.js_doc.unwrap();
        assert!(!doc.contains("List pets"));
        assert!(doc.contains("@return {Promise<Array<PetPet>>}"));
    }

    #[test]
    fn test_unresolved_ref_fails() {
        let err = compile_operation(&ts(), &spec(), "/pets/{id}", HttpMethod::Put).unwrap_err();
        match err {
            CompileError::UnresolvedRef {
                url,
                method,
                reference,
            } => {
                assert_eq!(url, "/pets/{id}");
                assert_eq!(method, HttpMethod::Put);
                assert_eq!(reference, "#/definitions/Missing");
            }
            other => panic!("expected unresolved ref, got {other}"),
        }
    }

    #[test]
    fn test_missing_operation() {
        let err = compile_operation(&ts(), &spec(), "/pets", HttpMethod::Patch).unwrap_err();
        assert!(matches!(err, CompileError::OperationNotFound { .. }));
    }

    #[test]
    fn test_inline_interfaces() {
        let config = Config {
            lang: Lang::Ts,
            interface: true,
            ..Config::default()
        };
        let fragment = compile_operation(&config, &spec(), "/pets", HttpMethod::Get).unwrap();
        assert!(fragment.code.starts_with("/**\n * List pets"));
        assert!(
            fragment
                .body()
                .starts_with("export interface PetPet {\n  id?: number;\n}\n\n/**\n * List pets")
        );
    }

    #[test]
    fn test_inline_typedefs_precede_function_doc() {
        let config = Config {
            typedef: true,
            ..Config::default()
        };
        let fragment = compile_operation(&config, &spec(), "/pets", HttpMethod::Get).unwrap();
        assert_eq!(fragment.declarations.len(), 1);
        assert!(fragment.declarations[0].contains("@typedef {Object} PetPet"));

        let body = fragment.body();
        assert!(body.starts_with("/**\n * @typedef {Object} PetPet\n"));
        let doc = fragment.js_doc.as_deref().unwrap();
        assert!(body.ends_with(&format!("{doc}\n{}", fragment.code)));
        assert!(body.contains(" * @return {Promise<Array<PetPet>>}\n **/\nexport const getPets ="));
    }

    #[test]
    fn test_renamed() {
        let fragment = compile_operation(&ts(), &spec(), "/pets", HttpMethod::Get).unwrap();
        let renamed = fragment.renamed("getPets2");
        assert_eq!(renamed.name, "getPets2");
        assert!(renamed.code.contains("export const getPets2 = (params?"));
        assert!(!renamed.code.contains("export const getPets ="));
    }

    #[test]
    fn test_compile_is_pure() {
        let spec = spec();
        let a = compile_operation(&ts(), &spec, "/pets", HttpMethod::Get).unwrap();
        let b = compile_operation(&ts(), &spec, "/pets", HttpMethod::Get).unwrap();
        assert_eq!(a, b);
    }
}
