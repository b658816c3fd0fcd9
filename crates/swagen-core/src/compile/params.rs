use crate::parse::operation::{Operation, PathItem};
use crate::parse::parameter::{Parameter, ParameterLocation, ParameterOrRef};
use crate::parse::schema::ref_name;
use crate::parse::spec::SwaggerSpec;
use crate::transform::name_normalizer::property_key;

use super::Site;
use super::doc::inline_description;
use super::types::{Field, TypeExpr, resolve_type};
use crate::error::CompileError;

/// Which argument of the generated function a parameter feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Query,
    Path,
    Body,
    Header,
}

impl ArgKind {
    pub fn arg_name(&self) -> &'static str {
        match self {
            ArgKind::Query => "params",
            ArgKind::Path => "pathParams",
            ArgKind::Body => "body",
            ArgKind::Header => "headers",
        }
    }
}

/// One argument of a generated request function.
#[derive(Debug, Clone)]
pub struct ArgGroup {
    pub kind: ArgKind,
    pub ty: TypeExpr,
    pub required: bool,
    pub description: Option<String>,
}

impl ArgGroup {
    /// Members documented individually, for object-shaped arguments.
    pub fn fields(&self) -> &[Field] {
        match &self.ty {
            TypeExpr::Object(fields) => fields,
            _ => &[],
        }
    }
}

/// Arguments of a generated request function, in signature order.
#[derive(Debug, Clone, Default)]
pub struct RequestArgs {
    pub groups: Vec<ArgGroup>,
    /// The body is sent as `multipart/form-data`.
    pub form_data: bool,
}

impl RequestArgs {
    pub fn has(&self, kind: ArgKind) -> bool {
        self.groups.iter().any(|g| g.kind == kind)
    }

    pub fn path_fields(&self) -> &[Field] {
        self.groups
            .iter()
            .find(|g| g.kind == ArgKind::Path)
            .map(ArgGroup::fields)
            .unwrap_or(&[])
    }
}

/// Path-level parameters followed by operation-level ones. An operation
/// parameter replaces a path-level one with the same name and location.
pub fn collect_parameters(
    spec: &SwaggerSpec,
    item: &PathItem,
    op: &Operation,
    site: &Site<'_>,
) -> Result<Vec<Parameter>, CompileError> {
    let mut params: Vec<Parameter> = Vec::new();

    for p in item.parameters.iter().chain(op.parameters.iter()) {
        let param = resolve_parameter(spec, p, site)?;
        match params
            .iter_mut()
            .find(|existing| existing.name == param.name && existing.location == param.location)
        {
            Some(existing) => *existing = param,
            None => params.push(param),
        }
    }

    Ok(params)
}

fn resolve_parameter(
    spec: &SwaggerSpec,
    param: &ParameterOrRef,
    site: &Site<'_>,
) -> Result<Parameter, CompileError> {
    match param {
        ParameterOrRef::Parameter(p) => Ok(p.clone()),
        ParameterOrRef::Ref { ref_path } => spec
            .parameters
            .get(ref_name(ref_path))
            .cloned()
            .ok_or_else(|| site.unresolved(ref_path)),
    }
}

/// Partition parameters into argument groups.
///
/// Required arguments come before optional ones so typed signatures stay
/// valid; within each half the order is query, path, body, headers.
pub fn build_args(
    spec: &SwaggerSpec,
    params: &[Parameter],
    site: &Site<'_>,
) -> Result<RequestArgs, CompileError> {
    let mut query = Vec::new();
    let mut path = Vec::new();
    let mut header = Vec::new();
    let mut form = Vec::new();
    let mut body: Option<ArgGroup> = None;

    for param in params {
        if param.location == ParameterLocation::Body {
            if body.is_some() {
                return Err(site.malformed(&param.name, "more than one body parameter"));
            }
            let schema = param
                .schema
                .as_ref()
                .ok_or_else(|| site.malformed(&param.name, "body parameter without schema"))?;
            body = Some(ArgGroup {
                kind: ArgKind::Body,
                ty: resolve_type(spec, schema).map_err(|e| site.unresolved(&e.0))?,
                required: param.required,
                description: param.description.as_deref().map(inline_description),
            });
            continue;
        }

        let field = Field {
            name: param.name.clone(),
            ty: resolve_type(spec, &param.inline_schema()).map_err(|e| site.unresolved(&e.0))?,
            // Path parameters are always required.
            required: param.required || param.location == ParameterLocation::Path,
            description: param.description.as_deref().map(inline_description),
        };
        match param.location {
            ParameterLocation::Query => query.push(field),
            ParameterLocation::Path => path.push(field),
            ParameterLocation::Header => header.push(field),
            ParameterLocation::FormData => form.push(field),
            ParameterLocation::Body => {}
        }
    }

    let form_data = !form.is_empty();
    if form_data {
        if body.is_some() {
            return Err(site.malformed(
                &form[0].name,
                "formData parameters cannot be combined with a body parameter",
            ));
        }
        body = Some(object_group(ArgKind::Body, form));
    }

    let candidates = [
        (!query.is_empty()).then(|| object_group(ArgKind::Query, query)),
        (!path.is_empty()).then(|| object_group(ArgKind::Path, path)),
        body,
        (!header.is_empty()).then(|| object_group(ArgKind::Header, header)),
    ];
    let (required, optional): (Vec<ArgGroup>, Vec<ArgGroup>) =
        candidates.into_iter().flatten().partition(|g| g.required);

    let mut groups = required;
    groups.extend(optional);

    Ok(RequestArgs { groups, form_data })
}

fn object_group(kind: ArgKind, fields: Vec<Field>) -> ArgGroup {
    ArgGroup {
        kind,
        required: fields.iter().any(|f| f.required),
        ty: TypeExpr::Object(fields),
        description: None,
    }
}

/// Turn `/pets/{id}` into a template literal reading from `pathParams`.
/// Urls without path parameters stay plain string literals.
pub fn url_expression(url: &str, args: &RequestArgs) -> String {
    let path_fields = args.path_fields();
    if path_fields.is_empty() {
        return format!("\"{url}\"");
    }

    let mut expr = url.to_string();
    for field in path_fields {
        let access = match property_key(&field.name) {
            key if key.starts_with('"') => format!("pathParams[{key}]"),
            key => format!("pathParams.{key}"),
        };
        expr = expr.replace(&format!("{{{}}}", field.name), &format!("${{{access}}}"));
    }
    format!("`{expr}`")
}
