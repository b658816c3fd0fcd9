use log::{debug, warn};
use serde_json::{Value, json};
use swagen_core::GeneratedFile;
use swagen_core::config::MockOptions;
use swagen_core::parse::operation::{HttpMethod, Operation};
use swagen_core::parse::response::ResponseOrRef;
use swagen_core::parse::schema::{SchemaOrRef, ref_name};
use swagen_core::parse::spec::SwaggerSpec;
use swagen_core::transform::{group_by_tag, normalize};

use crate::MockError;
use crate::emitters::handlers::{MockRoute, emit_handlers, emit_index};
use crate::mock_value::MockValueBuilder;

/// Generate one mock module per tag plus an `index.js` merging them.
///
/// Files are returned in memory; paths are relative to the mock root.
pub fn generate_mocks(spec: &SwaggerSpec, options: &MockOptions) -> Result<Vec<GeneratedFile>, MockError> {
    let spec = normalize(spec)?;
    let groups = group_by_tag(&spec);

    let mut files = Vec::with_capacity(groups.len() + 1);
    for (tag, ops) in &groups {
        let mut routes = Vec::with_capacity(ops.len());
        for op_ref in ops {
            let Some(op) = spec.operation(&op_ref.url, op_ref.method) else {
                warn!("{} {} vanished from the document, skipping", op_ref.method, op_ref.url);
                continue;
            };
            routes.push(build_route(&spec, &op_ref.url, op_ref.method, op, options)?);
        }
        debug!("mocked {} routes for `{tag}`", routes.len());
        files.push(GeneratedFile {
            path: format!("{tag}.js"),
            content: emit_handlers(&routes, spec.tag_description(tag))?,
        });
    }

    if !groups.is_empty() {
        let modules: Vec<String> = groups.keys().cloned().collect();
        files.push(GeneratedFile {
            path: "index.js".to_string(),
            content: emit_index(&modules)?,
        });
    }

    Ok(files)
}

fn build_route(
    spec: &SwaggerSpec,
    url: &str,
    method: HttpMethod,
    op: &Operation,
    options: &MockOptions,
) -> Result<MockRoute, MockError> {
    let unresolved = |reference: String| MockError::UnresolvedRef {
        url: url.to_string(),
        method,
        reference,
    };

    let value = match success_schema(spec, op).map_err(unresolved)? {
        Some(schema) => MockValueBuilder::new(spec)
            .value_for(schema)
            .map_err(|e| unresolved(e.0))?,
        None => Value::Null,
    };
    let value = if options.wrap {
        json!({ "code": 200, "msg": "success", "data": value })
    } else {
        value
    };

    let key = format!("{} {}", method.as_upper(), express_path(url));
    Ok(MockRoute {
        key: serde_json::to_string(&key)?,
        body: serde_json::to_string_pretty(&value)?.replace('\n', "\n  "),
    })
}

/// Schema of the `200` response, else the first 2xx one.
fn success_schema<'a>(
    spec: &'a SwaggerSpec,
    op: &'a Operation,
) -> Result<Option<&'a SchemaOrRef>, String> {
    let success = op.responses.get("200").or_else(|| {
        op.responses
            .iter()
            .find(|(status, _)| status.starts_with('2'))
            .map(|(_, response)| response)
    });
    let response = match success {
        None => return Ok(None),
        Some(ResponseOrRef::Response(response)) => response,
        Some(ResponseOrRef::Ref { ref_path }) => spec
            .responses
            .get(ref_name(ref_path))
            .ok_or_else(|| ref_path.clone())?,
    };
    Ok(response.schema.as_ref())
}

/// `/pets/{id}` to the express-style `/pets/:id`.
fn express_path(url: &str) -> String {
    url.split('/')
        .map(|seg| match seg.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) => format!(":{name}"),
            None => seg.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}
