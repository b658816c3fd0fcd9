use std::path::Path;

use swagen_core::parse;
use swagen_core::parse::operation::HttpMethod;
use swagen_core::parse::parameter::{ParameterLocation, ParameterOrRef};
use swagen_core::parse::response::ResponseOrRef;
use swagen_core::parse::schema::SchemaOrRef;

const PETSTORE: &str = include_str!("fixtures/petstore.yaml");
const IMPORTS: &str = include_str!("fixtures/imports.json");

#[test]
fn parse_petstore_yaml() {
    let spec = parse::from_yaml(PETSTORE).expect("should parse petstore");
    assert_eq!(spec.swagger.as_deref(), Some("2.0"));
    assert_eq!(spec.info.title, "Swagger Petstore");
    assert_eq!(spec.host.as_deref(), Some("petstore.swagger.io"));
    assert_eq!(spec.base_path.as_deref(), Some("/v2"));
    assert_eq!(spec.paths.len(), 5);
    assert_eq!(spec.definitions.len(), 5);
}

#[test]
fn parse_methods_in_document_order() {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    let item = &spec.paths["/pets/{petId}"];
    let methods: Vec<HttpMethod> = item.operations.keys().copied().collect();
    assert_eq!(methods, vec![HttpMethod::Get, HttpMethod::Delete]);

    // Path-level parameters stay on the path item.
    assert_eq!(item.parameters.len(), 1);
    assert!(item.operations[&HttpMethod::Delete].deprecated);
}

#[test]
fn parse_parameters_and_responses() {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    let upload = spec
        .operation("/pets/{petId}/uploadImage", HttpMethod::Post)
        .expect("should have upload operation");

    let locations: Vec<ParameterLocation> = upload
        .parameters
        .iter()
        .map(|p| match p {
            ParameterOrRef::Parameter(p) => p.location,
            ParameterOrRef::Ref { .. } => panic!("expected inline parameter"),
        })
        .collect();
    assert_eq!(
        locations,
        vec![ParameterLocation::Path, ParameterLocation::FormData]
    );

    match &upload.responses["200"] {
        ResponseOrRef::Response(r) => match &r.schema {
            Some(SchemaOrRef::Ref { ref_path }) => {
                assert_eq!(ref_path, "#/definitions/ApiResponse")
            }
            other => panic!("expected ref schema, got {other:?}"),
        },
        _ => panic!("expected inline response"),
    }
}

#[test]
fn parse_json_by_extension() {
    let spec = parse::from_str_with_path(IMPORTS, Path::new("imports.json")).expect("should parse json");
    assert_eq!(spec.info.title, "Imports");
    let urls: Vec<&str> = spec.paths.keys().map(String::as_str).collect();
    assert_eq!(urls, vec!["/first", "/second"]);
}

#[test]
fn parse_rejects_unknown_parameter_location() {
    let doc = r#"
swagger: "2.0"
paths:
  /x:
    get:
      parameters:
        - name: a
          in: cookie
          type: string
"#;
    assert!(parse::from_yaml(doc).is_err());
}
