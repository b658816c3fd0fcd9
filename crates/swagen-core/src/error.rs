use std::path::PathBuf;

use thiserror::Error;

use crate::parse::operation::HttpMethod;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("unsupported document version {0}: only Swagger 2.0 documents are supported")]
    UnsupportedVersion(String),
}

/// A single operation could not be compiled.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("{method} {url}: operation not found in document")]
    OperationNotFound { url: String, method: HttpMethod },

    #[error("{method} {url}: unresolved reference `{reference}`")]
    UnresolvedRef {
        url: String,
        method: HttpMethod,
        reference: String,
    },

    #[error("{method} {url}: malformed parameter `{name}`: {reason}")]
    MalformedParameter {
        url: String,
        method: HttpMethod,
        name: String,
        reason: String,
    },

    #[error("{method} {url}: failed to render template: {source}")]
    Render {
        url: String,
        method: HttpMethod,
        #[source]
        source: minijinja::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
}

/// Errors surfaced at the pipeline boundary.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("tag `{tag}`: {source}")]
    Compile {
        tag: String,
        #[source]
        source: CompileError,
    },

    #[error("failed to render output: {0}")]
    Render(#[from] minijinja::Error),

    #[error("unresolved reference `{0}` in definitions")]
    UnresolvedDefinition(String),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
