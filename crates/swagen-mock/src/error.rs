use swagen_core::error::ValidationError;
use swagen_core::parse::operation::HttpMethod;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MockError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{method} {url}: unresolved reference `{reference}`")]
    UnresolvedRef {
        url: String,
        method: HttpMethod,
        reference: String,
    },

    #[error("failed to render mock file: {0}")]
    Render(#[from] minijinja::Error),

    #[error("failed to serialize mock body: {0}")]
    Json(#[from] serde_json::Error),
}
