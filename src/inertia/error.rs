//! Render error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::path::PathBuf;
use thiserror::Error;

/// Failure to produce the HTML template.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template file could not be read.
    #[error("failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Development transform hook rejected the template.
    #[error("template transform failed: {0}")]
    Transform(String),
}

/// Failure of a lazy prop computation.
#[derive(Debug, Error)]
pub enum PropError {
    #[error("prop value is not serializable: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("{0}")]
    Failed(String),
}

impl PropError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Errors that abort a page render.
///
/// Every variant is fatal to the request: no partial page object is emitted.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("component name must not be empty")]
    EmptyComponent,

    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Template has no mount element to carry the page object.
    #[error("template has no mount element `<div id=\"{0}\"></div>`")]
    MissingMountPoint(String),

    #[error("failed to resolve prop `{key}`: {source}")]
    Prop {
        key: String,
        #[source]
        source: PropError,
    },

    #[error("failed to encode page object: {0}")]
    Encode(#[from] serde_json::Error),
}

impl IntoResponse for RenderError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Page render failed");

        let message = match self {
            RenderError::Template(_) | RenderError::MissingMountPoint(_) => {
                "Internal Server Error: Failed to load template"
            }
            _ => "Internal Server Error",
        };
        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}
