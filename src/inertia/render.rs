//! Page renderer.
//!
//! # Request Flow
//! ```text
//! RequestIntent + Page
//!     → version check (stale protocol GET → 409 + X-Inertia-Location)
//!     → partial filter (only when the partial targets this component)
//!     → lazy prop resolution (concurrent, fail = 500)
//!     → PageObject
//!     → X-Inertia request ? JSON body : template with data-page attribute
//! ```

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde_json::Value;
use std::time::Instant;

use crate::inertia::error::RenderError;
use crate::inertia::headers::{X_INERTIA, X_INERTIA_LOCATION};
use crate::inertia::intent::RequestIntent;
use crate::inertia::page::PageObject;
use crate::inertia::props::{Prop, Props};
use crate::inertia::template::TemplateStore;
use crate::inertia::version::VersionToken;
use crate::observability::metrics;

/// Default id of the element the client mounts into.
pub const DEFAULT_MOUNT_ID: &str = "app";

/// A component and the props to render it with.
#[derive(Debug)]
pub struct Page {
    component: String,
    props: Props,
    status: StatusCode,
}

impl Page {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            props: Props::new(),
            status: StatusCode::OK,
        }
    }

    pub fn props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }

    /// Add or replace a single immediate prop.
    pub fn prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key, Prop::Immediate(value.into()));
        self
    }

    /// Status code of the rendered response (200 by default).
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn component(&self) -> &str {
        &self.component
    }
}

/// Renders pages for the protocol.
///
/// Owns the version token and the template store; shared through `AppState`.
pub struct Inertia {
    version: VersionToken,
    templates: TemplateStore,
    mount_id: String,
}

impl Inertia {
    pub fn new(version: VersionToken, templates: TemplateStore) -> Self {
        Self {
            version,
            templates,
            mount_id: DEFAULT_MOUNT_ID.to_string(),
        }
    }

    pub fn with_mount_id(mut self, mount_id: impl Into<String>) -> Self {
        self.mount_id = mount_id.into();
        self
    }

    pub fn version(&self) -> &VersionToken {
        &self.version
    }

    /// Render `page` for the request described by `intent`.
    pub async fn render(&self, intent: &RequestIntent, page: Page) -> Result<Response, RenderError> {
        let started = Instant::now();
        let Page {
            component,
            props,
            status,
        } = page;

        if component.is_empty() {
            return Err(RenderError::EmptyComponent);
        }

        if intent.is_version_stale(&self.version) {
            tracing::debug!(
                component = %component,
                client_version = intent.version.as_deref().unwrap_or(""),
                server_version = %self.version,
                "Asset version mismatch, forcing full reload"
            );
            metrics::record_render(&component, "conflict", StatusCode::CONFLICT, started);
            return Ok(conflict(&intent.url));
        }

        let partial = intent.partial_for(&component);
        let props = props.filter(partial).resolve().await?;

        let page = PageObject {
            component,
            props,
            url: intent.url.clone(),
            version: self.version.to_string(),
        };

        let (kind, response) = if intent.is_inertia {
            ("json", self.json_response(&page, status)?)
        } else {
            ("html", self.html_response(&page, status).await?)
        };

        tracing::debug!(
            component = %page.component,
            url = %page.url,
            kind,
            partial = partial.is_some(),
            status = status.as_u16(),
            "Page rendered"
        );
        metrics::record_render(&page.component, kind, status, started);
        Ok(response)
    }

    /// Redirect to a location outside the protocol, e.g. another site.
    ///
    /// Protocol requests get a 409 with `X-Inertia-Location` so the client
    /// performs a real navigation; plain requests get a 303.
    pub fn location(&self, intent: &RequestIntent, url: &str) -> Response {
        if intent.is_inertia {
            conflict(url)
        } else {
            Redirect::to(url).into_response()
        }
    }

    fn json_response(&self, page: &PageObject, status: StatusCode) -> Result<Response, RenderError> {
        let body = serde_json::to_vec(page)?;
        Ok((
            status,
            [
                (X_INERTIA, HeaderValue::from_static("true")),
                (header::VARY, HeaderValue::from_static("Accept")),
                (header::CONTENT_TYPE, HeaderValue::from_static("application/json")),
            ],
            body,
        )
            .into_response())
    }

    async fn html_response(&self, page: &PageObject, status: StatusCode) -> Result<Response, RenderError> {
        let template = self.templates.load(&page.url).await?;

        let mount = format!("<div id=\"{}\"></div>", self.mount_id);
        if !template.contains(&mount) {
            return Err(RenderError::MissingMountPoint(self.mount_id.clone()));
        }

        let filled = format!(
            "<div id=\"{}\" data-page=\"{}\"></div>",
            self.mount_id,
            page.to_html_attribute()?
        );
        let html = template.replacen(&mount, &filled, 1);

        Ok((status, Html(html)).into_response())
    }
}

fn conflict(url: &str) -> Response {
    match HeaderValue::from_str(url) {
        Ok(location) => (StatusCode::CONFLICT, [(X_INERTIA_LOCATION, location)]).into_response(),
        Err(_) => {
            tracing::warn!(url, "Location is not a valid header value");
            StatusCode::CONFLICT.into_response()
        }
    }
}
