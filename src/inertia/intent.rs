//! Per-request protocol intent.
//!
//! Protocol headers are read once, when the handler extracts a
//! [`RequestIntent`]. Everything downstream branches on this value instead of
//! going back to the raw headers.

use axum::extract::{FromRequestParts, OriginalUri};
use axum::http::request::Parts;
use axum::http::{HeaderMap, Method, Uri};
use std::convert::Infallible;

use crate::inertia::headers::{
    X_INERTIA, X_INERTIA_PARTIAL_COMPONENT, X_INERTIA_PARTIAL_DATA, X_INERTIA_VERSION,
};
use crate::inertia::version::VersionToken;

/// Partial reload request: only `only` props of `component` are wanted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialReload {
    pub component: String,
    pub only: Vec<String>,
}

impl PartialReload {
    /// Parse the partial headers. Both must be present.
    fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let component = header_str(headers, &X_INERTIA_PARTIAL_COMPONENT)?;
        let data = header_str(headers, &X_INERTIA_PARTIAL_DATA)?;

        Some(Self {
            component: component.to_string(),
            only: data
                .split(',')
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(String::from)
                .collect(),
        })
    }

    /// Filtering applies only to the targeted component and a non-empty key list.
    pub fn applies_to(&self, component: &str) -> bool {
        self.component == component && !self.only.is_empty()
    }

    pub fn retains(&self, key: &str) -> bool {
        self.only.iter().any(|k| k == key)
    }
}

/// Parsed protocol view of an incoming request.
#[derive(Debug, Clone)]
pub struct RequestIntent {
    pub method: Method,
    /// Path and query of the request as the client sent it.
    pub url: String,
    /// `X-Inertia` marker present.
    pub is_inertia: bool,
    /// `X-Inertia-Version` sent by the client.
    pub version: Option<String>,
    pub partial: Option<PartialReload>,
}

impl RequestIntent {
    pub fn from_parts(method: &Method, uri: &Uri, headers: &HeaderMap) -> Self {
        Self {
            method: method.clone(),
            url: uri
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_else(|| "/".to_string()),
            is_inertia: header_str(headers, &X_INERTIA).is_some_and(|v| !v.is_empty()),
            version: header_str(headers, &X_INERTIA_VERSION).map(String::from),
            partial: PartialReload::from_headers(headers),
        }
    }

    /// A protocol GET whose client version differs from `current` must be
    /// answered with a 409 before any prop is resolved.
    pub fn is_version_stale(&self, current: &VersionToken) -> bool {
        self.method == Method::GET && self.is_inertia && !current.matches(self.version.as_deref())
    }

    /// The partial reload, if it targets `component`.
    pub fn partial_for(&self, component: &str) -> Option<&PartialReload> {
        self.partial.as_ref().filter(|p| p.applies_to(component))
    }
}

impl<S> FromRequestParts<S> for RequestIntent
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Nested routers strip their prefix from `parts.uri`.
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|original| original.0.clone())
            .unwrap_or_else(|| parts.uri.clone());

        Ok(Self::from_parts(&parts.method, &uri, &parts.headers))
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &axum::http::HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    fn intent(method: Method, uri: &str, pairs: &[(&'static str, &'static str)]) -> RequestIntent {
        let uri: Uri = uri.parse().unwrap();
        RequestIntent::from_parts(&method, &uri, &headers(pairs))
    }

    #[test]
    fn test_plain_request() {
        let intent = intent(Method::GET, "/users?q=al&page=2", &[]);
        assert!(!intent.is_inertia);
        assert_eq!(intent.url, "/users?q=al&page=2");
        assert!(intent.version.is_none());
        assert!(intent.partial.is_none());
        assert!(!intent.is_version_stale(&VersionToken::new("1.0.0")));
    }

    #[test]
    fn test_header_names_are_case_insensitive() {
        let mut map = HeaderMap::new();
        map.insert("X-Inertia", HeaderValue::from_static("true"));
        map.insert("X-INERTIA-VERSION", HeaderValue::from_static("1.0.0"));
        let intent = RequestIntent::from_parts(&Method::GET, &"/".parse().unwrap(), &map);

        assert!(intent.is_inertia);
        assert_eq!(intent.version.as_deref(), Some("1.0.0"));
    }

    #[test]
    fn test_version_staleness() {
        let current = VersionToken::new("2.0.0");

        let stale = intent(Method::GET, "/", &[("x-inertia", "true"), ("x-inertia-version", "1.0.0")]);
        assert!(stale.is_version_stale(&current));

        let missing = intent(Method::GET, "/", &[("x-inertia", "true")]);
        assert!(missing.is_version_stale(&current));

        let fresh = intent(Method::GET, "/", &[("x-inertia", "true"), ("x-inertia-version", "2.0.0")]);
        assert!(!fresh.is_version_stale(&current));

        // Only reads are checked.
        let post = intent(Method::POST, "/", &[("x-inertia", "true"), ("x-inertia-version", "1.0.0")]);
        assert!(!post.is_version_stale(&current));

        // Only protocol requests are checked.
        let plain = intent(Method::GET, "/", &[("x-inertia-version", "1.0.0")]);
        assert!(!plain.is_version_stale(&current));
    }

    #[test]
    fn test_partial_key_parsing() {
        let intent = intent(
            Method::GET,
            "/",
            &[
                ("x-inertia-partial-component", "Home"),
                ("x-inertia-partial-data", " timestamp , ,name,"),
            ],
        );

        let partial = intent.partial.as_ref().unwrap();
        assert_eq!(partial.only, vec!["timestamp".to_string(), "name".to_string()]);
        assert!(partial.retains("timestamp"));
        assert!(!partial.retains("users"));
    }

    #[test]
    fn test_partial_targets_component() {
        let intent = intent(
            Method::GET,
            "/",
            &[
                ("x-inertia-partial-component", "Home"),
                ("x-inertia-partial-data", "timestamp"),
            ],
        );
        assert!(intent.partial_for("Home").is_some());
        assert!(intent.partial_for("Users").is_none());
    }

    #[test]
    fn test_partial_requires_both_headers_and_keys() {
        let only_component = intent(Method::GET, "/", &[("x-inertia-partial-component", "Home")]);
        assert!(only_component.partial.is_none());

        let empty_keys = intent(
            Method::GET,
            "/",
            &[("x-inertia-partial-component", "Home"), ("x-inertia-partial-data", " , ")],
        );
        assert!(empty_keys.partial_for("Home").is_none());
    }
}
