//! Protocol header names.
//!
//! Header lookups through `HeaderMap` are case-insensitive, so these lowercase
//! names match whatever casing the client sends.

use axum::http::HeaderName;

/// Marks a request as a protocol request, and a response as a page object.
pub const X_INERTIA: HeaderName = HeaderName::from_static("x-inertia");

/// Asset version the client currently holds.
pub const X_INERTIA_VERSION: HeaderName = HeaderName::from_static("x-inertia-version");

/// Component a partial reload targets.
pub const X_INERTIA_PARTIAL_COMPONENT: HeaderName =
    HeaderName::from_static("x-inertia-partial-component");

/// Comma-separated prop keys a partial reload retains.
pub const X_INERTIA_PARTIAL_DATA: HeaderName = HeaderName::from_static("x-inertia-partial-data");

/// Location the client must hard-load on a 409.
pub const X_INERTIA_LOCATION: HeaderName = HeaderName::from_static("x-inertia-location");
