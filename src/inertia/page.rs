//! The page object and its HTML embedding.
//!
//! # Wire Format
//! ```text
//! {"component": "Home", "props": {...}, "url": "/?a=1", "version": "1.0.0"}
//! ```
//!
//! Full document responses carry the same JSON inside the `data-page`
//! attribute of the mount element, attribute-escaped.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const DATA_PAGE_ATTR: &str = "data-page=\"";

/// Canonical payload describing which component to show and with what data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageObject {
    pub component: String,
    pub props: Map<String, Value>,
    pub url: String,
    pub version: String,
}

impl PageObject {
    /// Encode for use as an HTML attribute value.
    pub fn to_html_attribute(&self) -> Result<String, serde_json::Error> {
        Ok(escape_attribute(&serde_json::to_string(self)?))
    }

    /// Decode an attribute value produced by [`PageObject::to_html_attribute`].
    pub fn from_html_attribute(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(&unescape_attribute(raw))
    }

    /// Find the `data-page` attribute in a rendered document and decode it.
    ///
    /// Returns `None` when the document carries no page object.
    pub fn extract_from_html(html: &str) -> Option<Result<Self, serde_json::Error>> {
        let start = html.find(DATA_PAGE_ATTR)? + DATA_PAGE_ATTR.len();
        let len = html[start..].find('"')?;
        Some(Self::from_html_attribute(&html[start..start + len]))
    }

    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }
}

/// Escape a string for a double-quoted attribute.
///
/// `&` is escaped before `"` so that [`unescape_attribute`] is an exact inverse.
pub fn escape_attribute(raw: &str) -> String {
    raw.replace('&', "&amp;").replace('"', "&quot;")
}

/// Inverse of [`escape_attribute`].
pub fn unescape_attribute(escaped: &str) -> String {
    escaped.replace("&quot;", "\"").replace("&amp;", "&")
}
