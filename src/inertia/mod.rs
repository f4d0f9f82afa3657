//! Server side of the page protocol.
//!
//! # Data Flow
//! ```text
//! HTTP request
//!     → intent.rs (protocol headers parsed once)
//!     → route handler builds Page { component, Props }
//!     → render.rs (version check, partial filter, lazy resolution)
//!     → page.rs (PageObject, JSON or data-page attribute)
//!     → template.rs (dev: fresh + transform, prod: cached)
//! ```

pub mod error;
pub mod headers;
pub mod intent;
pub mod page;
pub mod props;
pub mod render;
pub mod template;
pub mod validation;
pub mod version;

pub use error::{PropError, RenderError, TemplateError};
pub use intent::{PartialReload, RequestIntent};
pub use page::PageObject;
pub use props::{Prop, Props};
pub use render::{Inertia, Page};
pub use template::{Passthrough, ScriptInjector, TemplateStore, TemplateTransform};
pub use validation::{ApiError, FieldErrors, Validate};
pub use version::VersionToken;
