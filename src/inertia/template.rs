//! HTML template acquisition.
//!
//! # Modes
//! ```text
//! Development: read file on every request → transform hook → template
//! Production:  read build artifact once   → cached for process lifetime
//! ```
//!
//! The production cache has no invalidation: a new deployment means a new
//! process.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::inertia::error::TemplateError;

/// Hook applied to the development template before rendering.
#[async_trait]
pub trait TemplateTransform: Send + Sync {
    async fn transform(&self, url: &str, html: String) -> Result<String, TemplateError>;
}

/// Returns the template unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

#[async_trait]
impl TemplateTransform for Passthrough {
    async fn transform(&self, _url: &str, html: String) -> Result<String, TemplateError> {
        Ok(html)
    }
}

/// Injects module script tags (e.g. a dev server client) before `</head>`.
#[derive(Debug, Clone, Default)]
pub struct ScriptInjector {
    scripts: Vec<String>,
}

impl ScriptInjector {
    pub fn new(scripts: Vec<String>) -> Self {
        Self { scripts }
    }
}

#[async_trait]
impl TemplateTransform for ScriptInjector {
    async fn transform(&self, _url: &str, html: String) -> Result<String, TemplateError> {
        if self.scripts.is_empty() {
            return Ok(html);
        }

        let Some(head_end) = html.find("</head>") else {
            return Err(TemplateError::Transform(
                "template has no </head> to inject scripts into".into(),
            ));
        };

        let tags: String = self
            .scripts
            .iter()
            .map(|src| format!("<script type=\"module\" src=\"{src}\"></script>"))
            .collect();

        let mut out = String::with_capacity(html.len() + tags.len());
        out.push_str(&html[..head_end]);
        out.push_str(&tags);
        out.push_str(&html[head_end..]);
        Ok(out)
    }
}

/// Source of the HTML shell that full document responses are built from.
pub enum TemplateStore {
    Development {
        path: PathBuf,
        transform: Arc<dyn TemplateTransform>,
    },
    Production {
        path: PathBuf,
        cache: OnceCell<Arc<str>>,
    },
}

impl TemplateStore {
    pub fn development(path: impl Into<PathBuf>, transform: Arc<dyn TemplateTransform>) -> Self {
        Self::Development {
            path: path.into(),
            transform,
        }
    }

    pub fn production(path: impl Into<PathBuf>) -> Self {
        Self::Production {
            path: path.into(),
            cache: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Development { path, .. } | Self::Production { path, .. } => path,
        }
    }

    /// True once the production template has been read.
    pub fn is_cached(&self) -> bool {
        match self {
            Self::Development { .. } => false,
            Self::Production { cache, .. } => cache.initialized(),
        }
    }

    /// Get the template for a request to `url`.
    pub async fn load(&self, url: &str) -> Result<Arc<str>, TemplateError> {
        match self {
            Self::Development { path, transform } => {
                let html = read_template(path).await?;
                let html = transform.transform(url, html).await?;
                Ok(Arc::from(html))
            }
            Self::Production { path, cache } => {
                let html = cache
                    .get_or_try_init(|| async {
                        let html = read_template(path).await?;
                        tracing::info!(path = %path.display(), "Template cached");
                        Ok::<_, TemplateError>(Arc::from(html))
                    })
                    .await?;
                Ok(html.clone())
            }
        }
    }
}

async fn read_template(path: &Path) -> Result<String, TemplateError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHELL: &str = "<html><head><title>t</title></head><body><div id=\"app\"></div></body></html>";

    fn write_shell(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("index.html");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_development_reads_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_shell(&dir, SHELL);
        let store = TemplateStore::development(&path, Arc::new(Passthrough));

        assert_eq!(&*store.load("/").await.unwrap(), SHELL);

        std::fs::write(&path, "<html>changed</html>").unwrap();
        assert_eq!(&*store.load("/").await.unwrap(), "<html>changed</html>");
        assert!(!store.is_cached());
    }

    #[tokio::test]
    async fn test_production_caches_first_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_shell(&dir, SHELL);
        let store = TemplateStore::production(&path);

        assert!(!store.is_cached());
        assert_eq!(&*store.load("/").await.unwrap(), SHELL);
        assert!(store.is_cached());

        // Later edits and deletes are not observed.
        std::fs::remove_file(&path).unwrap();
        assert_eq!(&*store.load("/about").await.unwrap(), SHELL);
    }

    #[tokio::test]
    async fn test_missing_template() {
        let store = TemplateStore::production("/nonexistent/dist/client/index.html");
        let err = store.load("/").await.unwrap_err();
        assert!(matches!(err, TemplateError::Read { .. }));
        assert!(!store.is_cached());

        let dev = TemplateStore::development("/nonexistent/index.html", Arc::new(Passthrough));
        assert!(dev.load("/").await.is_err());
    }

    #[tokio::test]
    async fn test_script_injection() {
        let injector = ScriptInjector::new(vec!["/@vite/client".into()]);
        let html = injector.transform("/", SHELL.to_string()).await.unwrap();
        assert!(html.contains(
            "<script type=\"module\" src=\"/@vite/client\"></script></head>"
        ));

        let err = injector.transform("/", "<div></div>".into()).await;
        assert!(matches!(err, Err(TemplateError::Transform(_))));
    }

    #[tokio::test]
    async fn test_development_transform_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_shell(&dir, "<body></body>");
        let injector = ScriptInjector::new(vec!["/dev.js".into()]);
        let store = TemplateStore::development(&path, Arc::new(injector));

        assert!(matches!(store.load("/").await, Err(TemplateError::Transform(_))));
    }
}
