//! Page props: immediate values and lazily computed values.
//!
//! A lazy prop is a boxed `FnOnce`, so the renderer can invoke it at most once.
//! Props dropped by a partial reload are never invoked.

use futures_util::future::{try_join_all, BoxFuture, FutureExt};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;

use crate::inertia::error::{PropError, RenderError};
use crate::inertia::intent::PartialReload;

pub type PropResult = Result<Value, PropError>;

/// A single prop value.
pub enum Prop {
    Immediate(Value),
    Deferred(Box<dyn FnOnce() -> PropResult + Send>),
    AsyncDeferred(Box<dyn FnOnce() -> BoxFuture<'static, PropResult> + Send>),
}

impl Prop {
    pub fn is_lazy(&self) -> bool {
        !matches!(self, Prop::Immediate(_))
    }

    async fn resolve(self) -> PropResult {
        match self {
            Prop::Immediate(value) => Ok(value),
            Prop::Deferred(compute) => compute(),
            Prop::AsyncDeferred(compute) => compute().await,
        }
    }
}

impl fmt::Debug for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prop::Immediate(value) => f.debug_tuple("Immediate").field(value).finish(),
            Prop::Deferred(_) => f.write_str("Deferred(..)"),
            Prop::AsyncDeferred(_) => f.write_str("AsyncDeferred(..)"),
        }
    }
}

/// Property bag handed to the renderer.
#[derive(Debug, Default)]
pub struct Props {
    entries: BTreeMap<String, Prop>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an immediate value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, Prop::Immediate(value.into()));
        self
    }

    /// Add an immediate value from any serializable type.
    pub fn try_with<T: Serialize>(
        self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<Self, PropError> {
        Ok(self.with(key, serde_json::to_value(value)?))
    }

    /// Add a value computed synchronously at render time.
    pub fn lazy<F, T>(mut self, key: impl Into<String>, compute: F) -> Self
    where
        F: FnOnce() -> Result<T, PropError> + Send + 'static,
        T: Serialize,
    {
        self.insert(
            key,
            Prop::Deferred(Box::new(move || -> PropResult {
                Ok(serde_json::to_value(compute()?)?)
            })),
        );
        self
    }

    /// Add a value computed asynchronously at render time.
    pub fn lazy_async<F, Fut, T>(mut self, key: impl Into<String>, compute: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, PropError>> + Send + 'static,
        T: Serialize + 'static,
    {
        self.insert(
            key,
            Prop::AsyncDeferred(Box::new(move || -> BoxFuture<'static, PropResult> {
                async move {
                    let value = compute().await?;
                    serde_json::to_value(value).map_err(PropError::from)
                }
                .boxed()
            })),
        );
        self
    }

    /// Insert or replace a prop.
    pub fn insert(&mut self, key: impl Into<String>, prop: Prop) {
        self.entries.insert(key.into(), prop);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keep only the keys a partial reload asks for.
    ///
    /// Requested keys that are not in the bag are ignored.
    pub fn filter(mut self, partial: Option<&PartialReload>) -> Self {
        if let Some(partial) = partial {
            self.entries.retain(|key, _| partial.retains(key));
        }
        self
    }

    /// Resolve every prop, running lazy computations concurrently.
    ///
    /// The first failure aborts resolution of the whole bag.
    pub async fn resolve(self) -> Result<Map<String, Value>, RenderError> {
        let pending = self.entries.into_iter().map(|(key, prop)| async move {
            match prop.resolve().await {
                Ok(value) => Ok((key, value)),
                Err(source) => Err(RenderError::Prop { key, source }),
            }
        });

        Ok(try_join_all(pending).await?.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counted(counter: &Arc<AtomicUsize>) -> impl FnOnce() -> Result<String, PropError> {
        let counter = counter.clone();
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok("computed".to_string())
        }
    }

    #[tokio::test]
    async fn test_resolves_all_kinds() {
        let props = Props::new()
            .with("name", "X")
            .lazy("sync", || Ok(42))
            .lazy_async("async", || async { Ok::<_, PropError>(vec!["a", "b"]) });

        let resolved = props.resolve().await.unwrap();
        assert_eq!(resolved["name"], json!("X"));
        assert_eq!(resolved["sync"], json!(42));
        assert_eq!(resolved["async"], json!(["a", "b"]));
    }

    #[tokio::test]
    async fn test_lazy_invoked_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let props = Props::new().lazy("value", counted(&calls));

        props.resolve().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_filtered_lazy_never_invoked() {
        let calls = Arc::new(AtomicUsize::new(0));
        let props = Props::new()
            .with("name", "X")
            .lazy("expensive", counted(&calls));

        let partial = PartialReload {
            component: "Home".into(),
            only: vec!["name".into(), "missing".into()],
        };
        let resolved = props.filter(Some(&partial)).resolve().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(resolved.len(), 1);
        assert!(resolved.contains_key("name"));
        assert!(!resolved.contains_key("missing"));
    }

    #[tokio::test]
    async fn test_failure_aborts_resolution() {
        let props = Props::new()
            .with("name", "X")
            .lazy_async("broken", || async { Err::<Value, _>(PropError::failed("backend down")) });

        match props.resolve().await {
            Err(RenderError::Prop { key, .. }) => assert_eq!(key, "broken"),
            other => panic!("expected prop failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_async_props_run_concurrently() {
        let started = std::time::Instant::now();
        let props = Props::new()
            .lazy_async("a", || async {
                tokio::time::sleep(std::time::Duration::from_millis(100)).await;
                Ok::<_, PropError>(1)
            })
            .lazy_async("b", || async {
                tokio::time::sleep(std::time::Duration::from_millis(100)).await;
                Ok::<_, PropError>(2)
            });

        let resolved = props.resolve().await.unwrap();
        assert_eq!(resolved.len(), 2);
        assert!(started.elapsed() < std::time::Duration::from_millis(190));
    }

    #[test]
    fn test_bag_inspection() {
        let props = Props::new().with("a", 1).lazy("b", || Ok(2));
        assert_eq!(props.len(), 2);
        assert!(props.contains_key("b"));
        assert_eq!(props.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(!Props::new().with("a", 1).entries["a"].is_lazy());
    }
}
