//! Client side of the page protocol.
//!
//! # Visit Flow
//! ```text
//! visit(Visit)
//!     → no page yet?            full document load, read data-page
//!     → send with X-Inertia + X-Inertia-Version (+ partial headers)
//!     → 409 + X-Inertia-Location  full document load of that location
//!     → X-Inertia response        swap page (merge props on partial reload)
//! ```
//!
//! # Design Decisions
//! - Last request wins: starting a visit aborts the one in flight, and a
//!   response that arrives after a newer visit started is discarded
//! - The view lock is never held across the network exchange

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::AbortHandle;
use url::Url;

use super::error::NavigationError;
use super::history::History;
use super::progress::{Progress, TracingProgress};
use crate::inertia::headers::{
    X_INERTIA, X_INERTIA_LOCATION, X_INERTIA_PARTIAL_COMPONENT, X_INERTIA_PARTIAL_DATA,
    X_INERTIA_VERSION,
};
use crate::inertia::PageObject;

/// A navigation request.
#[derive(Debug, Clone)]
pub struct Visit {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    data: Option<Value>,
    replace: bool,
    only: Vec<String>,
}

impl Visit {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            query: Vec::new(),
            data: None,
            replace: false,
            only: Vec::new(),
        }
    }

    /// Submit `data` as a JSON body.
    pub fn post(path: impl Into<String>, data: Value) -> Self {
        Self {
            method: Method::POST,
            data: Some(data),
            ..Self::get(path)
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Replace the current history entry instead of pushing a new one.
    pub fn replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    /// Ask for a partial reload of the current component.
    pub fn only<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = keys.into_iter().map(Into::into).collect();
        self
    }
}

/// How a visit ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The server answered with a page object.
    Rendered { page: PageObject, status: StatusCode },
    /// A full document load was performed (first visit or stale version).
    Reloaded { page: PageObject },
    /// A newer visit started before this one finished.
    Superseded,
}

impl Outcome {
    pub fn page(&self) -> Option<&PageObject> {
        match self {
            Self::Rendered { page, .. } | Self::Reloaded { page } => Some(page),
            Self::Superseded => None,
        }
    }
}

enum Arrival {
    Page { page: PageObject, status: StatusCode },
    Reloaded(PageObject),
}

#[derive(Default)]
struct View {
    history: History,
    in_flight: Option<(u64, AbortHandle)>,
}

pub struct Navigator {
    http: Client,
    base: Url,
    view: Mutex<View>,
    sequence: AtomicU64,
    progress: Arc<dyn Progress>,
}

impl Navigator {
    /// Navigator with no page yet; the first visit is a full document load.
    pub fn new(base: Url) -> Self {
        Self {
            http: Client::new(),
            base,
            view: Mutex::new(View::default()),
            sequence: AtomicU64::new(0),
            progress: Arc::new(TracingProgress),
        }
    }

    /// Navigator starting from a page object already on screen.
    pub fn hydrate(base: Url, page: PageObject) -> Self {
        let mut history = History::new();
        history.push(page);
        Self {
            view: Mutex::new(View {
                history,
                in_flight: None,
            }),
            ..Self::new(base)
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn Progress>) -> Self {
        self.progress = progress;
        self
    }

    pub async fn page(&self) -> Option<PageObject> {
        self.view.lock().await.history.current().cloned()
    }

    pub async fn history(&self) -> Vec<String> {
        self.view
            .lock()
            .await
            .history
            .urls()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    pub async fn visit(&self, visit: Visit) -> Result<Outcome, NavigationError> {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;

        let mut target = self.base.join(&visit.path)?;
        if !visit.query.is_empty() {
            target.query_pairs_mut().extend_pairs(&visit.query);
        }

        let (current, plan) = {
            let view = self.view.lock().await;
            let current = view.history.current().cloned();
            let plan = current
                .as_ref()
                .map(|page| self.build_request(&visit, target.clone(), page));
            (current, plan)
        };

        let http = self.http.clone();
        let base = self.base.clone();
        let load_target = target.clone();
        let handle = tokio::spawn(async move {
            match plan {
                Some(request) => exchange(&http, &base, request).await,
                None => full_load(&http, load_target).await.map(Arrival::Reloaded),
            }
        });

        {
            let mut view = self.view.lock().await;
            match view.in_flight.take() {
                Some((newer, running)) if newer > seq => {
                    view.in_flight = Some((newer, running));
                    handle.abort();
                }
                previous => {
                    if let Some((_, running)) = previous {
                        running.abort();
                    }
                    view.in_flight = Some((seq, handle.abort_handle()));
                }
            }
        }

        self.progress.start(target.as_str());
        let joined = handle.await;
        self.progress.finish(target.as_str());

        let arrival = match joined {
            Ok(result) => result?,
            Err(e) if e.is_cancelled() => {
                tracing::debug!(url = %target, "Visit cancelled by a newer one");
                return Ok(Outcome::Superseded);
            }
            Err(e) => return Err(NavigationError::Task(e.to_string())),
        };

        let mut view = self.view.lock().await;
        if self.sequence.load(Ordering::SeqCst) != seq {
            tracing::debug!(url = %target, "Discarding stale response");
            return Ok(Outcome::Superseded);
        }
        view.in_flight = None;

        let outcome = match arrival {
            Arrival::Page { mut page, status } => {
                let partial = !visit.only.is_empty()
                    && current.as_ref().map(|c| c.component.as_str())
                        == Some(page.component.as_str());
                if partial {
                    if let Some(current) = &current {
                        let mut props = current.props.clone();
                        props.extend(std::mem::take(&mut page.props));
                        page.props = props;
                    }
                }
                record(&mut view, page.clone(), visit.replace || partial);
                Outcome::Rendered { page, status }
            }
            Arrival::Reloaded(page) => {
                tracing::info!(url = %page.url, version = %page.version, "Full page load");
                record(&mut view, page.clone(), visit.replace);
                Outcome::Reloaded { page }
            }
        };
        Ok(outcome)
    }

    /// Re-request the current page, optionally keeping only `keys`.
    pub async fn reload<I, S>(&self, only: I) -> Result<Outcome, NavigationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let url = match self.page().await {
            Some(page) => page.url,
            None => "/".to_string(),
        };
        self.visit(Visit::get(url).only(only).replace(true)).await
    }

    /// Restore the previous history entry without a request.
    pub async fn back(&self) -> Option<PageObject> {
        self.view.lock().await.history.back().cloned()
    }

    fn build_request(&self, visit: &Visit, target: Url, current: &PageObject) -> RequestBuilder {
        let mut request = self
            .http
            .request(visit.method.clone(), target)
            .header(X_INERTIA, "true")
            .header(X_INERTIA_VERSION, current.version.as_str());

        if !visit.only.is_empty() {
            request = request
                .header(X_INERTIA_PARTIAL_COMPONENT, current.component.as_str())
                .header(X_INERTIA_PARTIAL_DATA, visit.only.join(","));
        }
        if let Some(data) = &visit.data {
            request = request.json(data);
        }
        request
    }
}

fn record(view: &mut View, page: PageObject, replace: bool) {
    if replace {
        view.history.replace(page);
    } else {
        view.history.push(page);
    }
}

async fn exchange(
    http: &Client,
    base: &Url,
    request: RequestBuilder,
) -> Result<Arrival, NavigationError> {
    let response = request.send().await?;
    let status = response.status();

    if status == StatusCode::CONFLICT {
        let location = response
            .headers()
            .get(X_INERTIA_LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(|v| base.join(v))
            .transpose()?;
        if let Some(location) = location {
            return full_load(http, location).await.map(Arrival::Reloaded);
        }
    }

    if response.headers().contains_key(X_INERTIA) {
        let page = response.json::<PageObject>().await?;
        return Ok(Arrival::Page { page, status });
    }

    let body = response.text().await?;
    Err(NavigationError::UnexpectedResponse { status, body })
}

/// Plain document request; the page object is read from `data-page`.
async fn full_load(http: &Client, url: Url) -> Result<PageObject, NavigationError> {
    let response = http.get(url.clone()).send().await?;
    let status = response.status();
    let html = response.text().await?;
    if !status.is_success() {
        return Err(NavigationError::UnexpectedResponse { status, body: html });
    }

    match PageObject::extract_from_html(&html) {
        Some(page) => Ok(page?),
        None => Err(NavigationError::MissingPageData {
            url: url.to_string(),
        }),
    }
}
