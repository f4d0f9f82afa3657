//! Static pages.

use axum::extract::State;
use axum::response::Response;
use chrono::{SecondsFormat, Utc};

use crate::app::AppError;
use crate::http::server::AppState;
use crate::inertia::{Page, Props, RequestIntent};

pub const DISPLAY_NAME: &str = "Context7 User";

/// `GET /`
pub async fn home(State(state): State<AppState>, intent: RequestIntent) -> Result<Response, AppError> {
    let props = Props::new()
        .with("name", DISPLAY_NAME)
        .lazy("timestamp", || {
            Ok(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
        });

    Ok(state
        .inertia
        .render(&intent, Page::new("Home").props(props))
        .await?)
}

/// `GET /about`
pub async fn about(State(state): State<AppState>, intent: RequestIntent) -> Result<Response, AppError> {
    Ok(state.inertia.render(&intent, Page::new("About")).await?)
}
