//! Application routes.
//!
//! Handlers build a [`Page`](crate::inertia::Page) and hand it to the shared
//! renderer; they never look at protocol headers themselves.

pub mod contact;
pub mod pages;
pub mod users;

use axum::extract::{FromRequest, Request};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::http::server::AppState;
use crate::inertia::{ApiError, PropError, RenderError};

/// Error returned by route handlers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("invalid request: {}", .0.error)]
    Api(ApiError),

    #[error("{0}")]
    NotFound(&'static str),

    #[error(transparent)]
    Prop(#[from] PropError),

    #[error("failed to encode props: {0}")]
    Encode(#[from] serde_json::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Render(e) => e.into_response(),
            AppError::Api(e) => e.into_response(),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message).into_response(),
            other => {
                tracing::error!(error = %other, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

/// Form body accepted as JSON or as `application/x-www-form-urlencoded`.
pub struct Submission<T>(pub T);

impl<S, T> FromRequest<S> for Submission<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"));

        if is_json {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(value))
        } else {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(value))
        }
    }
}

/// Page and API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/contact", get(contact::show).post(contact::submit))
        .route("/users", get(users::index))
        .route("/users/{id}", get(users::show))
        .route("/api/users/validate", post(users::validate_new_user))
}
