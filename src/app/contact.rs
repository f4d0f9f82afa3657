//! Contact form page.

use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::app::{AppError, Submission};
use crate::http::server::AppState;
use crate::inertia::{FieldErrors, Page, RequestIntent, Validate};

const MIN_NAME_CHARS: usize = 2;
const MIN_MESSAGE_CHARS: usize = 10;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl Validate for ContactForm {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.name.trim().chars().count() < MIN_NAME_CHARS {
            errors.add("name", "Name must be at least 2 characters");
        }
        if !is_email(&self.email) {
            errors.add("email", "Invalid email");
        }
        if self.message.trim().chars().count() < MIN_MESSAGE_CHARS {
            errors.add("message", "Message must be at least 10 characters");
        }

        errors.into_result()
    }
}

/// Loose address check: something before `@`, a dot somewhere after it.
pub fn is_email(raw: &str) -> bool {
    let raw = raw.trim();
    if raw.chars().any(char::is_whitespace) {
        return false;
    }
    match raw.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}

/// `GET /contact`
pub async fn show(State(state): State<AppState>, intent: RequestIntent) -> Result<Response, AppError> {
    Ok(state.inertia.render(&intent, Page::new("Contact")).await?)
}

/// `POST /contact`
///
/// Failures re-render `Contact` with `errors` and 422; success redirects back
/// with 303 so the client re-issues a GET.
pub async fn submit(
    State(state): State<AppState>,
    intent: RequestIntent,
    Submission(form): Submission<ContactForm>,
) -> Result<Response, AppError> {
    if let Err(errors) = form.validate() {
        tracing::debug!(errors = errors.len(), "Contact form rejected");
        let page = Page::new("Contact").with_errors(&errors);
        return Ok(state.inertia.render(&intent, page).await?);
    }

    tracing::info!(
        name = %form.name.trim(),
        email = %form.email.trim(),
        message_chars = form.message.chars().count(),
        "Contact message received"
    );
    Ok(Redirect::to("/contact").into_response())
}
