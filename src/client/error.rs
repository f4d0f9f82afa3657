use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("malformed page object: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("document at {url} carries no page object")]
    MissingPageData { url: String },

    #[error("unexpected response {status}: {body}")]
    UnexpectedResponse { status: StatusCode, body: String },

    #[error("navigation task failed: {0}")]
    Task(String),
}
