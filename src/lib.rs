//! Server-driven page rendering with JSON partial navigation.

pub mod app;
pub mod client;
pub mod config;
pub mod http;
pub mod inertia;
pub mod lifecycle;
pub mod observability;

pub use client::{Navigator, Visit};
pub use config::schema::ServerConfig;
pub use http::{AppState, HttpServer};
pub use inertia::{Inertia, Page, PageObject, Props, RequestIntent};
pub use lifecycle::Shutdown;
