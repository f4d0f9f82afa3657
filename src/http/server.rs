//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with page and API handlers
//! - Serve built assets in production mode
//! - Wire up middleware (tracing, limits, timeout, request ID)
//! - Bind server to listener and shut down gracefully

use axum::body::Body;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::app::users::UserDirectory;
use crate::config::{Mode, ServerConfig};
use crate::http::request::{make_span, propagate_request_id, set_request_id};
use crate::inertia::Inertia;
use crate::lifecycle::shutdown::ShutdownSignal;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub inertia: Arc<Inertia>,
    pub users: Arc<UserDirectory>,
}

impl AppState {
    pub fn new(inertia: Inertia, users: UserDirectory) -> Self {
        Self {
            inertia: Arc::new(inertia),
            users: Arc::new(users),
        }
    }
}

/// HTTP server for the application.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let mut router = crate::app::routes().with_state(state);

        if config.inertia.mode == Mode::Production {
            let assets = config.inertia.assets_path_on_disk();
            tracing::info!(
                path = %config.inertia.assets_path,
                dir = %assets.display(),
                "Serving built assets"
            );
            router = router.nest_service(&config.inertia.assets_path, ServeDir::new(assets));
        }

        // Outermost first: the request id exists before the span opens.
        router.layer(
            ServiceBuilder::new()
                .layer(set_request_id())
                .layer(propagate_request_id())
                .layer(TraceLayer::new_for_http().make_span_with(make_span::<Body>))
                .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
                .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
        )
    }

    /// The fully layered router, e.g. for driving with `tower::ServiceExt`.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mode = ?self.config.inertia.mode,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.wait().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

}
