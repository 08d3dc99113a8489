//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum router with a single fallback handler
//! - Strip the web root and hand the rest of the URI to the resolver
//! - Map outcomes to 301/302 + Location, 404, or the JSON view descriptor
//! - Bind server to listener with graceful shutdown

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::routing::{Outcome, Router as UrlRouter};
use crate::sitemap::SitemapStore;

/// Header carrying the robots directive of the resolved view.
pub const X_ROBOTS_TAG: &str = "x-robots-tag";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<UrlRouter<Arc<SitemapStore>>>,
}

/// Body sent with a 404.
#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct NotFoundBody<'a> {
    view: &'a str,
    language: &'a str,
}

/// HTTP front for the URL resolver.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server resolving through `router`.
    pub fn new(router: Arc<UrlRouter<Arc<SitemapStore>>>) -> Self {
        Self {
            router: Self::build_router(AppState { router }),
        }
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(state: AppState) -> Router {
        Router::new()
            .fallback(resolve_handler)
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// The Axum router, for embedding or testing.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Resolve every request through the sitemap router.
async fn resolve_handler(State(state): State<AppState>, uri: Uri) -> Response {
    let settings = state.router.settings();
    let path = uri.path();

    let Some(relative) = path.strip_prefix(settings.web_root.as_str()).or_else(|| {
        // "/site" addresses the root of web root "/site/".
        (format!("{path}/") == settings.web_root).then_some("")
    }) else {
        tracing::debug!(path = %path, "Request outside web root");
        return outcome_response(
            &state,
            Outcome::NotFound {
                language: settings.default_language().to_string(),
            },
        );
    };

    let request = match uri.query() {
        Some(query) => format!("/{relative}?{query}"),
        None => format!("/{relative}"),
    };

    let outcome = state.router.resolve(&request);
    outcome_response(&state, outcome)
}

fn outcome_response(state: &AppState, outcome: Outcome) -> Response {
    match outcome {
        Outcome::RedirectPermanent { url } => redirect(StatusCode::MOVED_PERMANENTLY, &url),
        Outcome::RedirectTemporary { url } => redirect(StatusCode::FOUND, &url),
        Outcome::NotFound { language } => {
            let body = NotFoundBody {
                view: &state.router.settings().not_found_view,
                language: &language,
            };
            (StatusCode::NOT_FOUND, Json(body)).into_response()
        }
        Outcome::View(descriptor) => {
            let robots = (!descriptor.robots.is_empty())
                .then(|| HeaderValue::from_str(&descriptor.robots).ok())
                .flatten();
            let mut response = Json(descriptor).into_response();
            if let Some(robots) = robots {
                response.headers_mut().insert(X_ROBOTS_TAG, robots);
            }
            response
        }
    }
}

fn redirect(status: StatusCode, url: &str) -> Response {
    match HeaderValue::from_str(url) {
        Ok(location) => (status, [(header::LOCATION, location)]).into_response(),
        Err(_) => {
            tracing::error!(url = %url, "Redirect target is not a valid header value");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
