//! HTTP server for the Prometheus metrics endpoint.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use tokio::sync::watch;
use tracing::info;

use unifi_exporter_core::Exporter;
use unifi_exporter_core::expose::CONTENT_TYPE;

use crate::error::CliError;

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    exporter: Arc<Exporter>,
    landing: Arc<str>,
}

fn landing_page(metrics_path: &str) -> String {
    format!(
        "<html>\n\
         <head><title>UniFi Exporter</title></head>\n\
         <body>\n\
         <h1>UniFi Exporter</h1>\n\
         <p><a href=\"{metrics_path}\">Metrics</a></p>\n\
         </body>\n\
         </html>\n"
    )
}

/// Create the HTTP router.
fn create_router(exporter: Arc<Exporter>, metrics_path: &str) -> Router {
    let state = AppState {
        exporter,
        landing: landing_page(metrics_path).into(),
    };

    Router::new()
        .route(metrics_path, get(metrics_handler))
        .route("/health", get(health_handler))
        .route("/", get(index_handler))
        .with_state(state)
}

/// Every request runs a fresh scrape against the controller.
async fn metrics_handler(State(state): State<AppState>) -> Response {
    let body = state.exporter.scrape().await.render();

    (StatusCode::OK, [(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response()
}

async fn health_handler() -> Response {
    (StatusCode::OK, "healthy\n").into_response()
}

async fn index_handler(State(state): State<AppState>) -> Html<String> {
    Html(state.landing.to_string())
}

/// HTTP server configuration.
pub struct HttpServer {
    exporter: Arc<Exporter>,
    listen_addr: SocketAddr,
    metrics_path: String,
}

impl HttpServer {
    pub fn new(exporter: Arc<Exporter>, listen_addr: SocketAddr, metrics_path: String) -> Self {
        Self {
            exporter,
            listen_addr,
            metrics_path,
        }
    }

    /// Run the HTTP server until the shutdown signal is received.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> Result<(), CliError> {
        let router = create_router(self.exporter, &self.metrics_path);

        let listener = tokio::net::TcpListener::bind(self.listen_addr)
            .await
            .map_err(|source| CliError::Bind {
                addr: self.listen_addr.to_string(),
                source,
            })?;

        info!(
            addr = %self.listen_addr,
            path = %self.metrics_path,
            "HTTP server listening"
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                while shutdown.changed().await.is_ok() {
                    if *shutdown.borrow() {
                        break;
                    }
                }
                info!("HTTP server shutting down");
            })
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        info!("HTTP server stopped");
        Ok(())
    }
}
