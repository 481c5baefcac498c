//! # HTTP Server
//!
//! Combines the student and health routers behind CORS and request tracing.

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::config::HttpServerConfig;
use super::health_routes::health_routes;
use super::student_routes::{student_routes, StudentState};
use crate::student::StudentService;

/// HTTP server for the student API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server around an assembled student service
    pub fn new(config: HttpServerConfig, service: Arc<StudentService>) -> Self {
        let router = build_router(&config, service);
        Self { config, router }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until Ctrl-C
    pub async fn start(self) -> Result<(), std::io::Error> {
        let listener = TcpListener::bind(self.config.socket_addr()).await?;
        let addr = listener.local_addr()?;
        info!(%addr, "student API listening");
        info!("  POST   /api/students/insert");
        info!("  GET    /api/students/fetch");
        info!("  GET    /api/students/search?name=");
        info!("  PUT    /api/students/:id");
        info!("  DELETE /api/students/:id");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("student API stopped");
        Ok(())
    }
}

/// Build the combined router with all endpoints
pub fn build_router(config: &HttpServerConfig, service: Arc<StudentService>) -> Router {
    let student_state = Arc::new(StudentState::new(service));

    Router::new()
        .merge(health_routes())
        .nest("/api/students", student_routes(student_state))
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let allowed: Vec<_> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring unparsable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "could not listen for Ctrl-C; serving until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
