//! Route table

use super::handlers;
use crate::config::ServerSettings;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod paths {
    pub const STATUS: &str = "/api/status";
    pub const CERT_INFO: &str = "/api/cert-info";
    pub const MTLS: &str = "/mtls";
}

/// Build the info server router
pub fn create_app(settings: ServerSettings) -> Router {
    Router::new()
        .route(paths::STATUS, get(handlers::status))
        .route(paths::CERT_INFO, get(handlers::cert_info))
        .route(paths::MTLS, get(handlers::mtls))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(settings))
}
