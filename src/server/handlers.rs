//! HTTP handlers
//!
//! Every handler answers 200 with JSON. Failures to assemble a body are
//! reported as `{"error": message}`.

use super::chain::{build_chain_info, build_mtls_info};
use crate::config::ServerSettings;
use axum::{extract::State, http::HeaderMap, Json};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt::Display;
use std::sync::Arc;

/// Header carrying the proxy's client certificate verification result
pub const CLIENT_VERIFY_HEADER: &str = "x-ssl-client-verify";
/// Header carrying the verified client certificate's subject DN
pub const CLIENT_DN_HEADER: &str = "x-ssl-client-dn";

/// Liveness response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
}

pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

pub async fn cert_info(State(settings): State<Arc<ServerSettings>>) -> Json<Value> {
    Json(into_body(build_chain_info(&settings).await))
}

pub async fn mtls(State(settings): State<Arc<ServerSettings>>, headers: HeaderMap) -> Json<Value> {
    let verify = header_value(&headers, CLIENT_VERIFY_HEADER);
    let dn = header_value(&headers, CLIENT_DN_HEADER);
    Json(into_body(build_mtls_info(&settings, verify, dn)))
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn into_body<T: Serialize, E: Display>(result: Result<T, E>) -> Value {
    let value = result
        .map_err(|e| e.to_string())
        .and_then(|body| serde_json::to_value(body).map_err(|e| e.to_string()));

    match value {
        Ok(body) => body,
        Err(message) => {
            tracing::error!("{}", message);
            json!({ "error": message })
        }
    }
}
