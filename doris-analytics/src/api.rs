pub use crate::query_analytics::query_analytics_handler;
pub use crate::query_data::query_data_handler;

use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub const SUCCESS: &str = "success";

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub code: u16,
    pub message: &'static str,
    pub data: T,
    pub meta: Meta,
}

#[derive(Debug, Serialize)]
pub struct Meta {
    pub total_rows: usize,
    pub source: String,
}

impl<T> Envelope<T> {
    pub fn ok(data: T, total_rows: usize, source: &str) -> Self {
        Envelope {
            code: 200,
            message: SUCCESS,
            data,
            meta: Meta {
                total_rows,
                source: source.to_string(),
            },
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    // The dashboard is served from a different origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/data", get(query_data_handler))
        .route("/api/analytics/:dimension", get(query_analytics_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    // Liveness only. Never touches the warehouse.
    Json(json!({ "status": "ok", "service": state.service_name }))
}
