use crate::warehouse::WarehouseError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Unsupported dimension: {0}")]
    UnsupportedDimension(String),

    #[error("Database connection failed")]
    ConnectionFailed,

    // Driver text is passed through unchanged.
    #[error("{0}")]
    Query(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UnsupportedDimension(_) => StatusCode::BAD_REQUEST,
            ApiError::ConnectionFailed | ApiError::Query(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<WarehouseError> for ApiError {
    fn from(e: WarehouseError) -> Self {
        match e {
            WarehouseError::Connect(_) => ApiError::ConnectionFailed,
            WarehouseError::Query(msg) => ApiError::Query(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "code": status.as_u16(),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}
