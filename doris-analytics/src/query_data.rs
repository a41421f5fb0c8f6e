use crate::api::Envelope;
use crate::error::ApiError;
use crate::params::{first_value, int_or, DEFAULT_DAYS};
use crate::state::AppState;
use crate::warehouse::RawRow;
use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;
use tracing::{debug, info};

// Keeps the dashboard from loading an unbounded table into the browser
pub const DEFAULT_DATA_LIMIT: i64 = 5000;

#[derive(Debug, Default)]
pub struct DataParams {
    pub days: Option<String>,
    pub limit: Option<String>,
}

impl DataParams {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        DataParams {
            days: first_value(pairs, "days"),
            limit: first_value(pairs, "limit"),
        }
    }
}

pub async fn query_data_handler(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Envelope<Vec<RawRow>>>, ApiError> {
    // Raw key/value pairs so repeated or odd keys never reject the request.
    // The window runs on the warehouse clock and `days` is not clamped here.
    let params = DataParams::from_pairs(&pairs);
    let days = int_or(params.days.as_deref(), DEFAULT_DAYS);
    let limit = int_or(params.limit.as_deref(), DEFAULT_DATA_LIMIT);
    debug!("Received query_data request: days={} limit={}", days, limit);

    let mut session = state.warehouse.connect().await?;
    let rows = session.raw_rows(days, limit).await;
    session.close().await;
    let rows = rows?;

    info!("Returning {} raw row(s)", rows.len());
    let total = rows.len();
    Ok(Json(Envelope::ok(rows, total, &state.source)))
}
