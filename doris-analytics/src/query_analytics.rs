use crate::api::Envelope;
use crate::dimension::Dimension;
use crate::error::ApiError;
use crate::params::{first_value, int_or, resolve_date_range, DateRange, OfferFilter};
use crate::state::AppState;
use crate::warehouse::{AggregatedRow, MetricTotals, WarehouseError, WarehouseSession};
use axum::{
    extract::{rejection::PathRejection, Path, Query, State},
    http::Uri,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_ANALYTICS_LIMIT: i64 = 500;

#[derive(Debug, Default)]
pub struct AnalyticsParams {
    pub start: Option<String>,
    pub end: Option<String>,
    pub days: Option<String>,
    pub offer_id: Option<String>,
    pub limit: Option<String>,
}

impl AnalyticsParams {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        AnalyticsParams {
            start: first_value(pairs, "start"),
            end: first_value(pairs, "end"),
            days: first_value(pairs, "days"),
            offer_id: first_value(pairs, "offer_id"),
            limit: first_value(pairs, "limit"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DimensionReport {
    pub dimension: &'static str,
    pub date_range: DateRange,
    pub summary: MetricTotals,
    pub aggregated: Vec<AggregatedRow>,
    pub offer_ids: Vec<String>,
}

pub async fn query_analytics_handler(
    State(state): State<Arc<AppState>>,
    dimension: Result<Path<String>, PathRejection>,
    uri: Uri,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Envelope<DimensionReport>>, ApiError> {
    // A segment that does not decode is still just an unknown dimension
    let dimension = match dimension {
        Ok(Path(d)) => d,
        Err(_) => raw_last_segment(&uri),
    };
    let params = AnalyticsParams::from_pairs(&pairs);
    debug!("Received query_analytics request for dimension '{}'", dimension);

    let dimension = match Dimension::from_name(&dimension) {
        Some(d) => d,
        None => {
            warn!("Unsupported dimension: {}", dimension);
            return Err(ApiError::UnsupportedDimension(dimension));
        }
    };

    let range = resolve_date_range(
        params.start.as_deref(),
        params.end.as_deref(),
        params.days.as_deref(),
        chrono::Utc::now().date_naive(),
    );
    let offer = OfferFilter::from_param(params.offer_id.as_deref());
    let limit = int_or(params.limit.as_deref(), DEFAULT_ANALYTICS_LIMIT);
    debug!(
        "Resolved range {}..{}, offer filter {:?}, limit {}",
        range.start,
        range.end,
        offer.offer_id(),
        limit
    );

    let mut session = state.warehouse.connect().await?;
    let report = build_report(session.as_mut(), dimension, range, &offer, limit).await;
    session.close().await;
    let report = report?;

    info!(
        "Aggregated {} group(s) by {} for {}..{}",
        report.aggregated.len(),
        dimension.name(),
        report.date_range.start,
        report.date_range.end
    );
    let total = report.aggregated.len();
    Ok(Json(Envelope::ok(report, total, &state.source)))
}

fn raw_last_segment(uri: &Uri) -> String {
    uri.path().rsplit('/').next().unwrap_or_default().to_string()
}

async fn build_report(
    session: &mut dyn WarehouseSession,
    dimension: Dimension,
    range: DateRange,
    offer: &OfferFilter,
    limit: i64,
) -> Result<DimensionReport, WarehouseError> {
    let summary = session.summary(&range, offer).await?;
    let aggregated = session.aggregated(dimension, &range, offer, limit).await?;
    // Unfiltered on purpose: this list feeds the offer selector
    let offer_ids = session.offer_ids(&range).await?;
    Ok(DimensionReport {
        dimension: dimension.name(),
        date_range: range,
        summary,
        aggregated,
        offer_ids,
    })
}
