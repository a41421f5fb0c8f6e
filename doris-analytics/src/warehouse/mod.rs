mod mysql;

#[cfg(test)]
pub mod memory;

pub use mysql::MySqlWarehouse;

use crate::dimension::Dimension;
use crate::params::{DateRange, OfferFilter};
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WarehouseError {
    #[error("cannot connect to warehouse: {0}")]
    Connect(String),

    // driver text, surfaced to callers unchanged
    #[error("{0}")]
    Query(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct RawRow {
    pub dt: String,
    pub offer_id: Option<String>,
    pub publisher: Option<String>,
    pub bundle: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub ad_type: Option<String>,
    pub bid_floor: Option<f64>,
    pub clicks: Option<i64>,
    pub installs: Option<i64>,
    pub events: Option<i64>,
    pub revenues: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, sqlx::FromRow)]
pub struct MetricTotals {
    pub clicks: i64,
    pub installs: i64,
    pub events: i64,
    pub revenues: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct AggregatedRow {
    pub dimension_key: Option<String>,
    pub clicks: i64,
    pub installs: i64,
    pub events: i64,
    pub revenues: f64,
}

#[async_trait]
pub trait Warehouse: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn WarehouseSession>, WarehouseError>;
}

#[async_trait]
pub trait WarehouseSession: Send {
    async fn raw_rows(&mut self, days: i64, limit: i64) -> Result<Vec<RawRow>, WarehouseError>;

    async fn summary(
        &mut self,
        range: &DateRange,
        offer: &OfferFilter,
    ) -> Result<MetricTotals, WarehouseError>;

    async fn aggregated(
        &mut self,
        dimension: Dimension,
        range: &DateRange,
        offer: &OfferFilter,
        limit: i64,
    ) -> Result<Vec<AggregatedRow>, WarehouseError>;

    async fn offer_ids(&mut self, range: &DateRange) -> Result<Vec<String>, WarehouseError>;

    /// Releases the underlying connection. Safe to call more than once.
    async fn close(&mut self);
}
