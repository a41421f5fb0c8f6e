use super::{AggregatedRow, MetricTotals, RawRow, Warehouse, WarehouseError, WarehouseSession};
use crate::config::WarehouseConfig;
use crate::dimension::Dimension;
use crate::params::{DateRange, OfferFilter};
use crate::sql::{self, SqlParam, Statement};
use async_trait::async_trait;
use sqlx::mysql::{MySqlArguments, MySqlConnectOptions, MySqlRow};
use sqlx::query::QueryAs;
use sqlx::{Connection, FromRow, MySql, MySqlConnection};
use tracing::{debug, error, warn};

// One connection per session, no pool
pub struct MySqlWarehouse {
    options: MySqlConnectOptions,
    endpoint: String,
}

impl MySqlWarehouse {
    pub fn new(cfg: &WarehouseConfig) -> Self {
        // Doris rejects several of the session variables sqlx sets by default
        let options = MySqlConnectOptions::new()
            .host(&cfg.host)
            .port(cfg.port)
            .username(&cfg.user)
            .password(&cfg.password)
            .database(sql::DATABASE)
            .charset("utf8mb4")
            .pipes_as_concat(false)
            .no_engine_substitution(false)
            .timezone(None::<String>);
        MySqlWarehouse {
            options,
            endpoint: format!("{}:{}", cfg.host, cfg.port),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Warehouse for MySqlWarehouse {
    async fn connect(&self) -> Result<Box<dyn WarehouseSession>, WarehouseError> {
        debug!("Connecting to Doris at {}", self.endpoint);
        match MySqlConnection::connect_with(&self.options).await {
            Ok(conn) => Ok(Box::new(MySqlSession { conn: Some(conn) })),
            Err(e) => {
                error!("Error connecting to Doris at {}: {}", self.endpoint, e);
                Err(WarehouseError::Connect(e.to_string()))
            }
        }
    }
}

struct MySqlSession {
    conn: Option<MySqlConnection>,
}

impl MySqlSession {
    async fn fetch_all<O>(&mut self, stmt: &Statement) -> Result<Vec<O>, WarehouseError>
    where
        O: for<'r> FromRow<'r, MySqlRow> + Send + Unpin,
    {
        let conn = self
            .conn
            .as_mut()
            .ok_or_else(|| WarehouseError::Query("session already closed".into()))?;
        debug!(
            "Executing query: {} with {} param(s)",
            stmt.sql,
            stmt.params.len()
        );
        bind_all(sqlx::query_as::<_, O>(&stmt.sql), &stmt.params)
            .fetch_all(conn)
            .await
            .map_err(|e| {
                error!("Query error: {}", e);
                WarehouseError::Query(e.to_string())
            })
    }
}

fn bind_all<'q, O>(
    mut query: QueryAs<'q, MySql, O, MySqlArguments>,
    params: &'q [SqlParam],
) -> QueryAs<'q, MySql, O, MySqlArguments> {
    for param in params {
        query = match param {
            SqlParam::Text(v) => query.bind(v.as_str()),
            SqlParam::Int(v) => query.bind(*v),
        };
    }
    query
}

#[async_trait]
impl WarehouseSession for MySqlSession {
    async fn raw_rows(&mut self, days: i64, limit: i64) -> Result<Vec<RawRow>, WarehouseError> {
        self.fetch_all(&sql::raw_rows(days, limit)).await
    }

    async fn summary(
        &mut self,
        range: &DateRange,
        offer: &OfferFilter,
    ) -> Result<MetricTotals, WarehouseError> {
        let rows: Vec<MetricTotals> = self.fetch_all(&sql::summary(range, offer)).await?;
        // an ungrouped SUM always yields one row; be lenient if the driver says otherwise
        Ok(rows.into_iter().next().unwrap_or_default())
    }

    async fn aggregated(
        &mut self,
        dimension: Dimension,
        range: &DateRange,
        offer: &OfferFilter,
        limit: i64,
    ) -> Result<Vec<AggregatedRow>, WarehouseError> {
        self.fetch_all(&sql::aggregated(dimension, range, offer, limit))
            .await
    }

    async fn offer_ids(&mut self, range: &DateRange) -> Result<Vec<String>, WarehouseError> {
        let rows: Vec<OfferIdRow> = self.fetch_all(&sql::offer_ids(range)).await?;
        Ok(rows.into_iter().filter_map(|r| r.offer_id).collect())
    }

    async fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err(e) = conn.close().await {
                warn!("Failed to close Doris connection cleanly: {}", e);
            }
        }
    }
}

#[derive(FromRow)]
struct OfferIdRow {
    offer_id: Option<String>,
}
