use crate::dimension::Dimension;
use crate::params::{DateRange, OfferFilter};

pub const DATABASE: &str = "pando";
pub const TABLE: &str = "click_postback_agg";

#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Int(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

// Cast every column so rows decode into one fixed shape
pub fn raw_rows(days: i64, limit: i64) -> Statement {
    let sql = format!(
        "SELECT \
            CAST(dt AS VARCHAR) AS dt, \
            CAST(offer_id AS VARCHAR) AS offer_id, \
            CAST(publisher AS VARCHAR) AS publisher, \
            CAST(bundle AS VARCHAR) AS bundle, \
            CAST(brand AS VARCHAR) AS brand, \
            CAST(model AS VARCHAR) AS model, \
            CAST(ad_type AS VARCHAR) AS ad_type, \
            CAST(bid_floor AS DOUBLE) AS bid_floor, \
            CAST(clicks AS BIGINT) AS clicks, \
            CAST(installs AS BIGINT) AS installs, \
            CAST(events AS BIGINT) AS events, \
            CAST(revenues AS DOUBLE) AS revenues \
         FROM {TABLE} \
         WHERE dt >= date_sub(current_date(), interval ? day) \
         LIMIT ?"
    );
    Statement {
        sql,
        params: vec![SqlParam::Int(days), SqlParam::Int(limit)],
    }
}

pub fn summary(range: &DateRange, offer: &OfferFilter) -> Statement {
    let sql = format!(
        "SELECT \
            CAST(COALESCE(SUM(clicks), 0) AS BIGINT) AS clicks, \
            CAST(COALESCE(SUM(installs), 0) AS BIGINT) AS installs, \
            CAST(COALESCE(SUM(events), 0) AS BIGINT) AS events, \
            CAST(COALESCE(SUM(revenues), 0) AS DOUBLE) AS revenues \
         FROM {TABLE} \
         WHERE dt >= ? AND dt <= ?{offer}",
        offer = offer.fragment(),
    );
    let mut params = range_params(range);
    params.extend(offer.params());
    Statement { sql, params }
}

/// Per-dimension totals, highest click count first.
pub fn aggregated(
    dimension: Dimension,
    range: &DateRange,
    offer: &OfferFilter,
    limit: i64,
) -> Statement {
    let column = dimension.column();
    let sql = format!(
        "SELECT \
            CAST({column} AS VARCHAR) AS dimension_key, \
            CAST(COALESCE(SUM(clicks), 0) AS BIGINT) AS clicks, \
            CAST(COALESCE(SUM(installs), 0) AS BIGINT) AS installs, \
            CAST(COALESCE(SUM(events), 0) AS BIGINT) AS events, \
            CAST(COALESCE(SUM(revenues), 0) AS DOUBLE) AS revenues \
         FROM {TABLE} \
         WHERE dt >= ? AND dt <= ?{offer} \
         GROUP BY {column} \
         ORDER BY SUM(clicks) DESC \
         LIMIT ?",
        offer = offer.fragment(),
    );
    let mut params = range_params(range);
    params.extend(offer.params());
    params.push(SqlParam::Int(limit));
    Statement { sql, params }
}

pub fn offer_ids(range: &DateRange) -> Statement {
    // sort on the native column so numeric ids keep numeric order
    let sql = format!(
        "SELECT CAST(ids.offer_id AS VARCHAR) AS offer_id \
         FROM (SELECT DISTINCT offer_id FROM {TABLE} WHERE dt >= ? AND dt <= ?) ids \
         ORDER BY ids.offer_id"
    );
    Statement {
        sql,
        params: range_params(range),
    }
}

fn range_params(range: &DateRange) -> Vec<SqlParam> {
    vec![
        SqlParam::Text(range.start.clone()),
        SqlParam::Text(range.end.clone()),
    ]
}
