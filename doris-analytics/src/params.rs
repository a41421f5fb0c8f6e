use crate::sql::SqlParam;
use chrono::{Days, NaiveDate};
use serde::Serialize;

pub const DEFAULT_DAYS: i64 = 7;

// sent by the dashboard when no offer is selected
pub const ALL_OFFERS: &str = "ALL";

pub fn int_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(default)
}

// Repeated keys keep their first value.
pub fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

pub fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// Explicit `start`/`end` win verbatim, otherwise the last `days` days
/// (at least one) ending on `today`.
pub fn resolve_date_range(
    start: Option<&str>,
    end: Option<&str>,
    days: Option<&str>,
    today: NaiveDate,
) -> DateRange {
    if let (Some(start), Some(end)) = (non_empty(start), non_empty(end)) {
        return DateRange {
            start: start.to_string(),
            end: end.to_string(),
        };
    }

    let days = int_or(days, DEFAULT_DAYS).max(1);
    let start = today
        .checked_sub_days(Days::new((days - 1) as u64))
        .unwrap_or(NaiveDate::MIN);
    DateRange {
        start: start.to_string(),
        end: today.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OfferFilter {
    offer_id: Option<String>,
}

impl OfferFilter {
    pub fn from_param(raw: Option<&str>) -> Self {
        let offer_id = non_empty(raw)
            .filter(|v| *v != ALL_OFFERS)
            .map(str::to_string);
        Self { offer_id }
    }

    pub fn offer_id(&self) -> Option<&str> {
        self.offer_id.as_deref()
    }

    // empty when unfiltered
    pub fn fragment(&self) -> &'static str {
        match self.offer_id {
            Some(_) => " AND offer_id = ?",
            None => "",
        }
    }

    pub fn params(&self) -> Vec<SqlParam> {
        self.offer_id
            .iter()
            .map(|id| SqlParam::Text(id.clone()))
            .collect()
    }
}
