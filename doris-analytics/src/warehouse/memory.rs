use super::{AggregatedRow, MetricTotals, RawRow, Warehouse, WarehouseError, WarehouseSession};
use crate::dimension::Dimension;
use crate::params::{DateRange, OfferFilter};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct FactRow {
    pub dt: String,
    pub offer_id: String,
    pub publisher: String,
    pub bundle: String,
    pub brand: String,
    pub model: String,
    pub ad_type: String,
    pub bid_floor: f64,
    pub clicks: i64,
    pub installs: i64,
    pub events: i64,
    pub revenues: f64,
}

impl FactRow {
    pub fn new(dt: &str, offer_id: &str, publisher: &str, clicks: i64) -> Self {
        FactRow {
            dt: dt.into(),
            offer_id: offer_id.into(),
            publisher: publisher.into(),
            bundle: "com.game.rpg".into(),
            brand: "Apple".into(),
            model: "iPhone 14 Pro".into(),
            ad_type: "Banner".into(),
            bid_floor: 0.5,
            clicks,
            installs: clicks / 10,
            events: clicks / 100,
            revenues: clicks as f64 / 100.0,
        }
    }

    fn key(&self, dimension: Dimension) -> String {
        match dimension {
            Dimension::Publisher => self.publisher.clone(),
            Dimension::Bundle => self.bundle.clone(),
            Dimension::Brand => self.brand.clone(),
            Dimension::Model => self.model.clone(),
            Dimension::AdType => self.ad_type.clone(),
            Dimension::BidFloor => self.bid_floor.to_string(),
        }
    }

    fn in_range(&self, range: &DateRange) -> bool {
        self.dt.as_str() >= range.start.as_str() && self.dt.as_str() <= range.end.as_str()
    }
}

// Counts sessions so tests can assert every opened connection was closed
#[derive(Debug, Default)]
pub struct SessionLog {
    pub opened: AtomicUsize,
    pub closed: AtomicUsize,
}

impl SessionLog {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct MemoryWarehouse {
    rows: Arc<Vec<FactRow>>,
    refuse_connections: bool,
    query_failure: Option<String>,
    pub log: Arc<SessionLog>,
}

impl MemoryWarehouse {
    pub fn with_rows(rows: Vec<FactRow>) -> Self {
        MemoryWarehouse {
            rows: Arc::new(rows),
            ..Default::default()
        }
    }

    pub fn unreachable() -> Self {
        MemoryWarehouse {
            refuse_connections: true,
            ..Default::default()
        }
    }

    pub fn failing_queries(message: &str) -> Self {
        MemoryWarehouse {
            query_failure: Some(message.to_string()),
            ..Default::default()
        }
    }
}

#[async_trait]
impl Warehouse for MemoryWarehouse {
    async fn connect(&self) -> Result<Box<dyn WarehouseSession>, WarehouseError> {
        if self.refuse_connections {
            return Err(WarehouseError::Connect("connection refused".into()));
        }
        self.log.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemorySession {
            rows: self.rows.clone(),
            query_failure: self.query_failure.clone(),
            log: self.log.clone(),
            open: true,
        }))
    }
}

struct MemorySession {
    rows: Arc<Vec<FactRow>>,
    query_failure: Option<String>,
    log: Arc<SessionLog>,
    open: bool,
}

impl MemorySession {
    fn check(&self) -> Result<(), WarehouseError> {
        if !self.open {
            return Err(WarehouseError::Query("session already closed".into()));
        }
        match &self.query_failure {
            Some(msg) => Err(WarehouseError::Query(msg.clone())),
            None => Ok(()),
        }
    }

    fn matching<'a>(
        &'a self,
        range: &'a DateRange,
        offer: &'a OfferFilter,
    ) -> impl Iterator<Item = &'a FactRow> + 'a {
        self.rows.iter().filter(move |r| {
            r.in_range(range) && offer.offer_id().map_or(true, |id| r.offer_id == id)
        })
    }
}

#[async_trait]
impl WarehouseSession for MemorySession {
    async fn raw_rows(&mut self, days: i64, limit: i64) -> Result<Vec<RawRow>, WarehouseError> {
        self.check()?;
        let cutoff = (chrono::Utc::now().date_naive() - chrono::Duration::days(days)).to_string();
        Ok(self
            .rows
            .iter()
            .filter(|r| r.dt >= cutoff)
            .take(limit.max(0) as usize)
            .map(|r| RawRow {
                dt: r.dt.clone(),
                offer_id: Some(r.offer_id.clone()),
                publisher: Some(r.publisher.clone()),
                bundle: Some(r.bundle.clone()),
                brand: Some(r.brand.clone()),
                model: Some(r.model.clone()),
                ad_type: Some(r.ad_type.clone()),
                bid_floor: Some(r.bid_floor),
                clicks: Some(r.clicks),
                installs: Some(r.installs),
                events: Some(r.events),
                revenues: Some(r.revenues),
            })
            .collect())
    }

    async fn summary(
        &mut self,
        range: &DateRange,
        offer: &OfferFilter,
    ) -> Result<MetricTotals, WarehouseError> {
        self.check()?;
        Ok(self
            .matching(range, offer)
            .fold(MetricTotals::default(), |mut acc, r| {
                acc.clicks += r.clicks;
                acc.installs += r.installs;
                acc.events += r.events;
                acc.revenues += r.revenues;
                acc
            }))
    }

    async fn aggregated(
        &mut self,
        dimension: Dimension,
        range: &DateRange,
        offer: &OfferFilter,
        limit: i64,
    ) -> Result<Vec<AggregatedRow>, WarehouseError> {
        self.check()?;
        let mut groups: BTreeMap<String, MetricTotals> = BTreeMap::new();
        for r in self.matching(range, offer) {
            let acc = groups.entry(r.key(dimension)).or_default();
            acc.clicks += r.clicks;
            acc.installs += r.installs;
            acc.events += r.events;
            acc.revenues += r.revenues;
        }
        let mut rows: Vec<AggregatedRow> = groups
            .into_iter()
            .map(|(key, t)| AggregatedRow {
                dimension_key: Some(key),
                clicks: t.clicks,
                installs: t.installs,
                events: t.events,
                revenues: t.revenues,
            })
            .collect();
        rows.sort_by(|a, b| b.clicks.cmp(&a.clicks));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn offer_ids(&mut self, range: &DateRange) -> Result<Vec<String>, WarehouseError> {
        self.check()?;
        let ids: BTreeSet<String> = self
            .rows
            .iter()
            .filter(|r| r.in_range(range))
            .map(|r| r.offer_id.clone())
            .collect();
        Ok(ids.into_iter().collect())
    }

    async fn close(&mut self) {
        if self.open {
            self.open = false;
            self.log.closed.fetch_add(1, Ordering::SeqCst);
        }
    }
}
