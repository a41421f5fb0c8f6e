use crate::config::{Config, DEFAULT_SERVICE_NAME, DEFAULT_SOURCE};
use crate::warehouse::{MySqlWarehouse, Warehouse};
use std::sync::Arc;
use tracing::{debug, info};

pub struct AppState {
    pub warehouse: Arc<dyn Warehouse>,
    pub service_name: String,
    // Written into `meta.source` of data responses
    pub source: String,
}

impl AppState {
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let warehouse = MySqlWarehouse::new(&cfg.warehouse);
        info!(
            "Registered Doris warehouse: endpoint='{}' user='{}'",
            warehouse.endpoint(),
            cfg.warehouse.user
        );

        let service_name = cfg
            .service_name
            .clone()
            .unwrap_or_else(|| DEFAULT_SERVICE_NAME.into());
        let source = cfg.source.clone().unwrap_or_else(|| DEFAULT_SOURCE.into());
        debug!("Service name: {}, response source: {}", service_name, source);

        Ok(AppState {
            warehouse: Arc::new(warehouse),
            service_name,
            source,
        })
    }

    pub fn with_warehouse(warehouse: Arc<dyn Warehouse>, service_name: &str, source: &str) -> Self {
        AppState {
            warehouse,
            service_name: service_name.to_string(),
            source: source.to_string(),
        }
    }
}
