use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use vendor_smart::catalog::Catalog;
use vendor_smart::config::CatalogConfig;
use vendor_smart::error::AppError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads the reference catalog, applying a CLI override of the data directory.
pub(crate) fn load_catalog(
    config: &mut CatalogConfig,
    data_dir: Option<&Path>,
) -> Result<Catalog, AppError> {
    if let Some(dir) = data_dir {
        config.data_dir = dir.to_path_buf();
    }
    let catalog = Catalog::from_paths(config.locations_path(), config.services_path())?;
    Ok(catalog)
}
