use crate::cli::ServeArgs;
use crate::infra::{load_catalog, AppState};
use crate::routes::with_registry_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};
use vendor_smart::config::{AppConfig, AuthMode};
use vendor_smart::error::AppError;
use vendor_smart::registry::Registry;
use vendor_smart::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;
    config.auth.ensure_configured()?;

    // The catalog must be complete before anything can reach the registry.
    let catalog = load_catalog(&mut config.catalog, args.data_dir.as_deref())?;
    let registry = Arc::new(Registry::new(
        Arc::new(catalog),
        config.registry.job_id_policy,
    ));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    if matches!(config.auth, AuthMode::Disabled) {
        warn!("VS_AUTH_DISABLED is set; registry routes accept unauthenticated requests");
    }

    let app = with_registry_routes(registry, config.auth.clone())
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        job_id_policy = ?config.registry.job_id_policy,
        data_dir = %config.catalog.data_dir.display(),
        "vendor registry ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
