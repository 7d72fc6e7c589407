use crate::cli::ServeArgs;
use crate::infra::{build_cors_layer, AppState};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use statin_advisor::config::AppConfig;
use statin_advisor::error::AppError;
use statin_advisor::evaluation::{PolicySource, PolicyStore};
use statin_advisor::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(path) = args.policy.take() {
        config.policy = PolicySource::File(path);
    }

    telemetry::init(&config.telemetry)?;

    // Refuse to serve without a valid threshold set.
    let store = Arc::new(PolicyStore::load(config.policy.clone())?);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = with_service_routes(store.clone())
        .layer(Extension(app_state))
        .layer(prometheus_layer)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&config.server));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        policy_version = %store.snapshot().version,
        "statin recommendation service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
