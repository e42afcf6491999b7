use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryMeasurementStore, InMemoryReferenceStore};
use crate::routes::with_delivery_routes;
use crate::seed;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

use courier_fees::config::AppConfig;
use courier_fees::error::AppError;
use courier_fees::pricing::DeliveryFeeService;
use courier_fees::telemetry;
use courier_fees::weather::{ObservationIngestor, ObservationsClient};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let reference = Arc::new(InMemoryReferenceStore::new(seed::reference_data()));
    let measurements = Arc::new(InMemoryMeasurementStore::default());
    let service = Arc::new(DeliveryFeeService::new(
        measurements.clone(),
        reference.clone(),
    ));

    let ingestor = ObservationIngestor::new(
        ObservationsClient::new(config.observations.feed_url.clone()),
        measurements,
        reference.station_codes(),
    );
    tokio::spawn(ingestor.run(config.observations.poll_interval()));

    let app = with_delivery_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "delivery fee service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
