use crate::cli::ServeArgs;
use crate::infra::{
    default_lending_policy, seed_accounts, seed_customers, AppState, InMemoryAccountStore,
    InMemoryCustomerStore, InMemoryLoanStore, LoggingNotificationSink,
};
use crate::routes::with_lending_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use teller::config::AppConfig;
use teller::error::AppError;
use teller::lending::LoanOriginationService;
use teller::telemetry;
use tracing::info;

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

    let customers = Arc::new(InMemoryCustomerStore::with_customers(seed_customers()));
    let accounts = Arc::new(InMemoryAccountStore::with_accounts(seed_accounts()));
    let loans = Arc::new(InMemoryLoanStore::default());
    let notices = Arc::new(LoggingNotificationSink::default());
    let origination_service = Arc::new(LoanOriginationService::new(
        customers,
        accounts,
        loans,
        notices,
        default_lending_policy(),
    ));

    let app = with_lending_routes(origination_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "loan origination backend ready");

    axum::serve(listener, app).await?;
    Ok(())
}
