use menugate::api::{AppState, MgmtState};
use menugate::config::Config;
use menugate::services::authorization::AuthorizationService;
use menugate::services::health::HealthService;
use menugate::services::refresh::RefreshService;
use menugate::{api, clients, telemetry};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load();
    telemetry::init_telemetry(&config.telemetry)?;

    menugate::setup_panic_hook();

    // Phase 1: Collaborator clients
    let http = clients::http_client(Duration::from_secs(config.backend.request_timeout_secs))?;
    let auth_api: Arc<dyn clients::auth::AuthApi> =
        Arc::new(clients::auth::HttpAuthApi::new(http.clone(), &config.backend.base_url));
    let directory: Arc<dyn clients::business::BusinessDirectory> =
        Arc::new(clients::business::HttpBusinessDirectory::new(http.clone(), &config.backend.base_url));

    // Phase 2: Component wiring
    let refresh_service = RefreshService::new(auth_api);
    let authorization_service = AuthorizationService::new(
        directory,
        Duration::from_secs(config.backend.authorization_cache_ttl_secs),
    );
    let health_service = HealthService::new(http, &config.backend.base_url);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    menugate::spawn_signal_handler(shutdown_tx);

    let state = AppState { config: config.clone(), refresh_service, authorization_service };
    let app_router = api::app_router(state);
    let mgmt_app = api::mgmt_router(MgmtState { health_service });

    // Phase 3: Listeners
    let api_addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let mgmt_addr: SocketAddr = format!("{}:{}", config.server.host, config.server.mgmt_port).parse()?;

    tracing::info!(address = %api_addr, "listening");
    tracing::info!(address = %mgmt_addr, "management server listening");

    let api_listener = tokio::net::TcpListener::bind(api_addr).await?;
    let mgmt_listener = tokio::net::TcpListener::bind(mgmt_addr).await?;

    // Phase 4: Serve until shutdown
    let mut api_rx = shutdown_rx.clone();
    let api_server = axum::serve(api_listener, app_router).with_graceful_shutdown(async move {
        let _ = api_rx.wait_for(|&s| s).await;
    });

    let mut mgmt_rx = shutdown_rx;
    let mgmt_server = axum::serve(mgmt_listener, mgmt_app).with_graceful_shutdown(async move {
        let _ = mgmt_rx.wait_for(|&s| s).await;
    });

    if let Err(e) = tokio::try_join!(api_server, mgmt_server) {
        tracing::error!(error = %e, "Server error");
    }

    Ok(())
}
