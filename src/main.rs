use axum::{Router, http::header};
use gathrfi::api::{handlers::api_routes, openapi::ApiDoc};
use gathrfi::config::CONFIG;
use gathrfi::core::services::GathrfiService;
use gathrfi::infrastructure::{
    cache::in_memory::InMemoryCache,
    chain::{ChainClient, rpc::JsonRpcClient},
    notify::in_memory::InMemoryNotifier,
    poller::BalancePoller,
    wallet::{WalletProvider, relay::RelayWallet},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&CONFIG.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    info!("Starting with {:?}", *CONFIG);

    let settings = CONFIG.service.clone();
    let chain: Arc<dyn ChainClient> = Arc::new(JsonRpcClient::new(settings.network.rpc_url.clone())?);
    let wallet: Arc<dyn WalletProvider> = Arc::new(RelayWallet::new(CONFIG.wallet_url.clone())?);
    let gathrfi = Arc::new(GathrfiService::new(
        chain,
        wallet,
        InMemoryNotifier::new(),
        InMemoryCache::new(),
        settings,
    ));
    let _poller = BalancePoller::spawn(gathrfi.clone(), CONFIG.balance_poll_interval);

    let app = Router::new()
        .nest("/api", api_routes(gathrfi))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CompressionLayer::new()) // Gzip compression
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([http::Method::GET, http::Method::POST])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([127, 0, 0, 1], CONFIG.port));
    info!("Server running at http://{}", addr);
    info!("Swagger UI at http://{}/swagger-ui", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
