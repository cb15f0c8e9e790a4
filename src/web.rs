use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;

use crate::api::{self, ApiState};
use crate::config::AquaScopeConfig;

/// API under `/api`, static front end for everything else
pub fn app_router(state: ApiState, config: &AquaScopeConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_upload = config.identify.max_upload_bytes;
    let timeout = config.request_timeout();

    Router::new()
        .nest("/api", api::router(state, max_upload))
        .fallback_service(ServeDir::new(&config.server.static_dir))
        // multipart framing on top of the largest accepted image
        .layer(RequestBodyLimitLayer::new(max_upload + 64 * 1024))
        .layer(TimeoutLayer::new(timeout))
        .layer(cors)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
    }
    tracing::info!("Shutdown signal received");
}

pub async fn run(config: &AquaScopeConfig, state: ApiState) -> Result<()> {
    let app = app_router(state, config);
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| "Invalid server address")?;

    if let Some(tls) = &config.server.tls {
        return serve_tls(addr, app, &tls.cert_path, &tls.key_path).await;
    }

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .with_context(|| "Web server failed")?;
    Ok(())
}

#[cfg(feature = "tls")]
async fn serve_tls(
    addr: SocketAddr,
    app: Router,
    cert_path: &std::path::Path,
    key_path: &std::path::Path,
) -> Result<()> {
    use axum_server::tls_rustls::RustlsConfig;

    let rustls = RustlsConfig::from_pem_file(cert_path, key_path)
        .await
        .with_context(|| "Failed to load TLS certificate or key")?;

    let handle = axum_server::Handle::new();
    let shutdown = handle.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.graceful_shutdown(Some(std::time::Duration::from_secs(10)));
    });

    tracing::info!("Web server running at https://{}", addr);
    axum_server::bind_rustls(addr, rustls)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .with_context(|| "Web server failed")?;
    Ok(())
}

#[cfg(not(feature = "tls"))]
async fn serve_tls(
    _addr: SocketAddr,
    _app: Router,
    _cert_path: &std::path::Path,
    _key_path: &std::path::Path,
) -> Result<()> {
    anyhow::bail!("TLS configured but aquascope was built without the `tls` feature")
}
