use anyhow::Result;
use stakehouse_server::{build_router, config::Settings, state::AppState, telemetry};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_telemetry();

    info!("Starting stakehouse server...");

    let settings = Settings::load()?;
    info!(
        session_ttl_ms = settings.session.ttl_ms,
        expiry_policy = ?settings.session.expiry_policy,
        sweep_interval_ms = settings.sweeper.interval_ms,
        top_k = settings.ledger.top_k,
        "Configuration loaded"
    );

    let state = AppState::new(&settings);

    let cancel = CancellationToken::new();
    let sweeper = state.sweeper(&settings).spawn(cancel.clone());

    let app = build_router(state);
    let addr = settings.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cancel.cancel();
    sweeper.await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
