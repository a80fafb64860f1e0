mod api;
mod middleware;

use std::sync::Arc;

use civitas_core::{load_communes, CommuneRegistry};
use civitas_geocoder::GeocoderClient;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::RateLimitState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = civitas_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let communes_file = load_communes(&config.communes_path)?;
    let communes = CommuneRegistry::from_file(&communes_file);
    tracing::info!(
        path = %config.communes_path.display(),
        communes = communes.len(),
        "commune registry loaded"
    );

    let geocoder = GeocoderClient::new(
        &config.geocoder_base_url,
        &config.geocoder_user_agent,
        config.geocoder_timeout_secs,
    )?;

    let state = AppState {
        geocoder: Arc::new(geocoder),
        communes: Arc::new(communes),
    };
    let app = build_app(state, RateLimitState::per_minute(config.rate_limit_per_minute));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "civitas-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
