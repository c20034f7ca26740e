use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vidoza::{
    api::{cors_layer, create_router, AppState},
    cache::{create_redis_client, Cache, CacheWriterHandle},
    config::Config,
    services::{Mailer, TmdbClient},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vidoza=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    let mut tmdb = TmdbClient::new(
        config.tmdb_api_url.clone(),
        &config.tmdb_api_key,
        config.upstream_timeout(),
        config.retry_policy(),
    )?;

    let mut cache_writer: Option<CacheWriterHandle> = None;
    if let Some(redis_url) = &config.redis_url {
        let client = create_redis_client(redis_url)?;
        let (cache, handle) = Cache::new(client);
        tmdb = tmdb.with_cache(cache, config.cache_ttl_secs);
        cache_writer = Some(handle);
        tracing::info!(ttl_secs = config.cache_ttl_secs, "Upstream response cache enabled");
    }

    let mut state = AppState::new(tmdb);
    match &config.resend_api_key {
        Some(api_key) => {
            let mailer = Mailer::new(
                api_key.clone(),
                config.resend_api_url.clone(),
                config.feedback_from.clone(),
                config.feedback_to.clone(),
                config.upstream_timeout(),
            )?;
            state = state.with_mailer(mailer);
        }
        None => tracing::warn!("RESEND_API_KEY not set, feedback delivery disabled"),
    }

    let app = create_router(state).layer(cors_layer(config.origin_domain.as_deref())?);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
