use std::sync::Arc;

use estudia_api::{
    config::Config,
    db::{create_pool, PgStore},
    routes::create_router,
    services::providers::GeminiProvider,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "estudia_api=debug,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    let store = PgStore::new(pool);
    store.run_migrations().await?;

    let generator = GeminiProvider::new(&config)?;
    let state = AppState::new(Arc::new(store), Arc::new(generator));

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "estudia-api listening");
    axum::serve(listener, app).await?;

    Ok(())
}
