use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;

use scriptorium_api::ApiConfig;
use scriptorium_infra::{InMemoryStore, seed_demo_data};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    scriptorium_observability::init();

    let config = ApiConfig::from_env()?;
    let store = Arc::new(InMemoryStore::new());

    if config.seed_demo_data {
        let report = seed_demo_data(store.as_ref(), Utc::now()).context("seeding demo data")?;
        tracing::info!(
            users_created = report.users_created,
            users_skipped = report.users_skipped,
            articles_created = report.articles_created,
            "demo data seeded"
        );
    }

    let app = scriptorium_api::app::build_app(&config, store);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
