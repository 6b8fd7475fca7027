use std::sync::Arc;

use anyhow::{Context, Result};
use car_recommender::config::Settings;
use car_recommender::data::catalog::Catalog;
use car_recommender::query::engine::QueryEngine;
use car_recommender::service::{router, ServiceContext};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let settings = Settings::parse();
    settings.validate().context("invalid settings")?;

    // The catalog must be complete before anything is served.
    let catalog = Catalog::load(
        &settings.data,
        &settings.load_options(),
        &settings.conversion(),
    )
    .with_context(|| format!("loading {}", settings.data.display()))?;

    let ctx = Arc::new(ServiceContext {
        engine: QueryEngine::new(Arc::new(catalog), settings.limit),
        default_budget: settings.default_budget,
    });

    let listener = tokio::net::TcpListener::bind(settings.bind)
        .await
        .with_context(|| format!("binding {}", settings.bind))?;
    log::info!("Listening on {}", settings.bind);
    axum::serve(listener, router(ctx)).await?;

    Ok(())
}
