mod bot;
mod commands;
mod companion;
mod config;
mod llm;
mod state;
mod topics;
mod web;

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use companion::Companion;
use config::AppConfig;
use llm::CompletionClient;
use state::AppState;
use topics::TopicStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load env
    let _ = dotenv::dotenv();
    let config = AppConfig::from_env()?;

    let store = TopicStore::load(&config.topics_path, &config.blogs_path)
        .context("Failed to load topic data")?;
    let store = Arc::new(store);

    let completion = Arc::new(CompletionClient::new(config.completion.clone()));
    info!(
        deployment = config.completion.deployment,
        "completion client initialized"
    );

    let companion = Arc::new(Companion::new(store, completion));

    if let Some(discord) = config.discord {
        let app_state = AppState {
            companion: companion.clone(),
        };
        bot::spawn(discord, app_state);
    }

    // The web UI owns the process lifetime
    web::serve(config.bind, companion).await
}
