use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::warn;

use crate::companion::prompts::DEFAULT_SYSTEM_PROMPT;

/// Azure chat-completion settings.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub deployment: String,
    pub api_version: String,
    pub model: String,
    pub system_prompt: String,
}

#[derive(Debug, Clone)]
pub struct DiscordConfig {
    pub token: String,
    pub guild_id: Option<u64>,
}

/// Everything read from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub completion: CompletionConfig,
    pub topics_path: PathBuf,
    pub blogs_path: PathBuf,
    pub bind: SocketAddr,
    pub discord: Option<DiscordConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let api_key = get("api_key");
        let endpoint = get("azure_endpoint");
        if api_key.is_none() {
            warn!("api_key is not set; completion requests will be rejected");
        }
        if endpoint.is_none() {
            warn!("azure_endpoint is not set; completion requests will fail");
        }

        let completion = CompletionConfig {
            api_key,
            endpoint,
            deployment: get_or("AZURE_DEPLOYMENT", "aasare-35"),
            api_version: get_or("AZURE_API_VERSION", "2024-02-15-preview"),
            model: get_or("COMPLETION_MODEL", "aasare"),
            system_prompt: get_or("SYSTEM_PROMPT", DEFAULT_SYSTEM_PROMPT),
        };

        let bind_raw = get_or("BIND_ADDR", "127.0.0.1:8501");
        let bind = bind_raw
            .parse::<SocketAddr>()
            .with_context(|| format!("Invalid BIND_ADDR: {}", bind_raw))?;

        let discord = get("DISCORD_TOKEN").map(|token| DiscordConfig {
            token,
            guild_id: get("DISCORD_GUILD_ID").and_then(|raw| match raw.trim().parse::<u64>() {
                Ok(id) => Some(id),
                Err(_) => {
                    warn!(value = %raw, "ignoring unparsable DISCORD_GUILD_ID");
                    None
                }
            }),
        });

        Ok(Self {
            completion,
            topics_path: PathBuf::from(get_or("TOPICS_FILE", "topics.txt")),
            blogs_path: PathBuf::from(get_or("BLOGS_FILE", "blogs.txt")),
            bind,
            discord,
        })
    }
}
