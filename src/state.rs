use std::sync::Arc;

use crate::companion::Companion;

/// Shared with every Discord command invocation.
pub struct AppState {
    pub companion: Arc<Companion>,
}

pub type Context<'a> = poise::Context<'a, AppState, anyhow::Error>;
