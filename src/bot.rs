use poise::serenity_prelude as serenity;
use poise::{Framework, FrameworkOptions};
use std::future::Future;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::commands;
use crate::config::DiscordConfig;
use crate::state::AppState;

/// Run the bot on its own task. Its failures are logged and never reach the web UI.
pub fn spawn(config: DiscordConfig, app_state: AppState) -> JoinHandle<()> {
    tokio::spawn(log_exit(run(config, app_state)))
}

async fn log_exit<F>(bot: F)
where
    F: Future<Output = anyhow::Result<()>>,
{
    match bot.await {
        Ok(()) => info!("Discord bot stopped"),
        Err(e) => error!("Discord bot failed: {:#}", e),
    }
}

/// Run the Discord front end until the gateway connection ends.
async fn run(config: DiscordConfig, app_state: AppState) -> anyhow::Result<()> {
    let guild_id = config.guild_id.map(serenity::GuildId::new);
    let intents = serenity::GatewayIntents::GUILDS;

    let framework = Framework::builder()
        .options(FrameworkOptions {
            commands: vec![commands::companion()],
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Bot connected as: {} ({})", ready.user.name, ready.user.id);

                let commands = &framework.options().commands;
                for cmd in commands {
                    for sub in &cmd.subcommands {
                        info!("  /{} {}", cmd.name, sub.name);
                    }
                }

                if let Some(gid) = guild_id {
                    info!("Registering to guild {} (instant)", gid);
                    poise::builtins::register_in_guild(ctx, commands, gid).await?;
                } else {
                    info!("Registering globally (up to 1 hour delay)");
                    poise::builtins::register_globally(ctx, commands).await?;
                }

                Ok(app_state)
            })
        })
        .build();

    info!("Starting Discord bot...");

    let mut client = serenity::ClientBuilder::new(&config.token, intents)
        .framework(framework)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create client: {}", e))?;

    client
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("Discord client error: {}", e))
}
