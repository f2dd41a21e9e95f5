use crate::commands::send_chunked;
use crate::state::Context;

/// List the topics the companion can answer about
#[poise::command(slash_command)]
pub async fn topics(ctx: Context<'_>) -> Result<(), anyhow::Error> {
    let topics = ctx.data().companion.store().topics();
    if topics.is_empty() {
        ctx.say("No topics loaded.").await?;
        return Ok(());
    }

    let mut output = String::from("**Known topics**\n");
    for topic in topics {
        output.push_str(&format!("- {}\n", topic));
    }
    send_chunked(&ctx, &output).await
}
