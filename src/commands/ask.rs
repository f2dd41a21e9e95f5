use tracing::info;

use crate::commands::send_chunked;
use crate::companion::prompts::OFF_TOPIC;
use crate::companion::Stage;
use crate::state::Context;

/// Ask a mental health question
#[poise::command(slash_command)]
pub async fn ask(
    ctx: Context<'_>,
    #[description = "Your question"] question: String,
) -> Result<(), anyhow::Error> {
    ctx.defer().await?;

    info!(user = ctx.author().name, question, "question received");
    let stage = ctx.data().companion.submit(&question).await;

    send_chunked(&ctx, &format_reply(&stage)).await
}

/// Markdown rendering of a finished submission, echoing the corrected question.
fn format_reply(stage: &Stage) -> String {
    match stage {
        Stage::Answered(answer) => {
            let mut out = format!("**Q:** {}\n**Topic:** {}", answer.question, answer.topic);
            // A missing answer is left out rather than reported
            if let Some(text) = answer.text.as_deref().filter(|t| !t.is_empty()) {
                out.push_str(&format!("\n\n**Response:** {}", text));
                if !answer.links.is_empty() {
                    out.push_str("\n\n**Related Blogs**\n");
                    for url in &answer.links {
                        let marker = if answer.featured.as_ref() == Some(url) {
                            " (start here)"
                        } else {
                            ""
                        };
                        out.push_str(&format!("- [Read Blog]({}){}\n", url, marker));
                    }
                }
            }
            out
        }
        Stage::Rejected { corrected } => format!("**Q:** {}\n{}", corrected, OFF_TOPIC),
        _ => "Please enter a question.".to_string(),
    }
}
