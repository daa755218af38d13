use crate::CommandMeta;
use warden_core::{Context, Error};
use warden_database::impls::afk::set_afk;
use warden_utils::formatting::{escape_mentions, truncate_chars};
use warden_utils::time::now_unix_secs;

pub const META: CommandMeta = CommandMeta {
    name: "afk",
    desc: "Mark yourself as away; mentions get an auto-reply.",
    category: "utility",
    usage: "!afk [reason]",
};

const DEFAULT_AFK_REASON: &str = "AFK";
const MAX_REASON_CHARS: usize = 200;

#[poise::command(prefix_command, slash_command, category = "Utility", user_cooldown = 5)]
pub async fn afk(
    ctx: Context<'_>,
    #[description = "Why you're away"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    let reason = reason
        .as_deref()
        .map(str::trim)
        .filter(|reason| !reason.is_empty())
        .map(|reason| truncate_chars(reason, MAX_REASON_CHARS))
        .unwrap_or_else(|| DEFAULT_AFK_REASON.to_owned());

    set_afk(&ctx.data().db, ctx.author().id.get(), &reason, now_unix_secs()).await?;

    ctx.say(format!(
        "<@{}> is now AFK: {}",
        ctx.author().id.get(),
        escape_mentions(&reason)
    ))
    .await?;
    Ok(())
}
