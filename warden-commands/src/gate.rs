use tracing::info;

use poise::serenity_prelude as serenity;

use warden_core::{Context, Error};
use warden_utils::confirmation::{
    CONFIRM_TIMEOUT, prompt_confirm_decline, resolve_confirmation_result,
};

/// Ask the author to confirm a destructive action.
///
/// Returns the Confirm press only when the author confirmed before the timeout;
/// the prompt is retracted either way.
pub async fn confirm_action(
    ctx: Context<'_>,
    action: &str,
    prompt: impl Into<String>,
    embed: Option<serenity::CreateEmbed>,
) -> Result<Option<serenity::ComponentInteraction>, Error> {
    let confirmation = prompt_confirm_decline(
        ctx,
        ctx.author().id,
        prompt,
        embed,
        CONFIRM_TIMEOUT,
    )
    .await?;
    let outcome = confirmation.outcome();

    let confirmed = resolve_confirmation_result(
        ctx,
        confirmation,
        &format!("{} confirmation timed out. Action cancelled.", capitalize(action)),
        &format!("{} cancelled.", capitalize(action)),
        "Working on it...",
    )
    .await?;

    if confirmed.is_none() {
        info!(
            ?outcome,
            action,
            user_id = %ctx.author().id,
            "destructive command aborted"
        );
    }

    Ok(confirmed)
}

fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}
