use tracing::{error, info};

use poise::serenity_prelude as serenity;

use crate::gate::confirm_action;
use crate::moderation::checks::guild_owner_id;
use crate::moderation::embeds::{NO_REASON, notify_moderation_target, usage_message};
use crate::moderation::logging::{ModLogEntry, ModLogTarget, log_action};
use warden_core::{Context, Error};
use warden_utils::formatting::escape_mentions;
use warden_utils::parse::split_targets_and_reason;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MassAction {
    Kick,
    Ban,
}

impl MassAction {
    fn verb(self) -> &'static str {
        match self {
            MassAction::Kick => "kick",
            MassAction::Ban => "ban",
        }
    }

    fn past_tense(self) -> &'static str {
        match self {
            MassAction::Kick => "kicked",
            MassAction::Ban => "banned",
        }
    }

    fn log_action(self) -> &'static str {
        match self {
            MassAction::Kick => "mass_kick",
            MassAction::Ban => "mass_ban",
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct MassOutcome {
    pub done: Vec<u64>,
    pub skipped: Vec<(u64, &'static str)>,
    pub failed: Vec<u64>,
}

pub(crate) fn skip_reason(
    target: u64,
    author: u64,
    bot: u64,
    owner: Option<u64>,
) -> Option<&'static str> {
    if target == author {
        Some("that's you")
    } else if target == bot {
        Some("that's me")
    } else if owner == Some(target) {
        Some("server owner")
    } else {
        None
    }
}

pub(crate) fn summarize(action: MassAction, outcome: &MassOutcome) -> String {
    let mentions = |ids: &[u64]| {
        ids.iter()
            .map(|id| format!("<@{id}>"))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut lines = vec![format!(
        "{} {} member(s).",
        capitalized_past(action),
        outcome.done.len()
    )];
    if !outcome.done.is_empty() {
        lines.push(mentions(&outcome.done));
    }
    if !outcome.skipped.is_empty() {
        let skipped = outcome
            .skipped
            .iter()
            .map(|(id, why)| format!("<@{id}> ({why})"))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("Skipped: {skipped}"));
    }
    if !outcome.failed.is_empty() {
        lines.push(format!("Failed: {}", mentions(&outcome.failed)));
    }
    lines.join("\n")
}

fn capitalized_past(action: MassAction) -> &'static str {
    match action {
        MassAction::Kick => "Kicked",
        MassAction::Ban => "Banned",
    }
}

pub(crate) async fn run_mass_action(
    ctx: Context<'_>,
    guild_id: serenity::GuildId,
    action: MassAction,
    usage: &str,
    raw: Option<String>,
) -> Result<(), Error> {
    let (targets, reason) = split_targets_and_reason(raw.as_deref().unwrap_or_default());
    if targets.is_empty() {
        ctx.say(usage_message(usage)).await?;
        return Ok(());
    }
    let reason = reason.unwrap_or_else(|| NO_REASON.to_owned());

    let prompt = format!(
        "Are you sure you want to {} {} member(s) for: `{}`?",
        action.verb(),
        targets.len(),
        escape_mentions(&reason)
    );
    let Some(press) = confirm_action(ctx, action.log_action(), prompt, None).await? else {
        return Ok(());
    };

    let author = ctx.author().id.get();
    let bot = ctx.framework().bot_id.get();
    let owner = guild_owner_id(&ctx).map(|id| id.get());
    let mut outcome = MassOutcome::default();

    for target in targets {
        if let Some(why) = skip_reason(target, author, bot, owner) {
            outcome.skipped.push((target, why));
            continue;
        }

        let user_id = serenity::UserId::new(target);
        match user_id.to_user(ctx.http()).await {
            Ok(user) if user.bot => {
                outcome.skipped.push((target, "bot account"));
                continue;
            }
            Ok(_) => {}
            Err(source) => {
                error!(?source, user_id = target, "could not resolve mass action target");
                outcome.failed.push(target);
                continue;
            }
        }

        notify_moderation_target(
            ctx.http(),
            user_id,
            guild_id,
            action.past_tense(),
            Some(&reason),
            None,
        )
        .await;

        let result = match action {
            MassAction::Kick => guild_id.kick_with_reason(ctx.http(), user_id, &reason).await,
            MassAction::Ban => guild_id.ban_with_reason(ctx.http(), user_id, 0, &reason).await,
        };

        match result {
            Ok(()) => {
                log_action(
                    &ctx,
                    guild_id,
                    ModLogEntry::new(action.verb(), ModLogTarget::User(target), Some(author), &reason),
                )
                .await;
                outcome.done.push(target);
            }
            Err(source) => {
                error!(?source, user_id = target, action = action.verb(), "mass action failed for target");
                outcome.failed.push(target);
            }
        }
    }

    info!(
        action = action.verb(),
        done = outcome.done.len(),
        skipped = outcome.skipped.len(),
        failed = outcome.failed.len(),
        "mass moderation finished"
    );

    press
        .edit_response(
            ctx.http(),
            serenity::EditInteractionResponse::new().content(summarize(action, &outcome)),
        )
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{MassAction, MassOutcome, skip_reason, summarize};

    #[test]
    fn author_bot_and_owner_are_skipped() {
        assert_eq!(skip_reason(1, 1, 2, Some(3)), Some("that's you"));
        assert_eq!(skip_reason(2, 1, 2, Some(3)), Some("that's me"));
        assert_eq!(skip_reason(3, 1, 2, Some(3)), Some("server owner"));
        assert_eq!(skip_reason(4, 1, 2, Some(3)), None);
        assert_eq!(skip_reason(4, 1, 2, None), None);
    }

    #[test]
    fn summary_reports_each_bucket() {
        let outcome = MassOutcome {
            done: vec![10, 11],
            skipped: vec![(1, "that's you")],
            failed: vec![12],
        };
        let text = summarize(MassAction::Ban, &outcome);

        assert!(text.starts_with("Banned 2 member(s).\n<@10>, <@11>"));
        assert!(text.contains("Skipped: <@1> (that's you)"));
        assert!(text.ends_with("Failed: <@12>"));
    }

    #[test]
    fn empty_summary_is_a_single_line() {
        let text = summarize(MassAction::Kick, &MassOutcome::default());
        assert_eq!(text, "Kicked 0 member(s).");
    }
}
