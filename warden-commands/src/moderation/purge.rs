use tokio::time::{Duration, sleep};
use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::gate::confirm_action;
use crate::moderation::embeds::{guild_only_message, usage_message};
use crate::moderation::logging::{ModLogEntry, ModLogTarget, log_action};
use warden_core::{Context, Error};
use warden_utils::permissions::ensure_author_permission;

pub const META: CommandMeta = CommandMeta {
    name: "purge",
    desc: "Delete the latest messages in this channel.",
    category: "moderation",
    usage: "!purge <amount 1-100>",
};

const MAX_PURGE: u8 = 100;

/// Which messages a purge fetches and which of our own it cleans up.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct PurgePlan {
    /// Only messages older than this are purged.
    pub anchor: serenity::MessageId,
    pub limit: u8,
    /// Removed separately and never counted.
    pub own_messages: Vec<serenity::MessageId>,
}

impl PurgePlan {
    pub(crate) fn new(
        amount: u8,
        invoking: Option<serenity::MessageId>,
        prompt: serenity::MessageId,
    ) -> Self {
        let limit = amount.clamp(1, MAX_PURGE);
        match invoking {
            Some(invoking) => Self {
                anchor: invoking,
                limit,
                own_messages: vec![prompt, invoking],
            },
            None => Self {
                anchor: prompt,
                limit,
                own_messages: vec![prompt],
            },
        }
    }
}

#[poise::command(prefix_command, slash_command, category = "Moderation", channel_cooldown = 5)]
pub async fn purge(
    ctx: Context<'_>,
    #[description = "Amount of messages to purge"] amount: Option<u8>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let Some(amount) = amount else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    if amount == 0 || amount > MAX_PURGE {
        ctx.say("Amount must be between 1 and 100.").await?;
        return Ok(());
    }

    if !ensure_author_permission(ctx, guild_id, serenity::Permissions::MANAGE_MESSAGES).await? {
        return Ok(());
    }

    let prompt = format!("Are you sure you want to delete the last {amount} message(s) in this channel?");
    let Some(press) = confirm_action(ctx, "purge", prompt, None).await? else {
        return Ok(());
    };

    let channel_id = ctx.channel_id();
    let invoking = match ctx {
        poise::Context::Prefix(prefix) => Some(prefix.msg.id),
        _ => None,
    };
    let plan = PurgePlan::new(amount, invoking, press.message.id);

    let messages = channel_id
        .messages(
            ctx.http(),
            serenity::GetMessages::new()
                .before(plan.anchor)
                .limit(plan.limit),
        )
        .await?;
    let ids: Vec<serenity::MessageId> = messages.into_iter().map(|message| message.id).collect();

    for own in plan.own_messages {
        let _ = channel_id.delete_message(ctx.http(), own).await;
    }

    if ids.is_empty() {
        channel_id.say(ctx.http(), "No messages found to delete.").await?;
        return Ok(());
    }

    let deleted = ids.len();
    let delete_result = if deleted == 1 {
        channel_id.delete_message(ctx.http(), ids[0]).await
    } else {
        channel_id.delete_messages(ctx.http(), ids).await
    };

    if let Err(source) = delete_result {
        error!(?source, "purge delete request failed");
        channel_id.say(ctx.http(), "I couldn't delete messages. Messages older than 14 days can't be bulk deleted, or I may lack 'Manage Messages'.")
            .await?;
        return Ok(());
    }

    log_action(
        &ctx,
        guild_id,
        ModLogEntry::new(
            "purge",
            ModLogTarget::Channel(channel_id.get()),
            Some(ctx.author().id.get()),
            &format!("{deleted} message(s) cleared"),
        ),
    )
    .await;

    let confirmation = channel_id
        .say(ctx.http(), format!("Purged {deleted} message(s)."))
        .await?;
    sleep(Duration::from_secs(3)).await;
    let _ = confirmation.delete(ctx.http()).await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude::MessageId;

    use super::PurgePlan;

    #[test]
    fn prefix_purge_skips_the_invoking_message() {
        let plan = PurgePlan::new(100, Some(MessageId::new(50)), MessageId::new(60));
        assert_eq!(plan.anchor, MessageId::new(50));
        assert_eq!(plan.limit, 100);
        assert_eq!(plan.own_messages, vec![MessageId::new(60), MessageId::new(50)]);
    }

    #[test]
    fn slash_purge_counts_only_messages_before_the_prompt() {
        let plan = PurgePlan::new(5, None, MessageId::new(60));
        assert_eq!(plan.anchor, MessageId::new(60));
        assert_eq!(plan.limit, 5);
        assert_eq!(plan.own_messages, vec![MessageId::new(60)]);
    }
}
