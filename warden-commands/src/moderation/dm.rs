use tracing::warn;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{guild_only_message, moderation_bot_target_message, usage_message};
use warden_core::{Context, Error};
use warden_utils::permissions::ensure_author_permission;

pub const META: CommandMeta = CommandMeta {
    name: "dm",
    desc: "Send a direct message to a member.",
    category: "moderation",
    usage: "!dm <user> <message>",
};

pub(crate) fn direct_message_body(sender: &str, guild_name: &str, message: &str) -> String {
    format!("Message from {sender} in {guild_name}:\n{message}")
}

#[poise::command(prefix_command, slash_command, category = "Moderation", user_cooldown = 3)]
pub async fn dm(
    ctx: Context<'_>,
    #[description = "The member to message"] user: Option<serenity::User>,
    #[description = "Message text"]
    #[rest]
    message: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !ensure_author_permission(ctx, guild_id, serenity::Permissions::MANAGE_MESSAGES).await? {
        return Ok(());
    }

    let (Some(user), Some(message)) = (
        user,
        message.map(|raw| raw.trim().to_owned()).filter(|raw| !raw.is_empty()),
    ) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    if user.bot {
        ctx.say(moderation_bot_target_message()).await?;
        return Ok(());
    }

    if guild_id.member(ctx.http(), user.id).await.is_err() {
        ctx.say("That user is not a member of this server.").await?;
        return Ok(());
    }

    let guild_name = ctx
        .guild()
        .map(|guild| guild.name.clone())
        .unwrap_or_else(|| format!("Server {}", guild_id.get()));
    let sender = ctx.author().display_name().to_owned();
    let body = direct_message_body(&sender, &guild_name, &message);

    let result = async {
        let channel = user.id.create_dm_channel(ctx.http()).await?;
        channel
            .send_message(ctx.http(), serenity::CreateMessage::new().content(body))
            .await
    }
    .await;

    match result {
        Ok(_) => {
            ctx.say(format!("Successfully sent DM to <@{}>.", user.id.get()))
                .await?;
        }
        Err(source) => {
            warn!(?source, user_id = %user.id, "direct message failed");
            ctx.say(format!(
                "Could not send DM to <@{}>. They might have DMs disabled or blocked me.",
                user.id.get()
            ))
            .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::direct_message_body;

    #[test]
    fn body_names_sender_and_server() {
        assert_eq!(
            direct_message_body("Mod", "Cozy Place", "Please check the rules."),
            "Message from Mod in Cozy Place:\nPlease check the rules."
        );
    }
}
