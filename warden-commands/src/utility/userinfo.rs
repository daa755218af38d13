use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::guild_only_message;
use warden_core::{Context, Error};
use warden_database::impls::afk::get_afk;
use warden_database::impls::warnings::list_warnings;
use warden_utils::embed::DEFAULT_EMBED_COLOR;
use warden_utils::formatting::{escape_mentions, truncate_chars};

pub const META: CommandMeta = CommandMeta {
    name: "userinfo",
    desc: "Show information about a user.",
    category: "utility",
    usage: "!userinfo [user]",
};

fn timestamp_field(unix: i64) -> String {
    format!("<t:{unix}:f> (<t:{unix}:R>)")
}

pub(crate) fn role_list(guild_id: serenity::GuildId, roles: &[serenity::RoleId]) -> String {
    let mentions: Vec<String> = roles
        .iter()
        .filter(|role| role.get() != guild_id.get())
        .map(|role| format!("<@&{}>", role.get()))
        .collect();

    if mentions.is_empty() {
        "None".to_owned()
    } else {
        truncate_chars(&mentions.join(", "), 1_000)
    }
}

#[poise::command(
    prefix_command,
    slash_command,
    category = "Utility",
    aliases("whois"),
    user_cooldown = 3
)]
pub async fn userinfo(
    ctx: Context<'_>,
    #[description = "The user to look up (defaults to you)"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let user = user.unwrap_or_else(|| ctx.author().clone());
    let member = guild_id.member(ctx.http(), user.id).await.ok();

    let mut embed = serenity::CreateEmbed::new()
        .title(format!("User Info: {}", user.display_name()))
        .thumbnail(user.face())
        .color(DEFAULT_EMBED_COLOR)
        .field("ID", user.id.get().to_string(), true)
        .field("Username", user.name.clone(), true)
        .field("Bot?", if user.bot { "Yes" } else { "No" }, true)
        .field(
            "Account Created",
            timestamp_field(user.id.created_at().unix_timestamp()),
            false,
        );

    if let Some(member) = &member {
        embed = embed.field(
            "Nickname",
            member.nick.clone().unwrap_or_else(|| "None".to_owned()),
            true,
        );
        if let Some(joined_at) = member.joined_at {
            embed = embed.field("Joined Server", timestamp_field(joined_at.unix_timestamp()), false);
        }
        let role_count = member
            .roles
            .iter()
            .filter(|role| role.get() != guild_id.get())
            .count();
        embed = embed.field(
            format!("Roles ({role_count})"),
            role_list(guild_id, &member.roles),
            false,
        );
    } else {
        embed = embed.footer(serenity::CreateEmbedFooter::new("Not a member of this server."));
    }

    let db = &ctx.data().db;
    let warnings = list_warnings(db, guild_id.get(), user.id.get()).await.len();
    embed = embed.field("Warnings", warnings.to_string(), true);

    if let Some(afk) = get_afk(db, user.id.get()).await {
        embed = embed.field(
            "AFK",
            format!("{} (<t:{}:R>)", escape_mentions(&afk.reason), afk.since),
            true,
        );
    }

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude as serenity;

    use super::role_list;

    #[test]
    fn everyone_role_is_hidden() {
        let guild = serenity::GuildId::new(10);
        let roles = [serenity::RoleId::new(10), serenity::RoleId::new(11)];
        assert_eq!(role_list(guild, &roles), "<@&11>");
        assert_eq!(role_list(guild, &roles[..1]), "None");
    }
}
