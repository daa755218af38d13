use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{fetch_target_profile, guild_only_message, usage_message};
use warden_core::{Context, Error};
use warden_database::impls::warnings::list_warnings;
use warden_database::model::warnings::WarningEntry;
use warden_utils::formatting::escape_mentions;
use warden_utils::pagination::{page_window, paginate_embed_pages, total_pages};
use warden_utils::permissions::ensure_author_permission;

pub const META: CommandMeta = CommandMeta {
    name: "warnings",
    desc: "Show the warning history for a user.",
    category: "moderation",
    usage: "!warnings <user>",
};

const WARNINGS_PER_PAGE: usize = 5;

#[poise::command(prefix_command, slash_command, category = "Moderation", user_cooldown = 5)]
pub async fn warnings(
    ctx: Context<'_>,
    #[description = "The user to check"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !ensure_author_permission(ctx, guild_id, serenity::Permissions::KICK_MEMBERS).await? {
        return Ok(());
    }

    let Some(user) = user else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let entries = list_warnings(&ctx.data().db, guild_id.get(), user.id.get()).await;
    let target_profile = fetch_target_profile(ctx.http(), user.id).await;
    let title = format!("Warnings for {}", target_profile.display_name);

    paginate_embed_pages(ctx, &title, &warning_pages(&entries), 1).await?;
    Ok(())
}

/// Newest first, numbered by issue order.
fn warning_pages(entries: &[WarningEntry]) -> Vec<String> {
    let total = entries.len();
    if total == 0 {
        return vec!["Total warnings: **0**\n\nThis user has no warnings.".to_owned()];
    }

    (1..=total_pages(total, WARNINGS_PER_PAGE))
        .map(|page| {
            let (start, end) = page_window(total, WARNINGS_PER_PAGE, page);
            let mut lines = format!("Total warnings: **{}**\n\n", total);

            for display_index in start..end {
                let index = total - 1 - display_index;
                let entry = &entries[index];
                lines.push_str(&format!(
                    "#{idx} • by <@{mod_id}>\n**Reason :** {reason}\n**When :** <t:{ts}:R> • <t:{ts}:f>\n\n",
                    idx = index + 1,
                    mod_id = entry.moderator_id,
                    reason = escape_mentions(&entry.reason),
                    ts = entry.warned_at,
                ));
            }

            lines.trim_end().to_owned()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::warning_pages;
    use warden_database::model::warnings::WarningEntry;

    fn entry(n: u64) -> WarningEntry {
        WarningEntry {
            warned_at: n,
            moderator_id: 1,
            reason: format!("reason {n}"),
        }
    }

    #[test]
    fn newest_warning_leads_the_first_page() {
        let entries: Vec<_> = (1..=7).map(entry).collect();
        let pages = warning_pages(&entries);

        assert_eq!(pages.len(), 2);
        assert!(pages[0].contains("Total warnings: **7**"));
        assert!(pages[0].find("#7").unwrap() < pages[0].find("#6").unwrap());
        assert!(pages[1].contains("#1 •"));
        assert!(!pages[1].contains("#3 •"));
    }

    #[test]
    fn empty_history_still_renders() {
        let pages = warning_pages(&[]);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].contains("no warnings"));
    }
}
