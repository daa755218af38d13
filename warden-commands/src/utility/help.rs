use crate::utility::embeds::{
    grouped_help_description, no_commands_message, page_out_of_range_message,
    unknown_category_message,
};
use crate::{COMMANDS, CommandMeta};
use warden_core::{Context, Error};
use warden_utils::pagination::{page_window, paginate_embed_pages, total_pages};

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "Lists out all available commands.",
    category: "utility",
    usage: "!help [page|category]",
};

const HELP_COMMANDS_PER_PAGE: usize = 12;

#[poise::command(prefix_command, slash_command, category = "Utility", user_cooldown = 5)]
pub async fn help(
    ctx: Context<'_>,
    #[description = "Page number or category"] query: Option<String>,
) -> Result<(), Error> {
    let query = query.as_deref().map(str::trim).filter(|raw| !raw.is_empty());
    let parsed_page = query.and_then(|raw| raw.parse::<usize>().ok().filter(|page| *page >= 1));
    let category = match (query, parsed_page) {
        (Some(raw), None) => Some(raw.to_ascii_lowercase()),
        _ => None,
    };

    let categories = categories();
    if let Some(wanted_category) = category.as_deref()
        && !categories.contains(&wanted_category)
    {
        ctx.say(unknown_category_message(wanted_category, &categories))
            .await?;
        return Ok(());
    }

    let commands = sorted_commands(category.as_deref());
    if commands.is_empty() {
        ctx.say(no_commands_message(category.as_deref())).await?;
        return Ok(());
    }

    let requested_page = parsed_page.unwrap_or(1);
    let total = total_pages(commands.len(), HELP_COMMANDS_PER_PAGE);

    if requested_page > total {
        ctx.say(page_out_of_range_message(requested_page, total)).await?;
        return Ok(());
    }

    let pages = (1..=total)
        .map(|page| {
            let (start, end) = page_window(commands.len(), HELP_COMMANDS_PER_PAGE, page);
            grouped_help_description(&commands[start..end])
        })
        .collect::<Vec<_>>();
    paginate_embed_pages(ctx, "Available Commands", &pages, requested_page).await?;
    Ok(())
}

fn categories() -> Vec<&'static str> {
    let mut categories: Vec<&str> = COMMANDS.iter().map(|c| c.category).collect();
    categories.sort_unstable();
    categories.dedup();
    categories
}

fn sorted_commands(category: Option<&str>) -> Vec<&'static CommandMeta> {
    let mut filtered: Vec<&'static CommandMeta> = COMMANDS
        .iter()
        .filter(|cmd| match category {
            Some(wanted) => cmd.category == wanted,
            None => true,
        })
        .collect();

    filtered.sort_unstable_by(|left, right| {
        left.category
            .cmp(right.category)
            .then_with(|| left.name.cmp(right.name))
    });

    filtered
}

#[cfg(test)]
mod tests {
    use super::{categories, sorted_commands};
    use crate::COMMANDS;

    #[test]
    fn every_category_is_listed_once() {
        assert_eq!(categories(), vec!["fun", "management", "moderation", "utility"]);
    }

    #[test]
    fn category_filter_and_order() {
        let fun = sorted_commands(Some("fun"));
        let names: Vec<_> = fun.iter().map(|meta| meta.name).collect();
        assert_eq!(names, vec!["eightball", "meme", "tictactoe"]);
        assert_eq!(sorted_commands(None).len(), COMMANDS.len());
        assert!(sorted_commands(Some("nope")).is_empty());
    }
}
