use std::time::Duration;

use poise::serenity_prelude as serenity;

use crate::embed::DEFAULT_EMBED_COLOR;

pub const PAGINATION_TIMEOUT: Duration = Duration::from_secs(60 * 3);

/// Number of pages needed for `total_items`, never less than one.
pub fn total_pages(total_items: usize, per_page: usize) -> usize {
    total_items.div_ceil(per_page.max(1)).max(1)
}

/// Half-open item range shown on 1-based `page`.
pub fn page_window(total_items: usize, per_page: usize, page: usize) -> (usize, usize) {
    let per_page = per_page.max(1);
    let start = (page.max(1) - 1).saturating_mul(per_page).min(total_items);
    let end = (start + per_page).min(total_items);
    (start, end)
}

fn page_embed(title: &str, description: &str, page: usize, total: usize) -> serenity::CreateEmbed {
    let embed = serenity::CreateEmbed::new()
        .title(title.to_owned())
        .color(DEFAULT_EMBED_COLOR)
        .description(description.to_owned());

    if total > 1 {
        embed.footer(serenity::CreateEmbedFooter::new(format!(
            "Page {}/{}",
            page + 1,
            total
        )))
    } else {
        embed
    }
}

fn page_buttons(prev_id: &str, next_id: &str, page: usize, total: usize) -> Vec<serenity::CreateActionRow> {
    vec![serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new(prev_id)
            .label("Prev")
            .disabled(page == 0)
            .style(serenity::ButtonStyle::Secondary),
        serenity::CreateButton::new(next_id)
            .label("Next")
            .disabled(page + 1 >= total)
            .style(serenity::ButtonStyle::Secondary),
    ])]
}

/// Send `pages` as one embed with Prev / Next buttons for the invoking author.
///
/// Buttons are removed once nobody has pressed one for [`PAGINATION_TIMEOUT`].
pub async fn paginate_embed_pages<U, E>(
    ctx: poise::Context<'_, U, E>,
    title: &str,
    pages: &[String],
    start_page: usize,
) -> Result<(), serenity::Error>
where
    U: Send + Sync,
    E: Send + Sync,
{
    if pages.is_empty() {
        return Ok(());
    }

    let total = pages.len();
    let mut page = start_page.clamp(1, total) - 1;

    if total == 1 {
        ctx.send(poise::CreateReply::default().embed(page_embed(title, &pages[0], 0, 1)))
            .await?;
        return Ok(());
    }

    let ctx_id = ctx.id();
    let prev_id = format!("{}_prev", ctx_id);
    let next_id = format!("{}_next", ctx_id);

    let reply = ctx
        .send(
            poise::CreateReply::default()
                .embed(page_embed(title, &pages[page], page, total))
                .components(page_buttons(&prev_id, &next_id, page, total)),
        )
        .await?;
    let message = reply.message().await?.into_owned();

    while let Some(press) = message
        .await_component_interaction(ctx)
        .author_id(ctx.author().id)
        .timeout(PAGINATION_TIMEOUT)
        .await
    {
        if press.data.custom_id == next_id {
            page = (page + 1).min(total - 1);
        } else if press.data.custom_id == prev_id {
            page = page.saturating_sub(1);
        }

        press
            .create_response(
                ctx.http(),
                serenity::CreateInteractionResponse::UpdateMessage(
                    serenity::CreateInteractionResponseMessage::new()
                        .embed(page_embed(title, &pages[page], page, total))
                        .components(page_buttons(&prev_id, &next_id, page, total)),
                ),
            )
            .await?;
    }

    let _ = message
        .channel_id
        .edit_message(
            ctx.http(),
            message.id,
            serenity::EditMessage::new()
                .embed(page_embed(title, &pages[page], page, total))
                .components(vec![]),
        )
        .await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{page_window, total_pages};

    #[test]
    fn page_math() {
        assert_eq!(total_pages(0, 5), 1);
        assert_eq!(total_pages(10, 5), 2);
        assert_eq!(total_pages(11, 5), 3);
        assert_eq!(page_window(11, 5, 3), (10, 11));
        assert_eq!(page_window(11, 5, 0), (0, 5));
        assert_eq!(page_window(3, 5, 4), (3, 3));
    }
}
