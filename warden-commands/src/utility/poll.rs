use tracing::{error, warn};

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::guild_only_message;
use crate::utility::embeds::{POLL_EMOJIS, poll_description};
use warden_core::{Context, Error};
use warden_utils::embed::DEFAULT_EMBED_COLOR;
use warden_utils::formatting::escape_mentions;
use warden_utils::parse::split_quoted_args;

pub const META: CommandMeta = CommandMeta {
    name: "poll",
    desc: "Start a reaction poll with 2 to 9 options.",
    category: "utility",
    usage: "!poll \"question\" \"option 1\" \"option 2\" ...",
};

const MIN_OPTIONS: usize = 2;

/// Parse `"question" "a" "b"` into the question and its options.
pub(crate) fn parse_poll(raw: &str) -> Result<(String, Vec<String>), &'static str> {
    let mut args = split_quoted_args(raw).into_iter();
    let Some(question) = args.next() else {
        return Err("Please provide a question and at least two options.");
    };
    let options: Vec<String> = args.collect();

    if options.len() < MIN_OPTIONS {
        return Err("Please provide at least two options for the poll.");
    }
    if options.len() > POLL_EMOJIS.len() {
        return Err("You can only provide a maximum of 9 options for the poll.");
    }

    Ok((question, options))
}

#[poise::command(prefix_command, slash_command, category = "Utility", channel_cooldown = 10)]
pub async fn poll(
    ctx: Context<'_>,
    #[description = "\"Question\" \"Option 1\" \"Option 2\" ..."]
    #[rest]
    input: Option<String>,
) -> Result<(), Error> {
    if ctx.guild_id().is_none() {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    }

    let (question, options) = match parse_poll(input.as_deref().unwrap_or_default()) {
        Ok(parsed) => parsed,
        Err(message) => {
            ctx.say(format!("{message}\nUsage: `{}`", META.usage)).await?;
            return Ok(());
        }
    };

    let options: Vec<String> = options.iter().map(|option| escape_mentions(option)).collect();
    let embed = serenity::CreateEmbed::new()
        .title("📊 New Poll!")
        .description(poll_description(&escape_mentions(&question), &options))
        .color(DEFAULT_EMBED_COLOR)
        .footer(
            serenity::CreateEmbedFooter::new(format!("Poll by {}", ctx.author().name))
                .icon_url(ctx.author().face()),
        );

    let reply = ctx.send(poise::CreateReply::default().embed(embed)).await?;
    let message = reply.message().await?;

    for emoji in POLL_EMOJIS.iter().take(options.len()) {
        if let Err(source) = message
            .react(ctx.http(), serenity::ReactionType::Unicode((*emoji).to_owned()))
            .await
        {
            error!(?source, "could not add poll reaction");
            break;
        }
    }

    if let poise::Context::Prefix(prefix) = ctx
        && let Err(source) = prefix.msg.delete(ctx.http()).await
    {
        warn!(?source, "could not delete poll command message");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_poll;

    #[test]
    fn question_and_options() {
        let (question, options) = parse_poll(r#""Best editor?" "vim" "emacs" nano"#).unwrap();
        assert_eq!(question, "Best editor?");
        assert_eq!(options, vec!["vim", "emacs", "nano"]);
    }

    #[test]
    fn option_count_is_bounded() {
        assert!(parse_poll(r#""Only one" "a""#).is_err());
        assert!(parse_poll("").is_err());
        assert!(parse_poll(r#""Q" 1 2 3 4 5 6 7 8 9 10"#).is_err());
        assert!(parse_poll(r#""Q" 1 2 3 4 5 6 7 8 9"#).is_ok());
    }
}
