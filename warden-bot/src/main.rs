mod events;
mod scheduler;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use tracing::{debug, error, info};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rustls::crypto::ring::default_provider;

use warden_core::{Data, Error};
use warden_database::Database;
use warden_database::impls::prefixes::get_prefix;
use warden_game::GameRegistry;
use warden_utils::DEFAULT_PREFIX;
use warden_utils::embed::DEFAULT_EMBED_COLOR;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_SCHEDULER_TICK_SECONDS: u64 = 15;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter_fn(|metadata| {
        let target = metadata.target();

        let within_info_level = *metadata.level() <= tracing::Level::INFO;
        if !within_info_level {
            return false;
        }

        !(target.starts_with("serenity::gateway::bridge::shard_manager")
            || target.starts_with("serenity::gateway::bridge::shard_runner"))
    }));

    tracing_subscriber::registry().with(fmt_layer).init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    dotenvy::dotenv().ok();

    let token = env::var("DISCORD_TOKEN").context("DISCORD_TOKEN must be set")?;
    let guild_id = match env::var("DISCORD_GUILD_ID") {
        Ok(raw) if !raw.trim().is_empty() => Some(
            raw.trim()
                .parse::<std::num::NonZeroU64>()
                .context("DISCORD_GUILD_ID must be a non-zero numeric guild id")?
                .get(),
        ),
        _ => None,
    };
    let data_dir = env::var("DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));
    let tick_seconds = env_u64("SCHEDULER_TICK_SECONDS", DEFAULT_SCHEDULER_TICK_SECONDS).max(1);

    let db = Database::open(&data_dir).await?;
    info!(data_dir = %data_dir.display(), "JSON documents loaded.");

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: warden_commands::commands(),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handle_event(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            prefix_options: poise::PrefixFrameworkOptions {
                dynamic_prefix: Some(|ctx| Box::pin(dynamic_prefix(ctx))),
                mention_as_prefix: true,
                ..Default::default()
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            let db = db.clone();
            Box::pin(async move {
                info!("Warden is on duty.");

                match guild_id {
                    Some(guild_id) => {
                        poise::builtins::register_in_guild(
                            ctx,
                            &framework.options().commands,
                            serenity::GuildId::new(guild_id),
                        )
                        .await?;
                        info!(guild_id, "slash commands registered in guild");
                    }
                    None => {
                        poise::builtins::register_globally(ctx, &framework.options().commands)
                            .await?;
                        info!("slash commands registered globally");
                    }
                }

                scheduler::spawn_scheduler(
                    ctx.http.clone(),
                    db.clone(),
                    Duration::from_secs(tick_seconds),
                );

                Ok(Data {
                    db,
                    games: GameRegistry::new(),
                })
            })
        })
        .build();

    info!("Warden is connecting...");

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    client.start().await?;
    Ok(())
}

fn env_u64(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(value) => value.trim().parse::<u64>().unwrap_or(default),
        Err(_) => default,
    }
}

async fn dynamic_prefix(
    ctx: poise::PartialContext<'_, Data, Error>,
) -> Result<Option<String>, Error> {
    let stored = match ctx.guild_id {
        Some(guild_id) => get_prefix(&ctx.data.db, guild_id.get()).await,
        None => None,
    };

    Ok(Some(stored.unwrap_or_else(|| DEFAULT_PREFIX.to_owned())))
}

fn usage_hint(command_name: &str) -> String {
    let usage = warden_commands::COMMANDS
        .iter()
        .find(|meta| meta.name == command_name)
        .map(|meta| meta.usage.to_owned())
        .unwrap_or_else(|| format!("{DEFAULT_PREFIX}{command_name}"));
    format!("Usage: `{usage}`")
}

fn cooldown_message(remaining: Duration) -> String {
    format!(
        "This command is on cooldown. Please try again in {:.2} seconds.",
        remaining.as_secs_f64()
    )
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(?error, command = %ctx.command().qualified_name, "command error");

            let embed = serenity::CreateEmbed::new()
                .title("Command Error")
                .description("Something went wrong while running this command.")
                .color(DEFAULT_EMBED_COLOR);

            let _ = ctx
                .send(poise::CreateReply::default().ephemeral(true).embed(embed))
                .await;
        }
        poise::FrameworkError::ArgumentParse { ctx, input, .. } => {
            let usage = usage_hint(&ctx.command().name);
            let description = if let Some(input) = input {
                format!("Invalid argument: `{}`\n{}", input, usage)
            } else {
                format!("Missing required argument.\n{}", usage)
            };

            let _ = ctx.say(description).await;
        }
        poise::FrameworkError::CooldownHit {
            remaining_cooldown,
            ctx,
            ..
        } => {
            let _ = ctx.say(cooldown_message(remaining_cooldown)).await;
        }
        poise::FrameworkError::UnknownCommand { .. } => {
            debug!("unknown command invocation");
        }
        other => {
            if let Err(source) = poise::builtins::on_error(other).await {
                error!(?source, "framework error");
            }
        }
    }
}

async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::Message { new_message } = event {
        events::automod::handle_message_automod(ctx, data, new_message).await;
        events::afk::handle_message_afk(ctx, data, new_message).await;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{cooldown_message, usage_hint};

    #[test]
    fn usage_hint_prefers_command_metadata() {
        assert_eq!(usage_hint("purge"), "Usage: `!purge <amount 1-100>`");
        assert_eq!(usage_hint("nope"), "Usage: `!nope`");
    }

    #[test]
    fn cooldown_reply_shows_two_decimals() {
        assert_eq!(
            cooldown_message(Duration::from_millis(2500)),
            "This command is on cooldown. Please try again in 2.50 seconds."
        );
        assert_eq!(
            cooldown_message(Duration::from_secs(10)),
            "This command is on cooldown. Please try again in 10.00 seconds."
        );
    }
}
