use std::time::Instant;

use warden_core::{Context, Error};

use crate::CommandMeta;

pub const META: CommandMeta = CommandMeta {
    name: "ping",
    desc: "Check the bot's latency to Discord.",
    category: "utility",
    usage: "!ping",
};

#[poise::command(prefix_command, slash_command, category = "Utility", channel_cooldown = 3)]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let started = Instant::now();
    let reply = ctx.say("Pong!").await?;
    let round_trip = started.elapsed().as_millis();

    let gateway = ctx.ping().await;
    let gateway = if gateway.is_zero() {
        "n/a".to_owned()
    } else {
        format!("{}ms", gateway.as_millis())
    };

    reply
        .edit(
            ctx,
            poise::CreateReply::default()
                .content(format!("Pong! Gateway: {gateway} • Round trip: {round_trip}ms")),
        )
        .await?;
    Ok(())
}
