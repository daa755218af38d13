use poise::serenity_prelude as serenity;

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0x2f_6f_9f;
/// Color for destructive actions and AutoMod hits.
pub const ALERT_EMBED_COLOR: u32 = 0xc0_39_2b;

/// Build a titled embed with the default color.
pub fn info_embed(title: impl Into<String>, description: impl Into<String>) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title)
        .description(description)
        .color(DEFAULT_EMBED_COLOR)
}

/// Build a titled embed with the alert color.
pub fn alert_embed(title: impl Into<String>, description: impl Into<String>) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title)
        .description(description)
        .color(ALERT_EMBED_COLOR)
}
