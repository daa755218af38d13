use std::time::Duration;

use serde::Deserialize;
use tracing::{error, warn};

use crate::CommandMeta;
use warden_core::{Context, Error};
use warden_utils::embed::info_embed;

pub const META: CommandMeta = CommandMeta {
    name: "meme",
    desc: "Post a random meme.",
    category: "fun",
    usage: "!meme",
};

const MEME_API_URL: &str = "https://meme-api.com/gimme";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_ATTEMPTS: usize = 3;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Meme {
    pub title: String,
    pub url: String,
    pub post_link: String,
    pub subreddit: String,
    #[serde(default)]
    pub nsfw: bool,
    #[serde(default)]
    pub spoiler: bool,
}

impl Meme {
    fn is_postable(&self) -> bool {
        !self.nsfw && !self.spoiler
    }
}

async fn fetch_meme(client: &reqwest::Client) -> reqwest::Result<Meme> {
    client
        .get(MEME_API_URL)
        .send()
        .await?
        .error_for_status()?
        .json::<Meme>()
        .await
}

#[poise::command(prefix_command, slash_command, category = "Fun", user_cooldown = 5)]
pub async fn meme(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer().await?;

    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("warden/", env!("CARGO_PKG_VERSION")))
        .build()?;

    for _ in 0..MAX_ATTEMPTS {
        match fetch_meme(&client).await {
            Ok(meme) if meme.is_postable() => {
                let embed = info_embed(meme.title, format!("[r/{}]({})", meme.subreddit, meme.post_link))
                    .image(meme.url);
                ctx.send(poise::CreateReply::default().embed(embed)).await?;
                return Ok(());
            }
            Ok(meme) => {
                warn!(subreddit = %meme.subreddit, "skipping meme flagged nsfw or spoiler");
            }
            Err(source) => {
                error!(?source, "meme request failed");
                ctx.say("Couldn't fetch a meme right now. Try again later.")
                    .await?;
                return Ok(());
            }
        }
    }

    ctx.say("Couldn't find a safe meme this time. Try again.")
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Meme;

    #[test]
    fn parses_api_payload() {
        let raw = r#"{
            "postLink": "https://redd.it/abc",
            "subreddit": "memes",
            "title": "A meme",
            "url": "https://i.redd.it/abc.png",
            "nsfw": false,
            "spoiler": false,
            "author": "someone",
            "ups": 10,
            "preview": []
        }"#;
        let meme: Meme = serde_json::from_str(raw).unwrap();
        assert_eq!(meme.subreddit, "memes");
        assert!(meme.is_postable());

        let flagged: Meme = serde_json::from_str(
            r#"{"postLink":"p","subreddit":"s","title":"t","url":"u","nsfw":true}"#,
        )
        .unwrap();
        assert!(!flagged.is_postable());
    }
}
