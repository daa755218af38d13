use rand::seq::SliceRandom;

use crate::CommandMeta;
use crate::moderation::embeds::usage_message;
use warden_core::{Context, Error};
use warden_utils::embed::info_embed;
use warden_utils::formatting::truncate_chars;

pub const META: CommandMeta = CommandMeta {
    name: "eightball",
    desc: "Ask the magic 8-ball a question.",
    category: "fun",
    usage: "!eightball <question>",
};

pub(crate) const ANSWERS: [&str; 20] = [
    "It is certain.",
    "It is decidedly so.",
    "Without a doubt.",
    "Yes, definitely.",
    "You may rely on it.",
    "As I see it, yes.",
    "Most likely.",
    "Outlook good.",
    "Yes.",
    "Signs point to yes.",
    "Reply hazy, try again.",
    "Ask again later.",
    "Better not tell you now.",
    "Cannot predict now.",
    "Concentrate and ask again.",
    "Don't count on it.",
    "My reply is no.",
    "My sources say no.",
    "Outlook not so good.",
    "Very doubtful.",
];

pub(crate) fn pick_answer<R: rand::Rng + ?Sized>(rng: &mut R) -> &'static str {
    ANSWERS.choose(rng).copied().unwrap_or(ANSWERS[0])
}

#[poise::command(prefix_command, slash_command, category = "Fun", aliases("8ball"), user_cooldown = 3)]
pub async fn eightball(
    ctx: Context<'_>,
    #[description = "Your yes/no question"]
    #[rest]
    question: Option<String>,
) -> Result<(), Error> {
    let Some(question) = question.filter(|question| !question.trim().is_empty()) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let answer = pick_answer(&mut rand::thread_rng());
    let embed = info_embed(
        "🎱 Magic 8-Ball",
        format!(
            "**Q:** {}\n**A:** {}",
            truncate_chars(question.trim(), 200),
            answer
        ),
    );

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::{ANSWERS, pick_answer};

    #[test]
    fn answers_come_from_the_fixed_list() {
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..50 {
            assert!(ANSWERS.contains(&pick_answer(&mut rng)));
        }
    }
}
