use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{guild_only_message, usage_message};
use warden_core::{Context, Error};
use warden_game::{
    CELL_COUNT, ChannelKey, GameError, GameSession, GameStatus, Mark, MoveDescriptor,
    ParticipantId,
};
use warden_utils::confirmation::{prompt_confirm_decline, resolve_confirmation_result};

pub const META: CommandMeta = CommandMeta {
    name: "tictactoe",
    desc: "Challenge someone to a game of Tic-Tac-Toe.",
    category: "fun",
    usage: "!tictactoe <opponent>",
};

const CHALLENGE_TIMEOUT: Duration = Duration::from_secs(60);
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum GameButton {
    Cell(usize),
    Reset,
    Rematch,
}

pub(crate) fn button_id(prefix: &str, button: GameButton) -> String {
    match button {
        GameButton::Cell(index) => format!("{prefix}_cell_{index}"),
        GameButton::Reset => format!("{prefix}_reset"),
        GameButton::Rematch => format!("{prefix}_rematch"),
    }
}

pub(crate) fn parse_button_id(prefix: &str, custom_id: &str) -> Option<GameButton> {
    let rest = custom_id.strip_prefix(prefix)?.strip_prefix('_')?;
    match rest {
        "reset" => Some(GameButton::Reset),
        "rematch" => Some(GameButton::Rematch),
        _ => rest
            .strip_prefix("cell_")?
            .parse::<usize>()
            .ok()
            .map(GameButton::Cell),
    }
}

fn mention(player: ParticipantId) -> String {
    format!("<@{}>", player.0)
}

pub(crate) fn status_line(session: &GameSession) -> String {
    let header = format!(
        "{} ({}) vs {} ({})",
        mention(session.player(Mark::A)),
        Mark::A.symbol(),
        mention(session.player(Mark::B)),
        Mark::B.symbol()
    );

    let state = match session.status() {
        GameStatus::InProgress => format!(
            "{}'s turn ({})",
            mention(session.current_player()),
            session.to_move().symbol()
        ),
        GameStatus::Won(mark) => format!("🏆 {} wins!", mention(session.player(mark))),
        GameStatus::Draw => "It's a draw!".to_owned(),
        GameStatus::TimedOut => "⌛ Game over: nobody moved for 2 minutes.".to_owned(),
    };

    format!("**Tic-Tac-Toe**\n{header}\n{state}")
}

/// 3x3 cell grid plus a control row. Cells lock once taken or once the game ends.
pub(crate) fn board_components(
    prefix: &str,
    session: &GameSession,
    controls_live: bool,
) -> Vec<serenity::CreateActionRow> {
    let board = session.board();
    let finished = session.status().is_terminal();
    let winning_line = board.winning_line();

    let mut rows: Vec<serenity::CreateActionRow> = (0..3)
        .map(|row| {
            let buttons = (0..3)
                .map(|col| {
                    let index = row * 3 + col;
                    let cell = board.cells()[index];
                    let in_line = winning_line.is_some_and(|line| line.contains(&index));
                    let style = match cell {
                        _ if in_line => serenity::ButtonStyle::Success,
                        Some(Mark::A) => serenity::ButtonStyle::Danger,
                        Some(Mark::B) => serenity::ButtonStyle::Primary,
                        None => serenity::ButtonStyle::Secondary,
                    };
                    serenity::CreateButton::new(button_id(prefix, GameButton::Cell(index)))
                        .label(cell.map_or("·", Mark::symbol))
                        .style(style)
                        .disabled(finished || cell.is_some())
                })
                .collect();
            serenity::CreateActionRow::Buttons(buttons)
        })
        .collect();

    if controls_live {
        let control = if finished {
            serenity::CreateButton::new(button_id(prefix, GameButton::Rematch))
                .label("Rematch")
                .style(serenity::ButtonStyle::Success)
        } else {
            serenity::CreateButton::new(button_id(prefix, GameButton::Reset))
                .label("Reset")
                .style(serenity::ButtonStyle::Secondary)
        };
        rows.push(serenity::CreateActionRow::Buttons(vec![control]));
    }

    rows
}

fn error_text(error: GameError) -> String {
    let text = error.to_string();
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
        None => text,
    }
}

async fn reject(
    http: &serenity::Http,
    press: &serenity::ComponentInteraction,
    error: GameError,
) -> Result<(), serenity::Error> {
    press
        .create_response(
            http,
            serenity::CreateInteractionResponse::Message(
                serenity::CreateInteractionResponseMessage::new()
                    .content(error_text(error))
                    .ephemeral(true),
            ),
        )
        .await
}

async fn redraw(
    http: &serenity::Http,
    press: &serenity::ComponentInteraction,
    prefix: &str,
    session: &GameSession,
    controls_live: bool,
) -> Result<(), serenity::Error> {
    press
        .create_response(
            http,
            serenity::CreateInteractionResponse::UpdateMessage(
                serenity::CreateInteractionResponseMessage::new()
                    .content(status_line(session))
                    .components(board_components(prefix, session, controls_live)),
            ),
        )
        .await
}

#[poise::command(prefix_command, slash_command, category = "Fun", aliases("ttt"), channel_cooldown = 10)]
pub async fn tictactoe(
    ctx: Context<'_>,
    #[description = "Who you want to play against"] opponent: Option<serenity::User>,
) -> Result<(), Error> {
    if ctx.guild_id().is_none() {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    }

    let Some(opponent) = opponent else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    if opponent.id == ctx.author().id {
        ctx.say(error_text(GameError::SamePlayer)).await?;
        return Ok(());
    }
    if opponent.bot {
        ctx.say("Bots don't play Tic-Tac-Toe. Pick a human opponent.")
            .await?;
        return Ok(());
    }

    let games = &ctx.data().games;
    let channel = ChannelKey(ctx.channel_id().get());
    if games.is_active(channel) {
        ctx.say(error_text(GameError::SessionAlreadyActive)).await?;
        return Ok(());
    }

    let challenge = prompt_confirm_decline(
        ctx,
        opponent.id,
        format!(
            "<@{}>, <@{}> challenges you to Tic-Tac-Toe! Do you accept?",
            opponent.id.get(),
            ctx.author().id.get()
        ),
        None,
        CHALLENGE_TIMEOUT,
    )
    .await?;
    let outcome = challenge.outcome();
    let Some(accepted) = resolve_confirmation_result(
        ctx,
        challenge,
        "The challenge expired without an answer.",
        "The challenge was declined.",
        "Setting up the board...",
    )
    .await?
    else {
        debug!(?outcome, "tic-tac-toe challenge not accepted");
        return Ok(());
    };

    let session = match games.start(
        channel,
        ParticipantId(ctx.author().id.get()),
        ParticipantId(opponent.id.get()),
    ) {
        Ok(session) => session,
        Err(error) => {
            accepted
                .edit_response(
                    ctx.http(),
                    serenity::EditInteractionResponse::new().content(error_text(error)),
                )
                .await?;
            return Ok(());
        }
    };
    info!(channel = channel.0, "tic-tac-toe game started");

    let prefix = ctx.id().to_string();
    accepted
        .edit_response(
            ctx.http(),
            serenity::EditInteractionResponse::new()
                .content(status_line(&session))
                .components(board_components(&prefix, &session, true)),
        )
        .await?;

    let message = *accepted.message;
    let custom_ids: Vec<String> = (0..CELL_COUNT)
        .map(GameButton::Cell)
        .chain([GameButton::Reset, GameButton::Rematch])
        .map(|button| button_id(&prefix, button))
        .collect();

    let mut last = session;
    let mut deadline = Instant::now() + INACTIVITY_TIMEOUT;

    loop {
        let press = message
            .await_component_interaction(ctx)
            .custom_ids(custom_ids.clone())
            .timeout(deadline.saturating_duration_since(Instant::now()))
            .await;

        let Some(press) = press else {
            // Inactivity: an unfinished game times out, a finished one just loses its Rematch button.
            let final_state = if last.status().is_terminal() {
                last
            } else {
                games.expire(channel).unwrap_or(last)
            };
            message
                .channel_id
                .edit_message(
                    ctx.http(),
                    message.id,
                    serenity::EditMessage::new()
                        .content(status_line(&final_state))
                        .components(board_components(&prefix, &final_state, false)),
                )
                .await?;
            break;
        };

        let actor = ParticipantId(press.user.id.get());
        let result = match parse_button_id(&prefix, &press.data.custom_id) {
            Some(GameButton::Cell(cell)) => games.apply_move(MoveDescriptor {
                channel,
                actor,
                cell,
            }),
            Some(GameButton::Reset) => games.reset(channel, actor),
            Some(GameButton::Rematch) => games.rematch(channel, last.clone(), actor),
            None => continue,
        };

        match result {
            Ok(session) => {
                redraw(ctx.http(), &press, &prefix, &session, true).await?;
                deadline = Instant::now() + INACTIVITY_TIMEOUT;
                last = session;
            }
            Err(error) => reject(ctx.http(), &press, error).await?,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use warden_game::{GameSession, Mark, ParticipantId};

    use super::{GameButton, button_id, parse_button_id, status_line};

    #[test]
    fn button_ids_round_trip_under_their_prefix() {
        for button in [GameButton::Cell(0), GameButton::Cell(8), GameButton::Reset, GameButton::Rematch] {
            assert_eq!(parse_button_id("42", &button_id("42", button)), Some(button));
        }
        assert_eq!(parse_button_id("42", "43_reset"), None);
        assert_eq!(parse_button_id("4", "42_reset"), None);
        assert_eq!(parse_button_id("42", "42_cell_x"), None);
    }

    #[test]
    fn status_follows_the_game() {
        let mut session =
            GameSession::with_assignment(ParticipantId(1), ParticipantId(1), ParticipantId(2)).unwrap();
        assert!(status_line(&session).ends_with("<@1>'s turn (X)"));

        for (actor, cell) in [(1, 0), (2, 3), (1, 1), (2, 4), (1, 2)] {
            session.apply_move(ParticipantId(actor), cell).unwrap();
        }
        assert!(status_line(&session).ends_with("🏆 <@1> wins!"));
        assert_eq!(session.board().winning_line(), Some([0, 1, 2]));
        assert_eq!(session.mark_of(ParticipantId(2)), Some(Mark::B));
    }
}
