use std::time::Duration;

use futures::{Stream, StreamExt};
use tokio::time::{Instant, sleep_until, timeout_at};

use poise::serenity_prelude as serenity;

/// Default wait for destructive-command confirmations.
pub const CONFIRM_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Vote {
    Yes,
    No,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    Confirmed,
    Cancelled,
    Expired,
}

impl ConfirmationOutcome {
    pub fn is_confirmed(self) -> bool {
        matches!(self, ConfirmationOutcome::Confirmed)
    }
}

/// A single-voter yes/no gate with a deadline.
///
/// Only `proposer` can vote. The first accepted vote or the deadline resolves
/// the gate; afterwards it never changes.
#[derive(Clone, Debug)]
pub struct ConfirmationGate<P> {
    proposer: P,
    deadline: Instant,
    outcome: Option<ConfirmationOutcome>,
}

impl<P: PartialEq> ConfirmationGate<P> {
    pub fn new(proposer: P, deadline: Instant) -> Self {
        Self {
            proposer,
            deadline,
            outcome: None,
        }
    }

    pub fn with_timeout(proposer: P, timeout: Duration) -> Self {
        Self::new(proposer, Instant::now() + timeout)
    }

    pub fn proposer(&self) -> &P {
        &self.proposer
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// `None` while pending.
    pub fn outcome(&self) -> Option<ConfirmationOutcome> {
        self.outcome
    }

    /// Record a vote cast at `now`.
    ///
    /// Returns the outcome only on the call that resolves the gate. Votes from
    /// anyone but the proposer are ignored; a vote at or past the deadline
    /// resolves the gate as expired.
    pub fn vote(&mut self, voter: &P, vote: Vote, now: Instant) -> Option<ConfirmationOutcome> {
        if self.outcome.is_some() {
            return None;
        }

        if now >= self.deadline {
            return self.resolve(ConfirmationOutcome::Expired);
        }

        if *voter != self.proposer {
            return None;
        }

        self.resolve(match vote {
            Vote::Yes => ConfirmationOutcome::Confirmed,
            Vote::No => ConfirmationOutcome::Cancelled,
        })
    }

    /// Resolve as expired if the deadline has passed.
    pub fn expire(&mut self, now: Instant) -> Option<ConfirmationOutcome> {
        if self.outcome.is_some() || now < self.deadline {
            return None;
        }

        self.resolve(ConfirmationOutcome::Expired)
    }

    fn resolve(&mut self, outcome: ConfirmationOutcome) -> Option<ConfirmationOutcome> {
        self.outcome = Some(outcome);
        Some(outcome)
    }
}

/// A vote together with whatever delivered it (e.g. a button interaction).
#[derive(Clone, Debug)]
pub struct Ballot<P, T> {
    pub voter: P,
    pub vote: Vote,
    pub payload: T,
}

/// Drive `gate` from a stream of ballots until it resolves.
///
/// Returns the outcome and the payload of the ballot that resolved it (`None`
/// when the gate expired). If the stream ends early the gate still waits for
/// its deadline.
pub async fn await_confirmation<P, T, S>(
    gate: &mut ConfirmationGate<P>,
    mut ballots: S,
) -> (ConfirmationOutcome, Option<T>)
where
    P: PartialEq,
    S: Stream<Item = Ballot<P, T>> + Unpin,
{
    if let Some(outcome) = gate.outcome() {
        return (outcome, None);
    }

    loop {
        match timeout_at(gate.deadline(), ballots.next()).await {
            Ok(Some(ballot)) => {
                if let Some(outcome) = gate.vote(&ballot.voter, ballot.vote, Instant::now()) {
                    let payload = outcome_payload(outcome, ballot.payload);
                    return (outcome, payload);
                }
            }
            Ok(None) => {
                sleep_until(gate.deadline()).await;
                break;
            }
            Err(_elapsed) => break,
        }
    }

    let outcome = gate
        .expire(Instant::now())
        .or(gate.outcome())
        .unwrap_or(ConfirmationOutcome::Expired);
    (outcome, None)
}

fn outcome_payload<T>(outcome: ConfirmationOutcome, payload: T) -> Option<T> {
    match outcome {
        ConfirmationOutcome::Expired => None,
        _ => Some(payload),
    }
}

pub enum ConfirmationResult {
    Confirmed(serenity::ComponentInteraction),
    Declined(serenity::ComponentInteraction),
    TimedOut(serenity::Message),
}

impl ConfirmationResult {
    pub fn outcome(&self) -> ConfirmationOutcome {
        match self {
            ConfirmationResult::Confirmed(_) => ConfirmationOutcome::Confirmed,
            ConfirmationResult::Declined(_) => ConfirmationOutcome::Cancelled,
            ConfirmationResult::TimedOut(_) => ConfirmationOutcome::Expired,
        }
    }
}

/// Retract the prompt's buttons and show the final text for its outcome.
///
/// Returns the confirming interaction so the caller can keep editing the
/// same message while it works.
pub async fn resolve_confirmation_result<U, E>(
    ctx: poise::Context<'_, U, E>,
    confirmation: ConfirmationResult,
    timed_out_text: &str,
    declined_text: &str,
    processing_text: &str,
) -> Result<Option<serenity::ComponentInteraction>, serenity::Error>
where
    U: Send + Sync,
    E: Send + Sync,
{
    match confirmation {
        ConfirmationResult::TimedOut(message) => {
            message
                .channel_id
                .edit_message(
                    ctx.http(),
                    message.id,
                    serenity::EditMessage::new()
                        .content(timed_out_text)
                        .embeds(vec![])
                        .components(vec![]),
                )
                .await?;
            Ok(None)
        }
        ConfirmationResult::Declined(interaction) => {
            interaction
                .create_response(
                    ctx.http(),
                    serenity::CreateInteractionResponse::UpdateMessage(
                        serenity::CreateInteractionResponseMessage::new()
                            .content(declined_text)
                            .embeds(vec![])
                            .components(vec![]),
                    ),
                )
                .await?;
            Ok(None)
        }
        ConfirmationResult::Confirmed(interaction) => {
            interaction
                .create_response(
                    ctx.http(),
                    serenity::CreateInteractionResponse::UpdateMessage(
                        serenity::CreateInteractionResponseMessage::new()
                            .content(processing_text)
                            .embeds(vec![])
                            .components(vec![]),
                    ),
                )
                .await?;
            Ok(Some(interaction))
        }
    }
}

/// Post `content` with Confirm / Cancel buttons and wait for `voter`.
///
/// Presses from anyone else are acknowledged silently and do not count.
pub async fn prompt_confirm_decline<U, E>(
    ctx: poise::Context<'_, U, E>,
    voter: serenity::UserId,
    content: impl Into<String>,
    embed: Option<serenity::CreateEmbed>,
    timeout: Duration,
) -> Result<ConfirmationResult, serenity::Error>
where
    U: Send + Sync,
    E: Send + Sync,
{
    let ctx_id = ctx.id();
    let confirm_id = format!("{}_confirm", ctx_id);
    let decline_id = format!("{}_decline", ctx_id);

    let mut reply = poise::CreateReply::default()
        .content(content)
        .components(vec![serenity::CreateActionRow::Buttons(vec![
            serenity::CreateButton::new(&confirm_id)
                .label("Confirm")
                .style(serenity::ButtonStyle::Danger),
            serenity::CreateButton::new(&decline_id)
                .label("Cancel")
                .style(serenity::ButtonStyle::Secondary),
        ])]);
    if let Some(embed) = embed {
        reply = reply.embed(embed);
    }

    let mut gate = ConfirmationGate::with_timeout(voter, timeout);
    let message = ctx.send(reply).await?.message().await?.into_owned();

    let http = ctx.http();
    let ballots = message
        .await_component_interactions(ctx)
        .custom_ids(vec![confirm_id.clone(), decline_id])
        .timeout(timeout)
        .stream()
        .then(move |interaction| async move {
            if interaction.user.id != voter {
                let _ = interaction
                    .create_response(http, serenity::CreateInteractionResponse::Acknowledge)
                    .await;
            }
            interaction
        })
        .map(|interaction| Ballot {
            voter: interaction.user.id,
            vote: if interaction.data.custom_id == confirm_id {
                Vote::Yes
            } else {
                Vote::No
            },
            payload: interaction,
        });
    let ballots = std::pin::pin!(ballots);

    let result = match await_confirmation(&mut gate, ballots).await {
        (ConfirmationOutcome::Confirmed, Some(interaction)) => {
            ConfirmationResult::Confirmed(interaction)
        }
        (ConfirmationOutcome::Cancelled, Some(interaction)) => {
            ConfirmationResult::Declined(interaction)
        }
        _ => ConfirmationResult::TimedOut(message),
    };

    Ok(result)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::stream;
    use tokio::time::{Instant, sleep};

    use super::{Ballot, ConfirmationGate, ConfirmationOutcome, Vote, await_confirmation};

    const PROPOSER: u64 = 1;
    const STRANGER: u64 = 2;

    fn ballot(voter: u64, vote: Vote) -> Ballot<u64, &'static str> {
        Ballot {
            voter,
            vote,
            payload: "press",
        }
    }

    #[tokio::test(start_paused = true)]
    async fn gate_resolves_once() {
        let now = Instant::now();
        let mut gate = ConfirmationGate::new(PROPOSER, now + Duration::from_secs(30));

        assert_eq!(gate.vote(&STRANGER, Vote::Yes, now), None);
        assert_eq!(gate.outcome(), None);
        assert_eq!(
            gate.vote(&PROPOSER, Vote::No, now),
            Some(ConfirmationOutcome::Cancelled)
        );
        assert_eq!(gate.vote(&PROPOSER, Vote::Yes, now), None);
        assert_eq!(gate.expire(now + Duration::from_secs(60)), None);
        assert_eq!(gate.outcome(), Some(ConfirmationOutcome::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn late_vote_cannot_override_expiry() {
        let now = Instant::now();
        let deadline = now + Duration::from_secs(30);
        let mut gate = ConfirmationGate::new(PROPOSER, deadline);

        assert_eq!(gate.expire(now), None);
        assert_eq!(gate.expire(deadline), Some(ConfirmationOutcome::Expired));
        assert_eq!(gate.vote(&PROPOSER, Vote::Yes, deadline), None);
        assert_eq!(gate.outcome(), Some(ConfirmationOutcome::Expired));

        let mut unexpired = ConfirmationGate::new(PROPOSER, deadline);
        assert_eq!(
            unexpired.vote(&PROPOSER, Vote::Yes, deadline + Duration::from_secs(1)),
            Some(ConfirmationOutcome::Expired)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn no_vote_expires_after_timeout() {
        let started = Instant::now();
        let mut gate = ConfirmationGate::with_timeout(PROPOSER, Duration::from_secs(30));

        let (outcome, payload) =
            await_confirmation(&mut gate, stream::pending::<Ballot<u64, &str>>()).await;

        assert_eq!(outcome, ConfirmationOutcome::Expired);
        assert_eq!(payload, None);
        assert!(started.elapsed() >= Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn vote_after_deadline_is_too_late() {
        let mut gate = ConfirmationGate::with_timeout(PROPOSER, Duration::from_secs(30));
        let late = Box::pin(stream::once(async {
            sleep(Duration::from_secs(31)).await;
            ballot(PROPOSER, Vote::Yes)
        }));

        let (outcome, _) = await_confirmation(&mut gate, late).await;
        assert_eq!(outcome, ConfirmationOutcome::Expired);
    }

    #[tokio::test(start_paused = true)]
    async fn stranger_votes_are_ignored() {
        let mut gate = ConfirmationGate::with_timeout(PROPOSER, Duration::from_secs(30));
        let ballots = stream::iter(vec![
            ballot(STRANGER, Vote::No),
            ballot(STRANGER, Vote::Yes),
            ballot(PROPOSER, Vote::Yes),
        ]);

        let (outcome, payload) = await_confirmation(&mut gate, ballots).await;
        assert_eq!(outcome, ConfirmationOutcome::Confirmed);
        assert_eq!(payload, Some("press"));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_stream_still_waits_for_deadline() {
        let started = Instant::now();
        let mut gate = ConfirmationGate::with_timeout(PROPOSER, Duration::from_secs(30));

        let (outcome, _) =
            await_confirmation(&mut gate, stream::iter(vec![ballot(STRANGER, Vote::Yes)])).await;

        assert_eq!(outcome, ConfirmationOutcome::Expired);
        assert!(started.elapsed() >= Duration::from_secs(30));
    }
}
