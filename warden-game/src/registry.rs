use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::Rng;
use tracing::debug;

use crate::error::GameError;
use crate::session::{GameSession, ParticipantId};

/// Channel a session is scoped to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChannelKey(pub u64);

/// A single move request, independent of how the UI delivered it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveDescriptor {
    pub channel: ChannelKey,
    pub actor: ParticipantId,
    pub cell: usize,
}

/// Active games, at most one per channel.
///
/// Every operation takes the lock exactly once, so the "is a game running
/// here?" check and the insert or removal that follows cannot interleave with
/// another event for the same channel. Sessions are removed as soon as they
/// reach a terminal status; the final snapshot is handed back to the caller.
#[derive(Clone, Debug, Default)]
pub struct GameRegistry {
    sessions: Arc<Mutex<HashMap<ChannelKey, GameSession>>>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<ChannelKey, GameSession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_active(&self, channel: ChannelKey) -> bool {
        self.sessions().contains_key(&channel)
    }

    pub fn get(&self, channel: ChannelKey) -> Option<GameSession> {
        self.sessions().get(&channel).cloned()
    }

    pub fn start(
        &self,
        channel: ChannelKey,
        initiator: ParticipantId,
        opponent: ParticipantId,
    ) -> Result<GameSession, GameError> {
        self.start_with_rng(channel, initiator, opponent, &mut rand::thread_rng())
    }

    pub fn start_with_rng<R: Rng + ?Sized>(
        &self,
        channel: ChannelKey,
        initiator: ParticipantId,
        opponent: ParticipantId,
        rng: &mut R,
    ) -> Result<GameSession, GameError> {
        let mut sessions = self.sessions();
        if sessions.contains_key(&channel) {
            return Err(GameError::SessionAlreadyActive);
        }

        let session = GameSession::start(initiator, opponent, rng)?;
        sessions.insert(channel, session.clone());
        debug!(channel = channel.0, "game session started");

        Ok(session)
    }

    /// Apply a move and return the resulting session.
    ///
    /// When the move ends the game the session is no longer registered.
    pub fn apply_move(&self, request: MoveDescriptor) -> Result<GameSession, GameError> {
        let mut sessions = self.sessions();
        let session = sessions
            .get_mut(&request.channel)
            .ok_or(GameError::NoActiveSession)?;

        let status = session.apply_move(request.actor, request.cell)?;
        let snapshot = session.clone();

        if status.is_terminal() {
            sessions.remove(&request.channel);
            debug!(channel = request.channel.0, ?status, "game session finished");
        }

        Ok(snapshot)
    }

    /// Reset the running game in `channel`.
    pub fn reset(&self, channel: ChannelKey, actor: ParticipantId) -> Result<GameSession, GameError> {
        self.reset_with_rng(channel, actor, &mut rand::thread_rng())
    }

    pub fn reset_with_rng<R: Rng + ?Sized>(
        &self,
        channel: ChannelKey,
        actor: ParticipantId,
        rng: &mut R,
    ) -> Result<GameSession, GameError> {
        let mut sessions = self.sessions();
        let session = sessions
            .get_mut(&channel)
            .ok_or(GameError::NoActiveSession)?;

        session.reset(actor, rng)?;
        Ok(session.clone())
    }

    /// Reset a finished game and register it again.
    pub fn rematch(
        &self,
        channel: ChannelKey,
        finished: GameSession,
        actor: ParticipantId,
    ) -> Result<GameSession, GameError> {
        self.rematch_with_rng(channel, finished, actor, &mut rand::thread_rng())
    }

    pub fn rematch_with_rng<R: Rng + ?Sized>(
        &self,
        channel: ChannelKey,
        mut finished: GameSession,
        actor: ParticipantId,
        rng: &mut R,
    ) -> Result<GameSession, GameError> {
        let mut sessions = self.sessions();
        if sessions.contains_key(&channel) {
            return Err(GameError::SessionAlreadyActive);
        }

        finished.reset(actor, rng)?;
        sessions.insert(channel, finished.clone());
        debug!(channel = channel.0, "game session restarted");

        Ok(finished)
    }

    /// Time out the running game in `channel` and unregister it.
    pub fn expire(&self, channel: ChannelKey) -> Option<GameSession> {
        let mut session = self.sessions().remove(&channel)?;
        session.expire();
        debug!(channel = channel.0, "game session timed out");
        Some(session)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::{ChannelKey, GameRegistry, MoveDescriptor};
    use crate::board::{Board, Mark};
    use crate::error::GameError;
    use crate::session::{GameStatus, ParticipantId};

    const CHANNEL: ChannelKey = ChannelKey(10);
    const P1: ParticipantId = ParticipantId(1);
    const P2: ParticipantId = ParticipantId(2);

    fn play(registry: &GameRegistry, actor: ParticipantId, cell: usize) -> Result<GameStatus, GameError> {
        registry
            .apply_move(MoveDescriptor {
                channel: CHANNEL,
                actor,
                cell,
            })
            .map(|session| session.status())
    }

    #[test]
    fn second_game_in_same_channel_is_rejected() {
        let registry = GameRegistry::new();
        registry.start(CHANNEL, P1, P2).unwrap();

        assert_eq!(
            registry.start(CHANNEL, ParticipantId(3), ParticipantId(4)),
            Err(GameError::SessionAlreadyActive)
        );
        assert!(registry.start(ChannelKey(11), P1, P2).is_ok());
    }

    #[test]
    fn winning_move_unregisters_the_session() {
        let registry = GameRegistry::new();
        let mut rng = StdRng::seed_from_u64(3);
        let session = registry.start_with_rng(CHANNEL, P1, P2, &mut rng).unwrap();
        let first = session.player(Mark::A);
        let second = session.player(Mark::B);

        for (actor, cell) in [(first, 0), (second, 3), (first, 1), (second, 4)] {
            assert_eq!(play(&registry, actor, cell), Ok(GameStatus::InProgress));
        }
        assert_eq!(play(&registry, first, 2), Ok(GameStatus::Won(Mark::A)));
        assert!(!registry.is_active(CHANNEL));
        assert_eq!(play(&registry, second, 5), Err(GameError::NoActiveSession));
    }

    #[test]
    fn rejected_move_keeps_session_untouched() {
        let registry = GameRegistry::new();
        let session = registry.start(CHANNEL, P1, P2).unwrap();
        let waiting = session.player(Mark::B);

        assert_eq!(play(&registry, waiting, 0), Err(GameError::NotYourTurn));
        assert_eq!(registry.get(CHANNEL), Some(session));
    }

    #[test]
    fn expire_times_out_and_frees_the_channel() {
        let registry = GameRegistry::new();
        registry.start(CHANNEL, P1, P2).unwrap();

        let expired = registry.expire(CHANNEL).unwrap();
        assert_eq!(expired.status(), GameStatus::TimedOut);
        assert!(!registry.is_active(CHANNEL));
        assert!(registry.expire(CHANNEL).is_none());
        assert!(registry.start(CHANNEL, P1, P2).is_ok());
    }

    #[test]
    fn reset_and_rematch() {
        let registry = GameRegistry::new();
        let session = registry.start(CHANNEL, P1, P2).unwrap();
        let first = session.player(Mark::A);
        play(&registry, first, 4).unwrap();

        assert_eq!(
            registry.reset(CHANNEL, ParticipantId(9)),
            Err(GameError::ResetNotAuthorized)
        );
        let reset = registry.reset(CHANNEL, P2).unwrap();
        assert_eq!(*reset.board(), Board::new());

        let expired = registry.expire(CHANNEL).unwrap();
        let rematch = registry.rematch(CHANNEL, expired.clone(), P1).unwrap();
        assert_eq!(rematch.status(), GameStatus::InProgress);
        assert!(registry.is_active(CHANNEL));

        assert_eq!(
            registry.rematch(CHANNEL, expired, P1),
            Err(GameError::SessionAlreadyActive)
        );
    }
}
