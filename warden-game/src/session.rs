use rand::Rng;

use crate::board::{Board, CELL_COUNT, Mark};
use crate::error::GameError;

/// Opaque reference to a platform user, compared for equality only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParticipantId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Won(Mark),
    Draw,
    TimedOut,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// One game between two participants.
///
/// Marks are assigned at random on start and on every reset; whoever holds
/// [`Mark::A`] moves first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSession {
    initiator: ParticipantId,
    player_a: ParticipantId,
    player_b: ParticipantId,
    board: Board,
    to_move: Mark,
    status: GameStatus,
}

impl GameSession {
    /// Start a game between `initiator` and `opponent` with a random mark assignment.
    pub fn start<R: Rng + ?Sized>(
        initiator: ParticipantId,
        opponent: ParticipantId,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        if initiator == opponent {
            return Err(GameError::SamePlayer);
        }

        let (player_a, player_b) = if rng.gen_bool(0.5) {
            (initiator, opponent)
        } else {
            (opponent, initiator)
        };

        Self::with_assignment(initiator, player_a, player_b)
    }

    /// Start a game with a fixed mark assignment.
    pub fn with_assignment(
        initiator: ParticipantId,
        player_a: ParticipantId,
        player_b: ParticipantId,
    ) -> Result<Self, GameError> {
        if player_a == player_b {
            return Err(GameError::SamePlayer);
        }

        Ok(Self {
            initiator,
            player_a,
            player_b,
            board: Board::new(),
            to_move: Mark::A,
            status: GameStatus::InProgress,
        })
    }

    pub fn initiator(&self) -> ParticipantId {
        self.initiator
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    pub fn player(&self, mark: Mark) -> ParticipantId {
        match mark {
            Mark::A => self.player_a,
            Mark::B => self.player_b,
        }
    }

    pub fn current_player(&self) -> ParticipantId {
        self.player(self.to_move)
    }

    pub fn mark_of(&self, actor: ParticipantId) -> Option<Mark> {
        if actor == self.player_a {
            Some(Mark::A)
        } else if actor == self.player_b {
            Some(Mark::B)
        } else {
            None
        }
    }

    pub fn is_participant(&self, actor: ParticipantId) -> bool {
        self.mark_of(actor).is_some()
    }

    /// Place `actor`'s mark on `cell` and evaluate the result.
    ///
    /// Win detection runs before draw detection, so a final move that both
    /// fills the board and completes a line is a win. On error nothing changes.
    ///
    /// Checks run turn, then cell range, then occupancy: a press from the
    /// wrong player is `NotYourTurn` whatever cell it names.
    pub fn apply_move(&mut self, actor: ParticipantId, cell: usize) -> Result<GameStatus, GameError> {
        if self.status.is_terminal() || self.mark_of(actor) != Some(self.to_move) {
            return Err(GameError::NotYourTurn);
        }

        if cell >= CELL_COUNT {
            return Err(GameError::InvalidCell(cell));
        }

        if !self.board.is_empty_at(cell) {
            return Err(GameError::CellOccupied);
        }

        self.board.place(cell, self.to_move);

        if let Some(mark) = self.board.winner() {
            self.status = GameStatus::Won(mark);
        } else if self.board.is_full() {
            self.status = GameStatus::Draw;
        } else {
            self.to_move = self.to_move.other();
        }

        Ok(self.status)
    }

    /// Clear the board and re-draw marks. Allowed from any state.
    pub fn reset<R: Rng + ?Sized>(
        &mut self,
        actor: ParticipantId,
        rng: &mut R,
    ) -> Result<(), GameError> {
        if !self.is_participant(actor) && actor != self.initiator {
            return Err(GameError::ResetNotAuthorized);
        }

        if rng.gen_bool(0.5) {
            std::mem::swap(&mut self.player_a, &mut self.player_b);
        }

        self.board = Board::new();
        self.to_move = Mark::A;
        self.status = GameStatus::InProgress;
        Ok(())
    }

    /// Mark an in-progress game as abandoned. Terminal games keep their result.
    pub fn expire(&mut self) {
        if !self.status.is_terminal() {
            self.status = GameStatus::TimedOut;
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::{GameSession, GameStatus, ParticipantId};
    use crate::board::{Board, Mark};
    use crate::error::GameError;

    const P1: ParticipantId = ParticipantId(1);
    const P2: ParticipantId = ParticipantId(2);
    const OUTSIDER: ParticipantId = ParticipantId(3);

    fn fixed_session() -> GameSession {
        GameSession::with_assignment(P1, P1, P2).unwrap()
    }

    #[test]
    fn top_row_wins_for_first_player() {
        let mut session = fixed_session();
        assert_eq!(session.apply_move(P1, 0), Ok(GameStatus::InProgress));
        assert_eq!(session.apply_move(P2, 3), Ok(GameStatus::InProgress));
        assert_eq!(session.apply_move(P1, 1), Ok(GameStatus::InProgress));
        assert_eq!(session.apply_move(P2, 4), Ok(GameStatus::InProgress));
        assert_eq!(session.apply_move(P1, 2), Ok(GameStatus::Won(Mark::A)));
        assert_eq!(session.board().winning_line(), Some([0, 1, 2]));
    }

    #[test]
    fn full_board_without_line_is_a_draw() {
        // Ends on [A,B,A,A,B,B,B,A,A].
        let mut session = fixed_session();
        for (actor, cell) in [
            (P1, 0),
            (P2, 1),
            (P1, 2),
            (P2, 4),
            (P1, 3),
            (P2, 5),
            (P1, 7),
            (P2, 6),
        ] {
            assert_eq!(session.apply_move(actor, cell), Ok(GameStatus::InProgress));
        }
        assert_eq!(session.apply_move(P1, 8), Ok(GameStatus::Draw));

        let a = Some(Mark::A);
        let b = Some(Mark::B);
        assert_eq!(
            *session.board(),
            Board::from_cells([a, b, a, a, b, b, b, a, a])
        );
    }

    #[test]
    fn final_move_that_fills_and_wins_is_a_win() {
        let mut session = fixed_session();
        for (actor, cell) in [
            (P1, 0),
            (P2, 1),
            (P1, 2),
            (P2, 4),
            (P1, 3),
            (P2, 5),
            (P1, 7),
            (P2, 8),
        ] {
            session.apply_move(actor, cell).unwrap();
        }
        // Cell 6 completes the 0-3-6 column and fills the board.
        assert_eq!(session.apply_move(P1, 6), Ok(GameStatus::Won(Mark::A)));
    }

    #[test]
    fn occupied_cell_is_rejected_without_mutation() {
        let mut session = fixed_session();
        session.apply_move(P1, 4).unwrap();
        let before = session.clone();

        assert_eq!(session.apply_move(P2, 4), Err(GameError::CellOccupied));
        assert_eq!(session, before);
    }

    #[test]
    fn out_of_turn_move_is_rejected_without_mutation() {
        let mut session = fixed_session();
        let before = session.clone();

        assert_eq!(session.apply_move(P2, 0), Err(GameError::NotYourTurn));
        assert_eq!(session.apply_move(OUTSIDER, 0), Err(GameError::NotYourTurn));
        assert_eq!(session, before);
    }

    #[test]
    fn invalid_cell_is_rejected() {
        let mut session = fixed_session();
        assert_eq!(session.apply_move(P1, 9), Err(GameError::InvalidCell(9)));
        assert_eq!(session.apply_move(P2, 9), Err(GameError::NotYourTurn));
        assert_eq!(*session.board(), Board::new());
    }

    #[test]
    fn no_moves_after_game_ends() {
        let mut session = fixed_session();
        for (actor, cell) in [(P1, 0), (P2, 3), (P1, 1), (P2, 4), (P1, 2)] {
            session.apply_move(actor, cell).unwrap();
        }
        assert_eq!(session.apply_move(P2, 5), Err(GameError::NotYourTurn));
        assert_eq!(session.apply_move(P1, 5), Err(GameError::NotYourTurn));
    }

    #[test]
    fn reset_clears_terminal_games() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut session = fixed_session();
        for (actor, cell) in [(P1, 0), (P2, 3), (P1, 1), (P2, 4), (P1, 2)] {
            session.apply_move(actor, cell).unwrap();
        }

        session.reset(P2, &mut rng).unwrap();
        assert_eq!(*session.board(), Board::new());
        assert_eq!(session.status(), GameStatus::InProgress);
        assert_eq!(session.to_move(), Mark::A);
        assert!(session.is_participant(P1) && session.is_participant(P2));

        let mut timed_out = fixed_session();
        timed_out.expire();
        assert_eq!(timed_out.status(), GameStatus::TimedOut);
        timed_out.reset(P1, &mut rng).unwrap();
        assert_eq!(timed_out.status(), GameStatus::InProgress);
    }

    #[test]
    fn reset_requires_participant_or_initiator() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = GameSession::with_assignment(OUTSIDER, P1, P2).unwrap();
        session.apply_move(P1, 0).unwrap();

        assert_eq!(
            session.reset(ParticipantId(99), &mut rng),
            Err(GameError::ResetNotAuthorized)
        );
        assert_eq!(session.board().count(Mark::A), 1);

        // The initiator may reset even without playing.
        session.reset(OUTSIDER, &mut rng).unwrap();
        assert_eq!(*session.board(), Board::new());
    }

    #[test]
    fn expire_keeps_finished_results() {
        let mut session = fixed_session();
        for (actor, cell) in [(P1, 0), (P2, 3), (P1, 1), (P2, 4), (P1, 2)] {
            session.apply_move(actor, cell).unwrap();
        }
        session.expire();
        assert_eq!(session.status(), GameStatus::Won(Mark::A));
    }

    #[test]
    fn start_assigns_both_players_and_rejects_self_play() {
        let mut rng = StdRng::seed_from_u64(42);
        let session = GameSession::start(P1, P2, &mut rng).unwrap();
        assert_eq!(session.initiator(), P1);
        assert_ne!(session.player(Mark::A), session.player(Mark::B));
        assert!(session.is_participant(P1) && session.is_participant(P2));
        assert_eq!(session.current_player(), session.player(Mark::A));

        assert_eq!(
            GameSession::start(P1, P1, &mut rng),
            Err(GameError::SamePlayer)
        );
    }

    proptest! {
        #[test]
        fn mark_counts_never_drift(cells in proptest::collection::vec(0usize..12, 0..40), seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut session = GameSession::start(P1, P2, &mut rng).unwrap();

            for cell in cells {
                let actor = session.current_player();
                let before = *session.board();
                match session.apply_move(actor, cell) {
                    Ok(_) => {}
                    Err(_) => {
                        prop_assert_eq!(*session.board(), before);
                    }
                }

                let a = session.board().count(Mark::A);
                let b = session.board().count(Mark::B);
                prop_assert!(a == b || a == b + 1);

                if session.status().is_terminal() {
                    break;
                }
            }
        }
    }
}
