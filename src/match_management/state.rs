//! Leg state management module
//!
//! A [`Leg`] owns everything one game needs: its serving order, the variant
//! state picked at creation, and the committed visit history. Every
//! mutating method either succeeds completely or returns an error with the
//! leg untouched.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::match_management::error::{InvalidVisitReason, ScoringError};
use crate::match_management::rotation::TurnOrder;
use crate::match_management::statistics::StatisticsX01;
use crate::match_management::throws::{Dart, LegId, PlayerId, Visit};
use crate::match_management::variant::{
    GameType, LegParameters, VariantRules, VariantState, VisitResolution,
};

/// A participant and their handicap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegPlayer {
    pub player_id: PlayerId,
    /// Added to the X01 starting score once, at leg creation
    #[serde(default)]
    pub handicap: i32,
}

impl LegPlayer {
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            handicap: 0,
        }
    }

    pub fn with_handicap(player_id: PlayerId, handicap: i32) -> Self {
        Self {
            player_id,
            handicap,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegStatus {
    Open,
    Finished,
}

/// Whether a visit must come from the current player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPolicy {
    #[default]
    Enforce,
    /// Administrative correction: accept a visit from any active player
    Override,
}

/// Result of committing one visit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitOutcome {
    /// The visit as stored: sequence assigned, bust flag set, unthrown darts after a checkout
    pub visit: Visit,
    pub finished: bool,
    pub winner: Option<PlayerId>,
    /// Player due next, `None` once the leg is finished
    pub next_player: Option<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    id: LegId,
    game_type: GameType,
    parameters: LegParameters,
    players: Vec<LegPlayer>,
    turn: TurnOrder,
    variant: VariantState,
    visits: Vec<Visit>,
    status: LegStatus,
    winner: Option<PlayerId>,
    initial_turn: TurnOrder,
    initial_variant: VariantState,
}

impl Leg {
    /// Create a leg; `players` are given in serving order
    pub fn new(
        game_type: GameType,
        parameters: LegParameters,
        players: Vec<LegPlayer>,
    ) -> Result<Self, ScoringError> {
        Self::with_id(Uuid::new_v4(), game_type, parameters, players)
    }

    pub fn with_id(
        id: LegId,
        game_type: GameType,
        parameters: LegParameters,
        players: Vec<LegPlayer>,
    ) -> Result<Self, ScoringError> {
        let ids: Vec<PlayerId> = players.iter().map(|p| p.player_id).collect();
        let turn = TurnOrder::new(&ids)?;
        let variant = VariantState::new(game_type, &parameters, &players)?;

        debug!(leg_id = %id, ?game_type, players = players.len(), "Leg created");

        Ok(Self {
            id,
            game_type,
            parameters,
            players,
            initial_turn: turn.clone(),
            initial_variant: variant.clone(),
            turn,
            variant,
            visits: Vec::new(),
            status: LegStatus::Open,
            winner: None,
        })
    }

    pub fn id(&self) -> LegId {
        self.id
    }

    pub fn game_type(&self) -> GameType {
        self.game_type
    }

    pub fn parameters(&self) -> &LegParameters {
        &self.parameters
    }

    /// Participants in serving order
    pub fn players(&self) -> &[LegPlayer] {
        &self.players
    }

    pub fn turn_order(&self) -> &TurnOrder {
        &self.turn
    }

    pub fn variant(&self) -> &VariantState {
        &self.variant
    }

    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    pub fn status(&self) -> LegStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status == LegStatus::Finished
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// Player due to throw, `None` once the leg is finished
    pub fn current_player(&self) -> Option<PlayerId> {
        (!self.is_finished()).then(|| self.turn.current())
    }

    fn seat_of(&self, player: PlayerId) -> Option<usize> {
        self.turn.position(player)
    }

    /// X01 remaining score
    pub fn remaining(&self, player: PlayerId) -> Option<u32> {
        let seat = self.seat_of(player)?;
        self.variant.as_x01().map(|state| state.remaining[seat])
    }

    /// Cricket marks, in `CRICKET_NUMBERS` order
    pub fn cricket_marks(&self, player: PlayerId) -> Option<[u8; 7]> {
        let seat = self.seat_of(player)?;
        self.variant.as_cricket().map(|state| state.marks[seat])
    }

    /// Knockout lives left
    pub fn lives(&self, player: PlayerId) -> Option<u32> {
        let seat = self.seat_of(player)?;
        self.variant.as_knockout().map(|state| state.lives[seat])
    }

    /// Running score for variants that count up: Cricket penalty points,
    /// Shootout and Darts-at-X totals
    pub fn points(&self, player: PlayerId) -> Option<u32> {
        let seat = self.seat_of(player)?;
        match &self.variant {
            VariantState::Cricket(state) => Some(state.scores[seat]),
            VariantState::Quota(state) => Some(state.scores[seat]),
            _ => None,
        }
    }

    /// Tic-Tac-Toe board, row-major
    pub fn tic_tac_toe_numbers(&self) -> Option<[u32; 9]> {
        self.variant.as_tic_tac_toe().map(|state| state.numbers)
    }

    /// Validate and commit one visit
    pub fn apply_visit(
        &mut self,
        visit: Visit,
        policy: TurnPolicy,
    ) -> Result<VisitOutcome, ScoringError> {
        let seat = self.check_visit(&visit, policy)?;
        Ok(self.commit(seat, visit))
    }

    /// Every check a visit must pass; nothing is mutated
    fn check_visit(&self, visit: &Visit, policy: TurnPolicy) -> Result<usize, ScoringError> {
        if self.is_finished() {
            return Err(ScoringError::LegClosed(self.id));
        }
        if visit.leg_id != self.id {
            return Err(InvalidVisitReason::LegMismatch {
                expected: self.id,
                found: visit.leg_id,
            }
            .into());
        }
        visit.validate()?;

        let player = visit.player_id;
        let seat = self
            .seat_of(player)
            .ok_or(InvalidVisitReason::UnknownPlayer(player))?;
        if !self.turn.is_active(player) {
            return Err(InvalidVisitReason::Eliminated(player).into());
        }

        let expected = self.turn.current();
        if policy == TurnPolicy::Enforce && player != expected {
            return Err(ScoringError::WrongTurn { player, expected });
        }
        Ok(seat)
    }

    /// Apply a checked visit; infallible
    fn commit(&mut self, seat: usize, mut visit: Visit) -> VisitOutcome {
        let VisitResolution {
            bust,
            darts_used,
            finished,
            winner,
        } = self.variant.apply(seat, &visit, &mut self.turn);

        visit.sequence = self.visits.len() as u32 + 1;
        visit.bust = bust;
        if finished && !bust {
            visit.truncate_to(darts_used);
        }

        let player = visit.player_id;
        debug!(
            leg_id = %self.id,
            player_id = %player,
            sequence = visit.sequence,
            darts = %visit.darts_string(),
            "Visit committed"
        );
        if bust {
            debug!(leg_id = %self.id, player_id = %player, "Bust");
        }

        let next_player = if finished {
            self.status = LegStatus::Finished;
            self.winner = winner.and_then(|s| self.turn.player_at(s));
            info!(leg_id = %self.id, winner = ?self.winner, visits = visit.sequence, "Leg finished");
            None
        } else {
            self.turn.advance_from(player)
        };

        self.visits.push(visit.clone());
        VisitOutcome {
            visit,
            finished,
            winner: self.winner,
            next_player,
        }
    }

    /// The leg as it was before any visit
    fn reset(&self) -> Leg {
        Leg {
            turn: self.initial_turn.clone(),
            variant: self.initial_variant.clone(),
            visits: Vec::new(),
            status: LegStatus::Open,
            winner: None,
            ..self.clone()
        }
    }

    /// Rebuild the leg from scratch by replaying `history` in order
    ///
    /// Turn order is not enforced, history may hold administrative
    /// corrections. Bust flags, finish state and winner are recomputed.
    fn replay(&self, history: Vec<Visit>) -> Result<Leg, ScoringError> {
        let mut leg = self.reset();
        for mut visit in history {
            let sequence = visit.sequence;
            visit.bust = false;
            match leg.check_visit(&visit, TurnPolicy::Override) {
                Ok(seat) => {
                    leg.commit(seat, visit);
                }
                Err(err) => {
                    warn!(leg_id = %self.id, sequence, error = %err, "Replayed history rejected");
                    return Err(InvalidVisitReason::ReplayRejected(sequence).into());
                }
            }
        }
        Ok(leg)
    }

    /// Replace the darts of a committed visit and replay the leg
    pub fn correct_visit(&mut self, sequence: u32, darts: &[Dart]) -> Result<(), ScoringError> {
        let index = self
            .visits
            .iter()
            .position(|v| v.sequence == sequence)
            .ok_or(InvalidVisitReason::UnknownSequence(sequence))?;

        let original = &self.visits[index];
        let mut replacement = Visit::new(self.id, original.player_id, darts)?;
        replacement.sequence = original.sequence;
        replacement.created = original.created;

        let mut history = self.visits.clone();
        history[index] = replacement;
        let rebuilt = self.replay(history)?;

        info!(leg_id = %self.id, sequence, "Visit corrected");
        *self = rebuilt;
        Ok(())
    }

    /// Remove a committed visit and replay the leg
    ///
    /// Later visits move up one sequence number.
    pub fn delete_visit(&mut self, sequence: u32) -> Result<Visit, ScoringError> {
        let index = self
            .visits
            .iter()
            .position(|v| v.sequence == sequence)
            .ok_or(InvalidVisitReason::UnknownSequence(sequence))?;

        let mut history = self.visits.clone();
        let removed = history.remove(index);
        let rebuilt = self.replay(history)?;

        info!(leg_id = %self.id, sequence, "Visit deleted");
        *self = rebuilt;
        Ok(removed)
    }

    /// Remove the last visit and give the turn back to its thrower
    ///
    /// A finished leg is reopened.
    pub fn undo_last_visit(&mut self) -> Result<Visit, ScoringError> {
        let mut history = self.visits.clone();
        let undone = history
            .pop()
            .ok_or(ScoringError::NotApplicable("leg has no visits to undo"))?;

        let mut rebuilt = self.replay(history)?;
        rebuilt.turn.set_current(undone.player_id);

        info!(
            leg_id = %self.id,
            player_id = %undone.player_id,
            sequence = undone.sequence,
            "Visit undone"
        );
        *self = rebuilt;
        Ok(undone)
    }

    /// Put `new` into `old`'s seat
    ///
    /// Serving position, running state and history carry over; past visits
    /// are rewritten to the new player.
    pub fn substitute_player(&mut self, old: PlayerId, new: PlayerId) -> Result<(), ScoringError> {
        let mut turn = self.turn.clone();
        turn.substitute(old, new)?;
        let mut initial_turn = self.initial_turn.clone();
        initial_turn.substitute(old, new)?;

        self.turn = turn;
        self.initial_turn = initial_turn;
        for player in self.players.iter_mut().filter(|p| p.player_id == old) {
            player.player_id = new;
        }
        for visit in self.visits.iter_mut().filter(|v| v.player_id == old) {
            visit.player_id = new;
        }
        if self.winner == Some(old) {
            self.winner = Some(new);
        }

        info!(leg_id = %self.id, old = %old, new = %new, "Player substituted");
        Ok(())
    }

    /// Name the winner of a leg the rule engine cannot decide
    ///
    /// Tic-Tac-Toe legs are decided while open; Shootout and Darts-at-X
    /// legs only once they finished on a tie.
    pub fn declare_winner(&mut self, player: PlayerId) -> Result<(), ScoringError> {
        if !self.game_type.allows_declared_winner() {
            return Err(ScoringError::NotApplicable(
                "winner is decided by the rules of this variant",
            ));
        }
        if self.winner.is_some() {
            return Err(ScoringError::LegClosed(self.id));
        }
        if self.game_type != GameType::TicTacToe && !self.is_finished() {
            return Err(ScoringError::NotApplicable(
                "winner can only be declared once every quota is thrown",
            ));
        }
        if self.seat_of(player).is_none() {
            return Err(InvalidVisitReason::UnknownPlayer(player).into());
        }

        self.status = LegStatus::Finished;
        self.winner = Some(player);
        info!(leg_id = %self.id, winner = %player, "Leg winner declared");
        Ok(())
    }

    /// X01 statistics maintained while the leg is played
    pub fn live_statistics(&self) -> Result<Vec<StatisticsX01>, ScoringError> {
        let state = self
            .variant
            .as_x01()
            .ok_or(ScoringError::NotApplicable("statistics are kept for X01 legs"))?;
        Ok(self
            .turn
            .seats()
            .iter()
            .zip(state.statistics.iter())
            .map(|(seat, acc)| {
                acc.finish(
                    self.id,
                    seat.player_id,
                    self.parameters.starting_score,
                    self.winner == Some(seat.player_id),
                )
            })
            .collect())
    }
}
