//! Leg and match completion
//!
//! A leg finishes when its variant says so. A [`Match`] watches its legs:
//! after every decided leg it either starts the next one, schedules a
//! tie-break leg, or finishes.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::match_management::error::{InvalidVisitReason, ScoringError};
use crate::match_management::state::{Leg, LegPlayer, TurnPolicy, VisitOutcome};
use crate::match_management::throws::{Dart, LegId, MatchId, PlayerId, Visit};
use crate::match_management::variant::{GameType, LegParameters, VariantState};

/// Leg played when the regular legs end level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieBreak {
    pub game_type: GameType,
    pub parameters: LegParameters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchMode {
    /// Leg wins that take the match
    pub wins_required: u32,
    /// Regular legs to play at most; `None` for first-to matches
    pub legs_required: Option<u32>,
    pub tie_break: Option<TieBreak>,
}

impl MatchMode {
    pub fn first_to(wins_required: u32) -> Self {
        Self {
            wins_required,
            legs_required: None,
            tie_break: None,
        }
    }

    pub fn best_of(legs_required: u32) -> Self {
        Self {
            wins_required: legs_required / 2 + 1,
            legs_required: Some(legs_required),
            tie_break: None,
        }
    }

    pub fn with_tie_break(mut self, game_type: GameType, parameters: LegParameters) -> Self {
        self.tie_break = Some(TieBreak {
            game_type,
            parameters,
        });
        self
    }

    fn validate(&self) -> Result<(), ScoringError> {
        if self.wins_required == 0 {
            return Err(ScoringError::InvalidSetup(
                "a match needs at least one leg win".to_string(),
            ));
        }
        if self.legs_required.is_some_and(|legs| legs < self.wins_required) {
            return Err(ScoringError::InvalidSetup(format!(
                "{} wins cannot be reached in {:?} legs",
                self.wins_required, self.legs_required
            )));
        }
        Ok(())
    }
}

/// What happens after a decided leg
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchProgress {
    Continue,
    TieBreak(TieBreak),
    /// `None` is a draw
    Finished(Option<PlayerId>),
}

/// The single player with the most wins
fn unique_leader(wins: &[(PlayerId, u32)]) -> Option<PlayerId> {
    let best = wins.iter().map(|(_, w)| *w).max()?;
    let mut leaders = wins.iter().filter(|(_, w)| *w == best);
    match (leaders.next(), leaders.next()) {
        (Some((player, _)), None) => Some(*player),
        _ => None,
    }
}

/// Decide how a match continues
///
/// `legs_decided` counts regular legs with a winner; `tie_break_played` is
/// set once the tie-break leg has been decided.
pub fn match_progress(
    mode: &MatchMode,
    wins: &[(PlayerId, u32)],
    legs_decided: u32,
    tie_break_played: bool,
) -> MatchProgress {
    if let Some((player, _)) = wins.iter().find(|(_, w)| *w >= mode.wins_required) {
        return MatchProgress::Finished(Some(*player));
    }
    if tie_break_played {
        return MatchProgress::Finished(unique_leader(wins));
    }
    match mode.legs_required {
        Some(legs) if legs_decided >= legs => match (unique_leader(wins), mode.tie_break) {
            (Some(player), _) => MatchProgress::Finished(Some(player)),
            (None, Some(tie_break)) => MatchProgress::TieBreak(tie_break),
            (None, None) => MatchProgress::Finished(None),
        },
        _ => MatchProgress::Continue,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Open,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    id: MatchId,
    game_type: GameType,
    mode: MatchMode,
    parameters: LegParameters,
    players: Vec<LegPlayer>,
    legs: Vec<Leg>,
    tie_break_started: bool,
    status: MatchStatus,
    winner: Option<PlayerId>,
}

impl Match {
    /// Create a match and its first leg; `players` are given in serving order
    pub fn new(
        game_type: GameType,
        mode: MatchMode,
        players: Vec<LegPlayer>,
        parameters: LegParameters,
    ) -> Result<Self, ScoringError> {
        mode.validate()?;
        if let Some(tie_break) = &mode.tie_break {
            VariantState::new(tie_break.game_type, &tie_break.parameters, &players)?;
        }
        let first = Leg::new(game_type, parameters, players.clone())?;
        let id = Uuid::new_v4();

        info!(match_id = %id, ?game_type, players = players.len(), "Match created");

        Ok(Self {
            id,
            game_type,
            mode,
            parameters,
            players,
            legs: vec![first],
            tie_break_started: false,
            status: MatchStatus::Open,
            winner: None,
        })
    }

    pub fn id(&self) -> MatchId {
        self.id
    }

    pub fn game_type(&self) -> GameType {
        self.game_type
    }

    pub fn mode(&self) -> &MatchMode {
        &self.mode
    }

    pub fn players(&self) -> &[LegPlayer] {
        &self.players
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// The leg being played, or the deciding leg once the match is over
    pub fn current_leg(&self) -> &Leg {
        // A match is never without a leg
        &self.legs[self.legs.len() - 1]
    }

    fn current_leg_mut(&mut self) -> &mut Leg {
        let last = self.legs.len() - 1;
        &mut self.legs[last]
    }

    /// Won legs per player, in match order
    pub fn wins_per_player(&self) -> Vec<(PlayerId, u32)> {
        self.players
            .iter()
            .map(|p| {
                let wins = self
                    .legs
                    .iter()
                    .filter(|leg| leg.winner() == Some(p.player_id))
                    .count() as u32;
                (p.player_id, wins)
            })
            .collect()
    }

    fn ensure_open(&self) -> Result<(), ScoringError> {
        if self.is_finished() {
            return Err(ScoringError::MatchClosed(self.id));
        }
        Ok(())
    }

    /// Apply a visit to the current leg and move the match on if it was decided
    pub fn apply_visit(
        &mut self,
        visit: Visit,
        policy: TurnPolicy,
    ) -> Result<VisitOutcome, ScoringError> {
        self.ensure_open()?;
        let mut next = self.clone();
        let outcome = next.current_leg_mut().apply_visit(visit, policy)?;
        if outcome.winner.is_some() {
            next.leg_decided()?;
        }
        *self = next;
        Ok(outcome)
    }

    /// Name the winner of the current leg when its variant leaves it open
    pub fn declare_leg_winner(&mut self, player: PlayerId) -> Result<(), ScoringError> {
        self.ensure_open()?;
        let mut next = self.clone();
        next.current_leg_mut().declare_winner(player)?;
        next.leg_decided()?;
        *self = next;
        Ok(())
    }

    /// Replace a player everywhere, past legs included
    pub fn substitute_player(&mut self, old: PlayerId, new: PlayerId) -> Result<(), ScoringError> {
        self.ensure_open()?;
        let mut next = self.clone();
        for leg in next.legs.iter_mut() {
            leg.substitute_player(old, new)?;
        }
        for player in next.players.iter_mut().filter(|p| p.player_id == old) {
            player.player_id = new;
        }
        *self = next;
        info!(match_id = %self.id, old = %old, new = %new, "Player substituted in match");
        Ok(())
    }

    fn leg_index(&self, leg_id: LegId) -> Result<usize, ScoringError> {
        self.legs
            .iter()
            .position(|leg| leg.id() == leg_id)
            .ok_or_else(|| InvalidVisitReason::UnknownLeg(leg_id).into())
    }

    /// Replace the darts of a committed visit in any leg of the match
    ///
    /// If the leg's result changes, every later leg is dropped and the
    /// match is decided again from that leg.
    pub fn correct_visit(
        &mut self,
        leg_id: LegId,
        sequence: u32,
        darts: &[Dart],
    ) -> Result<(), ScoringError> {
        let index = self.leg_index(leg_id)?;
        self.amend_leg(index, |leg| leg.correct_visit(sequence, darts))
    }

    /// Remove a committed visit from any leg of the match
    pub fn delete_visit(&mut self, leg_id: LegId, sequence: u32) -> Result<Visit, ScoringError> {
        let index = self.leg_index(leg_id)?;
        self.amend_leg(index, |leg| leg.delete_visit(sequence))
    }

    /// Take back the most recent visit of the match
    ///
    /// Undoing the visit that decided a leg reopens that leg and drops the
    /// leg started after it; a finished match is reopened.
    pub fn undo_last_visit(&mut self) -> Result<Visit, ScoringError> {
        let index = self
            .legs
            .iter()
            .rposition(|leg| !leg.visits().is_empty())
            .ok_or(ScoringError::NotApplicable("match has no visits to undo"))?;
        self.amend_leg(index, Leg::undo_last_visit)
    }

    /// Change one leg and bring the match state back in line with it
    fn amend_leg<T, F>(&mut self, index: usize, change: F) -> Result<T, ScoringError>
    where
        F: FnOnce(&mut Leg) -> Result<T, ScoringError>,
    {
        let mut next = self.clone();
        let leg = &mut next.legs[index];
        let before = (leg.is_finished(), leg.winner());
        let result = change(&mut *leg)?;
        let after = (leg.is_finished(), leg.winner());

        if before != after {
            next.redecide_from(index)?;
        }
        *self = next;
        Ok(result)
    }

    /// Drop the legs after `index` and decide the match again from there
    fn redecide_from(&mut self, index: usize) -> Result<(), ScoringError> {
        // The tie-break leg is always last
        if index + 1 < self.legs.len() {
            self.tie_break_started = false;
        }
        self.legs.truncate(index + 1);
        self.status = MatchStatus::Open;
        self.winner = None;

        info!(match_id = %self.id, legs = self.legs.len(), "Match reopened after correction");
        if self.current_leg().winner().is_some() {
            self.leg_decided()?;
        }
        Ok(())
    }

    fn leg_decided(&mut self) -> Result<(), ScoringError> {
        let tie_break_played = self.tie_break_started;
        let mut regular_legs = self.legs.len() as u32;
        if tie_break_played {
            regular_legs -= 1;
        }

        match match_progress(
            &self.mode,
            &self.wins_per_player(),
            regular_legs,
            tie_break_played,
        ) {
            MatchProgress::Continue => {
                let players = self.rotated_players();
                self.legs
                    .push(Leg::new(self.game_type, self.parameters, players)?);
            }
            MatchProgress::TieBreak(tie_break) => {
                let players = self.rotated_players();
                self.legs.push(Leg::new(
                    tie_break.game_type,
                    tie_break.parameters,
                    players,
                )?);
                self.tie_break_started = true;
                info!(match_id = %self.id, game_type = ?tie_break.game_type, "Tie-break leg scheduled");
            }
            MatchProgress::Finished(winner) => {
                self.status = MatchStatus::Finished;
                self.winner = winner;
                info!(match_id = %self.id, winner = ?winner, legs = self.legs.len(), "Match finished");
            }
        }
        Ok(())
    }

    /// Serving order of the last leg moved on by one
    fn rotated_players(&self) -> Vec<LegPlayer> {
        let mut players = self.current_leg().players().to_vec();
        players.rotate_left(1);
        players
    }
}
