//! Variant rule engine
//!
//! Each game variant is a state-transition policy over one leg. The policy
//! is picked once, when the leg is created, and stored as a
//! [`VariantState`]; every visit after that goes through
//! [`VariantRules::apply`] without looking at the game type again.

use serde::{Deserialize, Serialize};

use crate::match_management::cricket::CricketState;
use crate::match_management::error::ScoringError;
use crate::match_management::knockout::KnockoutState;
use crate::match_management::quota::QuotaState;
use crate::match_management::rotation::TurnOrder;
use crate::match_management::rules::{
    OutshotType, BULLSEYE, DARTS_AT_X_DARTS_PER_PLAYER,
    SHOOTOUT_DARTS_PER_PLAYER,
};
use crate::match_management::state::LegPlayer;
use crate::match_management::throws::Visit;
use crate::match_management::tictactoe::TicTacToeState;
use crate::match_management::x01::{handicapped_start, X01State};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    X01,
    X01Handicap,
    Cricket,
    Shootout,
    DartsAtX,
    Knockout,
    TicTacToe,
}

impl GameType {
    /// Whether legs of this type keep X01 statistics
    pub fn is_x01(self) -> bool {
        matches!(self, GameType::X01 | GameType::X01Handicap)
    }

    /// Whether the winner may be named from outside the rule engine
    pub fn allows_declared_winner(self) -> bool {
        matches!(
            self,
            GameType::Shootout | GameType::DartsAtX | GameType::TicTacToe
        )
    }
}

/// What costs a Knockout player a life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeRule {
    /// Scoring strictly less than the visit before
    BeatPrevious,
    /// Scoring strictly less than the given total
    Threshold(u32),
}

/// Per-leg variant configuration
///
/// `starting_score` is read per variant: the X01 start, the Darts-at-X
/// target number, or the highest Tic-Tac-Toe number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegParameters {
    pub starting_score: u32,
    #[serde(default)]
    pub outshot: OutshotType,
    #[serde(default)]
    pub starting_lives: u32,
    #[serde(default = "default_life_rule")]
    pub life_rule: LifeRule,
}

fn default_life_rule() -> LifeRule {
    LifeRule::BeatPrevious
}

impl Default for LegParameters {
    fn default() -> Self {
        Self::x01(501)
    }
}

impl LegParameters {
    pub fn x01(starting_score: u32) -> Self {
        Self {
            starting_score,
            outshot: OutshotType::Double,
            starting_lives: 0,
            life_rule: default_life_rule(),
        }
    }

    pub fn with_outshot(mut self, outshot: OutshotType) -> Self {
        self.outshot = outshot;
        self
    }

    pub fn darts_at_x(target: u8) -> Self {
        Self {
            starting_score: u32::from(target),
            ..Self::x01(0)
        }
    }

    pub fn knockout(starting_lives: u32, life_rule: LifeRule) -> Self {
        Self {
            starting_lives,
            life_rule,
            ..Self::x01(0)
        }
    }

    pub fn tic_tac_toe(highest_number: u32) -> Self {
        Self::x01(highest_number)
    }
}

/// How one visit resolved under the leg's rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisitResolution {
    pub bust: bool,
    /// Thrown darts that count; later darts in the visit are dropped on a checkout
    pub darts_used: usize,
    pub finished: bool,
    /// Seat index of the winner, if the leg decided one
    pub winner: Option<usize>,
}

pub(crate) trait VariantRules {
    /// Apply a validated visit from the player in `seat`
    ///
    /// Only elimination-style variants touch `turn`; advancing to the next
    /// player is left to the caller.
    fn apply(&mut self, seat: usize, visit: &Visit, turn: &mut TurnOrder) -> VisitResolution;
}

/// Running state of one leg, one arm per rule family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum VariantState {
    X01(X01State),
    Cricket(CricketState),
    Quota(QuotaState),
    Knockout(KnockoutState),
    TicTacToe(TicTacToeState),
}

impl VariantState {
    /// Build the initial state for a leg, validating the parameters
    pub fn new(
        game_type: GameType,
        params: &LegParameters,
        players: &[LegPlayer],
    ) -> Result<Self, ScoringError> {
        match game_type {
            GameType::X01 | GameType::X01Handicap => {
                let starting = players
                    .iter()
                    .map(|p| handicapped_start(params.starting_score, p.handicap))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(VariantState::X01(X01State::new(starting, params.outshot)))
            }
            GameType::Cricket => Ok(VariantState::Cricket(CricketState::new(players.len()))),
            GameType::Shootout => Ok(VariantState::Quota(QuotaState::new(
                None,
                SHOOTOUT_DARTS_PER_PLAYER,
                players.len(),
            ))),
            GameType::DartsAtX => {
                let target = u8::try_from(params.starting_score)
                    .ok()
                    .filter(|&x| is_darts_at_x_target(x))
                    .ok_or_else(|| {
                        ScoringError::InvalidSetup(format!(
                            "{} is not a board number",
                            params.starting_score
                        ))
                    })?;
                Ok(VariantState::Quota(QuotaState::new(
                    Some(target),
                    DARTS_AT_X_DARTS_PER_PLAYER,
                    players.len(),
                )))
            }
            GameType::Knockout => {
                if players.len() < 2 {
                    return Err(ScoringError::InvalidSetup(
                        "knockout needs at least two players".to_string(),
                    ));
                }
                if params.starting_lives == 0 {
                    return Err(ScoringError::InvalidSetup(
                        "knockout needs at least one life".to_string(),
                    ));
                }
                Ok(VariantState::Knockout(KnockoutState::new(
                    players.len(),
                    params.starting_lives,
                    params.life_rule,
                )))
            }
            GameType::TicTacToe => Ok(VariantState::TicTacToe(TicTacToeState::generate(
                params.starting_score,
            )?)),
        }
    }

    pub fn as_x01(&self) -> Option<&X01State> {
        match self {
            VariantState::X01(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_cricket(&self) -> Option<&CricketState> {
        match self {
            VariantState::Cricket(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_quota(&self) -> Option<&QuotaState> {
        match self {
            VariantState::Quota(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_knockout(&self) -> Option<&KnockoutState> {
        match self {
            VariantState::Knockout(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_tic_tac_toe(&self) -> Option<&TicTacToeState> {
        match self {
            VariantState::TicTacToe(state) => Some(state),
            _ => None,
        }
    }
}

impl VariantRules for VariantState {
    fn apply(&mut self, seat: usize, visit: &Visit, turn: &mut TurnOrder) -> VisitResolution {
        match self {
            VariantState::X01(state) => state.apply(seat, visit, turn),
            VariantState::Cricket(state) => state.apply(seat, visit, turn),
            VariantState::Quota(state) => state.apply(seat, visit, turn),
            VariantState::Knockout(state) => state.apply(seat, visit, turn),
            VariantState::TicTacToe(state) => state.apply(seat, visit, turn),
        }
    }
}

/// Darts-at-X target must be a board number or the bull
fn is_darts_at_x_target(value: u8) -> bool {
    (1..=20).contains(&value) || value == BULLSEYE
}
