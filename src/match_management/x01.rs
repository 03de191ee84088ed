//! X01 scoring
//!
//! [`score_visit`] is the single implementation of X01 visit arithmetic.
//! The live rule engine and the batch statistics replay both call it, so
//! bust detection, checkout detection and checkout attempts can never
//! drift apart between the two paths.

use serde::{Deserialize, Serialize};

use crate::match_management::accuracy::ScoringAccuracy;
use crate::match_management::error::ScoringError;
use crate::match_management::rules::{DartResolution, OutshotType};
use crate::match_management::statistics::StatisticsAccumulator;
use crate::match_management::throws::Visit;
use crate::match_management::rotation::TurnOrder;
use crate::match_management::variant::{VariantRules, VisitResolution};

/// Outcome of throwing one visit at an X01 remainder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredVisit {
    pub remaining_before: u32,
    /// Equal to `remaining_before` on a bust
    pub remaining_after: u32,
    /// Points that count, 0 on a bust
    pub score: u32,
    pub bust: bool,
    pub checkout: bool,
    /// Darts that count: up to the busting or finishing dart, else all thrown
    pub darts_used: usize,
    /// Counted darts thrown at a finishable remainder
    pub checkout_attempts: u32,
}

/// Throw `visit` at `remaining_before` under `outshot`
pub fn score_visit(remaining_before: u32, visit: &Visit, outshot: OutshotType) -> ScoredVisit {
    let mut remaining = remaining_before;
    let mut darts_used = 0;
    let mut checkout_attempts = 0;
    let mut bust = false;
    let mut checkout = false;

    for dart in visit.darts.iter().filter(|d| d.is_thrown()) {
        darts_used += 1;
        if dart.is_checkout_attempt(remaining, outshot) {
            checkout_attempts += 1;
        }
        match outshot.resolve_dart(remaining, dart) {
            DartResolution::Continue(after) => remaining = after,
            DartResolution::Checkout => {
                remaining = 0;
                checkout = true;
                break;
            }
            DartResolution::Bust => {
                bust = true;
                break;
            }
        }
    }

    let remaining_after = if bust { remaining_before } else { remaining };
    ScoredVisit {
        remaining_before,
        remaining_after,
        score: remaining_before - remaining_after,
        bust,
        checkout,
        darts_used,
        checkout_attempts,
    }
}

/// Starting score for one player, handicap applied once
pub fn handicapped_start(starting_score: u32, handicap: i32) -> Result<u32, ScoringError> {
    let start = i64::from(starting_score) + i64::from(handicap);
    if start < 2 {
        return Err(ScoringError::InvalidSetup(format!(
            "starting score {starting_score} with handicap {handicap} is not playable"
        )));
    }
    u32::try_from(start)
        .map_err(|_| ScoringError::InvalidSetup(format!("starting score {start} is too large")))
}

/// Per-leg X01 state, indexed by seat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct X01State {
    pub outshot: OutshotType,
    pub starting: Vec<u32>,
    pub remaining: Vec<u32>,
    pub statistics: Vec<StatisticsAccumulator>,
}

impl X01State {
    /// `starting` holds each seat's start score with its handicap already applied
    pub fn new(starting: Vec<u32>, outshot: OutshotType) -> Self {
        let statistics = starting.iter().map(|_| StatisticsAccumulator::default()).collect();
        Self {
            outshot,
            remaining: starting.clone(),
            starting,
            statistics,
        }
    }
}

impl VariantRules for X01State {
    fn apply(&mut self, seat: usize, visit: &Visit, _turn: &mut TurnOrder) -> VisitResolution {
        let scored = score_visit(self.remaining[seat], visit, self.outshot);
        self.statistics[seat].record(visit, &scored, &ScoringAccuracy);
        self.remaining[seat] = scored.remaining_after;

        VisitResolution {
            bust: scored.bust,
            darts_used: scored.darts_used,
            finished: scored.checkout,
            winner: scored.checkout.then_some(seat),
        }
    }
}
