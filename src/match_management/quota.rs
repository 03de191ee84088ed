//! Fixed-quota variants: Shootout and Darts-at-X
//!
//! Every player throws the same number of darts. The leg ends when the last
//! player has thrown their quota.

use serde::{Deserialize, Serialize};

use crate::match_management::rotation::TurnOrder;
use crate::match_management::rules::quota_reached;
use crate::match_management::throws::Visit;
use crate::match_management::variant::{VariantRules, VisitResolution};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaState {
    /// Darts-at-X target; `None` for Shootout
    pub target: Option<u8>,
    pub darts_per_player: u32,
    pub scores: Vec<u32>,
    /// Visits committed so far, all players together
    pub visits: u32,
}

impl QuotaState {
    pub fn new(target: Option<u8>, darts_per_player: u32, players: usize) -> Self {
        Self {
            target,
            darts_per_player,
            scores: vec![0; players],
            visits: 0,
        }
    }

    /// Points a visit is worth
    ///
    /// Shootout counts the plain score. Darts-at-X counts the multiplier of
    /// every dart on the target and nothing else.
    pub fn visit_score(&self, visit: &Visit) -> u32 {
        match self.target {
            None => visit.score(),
            Some(target) => visit
                .darts
                .iter()
                .filter(|d| d.value == Some(target))
                .map(|d| u32::from(d.multiplier))
                .sum(),
        }
    }

    /// Seat of the single highest scorer, `None` on a tie
    pub fn leader(&self) -> Option<usize> {
        let best = *self.scores.iter().max()?;
        let mut leaders = self
            .scores
            .iter()
            .enumerate()
            .filter(|(_, &score)| score == best);
        match (leaders.next(), leaders.next()) {
            (Some((seat, _)), None) => Some(seat),
            _ => None,
        }
    }
}

impl VariantRules for QuotaState {
    fn apply(&mut self, seat: usize, visit: &Visit, _turn: &mut TurnOrder) -> VisitResolution {
        self.scores[seat] += self.visit_score(visit);
        self.visits += 1;

        let finished = quota_reached(
            self.visits,
            self.darts_per_player,
            self.scores.len() as u32,
        );
        VisitResolution {
            bust: false,
            darts_used: visit.darts_thrown(),
            finished,
            winner: if finished { self.leader() } else { None },
        }
    }
}
