//! Knockout rules
//!
//! Players lose lives under the leg's [`LifeRule`]; a player with no lives
//! left is taken out of the rotation. The last player standing wins.

use serde::{Deserialize, Serialize};

use crate::match_management::rotation::TurnOrder;
use crate::match_management::throws::Visit;
use crate::match_management::variant::{LifeRule, VariantRules, VisitResolution};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnockoutState {
    pub lives: Vec<u32>,
    pub life_rule: LifeRule,
    /// Score of the last committed visit
    pub previous_score: Option<u32>,
}

impl KnockoutState {
    pub fn new(players: usize, starting_lives: u32, life_rule: LifeRule) -> Self {
        Self {
            lives: vec![starting_lives; players],
            life_rule,
            previous_score: None,
        }
    }

    /// Whether a visit scoring `score` costs a life
    pub fn costs_life(&self, score: u32) -> bool {
        match self.life_rule {
            LifeRule::BeatPrevious => self.previous_score.is_some_and(|prev| score < prev),
            LifeRule::Threshold(minimum) => score < minimum,
        }
    }
}

impl VariantRules for KnockoutState {
    fn apply(&mut self, seat: usize, visit: &Visit, turn: &mut TurnOrder) -> VisitResolution {
        let score = visit.score();
        if self.costs_life(score) {
            self.lives[seat] = self.lives[seat].saturating_sub(1);
            if self.lives[seat] == 0 {
                turn.eliminate_seat(seat);
            }
        }
        self.previous_score = Some(score);

        let finished = turn.active_count() <= 1;
        let winner = if finished {
            turn.seats().iter().position(|s| s.active)
        } else {
            None
        };
        VisitResolution {
            bust: false,
            darts_used: visit.darts_thrown(),
            finished,
            winner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::match_management::throws::Dart;
    use uuid::Uuid;

    fn visit(darts: &[Dart]) -> Visit {
        Visit::new(Uuid::new_v4(), Uuid::new_v4(), darts).unwrap()
    }

    #[test]
    fn test_beat_previous() {
        let players: Vec<_> = (0..3).map(|_| Uuid::new_v4()).collect();
        let mut turn = TurnOrder::new(&players).unwrap();
        let mut state = KnockoutState::new(3, 2, LifeRule::BeatPrevious);

        // First visit has nothing to beat
        state.apply(0, &visit(&[Dart::new(20, 1)]), &mut turn);
        assert_eq!(state.lives, vec![2, 2, 2]);

        // 5 < 20 costs seat 1 a life
        state.apply(1, &visit(&[Dart::new(5, 1)]), &mut turn);
        assert_eq!(state.lives, vec![2, 1, 2]);

        // Equal is enough
        state.apply(2, &visit(&[Dart::new(5, 1)]), &mut turn);
        assert_eq!(state.lives, vec![2, 1, 2]);
    }

    #[test]
    fn test_last_player_standing_wins() {
        let players: Vec<_> = (0..2).map(|_| Uuid::new_v4()).collect();
        let mut turn = TurnOrder::new(&players).unwrap();
        let mut state = KnockoutState::new(2, 1, LifeRule::Threshold(40));

        let res = state.apply(0, &visit(&[Dart::new(20, 3)]), &mut turn);
        assert!(!res.finished);

        let res = state.apply(1, &visit(&[Dart::new(1, 1)]), &mut turn);
        assert!(res.finished);
        assert_eq!(res.winner, Some(0));
        assert!(!turn.is_active(players[1]));
    }
}
