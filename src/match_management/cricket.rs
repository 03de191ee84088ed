//! Cricket rules
//!
//! Marks on 15-20 and the bull. Once a player has closed a number, further
//! marks on it are points for every opponent who has not closed it; the
//! lowest score wins.

use serde::{Deserialize, Serialize};

use crate::match_management::rotation::TurnOrder;
use crate::match_management::rules::{cricket_index, CRICKET_NUMBERS, MARKS_TO_CLOSE};
use crate::match_management::throws::Visit;
use crate::match_management::variant::{VariantRules, VisitResolution};

/// Marks per number, in `CRICKET_NUMBERS` order
pub type CricketMarks = [u8; CRICKET_NUMBERS.len()];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CricketState {
    pub marks: Vec<CricketMarks>,
    pub scores: Vec<u32>,
}

impl CricketState {
    pub fn new(players: usize) -> Self {
        Self {
            marks: vec![[0; CRICKET_NUMBERS.len()]; players],
            scores: vec![0; players],
        }
    }

    pub fn has_closed(&self, seat: usize, index: usize) -> bool {
        self.marks[seat][index] >= MARKS_TO_CLOSE
    }

    pub fn has_closed_all(&self, seat: usize) -> bool {
        (0..CRICKET_NUMBERS.len()).all(|index| self.has_closed(seat, index))
    }

    /// Whether `seat` holds a score strictly below every other player's
    pub fn has_strictly_lowest_score(&self, seat: usize) -> bool {
        let own = self.scores[seat];
        self.scores
            .iter()
            .enumerate()
            .all(|(other, &score)| other == seat || own < score)
    }

    fn hit(&mut self, seat: usize, value: u8, multiplier: u8) {
        let Some(index) = cricket_index(value) else {
            return;
        };
        let current = self.marks[seat][index];
        let counted = multiplier.min(MARKS_TO_CLOSE.saturating_sub(current));
        self.marks[seat][index] = current + counted;

        let excess = multiplier - counted;
        if excess == 0 {
            return;
        }
        let points = u32::from(value) * u32::from(excess);
        for other in 0..self.scores.len() {
            if other != seat && !self.has_closed(other, index) {
                self.scores[other] += points;
            }
        }
    }
}

impl VariantRules for CricketState {
    fn apply(&mut self, seat: usize, visit: &Visit, _turn: &mut TurnOrder) -> VisitResolution {
        for dart in visit.darts.iter() {
            if let Some(value) = dart.value {
                self.hit(seat, value, dart.multiplier);
            }
        }

        let finished = self.has_closed_all(seat) && self.has_strictly_lowest_score(seat);
        VisitResolution {
            bust: false,
            darts_used: visit.darts_thrown(),
            finished,
            winner: finished.then_some(seat),
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

    fn turn(n: usize) -> TurnOrder {
        let players: Vec<_> = (0..n).map(|_| Uuid::new_v4()).collect();
        TurnOrder::new(&players).unwrap()
    }

    #[test]
    fn test_marks_cap_and_excess_scores_opponents() {
        let mut state = CricketState::new(3);
        let mut turn = turn(3);

        // Seat 2 closes 20 first
        state.apply(2, &visit(&[Dart::new(20, 3)]), &mut turn);

        // T20 + T20: three marks close, three excess marks score 60
        state.apply(0, &visit(&[Dart::new(20, 3), Dart::new(20, 3)]), &mut turn);

        assert_eq!(state.marks[0][5], 3);
        assert_eq!(state.scores[1], 60);
        // Seat 2 has closed 20 and takes no points
        assert_eq!(state.scores[2], 0);
        assert_eq!(state.scores[0], 0);
    }

    #[test]
    fn test_partial_close_carries_excess() {
        let mut state = CricketState::new(2);
        let mut turn = turn(2);

        // 1 mark, then a triple: 2 close it and 1 is excess
        state.apply(0, &visit(&[Dart::new(19, 1), Dart::new(19, 3)]), &mut turn);
        assert_eq!(state.marks[0][4], 3);
        assert_eq!(state.scores[1], 19);
    }

    #[test]
    fn test_non_cricket_numbers_are_ignored() {
        let mut state = CricketState::new(2);
        let mut turn = turn(2);
        state.apply(0, &visit(&[Dart::new(14, 3), Dart::miss()]), &mut turn);
        assert_eq!(state, CricketState::new(2));
    }

    #[test]
    fn test_closed_but_not_lowest_does_not_finish() {
        let mut state = CricketState::new(2);
        let mut turn = turn(2);
        state.marks[0] = [3, 3, 3, 3, 3, 3, 0];
        state.scores = vec![40, 20];

        let res = state.apply(0, &visit(&[Dart::new(25, 2), Dart::new(25, 1)]), &mut turn);
        assert!(state.has_closed_all(0));
        assert!(!res.finished);
        assert_eq!(res.winner, None);
    }

    #[test]
    fn test_tied_score_does_not_finish() {
        let mut state = CricketState::new(2);
        let mut turn = turn(2);
        state.marks[0] = [3, 3, 3, 3, 3, 3, 2];
        state.scores = vec![0, 0];

        let res = state.apply(0, &visit(&[Dart::new(25, 1)]), &mut turn);
        assert!(!res.finished);
    }

    #[test]
    fn test_closed_and_lowest_finishes() {
        let mut state = CricketState::new(2);
        let mut turn = turn(2);
        state.marks[0] = [3, 3, 3, 3, 3, 3, 1];
        state.scores = vec![0, 45];

        let res = state.apply(0, &visit(&[Dart::new(25, 2)]), &mut turn);
        assert!(res.finished);
        assert_eq!(res.winner, Some(0));
        assert_eq!(res.darts_used, 1);
    }
}
