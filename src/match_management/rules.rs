//! Game rules module
//!
//! This module contains pure darts rules, board constants and the
//! out-condition logic shared by the rule engine and the statistics
//! aggregator. Everything here depends only on in-memory values and std.

use serde::{Deserialize, Serialize};

use crate::match_management::throws::Dart;

/// Value of the bullseye segment
pub const BULLSEYE: u8 = 25;

/// Highest single number on the board
pub const MAX_BOARD_NUMBER: u8 = 20;

/// Darts in a full visit
pub const DARTS_PER_VISIT: usize = 3;

/// Numbers in play for Cricket, bull last
pub const CRICKET_NUMBERS: [u8; 7] = [15, 16, 17, 18, 19, 20, BULLSEYE];

/// Marks needed to close a Cricket number
pub const MARKS_TO_CLOSE: u8 = 3;

/// Darts each player throws in a Shootout leg
pub const SHOOTOUT_DARTS_PER_PLAYER: u32 = 9;

/// Darts each player throws in a Darts-at-X leg
pub const DARTS_AT_X_DARTS_PER_PLAYER: u32 = 99;

/// Starting scores that carry a "fewest darts" record
pub const CANONICAL_STARTING_SCORES: [u32; 3] = [301, 501, 701];

/// Highest score that can be checked out in one visit
pub const MAX_CHECKOUT: u32 = 170;

/// Darts covered by the first-nine average
pub const FIRST_NINE_DARTS: u32 = 9;

/// Cells on a Tic-Tac-Toe board
pub const TIC_TAC_TOE_CELLS: usize = 9;

/// Segment order around the board, clockwise from the top
pub const BOARD_ORDER: [u8; 20] = [
    20, 1, 18, 4, 13, 6, 10, 15, 2, 17, 3, 19, 7, 16, 8, 11, 14, 9, 12, 5,
];

/// How an X01 leg must be finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutshotType {
    /// Any dart landing exactly on zero finishes
    Single,
    /// Only a double (bull included) landing on zero finishes
    #[default]
    Double,
    /// A double or a triple landing on zero finishes
    Master,
}

/// Result of throwing one dart at an X01 remainder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DartResolution {
    /// The dart counted, this is the new remainder
    Continue(u32),
    /// The dart landed the finish
    Checkout,
    /// The dart broke the out rule, the whole visit is void
    Bust,
}

impl OutshotType {
    /// Whether `dart` may be the finishing dart under this out rule
    pub fn is_finishing_dart(self, dart: &Dart) -> bool {
        match self {
            OutshotType::Single => dart.is_thrown(),
            OutshotType::Double => dart.is_double(),
            OutshotType::Master => dart.is_double() || dart.is_triple(),
        }
    }

    /// Lowest remainder a visit may leave without busting
    pub fn minimum_remainder(self) -> u32 {
        match self {
            OutshotType::Single => 1,
            OutshotType::Double | OutshotType::Master => 2,
        }
    }

    /// Apply a single dart to a remainder
    ///
    /// Unthrown darts leave the remainder untouched.
    pub fn resolve_dart(self, remaining: u32, dart: &Dart) -> DartResolution {
        if !dart.is_thrown() {
            return DartResolution::Continue(remaining);
        }
        let score = dart.score();
        if score > remaining {
            return DartResolution::Bust;
        }
        let after = remaining - score;
        if after == 0 {
            if self.is_finishing_dart(dart) {
                DartResolution::Checkout
            } else {
                DartResolution::Bust
            }
        } else if after < self.minimum_remainder() {
            DartResolution::Bust
        } else {
            DartResolution::Continue(after)
        }
    }

    /// Whether a dart thrown at `remaining` is a genuine attempt at the finish
    ///
    /// - Double: 50, or an even number up to 40
    /// - Master: as double, plus any multiple of 3 up to 60
    /// - Single: anything one dart can take out
    pub fn is_checkout_attempt(self, remaining: u32) -> bool {
        let double_finish = remaining == 50 || (remaining <= 40 && remaining > 0 && remaining % 2 == 0);
        let triple_finish = remaining <= 60 && remaining > 0 && remaining % 3 == 0;
        match self {
            OutshotType::Double => double_finish,
            OutshotType::Master => double_finish || triple_finish,
            OutshotType::Single => {
                (1..=u32::from(MAX_BOARD_NUMBER)).contains(&remaining)
                    || remaining == u32::from(BULLSEYE)
                    || double_finish
                    || triple_finish
            }
        }
    }
}

/// Check if a dart value is a segment on the board (0 is a miss)
pub fn is_valid_board_value(value: u8) -> bool {
    value <= MAX_BOARD_NUMBER || value == BULLSEYE
}

/// Check if a multiplier is single, double or triple
pub fn is_valid_multiplier(multiplier: u8) -> bool {
    (1..=3).contains(&multiplier)
}

/// Get the serving order that follows `current_order` (1-based, with wraparound)
pub fn next_serving_order(current_order: u32, player_count: u32) -> u32 {
    (current_order % player_count) + 1
}

/// Index of a number in the Cricket set
pub fn cricket_index(value: u8) -> Option<usize> {
    CRICKET_NUMBERS.iter().position(|&n| n == value)
}

/// The two segments adjacent to `value` on the board
pub fn neighbours(value: u8) -> Option<(u8, u8)> {
    let position = BOARD_ORDER.iter().position(|&n| n == value)?;
    let left = BOARD_ORDER[(position + BOARD_ORDER.len() - 1) % BOARD_ORDER.len()];
    let right = BOARD_ORDER[(position + 1) % BOARD_ORDER.len()];
    Some((left, right))
}

/// Whether every player has used their dart quota after `visits` visits
///
/// `visits` counts the visit just committed.
pub fn quota_reached(visits: u32, darts_per_player: u32, player_count: u32) -> bool {
    let total = darts_per_player * player_count;
    total > 0 && (visits * DARTS_PER_VISIT as u32) % total == 0
}

/// Scoring bucket for a visit total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreBucket {
    SixtyPlus,
    TonPlus,
    TonFortyPlus,
    OneEighty,
}

/// Bucket a visit score into 60+, 100+, 140+ or 180
pub fn score_bucket(score: u32) -> Option<ScoreBucket> {
    match score {
        60..=99 => Some(ScoreBucket::SixtyPlus),
        100..=139 => Some(ScoreBucket::TonPlus),
        140..=179 => Some(ScoreBucket::TonFortyPlus),
        180 => Some(ScoreBucket::OneEighty),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_out_resolution() {
        let out = OutshotType::Double;

        // D20 on 40 finishes
        assert_eq!(out.resolve_dart(40, &Dart::new(20, 2)), DartResolution::Checkout);
        // S20 on 20 lands on zero without a double
        assert_eq!(out.resolve_dart(20, &Dart::new(20, 1)), DartResolution::Bust);
        // Leaving 1 is a bust
        assert_eq!(out.resolve_dart(21, &Dart::new(20, 1)), DartResolution::Bust);
        // Going below zero is a bust
        assert_eq!(out.resolve_dart(10, &Dart::new(20, 3)), DartResolution::Bust);
        assert_eq!(out.resolve_dart(60, &Dart::new(20, 1)), DartResolution::Continue(40));
        // Bull is a double
        assert_eq!(out.resolve_dart(50, &Dart::new(25, 2)), DartResolution::Checkout);
    }

    #[test]
    fn test_single_and_master_out_resolution() {
        assert_eq!(
            OutshotType::Single.resolve_dart(20, &Dart::new(20, 1)),
            DartResolution::Checkout
        );
        assert_eq!(
            OutshotType::Single.resolve_dart(21, &Dart::new(20, 1)),
            DartResolution::Continue(1)
        );
        assert_eq!(
            OutshotType::Master.resolve_dart(60, &Dart::new(20, 3)),
            DartResolution::Checkout
        );
        assert_eq!(
            OutshotType::Master.resolve_dart(21, &Dart::new(20, 1)),
            DartResolution::Bust
        );
    }

    #[test]
    fn test_unthrown_dart_keeps_remainder() {
        assert_eq!(
            OutshotType::Double.resolve_dart(32, &Dart::UNTHROWN),
            DartResolution::Continue(32)
        );
    }

    #[test]
    fn test_checkout_attempt_predicate() {
        assert!(OutshotType::Double.is_checkout_attempt(40));
        assert!(OutshotType::Double.is_checkout_attempt(50));
        assert!(OutshotType::Double.is_checkout_attempt(2));
        assert!(!OutshotType::Double.is_checkout_attempt(41));
        assert!(!OutshotType::Double.is_checkout_attempt(42));
        assert!(!OutshotType::Double.is_checkout_attempt(0));

        assert!(OutshotType::Master.is_checkout_attempt(57));
        assert!(!OutshotType::Master.is_checkout_attempt(59));

        assert!(OutshotType::Single.is_checkout_attempt(17));
        assert!(OutshotType::Single.is_checkout_attempt(25));
        assert!(!OutshotType::Single.is_checkout_attempt(61));
    }

    #[test]
    fn test_next_serving_order() {
        assert_eq!(next_serving_order(1, 3), 2);
        assert_eq!(next_serving_order(2, 3), 3);
        assert_eq!(next_serving_order(3, 3), 1); // Wraparound
    }

    #[test]
    fn test_neighbours() {
        assert_eq!(neighbours(20), Some((5, 1)));
        assert_eq!(neighbours(19), Some((3, 7)));
        assert_eq!(neighbours(25), None);
    }

    #[test]
    fn test_quota_reached() {
        // 2 players, 9 darts each: 6 visits in total
        assert!(!quota_reached(5, SHOOTOUT_DARTS_PER_PLAYER, 2));
        assert!(quota_reached(6, SHOOTOUT_DARTS_PER_PLAYER, 2));
        // 2 players, 99 darts each: 66 visits in total
        assert!(!quota_reached(65, DARTS_AT_X_DARTS_PER_PLAYER, 2));
        assert!(quota_reached(66, DARTS_AT_X_DARTS_PER_PLAYER, 2));
    }

    #[test]
    fn test_score_bucket_ranges_are_exclusive() {
        assert_eq!(score_bucket(59), None);
        assert_eq!(score_bucket(60), Some(ScoreBucket::SixtyPlus));
        assert_eq!(score_bucket(99), Some(ScoreBucket::SixtyPlus));
        assert_eq!(score_bucket(100), Some(ScoreBucket::TonPlus));
        assert_eq!(score_bucket(140), Some(ScoreBucket::TonFortyPlus));
        assert_eq!(score_bucket(179), Some(ScoreBucket::TonFortyPlus));
        assert_eq!(score_bucket(180), Some(ScoreBucket::OneEighty));
    }
}
