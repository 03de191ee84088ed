//! Throw and visit model
//!
//! Value types for a single dart and for the (up to) three darts a player
//! throws in one turn. All operations here are pure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::match_management::error::{InvalidVisitReason, ScoringError};
use crate::match_management::rules::{
    is_valid_board_value, is_valid_multiplier, OutshotType, BULLSEYE, DARTS_PER_VISIT,
};

pub type PlayerId = Uuid;
pub type LegId = Uuid;
pub type MatchId = Uuid;

/// A single dart
///
/// `value` is `None` when the dart was never thrown (the leg ended earlier
/// in the visit). A thrown dart that missed the board has value 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dart {
    pub value: Option<u8>,
    pub multiplier: u8,
}

impl Dart {
    /// A dart that was not thrown
    pub const UNTHROWN: Dart = Dart {
        value: None,
        multiplier: 1,
    };

    /// A thrown dart on `value` with `multiplier` (not validated)
    pub const fn new(value: u8, multiplier: u8) -> Self {
        Self {
            value: Some(value),
            multiplier,
        }
    }

    /// A thrown dart that missed the board
    pub const fn miss() -> Self {
        Self::new(0, 1)
    }

    pub fn is_thrown(&self) -> bool {
        self.value.is_some()
    }

    pub fn is_double(&self) -> bool {
        self.is_thrown() && self.value != Some(0) && self.multiplier == 2
    }

    pub fn is_triple(&self) -> bool {
        self.is_thrown() && self.value != Some(0) && self.multiplier == 3
    }

    pub fn is_bull(&self) -> bool {
        self.value == Some(BULLSEYE)
    }

    /// Points scored: value times multiplier, 0 for a miss or an unthrown dart
    pub fn score(&self) -> u32 {
        match self.value {
            Some(value) => u32::from(value) * u32::from(self.multiplier),
            None => 0,
        }
    }

    /// Whether this dart, thrown at `remaining_before`, was a shot at the finish
    pub fn is_checkout_attempt(&self, remaining_before: u32, outshot: OutshotType) -> bool {
        self.is_thrown() && outshot.is_checkout_attempt(remaining_before)
    }

    /// Reject values that are not on the board
    ///
    /// Unthrown darts are always valid.
    pub fn validate(&self) -> Result<(), InvalidVisitReason> {
        let Some(value) = self.value else {
            return Ok(());
        };
        if !is_valid_board_value(value) {
            return Err(InvalidVisitReason::DartValue(value));
        }
        if !is_valid_multiplier(self.multiplier) {
            return Err(InvalidVisitReason::Multiplier(self.multiplier));
        }
        if value == BULLSEYE && self.multiplier == 3 {
            return Err(InvalidVisitReason::TripleBull);
        }
        Ok(())
    }
}

impl std::fmt::Display for Dart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.value {
            None => write!(f, "-"),
            Some(0) => write!(f, "0"),
            Some(value) => match self.multiplier {
                2 => write!(f, "D{value}"),
                3 => write!(f, "T{value}"),
                _ => write!(f, "{value}"),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot read dart {0:?}")]
pub struct ParseDartError(pub String);

/// Reads the notation written by `Display`: "T20", "D25", "7", "0", "-"
impl std::str::FromStr for Dart {
    type Err = ParseDartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "-" {
            return Ok(Dart::UNTHROWN);
        }
        let (multiplier, number) = match s.as_bytes().first() {
            Some(b'T' | b't') => (3, &s[1..]),
            Some(b'D' | b'd') => (2, &s[1..]),
            Some(b'S' | b's') => (1, &s[1..]),
            _ => (1, s),
        };
        let value = number
            .parse::<u8>()
            .map_err(|_| ParseDartError(s.to_string()))?;
        let dart = Dart::new(value, multiplier);
        dart.validate().map_err(|_| ParseDartError(s.to_string()))?;
        Ok(dart)
    }
}

/// One player's turn of up to three darts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    pub leg_id: LegId,
    pub player_id: PlayerId,
    /// Position within the leg, starting at 1; 0 until committed
    pub sequence: u32,
    pub darts: [Dart; DARTS_PER_VISIT],
    pub bust: bool,
    /// Used only for ordering
    pub created: DateTime<Utc>,
}

impl Visit {
    /// Build an uncommitted visit, padding with unthrown darts
    pub fn new(leg_id: LegId, player_id: PlayerId, darts: &[Dart]) -> Result<Self, ScoringError> {
        if darts.len() > DARTS_PER_VISIT {
            return Err(InvalidVisitReason::TooManyDarts(darts.len()).into());
        }
        let mut padded = [Dart::UNTHROWN; DARTS_PER_VISIT];
        padded[..darts.len()].copy_from_slice(darts);
        Ok(Self {
            leg_id,
            player_id,
            sequence: 0,
            darts: padded,
            bust: false,
            created: Utc::now(),
        })
    }

    /// Sum of the thrown darts
    pub fn score(&self) -> u32 {
        self.darts.iter().map(Dart::score).sum()
    }

    /// Number of thrown darts (0-3)
    pub fn darts_thrown(&self) -> usize {
        self.darts.iter().filter(|d| d.is_thrown()).count()
    }

    /// Whether the dart at `dart_index` (0-based) was a shot at the finish
    pub fn is_checkout_attempt(
        &self,
        remaining_before: u32,
        dart_index: usize,
        outshot: OutshotType,
    ) -> bool {
        self.darts
            .get(dart_index)
            .is_some_and(|dart| dart.is_checkout_attempt(remaining_before, outshot))
    }

    /// Validate every dart and require at least one thrown dart
    pub fn validate(&self) -> Result<(), InvalidVisitReason> {
        for dart in &self.darts {
            dart.validate()?;
        }
        if self.darts_thrown() == 0 {
            return Err(InvalidVisitReason::NoDarts);
        }
        Ok(())
    }

    /// Mark every dart after the first `used` thrown darts as unthrown
    pub(crate) fn truncate_to(&mut self, used: usize) {
        let mut seen = 0;
        for dart in self.darts.iter_mut() {
            if dart.is_thrown() {
                if seen >= used {
                    *dart = Dart::UNTHROWN;
                }
                seen += 1;
            }
        }
    }

    /// Human readable dart list, e.g. "T20 T20 D20"
    pub fn darts_string(&self) -> String {
        self.darts
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dart_score() {
        assert_eq!(Dart::new(20, 3).score(), 60);
        assert_eq!(Dart::new(25, 2).score(), 50);
        assert_eq!(Dart::miss().score(), 0);
        assert_eq!(Dart::UNTHROWN.score(), 0);
    }

    #[test]
    fn test_dart_validation() {
        assert!(Dart::new(20, 3).validate().is_ok());
        assert!(Dart::new(0, 1).validate().is_ok());
        assert!(Dart::UNTHROWN.validate().is_ok());
        assert_eq!(
            Dart::new(21, 1).validate(),
            Err(InvalidVisitReason::DartValue(21))
        );
        assert_eq!(
            Dart::new(20, 4).validate(),
            Err(InvalidVisitReason::Multiplier(4))
        );
        assert_eq!(
            Dart::new(25, 3).validate(),
            Err(InvalidVisitReason::TripleBull)
        );
    }

    #[test]
    fn test_dart_notation() {
        assert_eq!("T20".parse::<Dart>().unwrap(), Dart::new(20, 3));
        assert_eq!("D25".parse::<Dart>().unwrap(), Dart::new(25, 2));
        assert_eq!("s5".parse::<Dart>().unwrap(), Dart::new(5, 1));
        assert_eq!("0".parse::<Dart>().unwrap(), Dart::miss());
        assert_eq!("-".parse::<Dart>().unwrap(), Dart::UNTHROWN);
        assert!("T25".parse::<Dart>().is_err());
        assert!("X1".parse::<Dart>().is_err());
        assert_eq!(Dart::new(19, 3).to_string().parse::<Dart>().unwrap(), Dart::new(19, 3));
    }

    #[test]
    fn test_miss_is_not_a_double() {
        assert!(!Dart::new(0, 2).is_double());
        assert!(Dart::new(25, 2).is_double());
    }

    #[test]
    fn test_visit_pads_and_counts() {
        let visit = Visit::new(Uuid::new_v4(), Uuid::new_v4(), &[Dart::new(20, 3)]).unwrap();
        assert_eq!(visit.darts_thrown(), 1);
        assert_eq!(visit.score(), 60);
        assert_eq!(visit.darts[2], Dart::UNTHROWN);
        assert_eq!(visit.darts_string(), "T20 - -");
    }

    #[test]
    fn test_visit_rejects_four_darts() {
        let darts = [Dart::miss(); 4];
        let err = Visit::new(Uuid::new_v4(), Uuid::new_v4(), &darts).unwrap_err();
        assert_eq!(
            err,
            ScoringError::InvalidVisit(InvalidVisitReason::TooManyDarts(4))
        );
    }

    #[test]
    fn test_visit_requires_a_thrown_dart() {
        let visit = Visit::new(Uuid::new_v4(), Uuid::new_v4(), &[]).unwrap();
        assert_eq!(visit.validate(), Err(InvalidVisitReason::NoDarts));
    }

    #[test]
    fn test_visit_checkout_attempt_by_index() {
        let visit = Visit::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            &[Dart::new(20, 1), Dart::new(10, 2)],
        )
        .unwrap();
        assert!(!visit.is_checkout_attempt(40, 2, OutshotType::Double)); // unthrown
        assert!(visit.is_checkout_attempt(20, 1, OutshotType::Double));
        assert!(!visit.is_checkout_attempt(41, 0, OutshotType::Double));
    }

    #[test]
    fn test_truncate_to() {
        let mut visit = Visit::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            &[Dart::new(20, 3), Dart::new(20, 2), Dart::new(5, 1)],
        )
        .unwrap();
        visit.truncate_to(2);
        assert_eq!(visit.darts_thrown(), 2);
        assert_eq!(visit.score(), 100);
    }
}
