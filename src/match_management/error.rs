//! Error types for the scoring engine
//!
//! Every error returned by the engine is recoverable by the caller: the
//! engine performs no I/O and never retries. A failed operation leaves the
//! leg or match exactly as it was before the call.

use serde::{Deserialize, Serialize};

use crate::match_management::throws::{LegId, MatchId, PlayerId};

/// Why a visit was rejected as malformed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum InvalidVisitReason {
    /// Dart value outside 0-20 and not 25
    #[error("dart value {0} is not on the board")]
    DartValue(u8),
    /// Multiplier outside 1-3
    #[error("multiplier {0} is not 1, 2 or 3")]
    Multiplier(u8),
    #[error("bullseye has no triple ring")]
    TripleBull,
    #[error("{0} darts in one visit")]
    TooManyDarts(usize),
    #[error("visit contains no thrown darts")]
    NoDarts,
    /// The throwing player does not take part in the leg
    #[error("player {0} is not in this leg")]
    UnknownPlayer(PlayerId),
    #[error("player {0} has been knocked out")]
    Eliminated(PlayerId),
    /// The visit was addressed to a different leg
    #[error("visit for leg {found} submitted to leg {expected}")]
    LegMismatch { expected: LegId, found: LegId },
    #[error("no leg {0} in this match")]
    UnknownLeg(LegId),
    /// No committed visit carries this sequence number
    #[error("no visit with sequence {0}")]
    UnknownSequence(u32),
    /// Replaying the history after a correction failed at this sequence
    #[error("history no longer valid at visit {0}")]
    ReplayRejected(u32),
}

/// Errors produced by the scoring engine
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("invalid visit: {0}")]
    InvalidVisit(#[from] InvalidVisitReason),

    #[error("player {player} threw out of turn, {expected} is up")]
    WrongTurn {
        player: PlayerId,
        expected: PlayerId,
    },

    #[error("leg {0} is already finished")]
    LegClosed(LegId),

    #[error("match {0} is already finished")]
    MatchClosed(MatchId),

    #[error("invalid leg setup: {0}")]
    InvalidSetup(String),

    #[error("operation not applicable: {0}")]
    NotApplicable(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_error_messages() {
        let err = ScoringError::from(InvalidVisitReason::Multiplier(4));
        assert_eq!(
            err.to_string(),
            "invalid visit: multiplier 4 is not 1, 2 or 3"
        );

        let leg = Uuid::nil();
        assert_eq!(
            ScoringError::LegClosed(leg).to_string(),
            format!("leg {leg} is already finished")
        );
    }

    #[test]
    fn test_reason_is_the_error_source() {
        use std::error::Error;

        let err = ScoringError::from(InvalidVisitReason::TripleBull);
        let source = err.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("bullseye has no triple ring"));
        assert_eq!(
            InvalidVisitReason::TooManyDarts(4).to_string(),
            "4 darts in one visit"
        );
    }
}
