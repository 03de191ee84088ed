//! Match management module
//!
//! This module contains the darts scoring engine: visit validation, turn
//! rotation, the per-variant rules, leg and match completion, and the
//! statistics and records derived from visit histories. Nothing in here
//! performs I/O.

pub mod accuracy;
pub mod completion;
pub mod cricket;
pub mod error;
pub mod knockout;
pub mod quota;
pub mod records;
pub mod rotation;
pub mod rules;
pub mod state;
pub mod statistics;
pub mod throws;
pub mod tictactoe;
pub mod variant;
pub mod x01;

pub use completion::{Match, MatchMode, MatchProgress, TieBreak};
pub use error::{InvalidVisitReason, ScoringError};
pub use records::{compute_records, BestStatistic, PlayerRecords};
pub use rules::OutshotType;
pub use state::{Leg, LegPlayer, LegStatus, TurnPolicy, VisitOutcome};
pub use statistics::{compute_statistics, compute_statistics_with, Hits, StatisticsX01};
pub use throws::{Dart, LegId, MatchId, PlayerId, Visit};
pub use variant::{GameType, LegParameters, LifeRule};

/// Initial state for a new leg
pub fn new_leg(
    game_type: GameType,
    players: &[LegPlayer],
    parameters: LegParameters,
) -> Result<Leg, ScoringError> {
    Leg::new(game_type, parameters, players.to_vec())
}

/// Apply a visit to a leg without touching the original
///
/// Returns the next leg state together with the committed visit.
pub fn apply_visit(
    leg: &Leg,
    visit: Visit,
    policy: TurnPolicy,
) -> Result<(Leg, VisitOutcome), ScoringError> {
    let mut next = leg.clone();
    let outcome = next.apply_visit(visit, policy)?;
    Ok((next, outcome))
}
