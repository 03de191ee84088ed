use std::sync::Once;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use crate::match_management::error::ScoringError;
use crate::match_management::state::{Leg, LegPlayer, TurnPolicy, VisitOutcome};
use crate::match_management::throws::{Dart, PlayerId, Visit};

static INIT: Once = Once::new();

pub fn init_tracing_for_tests() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    });
}

/// Darts from notation, e.g. `darts!["T20", "T20", "D20"]`
#[macro_export]
macro_rules! darts {
    ($($dart:expr),* $(,)?) => {
        vec![$($dart.parse::<$crate::match_management::throws::Dart>().expect("dart notation")),*]
    };
}

/// `n` fresh player ids
pub fn player_ids(n: usize) -> Vec<PlayerId> {
    (0..n).map(|_| Uuid::new_v4()).collect()
}

/// Unhandicapped seats for `ids`
pub fn leg_players(ids: &[PlayerId]) -> Vec<LegPlayer> {
    ids.iter().copied().map(LegPlayer::new).collect()
}

/// Throw `darts` for `player`, enforcing turn order
pub fn throw(leg: &mut Leg, player: PlayerId, darts: &[Dart]) -> Result<VisitOutcome, ScoringError> {
    let visit = Visit::new(leg.id(), player, darts)?;
    leg.apply_visit(visit, TurnPolicy::Enforce)
}

/// Throw for whoever is up
pub fn throw_current(leg: &mut Leg, darts: &[Dart]) -> Result<VisitOutcome, ScoringError> {
    let player = leg
        .current_player()
        .ok_or(ScoringError::LegClosed(leg.id()))?;
    throw(leg, player, darts)
}
