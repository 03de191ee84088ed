//! Stored leg history, as read by the replay binary

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::dto::leg_snapshot::LegSnapshot;
use crate::dto::statistics_report::StatisticsReport;
use crate::match_management::error::ScoringError;
use crate::match_management::records::compute_records;
use crate::match_management::state::{Leg, LegPlayer, TurnPolicy};
use crate::match_management::statistics::compute_statistics;
use crate::match_management::throws::{Dart, Visit};
use crate::match_management::variant::{GameType, LegParameters};

/// A leg as it was thrown: setup plus visits in order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegLog {
    pub game_type: GameType,
    #[serde(default)]
    pub parameters: LegParameters,
    /// Serving order
    pub players: Vec<LegPlayer>,
    pub visits: Vec<LoggedVisit>,
    /// Winner named by the board or a referee, where the variant allows it
    #[serde(default)]
    pub declared_winner_id: Option<Uuid>,
}

/// One visit of the log; the leg id is assigned on replay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedVisit {
    pub player_id: Uuid,
    pub darts: Vec<Dart>,
}

impl LegLog {
    /// Play the logged visits through a fresh leg
    pub fn replay(&self) -> Result<Leg, ScoringError> {
        let mut leg = Leg::new(self.game_type, self.parameters, self.players.clone())?;
        for logged in &self.visits {
            let visit = Visit::new(leg.id(), logged.player_id, &logged.darts)?;
            leg.apply_visit(visit, TurnPolicy::Enforce)?;
        }
        if let Some(winner) = self.declared_winner_id {
            leg.declare_winner(winner)?;
        }
        info!(leg_id = %leg.id(), visits = leg.visits().len(), "Leg log replayed");
        Ok(leg)
    }

    /// Replay and derive statistics and records
    pub fn report(&self) -> Result<StatisticsReport, ScoringError> {
        let leg = self.replay()?;
        let statistics = if leg.game_type().is_x01() {
            compute_statistics(
                leg.id(),
                leg.visits(),
                leg.players(),
                leg.parameters().starting_score,
                leg.parameters().outshot,
                leg.winner(),
            )?
        } else {
            Vec::new()
        };
        let records = compute_records(&statistics);

        Ok(StatisticsReport {
            leg: LegSnapshot::from(&leg),
            statistics,
            records,
        })
    }
}
