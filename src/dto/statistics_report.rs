use serde::{Deserialize, Serialize};

use crate::dto::leg_snapshot::LegSnapshot;
use crate::match_management::records::PlayerRecords;
use crate::match_management::statistics::StatisticsX01;

/// Output of a leg replay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsReport {
    pub leg: LegSnapshot,
    pub statistics: Vec<StatisticsX01>, // Empty for non-X01 legs
    pub records: Vec<PlayerRecords>,
}
