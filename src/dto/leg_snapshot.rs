use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::match_management::state::{Leg, LegStatus};
use crate::match_management::variant::GameType;

/// Client view of a leg, players in serving order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegSnapshot {
    pub id: Uuid,
    pub game_type: GameType,
    pub status: LegStatus,
    pub current_player_id: Option<Uuid>,
    pub winner_id: Option<Uuid>,
    pub players: Vec<PlayerSnapshot>,
    pub visits: Vec<VisitSnapshot>,
    pub tic_tac_toe_numbers: Option<Vec<u32>>,
}

/// One seat and its running state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub player_id: Uuid,
    pub serving_order: u32,
    pub is_active: bool,
    pub handicap: i32,
    pub remaining: Option<u32>, // X01 only
    pub cricket_marks: Option<Vec<u8>>,
    pub points: Option<u32>, // Cricket, Shootout, Darts-at-X
    pub lives: Option<u32>,  // Knockout only
}

/// A committed visit with darts in board notation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitSnapshot {
    pub sequence: u32,
    pub player_id: Uuid,
    pub darts: Vec<String>,
    pub score: u32,
    pub is_bust: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Leg> for LegSnapshot {
    fn from(leg: &Leg) -> Self {
        let players = leg
            .turn_order()
            .seats()
            .iter()
            .map(|seat| {
                let handicap = leg
                    .players()
                    .iter()
                    .find(|p| p.player_id == seat.player_id)
                    .map_or(0, |p| p.handicap);
                PlayerSnapshot {
                    player_id: seat.player_id,
                    serving_order: seat.order,
                    is_active: seat.active,
                    handicap,
                    remaining: leg.remaining(seat.player_id),
                    cricket_marks: leg.cricket_marks(seat.player_id).map(|m| m.to_vec()),
                    points: leg.points(seat.player_id),
                    lives: leg.lives(seat.player_id),
                }
            })
            .collect();

        let visits = leg
            .visits()
            .iter()
            .map(|visit| VisitSnapshot {
                sequence: visit.sequence,
                player_id: visit.player_id,
                darts: visit.darts.iter().map(ToString::to_string).collect(),
                score: if visit.bust { 0 } else { visit.score() },
                is_bust: visit.bust,
                created_at: visit.created,
            })
            .collect();

        LegSnapshot {
            id: leg.id(),
            game_type: leg.game_type(),
            status: leg.status(),
            current_player_id: leg.current_player(),
            winner_id: leg.winner(),
            players,
            visits,
            tic_tac_toe_numbers: leg.tic_tac_toe_numbers().map(|n| n.to_vec()),
        }
    }
}
