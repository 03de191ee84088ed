//! Turn rotation
//!
//! Serving order is fixed when a leg is created. Each seat keeps its
//! 1-based order for the life of the leg; substitution swaps the player in a
//! seat and elimination only marks it inactive.

use serde::{Deserialize, Serialize};

use crate::match_management::error::ScoringError;
use crate::match_management::rules::next_serving_order;
use crate::match_management::throws::PlayerId;

/// A player's fixed position in the serving order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub player_id: PlayerId,
    /// 1-based serving order
    pub order: u32,
    /// False once eliminated (Knockout only)
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOrder {
    seats: Vec<Seat>,
    current: usize,
}

impl TurnOrder {
    /// Establish serving order from the given player list; the first player throws first
    pub fn new(players: &[PlayerId]) -> Result<Self, ScoringError> {
        if players.is_empty() {
            return Err(ScoringError::InvalidSetup(
                "a leg needs at least one player".to_string(),
            ));
        }
        for (i, player) in players.iter().enumerate() {
            if players[..i].contains(player) {
                return Err(ScoringError::InvalidSetup(format!(
                    "player {player} listed twice"
                )));
            }
        }
        let seats = players
            .iter()
            .enumerate()
            .map(|(i, &player_id)| Seat {
                player_id,
                order: i as u32 + 1,
                active: true,
            })
            .collect();
        Ok(Self { seats, current: 0 })
    }

    /// Player whose turn it is
    pub fn current(&self) -> PlayerId {
        self.seats[self.current].player_id
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Players in serving order
    pub fn players(&self) -> Vec<PlayerId> {
        self.seats.iter().map(|s| s.player_id).collect()
    }

    /// Seat index (0-based) of a player
    pub fn position(&self, player: PlayerId) -> Option<usize> {
        self.seats.iter().position(|s| s.player_id == player)
    }

    /// 1-based serving order of a player
    pub fn order_of(&self, player: PlayerId) -> Option<u32> {
        self.position(player).map(|i| self.seats[i].order)
    }

    pub fn player_at(&self, seat: usize) -> Option<PlayerId> {
        self.seats.get(seat).map(|s| s.player_id)
    }

    pub fn is_active(&self, player: PlayerId) -> bool {
        self.position(player).is_some_and(|i| self.seats[i].active)
    }

    pub fn active_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.seats.iter().filter(|s| s.active).map(|s| s.player_id)
    }

    pub fn active_count(&self) -> usize {
        self.seats.iter().filter(|s| s.active).count()
    }

    /// The player due after `player`, skipping eliminated seats
    ///
    /// Returns `None` when `player` is not seated or nobody is active.
    pub fn next_after(&self, player: PlayerId) -> Option<PlayerId> {
        let start = self.order_of(player)?;
        let count = self.seats.len() as u32;
        let mut order = start;
        for _ in 0..count {
            order = next_serving_order(order, count);
            let seat = &self.seats[(order - 1) as usize];
            if seat.active {
                return Some(seat.player_id);
            }
        }
        None
    }

    /// Hand the turn to whoever follows `player`
    pub(crate) fn advance_from(&mut self, player: PlayerId) -> Option<PlayerId> {
        let next = self.next_after(player)?;
        self.current = self.position(next)?;
        Some(next)
    }

    /// Give the turn to `player` directly
    pub(crate) fn set_current(&mut self, player: PlayerId) -> bool {
        match self.position(player) {
            Some(seat) => {
                self.current = seat;
                true
            }
            None => false,
        }
    }

    /// Remove a seat from rotation; returns false if it was already inactive
    pub(crate) fn eliminate_seat(&mut self, seat: usize) -> bool {
        match self.seats.get_mut(seat) {
            Some(s) if s.active => {
                s.active = false;
                true
            }
            _ => false,
        }
    }

    /// Put `new` into `old`'s seat, keeping its order and turn
    pub fn substitute(&mut self, old: PlayerId, new: PlayerId) -> Result<(), ScoringError> {
        if self.position(new).is_some() {
            return Err(ScoringError::InvalidSetup(format!(
                "player {new} is already seated"
            )));
        }
        let seat = self.position(old).ok_or_else(|| {
            ScoringError::InvalidSetup(format!("player {old} is not seated"))
        })?;
        self.seats[seat].player_id = new;
        Ok(())
    }
}
