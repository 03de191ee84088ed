//! Tic-Tac-Toe board numbers
//!
//! Only the board is generated here. Claiming cells and deciding the winner
//! belong to the board logic, which ends the leg with a declared winner.

use rand::seq::index::sample;
use serde::{Deserialize, Serialize};

use crate::match_management::error::ScoringError;
use crate::match_management::rotation::TurnOrder;
use crate::match_management::rules::TIC_TAC_TOE_CELLS;
use crate::match_management::throws::Visit;
use crate::match_management::variant::{VariantRules, VisitResolution};

/// Smallest number that can be put on the board
pub const TIC_TAC_TOE_LOWEST: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicTacToeState {
    /// Row-major 3x3 board
    pub numbers: [u32; TIC_TAC_TOE_CELLS],
}

impl TicTacToeState {
    /// Draw nine distinct numbers uniformly from 2..=`highest`
    pub fn generate(highest: u32) -> Result<Self, ScoringError> {
        let span = highest.saturating_sub(TIC_TAC_TOE_LOWEST) as usize + 1;
        if highest < TIC_TAC_TOE_LOWEST || span < TIC_TAC_TOE_CELLS {
            return Err(ScoringError::InvalidSetup(format!(
                "cannot draw {TIC_TAC_TOE_CELLS} distinct numbers up to {highest}"
            )));
        }

        let mut rng = rand::thread_rng();
        let mut numbers = [0; TIC_TAC_TOE_CELLS];
        for (cell, offset) in numbers
            .iter_mut()
            .zip(sample(&mut rng, span, TIC_TAC_TOE_CELLS).iter())
        {
            *cell = TIC_TAC_TOE_LOWEST + offset as u32;
        }
        Ok(Self { numbers })
    }
}

impl VariantRules for TicTacToeState {
    fn apply(&mut self, _seat: usize, visit: &Visit, _turn: &mut TurnOrder) -> VisitResolution {
        VisitResolution {
            darts_used: visit.darts_thrown(),
            ..VisitResolution::default()
        }
    }
}
