//! Record tracker
//!
//! Best performances per player across many legs. Records are always
//! recomputed from the full set of leg statistics.

use serde::{Deserialize, Serialize};

use crate::match_management::rules::CANONICAL_STARTING_SCORES;
use crate::match_management::statistics::StatisticsX01;
use crate::match_management::throws::{LegId, PlayerId};

/// A record value and the leg it was set in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestStatistic<T> {
    pub value: T,
    pub leg_id: LegId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecords {
    pub player_id: PlayerId,
    /// Fewest darts in a won 301 leg
    pub best_301: Option<BestStatistic<u32>>,
    pub best_501: Option<BestStatistic<u32>>,
    pub best_701: Option<BestStatistic<u32>>,
    pub best_three_dart_avg: Option<BestStatistic<f32>>,
    pub best_first_nine_avg: Option<BestStatistic<f32>>,
    /// Highest finishing visit in a won leg
    pub highest_checkout: Option<BestStatistic<u32>>,
}

impl PlayerRecords {
    fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            best_301: None,
            best_501: None,
            best_701: None,
            best_three_dart_avg: None,
            best_first_nine_avg: None,
            highest_checkout: None,
        }
    }

    /// Fewest-darts record for a canonical starting score
    pub fn best_for(&self, starting_score: u32) -> Option<BestStatistic<u32>> {
        match starting_score {
            301 => self.best_301,
            501 => self.best_501,
            701 => self.best_701,
            _ => None,
        }
    }

    fn best_slot(&mut self, starting_score: u32) -> Option<&mut Option<BestStatistic<u32>>> {
        match starting_score {
            301 => Some(&mut self.best_301),
            501 => Some(&mut self.best_501),
            701 => Some(&mut self.best_701),
            _ => None,
        }
    }

    fn observe(&mut self, stats: &StatisticsX01) {
        if stats.darts_thrown > 0 {
            keep_if(
                &mut self.best_three_dart_avg,
                stats.three_dart_avg,
                stats.leg_id,
                |new, old| new > old,
            );
            keep_if(
                &mut self.best_first_nine_avg,
                stats.first_nine_three_dart_avg,
                stats.leg_id,
                |new, old| new > old,
            );
        }

        if !stats.is_winner {
            return;
        }
        if CANONICAL_STARTING_SCORES.contains(&stats.starting_score) && stats.darts_thrown > 0 {
            if let Some(slot) = self.best_slot(stats.starting_score) {
                keep_if(slot, stats.darts_thrown, stats.leg_id, |new, old| new < old);
            }
        }
        if let Some(checkout) = stats.checkout {
            keep_if(&mut self.highest_checkout, checkout, stats.leg_id, |new, old| {
                new > old
            });
        }
    }
}

/// Replace the record when there is none or `better(new, old)` holds; ties keep the first
fn keep_if<T, F>(slot: &mut Option<BestStatistic<T>>, value: T, leg_id: LegId, better: F)
where
    T: Copy,
    F: Fn(T, T) -> bool,
{
    let replace = match slot {
        Some(current) => better(value, current.value),
        None => true,
    };
    if replace {
        *slot = Some(BestStatistic { value, leg_id });
    }
}

/// Compute records for every player in `statistics`, in order of first appearance
pub fn compute_records(statistics: &[StatisticsX01]) -> Vec<PlayerRecords> {
    let mut records: Vec<PlayerRecords> = Vec::new();
    for stats in statistics {
        let index = match records.iter().position(|r| r.player_id == stats.player_id) {
            Some(index) => index,
            None => {
                records.push(PlayerRecords::new(stats.player_id));
                records.len() - 1
            }
        };
        records[index].observe(stats);
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::match_management::accuracy::AccuracyStatistics;
    use uuid::Uuid;

    fn leg_stats(
        player_id: PlayerId,
        starting_score: u32,
        is_winner: bool,
        darts_thrown: u32,
        three_dart_avg: f32,
        checkout: Option<u32>,
    ) -> StatisticsX01 {
        StatisticsX01 {
            leg_id: Uuid::new_v4(),
            player_id,
            starting_score,
            is_winner,
            visits: darts_thrown.div_ceil(3),
            darts_thrown,
            ppd_score: 0,
            first_nine_ppd_score: 0,
            ppd: three_dart_avg / 3.0,
            first_nine_ppd: three_dart_avg / 3.0,
            three_dart_avg,
            first_nine_three_dart_avg: three_dart_avg,
            score_60s_plus: 0,
            score_100s_plus: 0,
            score_140s_plus: 0,
            score_180s: 0,
            checkout_attempts: 1,
            checkout_percentage: is_winner.then_some(100.0),
            checkout,
            accuracy_20: None,
            accuracy_19: None,
            accuracy_overall: None,
            accuracy: AccuracyStatistics::default(),
            hits: Default::default(),
        }
    }

    #[test]
    fn test_fewest_darts_only_counts_won_legs() {
        let p = Uuid::new_v4();
        let lost = leg_stats(p, 501, false, 12, 90.0, None);
        let won = leg_stats(p, 501, true, 18, 80.0, Some(40));
        let records = compute_records(&[lost, won.clone()]);

        assert_eq!(records.len(), 1);
        let best = records[0].best_501.unwrap();
        assert_eq!(best.value, 18);
        assert_eq!(best.leg_id, won.leg_id);
        assert_eq!(records[0].best_301, None);
    }

    #[test]
    fn test_equal_record_does_not_replace() {
        let p = Uuid::new_v4();
        let first = leg_stats(p, 301, true, 12, 75.0, Some(81));
        let second = leg_stats(p, 301, true, 12, 75.0, Some(81));
        let records = compute_records(&[first.clone(), second]);

        assert_eq!(records[0].best_301.unwrap().leg_id, first.leg_id);
        assert_eq!(records[0].best_three_dart_avg.unwrap().leg_id, first.leg_id);
        assert_eq!(records[0].highest_checkout.unwrap().leg_id, first.leg_id);
    }

    #[test]
    fn test_average_counts_lost_legs() {
        let p = Uuid::new_v4();
        let lost = leg_stats(p, 501, false, 30, 95.5, None);
        let won = leg_stats(p, 501, true, 21, 71.6, Some(32));
        let records = compute_records(&[won, lost.clone()]);

        let best = records[0].best_three_dart_avg.unwrap();
        assert_eq!(best.value, 95.5);
        assert_eq!(best.leg_id, lost.leg_id);
        assert_eq!(records[0].highest_checkout.unwrap().value, 32);
    }

    #[test]
    fn test_non_canonical_start_has_no_darts_record() {
        let p = Uuid::new_v4();
        let records = compute_records(&[leg_stats(p, 170, true, 3, 170.0, Some(170))]);
        assert_eq!(records[0].best_for(170), None);
        assert_eq!(records[0].best_for(301), None);
        assert_eq!(records[0].highest_checkout.unwrap().value, 170);
    }

    #[test]
    fn test_records_are_kept_per_player() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let records = compute_records(&[
            leg_stats(a, 701, true, 30, 70.1, Some(20)),
            leg_stats(b, 701, false, 30, 60.0, None),
            leg_stats(b, 701, true, 27, 77.9, Some(100)),
        ]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].player_id, a);
        assert_eq!(records[1].best_701.unwrap().value, 27);
        assert_eq!(records[1].highest_checkout.unwrap().value, 100);
    }
}
