//! Statistics aggregator
//!
//! X01 performance figures for one leg. There are two entry points over the
//! same arithmetic:
//! - live: every X01 leg owns a [`StatisticsAccumulator`] per player and
//!   feeds it each committed visit
//! - batch: [`compute_statistics`] replays a stored visit history from the
//!   starting scores
//!
//! Both call [`score_visit`] and [`StatisticsAccumulator::record`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::match_management::accuracy::{
    AccuracyClassifier, AccuracyStatistics, ScoringAccuracy,
};
use crate::match_management::error::{InvalidVisitReason, ScoringError};
use crate::match_management::rules::{score_bucket, OutshotType, ScoreBucket, FIRST_NINE_DARTS};
use crate::match_management::state::LegPlayer;
use crate::match_management::throws::{LegId, PlayerId, Visit};
use crate::match_management::x01::{handicapped_start, score_visit, ScoredVisit};

/// Times a number was hit in each ring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hits {
    pub singles: u32,
    pub doubles: u32,
    pub triples: u32,
}

impl Hits {
    fn add(&mut self, multiplier: u8) {
        match multiplier {
            3 => self.triples += 1,
            2 => self.doubles += 1,
            _ => self.singles += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.singles + self.doubles + self.triples
    }
}

/// Running per-player counters for one leg
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsAccumulator {
    pub visits: u32,
    pub darts_thrown: u32,
    pub ppd_score: u32,
    pub first_nine_ppd_score: u32,
    pub score_60s_plus: u32,
    pub score_100s_plus: u32,
    pub score_140s_plus: u32,
    pub score_180s: u32,
    pub checkout_attempts: u32,
    /// Value of the finishing visit, once there is one
    pub checkout: Option<u32>,
    pub accuracy: AccuracyStatistics,
    /// Hits per board number, misses and bust visits left out
    pub hits: BTreeMap<u8, Hits>,
}

impl StatisticsAccumulator {
    /// Fold one scored visit into the counters
    pub fn record<C>(&mut self, visit: &Visit, scored: &ScoredVisit, classifier: &C)
    where
        C: AccuracyClassifier + ?Sized,
    {
        self.visits += 1;
        self.darts_thrown += scored.darts_used as u32;
        self.checkout_attempts += scored.checkout_attempts;

        if scored.bust {
            return;
        }

        if self.darts_thrown <= FIRST_NINE_DARTS {
            self.first_nine_ppd_score += scored.score;
        }
        self.ppd_score += scored.score;

        match score_bucket(scored.score) {
            Some(ScoreBucket::SixtyPlus) => self.score_60s_plus += 1,
            Some(ScoreBucket::TonPlus) => self.score_100s_plus += 1,
            Some(ScoreBucket::TonFortyPlus) => self.score_140s_plus += 1,
            Some(ScoreBucket::OneEighty) => self.score_180s += 1,
            None => {}
        }

        let mut remaining = scored.remaining_before;
        for dart in visit
            .darts
            .iter()
            .filter(|d| d.is_thrown())
            .take(scored.darts_used)
        {
            if let Some(classification) = classifier.classify(remaining, dart) {
                self.accuracy.record(classification);
            }
            if let Some(value) = dart.value.filter(|&v| v > 0) {
                self.hits.entry(value).or_default().add(dart.multiplier);
            }
            remaining = remaining.saturating_sub(dart.score());
        }

        if scored.checkout {
            self.checkout = Some(scored.score);
        }
    }

    /// Derive the published figures
    pub fn finish(
        &self,
        leg_id: LegId,
        player_id: PlayerId,
        starting_score: u32,
        is_winner: bool,
    ) -> StatisticsX01 {
        let ppd = if self.darts_thrown > 0 {
            self.ppd_score as f32 / self.darts_thrown as f32
        } else {
            0.0
        };
        // Fixed denominator, even when the leg ended inside nine darts
        let first_nine_ppd = self.first_nine_ppd_score as f32 / FIRST_NINE_DARTS as f32;

        let checkout_percentage = match (is_winner, self.checkout_attempts) {
            (true, attempts) if attempts > 0 => Some(100.0 / attempts as f32),
            _ => None,
        };

        StatisticsX01 {
            leg_id,
            player_id,
            starting_score,
            is_winner,
            visits: self.visits,
            darts_thrown: self.darts_thrown,
            ppd_score: self.ppd_score,
            first_nine_ppd_score: self.first_nine_ppd_score,
            ppd,
            first_nine_ppd,
            three_dart_avg: ppd * 3.0,
            first_nine_three_dart_avg: first_nine_ppd * 3.0,
            score_60s_plus: self.score_60s_plus,
            score_100s_plus: self.score_100s_plus,
            score_140s_plus: self.score_140s_plus,
            score_180s: self.score_180s,
            checkout_attempts: self.checkout_attempts,
            checkout_percentage,
            checkout: if is_winner { self.checkout } else { None },
            accuracy_20: self.accuracy.accuracy(20),
            accuracy_19: self.accuracy.accuracy(19),
            accuracy_overall: self.accuracy.overall(),
            accuracy: self.accuracy.clone(),
            hits: self.hits.clone(),
        }
    }
}

/// X01 figures for one player in one leg
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsX01 {
    pub leg_id: LegId,
    pub player_id: PlayerId,
    /// Leg starting score, before handicap
    pub starting_score: u32,
    pub is_winner: bool,
    pub visits: u32,
    pub darts_thrown: u32,
    pub ppd_score: u32,
    pub first_nine_ppd_score: u32,
    pub ppd: f32,
    pub first_nine_ppd: f32,
    pub three_dart_avg: f32,
    pub first_nine_three_dart_avg: f32,
    pub score_60s_plus: u32,
    pub score_100s_plus: u32,
    pub score_140s_plus: u32,
    pub score_180s: u32,
    pub checkout_attempts: u32,
    /// Winner only; `None` when not applicable (loser, or no attempts)
    pub checkout_percentage: Option<f32>,
    /// Value of the finishing visit, winner only
    pub checkout: Option<u32>,
    pub accuracy_20: Option<f32>,
    pub accuracy_19: Option<f32>,
    pub accuracy_overall: Option<f32>,
    pub accuracy: AccuracyStatistics,
    pub hits: BTreeMap<u8, Hits>,
}

/// Recompute X01 statistics for a leg from its visit history
///
/// Results are returned in the order of `players`.
pub fn compute_statistics(
    leg_id: LegId,
    visits: &[Visit],
    players: &[LegPlayer],
    starting_score: u32,
    outshot: OutshotType,
    winner: Option<PlayerId>,
) -> Result<Vec<StatisticsX01>, ScoringError> {
    compute_statistics_with(
        leg_id,
        visits,
        players,
        starting_score,
        outshot,
        winner,
        &ScoringAccuracy,
    )
}

/// As [`compute_statistics`], judging accuracy with a custom classifier
pub fn compute_statistics_with<C>(
    leg_id: LegId,
    visits: &[Visit],
    players: &[LegPlayer],
    starting_score: u32,
    outshot: OutshotType,
    winner: Option<PlayerId>,
    classifier: &C,
) -> Result<Vec<StatisticsX01>, ScoringError>
where
    C: AccuracyClassifier + ?Sized,
{
    let mut remaining = players
        .iter()
        .map(|p| handicapped_start(starting_score, p.handicap))
        .collect::<Result<Vec<_>, _>>()?;
    let mut accumulators = vec![StatisticsAccumulator::default(); players.len()];
    let mut checked_out = false;

    let mut ordered: Vec<&Visit> = visits.iter().collect();
    ordered.sort_by_key(|v| (v.sequence, v.created));

    for visit in ordered {
        if checked_out {
            return Err(ScoringError::LegClosed(leg_id));
        }
        let seat = players
            .iter()
            .position(|p| p.player_id == visit.player_id)
            .ok_or(InvalidVisitReason::UnknownPlayer(visit.player_id))?;

        let scored = score_visit(remaining[seat], visit, outshot);
        accumulators[seat].record(visit, &scored, classifier);
        remaining[seat] = scored.remaining_after;
        checked_out = scored.checkout;
    }

    Ok(players
        .iter()
        .zip(accumulators.iter())
        .map(|(player, acc)| {
            acc.finish(
                leg_id,
                player.player_id,
                starting_score,
                winner == Some(player.player_id),
            )
        })
        .collect())
}
