//! Per-target accuracy
//!
//! Deciding what a player was aiming at is a judgement call, so it sits
//! behind the [`AccuracyClassifier`] trait. The statistics aggregator feeds
//! every counted dart through a classifier together with the remainder the
//! dart was thrown at.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::match_management::rules::{neighbours, MAX_CHECKOUT};
use crate::match_management::throws::Dart;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccuracyOutcome {
    /// Landed in the intended number
    OnTarget,
    /// Landed in a segment next to the intended number
    MissedInside,
    /// Landed anywhere else
    MissedOutside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccuracyClassification {
    pub target: u8,
    pub outcome: AccuracyOutcome,
}

pub trait AccuracyClassifier {
    /// Classify one dart thrown at `remaining_before`, or `None` if it is not judged
    fn classify(&self, remaining_before: u32, dart: &Dart) -> Option<AccuracyClassification>;
}

/// Judges scoring darts only: above the checkout range a player aims at 20,
/// or at 19 when the dart landed around the 19 segment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringAccuracy;

impl ScoringAccuracy {
    fn classify_against(target: u8, value: u8) -> AccuracyOutcome {
        if value == target {
            AccuracyOutcome::OnTarget
        } else if neighbours(target).is_some_and(|(l, r)| value == l || value == r) {
            AccuracyOutcome::MissedInside
        } else {
            AccuracyOutcome::MissedOutside
        }
    }
}

impl AccuracyClassifier for ScoringAccuracy {
    fn classify(&self, remaining_before: u32, dart: &Dart) -> Option<AccuracyClassification> {
        let value = dart.value?;
        if remaining_before <= MAX_CHECKOUT {
            return None;
        }
        let target = match neighbours(19) {
            Some((l, r)) if value == 19 || value == l || value == r => 19,
            _ => 20,
        };
        Some(AccuracyClassification {
            target,
            outcome: Self::classify_against(target, value),
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetAccuracy {
    pub on_target: u32,
    pub missed_inside: u32,
    pub missed_outside: u32,
}

impl TargetAccuracy {
    pub fn attempts(&self) -> u32 {
        self.on_target + self.missed_inside + self.missed_outside
    }

    /// Share of darts on target, `None` without attempts
    pub fn ratio(&self) -> Option<f32> {
        match self.attempts() {
            0 => None,
            attempts => Some(self.on_target as f32 / attempts as f32),
        }
    }
}

/// Accuracy counters keyed by target number
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccuracyStatistics {
    pub targets: BTreeMap<u8, TargetAccuracy>,
}

impl AccuracyStatistics {
    pub fn record(&mut self, classification: AccuracyClassification) {
        let entry = self.targets.entry(classification.target).or_default();
        match classification.outcome {
            AccuracyOutcome::OnTarget => entry.on_target += 1,
            AccuracyOutcome::MissedInside => entry.missed_inside += 1,
            AccuracyOutcome::MissedOutside => entry.missed_outside += 1,
        }
    }

    pub fn accuracy(&self, target: u8) -> Option<f32> {
        self.targets.get(&target).and_then(TargetAccuracy::ratio)
    }

    pub fn overall(&self) -> Option<f32> {
        let total = self
            .targets
            .values()
            .fold(TargetAccuracy::default(), |acc, t| TargetAccuracy {
                on_target: acc.on_target + t.on_target,
                missed_inside: acc.missed_inside + t.missed_inside,
                missed_outside: acc.missed_outside + t.missed_outside,
            });
        total.ratio()
    }
}
