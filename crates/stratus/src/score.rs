//! Placement scoring.
//!
//! A [`ScoreState`] is created empty for every diagram session with
//! [`new_session`] and only ever replaced by [`ScoreTracker::apply`], which
//! returns a new state instead of mutating the old one. Callers that share a
//! state between threads must serialize their updates themselves.
//!
//! Rules applied per verdict:
//!
//! - Valid: the streak grows and the verdict's points are added, plus the
//!   streak bonus once the streak reaches [`STREAK_THRESHOLD`].
//! - Invalid: the streak resets and the (usually negative) points are added.
//! - The total never drops below zero.

use chrono::{DateTime, Utc};
use log::trace;
use serde::Serialize;

use stratus_core::node::NodeKind;

use crate::{
    config::{STREAK_THRESHOLD, ScoringConfig},
    validate::ValidationVerdict,
};

/// One placement attempt, as recorded in the session history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRecord {
    timestamp: DateTime<Utc>,
    service_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<NodeKind>,
    verdict: ValidationVerdict,
}

impl PlacementRecord {
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    /// The container the service was dropped into; `None` is the canvas.
    pub fn target(&self) -> Option<&NodeKind> {
        self.target.as_ref()
    }

    pub fn verdict(&self) -> &ValidationVerdict {
        &self.verdict
    }
}

/// Running score of one diagram session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreState {
    correct_placements: u32,
    incorrect_attempts: u32,
    current_streak: u32,
    longest_streak: u32,
    total_points: u32,
    history: Vec<PlacementRecord>,
}

impl ScoreState {
    pub fn correct_placements(&self) -> u32 {
        self.correct_placements
    }

    pub fn incorrect_attempts(&self) -> u32 {
        self.incorrect_attempts
    }

    /// Consecutive valid placements since the last invalid one.
    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    pub fn longest_streak(&self) -> u32 {
        self.longest_streak
    }

    pub fn total_points(&self) -> u32 {
        self.total_points
    }

    /// Every attempt of the session, oldest first.
    pub fn history(&self) -> &[PlacementRecord] {
        &self.history
    }

    /// Summarizes the session.
    pub fn stats(&self) -> SessionStats {
        let total_attempts = self.correct_placements + self.incorrect_attempts;
        let accuracy = if total_attempts == 0 {
            0.0
        } else {
            let percent = self.correct_placements as f32 / total_attempts as f32 * 100.0;
            (percent * 10.0).round() / 10.0
        };

        SessionStats {
            total_attempts,
            correct_placements: self.correct_placements,
            incorrect_attempts: self.incorrect_attempts,
            accuracy,
            current_streak: self.current_streak,
            longest_streak: self.longest_streak,
            total_points: self.total_points,
        }
    }
}

/// Summary of a session for progress displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub total_attempts: u32,
    pub correct_placements: u32,
    pub incorrect_attempts: u32,
    /// Percentage of valid attempts, rounded to one decimal.
    pub accuracy: f32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_points: u32,
}

/// Starts an empty session.
pub fn new_session() -> ScoreState {
    ScoreState::default()
}

/// Applies verdicts to score states.
#[derive(Debug, Clone, Default)]
pub struct ScoreTracker {
    scoring: ScoringConfig,
}

impl ScoreTracker {
    /// Creates a tracker with the given point values.
    pub fn new(scoring: ScoringConfig) -> Self {
        Self { scoring }
    }

    /// Returns the state after recording `verdict`, timestamped now.
    pub fn apply(
        &self,
        state: &ScoreState,
        verdict: &ValidationVerdict,
        service_id: &str,
        target: Option<&NodeKind>,
    ) -> ScoreState {
        self.apply_at(state, verdict, service_id, target, Utc::now())
    }

    /// Returns the state after recording `verdict` with an explicit timestamp.
    pub fn apply_at(
        &self,
        state: &ScoreState,
        verdict: &ValidationVerdict,
        service_id: &str,
        target: Option<&NodeKind>,
        timestamp: DateTime<Utc>,
    ) -> ScoreState {
        let mut next = state.clone();

        next.history.push(PlacementRecord {
            timestamp,
            service_id: service_id.to_string(),
            target: target.cloned(),
            verdict: verdict.clone(),
        });

        let delta = if verdict.is_valid() {
            next.correct_placements = next.correct_placements.saturating_add(1);
            next.current_streak = next.current_streak.saturating_add(1);
            next.longest_streak = next.longest_streak.max(next.current_streak);

            let bonus = if next.current_streak >= STREAK_THRESHOLD {
                i64::from(self.scoring.streak_bonus)
            } else {
                0
            };
            i64::from(verdict.points_awarded()) + bonus
        } else {
            next.incorrect_attempts = next.incorrect_attempts.saturating_add(1);
            next.current_streak = 0;
            i64::from(verdict.points_awarded())
        };

        let total = (i64::from(next.total_points) + delta).max(0);
        next.total_points = u32::try_from(total).unwrap_or(u32::MAX);

        trace!(
            service_id,
            delta,
            streak = next.current_streak,
            total = next.total_points;
            "Applied verdict"
        );

        next
    }
}

/// Applies a verdict with the default point values.
///
/// See [`ScoreTracker::apply`].
pub fn apply_verdict(
    state: &ScoreState,
    verdict: &ValidationVerdict,
    service_id: &str,
    target: Option<&NodeKind>,
) -> ScoreState {
    ScoreTracker::default().apply(state, verdict, service_id, target)
}

/// Like [`apply_verdict`], with the history timestamp supplied by the caller.
pub fn apply_verdict_at(
    state: &ScoreState,
    verdict: &ValidationVerdict,
    service_id: &str,
    target: Option<&NodeKind>,
    timestamp: DateTime<Utc>,
) -> ScoreState {
    ScoreTracker::default().apply_at(state, verdict, service_id, target, timestamp)
}
