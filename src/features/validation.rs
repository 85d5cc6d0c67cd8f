//! Match state checks
//!
//! Warnings are non-fatal; whether they block a prediction is decided by
//! [`ValidationPolicy`](crate::ValidationPolicy) at the predictor.

use serde::Serialize;
use std::fmt;

use super::match_state::MatchState;
use crate::Team;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationWarning {
    /// Batting and bowling side are the same team
    SameTeams { team: Team },
    /// Overs outside [5.1, 19.5]
    OversOutOfRange { overs: f64 },
    /// Ball digit above 5 (an over only has 6 balls)
    InvalidBallCount { overs: f64 },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::SameTeams { team } => write!(
                f,
                "Bowling and batting teams should be different (both are {})",
                team
            ),
            ValidationWarning::OversOutOfRange { overs } => write!(
                f,
                "Overs {} outside supported range {}-{}",
                overs,
                MatchState::MIN_OVERS,
                MatchState::MAX_OVERS
            ),
            ValidationWarning::InvalidBallCount { overs } => write!(
                f,
                "Overs {} is not valid: one over only contains 6 balls",
                overs
            ),
        }
    }
}

/// Tolerance for float noise in entered overs (e.g. 5.1 parsed as 5.0999...)
const OVERS_EPSILON: f64 = 1e-9;

/// Five balls bowled: the largest legal fraction of an over
const MAX_BALL_FRACTION: f64 = 0.5;

pub fn validate(state: &MatchState) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if state.batting_team() == state.bowling_team() {
        warnings.push(ValidationWarning::SameTeams {
            team: state.batting_team(),
        });
    }

    let overs = state.overs();
    if !overs.is_finite()
        || overs < MatchState::MIN_OVERS - OVERS_EPSILON
        || overs > MatchState::MAX_OVERS + OVERS_EPSILON
    {
        warnings.push(ValidationWarning::OversOutOfRange { overs });
    }

    if state.over_fraction() > MAX_BALL_FRACTION + OVERS_EPSILON {
        warnings.push(ValidationWarning::InvalidBallCount { overs });
    }

    warnings
}
