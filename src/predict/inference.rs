//! Model inference for score ranges

use serde::Serialize;
use std::fmt;

use crate::features::{encode, validate, FeatureVector, MatchState, ValidationWarning};
use crate::model::ScoreModel;
use crate::{Result, ScoreError, ValidationPolicy};

/// Runs either side of the rounded point estimate
pub const RANGE_HALF_WIDTH: i64 = 5;

/// Largest point estimate magnitude accepted from a model
pub const MAX_SCORE_MAGNITUDE: f64 = 1e12;

/// Symmetric score band around a point estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PredictedRange {
    pub low: i64,
    pub high: i64,
}

impl PredictedRange {
    pub fn midpoint(&self) -> i64 {
        self.low + (self.high - self.low) / 2
    }
}

impl fmt::Display for PredictedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.low, self.high)
    }
}

/// Round the raw model output and widen it by ±5
pub fn present_range(raw_score: f64) -> PredictedRange {
    let rounded = raw_score.round() as i64;
    PredictedRange {
        low: rounded.saturating_sub(RANGE_HALF_WIDTH),
        high: rounded.saturating_add(RANGE_HALF_WIDTH),
    }
}

/// Result of a single prediction request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    pub range: PredictedRange,
    /// Raw model output before rounding
    pub point_estimate: f64,
    /// Non-fatal issues with the input
    pub warnings: Vec<ValidationWarning>,
}

/// Score predictor around an injected, read-only model
pub struct ScorePredictor<M: ScoreModel> {
    model: M,
    policy: ValidationPolicy,
}

impl<M: ScoreModel> ScorePredictor<M> {
    /// Create a lenient predictor
    pub fn new(model: M) -> Self {
        Self::with_policy(model, ValidationPolicy::Lenient)
    }

    pub fn with_policy(model: M, policy: ValidationPolicy) -> Self {
        ScorePredictor { model, policy }
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Validate, encode and predict one match state
    pub fn compute_range(&self, state: &MatchState) -> Result<Estimate> {
        let warnings = validate(state);
        if !warnings.is_empty() {
            if self.policy == ValidationPolicy::Strict {
                return Err(ScoreError::Validation(warnings));
            }
            for w in &warnings {
                log::warn!("{}", w);
            }
        }

        let features = encode(state);
        let raw = self.predict(&features)?;
        let range = present_range(raw);

        log::debug!(
            "{} vs {} at {} overs: raw={:.2} range={}",
            state.batting_team(),
            state.bowling_team(),
            state.overs(),
            raw,
            range
        );

        Ok(Estimate {
            range,
            point_estimate: raw,
            warnings,
        })
    }

    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        let dim = self.model.input_dim();
        if dim != FeatureVector::DIM {
            return Err(ScoreError::ModelUnavailable(format!(
                "model expects {} features, encoder produces {}",
                dim,
                FeatureVector::DIM
            )));
        }

        let raw = self.model.predict(features.as_slice()).map_err(|e| match e {
            ScoreError::ModelUnavailable(_) | ScoreError::PredictionFailure(_) => e,
            other => ScoreError::PredictionFailure(other.to_string()),
        })?;

        if !raw.is_finite() {
            return Err(ScoreError::PredictionFailure(format!(
                "model returned non-finite score {}",
                raw
            )));
        }
        if raw.abs() > MAX_SCORE_MAGNITUDE {
            return Err(ScoreError::PredictionFailure(format!(
                "model returned out-of-range score {:e}",
                raw
            )));
        }
        Ok(raw)
    }
}

/// Format an estimate for terminal display
pub fn format_estimate(state: &MatchState, estimate: &Estimate) -> String {
    let mut out = format!(
        r#"
┌─────────────────────────────────────────────────┐
│  {} vs {}
├─────────────────────────────────────────────────┤
│  Overs:    {:.1}
│  Score:    {}/{}  (last 5: {}/{})
│  PREDICTED MATCH SCORE: {}
└─────────────────────────────────────────────────┘
"#,
        state.batting_team(),
        state.bowling_team(),
        state.overs(),
        state.runs(),
        state.wickets(),
        state.runs_last_5(),
        state.wickets_last_5(),
        estimate.range
    );
    for w in &estimate.warnings {
        out.push_str(&format!("  warning: {}\n", w));
    }
    out
}
