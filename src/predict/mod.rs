//! Prediction and inference
//!
//! Turn a match state into a projected score range.

pub mod inference;
pub mod session;

pub use inference::{format_estimate, present_range, Estimate, PredictedRange, ScorePredictor};
pub use session::{run_session, SessionSummary};
