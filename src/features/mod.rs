//! Feature extraction and encoding
//!
//! Converts a live match state into the model-ready feature vector.

pub mod encoding;
pub mod match_state;
pub mod validation;

pub use encoding::TeamEncoding;
pub use match_state::{encode, FeatureVector, MatchState};
pub use validation::{validate, ValidationWarning};
