//! Score models
//!
//! The regression model is trained elsewhere; here it is a capability that
//! maps a feature vector to a projected final score.

pub mod linear;

pub use linear::LinearModel;

use crate::Result;

/// Opaque pre-trained scalar regressor
pub trait ScoreModel: Send + Sync {
    /// Number of features the model was trained on
    fn input_dim(&self) -> usize;

    /// Projected final score for one feature vector.
    ///
    /// Shape mismatches are reported as `ScoreError::ModelUnavailable`.
    fn predict(&self, features: &[f64]) -> Result<f64>;
}

impl<M: ScoreModel + ?Sized> ScoreModel for Box<M> {
    fn input_dim(&self) -> usize {
        (**self).input_dim()
    }

    fn predict(&self, features: &[f64]) -> Result<f64> {
        (**self).predict(features)
    }
}

impl<M: ScoreModel + ?Sized> ScoreModel for std::sync::Arc<M> {
    fn input_dim(&self) -> usize {
        (**self).input_dim()
    }

    fn predict(&self, features: &[f64]) -> Result<f64> {
        (**self).predict(features)
    }
}
