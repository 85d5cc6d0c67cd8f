//! Linear regression exported to JSON
//!
//! Format: `{ "intercept": f64, "coefficients": [f64; 21], "feature_names": [..] }`.
//! `feature_names` is optional; when present it must list the training
//! columns in exactly the order `FeatureVector` produces.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::ScoreModel;
use crate::features::FeatureVector;
use crate::{Result, ScoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

impl LinearModel {
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Self {
        LinearModel {
            intercept,
            coefficients,
            feature_names: None,
        }
    }

    /// Load and check a model file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ScoreError::ModelUnavailable(format!("failed to read {}: {}", path.display(), e))
        })?;
        let model = Self::from_json_str(&text)?;
        log::info!(
            "Loaded linear model from {} ({} coefficients)",
            path.display(),
            model.coefficients.len()
        );
        Ok(model)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let model: LinearModel = serde_json::from_str(text)
            .map_err(|e| ScoreError::ModelUnavailable(format!("malformed model JSON: {}", e)))?;
        model.check()?;
        Ok(model)
    }

    fn check(&self) -> Result<()> {
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ScoreError::ModelUnavailable(
                "model contains non-finite parameters".to_string(),
            ));
        }

        if let Some(names) = &self.feature_names {
            if names.len() != self.coefficients.len() {
                return Err(ScoreError::ModelUnavailable(format!(
                    "{} feature names for {} coefficients",
                    names.len(),
                    self.coefficients.len()
                )));
            }
            let expected = FeatureVector::feature_names();
            if let Some(i) = (0..names.len().min(expected.len())).find(|&i| names[i] != expected[i])
            {
                return Err(ScoreError::ModelUnavailable(format!(
                    "feature order mismatch at position {}: model has '{}', expected '{}'",
                    i, names[i], expected[i]
                )));
            }
        }

        Ok(())
    }
}

impl ScoreModel for LinearModel {
    fn input_dim(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.coefficients.len() {
            return Err(ScoreError::ModelUnavailable(format!(
                "feature length mismatch: got {}, expected {}",
                features.len(),
                self.coefficients.len()
            )));
        }

        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(c, x)| c * x)
            .sum();
        Ok(self.intercept + dot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coefficients() -> Vec<f64> {
        let mut c = vec![0.0; FeatureVector::DIM];
        c[4] = 3.0; // batting Mumbai Indians
        c[16] = 1.0; // runs
        c[17] = -2.0; // wickets
        c
    }

    #[test]
    fn test_predict_dot_product() {
        let model = LinearModel::new(10.0, coefficients());
        let mut x = vec![0.0; FeatureVector::DIM];
        x[4] = 1.0;
        x[16] = 85.0;
        x[17] = 2.0;
        let y = model.predict(&x).unwrap();
        assert!((y - (10.0 + 3.0 + 85.0 - 4.0)).abs() < 1e-9);
    }

    #[test]
    fn test_predict_wrong_length() {
        let model = LinearModel::new(0.0, coefficients());
        let err = model.predict(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, ScoreError::ModelUnavailable(_)));
    }

    #[test]
    fn test_from_json_with_names() {
        let json = serde_json::json!({
            "intercept": 1.5,
            "coefficients": coefficients(),
            "feature_names": FeatureVector::feature_names(),
        });
        let model = LinearModel::from_json_str(&json.to_string()).unwrap();
        assert_eq!(model.input_dim(), FeatureVector::DIM);
        assert_eq!(model.intercept, 1.5);
    }

    #[test]
    fn test_from_json_rejects_reordered_names() {
        let mut names = FeatureVector::feature_names();
        names.swap(16, 18);
        let json = serde_json::json!({
            "intercept": 0.0,
            "coefficients": coefficients(),
            "feature_names": names,
        });
        let err = LinearModel::from_json_str(&json.to_string()).unwrap_err();
        assert!(err.to_string().contains("position 16"));
    }

    #[test]
    fn test_from_json_rejects_name_count() {
        let json = serde_json::json!({
            "intercept": 0.0,
            "coefficients": [1.0, 2.0],
            "feature_names": ["runs"],
        });
        assert!(LinearModel::from_json_str(&json.to_string()).is_err());
    }

    #[test]
    fn test_from_json_malformed() {
        let err = LinearModel::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ScoreError::ModelUnavailable(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let model = LinearModel::new(2.0, coefficients());
        std::fs::write(&path, serde_json::to_string(&model).unwrap()).unwrap();

        let loaded = LinearModel::load(&path).unwrap();
        assert_eq!(loaded, model);

        let missing = LinearModel::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(missing, ScoreError::ModelUnavailable(_)));
    }
}
