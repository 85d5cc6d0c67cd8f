//! IPL score prediction
//!
//! Encodes a live T20 match state into the feature layout a pre-trained
//! regression model expects and turns its point estimate into a score range.

pub mod data;
pub mod features;
pub mod model;
pub mod predict;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::data::source::ModelSource;
use crate::features::validation::ValidationWarning;

/// One of the eight franchises the model was trained on.
///
/// Declaration order is the one-hot position and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    ChennaiSuperKings,
    DelhiDaredevils,
    KingsXiPunjab,
    KolkataKnightRiders,
    MumbaiIndians,
    RajasthanRoyals,
    RoyalChallengersBangalore,
    SunrisersHyderabad,
}

impl Team {
    pub const COUNT: usize = 8;

    pub const ALL: [Team; Team::COUNT] = [
        Team::ChennaiSuperKings,
        Team::DelhiDaredevils,
        Team::KingsXiPunjab,
        Team::KolkataKnightRiders,
        Team::MumbaiIndians,
        Team::RajasthanRoyals,
        Team::RoyalChallengersBangalore,
        Team::SunrisersHyderabad,
    ];

    /// Position of this team in the one-hot block
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Team::ChennaiSuperKings => "Chennai Super Kings",
            Team::DelhiDaredevils => "Delhi Daredevils",
            Team::KingsXiPunjab => "Kings XI Punjab",
            Team::KolkataKnightRiders => "Kolkata Knight Riders",
            Team::MumbaiIndians => "Mumbai Indians",
            Team::RajasthanRoyals => "Rajasthan Royals",
            Team::RoyalChallengersBangalore => "Royal Challengers Bangalore",
            Team::SunrisersHyderabad => "Sunrisers Hyderabad",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Team::ChennaiSuperKings => "CSK",
            Team::DelhiDaredevils => "DD",
            Team::KingsXiPunjab => "KXIP",
            Team::KolkataKnightRiders => "KKR",
            Team::MumbaiIndians => "MI",
            Team::RajasthanRoyals => "RR",
            Team::RoyalChallengersBangalore => "RCB",
            Team::SunrisersHyderabad => "SRH",
        }
    }

    /// Look up a team by full name or short code, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        let needle = name.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name().to_lowercase() == needle || t.code().to_lowercase() == needle)
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Team {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self> {
        Team::from_name(s).ok_or_else(|| ScoreError::UnknownTeam(s.to_string()))
    }
}

/// What to do when a match state raises validation warnings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    /// Report warnings and predict anyway
    #[default]
    Lenient,
    /// Refuse to predict
    Strict,
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("Invalid match state: {}", join_warnings(.0))]
    Validation(Vec<ValidationWarning>),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Prediction failed: {0}")]
    PredictionFailure(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unknown team: {0}")]
    UnknownTeam(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

fn join_warnings(warnings: &[ValidationWarning]) -> String {
    warnings
        .iter()
        .map(|w| w.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, ScoreError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub model: ModelConfig,
    pub fetch: FetchConfig,
    pub validation: ValidationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Local path of the exported model
    pub path: String,
    pub source: ModelSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    pub policy: ValidationPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            model: ModelConfig {
                path: "model/ml_model.json".to_string(),
                source: ModelSource::Local,
            },
            fetch: FetchConfig {
                timeout_secs: 30,
                max_attempts: 3,
                user_agent: "ipl-score-predictor/0.1".to_string(),
            },
            validation: ValidationConfig {
                policy: ValidationPolicy::Lenient,
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScoreError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ScoreError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ScoreError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_order_is_fixed() {
        for (i, team) in Team::ALL.iter().enumerate() {
            assert_eq!(team.index(), i);
            assert_eq!(Team::from_index(i), Some(*team));
        }
        assert_eq!(Team::from_index(8), None);
        assert_eq!(Team::ChennaiSuperKings.index(), 0);
        assert_eq!(Team::MumbaiIndians.index(), 4);
        assert_eq!(Team::SunrisersHyderabad.index(), 7);
    }

    #[test]
    fn test_team_from_name() {
        assert_eq!(Team::from_name("Mumbai Indians"), Some(Team::MumbaiIndians));
        assert_eq!(Team::from_name("  mumbai indians "), Some(Team::MumbaiIndians));
        assert_eq!(Team::from_name("csk"), Some(Team::ChennaiSuperKings));
        assert_eq!(Team::from_name("Gujarat Titans"), None);

        let err = "Gujarat Titans".parse::<Team>().unwrap_err();
        assert!(matches!(err, ScoreError::UnknownTeam(_)));
    }

    #[test]
    fn test_config_default_roundtrip() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed = Config::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_config_parse() {
        let text = r#"
[model]
path = "model/custom.json"

[model.source]
kind = "drive_api"
file_id = "abc123"

[fetch]
timeout_secs = 10
max_attempts = 5
user_agent = "test"

[validation]
policy = "strict"
"#;
        let config = Config::from_toml_str(text).unwrap();
        assert_eq!(config.model.path, "model/custom.json");
        assert_eq!(
            config.model.source,
            ModelSource::DriveApi {
                file_id: "abc123".to_string()
            }
        );
        assert_eq!(config.fetch.max_attempts, 5);
        assert_eq!(config.validation.policy, ValidationPolicy::Strict);
    }

    #[test]
    fn test_config_parse_error() {
        let err = Config::from_toml_str("[model]\npath = 3").unwrap_err();
        assert!(matches!(err, ScoreError::Config(_)));
    }
}
