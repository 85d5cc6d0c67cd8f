//! Match state and its model-ready feature vector
//!
//! Layout (21 values, must match the training column order):
//! `[batting one-hot(8), bowling one-hot(8), runs, wickets, overs, runs_last_5, wickets_last_5]`

use serde::Serialize;

use super::encoding::TeamEncoding;
use crate::Team;

/// Snapshot of an innings in progress, as entered by the user.
///
/// Counters are clamped on construction so recent-form values can never
/// exceed their running totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchState {
    batting_team: Team,
    bowling_team: Team,
    overs: f64,
    runs: u32,
    wickets: u32,
    runs_last_5: u32,
    wickets_last_5: u32,
}

impl MatchState {
    pub const MIN_OVERS: f64 = 5.1;
    pub const MAX_OVERS: f64 = 19.5;
    pub const MAX_RUNS: u32 = 354;
    pub const MAX_WICKETS: u32 = 9;

    pub fn new(
        batting_team: Team,
        bowling_team: Team,
        overs: f64,
        runs: u32,
        wickets: u32,
        runs_last_5: u32,
        wickets_last_5: u32,
    ) -> Self {
        let runs = clamp_logged("runs", runs, Self::MAX_RUNS);
        let wickets = clamp_logged("wickets", wickets, Self::MAX_WICKETS);
        let runs_last_5 = clamp_logged("runs_last_5", runs_last_5, runs);
        let wickets_last_5 = clamp_logged("wickets_last_5", wickets_last_5, wickets);

        MatchState {
            batting_team,
            bowling_team,
            overs,
            runs,
            wickets,
            runs_last_5,
            wickets_last_5,
        }
    }

    pub fn batting_team(&self) -> Team {
        self.batting_team
    }

    pub fn bowling_team(&self) -> Team {
        self.bowling_team
    }

    pub fn overs(&self) -> f64 {
        self.overs
    }

    pub fn runs(&self) -> u32 {
        self.runs
    }

    pub fn wickets(&self) -> u32 {
        self.wickets
    }

    pub fn runs_last_5(&self) -> u32 {
        self.runs_last_5
    }

    pub fn wickets_last_5(&self) -> u32 {
        self.wickets_last_5
    }

    /// Fractional part of overs; 0.0..=0.5 encodes balls 0-5 of the over
    pub fn over_fraction(&self) -> f64 {
        self.overs - self.overs.floor()
    }
}

fn clamp_logged(field: &str, value: u32, max: u32) -> u32 {
    if value > max {
        log::debug!("{} clamped from {} to {}", field, value, max);
        max
    } else {
        value
    }
}

/// Two team blocks plus five match counters
const FEATURE_DIM: usize = 2 * TeamEncoding::DIM + 5;

/// Model input vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_DIM]);

impl FeatureVector {
    pub const DIM: usize = FEATURE_DIM;

    /// Training column names, in vector order
    pub fn feature_names() -> Vec<String> {
        let mut names = Vec::with_capacity(Self::DIM);
        names.extend(Team::ALL.iter().map(|t| format!("bat_team_{}", t.name())));
        names.extend(Team::ALL.iter().map(|t| format!("bowl_team_{}", t.name())));
        names.extend(
            ["runs", "wickets", "overs", "runs_last_5", "wickets_last_5"]
                .iter()
                .map(|s| s.to_string()),
        );
        names
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.0.to_vec()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Encode a match state. Total: same-team states are encoded as entered.
pub fn encode(state: &MatchState) -> FeatureVector {
    let mut v = [0.0; FEATURE_DIM];
    let bat = TeamEncoding::encode(state.batting_team);
    let bowl = TeamEncoding::encode(state.bowling_team);

    v[..TeamEncoding::DIM].copy_from_slice(bat.as_slice());
    v[TeamEncoding::DIM..2 * TeamEncoding::DIM].copy_from_slice(bowl.as_slice());

    let base = 2 * TeamEncoding::DIM;
    v[base] = state.runs as f64;
    v[base + 1] = state.wickets as f64;
    v[base + 2] = state.overs;
    v[base + 3] = state.runs_last_5 as f64;
    v[base + 4] = state.wickets_last_5 as f64;

    FeatureVector(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mi_vs_csk() -> MatchState {
        MatchState::new(
            Team::MumbaiIndians,
            Team::ChennaiSuperKings,
            10.3,
            85,
            2,
            40,
            1,
        )
    }

    #[test]
    fn test_encode_scenario() {
        let v = encode(&mi_vs_csk());
        let expected = [
            0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, // batting
            1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, // bowling
            85.0, 2.0, 10.3, 40.0, 1.0,
        ];
        assert_eq!(v.as_slice(), &expected);
    }

    #[test]
    fn test_encode_length_for_all_pairs() {
        for bat in Team::ALL {
            for bowl in Team::ALL {
                let state = MatchState::new(bat, bowl, 6.2, 50, 1, 30, 0);
                let v = encode(&state);
                assert_eq!(v.len(), FeatureVector::DIM);
                assert_eq!(v.len(), 21);
                assert_eq!(TeamEncoding::decode(&v.as_slice()[..8]), Some(bat));
                assert_eq!(TeamEncoding::decode(&v.as_slice()[8..16]), Some(bowl));
            }
        }
    }

    #[test]
    fn test_encode_same_team_is_total() {
        let state = MatchState::new(Team::RajasthanRoyals, Team::RajasthanRoyals, 8.0, 60, 3, 20, 1);
        let v = encode(&state);
        assert_eq!(v.as_slice()[5], 1.0);
        assert_eq!(v.as_slice()[8 + 5], 1.0);
    }

    #[test]
    fn test_recent_form_clamped_to_totals() {
        let state = MatchState::new(Team::MumbaiIndians, Team::ChennaiSuperKings, 10.0, 30, 1, 90, 4);
        assert_eq!(state.runs_last_5(), 30);
        assert_eq!(state.wickets_last_5(), 1);
    }

    #[test]
    fn test_totals_clamped_to_bounds() {
        let state = MatchState::new(Team::MumbaiIndians, Team::ChennaiSuperKings, 19.5, 500, 12, 400, 11);
        assert_eq!(state.runs(), MatchState::MAX_RUNS);
        assert_eq!(state.wickets(), MatchState::MAX_WICKETS);
        assert_eq!(state.runs_last_5(), MatchState::MAX_RUNS);
        assert_eq!(state.wickets_last_5(), MatchState::MAX_WICKETS);
    }

    #[test]
    fn test_over_fraction() {
        let mut state = mi_vs_csk();
        assert!((state.over_fraction() - 0.3).abs() < 1e-9);
        state.overs = 12.5;
        assert_eq!(state.over_fraction(), 0.5);
        state.overs = 12.7;
        assert!((state.over_fraction() - 0.7).abs() < 1e-9);
        state.overs = 19.0;
        assert_eq!(state.over_fraction(), 0.0);
    }

    #[test]
    fn test_feature_names() {
        let names = FeatureVector::feature_names();
        assert_eq!(names.len(), FeatureVector::DIM);
        assert_eq!(names[0], "bat_team_Chennai Super Kings");
        assert_eq!(names[8], "bowl_team_Chennai Super Kings");
        assert_eq!(names[16], "runs");
        assert_eq!(names[18], "overs");
        assert_eq!(names[20], "wickets_last_5");
    }
}
