//! One-hot encoding for teams
//!
//! Batting and bowling sides share the same layout: position `i` is set for
//! `Team::ALL[i]`.

use crate::Team;

/// Fixed-width one-hot block for a single team
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamEncoding([f64; Team::COUNT]);

impl TeamEncoding {
    /// Width of one team block
    pub const DIM: usize = Team::COUNT;

    pub fn encode(team: Team) -> Self {
        let mut v = [0.0; Team::COUNT];
        v[team.index()] = 1.0;
        TeamEncoding(v)
    }

    /// Recover the team from a one-hot block.
    ///
    /// Returns `None` unless exactly one entry is 1 and all others are 0.
    pub fn decode(v: &[f64]) -> Option<Team> {
        if v.len() != Self::DIM {
            return None;
        }
        let mut hot = None;
        for (i, &x) in v.iter().enumerate() {
            if x == 1.0 {
                if hot.is_some() {
                    return None;
                }
                hot = Some(i);
            } else if x != 0.0 {
                return None;
            }
        }
        hot.and_then(Team::from_index)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl From<Team> for TeamEncoding {
    fn from(team: Team) -> Self {
        TeamEncoding::encode(team)
    }
}
