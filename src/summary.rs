use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::constants::CONFIDENCE_Z_95;
use crate::error::{PoolError, Result};
use crate::team::{PreparedTeam, TeamSnapshot};

/// Closed-form spread of a team's final total under the normal model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSpread {
    pub team_name: String,
    pub expected_total: f64,
    pub std_dev: f64,

    /// Standard deviation as a percentage of the expected total
    pub coefficient_of_variation: Option<f64>,
    pub p25: f64,
    pub p75: f64,
}

impl TeamSpread {
    pub fn from_prepared(team: &PreparedTeam) -> Result<Self> {
        let normal = Normal::new(0.0, 1.0).map_err(|e| PoolError::InvalidValue(e.to_string()))?;
        let z = normal.inverse_cdf(0.75);

        let std_dev = team.total_variance().sqrt();
        let coefficient_of_variation = if team.expected_total != 0.0 {
            Some(std_dev / team.expected_total * 100.0)
        } else {
            None
        };

        Ok(TeamSpread {
            team_name: team.name.clone(),
            expected_total: team.expected_total,
            std_dev,
            coefficient_of_variation,
            p25: team.expected_total - z * std_dev,
            p75: team.expected_total + z * std_dev,
        })
    }
}

/// Spread summary for every team, in input order.
pub fn summarize_teams(teams: &[TeamSnapshot]) -> Result<Vec<TeamSpread>> {
    teams
        .iter()
        .map(|t| TeamSpread::from_prepared(&t.prepare()?))
        .collect()
}

/// Half-width of the 95% confidence interval for a finish probability.
///
/// Both `percent` and the result are percentages.
pub fn probability_margin(percent: f64, trials: u64) -> f64 {
    if trials == 0 {
        return 100.0;
    }
    let p = (percent / 100.0).clamp(0.0, 1.0);
    CONFIDENCE_Z_95 * (p * (1.0 - p) / trials as f64).sqrt() * 100.0
}
