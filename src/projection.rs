use serde::{Deserialize, Serialize};

use crate::constants::round1;
use crate::error::{PoolError, Result};
use crate::team::{RoundSnapshot, TeamSnapshot};

/// Expected points for a round the player's NFL team has not reached yet.
///
/// # Arguments
/// * `projected` - Points projected if the team plays in the round
/// * `advance_probability` - Probability the team reaches the round (0.0-1.0)
///
/// # Returns
/// `projected * advance_probability`, rounded to one decimal
pub fn expected_points(projected: f64, advance_probability: f64) -> Result<f64> {
    if !projected.is_finite() {
        return Err(PoolError::InvalidValue(format!(
            "projected points {} is not finite",
            projected
        )));
    }
    if !(0.0..=1.0).contains(&advance_probability) {
        return Err(PoolError::InvalidValue(format!(
            "advancement probability {} is outside [0, 1]",
            advance_probability
        )));
    }
    Ok(round1(projected * advance_probability))
}

/// A rostered player's per-round outlook. Each vector has one entry per round.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerOutlook {
    pub player_name: String,
    pub projected_points: Vec<f64>,
    pub advance_probability: Vec<f64>,

    /// Variance from the external variance model
    pub variance: Vec<f64>,
}

/// Assemble a team snapshot from actual scores and player outlooks.
///
/// The first `actual_scores.len()` rounds are completed, with
/// `actual_scores[r][slot]` holding each slot's points. Every later round is
/// pending and takes its expected points and variance from `roster`.
pub fn build_snapshot(
    team_name: &str,
    rounds: &[&str],
    roster: &[PlayerOutlook],
    actual_scores: &[Vec<Option<f64>>],
) -> Result<TeamSnapshot> {
    if actual_scores.len() > rounds.len() {
        return Err(PoolError::InvalidValue(format!(
            "team `{}` has {} completed rounds but only {} rounds exist",
            team_name,
            actual_scores.len(),
            rounds.len()
        )));
    }

    let mut snapshot = TeamSnapshot::new(team_name);
    for (index, &round) in rounds.iter().enumerate() {
        if let Some(scores) = actual_scores.get(index) {
            snapshot
                .rounds
                .push(RoundSnapshot::completed(round, scores.clone()));
            continue;
        }

        let mut expected = Vec::with_capacity(roster.len());
        let mut variance = Vec::with_capacity(roster.len());
        for player in roster {
            let missing = |what: &str| PoolError::MalformedRound {
                team: team_name.to_string(),
                round: round.to_string(),
                message: format!("player `{}` has no {}", player.player_name, what),
            };
            let projected = *player
                .projected_points
                .get(index)
                .ok_or_else(|| missing("projected points"))?;
            let probability = *player
                .advance_probability
                .get(index)
                .ok_or_else(|| missing("advancement probability"))?;
            let var = *player.variance.get(index).ok_or_else(|| missing("variance"))?;

            expected.push(expected_points(projected, probability)?);
            variance.push(var);
        }
        snapshot
            .rounds
            .push(RoundSnapshot::pending(round, expected, variance));
    }

    Ok(snapshot)
}
