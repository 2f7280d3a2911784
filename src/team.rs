use serde::{Deserialize, Serialize};

use crate::error::{PoolError, Result};

/// One round of a fantasy team's playoff run.
///
/// A round with `actual_scores` is completed and any projections it carries
/// are ignored. Otherwise it is pending and must supply both
/// `expected_points` and `variance`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundSnapshot {
    pub round: String,

    /// Per-slot actual points; `None` entries count as 0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_scores: Option<Vec<Option<f64>>>,

    /// Per-slot mean of the projected point distribution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_points: Option<Vec<f64>>,

    /// Per-slot variance of the projected point distribution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variance: Option<Vec<f64>>,
}

impl RoundSnapshot {
    pub fn completed(round: impl Into<String>, actual_scores: Vec<Option<f64>>) -> Self {
        RoundSnapshot {
            round: round.into(),
            actual_scores: Some(actual_scores),
            ..Default::default()
        }
    }

    pub fn pending(
        round: impl Into<String>,
        expected_points: Vec<f64>,
        variance: Vec<f64>,
    ) -> Self {
        RoundSnapshot {
            round: round.into(),
            actual_scores: None,
            expected_points: Some(expected_points),
            variance: Some(variance),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.actual_scores.is_some()
    }
}

/// A fantasy team's scores and projections across every playoff round.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSnapshot {
    pub team_name: String,
    pub rounds: Vec<RoundSnapshot>,
}

impl TeamSnapshot {
    pub fn new(team_name: impl Into<String>) -> Self {
        TeamSnapshot {
            team_name: team_name.into(),
            rounds: Vec::new(),
        }
    }

    /// Append a completed round with fully known scores.
    pub fn with_completed_round(mut self, round: impl Into<String>, scores: &[f64]) -> Self {
        self.rounds.push(RoundSnapshot::completed(
            round,
            scores.iter().copied().map(Some).collect(),
        ));
        self
    }

    /// Append a pending round.
    pub fn with_pending_round(
        mut self,
        round: impl Into<String>,
        expected_points: &[f64],
        variance: &[f64],
    ) -> Self {
        self.rounds.push(RoundSnapshot::pending(
            round,
            expected_points.to_vec(),
            variance.to_vec(),
        ));
        self
    }

    /// Check the snapshot's invariants and reduce it to sampling form.
    pub fn prepare(&self) -> Result<PreparedTeam> {
        if self.rounds.is_empty() {
            return Err(PoolError::NoRounds {
                team: self.team_name.clone(),
            });
        }

        let mut roster_size: Option<usize> = None;
        let mut completed_total = 0.0;
        let mut expected_total = 0.0;
        let mut slots = Vec::new();

        for round in &self.rounds {
            let malformed = |message: String| PoolError::MalformedRound {
                team: self.team_name.clone(),
                round: round.round.clone(),
                message,
            };

            let len = if let Some(actual) = &round.actual_scores {
                for score in actual.iter().flatten() {
                    if !score.is_finite() {
                        return Err(malformed(format!("actual score {} is not finite", score)));
                    }
                    completed_total += score;
                    expected_total += score;
                }
                actual.len()
            } else {
                let expected = round
                    .expected_points
                    .as_ref()
                    .ok_or_else(|| malformed("pending round is missing expected points".into()))?;
                let variance = round
                    .variance
                    .as_ref()
                    .ok_or_else(|| malformed("pending round is missing variance".into()))?;

                if expected.len() != variance.len() {
                    return Err(malformed(format!(
                        "{} expected points but {} variances",
                        expected.len(),
                        variance.len()
                    )));
                }

                for (&mean, &var) in expected.iter().zip(variance) {
                    if !mean.is_finite() {
                        return Err(malformed(format!("expected points {} is not finite", mean)));
                    }
                    if !var.is_finite() || var < 0.0 {
                        return Err(malformed(format!(
                            "variance {} must be finite and non-negative",
                            var
                        )));
                    }
                    expected_total += mean;
                    slots.push(SlotProjection {
                        mean,
                        std_dev: var.sqrt(),
                    });
                }
                expected.len()
            };

            match roster_size {
                None => roster_size = Some(len),
                Some(size) if size != len => {
                    return Err(PoolError::RosterMismatch {
                        team: self.team_name.clone(),
                        round: round.round.clone(),
                        expected: size,
                        found: len,
                    });
                }
                Some(_) => {}
            }
        }

        let roster_size = roster_size.unwrap_or(0);
        if roster_size == 0 {
            return Err(PoolError::EmptyRoster {
                team: self.team_name.clone(),
            });
        }

        Ok(PreparedTeam {
            name: self.team_name.clone(),
            roster_size,
            completed_total,
            expected_total,
            slots,
        })
    }
}

/// Normal distribution parameters for one pending roster slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotProjection {
    pub mean: f64,
    pub std_dev: f64,
}

/// A validated team, reduced to what the sampler needs per trial.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedTeam {
    pub name: String,
    pub roster_size: usize,

    /// Sum of actual scores over completed rounds
    pub completed_total: f64,

    /// Completed total plus every pending slot's expected points
    pub expected_total: f64,

    /// Every pending slot across all pending rounds
    pub slots: Vec<SlotProjection>,
}

impl PreparedTeam {
    /// Total variance of the team's remaining points.
    pub fn total_variance(&self) -> f64 {
        self.slots.iter().map(|s| s.std_dev * s.std_dev).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_team() -> TeamSnapshot {
        TeamSnapshot::new("Ryan")
            .with_completed_round("wildcard", &[10.0, 5.0])
            .with_pending_round("divisional", &[5.0, 4.0], &[4.0, 9.0])
    }

    #[test]
    fn test_prepare_totals() {
        let team = sample_team().prepare().unwrap();
        assert_eq!(team.roster_size, 2);
        assert!((team.completed_total - 15.0).abs() < 1e-10);
        assert!((team.expected_total - 24.0).abs() < 1e-10);
        assert_eq!(team.slots.len(), 2);
        assert!((team.slots[1].std_dev - 3.0).abs() < 1e-10);
        assert!((team.total_variance() - 13.0).abs() < 1e-10);
    }

    #[test]
    fn test_null_actual_scores_count_as_zero() {
        let mut team = sample_team();
        team.rounds[0] = RoundSnapshot::completed("wildcard", vec![Some(7.5), None]);
        let prepared = team.prepare().unwrap();
        assert!((prepared.completed_total - 7.5).abs() < 1e-10);
    }

    #[test]
    fn test_completed_round_ignores_projections() {
        let mut team = sample_team();
        team.rounds[0].expected_points = Some(vec![100.0, 100.0]);
        let prepared = team.prepare().unwrap();
        assert!((prepared.expected_total - 24.0).abs() < 1e-10);
    }

    #[test]
    fn test_missing_variance_is_an_error() {
        let mut team = sample_team();
        team.rounds[1].variance = None;
        let err = team.prepare().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Ryan"), "{}", msg);
        assert!(msg.contains("divisional"), "{}", msg);
        assert!(msg.contains("variance"), "{}", msg);
    }

    #[test]
    fn test_missing_expected_points_is_an_error() {
        let mut team = sample_team();
        team.rounds[1].expected_points = None;
        assert!(matches!(
            team.prepare(),
            Err(PoolError::MalformedRound { .. })
        ));
    }

    #[test]
    fn test_roster_mismatch() {
        let team = sample_team().with_pending_round("championship", &[1.0], &[1.0]);
        match team.prepare() {
            Err(PoolError::RosterMismatch {
                round,
                expected,
                found,
                ..
            }) => {
                assert_eq!(round, "championship");
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_negative_variance_rejected() {
        let team = TeamSnapshot::new("A").with_pending_round("wildcard", &[1.0], &[-0.5]);
        assert!(team.prepare().is_err());
    }

    #[test]
    fn test_empty_roster_rejected() {
        let team = TeamSnapshot::new("A").with_pending_round("wildcard", &[], &[]);
        assert!(matches!(team.prepare(), Err(PoolError::EmptyRoster { .. })));
        assert!(matches!(
            TeamSnapshot::new("B").prepare(),
            Err(PoolError::NoRounds { .. })
        ));
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "teamName": "Ryan",
            "rounds": [
                {"round": "wildcard", "actualScores": [12.5, null]},
                {"round": "divisional", "expectedPoints": [8.0, 6.0], "variance": [1.0, 0.0]}
            ]
        }"#;
        let team: TeamSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(team.team_name, "Ryan");
        assert!(team.rounds[0].is_completed());
        assert!(!team.rounds[1].is_completed());
        let prepared = team.prepare().unwrap();
        assert!((prepared.expected_total - 26.5).abs() < 1e-10);
    }
}
