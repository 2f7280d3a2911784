use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::constants::{round1, TOP_FINISH_RANKS};
use crate::error::Result;
use crate::tally::FinishTally;
use crate::team::PreparedTeam;

/// Finish-position probabilities for one team, as percentages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamOutcome {
    pub team_name: String,
    pub expected_total: f64,
    pub finish_probabilities: Vec<f64>,
    pub win_probability: f64,
    pub top3_probability: f64,
    pub last_place_probability: f64,
}

/// Result of one simulation run, ready for serialization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub generated_at: DateTime<Utc>,
    pub simulations: u64,
    pub teams: Vec<TeamOutcome>,
}

impl SimulationReport {
    pub fn team(&self, name: &str) -> Option<&TeamOutcome> {
        self.teams.iter().find(|t| t.team_name == name)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn percent(count: u64, trials: u64) -> f64 {
    round1(count as f64 / trials as f64 * 100.0)
}

/// Convert a finished tally into outcomes sorted by win probability.
///
/// Ordering compares raw counts, then unrounded expected totals, then input
/// order, so rounding never decides a tie.
pub(crate) fn build_outcomes(teams: &[PreparedTeam], tally: &FinishTally) -> Vec<TeamOutcome> {
    let trials = tally.trials();
    let last = teams.len() - 1;

    let mut order: Vec<usize> = (0..teams.len()).collect();
    order.sort_by(|&a, &b| {
        tally.counts(b)[0]
            .cmp(&tally.counts(a)[0])
            .then_with(|| {
                teams[b]
                    .expected_total
                    .partial_cmp(&teams[a].expected_total)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.cmp(&b))
    });

    order
        .into_iter()
        .map(|idx| {
            let counts = tally.counts(idx);
            TeamOutcome {
                team_name: teams[idx].name.clone(),
                expected_total: round1(teams[idx].expected_total),
                finish_probabilities: counts.iter().map(|&c| percent(c, trials)).collect(),
                win_probability: percent(counts[0], trials),
                top3_probability: percent(tally.count_within(idx, TOP_FINISH_RANKS), trials),
                last_place_probability: percent(counts[last], trials),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::TeamSnapshot;

    fn teams(totals: &[f64]) -> Vec<PreparedTeam> {
        totals
            .iter()
            .enumerate()
            .map(|(i, &t)| {
                TeamSnapshot::new(format!("T{}", i))
                    .with_completed_round("wildcard", &[t])
                    .prepare()
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_percentages_and_top3() {
        let teams = teams(&[10.0, 20.0, 30.0, 40.0]);
        let mut tally = FinishTally::new(4);
        tally.record(&[0, 1, 2, 3]);
        tally.record(&[1, 0, 2, 3]);
        tally.record(&[3, 2, 1, 0]);

        let outcomes = build_outcomes(&teams, &tally);
        let t0 = outcomes.iter().find(|o| o.team_name == "T0").unwrap();
        assert!((t0.win_probability - 33.3).abs() < 1e-9);
        assert!((t0.top3_probability - 66.7).abs() < 1e-9);
        assert!((t0.last_place_probability - 33.3).abs() < 1e-9);
        assert_eq!(t0.finish_probabilities.len(), 4);

        let t3 = outcomes.iter().find(|o| o.team_name == "T3").unwrap();
        assert!((t3.top3_probability - 33.3).abs() < 1e-9);
    }

    #[test]
    fn test_top3_sums_raw_counts() {
        // Three ranks at 1/3 each: rounded percentages would sum to 99.9
        let teams = teams(&[1.0, 2.0, 3.0]);
        let mut tally = FinishTally::new(3);
        tally.record(&[0, 1, 2]);
        tally.record(&[1, 0, 2]);
        tally.record(&[2, 1, 0]);
        let outcomes = build_outcomes(&teams, &tally);
        for outcome in &outcomes {
            assert!((outcome.top3_probability - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_top3_clamped_with_two_teams() {
        let teams = teams(&[1.0, 2.0]);
        let mut tally = FinishTally::new(2);
        tally.record(&[1, 0]);
        tally.record(&[0, 1]);
        tally.record(&[1, 0]);

        let outcomes = build_outcomes(&teams, &tally);
        for outcome in &outcomes {
            assert_eq!(outcome.top3_probability, 100.0);
            assert_eq!(outcome.finish_probabilities.len(), 2);
        }
        assert_eq!(outcomes[0].team_name, "T1");
        assert_eq!(outcomes[0].win_probability, 66.7);
    }

    #[test]
    fn test_sort_ties_by_expected_then_input_order() {
        let teams = teams(&[5.0, 9.0, 9.0]);
        let mut tally = FinishTally::new(3);
        tally.record(&[0, 1, 2]);
        tally.record(&[1, 0, 2]);

        let outcomes = build_outcomes(&teams, &tally);
        let names: Vec<&str> = outcomes.iter().map(|o| o.team_name.as_str()).collect();
        // T0 and T1 tie on wins, T1 has the higher expected total
        assert_eq!(names, vec!["T1", "T0", "T2"]);

        let mut tally = FinishTally::new(3);
        tally.record(&[0, 1, 2]);
        let outcomes = build_outcomes(&teams, &tally);
        let names: Vec<&str> = outcomes.iter().map(|o| o.team_name.as_str()).collect();
        // T1 and T2 tie on wins and expected total, input order decides
        assert_eq!(names, vec!["T0", "T1", "T2"]);
    }

    #[test]
    fn test_report_json_shape() {
        let teams = teams(&[1.0, 2.0]);
        let mut tally = FinishTally::new(2);
        tally.record(&[1, 0]);
        let report = SimulationReport {
            generated_at: Utc::now(),
            simulations: 1,
            teams: build_outcomes(&teams, &tally),
        };
        let json = report.to_json().unwrap();
        assert!(json.contains("\"generatedAt\""));
        assert!(json.contains("\"winProbability\""));
        assert!(json.contains("\"top3Probability\""));
        assert!(json.contains("\"finishProbabilities\""));

        let parsed: SimulationReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.team("T1").unwrap().win_probability, 100.0);
        assert!(parsed.team("missing").is_none());
    }
}
