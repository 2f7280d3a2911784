use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::round2;

/// One player's game stats as reported by the stats provider.
///
/// Missing and `null` fields both read as 0.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct StatLine {
    #[serde(deserialize_with = "null_as_zero")]
    pub passing_yards: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub passing_touchdowns: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub interceptions: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub rushing_yards: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub rushing_touchdowns: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub receptions: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub receiving_yards: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub receiving_touchdowns: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub fumbles_lost: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub two_point_conversion_passes: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub two_point_conversion_runs: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub two_point_conversion_receptions: f64,
}

fn null_as_zero<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

impl StatLine {
    pub fn two_point_conversions(&self) -> f64 {
        self.two_point_conversion_passes
            + self.two_point_conversion_runs
            + self.two_point_conversion_receptions
    }
}

/// Points awarded per unit of each stat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoringRules {
    pub passing_yard: f64,
    pub passing_touchdown: f64,
    pub interception: f64,
    pub rushing_yard: f64,
    pub rushing_touchdown: f64,
    pub reception: f64,
    pub receiving_yard: f64,
    pub receiving_touchdown: f64,
    pub fumble_lost: f64,
    pub two_point_conversion: f64,
}

impl Default for ScoringRules {
    /// Full-PPR playoff scoring.
    fn default() -> Self {
        ScoringRules {
            passing_yard: 0.04,
            passing_touchdown: 6.0,
            interception: -2.0,
            rushing_yard: 0.1,
            rushing_touchdown: 6.0,
            reception: 1.0,
            receiving_yard: 0.1,
            receiving_touchdown: 6.0,
            fumble_lost: -2.0,
            two_point_conversion: 2.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatCategory {
    PassingYards,
    PassingTds,
    Interceptions,
    RushingYards,
    RushingTds,
    Receptions,
    ReceivingYards,
    ReceivingTds,
    FumblesLost,
    TwoPointConversions,
}

/// Contribution of one stat category to a player's total.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoringEntry {
    pub category: StatCategory,
    pub count: f64,
    pub per_unit: f64,
    pub points: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointsBreakdown {
    pub points: f64,
    pub entries: Vec<ScoringEntry>,
}

impl PointsBreakdown {
    pub fn entry(&self, category: StatCategory) -> Option<&ScoringEntry> {
        self.entries.iter().find(|e| e.category == category)
    }
}

impl ScoringRules {
    /// Score a stat line. Categories with no positive count are left out.
    pub fn score(&self, stats: &StatLine) -> PointsBreakdown {
        let categories = [
            (StatCategory::PassingYards, stats.passing_yards, self.passing_yard),
            (StatCategory::PassingTds, stats.passing_touchdowns, self.passing_touchdown),
            (StatCategory::Interceptions, stats.interceptions, self.interception),
            (StatCategory::RushingYards, stats.rushing_yards, self.rushing_yard),
            (StatCategory::RushingTds, stats.rushing_touchdowns, self.rushing_touchdown),
            (StatCategory::Receptions, stats.receptions, self.reception),
            (StatCategory::ReceivingYards, stats.receiving_yards, self.receiving_yard),
            (StatCategory::ReceivingTds, stats.receiving_touchdowns, self.receiving_touchdown),
            (StatCategory::FumblesLost, stats.fumbles_lost, self.fumble_lost),
            (
                StatCategory::TwoPointConversions,
                stats.two_point_conversions(),
                self.two_point_conversion,
            ),
        ];

        let mut total = 0.0;
        let mut entries = Vec::new();
        for (category, count, per_unit) in categories {
            if count <= 0.0 {
                continue;
            }
            let points = count * per_unit;
            total += points;
            entries.push(ScoringEntry {
                category,
                count,
                per_unit,
                points: round2(points),
            });
        }

        PointsBreakdown {
            points: round2(total),
            entries,
        }
    }
}

/// Score a stat line with the default rules.
pub fn fantasy_points(stats: &StatLine) -> f64 {
    ScoringRules::default().score(stats).points
}
