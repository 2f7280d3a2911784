//! Pool Core - win-probability engine for a fantasy-football playoff pool.
//!
//! Given every fantasy team's actual scores for completed rounds and
//! per-player expected points and variance for pending rounds, a Monte Carlo
//! simulation estimates the probability of each team finishing in each
//! final-standings position.

pub mod config;
pub mod constants;
pub mod error;
pub mod projection;
pub mod report;
pub mod sampler;
pub mod scoring;
pub mod simulation;
pub mod summary;
pub mod tally;
pub mod team;

pub use config::{CancelToken, SimulationConfig};
pub use constants::{DEFAULT_SIMULATIONS, PLAYOFF_ROUNDS};
pub use error::{PoolError, Result, StopReason};
pub use projection::{build_snapshot, expected_points, PlayerOutlook};
pub use report::{SimulationReport, TeamOutcome};
pub use sampler::{sample_normal, sample_snapshot_total, sample_team_total};
pub use scoring::{fantasy_points, PointsBreakdown, ScoringRules, StatLine};
pub use simulation::{prepare_teams, rank_totals, simulate_league, simulate_league_with_rng};
pub use summary::{probability_margin, summarize_teams, TeamSpread};
pub use tally::FinishTally;
pub use team::{PreparedTeam, RoundSnapshot, TeamSnapshot};
