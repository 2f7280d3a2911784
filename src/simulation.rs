use chrono::Utc;
use rand::rngs::OsRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{CancelToken, SimulationConfig};
use crate::constants::CANCEL_CHECK_INTERVAL;
use crate::error::{PoolError, Result, StopReason};
use crate::report::{build_outcomes, SimulationReport};
use crate::sampler::sample_team_total;
use crate::tally::FinishTally;
use crate::team::{PreparedTeam, TeamSnapshot};

/// Estimate every team's finish-position distribution by Monte Carlo.
///
/// Seeds from `config.seed` when set, otherwise from OS entropy.
///
/// # Arguments
/// * `teams` - Snapshots of every team in the pool (at least 2)
/// * `config` - Trial count, seed, sharding and stop conditions
///
/// # Returns
/// A report with one outcome per team, sorted by win probability
pub fn simulate_league(
    teams: &[TeamSnapshot],
    config: &SimulationConfig,
) -> Result<SimulationReport> {
    let mut rng = match config.seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_rng(OsRng)?,
    };
    simulate_league_with_rng(teams, config, &mut rng)
}

/// Same as [`simulate_league`] but draws shard seeds from the given source.
///
/// `config.seed` is ignored. The result is reproducible for a fixed source
/// state and shard count, regardless of thread count or scheduling.
pub fn simulate_league_with_rng<R: RngCore>(
    teams: &[TeamSnapshot],
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<SimulationReport> {
    config.validate()?;
    let prepared = prepare_teams(teams)?;

    let shard_count = config.effective_shards();
    let mut shards = Vec::with_capacity(shard_count);
    for (index, trials) in shard_sizes(config.simulations, shard_count).into_iter().enumerate() {
        shards.push((index, trials, ChaCha8Rng::from_rng(&mut *rng)?));
    }

    let stop = StopCheck {
        deadline: config.time_limit().map(|limit| Instant::now() + limit),
        cancel: config.cancel.as_ref(),
    };

    info!(
        teams = prepared.len(),
        simulations = config.simulations,
        shards = shard_count,
        "starting league simulation"
    );
    let started = Instant::now();

    let partials: Vec<(FinishTally, Option<StopReason>)> = shards
        .into_par_iter()
        .map(|(index, trials, mut shard_rng)| {
            let partial = run_shard(&prepared, trials, &mut shard_rng, &stop);
            debug!(shard = index, trials = partial.0.trials(), "shard finished");
            partial
        })
        .collect();

    let mut stopped = None;
    let mut tally = FinishTally::new(prepared.len());
    for (partial, reason) in partials {
        tally = tally.merge(partial);
        stopped = stopped.or(reason);
    }

    if let Some(reason) = stopped {
        warn!(
            %reason,
            completed = tally.trials(),
            requested = config.simulations,
            "league simulation stopped early"
        );
        return Err(PoolError::Incomplete {
            reason,
            completed: tally.trials(),
            requested: config.simulations,
        });
    }

    debug_assert!(tally.is_consistent());
    info!(
        simulations = tally.trials(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "league simulation finished"
    );

    Ok(SimulationReport {
        generated_at: Utc::now(),
        simulations: tally.trials(),
        teams: build_outcomes(&prepared, &tally),
    })
}

/// Validate the pool and reduce every snapshot to sampling form.
pub fn prepare_teams(teams: &[TeamSnapshot]) -> Result<Vec<PreparedTeam>> {
    if teams.len() < 2 {
        return Err(PoolError::TooFewTeams(teams.len()));
    }

    let mut seen = HashSet::new();
    for team in teams {
        if !seen.insert(team.team_name.as_str()) {
            return Err(PoolError::DuplicateTeam(team.team_name.clone()));
        }
    }

    teams.iter().map(TeamSnapshot::prepare).collect()
}

/// Rank team indices by total, highest first. Equal totals keep input order.
pub fn rank_totals(totals: &[f64]) -> Vec<usize> {
    let mut order = Vec::with_capacity(totals.len());
    rank_into(totals, &mut order);
    order
}

fn rank_into(totals: &[f64], order: &mut Vec<usize>) {
    order.clear();
    order.extend(0..totals.len());
    order.sort_by(|&a, &b| totals[b].total_cmp(&totals[a]));
}

/// Split `total` trials as evenly as possible over `shards` shards.
fn shard_sizes(total: u64, shards: usize) -> Vec<u64> {
    let shards = shards as u64;
    let base = total / shards;
    let extra = total % shards;
    (0..shards).map(|i| base + u64::from(i < extra)).collect()
}

struct StopCheck<'a> {
    deadline: Option<Instant>,
    cancel: Option<&'a CancelToken>,
}

impl StopCheck<'_> {
    fn reason(&self) -> Option<StopReason> {
        if self.cancel.is_some_and(CancelToken::is_cancelled) {
            return Some(StopReason::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(StopReason::DeadlineExceeded),
            _ => None,
        }
    }
}

/// Run one shard's trials into its own tally.
fn run_shard(
    teams: &[PreparedTeam],
    trials: u64,
    rng: &mut ChaCha8Rng,
    stop: &StopCheck<'_>,
) -> (FinishTally, Option<StopReason>) {
    let mut tally = FinishTally::new(teams.len());
    let mut totals = vec![0.0; teams.len()];
    let mut order: Vec<usize> = Vec::with_capacity(teams.len());

    for trial in 0..trials {
        if trial % CANCEL_CHECK_INTERVAL == 0 {
            if let Some(reason) = stop.reason() {
                return (tally, Some(reason));
            }
        }

        for (total, team) in totals.iter_mut().zip(teams) {
            *total = sample_team_total(team, rng);
        }

        rank_into(&totals, &mut order);
        tally.record(&order);
    }

    (tally, None)
}
