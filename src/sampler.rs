use rand::Rng;
use std::f64::consts::PI;

use crate::error::Result;
use crate::team::{PreparedTeam, TeamSnapshot};

/// Draw one standard normal deviate with the Box-Muller transform.
///
/// `u1` is taken from (0, 1] so the logarithm stays finite.
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1 = 1.0 - rng.gen::<f64>();
    let u2 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Draw from Normal(mean, std_dev). A zero standard deviation returns `mean`.
pub fn sample_normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    if std_dev == 0.0 {
        return mean;
    }
    standard_normal(rng) * std_dev + mean
}

/// Sample one realization of a team's total points across all rounds.
///
/// Completed rounds contribute their actual scores; every pending slot
/// contributes one normal draw.
pub fn sample_team_total<R: Rng + ?Sized>(team: &PreparedTeam, rng: &mut R) -> f64 {
    team.slots
        .iter()
        .fold(team.completed_total, |total, slot| {
            total + sample_normal(rng, slot.mean, slot.std_dev)
        })
}

/// Validate a snapshot and sample one total from it.
///
/// # Arguments
/// * `snapshot` - The team's rounds
/// * `rng` - Random source
///
/// # Returns
/// The sampled total, or the validation error for malformed input
pub fn sample_snapshot_total<R: Rng + ?Sized>(snapshot: &TeamSnapshot, rng: &mut R) -> Result<f64> {
    let team = snapshot.prepare()?;
    Ok(sample_team_total(&team, rng))
}
