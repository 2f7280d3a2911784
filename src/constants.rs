/// Default number of Monte Carlo trials per simulation run
pub const DEFAULT_SIMULATIONS: u64 = 10_000;

/// Round identifiers for the playoff bracket, earliest first
pub const PLAYOFF_ROUNDS: [&str; 4] = ["wildcard", "divisional", "championship", "superbowl"];

/// Shards per run when none are configured
pub const DEFAULT_SHARDS: usize = 8;

/// Number of leading ranks counted as a top finish
pub const TOP_FINISH_RANKS: usize = 3;

/// Trials run between cancellation/deadline checks
pub const CANCEL_CHECK_INTERVAL: u64 = 256;

/// z-score of the 95% two-sided confidence interval
pub const CONFIDENCE_Z_95: f64 = 1.96;

/// Round a value to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round a value to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
