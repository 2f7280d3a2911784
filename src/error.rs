use thiserror::Error;

/// Why a simulation run stopped before completing its trials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Cancelled,
    DeadlineExceeded,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::Cancelled => write!(f, "cancelled"),
            StopReason::DeadlineExceeded => write!(f, "deadline exceeded"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("at least 2 teams are required, got {0}")]
    TooFewTeams(usize),

    #[error("duplicate team name `{0}`")]
    DuplicateTeam(String),

    #[error("team `{team}` has no roster slots")]
    EmptyRoster { team: String },

    #[error("team `{team}` has no rounds")]
    NoRounds { team: String },

    #[error("team `{team}`, round `{round}`: {message}")]
    MalformedRound {
        team: String,
        round: String,
        message: String,
    },

    #[error(
        "team `{team}`, round `{round}`: expected {expected} roster slots, found {found}"
    )]
    RosterMismatch {
        team: String,
        round: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("invalid simulation config field `{field}`: {message}")]
    InvalidConfig { field: &'static str, message: String },

    #[error("random source failure: {0}")]
    RandomSource(#[from] rand::Error),

    #[error("simulation incomplete ({reason}): {completed} of {requested} trials finished")]
    Incomplete {
        reason: StopReason,
        completed: u64,
        requested: u64,
    },

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PoolError>;
