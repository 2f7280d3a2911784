/// Finish-position counts for one simulation run.
///
/// `counts[team][rank]` is the number of trials in which `team` (by input
/// index) finished at `rank`, 0 being the highest total.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinishTally {
    counts: Vec<Vec<u64>>,
    trials: u64,
}

impl FinishTally {
    pub fn new(team_count: usize) -> Self {
        FinishTally {
            counts: vec![vec![0; team_count]; team_count],
            trials: 0,
        }
    }

    pub fn team_count(&self) -> usize {
        self.counts.len()
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    /// Record one trial. `order` lists team indices from first to last place.
    pub fn record(&mut self, order: &[usize]) {
        debug_assert_eq!(order.len(), self.counts.len());
        for (rank, &team) in order.iter().enumerate() {
            self.counts[team][rank] += 1;
        }
        self.trials += 1;
    }

    /// Add another tally's counts elementwise.
    pub fn merge(mut self, other: FinishTally) -> FinishTally {
        debug_assert_eq!(self.counts.len(), other.counts.len());
        for (mine, theirs) in self.counts.iter_mut().zip(other.counts) {
            for (a, b) in mine.iter_mut().zip(theirs) {
                *a += b;
            }
        }
        self.trials += other.trials;
        self
    }

    pub fn counts(&self, team: usize) -> &[u64] {
        &self.counts[team]
    }

    /// Sum of a team's counts over the first `ranks` ranks.
    pub fn count_within(&self, team: usize, ranks: usize) -> u64 {
        self.counts[team].iter().take(ranks).sum()
    }

    /// Trial-count conservation: each rank is occupied exactly once per trial.
    pub fn is_consistent(&self) -> bool {
        let n = self.counts.len();
        (0..n).all(|rank| self.counts.iter().map(|c| c[rank]).sum::<u64>() == self.trials)
            && self.counts.iter().all(|c| c.iter().sum::<u64>() == self.trials)
    }
}
