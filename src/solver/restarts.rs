//! Restart policies: return the search to decision level 0, keeping every
//! learned clause, to escape a region of the search space that isn't paying
//! off. The verdict is unaffected by which policy runs; only the conflict
//! counts it takes to get there change.

use clap::ValueEnum;

#[derive(Debug, Copy, Clone, ValueEnum)]
#[clap(rename_all = "kebab-case")]
pub enum RestartPolicy {
    /// Restart every `FIXED_INTERVAL` conflicts. The default: it reproduces
    /// the reference solver's unconditional period exactly, which keeps
    /// conflict/restart statistics comparable across engines.
    FixedInterval,
    Luby,
    NoRestarts,
}

const FIXED_INTERVAL: usize = 100;
const LUBY_UNIT: usize = 32;

#[derive(Debug, Clone)]
pub struct Restarter {
    policy: RestartPolicy,
    num_restarts: usize,
    conflicts_since_last_restart: usize,
}

impl Restarter {
    pub fn new(policy: RestartPolicy) -> Self {
        Restarter {
            policy,
            num_restarts: 0,
            conflicts_since_last_restart: 0,
        }
    }

    pub fn num_restarts(&self) -> usize {
        self.num_restarts
    }

    pub fn note_conflict(&mut self) {
        self.conflicts_since_last_restart += 1;
    }

    /// Returns whether a restart should happen now. If so, resets the
    /// internal conflict counter for the next interval.
    pub fn due(&mut self) -> bool {
        let due = match self.policy {
            RestartPolicy::FixedInterval => self.conflicts_since_last_restart >= FIXED_INTERVAL,
            RestartPolicy::Luby => {
                self.conflicts_since_last_restart >= LUBY_UNIT * luby(self.num_restarts + 1)
            }
            RestartPolicy::NoRestarts => false,
        };
        if due {
            self.conflicts_since_last_restart = 0;
            self.num_restarts += 1;
        }
        due
    }
}

/// The Luby sequence: 1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4, 8, ...
/// defined for `i >= 1`. Iterative to avoid unbounded recursion depth for
/// large restart counts.
fn luby(i: usize) -> usize {
    let mut size = 1usize;
    let mut seq = 1usize;
    while size < i + 1 {
        seq += 1;
        size = 2 * size + 1;
    }
    let mut size = size;
    let mut seq = seq;
    let mut i = i;
    while size - 1 != i {
        size = (size - 1) / 2;
        seq -= 1;
        i %= size;
    }
    1 << (seq - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luby_matches_known_prefix() {
        let expected = [1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4, 8];
        for (idx, &want) in expected.iter().enumerate() {
            assert_eq!(luby(idx + 1), want, "luby({})", idx + 1);
        }
    }

    #[test]
    fn fixed_interval_fires_after_threshold() {
        let mut restarter = Restarter::new(RestartPolicy::FixedInterval);
        for _ in 0..FIXED_INTERVAL - 1 {
            restarter.note_conflict();
            assert!(!restarter.due());
        }
        restarter.note_conflict();
        assert!(restarter.due());
        assert_eq!(restarter.num_restarts(), 1);
    }

    #[test]
    fn no_restarts_policy_never_fires() {
        let mut restarter = Restarter::new(RestartPolicy::NoRestarts);
        for _ in 0..10_000 {
            restarter.note_conflict();
            assert!(!restarter.due());
        }
    }
}
