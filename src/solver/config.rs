//! Knobs that change search behavior without changing the verdict: restart
//! policy and an optional wall-clock deadline.

use crate::solver::restarts::RestartPolicy;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub restart_policy: RestartPolicy,
    /// Reduction threshold: once this many learned clauses are live, a
    /// database reduction pass is eligible to run.
    pub max_learned_clauses: usize,
    /// If set, `solve` returns `Verdict::Unknown` once this much wall time
    /// has elapsed, instead of running to completion.
    pub deadline: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            restart_policy: RestartPolicy::FixedInterval,
            max_learned_clauses: 1000,
            deadline: None,
        }
    }
}

impl Config {
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_restart_policy(mut self, policy: RestartPolicy) -> Self {
        self.restart_policy = policy;
        self
    }
}
