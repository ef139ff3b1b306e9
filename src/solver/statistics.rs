//! Counters every engine reports, rendered as a `prettytable` for the CLI.

use prettytable::{row, Table};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Statistics {
    pub num_clauses: usize,
    pub num_vars: usize,
    pub decisions: usize,
    pub propagations: usize,
    /// CDCL only; zero for DPLL.
    pub conflicts: usize,
    pub restarts: usize,
    pub learned_clauses: usize,
    /// DPLL only; zero for CDCL.
    pub max_depth: usize,
    start_time: Instant,
    pub time: Duration,
}

impl Statistics {
    pub fn new(num_clauses: usize, num_vars: usize) -> Self {
        Statistics {
            num_clauses,
            num_vars,
            decisions: 0,
            propagations: 0,
            conflicts: 0,
            restarts: 0,
            learned_clauses: 0,
            max_depth: 0,
            start_time: Instant::now(),
            time: Duration::default(),
        }
    }

    pub fn start_timing(&mut self) {
        self.start_time = Instant::now();
    }

    pub fn stop_timing(&mut self) {
        self.time = self.start_time.elapsed();
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.set_format(*prettytable::format::consts::FORMAT_NO_COLSEP);
        table.set_titles(row![b -> "Solver Statistics", "Value"]);
        table.add_row(row![
            "Size",
            format!("{} clauses, {} vars", self.num_clauses, self.num_vars)
        ]);
        table.add_row(row!["Decisions", self.decisions]);
        table.add_row(row!["Propagations", self.propagations]);
        if self.conflicts > 0 || self.restarts > 0 || self.learned_clauses > 0 {
            table.add_row(row!["Conflicts", self.conflicts]);
            table.add_row(row!["Restarts", self.restarts]);
            table.add_row(row!["Learned clauses", self.learned_clauses]);
        } else {
            table.add_row(row!["Max recursion depth", self.max_depth]);
        }
        table.add_row(row!["Time (approx.)", format!("{:.3}s", self.time.as_secs_f32())]);
        table
    }
}
