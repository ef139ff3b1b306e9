//! The CDCL driver: propagate, analyse conflicts to a learned clause and a
//! backjump target, decide, repeat. Non-chronological backtracking and
//! clause learning are what let this engine scale past what plain DPLL can
//! search in reasonable time.

use std::collections::HashMap;

use log::{debug, trace};

use crate::cnf::{Clause, CnfFormula, Literal, VarId};
use crate::solver::clause_database::ClauseDatabase;
use crate::solver::clause_learning::analyse;
use crate::solver::config::Config;
use crate::solver::propagate::propagate;
use crate::solver::restarts::Restarter;
use crate::solver::statistics::Statistics;
use crate::solver::trail::{AssignmentReason, Trail};
use crate::solver::vsids::VariableOrder;
use crate::solver::watch::LiteralWatcher;
use crate::visual::{VisualEvent, VisualSink};

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Sat(crate::cnf::SolutionAssignment),
    Unsat,
    /// Returned only when `Config.deadline` is set and elapses first.
    Unknown,
}

pub struct CdclSolver {
    config: Config,
    db: ClauseDatabase,
    watcher: LiteralWatcher,
    trail: Trail,
    order: VariableOrder,
    restarter: Restarter,
    stats: Statistics,
    num_vars: usize,
}

impl CdclSolver {
    pub fn new(formula: &CnfFormula, config: Config) -> Self {
        let num_vars = formula.num_vars;
        let clauses = formula.clauses.clone();
        let watcher = LiteralWatcher::new(&clauses, num_vars);
        let stats = Statistics::new(clauses.len(), num_vars);
        let restarter = Restarter::new(config.restart_policy);

        CdclSolver {
            db: ClauseDatabase::init(clauses),
            watcher,
            trail: Trail::new(num_vars),
            order: VariableOrder::new(num_vars),
            restarter,
            stats,
            num_vars,
            config,
        }
    }

    /// Runs to a verdict, or to `Verdict::Unknown` if a configured deadline
    /// elapses first. `sink`, if given, is notified of every decision,
    /// implication, conflict and restart.
    pub fn solve(&mut self, mut sink: Option<&mut dyn VisualSink>) -> (Verdict, Statistics) {
        self.stats.start_timing();

        if self.assert_unit_clauses_is_trivially_unsat() {
            self.stats.stop_timing();
            return (Verdict::Unsat, self.stats.clone());
        }

        let mut head = 0usize;
        if self
            .propagate_and_count(&mut head, sink.as_deref_mut())
            .is_some()
        {
            self.stats.stop_timing();
            return (Verdict::Unsat, self.stats.clone());
        }

        loop {
            if let Some(deadline) = self.config.deadline {
                if self.stats.elapsed() > deadline {
                    self.stats.stop_timing();
                    return (Verdict::Unknown, self.stats.clone());
                }
            }

            match self.propagate_and_count(&mut head, sink.as_deref_mut()) {
                Some(conflict_clause) => {
                    self.stats.conflicts += 1;
                    self.restarter.note_conflict();

                    if self.trail.decision_level() == 0 {
                        self.stats.learned_clauses = self.db.num_learned();
                        self.stats.restarts = self.restarter.num_restarts();
                        self.stats.stop_timing();
                        if let Some(sink) = sink.as_deref_mut() {
                            sink.on_event(VisualEvent::Conflict {
                                lits: self.db[conflict_clause].literals.clone(),
                            });
                        }
                        return (Verdict::Unsat, self.stats.clone());
                    }

                    if let Some(sink) = sink.as_deref_mut() {
                        sink.on_event(VisualEvent::Conflict {
                            lits: self.db[conflict_clause].literals.clone(),
                        });
                    }

                    let (learned, backtrack_level) =
                        analyse(&self.trail, &self.db, conflict_clause, &mut self.order);
                    trace!(
                        "learned clause of size {} at level {}, backjumping to {}",
                        learned.len(),
                        self.trail.decision_level(),
                        backtrack_level
                    );

                    for entry in self.trail.backtrack_to(backtrack_level) {
                        self.order.insert(entry.literal.id());
                    }
                    head = self.trail.len();

                    let asserting = learned.literals[0];
                    let learned_id = self.db.add_clause(learned, &mut self.watcher);
                    self.trail
                        .assign(asserting, AssignmentReason::Implied(learned_id));

                    self.order.decay();
                    self.db
                        .reduce_if_due(self.config.max_learned_clauses, &mut self.watcher, &self.trail);

                    if self.restarter.due() {
                        debug!("restart #{}", self.restarter.num_restarts());
                        for entry in self.trail.backtrack_to(0) {
                            self.order.insert(entry.literal.id());
                        }
                        head = self.trail.len();
                        if let Some(sink) = sink.as_deref_mut() {
                            sink.on_event(VisualEvent::Restart);
                        }
                    }
                }
                None => {
                    if self.trail.len() == self.num_vars {
                        let assignment = self.extract_assignment();
                        self.stats.learned_clauses = self.db.num_learned();
                        self.stats.restarts = self.restarter.num_restarts();
                        self.stats.stop_timing();
                        if let Some(sink) = sink.as_deref_mut() {
                            sink.on_event(VisualEvent::Solution);
                        }
                        return (Verdict::Sat(assignment), self.stats.clone());
                    }

                    let var = self
                        .order
                        .pop_max(self.trail.values())
                        .expect("some variable must be unassigned when the trail is incomplete");
                    self.stats.decisions += 1;
                    let level = self.trail.decision_level() + 1;
                    self.trail
                        .assign(Literal::from_value(var, true), AssignmentReason::Decision);
                    if let Some(sink) = sink.as_deref_mut() {
                        sink.on_event(VisualEvent::Decision {
                            var,
                            value: true,
                            level,
                        });
                    }
                }
            }
        }
    }

    /// Runs propagation to fixpoint, folds the number of implications it
    /// derived into the running statistics, and notifies `sink` of each one.
    fn propagate_and_count(
        &mut self,
        head: &mut usize,
        sink: Option<&mut dyn VisualSink>,
    ) -> Option<crate::cnf::ClauseId> {
        let before = self.trail.len();
        let conflict = propagate(&mut self.trail, &mut self.db, &mut self.watcher, head);
        self.stats.propagations += self.trail.len() - before;
        if let Some(sink) = sink {
            for entry in &self.trail.entries()[before..] {
                if let AssignmentReason::Implied(antecedent) = entry.reason {
                    sink.on_event(VisualEvent::Implication {
                        lit: entry.literal,
                        level: entry.decision_level,
                        antecedent,
                    });
                }
            }
        }
        conflict
    }

    /// Input unit clauses are asserted at level 0 before the main loop runs;
    /// two that disagree on the same variable make the formula unsat with
    /// no search at all.
    fn assert_unit_clauses_is_trivially_unsat(&mut self) -> bool {
        let unit_clauses: Vec<(crate::cnf::ClauseId, Clause)> = self
            .db
            .cnf()
            .iter()
            .cloned()
            .enumerate()
            .filter(|(_, clause)| clause.is_empty() || clause.len() == 1)
            .collect();

        for (clause_id, clause) in unit_clauses {
            if clause.is_empty() {
                return true;
            }
            let lit = clause.literals[0];
            if let Some(existing) = self.trail.value_of(lit.id()) {
                if existing != lit.positive() {
                    return true;
                }
                continue;
            }
            // Implied (not a Decision) so this stays at level 0 rather than
            // opening a fresh decision level per unit clause.
            self.trail.assign(lit, AssignmentReason::Implied(clause_id));
        }
        false
    }

    fn extract_assignment(&self) -> HashMap<VarId, bool> {
        (1..=self.num_vars)
            .filter_map(|var| self.trail.value_of(var).map(|value| (var, value)))
            .collect()
    }
}

pub fn solve(
    formula: &CnfFormula,
    config: Config,
    sink: Option<&mut dyn VisualSink>,
) -> (Verdict, Statistics) {
    CdclSolver::new(formula, config).solve(sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cnf::{check_assignment, Clause};

    fn formula(clauses: Vec<&str>, num_vars: usize) -> CnfFormula {
        CnfFormula::new(num_vars, clauses.into_iter().map(Clause::from).collect())
    }

    #[test]
    fn solves_trivially_satisfiable_formula() {
        let f = formula(vec!["1", "2"], 2);
        let (verdict, _) = solve(&f, Config::default(), None);
        match verdict {
            Verdict::Sat(assignment) => {
                assert!(check_assignment(&f.clauses, &assignment));
            }
            other => panic!("expected sat, got {other:?}"),
        }
    }

    #[test]
    fn detects_unsat_from_conflicting_units() {
        let f = formula(vec!["1", "-1"], 1);
        let (verdict, _) = solve(&f, Config::default(), None);
        assert_eq!(verdict, Verdict::Unsat);
    }

    #[test]
    fn detects_unsat_requiring_learning() {
        // Pigeonhole-style contradiction: 2 pigeons, 1 hole.
        let f = formula(
            vec!["1 2", "-1 -2", "3 4", "-3 -4", "1 3", "-1 -3", "2 4", "-2 -4"],
            4,
        );
        let (verdict, _) = solve(&f, Config::default(), None);
        assert_eq!(verdict, Verdict::Unsat);
    }

    #[test]
    fn solves_formula_requiring_backjump() {
        let f = formula(
            vec!["-1 2", "-1 3 9", "-2 -3 4", "-4 5 10", "-4 6 11", "-5 -6", "1 7", "8", "9", "10", "11"],
            11,
        );
        let (verdict, _) = solve(&f, Config::default(), None);
        match verdict {
            Verdict::Sat(assignment) => assert!(check_assignment(&f.clauses, &assignment)),
            other => panic!("expected sat, got {other:?}"),
        }
    }
}
