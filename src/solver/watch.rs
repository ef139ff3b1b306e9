//! Two-watched-literals bookkeeping: which clauses watch a given literal,
//! and how a clause's watch pair rotates when one of them goes false.

use crate::cnf::{Clause, ClauseId, Literal};

#[derive(Debug, Default, Clone)]
pub struct VarWatch {
    pub pos: Vec<ClauseId>,
    pub neg: Vec<ClauseId>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WatchUpdate {
    FoundNewWatch,
    Unit(Literal),
    Conflict,
}

#[derive(Debug, Clone)]
pub struct LiteralWatcher {
    var_watches: Vec<VarWatch>,
}

impl LiteralWatcher {
    pub fn new(clauses: &[Clause], num_vars: usize) -> Self {
        let mut watches = vec![VarWatch::default(); num_vars + 1];
        for (clause_id, clause) in clauses.iter().enumerate() {
            if clause.len() < 2 {
                continue; // unit clauses are asserted directly, never watched
            }
            for lit in clause.watched_literals() {
                watches[lit.id()].entry_mut(lit.positive()).push(clause_id);
            }
        }
        LiteralWatcher {
            var_watches: watches,
        }
    }

    pub fn watch_clause(&mut self, clause: &Clause, clause_id: ClauseId) {
        for lit in clause.watched_literals() {
            self.add_watch(lit, clause_id);
        }
    }

    /// Clause ids currently watching `lit`'s complement, i.e. the clauses
    /// that must be re-examined now that `lit` has gone true (and `-lit`
    /// false).
    pub fn clauses_watching_false_of(&mut self, lit: Literal) -> Vec<ClauseId> {
        std::mem::take(self.var_watches[lit.id()].entry_mut(!lit.positive()))
    }

    pub fn add_watch(&mut self, lit: Literal, clause_id: ClauseId) {
        self.var_watches[lit.id()].entry_mut(lit.positive()).push(clause_id);
    }

    pub fn remove_watch(&mut self, lit: Literal, clause_id: ClauseId) {
        self.var_watches[lit.id()]
            .entry_mut(lit.positive())
            .retain(|&id| id != clause_id);
    }

    pub fn watches_for(&self, var: crate::cnf::VarId, positive: bool) -> &[ClauseId] {
        if positive {
            &self.var_watches[var].pos
        } else {
            &self.var_watches[var].neg
        }
    }

    /// `old_literal` is the literal of `clause` that just became false.
    /// Restores the watch invariant: finds a non-false replacement among
    /// the unwatched positions, or reports the clause is now unit or empty
    /// under the other watch.
    pub fn update_clause(
        &mut self,
        clause: &mut Clause,
        clause_id: ClauseId,
        old_literal: Literal,
        vars: &[Option<bool>],
    ) -> WatchUpdate {
        if clause.literals[clause.watches[0]].id() != old_literal.id() {
            clause.watches.swap(0, 1);
        }
        debug_assert_eq!(clause.literals[clause.watches[0]], old_literal);

        let other = clause.literals[clause.watches[1]];
        if other.value_under(vars) == Some(true) {
            self.add_watch(old_literal, clause_id);
            return WatchUpdate::FoundNewWatch;
        }

        for i in 0..clause.literals.len() {
            if i == clause.watches[0] || i == clause.watches[1] {
                continue;
            }
            if clause.literals[i].value_under(vars) != Some(false) {
                clause.watches[0] = i;
                self.add_watch(clause.literals[i], clause_id);
                return WatchUpdate::FoundNewWatch;
            }
        }

        // No replacement exists: clause stays watched on `old_literal`.
        self.add_watch(old_literal, clause_id);
        if other.value_under(vars) == Some(false) {
            WatchUpdate::Conflict
        } else {
            WatchUpdate::Unit(other)
        }
    }
}

impl VarWatch {
    fn entry_mut(&mut self, positive: bool) -> &mut Vec<ClauseId> {
        if positive {
            &mut self.pos
        } else {
            &mut self.neg
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotates_watch_away_from_false_literal() {
        let mut clause = Clause::from("1 2 3");
        let mut watcher = LiteralWatcher::new(std::slice::from_ref(&clause), 3);
        let mut vars = vec![None; 4];
        vars[1] = Some(false);

        let update = watcher.update_clause(&mut clause, 0, Literal::new(1), &vars);
        assert_eq!(update, WatchUpdate::FoundNewWatch);
        let watched_ids: Vec<_> = clause.watched_literals().iter().map(|l| l.id()).collect();
        assert!(!watched_ids.contains(&1));
        assert!(watched_ids.contains(&3));
    }

    #[test]
    fn reports_unit_when_no_replacement_exists() {
        let mut clause = Clause::from("1 2 3");
        let mut watcher = LiteralWatcher::new(std::slice::from_ref(&clause), 3);
        let mut vars = vec![None; 4];
        vars[1] = Some(false);
        watcher.update_clause(&mut clause, 0, Literal::new(1), &vars);
        vars[3] = Some(false);
        let update = watcher.update_clause(&mut clause, 0, Literal::new(-3), &vars);
        assert_eq!(update, WatchUpdate::Unit(Literal::new(2)));
    }

    #[test]
    fn reports_conflict_when_both_watches_false() {
        let mut clause = Clause::from("1 2");
        let mut watcher = LiteralWatcher::new(std::slice::from_ref(&clause), 2);
        let mut vars = vec![None; 3];
        vars[1] = Some(false);
        vars[2] = Some(false);
        let update = watcher.update_clause(&mut clause, 0, Literal::new(-2), &vars);
        assert_eq!(update, WatchUpdate::Conflict);
    }
}
