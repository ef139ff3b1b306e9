//! Storage for input and learned clauses. Clauses live in a stable,
//! append-only arena and are addressed by index for their entire lifetime;
//! deletion marks a tombstone rather than reusing or compacting ids, so a
//! `ClauseId` captured anywhere (a trail antecedent, a watch list) stays
//! valid to dereference even after the clause it names has been removed
//! from iteration.

use crate::cnf::{Clause, ClauseId};
use crate::solver::trail::{AssignmentReason, Trail};
use crate::solver::watch::LiteralWatcher;
use itertools::Itertools;
use std::fmt::{Debug, Formatter};
use std::ops::{Index, IndexMut};

#[derive(Clone)]
pub struct ClauseDatabase {
    clauses: Vec<Clause>,
    live: Vec<bool>,
    first_learned_id: ClauseId,
    num_reductions: usize,
}

impl Debug for ClauseDatabase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "ClauseDatabase:")?;
        for (id, clause) in self.clauses.iter().enumerate() {
            if self.live[id] {
                writeln!(f, "  [{id}] lbd={} {:?}", clause.lbd, clause.literals)?;
            }
        }
        Ok(())
    }
}

impl ClauseDatabase {
    pub fn init(clauses: Vec<Clause>) -> Self {
        let live = vec![true; clauses.len()];
        ClauseDatabase {
            first_learned_id: clauses.len(),
            clauses,
            live,
            num_reductions: 0,
        }
    }

    pub fn cnf(&self) -> &[Clause] {
        &self.clauses[0..self.first_learned_id]
    }

    pub fn is_live(&self, id: ClauseId) -> bool {
        self.live[id]
    }

    pub fn add_clause(&mut self, clause: Clause, watcher: &mut LiteralWatcher) -> ClauseId {
        let id = self.clauses.len();
        self.clauses.push(clause);
        self.live.push(true);
        if self.clauses[id].len() >= 2 {
            watcher.watch_clause(&self.clauses[id], id);
        }
        id
    }

    /// Ids of every live clause, input and learned, in arena order.
    pub fn iter(&self) -> impl Iterator<Item = ClauseId> + '_ {
        (0..self.clauses.len()).filter(move |&id| self.live[id])
    }

    pub fn learned_ids(&self) -> impl Iterator<Item = ClauseId> + '_ {
        let first = self.first_learned_id;
        (first..self.clauses.len()).filter(move |&id| self.live[id])
    }

    pub fn num_learned(&self) -> usize {
        self.learned_ids().count()
    }

    fn is_reason_clause(clause_id: ClauseId, trail: &Trail) -> bool {
        trail
            .entries()
            .iter()
            .any(|entry| entry.reason == AssignmentReason::Implied(clause_id))
    }

    fn delete_clause(&mut self, clause_id: ClauseId, watcher: &mut LiteralWatcher, trail: &Trail) -> bool {
        if !self.live[clause_id] || self.clauses[clause_id].len() < 2 {
            return false;
        }
        if Self::is_reason_clause(clause_id, trail) {
            return false;
        }
        for lit in self.clauses[clause_id].watched_literals() {
            watcher.remove_watch(lit, clause_id);
        }
        self.live[clause_id] = false;
        self.clauses[clause_id].literals.clear();
        true
    }

    /// Runs a reduction pass once the live learned-clause count exceeds
    /// `max_learned`. Keeps roughly the better half by LBD (lower is
    /// better), never touching clauses that are a live trail antecedent or
    /// clauses with LBD <= 2 ("glue" clauses).
    pub fn reduce_if_due(&mut self, max_learned: usize, watcher: &mut LiteralWatcher, trail: &Trail) {
        if self.num_learned() <= max_learned {
            return;
        }
        self.num_reductions += 1;

        let mut candidates = self
            .learned_ids()
            .filter(|&id| self.clauses[id].lbd > 2)
            .filter(|&id| !Self::is_reason_clause(id, trail))
            .collect_vec();
        candidates.sort_by_key(|&id| self.clauses[id].lbd);

        let keep = candidates.len() / 2;
        for &id in &candidates[keep..] {
            self.delete_clause(id, watcher, trail);
        }
    }
}

impl Index<ClauseId> for ClauseDatabase {
    type Output = Clause;

    fn index(&self, index: ClauseId) -> &Self::Output {
        &self.clauses[index]
    }
}

impl IndexMut<ClauseId> for ClauseDatabase {
    fn index_mut(&mut self, index: ClauseId) -> &mut Self::Output {
        &mut self.clauses[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cnf::Clause;

    #[test]
    fn reduction_protects_reason_clauses() {
        let input = vec![Clause::from("1 2 3")];
        let mut db = ClauseDatabase::init(input);
        let mut watcher = LiteralWatcher::new(db.cnf(), 3);

        let mut learned = Clause::from("-1 -2");
        learned.lbd = 5;
        let learned_id = db.add_clause(learned, &mut watcher);

        let mut trail = Trail::new(3);
        trail.assign(crate::cnf::Literal::new(2), AssignmentReason::Implied(learned_id));

        db.reduce_if_due(0, &mut watcher, &trail);
        assert!(db.is_live(learned_id));
    }
}
