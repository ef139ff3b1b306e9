//! Unit propagation over the two-watched-literals scheme: saturates the
//! trail with every literal forced by the current assignment, or reports
//! the first clause that falsified entirely.

use crate::cnf::ClauseId;
use crate::solver::clause_database::ClauseDatabase;
use crate::solver::trail::{AssignmentReason, Trail};
use crate::solver::watch::{LiteralWatcher, WatchUpdate};

/// Advances propagation from `*head` (the trail position already processed)
/// to the end of the trail, assigning every literal implication discovered
/// along the way. `*head` is left at the first position not yet processed;
/// on conflict that is the position of the assignment that triggered it.
/// Returns the clause that went empty, if any.
pub fn propagate(
    trail: &mut Trail,
    db: &mut ClauseDatabase,
    watcher: &mut LiteralWatcher,
    head: &mut usize,
) -> Option<ClauseId> {
    while *head < trail.len() {
        let lit = trail.entry_at(*head).literal;
        *head += 1;

        let watching = watcher.clauses_watching_false_of(lit);
        for clause_id in watching {
            if !db.is_live(clause_id) {
                continue;
            }
            let falsified = -lit;
            let update = {
                let clause = &mut db[clause_id];
                watcher.update_clause(clause, clause_id, falsified, trail.values())
            };
            match update {
                WatchUpdate::FoundNewWatch => {}
                WatchUpdate::Unit(implied) => {
                    trail.assign(implied, AssignmentReason::Implied(clause_id));
                }
                WatchUpdate::Conflict => {
                    return Some(clause_id);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cnf::{Clause, Literal};

    #[test]
    fn pure_propagation_derives_implied_literals() {
        let clauses = vec![Clause::from("1"), Clause::from("-1 2")];
        let mut db = ClauseDatabase::init(clauses);
        let mut watcher = LiteralWatcher::new(db.cnf(), 2);
        let mut trail = Trail::new(2);
        let mut head = 0;

        trail.assign(Literal::new(1), AssignmentReason::Decision);
        let conflict = propagate(&mut trail, &mut db, &mut watcher, &mut head);
        assert!(conflict.is_none());
        assert_eq!(trail.value_of(2), Some(true));
    }

    #[test]
    fn detects_conflict_when_clause_falsified() {
        let clauses = vec![Clause::from("1 2")];
        let mut db = ClauseDatabase::init(clauses);
        let mut watcher = LiteralWatcher::new(db.cnf(), 2);
        let mut trail = Trail::new(2);
        let mut head = 0;

        trail.assign(Literal::new(-1), AssignmentReason::Decision);
        trail.assign(Literal::new(-2), AssignmentReason::Decision);
        let conflict = propagate(&mut trail, &mut db, &mut watcher, &mut head);
        assert_eq!(conflict, Some(0));
    }
}
