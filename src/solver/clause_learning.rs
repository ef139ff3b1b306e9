//! First unique implication point (1-UIP) conflict analysis: resolves the
//! conflicting clause backward along the trail until exactly one literal of
//! the current decision level remains, producing a learned clause and the
//! level to backjump to.

use std::collections::HashSet;
use std::hash::BuildHasherDefault;

use fnv::FnvHasher;
type FastHasher = BuildHasherDefault<FnvHasher>;

use crate::cnf::{Clause, ClauseId, Literal, VarId};
use crate::solver::clause_database::ClauseDatabase;
use crate::solver::trail::{AssignmentReason, Trail};
use crate::solver::vsids::VariableOrder;

/// Runs 1-UIP analysis on a conflict detected at the trail's current
/// decision level. Bumps the activity of every variable involved in
/// resolution. Returns the learned clause (UIP asserting literal first,
/// second-highest-level literal second) and the backjump level.
pub fn analyse(
    trail: &Trail,
    db: &ClauseDatabase,
    conflict_clause: ClauseId,
    order: &mut VariableOrder,
) -> (Clause, usize) {
    let current_level = trail.decision_level();
    let mut seen: HashSet<VarId, FastHasher> = HashSet::with_hasher(FastHasher::default());
    let mut learned: Vec<Literal> = Vec::new();
    let mut count_at_current_level = 0usize;

    let mut reason_clause = conflict_clause;
    let mut resolved_literal: Option<Literal> = None;
    let mut trail_pos = trail.len();

    loop {
        for &lit in &db[reason_clause].literals {
            if Some(lit) == resolved_literal {
                continue;
            }
            let var = lit.id();
            if seen.contains(&var) {
                continue;
            }
            let level = trail.level_of(var);
            if level == 0 {
                continue; // permanent fact, contributes nothing to the learned clause
            }
            seen.insert(var);
            order.bump(var);
            if level == current_level {
                count_at_current_level += 1;
            } else {
                learned.push(lit);
            }
        }

        loop {
            trail_pos -= 1;
            if seen.contains(&trail.entry_at(trail_pos).literal.id()) {
                break;
            }
        }
        let entry = trail.entry_at(trail_pos);
        resolved_literal = Some(entry.literal);
        seen.remove(&entry.literal.id());
        count_at_current_level -= 1;
        if count_at_current_level == 0 {
            break;
        }
        reason_clause = match entry.reason {
            AssignmentReason::Implied(clause) => clause,
            AssignmentReason::Decision => {
                unreachable!("resolution reached a decision literal before the 1-UIP")
            }
        };
    }

    let uip = resolved_literal.unwrap();
    learned.push(-uip);

    // The UIP is the asserting literal; keep it in the first watch slot so
    // it is immediately re-propagated after backtracking.
    let uip_pos = learned.len() - 1;
    learned.swap(0, uip_pos);

    let backtrack_level = learned[1..]
        .iter()
        .map(|lit| trail.level_of(lit.id()))
        .max()
        .unwrap_or(0);

    // The second watch must sit on the literal at the backjump level, or the
    // watch invariant breaks the instant the trail is rewound.
    if let Some(pos) = learned
        .iter()
        .skip(1)
        .position(|lit| trail.level_of(lit.id()) == backtrack_level)
    {
        learned.swap(1, pos + 1);
    }

    let lbd = learned
        .iter()
        .map(|lit| trail.level_of(lit.id()))
        .collect::<HashSet<_>>()
        .len();

    let mut clause = Clause::from(learned);
    clause.lbd = lbd;
    (clause, backtrack_level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::clause_database::ClauseDatabase;
    use crate::solver::propagate::propagate;
    use crate::solver::watch::LiteralWatcher;

    /// Classic textbook example: a long implication chain collapses to a
    /// single asserting literal at the conflict's decision level.
    #[test]
    fn finds_uip_and_backjump_level() {
        let cnf = vec![
            Clause::from("-1 2"),
            Clause::from("-1 3 9"),
            Clause::from("-2 -3 4"),
            Clause::from("-4 5 10"),
            Clause::from("-4 6 11"),
            Clause::from("-5 -6"),
            Clause::from("1 7 -12"),
            Clause::from("1 8"),
            Clause::from("-7 -8 -13"),
            Clause::from("10 -11"),
            Clause::from("-12 13"),
        ];
        let mut db = ClauseDatabase::init(cnf);
        let mut watcher = LiteralWatcher::new(db.cnf(), 13);
        let mut trail = Trail::new(13);
        let mut order = VariableOrder::new(13);
        let mut head = 0;

        for decision in [-9, -10, 12, 1] {
            trail.assign(Literal::new(decision), AssignmentReason::Decision);
            if let Some(conflict) = propagate(&mut trail, &mut db, &mut watcher, &mut head) {
                let (learned, level) = analyse(&trail, &db, conflict, &mut order);
                assert!(level < trail.decision_level());
                assert!(!learned.literals.is_empty());
                return;
            }
        }
        panic!("expected this chain of decisions to conflict");
    }
}
