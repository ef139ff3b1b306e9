//! The formula representation shared by every engine: variables, literals,
//! clauses, and the assignment each is checked against.

use std::collections::HashMap;
use std::fmt::{Debug, Display, Formatter};
use std::ops::Neg;
use std::str::FromStr;

/// Variable identifiers are 1-based, matching DIMACS convention. `0` never
/// names a variable.
pub type VarId = usize;

/// A nonzero signed integer: the sign is polarity, the magnitude is the
/// variable. `-l` is always the complement of `l`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    value: i32,
}

impl Literal {
    pub fn new(value: i32) -> Self {
        assert!(value != 0, "literal 0 does not name a variable");
        Literal { value }
    }

    pub fn from_value(id: VarId, positive: bool) -> Self {
        Literal {
            value: if positive { id as i32 } else { -(id as i32) },
        }
    }

    pub fn id(&self) -> VarId {
        self.value.unsigned_abs() as VarId
    }

    pub fn positive(&self) -> bool {
        self.value > 0
    }

    pub fn negative(&self) -> bool {
        self.value < 0
    }

    pub fn id_val(&self) -> (VarId, bool) {
        (self.id(), self.positive())
    }

    /// Truth value of this literal under a full or partial assignment,
    /// `None` if its variable is unassigned.
    pub fn value_under(&self, vars: &[Option<bool>]) -> Option<bool> {
        vars[self.id()].map(|v| v == self.positive())
    }
}

impl FromStr for Literal {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Literal::new)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::new(value)
    }
}

impl Neg for Literal {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Literal::new(-self.value)
    }
}

impl Debug for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

pub type ClauseId = usize;

/// A disjunction of literals. The first two positions are the watched
/// literals whenever the clause has two or more; watch rotation swaps
/// entries into these slots but never otherwise reorders the clause.
#[derive(Debug, Clone)]
pub struct Clause {
    pub literals: Vec<Literal>,
    pub watches: [usize; 2],
    /// Number of distinct decision levels among this clause's literals at
    /// the moment it was learned. `0` for input clauses.
    pub lbd: usize,
    /// Nonnegative, bumped on conflict involvement and starting at 0 for
    /// every clause, input or learned. Reduction in this crate keys off
    /// `lbd` rather than this field (see DESIGN.md), but the field is part
    /// of the data model regardless of which metric reduction consults.
    pub activity: f64,
}

impl Clause {
    pub fn is_satisfied(&self, vars: &[Option<bool>]) -> bool {
        self.literals
            .iter()
            .any(|lit| lit.value_under(vars) == Some(true))
    }

    pub fn is_unit(&self, vars: &[Option<bool>]) -> bool {
        let mut unassigned = 0;
        for lit in &self.literals {
            match lit.value_under(vars) {
                Some(true) => return false,
                Some(false) => {}
                None => unassigned += 1,
            }
        }
        unassigned == 1
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn watched_literals(&self) -> [Literal; 2] {
        [
            self.literals[self.watches[0]],
            self.literals[self.watches[1]],
        ]
    }

    /// Indices of literals that are not false under `vars`; used when a
    /// watch needs a replacement.
    pub fn possible_watch_idx(&self, vars: &[Option<bool>]) -> Vec<usize> {
        self.literals
            .iter()
            .enumerate()
            .filter(|(_, lit)| lit.value_under(vars) != Some(false))
            .map(|(i, _)| i)
            .collect()
    }
}

impl From<Vec<Literal>> for Clause {
    fn from(literals: Vec<Literal>) -> Self {
        Clause {
            literals,
            watches: [0, 1],
            lbd: 0,
            activity: 0.0,
        }
    }
}

impl From<&str> for Clause {
    fn from(s: &str) -> Self {
        let literals: Vec<Literal> = s
            .split_whitespace()
            .map(|lit| lit.parse().unwrap())
            .collect();
        Clause::from(literals)
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.literals)
    }
}

/// A CNF formula: a variable count and a list of clauses over `1..=num_vars`.
#[derive(Debug, Clone)]
pub struct CnfFormula {
    pub num_vars: usize,
    pub clauses: Vec<Clause>,
}

impl CnfFormula {
    pub fn new(num_vars: usize, clauses: Vec<Clause>) -> Self {
        CnfFormula { num_vars, clauses }
    }
}

pub type SolutionAssignment = HashMap<VarId, bool>;
pub type Solution = Option<SolutionAssignment>;

/// Checks a candidate solution against the original clause set, independent
/// of whatever engine produced it.
pub fn check_assignment(clauses: &[Clause], assignment: &SolutionAssignment) -> bool {
    clauses.iter().all(|clause| {
        clause.literals.iter().any(|lit| {
            assignment
                .get(&lit.id())
                .map(|&value| lit.positive() == value)
                .unwrap_or(false)
        })
    })
}
