//! A SAT solver core: a DPLL reference engine and a CDCL engine (two-watched
//! literals, VSIDS, first-UIP conflict analysis, non-chronological
//! backtracking, a learned-clause database, and restarts) sharing one CNF
//! representation and DIMACS I/O layer.

pub mod bench;
pub mod cnf;
pub mod dimacs;
pub mod error;
pub mod solver;
pub mod visual;
