//! Typed failure modes for the crate. The solver itself never returns a
//! `Result` — conflict at level 0 is the unsat verdict, not an error (see
//! `solver::cdcl`). These types cover everything that sits around it:
//! parsing untrusted input and driving the CLI.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DimacsError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file was empty")]
    EmptyFile,

    #[error("invalid DIMACS header line: {0:?}")]
    InvalidHeader(String),

    #[error("header declared {declared} variables but literal {found} was used")]
    LiteralOutOfRange { declared: usize, found: usize },

    #[error("header declared {declared} clauses but {found} were present")]
    ClauseCountMismatch { declared: usize, found: usize },

    #[error("clause is not terminated by a trailing 0")]
    MissingTerminator,

    #[error("token {0:?} is not a valid literal")]
    InvalidLiteral(String),
}

#[derive(Debug, Error)]
pub enum SolveError {
    #[error(transparent)]
    Dimacs(#[from] DimacsError),

    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
