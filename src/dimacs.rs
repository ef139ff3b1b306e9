//! Reader/writer for the DIMACS CNF format and the `s`/`v` solution
//! convention. Gzip-transparent on read, matching files with a `.gz` suffix.

use flate2::read::GzDecoder;
use itertools::Itertools;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::cnf::{Clause, CnfFormula, Literal, SolutionAssignment};
use crate::error::DimacsError;

pub fn read_file(path: impl AsRef<Path>) -> Result<CnfFormula, DimacsError> {
    let path = path.as_ref();
    let text = if path.extension().map(|ext| ext == "gz").unwrap_or(false) {
        let file = std::fs::File::open(path).map_err(|source| DimacsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut decoder = GzDecoder::new(file);
        let mut contents = String::new();
        decoder
            .read_to_string(&mut contents)
            .map_err(|source| DimacsError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        contents
    } else {
        std::fs::read_to_string(path).map_err(|source| DimacsError::Io {
            path: path.to_path_buf(),
            source,
        })?
    };
    parse(&text)
}

/// Parses a complete DIMACS document already in memory. Does not canonicalize
/// clauses: duplicate literals and tautologies are passed through unchanged,
/// since the solver is not required to assume a canonical form. An empty
/// clause is legal input and renders the formula unsatisfiable.
pub fn parse(input: &str) -> Result<CnfFormula, DimacsError> {
    let body_lines: Vec<&str> = input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with('c'))
        .filter(|line| !line.starts_with('%'))
        .collect();

    let header_line = body_lines.first().ok_or(DimacsError::EmptyFile)?;
    let header: Vec<&str> = header_line.split_whitespace().collect();
    if header.len() != 4 || header[0] != "p" || header[1] != "cnf" {
        return Err(DimacsError::InvalidHeader(header_line.to_string()));
    }
    let num_vars: usize = header[2]
        .parse()
        .map_err(|_| DimacsError::InvalidHeader(header_line.to_string()))?;
    let num_clauses: usize = header[3]
        .parse()
        .map_err(|_| DimacsError::InvalidHeader(header_line.to_string()))?;

    let tokens: Vec<&str> = body_lines[1..]
        .iter()
        .flat_map(|line| line.split_whitespace())
        .collect();

    let literal_tokens = match tokens.last() {
        Some(&"0") => &tokens[..],
        Some(_) => return Err(DimacsError::MissingTerminator),
        None => &tokens[..],
    };

    let mut clauses: Vec<Vec<Literal>> = Vec::new();
    let mut current: Vec<Literal> = Vec::new();
    for token in literal_tokens {
        let value: i32 = token
            .parse()
            .map_err(|_| DimacsError::InvalidLiteral(token.to_string()))?;
        if value == 0 {
            clauses.push(std::mem::take(&mut current));
        } else {
            let lit = Literal::new(value);
            if lit.id() > num_vars {
                return Err(DimacsError::LiteralOutOfRange {
                    declared: num_vars,
                    found: lit.id(),
                });
            }
            current.push(lit);
        }
    }
    if !current.is_empty() {
        return Err(DimacsError::MissingTerminator);
    }

    if clauses.len() != num_clauses {
        return Err(DimacsError::ClauseCountMismatch {
            declared: num_clauses,
            found: clauses.len(),
        });
    }

    let clauses = clauses.into_iter().map(Clause::from).collect_vec();
    Ok(CnfFormula::new(num_vars, clauses))
}

pub fn write_file(
    path: impl AsRef<Path>,
    formula: &CnfFormula,
) -> Result<(), crate::error::SolveError> {
    let path: PathBuf = path.as_ref().to_path_buf();
    std::fs::write(&path, render(formula)).map_err(|source| crate::error::SolveError::Write {
        path,
        source,
    })
}

pub fn render(formula: &CnfFormula) -> String {
    let mut out = format!("p cnf {} {}\n", formula.num_vars, formula.clauses.len());
    for clause in &formula.clauses {
        let literals = clause.literals.iter().map(|lit| lit.to_string()).join(" ");
        out.push_str(&literals);
        out.push_str(" 0\n");
    }
    out
}

pub fn solution_to_dimacs(solution: Option<&SolutionAssignment>) -> String {
    match solution {
        None => "s UNSATISFIABLE".to_string(),
        Some(assignment) => {
            let mut out = String::from("s SATISFIABLE\nv ");
            let sorted = assignment.iter().sorted_by_key(|(var, _)| **var);
            for (var, value) in sorted {
                out.push_str(&format!("{}{} ", if *value { "" } else { "-" }, var));
            }
            out.push('0');
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::collection::vec;
    use proptest::prelude::*;

    fn arb_formula(max_vars: usize, max_clauses: usize) -> impl Strategy<Value = CnfFormula> {
        (1..=max_vars).prop_flat_map(move |num_vars| {
            let lit = (1..=num_vars as i32).prop_flat_map(|v| prop_oneof![Just(v), Just(-v)]);
            vec(vec(lit, 1..=4), 0..=max_clauses).prop_map(move |clauses| {
                let clauses = clauses
                    .into_iter()
                    .map(|lits| {
                        Clause::from(lits.into_iter().map(Literal::new).collect::<Vec<_>>())
                    })
                    .collect();
                CnfFormula::new(num_vars, clauses)
            })
        })
    }

    fn same_clauses(a: &CnfFormula, b: &CnfFormula) -> bool {
        a.num_vars == b.num_vars
            && a.clauses.len() == b.clauses.len()
            && a.clauses
                .iter()
                .zip(&b.clauses)
                .all(|(x, y)| x.literals == y.literals)
    }

    proptest! {
        /// Testable property: DIMACS round-trip (spec §8). Rendering a parsed
        /// formula and parsing it again must agree with the original,
        /// clause-for-clause and literal-for-literal.
        #[test]
        fn roundtrip(f in arb_formula(8, 12)) {
            let rendered = render(&f);
            let reparsed = parse(&rendered).expect("rendered output must reparse");
            prop_assert!(same_clauses(&f, &reparsed));
        }
    }

    #[test]
    fn roundtrip_concrete_formula() {
        let f = CnfFormula::new(
            3,
            vec![
                Clause::from("1 2 3"),
                Clause::from("-1 -2"),
                Clause::from("3"),
            ],
        );
        let rendered = render(&f);
        let reparsed = parse(&rendered).unwrap();
        assert!(same_clauses(&f, &reparsed));
    }

    #[test]
    fn empty_input_is_empty_file_error() {
        assert!(matches!(parse(""), Err(DimacsError::EmptyFile)));
        assert!(matches!(parse("c just a comment\n"), Err(DimacsError::EmptyFile)));
    }

    #[test]
    fn malformed_header_is_invalid_header_error() {
        assert!(matches!(parse("pcnf 1 1\n1 0\n"), Err(DimacsError::InvalidHeader(_))));
        assert!(matches!(parse("p sat 1 1\n1 0\n"), Err(DimacsError::InvalidHeader(_))));
        assert!(matches!(parse("p cnf x 1\n1 0\n"), Err(DimacsError::InvalidHeader(_))));
        assert!(matches!(parse("p cnf 1 x\n1 0\n"), Err(DimacsError::InvalidHeader(_))));
        assert!(matches!(parse("p cnf 1\n1 0\n"), Err(DimacsError::InvalidHeader(_))));
    }

    #[test]
    fn literal_beyond_declared_vars_is_out_of_range() {
        let err = parse("p cnf 2 1\n1 3 0\n").unwrap_err();
        assert!(matches!(
            err,
            DimacsError::LiteralOutOfRange { declared: 2, found: 3 }
        ));
    }

    #[test]
    fn clause_missing_trailing_zero_is_missing_terminator() {
        assert!(matches!(
            parse("p cnf 3 1\n1 2 3\n"),
            Err(DimacsError::MissingTerminator)
        ));
    }

    #[test]
    fn declared_clause_count_mismatch_is_reported() {
        let err = parse("p cnf 2 2\n1 0\n").unwrap_err();
        assert!(matches!(
            err,
            DimacsError::ClauseCountMismatch { declared: 2, found: 1 }
        ));
    }

    #[test]
    fn non_numeric_token_is_invalid_literal() {
        assert!(matches!(
            parse("p cnf 2 1\n1 x 0\n"),
            Err(DimacsError::InvalidLiteral(_))
        ));
    }

    #[test]
    fn comment_and_percent_lines_are_ignored() {
        let f = parse("c a comment\np cnf 2 1\n% another comment\n1 -2 0\n").unwrap();
        assert_eq!(f.num_vars, 2);
        assert_eq!(f.clauses.len(), 1);
        assert_eq!(f.clauses[0].literals, vec![Literal::new(1), Literal::new(-2)]);
    }
}
