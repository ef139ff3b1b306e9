//! Synthetic CNF generators used to exercise the solvers: random 3-SAT,
//! the pigeonhole-principle family (always unsatisfiable once pigeons
//! outnumber holes), and a Tseitin-encoded parity chain.

use clap::ValueEnum;
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::cnf::{Clause, CnfFormula, Literal};

#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum BenchmarkKind {
    #[value(name = "3sat")]
    ThreeSat,
    Pigeonhole,
    Parity,
}

/// Each clause picks 3 distinct variables uniformly at random (no
/// replacement) and gives each a uniformly random polarity. Seeded for
/// reproducibility.
pub fn generate_random_3sat(num_vars: usize, num_clauses: usize, seed: u64) -> CnfFormula {
    let mut rng = StdRng::seed_from_u64(seed);
    let pool: Vec<usize> = (1..=num_vars).collect();

    let clauses = (0..num_clauses)
        .map(|_| {
            let vars: Vec<usize> = pool.choose_multiple(&mut rng, 3).copied().collect();
            let literals = vars
                .into_iter()
                .map(|var| Literal::from_value(var, rng.gen_bool(0.5)))
                .collect_vec();
            Clause::from(literals)
        })
        .collect();

    CnfFormula::new(num_vars, clauses)
}

/// `num_pigeons` pigeons, each must occupy one of `num_holes` holes, no
/// hole shared by two pigeons. Variable `(i-1)*num_holes + j` means
/// "pigeon i is in hole j". Unsatisfiable whenever `num_pigeons > num_holes`.
pub fn generate_pigeonhole(num_pigeons: usize, num_holes: usize) -> CnfFormula {
    let var = |pigeon: usize, hole: usize| (pigeon - 1) * num_holes + hole;
    let mut clauses = Vec::new();

    for pigeon in 1..=num_pigeons {
        let literals = (1..=num_holes)
            .map(|hole| Literal::from_value(var(pigeon, hole), true))
            .collect_vec();
        clauses.push(Clause::from(literals));
    }

    for hole in 1..=num_holes {
        for pigeon_a in 1..=num_pigeons {
            for pigeon_b in (pigeon_a + 1)..=num_pigeons {
                clauses.push(Clause::from(vec![
                    Literal::from_value(var(pigeon_a, hole), false),
                    Literal::from_value(var(pigeon_b, hole), false),
                ]));
            }
        }
    }

    CnfFormula::new(num_pigeons * num_holes, clauses)
}

/// Tseitin encoding of `x1 XOR x2 XOR ... XOR xn = true` (odd parity) over
/// auxiliary variables `y1..=y(n-1)` at `num_vars+1..=2*num_vars-1`, where
/// `y1 = x1` and `yi = y(i-1) XOR xi`. The final auxiliary is asserted true.
pub fn generate_parity(num_vars: usize) -> CnfFormula {
    assert!(num_vars >= 1, "parity chain needs at least one variable");
    let aux_start = num_vars + 1;
    let mut clauses = vec![
        Clause::from(vec![Literal::new(-1), Literal::new(aux_start as i32)]),
        Clause::from(vec![Literal::new(1), Literal::new(-(aux_start as i32))]),
    ];

    for i in 2..=num_vars {
        let prev_aux = (aux_start + i - 2) as i32;
        let curr_aux = (aux_start + i - 1) as i32;
        let xi = i as i32;

        clauses.push(Clause::from(vec![
            Literal::new(prev_aux),
            Literal::new(xi),
            Literal::new(curr_aux),
        ]));
        clauses.push(Clause::from(vec![
            Literal::new(prev_aux),
            Literal::new(-xi),
            Literal::new(-curr_aux),
        ]));
        clauses.push(Clause::from(vec![
            Literal::new(-prev_aux),
            Literal::new(xi),
            Literal::new(-curr_aux),
        ]));
        clauses.push(Clause::from(vec![
            Literal::new(-prev_aux),
            Literal::new(-xi),
            Literal::new(curr_aux),
        ]));
    }

    let final_aux = (aux_start + num_vars - 1) as i32;
    clauses.push(Clause::from(vec![Literal::new(final_aux)]));

    CnfFormula::new(aux_start + num_vars - 1, clauses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cnf::check_assignment;

    #[test]
    fn three_sat_is_reproducible_for_a_fixed_seed() {
        let a = generate_random_3sat(20, 80, 42);
        let b = generate_random_3sat(20, 80, 42);
        assert_eq!(a.clauses.len(), b.clauses.len());
        for (ca, cb) in a.clauses.iter().zip(b.clauses.iter()) {
            assert_eq!(ca.literals, cb.literals);
        }
    }

    #[test]
    fn pigeonhole_var_count_matches_encoding() {
        let formula = generate_pigeonhole(3, 2);
        assert_eq!(formula.num_vars, 6);
        // 3 "pigeon has a hole" clauses + 2 holes * C(3,2) exclusion clauses
        assert_eq!(formula.clauses.len(), 3 + 2 * 3);
    }

    #[test]
    fn parity_chain_is_satisfiable_with_even_number_of_negations() {
        let formula = generate_parity(3);
        let (solution, _) = crate::solver::dpll::solve(&formula);
        let assignment = solution.expect("odd-parity chain over 3 vars is satisfiable");
        assert!(check_assignment(&formula.clauses, &assignment));
    }
}
