use std::time::Duration;

use clap::{Parser, Subcommand};
use log::LevelFilter;

use satire_core::bench::{self, BenchmarkKind};
use satire_core::cnf::{check_assignment, SolutionAssignment};
use satire_core::dimacs;
use satire_core::solver::cdcl;
use satire_core::solver::config::Config;
use satire_core::solver::dpll;
use satire_core::solver::restarts::RestartPolicy;

#[derive(Parser)]
#[command(author, version, about = "A DPLL/CDCL SAT solver", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a DIMACS CNF file.
    Solve {
        file: String,

        #[arg(long, value_enum, default_value = "cdcl")]
        mode: SolveMode,

        #[arg(long, value_enum, default_value = "fixed-interval")]
        restart_policy: RestartPolicy,

        #[arg(long)]
        max_learned_clauses: Option<usize>,

        #[arg(long, help = "Abort with an unknown verdict after this many seconds")]
        deadline_secs: Option<u64>,

        /// Shorthand for RUST_LOG=debug.
        #[arg(short, long)]
        verbose: bool,
    },
    /// Generate a synthetic benchmark instance and write it as DIMACS CNF.
    Generate {
        #[arg(value_enum)]
        kind: BenchmarkKind,
        output: String,

        #[arg(long, default_value_t = 10)]
        vars: usize,
        #[arg(long)]
        clauses: Option<usize>,
        #[arg(long)]
        pigeons: Option<usize>,
        #[arg(long)]
        holes: Option<usize>,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

#[derive(Debug, Copy, Clone, clap::ValueEnum)]
enum SolveMode {
    Dpll,
    Cdcl,
}

fn main() {
    let args = Args::parse();

    match &args.command {
        Command::Solve {
            file,
            mode,
            restart_policy,
            max_learned_clauses,
            deadline_secs,
            verbose,
        } => {
            install_logger(*verbose);
            run_solve(file, *mode, *restart_policy, *max_learned_clauses, *deadline_secs);
        }
        Command::Generate {
            kind,
            output,
            vars,
            clauses,
            pigeons,
            holes,
            seed,
        } => {
            install_logger(false);
            run_generate(*kind, output, *vars, *clauses, *pigeons, *holes, *seed);
        }
    }
}

fn install_logger(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn run_solve(
    file: &str,
    mode: SolveMode,
    restart_policy: RestartPolicy,
    max_learned_clauses: Option<usize>,
    deadline_secs: Option<u64>,
) {
    let formula = match dimacs::read_file(file) {
        Ok(formula) => formula,
        Err(err) => {
            eprintln!("error reading {file}: {err}");
            std::process::exit(1);
        }
    };

    let (solution, table) = match mode {
        SolveMode::Dpll => {
            let (solution, stats) = dpll::solve(&formula);
            (solution, stats.to_table())
        }
        SolveMode::Cdcl => {
            let mut config = Config::default().with_restart_policy(restart_policy);
            if let Some(max) = max_learned_clauses {
                config.max_learned_clauses = max;
            }
            if let Some(secs) = deadline_secs {
                config = config.with_deadline(Duration::from_secs(secs));
            }
            let (verdict, stats) = cdcl::solve(&formula, config, None);
            let solution = match verdict {
                cdcl::Verdict::Sat(assignment) => Some(assignment),
                cdcl::Verdict::Unsat => None,
                cdcl::Verdict::Unknown => {
                    println!("c search aborted: deadline exceeded");
                    println!("{}", stats.to_table());
                    std::process::exit(2);
                }
            };
            (solution, stats.to_table())
        }
    };

    println!("c {file}");
    print_verdict(&formula.clauses, formula.num_vars, solution.as_ref());
    println!("{table}");
}

fn print_verdict(
    clauses: &[satire_core::cnf::Clause],
    num_vars: usize,
    solution: Option<&SolutionAssignment>,
) {
    match solution {
        Some(assignment) => {
            println!("SATISFIABLE");
            for var in 1..=num_vars {
                let value = assignment.get(&var).copied().unwrap_or(true);
                println!("x{var} = {}", if value { "True" } else { "False" });
            }
            if !check_assignment(clauses, assignment) {
                eprintln!("c WARNING: returned assignment does not satisfy every clause");
            }
        }
        None => println!("UNSATISFIABLE"),
    }
}

fn run_generate(
    kind: BenchmarkKind,
    output: &str,
    vars: usize,
    clauses: Option<usize>,
    pigeons: Option<usize>,
    holes: Option<usize>,
    seed: u64,
) {
    let formula = match kind {
        BenchmarkKind::ThreeSat => {
            let num_clauses = clauses.unwrap_or_else(|| (vars as f64 * 4.3) as usize);
            bench::generate_random_3sat(vars, num_clauses, seed)
        }
        BenchmarkKind::Pigeonhole => {
            let pigeons = pigeons.unwrap_or(4);
            let holes = holes.unwrap_or(3);
            bench::generate_pigeonhole(pigeons, holes)
        }
        BenchmarkKind::Parity => bench::generate_parity(vars),
    };

    let num_clauses = formula.clauses.len();
    let num_vars = formula.num_vars;
    if let Err(err) = dimacs::write_file(output, &formula) {
        eprintln!("error writing {output}: {err}");
        std::process::exit(1);
    }
    println!("c generated {num_vars} vars, {num_clauses} clauses -> {output}");
}
