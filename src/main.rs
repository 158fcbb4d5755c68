//! Command line front-end to simplify, normalize or scramble Boolean expressions.

use boolsim::convert::Algorithm;
use boolsim::parse::SymbolParser;
use boolsim::rules::{FULL_SIMPLIFICATION_RULES, SCRAMBLING_RULES};
use boolsim::simplifier::{CnfSimplifier, DnfSimplifier, FullSimplifier, FullSimplifierConfig, Scrambler, Simplifier};
use boolsim::SymbolSpace;

use clap::{Parser, Subcommand};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Parser)]
#[command(name = "boolsim")]
#[command(about = "Simplify Boolean expressions")]
#[command(arg_required_else_help = true)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reduce the expression using normal forms, evaluation and rewrite rules
    Full {
        /// Number of permuting rounds in one simplification step
        #[arg(short = 'p', default_value_t = 3)]
        permuting_iterations: usize,

        /// Early pruning of the expressions which are much worse than the others
        #[arg(short = 'c', default_value_t = 2.5)]
        confidence_factor: f64,

        /// Expressions below this complexity are not pruned early
        #[arg(short = 'm', default_value_t = 10)]
        confidence_min_complexity: i32,

        /// Maximal number of expressions kept for the next step
        #[arg(short = 'q', default_value_t = 8)]
        max_preserved: usize,

        /// Maximal number of steps, negative to run until done
        #[arg(short = 's', default_value_t = -1, allow_negative_numbers = true)]
        steps: i64,

        /// Trace the simplification process
        #[arg(short = 'v')]
        verbose: bool,

        /// Expression to simplify
        expr: String,
    },

    /// Reduce the expression to a minimal conjunctive normal form
    Cnf {
        /// Minimization algorithm: karnaugh or quine
        #[arg(short = 'a', default_value = "karnaugh")]
        algorithm: Algorithm,

        /// Expression to simplify
        expr: String,
    },

    /// Reduce the expression to a minimal disjunctive normal form
    Dnf {
        /// Minimization algorithm: karnaugh or quine
        #[arg(short = 'a', default_value = "karnaugh")]
        algorithm: Algorithm,

        /// Expression to simplify
        expr: String,
    },

    /// Build a more complex equivalent expression, without adding symbols
    Scramble {
        /// Number of steps
        #[arg(short = 's', default_value_t = 3)]
        steps: usize,

        /// Maximal number of expressions kept for the next step (taken at random)
        #[arg(short = 'q', default_value_t = 16)]
        max_preserved: usize,

        /// Seed of the random generator
        #[arg(long)]
        seed: Option<u64>,

        /// Expression to scramble
        expr: String,
    },

    /// Compute the complexity of the expression
    Complexity {
        /// Expression to measure
        expr: String,
    },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let level = match &args.command {
        Command::Full { verbose: true, .. } => simplelog::LevelFilter::Debug,
        _ => simplelog::LevelFilter::Info,
    };
    simplelog::TermLogger::init(
        level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let mut space = SymbolSpace::extending();
    match args.command {
        Command::Full {
            permuting_iterations,
            confidence_factor,
            confidence_min_complexity,
            max_preserved,
            steps,
            verbose: _,
            expr,
        } => {
            let expr = space.parse_expression(&expr)?;
            info!("Initial complexity: {}", expr.complexity());
            let config = FullSimplifierConfig {
                confidence_factor,
                confidence_min_complexity,
                max_preserved_exprs: max_preserved,
                num_permuting_iterations: permuting_iterations,
            };
            let mut simplifier =
                FullSimplifier::with_config(&FULL_SIMPLIFICATION_RULES, &expr, config, boolsim::reduce::NoLookup)?;
            let best = match usize::try_from(steps) {
                Err(_) => simplifier.step_until_done()?,
                Ok(steps) => {
                    for _ in 0..steps {
                        simplifier.step()?;
                    }
                    simplifier.best_expr()
                }
            };
            info!("Final complexity: {}", best.complexity());
            println!("{}", space.named(&best));
        }
        Command::Cnf { algorithm, expr } => {
            let expr = space.parse_expression(&expr)?;
            let best = CnfSimplifier::new(algorithm, &expr).best_expr();
            println!("{}", space.named(&best));
        }
        Command::Dnf { algorithm, expr } => {
            let expr = space.parse_expression(&expr)?;
            let best = DnfSimplifier::new(algorithm, &expr).best_expr();
            println!("{}", space.named(&best));
        }
        Command::Scramble {
            steps,
            max_preserved,
            seed,
            expr,
        } => {
            let expr = space.parse_expression(&expr)?;
            let rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let mut scrambler = Scrambler::new(&SCRAMBLING_RULES, &expr, rng).with_max_preserved(max_preserved);
            let scrambled = scrambler.scramble(steps)?;
            println!("{}", space.named(&scrambled));
        }
        Command::Complexity { expr } => {
            let expr = space.parse_expression(&expr)?;
            println!("{}", expr.complexity());
        }
    }
    Ok(())
}
