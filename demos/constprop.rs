//! Runs constant propagation over a few built-in method bodies and prints the
//! facts before and after every statement.
//!
//! ```bash
//! cargo run --example constprop -- --scenario loop --log-level debug
//! ```

use clap::{Parser, ValueEnum};
use constprop::{Cfg, ConditionOp, ConstantPropagation, Exp, InvokeExp, PrimitiveType, Solver, Stmt, Var};

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Scenario {
    /// a = 3; b = a + 4; c = b * 2
    Straight,
    /// Two branches assigning different constants
    Merge,
    /// Counting loop
    Loop,
    /// Parameters, calls and division by zero
    Params,
}

#[derive(Debug, Parser)]
#[command(about = "Constant propagation demo")]
struct Cli {
    /// Method body to analyze.
    #[arg(long, value_enum, default_value = "straight")]
    scenario: Scenario,

    /// Bound on solver node visits.
    #[arg(long, default_value_t = 10_000)]
    max_iterations: usize,

    /// Log level.
    #[arg(long, default_value = "info")]
    log_level: simplelog::LevelFilter,
}

fn int(index: usize, name: &str) -> Var {
    Var::new(index, name, PrimitiveType::Int)
}

fn build(scenario: Scenario) -> Cfg {
    match scenario {
        Scenario::Straight => {
            let a = int(0, "a");
            let b = int(1, "b");
            let c = int(2, "c");
            Cfg::from_stmts(
                "straight",
                vec![],
                vec![
                    Stmt::assign(&a, 3),
                    Stmt::assign(&b, Exp::var(&a).add(Exp::int(4))),
                    Stmt::assign(&c, Exp::var(&b).mul(Exp::int(2))),
                ],
            )
        }
        Scenario::Merge => {
            let p = int(0, "p");
            let x = int(1, "x");
            let y = int(2, "y");
            Cfg::from_stmts(
                "merge",
                vec![p.clone()],
                vec![
                    Stmt::If {
                        condition: Exp::var(&p).cond(ConditionOp::Gt, Exp::int(0)),
                        target: 4,
                    },
                    Stmt::assign(&x, 5),
                    Stmt::assign(&y, 1),
                    Stmt::Goto { target: 6 },
                    Stmt::assign(&x, 7),
                    Stmt::assign(&y, 1),
                    Stmt::Return(Some(x)),
                ],
            )
        }
        Scenario::Loop => {
            let i = int(0, "i");
            let step = int(1, "step");
            Cfg::from_stmts(
                "count",
                vec![],
                vec![
                    Stmt::assign(&i, 0),
                    Stmt::assign(&step, 2),
                    Stmt::If {
                        condition: Exp::var(&i).cond(ConditionOp::Ge, Exp::int(100)),
                        target: 5,
                    },
                    Stmt::assign(&i, Exp::var(&i).add(Exp::var(&step))),
                    Stmt::Goto { target: 2 },
                    Stmt::Return(Some(i)),
                ],
            )
        }
        Scenario::Params => {
            let n = int(0, "n");
            let flag = Var::new(1, "flag", PrimitiveType::Boolean);
            let zero = int(2, "zero");
            let q = int(3, "q");
            let r = int(4, "r");
            Cfg::from_stmts(
                "params",
                vec![n.clone(), flag],
                vec![
                    Stmt::assign(&zero, 0),
                    Stmt::assign(&q, Exp::var(&n).div(Exp::var(&zero))),
                    Stmt::invoke(Some(&r), InvokeExp::new_static("Math.abs", vec![n])),
                    Stmt::Return(Some(q)),
                ],
            )
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    simplelog::TermLogger::init(
        cli.log_level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let cfg = build(cli.scenario);
    let solver = Solver::new().with_max_iterations(cli.max_iterations);
    let result = solver.solve(&ConstantPropagation, &cfg);

    println!("method {} ({} nodes)", cfg.method(), cfg.len());
    for node in cfg.nodes() {
        let label = if cfg.is_entry(node) {
            "[entry]".to_string()
        } else if cfg.is_exit(node) {
            "[exit]".to_string()
        } else {
            cfg.stmt(node).to_string()
        };
        println!("{:>4}  {:<24} in={} out={}", node.to_string(), label, result.in_fact(node), result.out_fact(node));
    }
    println!(
        "{} after {} iterations",
        if result.converged() { "converged" } else { "gave up" },
        result.iterations()
    );

    Ok(())
}
