//! Worklist fixpoint solver for [`DataflowAnalysis`] instances.

use std::collections::VecDeque;

use crate::analysis::DataflowAnalysis;
use crate::cfg::{Cfg, NodeId};

/// Facts computed for every node of a [`Cfg`].
#[derive(Debug, Clone)]
pub struct DataflowResult<F> {
    in_facts: Vec<F>,
    out_facts: Vec<F>,
    iterations: usize,
    converged: bool,
}

impl<F> DataflowResult<F> {
    /// Fact holding before `node` executes.
    pub fn in_fact(&self, node: NodeId) -> &F {
        &self.in_facts[node.index()]
    }

    /// Fact holding after `node` executes.
    pub fn out_fact(&self, node: NodeId) -> &F {
        &self.out_facts[node.index()]
    }

    /// Number of node visits performed.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Whether a fixpoint was reached within the iteration bound.
    pub fn converged(&self) -> bool {
        self.converged
    }
}

/// Worklist solver.
///
/// Keeps one persistent `in` and `out` fact per node. Visiting a node meets
/// the facts of its flow predecessors into its input, applies the transfer
/// function, and re-queues its flow successors whenever the output changed.
#[derive(Debug, Clone)]
pub struct Solver {
    /// Bound on node visits before giving up.
    pub max_iterations: usize,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    pub fn new() -> Self {
        Self { max_iterations: 10_000 }
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Runs `analysis` over `cfg` until no fact changes.
    ///
    /// If the bound is hit, the facts computed so far are returned and
    /// [`DataflowResult::converged`] is `false`.
    pub fn solve<A: DataflowAnalysis>(&self, analysis: &A, cfg: &Cfg) -> DataflowResult<A::Fact> {
        let forward = analysis.is_forward();
        let boundary = if forward { cfg.entry() } else { cfg.exit() };

        // `inputs` are the facts flowing into a node along the analysis
        // direction, `outputs` the ones it produces.
        let mut inputs: Vec<A::Fact> = cfg.nodes().map(|_| analysis.new_initial_fact()).collect();
        let mut outputs: Vec<A::Fact> = cfg.nodes().map(|_| analysis.new_initial_fact()).collect();
        outputs[boundary.index()] = analysis.new_boundary_fact(cfg);

        let mut order: Vec<NodeId> = cfg.nodes().filter(|&n| n != boundary).collect();
        if forward {
            order.sort_by_key(|&n| cfg.is_exit(n));
        } else {
            order.reverse();
        }
        let mut queued = vec![false; cfg.len()];
        for &node in &order {
            queued[node.index()] = true;
        }
        let mut worklist: VecDeque<NodeId> = order.into();

        let mut iterations = 0;
        let mut converged = true;

        while let Some(node) = worklist.pop_front() {
            queued[node.index()] = false;

            if iterations == self.max_iterations {
                log::warn!(
                    "Analysis of '{}' did not converge after {} iterations",
                    cfg.method(),
                    iterations
                );
                converged = false;
                break;
            }
            iterations += 1;

            let (sources, targets) = if forward {
                (cfg.preds(node), cfg.succs(node))
            } else {
                (cfg.succs(node), cfg.preds(node))
            };

            let input = &mut inputs[node.index()];
            for &source in sources {
                analysis.meet_into(&outputs[source.index()], input);
            }

            if analysis.transfer_node(cfg.stmt(node), &inputs[node.index()], &mut outputs[node.index()]) {
                for &target in targets {
                    if target != boundary && !queued[target.index()] {
                        queued[target.index()] = true;
                        worklist.push_back(target);
                    }
                }
            }
        }

        if converged {
            log::debug!("Analysis of '{}' converged after {} iterations", cfg.method(), iterations);
        }

        let (in_facts, out_facts) = if forward { (inputs, outputs) } else { (outputs, inputs) };
        DataflowResult {
            in_facts,
            out_facts,
            iterations,
            converged,
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::analysis::ConstantPropagation;
    use crate::fact::CpFact;
    use crate::ir::{ConditionOp, Exp, Stmt};
    use crate::types::{PrimitiveType, Var};
    use crate::value::Value;

    fn int_var(index: usize, name: &str) -> Var {
        Var::new(index, name, PrimitiveType::Int)
    }

    /// Backward analysis: does the exit stay reachable from a node?
    struct ReachesExit;

    impl DataflowAnalysis for ReachesExit {
        type Fact = bool;

        fn is_forward(&self) -> bool {
            false
        }

        fn new_boundary_fact(&self, _cfg: &Cfg) -> bool {
            true
        }

        fn new_initial_fact(&self) -> bool {
            false
        }

        fn meet_into(&self, fact: &bool, target: &mut bool) {
            *target |= *fact;
        }

        fn transfer_node(&self, _stmt: &Stmt, input: &bool, output: &mut bool) -> bool {
            let changed = *input != *output;
            *output = *input;
            changed
        }
    }

    #[test]
    fn test_straight_line() {
        let a = int_var(0, "a");
        let b = int_var(1, "b");
        let c = int_var(2, "c");
        let cfg = Cfg::from_stmts(
            "f",
            vec![],
            vec![
                Stmt::assign(&a, 3),
                Stmt::assign(&b, Exp::var(&a).add(Exp::int(4))),
                Stmt::assign(&c, Exp::var(&b).mul(Exp::int(2))),
            ],
        );

        let result = Solver::new().solve(&ConstantPropagation, &cfg);
        assert!(result.converged());

        let at_exit = result.in_fact(cfg.exit());
        assert_eq!(at_exit.get(&a), Value::Constant(3));
        assert_eq!(at_exit.get(&b), Value::Constant(7));
        assert_eq!(at_exit.get(&c), Value::Constant(14));
    }

    #[test]
    fn test_loop_counter_becomes_nac() {
        let x = int_var(0, "x");
        let k = int_var(1, "k");
        // 0: x = 0
        // 1: k = 5
        // 2: if (x >= 10) goto 5
        // 3: x = x + 1
        // 4: goto 2
        // 5: return x
        let stmts = vec![
            Stmt::assign(&x, 0),
            Stmt::assign(&k, 5),
            Stmt::If {
                condition: Exp::var(&x).cond(ConditionOp::Ge, Exp::int(10)),
                target: 5,
            },
            Stmt::assign(&x, Exp::var(&x).add(Exp::int(1))),
            Stmt::Goto { target: 2 },
            Stmt::Return(Some(x.clone())),
        ];
        let cfg = Cfg::from_stmts("loop", vec![], stmts);

        let result = Solver::new().solve(&ConstantPropagation, &cfg);
        assert!(result.converged());

        let at_exit = result.in_fact(cfg.exit());
        assert_eq!(at_exit.get(&x), Value::Nac);
        assert_eq!(at_exit.get(&k), Value::Constant(5));
    }

    #[test]
    fn test_params_seeded_at_entry() {
        let p = int_var(0, "p");
        let y = int_var(1, "y");
        let cfg = Cfg::from_stmts("g", vec![p.clone()], vec![Stmt::assign(&y, Exp::var(&p).mul(Exp::int(0)))]);

        let result = Solver::new().solve(&ConstantPropagation, &cfg);
        assert_eq!(result.out_fact(cfg.entry()).get(&p), Value::Nac);
        assert_eq!(result.in_fact(cfg.exit()).get(&y), Value::Nac);
    }

    #[test]
    fn test_iteration_bound() {
        let x = int_var(0, "x");
        let cfg = Cfg::from_stmts("f", vec![], vec![Stmt::assign(&x, 1), Stmt::assign(&x, 2)]);

        let result = Solver::new().with_max_iterations(1).solve(&ConstantPropagation, &cfg);
        assert!(!result.converged());
        assert_eq!(result.iterations(), 1);
        assert_eq!(result.in_fact(cfg.exit()), &CpFact::new());

        // Exactly enough visits still counts as converged.
        let needed = Solver::new().solve(&ConstantPropagation, &cfg).iterations();
        let result = Solver::new().with_max_iterations(needed).solve(&ConstantPropagation, &cfg);
        assert!(result.converged());
        assert_eq!(result.iterations(), needed);

        let result = Solver::new().with_max_iterations(0).solve(&ConstantPropagation, &cfg);
        assert!(!result.converged());
        assert_eq!(result.iterations(), 0);
    }

    #[test]
    fn test_divisor_rising_to_zero_lowers_quotient() {
        let p = int_var(0, "p");
        let q = int_var(1, "q");
        let z = int_var(2, "z");
        // 0: if (p > 0) goto 4
        // 1: q = p / z
        // 2: z = 0
        // 3: goto 1
        // 4: return
        let stmts = vec![
            Stmt::If {
                condition: Exp::var(&p).cond(ConditionOp::Gt, Exp::int(0)),
                target: 4,
            },
            Stmt::assign(&q, Exp::var(&p).div(Exp::var(&z))),
            Stmt::assign(&z, 0),
            Stmt::Goto { target: 1 },
            Stmt::Return(None),
        ];
        let cfg = Cfg::from_stmts("div", vec![p.clone()], stmts);
        let node = |i: usize| cfg.nodes().nth(i + 2).unwrap();

        let result = Solver::new().solve(&ConstantPropagation, &cfg);
        assert!(result.converged());

        assert_eq!(result.in_fact(node(1)).get(&z), Value::Constant(0));
        assert_eq!(result.out_fact(node(1)).get(&q), Value::Undef);
        // Inputs only accumulate, so the NAC of the first visit stays.
        assert_eq!(result.in_fact(node(2)).get(&q), Value::Nac);
        assert_eq!(result.out_fact(node(2)).get(&z), Value::Constant(0));
        assert_eq!(result.in_fact(node(4)).get(&q), Value::Undef);
    }

    #[test]
    fn test_backward_direction() {
        let x = int_var(0, "x");
        let mut cfg = Cfg::new("h", vec![]);
        let live = cfg.add_node(Stmt::assign(&x, 1));
        let dead_end = cfg.add_node(Stmt::Nop);
        cfg.add_edge(cfg.entry(), live);
        cfg.add_edge(cfg.entry(), dead_end);
        cfg.add_edge(live, cfg.exit());

        let result = Solver::new().solve(&ReachesExit, &cfg);
        assert!(result.converged());
        assert!(*result.in_fact(live));
        assert!(*result.in_fact(cfg.entry()));
        assert!(!*result.in_fact(dead_end));
    }

    #[test]
    fn test_independent_methods_in_parallel() {
        let cfgs: Vec<Cfg> = (0..4i32)
            .map(|i| {
                let x = int_var(0, "x");
                Cfg::from_stmts(&format!("m{}", i), vec![], vec![Stmt::assign(&x, i)])
            })
            .collect();
        let solver = &Solver::new();

        let results: Vec<_> = std::thread::scope(|s| {
            let handles: Vec<_> = cfgs
                .iter()
                .map(|cfg| s.spawn(move || solver.solve(&ConstantPropagation, cfg)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for (i, (cfg, result)) in cfgs.iter().zip(&results).enumerate() {
            let x = int_var(0, "x");
            assert_eq!(result.in_fact(cfg.exit()).get(&x), Value::Constant(i as i32));
        }
    }
}
