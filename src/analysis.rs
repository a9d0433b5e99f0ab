//! Data-flow analysis interface and the constant propagation instance.

use crate::cfg::Cfg;
use crate::eval::evaluate;
use crate::fact::CpFact;
use crate::ir::Stmt;
use crate::types::Var;
use crate::value::Value;

/// A data-flow analysis driven by [`Solver`][crate::solver::Solver].
///
/// The solver owns one `in` and one `out` fact per node and calls these
/// hooks until no fact changes. Implementations must be monotone for the
/// iteration to terminate.
pub trait DataflowAnalysis {
    type Fact: Clone;

    /// Whether facts flow from entry to exit.
    fn is_forward(&self) -> bool;

    /// Fact at the boundary node (entry for forward analyses, exit otherwise).
    fn new_boundary_fact(&self, cfg: &Cfg) -> Self::Fact;

    /// Fact every other node starts with.
    fn new_initial_fact(&self) -> Self::Fact;

    /// Meet `fact` into `target` in place.
    fn meet_into(&self, fact: &Self::Fact, target: &mut Self::Fact);

    /// Computes the output fact of `stmt` from `input` and stores it in `output`.
    ///
    /// Returns `true` if `output` changed.
    fn transfer_node(&self, stmt: &Stmt, input: &Self::Fact, output: &mut Self::Fact) -> bool;
}

/// Forward constant propagation over `int`-like locals.
///
/// Calls, field and array stores, and other inter-procedural effects are not
/// modeled: values flowing out of them are `NAC`, and stores through
/// non-local targets leave the fact unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantPropagation;

impl ConstantPropagation {
    /// Identifier hosts use to select this analysis.
    pub const ID: &'static str = "constprop";

    pub fn new() -> Self {
        ConstantPropagation
    }

    /// Returns `true` if `var` is tracked by this analysis.
    pub fn can_hold_int(var: &Var) -> bool {
        var.can_hold_int()
    }

    /// Meet of two lattice values.
    pub fn meet_value(&self, v1: Value, v2: Value) -> Value {
        v1.meet(v2)
    }
}

impl DataflowAnalysis for ConstantPropagation {
    type Fact = CpFact;

    fn is_forward(&self) -> bool {
        true
    }

    fn new_boundary_fact(&self, cfg: &Cfg) -> CpFact {
        // Parameters are unknown inputs.
        cfg.params()
            .iter()
            .filter(|param| Self::can_hold_int(param))
            .map(|param| (param.clone(), Value::Nac))
            .collect()
    }

    fn new_initial_fact(&self) -> CpFact {
        CpFact::new()
    }

    fn meet_into(&self, fact: &CpFact, target: &mut CpFact) {
        for (var, value) in fact.iter() {
            target.meet_update(var, value);
        }
    }

    fn transfer_node(&self, stmt: &Stmt, input: &CpFact, output: &mut CpFact) -> bool {
        let mut result = input.clone();
        if let Some((lvalue, rvalue)) = stmt.definition() {
            if let Some(def) = lvalue.as_var().filter(|var| Self::can_hold_int(var)) {
                let value = evaluate(rvalue, &result);
                log::trace!("{}: {} = {}", stmt, def, value);
                result.update(def.clone(), value);
            }
        }
        output.copy_from(&result)
    }
}
