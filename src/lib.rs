//! # constprop: intraprocedural constant propagation
//!
//! **`constprop`** computes, for every point of a method's control-flow graph,
//! which `int`-like locals are guaranteed to hold one known 32-bit value.
//!
//! ## The lattice
//!
//! Each tracked variable maps to a [`Value`]:
//!
//! - `Undef`: no definition reached yet (bottom)
//! - `Constant(n)`: exactly `n`
//! - `Nac`: not a constant (top)
//!
//! Two different constants meet to `Nac`. The lattice has height 3, so the
//! worklist iteration always terminates.
//!
//! ## Basic Usage
//!
//! ```rust
//! use constprop::{Cfg, ConstantPropagation, Exp, PrimitiveType, Solver, Stmt, Value, Var};
//!
//! let a = Var::new(0, "a", PrimitiveType::Int);
//! let b = Var::new(1, "b", PrimitiveType::Int);
//!
//! // a = 3; b = a + 4;
//! let cfg = Cfg::from_stmts(
//!     "example",
//!     vec![],
//!     vec![Stmt::assign(&a, 3), Stmt::assign(&b, Exp::var(&a).add(Exp::int(4)))],
//! );
//!
//! let result = Solver::new().solve(&ConstantPropagation, &cfg);
//! assert_eq!(result.in_fact(cfg.exit()).get(&b), Value::Constant(7));
//! ```
//!
//! ## Core Components
//!
//! - **[`value`]**: the lattice and its meet.
//! - **[`fact`]**: the per-point abstract store.
//! - **[`eval`]**: expression evaluation with exact `int` semantics.
//! - **[`analysis`]**: the [`DataflowAnalysis`] contract and [`ConstantPropagation`].
//! - **[`solver`]**: a worklist driver computing the fixpoint over a [`Cfg`].

pub mod analysis;
pub mod cfg;
pub mod eval;
pub mod fact;
pub mod ir;
pub mod solver;
pub mod types;
pub mod value;

pub use analysis::{ConstantPropagation, DataflowAnalysis};
pub use cfg::{Cfg, NodeId};
pub use eval::evaluate;
pub use fact::CpFact;
pub use ir::{ArithmeticOp, BinaryOp, BitwiseOp, ComparisonOp, ConditionOp, Exp, InvokeExp, LValue, Literal, ShiftOp, Stmt};
pub use solver::{DataflowResult, Solver};
pub use types::{PrimitiveType, Type, Var};
pub use value::Value;
