//! Abstract evaluation of expressions.
//!
//! Arithmetic follows 32-bit two's-complement `int` semantics: overflow wraps,
//! shift amounts use only their low five bits, and division or remainder by
//! zero yields [`Value::Undef`] since such a point is never reached normally.

use crate::fact::CpFact;
use crate::ir::{ArithmeticOp, BinaryOp, BitwiseOp, ConditionOp, Exp, Literal, ShiftOp};
use crate::value::Value;

/// Evaluates the abstract value of `exp` under `fact`.
///
/// Only integer literals, variables and binary expressions are modeled;
/// everything else (fields, arrays, calls, casts, ...) is `NAC`.
pub fn evaluate(exp: &Exp, fact: &CpFact) -> Value {
    match exp {
        Exp::Literal(Literal::Int(n)) => Value::Constant(*n),
        Exp::Var(var) => fact.get(var),
        Exp::Binary { op, lhs, rhs } => {
            let v1 = evaluate(lhs, fact);
            let v2 = evaluate(rhs, fact);
            evaluate_binary(*op, v1, v2)
        }
        Exp::Literal(Literal::Long(_) | Literal::String(_) | Literal::Null)
        | Exp::Neg(_)
        | Exp::Cast { .. }
        | Exp::InstanceFieldAccess { .. }
        | Exp::StaticFieldAccess { .. }
        | Exp::ArrayAccess { .. }
        | Exp::ArrayLength(_)
        | Exp::New(_)
        | Exp::InstanceOf { .. }
        | Exp::Invoke(_) => Value::Nac,
    }
}

/// Combines two operand values under a binary operator.
pub fn evaluate_binary(op: BinaryOp, v1: Value, v2: Value) -> Value {
    match (v1, v2) {
        (Value::Constant(x), Value::Constant(y)) => calculate(op, x, y),
        // `x / 0` never completes normally.
        (Value::Nac, Value::Constant(0)) if op.is_div_or_rem() => Value::Undef,
        (Value::Nac, _) | (_, Value::Nac) => Value::Nac,
        (Value::Undef, _) | (_, Value::Undef) => Value::Undef,
    }
}

/// Applies `op` to two known integers.
pub fn calculate(op: BinaryOp, x: i32, y: i32) -> Value {
    match op {
        BinaryOp::Arithmetic(op) => match op {
            ArithmeticOp::Add => Value::Constant(x.wrapping_add(y)),
            ArithmeticOp::Sub => Value::Constant(x.wrapping_sub(y)),
            ArithmeticOp::Mul => Value::Constant(x.wrapping_mul(y)),
            ArithmeticOp::Div if y == 0 => Value::Undef,
            ArithmeticOp::Div => Value::Constant(x.wrapping_div(y)),
            ArithmeticOp::Rem if y == 0 => Value::Undef,
            ArithmeticOp::Rem => Value::Constant(x.wrapping_rem(y)),
        },
        BinaryOp::Bitwise(op) => match op {
            BitwiseOp::Or => Value::Constant(x | y),
            BitwiseOp::And => Value::Constant(x & y),
            BitwiseOp::Xor => Value::Constant(x ^ y),
        },
        BinaryOp::Shift(op) => {
            let amount = y as u32;
            match op {
                ShiftOp::Shl => Value::Constant(x.wrapping_shl(amount)),
                ShiftOp::Shr => Value::Constant(x.wrapping_shr(amount)),
                ShiftOp::Ushr => Value::Constant((x as u32).wrapping_shr(amount) as i32),
            }
        }
        BinaryOp::Condition(op) => {
            let b = match op {
                ConditionOp::Eq => x == y,
                ConditionOp::Ne => x != y,
                ConditionOp::Gt => x > y,
                ConditionOp::Ge => x >= y,
                ConditionOp::Lt => x < y,
                ConditionOp::Le => x <= y,
            };
            Value::from_bool(b)
        }
        BinaryOp::Comparison(op) => {
            log::warn!("Unexpected {:?} on int operands {} and {}", op, x, y);
            Value::Nac
        }
    }
}
