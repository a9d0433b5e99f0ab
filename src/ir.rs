//! Three-address style IR consumed by the analysis.
//!
//! Expressions and statements are closed enums: every consumer matches
//! exhaustively, so adding a shape forces each site to decide how to treat it.

use std::fmt;
use std::sync::Arc;

use crate::types::{Type, Var};

/// Literal constants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    Int(i32),
    Long(i64),
    String(Arc<str>),
    Null,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BitwiseOp {
    Or,
    And,
    Xor,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShiftOp {
    /// `<<`
    Shl,
    /// `>>`, arithmetic
    Shr,
    /// `>>>`, logical
    Ushr,
}

/// Relational operators producing a boolean.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ConditionOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

/// Three-way compares on `long`/`float`/`double` operands.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Cmp,
    Cmpl,
    Cmpg,
}

/// Binary operator, tagged by category.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Arithmetic(ArithmeticOp),
    Bitwise(BitwiseOp),
    Shift(ShiftOp),
    Condition(ConditionOp),
    Comparison(ComparisonOp),
}

impl BinaryOp {
    /// Returns `true` for integer division and remainder.
    pub fn is_div_or_rem(self) -> bool {
        matches!(self, BinaryOp::Arithmetic(ArithmeticOp::Div | ArithmeticOp::Rem))
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Arithmetic(op) => match op {
                ArithmeticOp::Add => "+",
                ArithmeticOp::Sub => "-",
                ArithmeticOp::Mul => "*",
                ArithmeticOp::Div => "/",
                ArithmeticOp::Rem => "%",
            },
            BinaryOp::Bitwise(op) => match op {
                BitwiseOp::Or => "|",
                BitwiseOp::And => "&",
                BitwiseOp::Xor => "^",
            },
            BinaryOp::Shift(op) => match op {
                ShiftOp::Shl => "<<",
                ShiftOp::Shr => ">>",
                ShiftOp::Ushr => ">>>",
            },
            BinaryOp::Condition(op) => match op {
                ConditionOp::Eq => "==",
                ConditionOp::Ne => "!=",
                ConditionOp::Gt => ">",
                ConditionOp::Ge => ">=",
                ConditionOp::Lt => "<",
                ConditionOp::Le => "<=",
            },
            BinaryOp::Comparison(op) => match op {
                ComparisonOp::Cmp => "cmp",
                ComparisonOp::Cmpl => "cmpl",
                ComparisonOp::Cmpg => "cmpg",
            },
        }
    }
}

impl From<ArithmeticOp> for BinaryOp {
    fn from(op: ArithmeticOp) -> Self {
        BinaryOp::Arithmetic(op)
    }
}

impl From<BitwiseOp> for BinaryOp {
    fn from(op: BitwiseOp) -> Self {
        BinaryOp::Bitwise(op)
    }
}

impl From<ShiftOp> for BinaryOp {
    fn from(op: ShiftOp) -> Self {
        BinaryOp::Shift(op)
    }
}

impl From<ConditionOp> for BinaryOp {
    fn from(op: ConditionOp) -> Self {
        BinaryOp::Condition(op)
    }
}

impl From<ComparisonOp> for BinaryOp {
    fn from(op: ComparisonOp) -> Self {
        BinaryOp::Comparison(op)
    }
}

/// A method call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InvokeExp {
    /// Receiver for instance calls.
    pub base: Option<Var>,
    pub method: Arc<str>,
    pub args: Vec<Var>,
}

impl InvokeExp {
    pub fn new_static(method: &str, args: Vec<Var>) -> Self {
        InvokeExp {
            base: None,
            method: Arc::from(method),
            args,
        }
    }

    pub fn new_virtual(base: Var, method: &str, args: Vec<Var>) -> Self {
        InvokeExp {
            base: Some(base),
            method: Arc::from(method),
            args,
        }
    }
}

/// Right-hand-side expressions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Exp {
    Literal(Literal),
    Var(Var),
    Binary {
        op: BinaryOp,
        lhs: Box<Exp>,
        rhs: Box<Exp>,
    },
    Neg(Box<Exp>),
    Cast {
        ty: Type,
        value: Box<Exp>,
    },
    InstanceFieldAccess {
        base: Var,
        field: Arc<str>,
    },
    StaticFieldAccess {
        class: Arc<str>,
        field: Arc<str>,
    },
    ArrayAccess {
        base: Var,
        index: Box<Exp>,
    },
    ArrayLength(Var),
    New(Type),
    InstanceOf {
        value: Var,
        ty: Type,
    },
    Invoke(InvokeExp),
}

impl Exp {
    pub fn int(n: i32) -> Self {
        Exp::Literal(Literal::Int(n))
    }

    pub fn var(var: &Var) -> Self {
        Exp::Var(var.clone())
    }

    pub fn binary(op: impl Into<BinaryOp>, lhs: Exp, rhs: Exp) -> Self {
        Exp::Binary {
            op: op.into(),
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn add(self, other: Exp) -> Self {
        Exp::binary(ArithmeticOp::Add, self, other)
    }

    pub fn sub(self, other: Exp) -> Self {
        Exp::binary(ArithmeticOp::Sub, self, other)
    }

    pub fn mul(self, other: Exp) -> Self {
        Exp::binary(ArithmeticOp::Mul, self, other)
    }

    pub fn div(self, other: Exp) -> Self {
        Exp::binary(ArithmeticOp::Div, self, other)
    }

    pub fn rem(self, other: Exp) -> Self {
        Exp::binary(ArithmeticOp::Rem, self, other)
    }

    pub fn cond(self, op: ConditionOp, other: Exp) -> Self {
        Exp::binary(op, self, other)
    }
}

impl From<&Var> for Exp {
    fn from(var: &Var) -> Self {
        Exp::Var(var.clone())
    }
}

impl From<i32> for Exp {
    fn from(n: i32) -> Self {
        Exp::int(n)
    }
}

impl fmt::Display for Exp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exp::Literal(lit) => match lit {
                Literal::Int(n) => write!(f, "{}", n),
                Literal::Long(n) => write!(f, "{}L", n),
                Literal::String(s) => write!(f, "{:?}", s),
                Literal::Null => write!(f, "null"),
            },
            Exp::Var(v) => write!(f, "{}", v),
            Exp::Binary { op, lhs, rhs } => write!(f, "{} {} {}", lhs, op.symbol(), rhs),
            Exp::Neg(e) => write!(f, "-{}", e),
            Exp::Cast { ty, value } => write!(f, "({}) {}", ty, value),
            Exp::InstanceFieldAccess { base, field } => write!(f, "{}.{}", base, field),
            Exp::StaticFieldAccess { class, field } => write!(f, "{}.{}", class, field),
            Exp::ArrayAccess { base, index } => write!(f, "{}[{}]", base, index),
            Exp::ArrayLength(base) => write!(f, "{}.length", base),
            Exp::New(ty) => write!(f, "new {}", ty),
            Exp::InstanceOf { value, ty } => write!(f, "{} instanceof {}", value, ty),
            Exp::Invoke(call) => {
                if let Some(base) = &call.base {
                    write!(f, "{}.", base)?;
                }
                write!(f, "{}(", call.method)?;
                for (i, arg) in call.args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Assignment targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LValue {
    Var(Var),
    InstanceField { base: Var, field: Arc<str> },
    StaticField { class: Arc<str>, field: Arc<str> },
    ArrayElement { base: Var, index: Var },
}

impl LValue {
    /// Returns the target variable, if this is a plain local.
    pub fn as_var(&self) -> Option<&Var> {
        match self {
            LValue::Var(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for LValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LValue::Var(v) => write!(f, "{}", v),
            LValue::InstanceField { base, field } => write!(f, "{}.{}", base, field),
            LValue::StaticField { class, field } => write!(f, "{}.{}", class, field),
            LValue::ArrayElement { base, index } => write!(f, "{}[{}]", base, index),
        }
    }
}

/// Statements. Jump targets are indices into the statement list the CFG
/// was built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Stmt {
    Nop,
    Assign {
        lvalue: LValue,
        rvalue: Exp,
    },
    /// Call statement; `call` is always an [`Exp::Invoke`].
    Invoke {
        result: Option<Var>,
        call: Exp,
    },
    If {
        condition: Exp,
        target: usize,
    },
    Goto {
        target: usize,
    },
    Return(Option<Var>),
}

impl Stmt {
    /// `var = rvalue`
    pub fn assign(var: &Var, rvalue: impl Into<Exp>) -> Self {
        Stmt::Assign {
            lvalue: LValue::Var(var.clone()),
            rvalue: rvalue.into(),
        }
    }

    /// `result = call`, or a bare call when `result` is `None`.
    pub fn invoke(result: Option<&Var>, call: InvokeExp) -> Self {
        Stmt::Invoke {
            result: result.cloned(),
            call: Exp::Invoke(call),
        }
    }

    /// Returns `(lvalue, rvalue)` if this statement defines something.
    ///
    /// An invoke with a result variable is a definition whose right-hand side
    /// is the call itself.
    pub fn definition(&self) -> Option<(LValue, &Exp)> {
        match self {
            Stmt::Assign { lvalue, rvalue } => Some((lvalue.clone(), rvalue)),
            Stmt::Invoke { result: Some(var), call } => Some((LValue::Var(var.clone()), call)),
            Stmt::Invoke { result: None, .. }
            | Stmt::Nop
            | Stmt::If { .. }
            | Stmt::Goto { .. }
            | Stmt::Return(_) => None,
        }
    }

    /// Jump target, for `If` and `Goto`.
    pub fn jump_target(&self) -> Option<usize> {
        match self {
            Stmt::If { target, .. } | Stmt::Goto { target } => Some(*target),
            _ => None,
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Nop => write!(f, "nop"),
            Stmt::Assign { lvalue, rvalue } => write!(f, "{} = {}", lvalue, rvalue),
            Stmt::Invoke { result: Some(var), call } => write!(f, "{} = {}", var, call),
            Stmt::Invoke { result: None, call } => write!(f, "{}", call),
            Stmt::If { condition, target } => write!(f, "if ({}) goto {}", condition, target),
            Stmt::Goto { target } => write!(f, "goto {}", target),
            Stmt::Return(Some(var)) => write!(f, "return {}", var),
            Stmt::Return(None) => write!(f, "return"),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::types::PrimitiveType;

    #[test]
    fn test_assign_is_definition() {
        let x = Var::new(0, "x", PrimitiveType::Int);
        let stmt = Stmt::assign(&x, Exp::int(3));
        let (lvalue, rvalue) = stmt.definition().unwrap();
        assert_eq!(lvalue.as_var(), Some(&x));
        assert_eq!(rvalue, &Exp::int(3));
    }

    #[test]
    fn test_invoke_with_result_is_definition() {
        let x = Var::new(0, "x", PrimitiveType::Int);
        let stmt = Stmt::invoke(Some(&x), InvokeExp::new_static("foo", vec![]));
        let (lvalue, rvalue) = stmt.definition().unwrap();
        assert_eq!(lvalue.as_var(), Some(&x));
        assert!(matches!(rvalue, Exp::Invoke(_)));

        let bare = Stmt::invoke(None, InvokeExp::new_static("foo", vec![]));
        assert!(bare.definition().is_none());
    }

    #[test]
    fn test_non_definitions() {
        assert!(Stmt::Nop.definition().is_none());
        assert!(Stmt::Goto { target: 0 }.definition().is_none());
        assert!(Stmt::Return(None).definition().is_none());
    }

    #[test]
    fn test_jump_target() {
        let x = Var::new(0, "x", PrimitiveType::Int);
        let branch = Stmt::If {
            condition: Exp::var(&x).cond(ConditionOp::Ne, Exp::int(0)),
            target: 3,
        };
        assert_eq!(branch.jump_target(), Some(3));
        assert_eq!(Stmt::Goto { target: 1 }.jump_target(), Some(1));
        assert_eq!(Stmt::Return(Some(x.clone())).jump_target(), None);
        assert_eq!(Stmt::assign(&x, 2).jump_target(), None);
    }

    #[test]
    fn test_field_store_target_is_not_var() {
        let o = Var::new(0, "o", crate::types::Type::class("A"));
        let lvalue = LValue::InstanceField {
            base: o,
            field: Arc::from("f"),
        };
        assert!(lvalue.as_var().is_none());
    }

    #[test]
    fn test_display() {
        let x = Var::new(0, "x", PrimitiveType::Int);
        let y = Var::new(1, "y", PrimitiveType::Int);
        let stmt = Stmt::assign(&y, Exp::var(&x).add(Exp::int(4)));
        assert_eq!(stmt.to_string(), "y = x + 4");
        let cmp = Stmt::If {
            condition: Exp::var(&x).cond(ConditionOp::Lt, Exp::int(10)),
            target: 7,
        };
        assert_eq!(cmp.to_string(), "if (x < 10) goto 7");
    }

    #[test]
    fn test_div_or_rem() {
        assert!(BinaryOp::from(ArithmeticOp::Div).is_div_or_rem());
        assert!(BinaryOp::from(ArithmeticOp::Rem).is_div_or_rem());
        assert!(!BinaryOp::from(ArithmeticOp::Mul).is_div_or_rem());
        assert!(!BinaryOp::from(ShiftOp::Shr).is_div_or_rem());
    }
}
