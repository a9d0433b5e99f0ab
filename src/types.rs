//! Variables and their static types.
//!
//! A [`Var`] is a method-local variable of the analyzed IR. Two variables are the
//! same iff their index, name and type agree, so facts from different methods
//! never alias through a shared table.

use std::fmt;
use std::sync::Arc;

/// Primitive JVM-style types.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum PrimitiveType {
    Byte,
    Short,
    Int,
    Char,
    Boolean,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    /// Returns `true` for the types whose values fit a 32-bit `int` slot.
    pub fn is_int_like(self) -> bool {
        matches!(
            self,
            PrimitiveType::Byte | PrimitiveType::Short | PrimitiveType::Int | PrimitiveType::Char | PrimitiveType::Boolean
        )
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Char => "char",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        };
        write!(f, "{}", name)
    }
}

/// Static type of a variable.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Type {
    Primitive(PrimitiveType),
    /// Class or interface type, by name.
    Class(Arc<str>),
    /// Array with the given element type.
    Array(Box<Type>),
    Null,
}

impl Type {
    pub fn int() -> Self {
        Type::Primitive(PrimitiveType::Int)
    }

    pub fn boolean() -> Self {
        Type::Primitive(PrimitiveType::Boolean)
    }

    pub fn class(name: &str) -> Self {
        Type::Class(Arc::from(name))
    }

    pub fn array_of(elem: Type) -> Self {
        Type::Array(Box::new(elem))
    }

    /// Returns the primitive kind, if any.
    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self {
            Type::Primitive(p) => Some(*p),
            _ => None,
        }
    }
}

impl From<PrimitiveType> for Type {
    fn from(p: PrimitiveType) -> Self {
        Type::Primitive(p)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(p) => write!(f, "{}", p),
            Type::Class(name) => write!(f, "{}", name),
            Type::Array(elem) => write!(f, "{}[]", elem),
            Type::Null => write!(f, "null"),
        }
    }
}

/// A method-local variable.
///
/// Cloning is cheap: the name and class names are reference-counted.
///
/// # Invariants
///
/// - `index` is unique within one method body.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Var {
    index: usize,
    name: Arc<str>,
    ty: Type,
}

impl Var {
    /// Creates a new variable.
    pub fn new(index: usize, name: &str, ty: impl Into<Type>) -> Self {
        Var {
            index,
            name: Arc::from(name),
            ty: ty.into(),
        }
    }

    /// Position of this variable in its method's variable table.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    /// Returns `true` if this variable can hold an `int`-like value
    /// (byte, short, int, char, boolean).
    pub fn can_hold_int(&self) -> bool {
        self.ty.as_primitive().is_some_and(PrimitiveType::is_int_like)
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
