//! Named entities stored within a scope

use crate::scope::ScopeRef;
use crate::ty::{SymbolType, TypeRef};
use pasco_tokens::Position;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// A named, declared entity
#[derive(Debug, Clone)]
pub enum Symbol {
    /// A primitive type or a type alias
    Type(TypeRef),
    /// Variables, constants and parameters
    Variable(Arc<Variable>),
    /// Procedures and functions
    Callable(Arc<Callable>),
}

impl Symbol {
    /// Creates a type symbol
    pub fn ty(ty: TypeRef) -> Self {
        Self::Type(ty)
    }

    /// Creates a variable-like symbol
    pub fn variable(var: Variable) -> Self {
        Self::Variable(Arc::new(var))
    }

    /// Gets the name of this symbol
    pub fn name(&self) -> &str {
        match self {
            Symbol::Type(ty) => ty.name(),
            Symbol::Variable(var) => var.name(),
            Symbol::Callable(callable) => callable.name(),
        }
    }

    /// The class of this symbol, as shown in symbol table dumps
    pub fn class(&self) -> &'static str {
        match self {
            Symbol::Type(ty) => match &**ty {
                SymbolType::Primitive(_) => "primitive type",
                SymbolType::Alias(_) => "alias",
                SymbolType::Record(_) => "record",
                SymbolType::Array(_) => "array",
                SymbolType::Callable(callable) => callable.class(),
            },
            Symbol::Variable(var) => var.kind().class(),
            Symbol::Callable(callable) => callable.class(),
        }
    }

    pub fn as_variable(&self) -> Option<&Arc<Variable>> {
        match self {
            Symbol::Variable(var) => Some(var),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Arc<Callable>> {
        match self {
            Symbol::Callable(callable) => Some(callable),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<&TypeRef> {
        match self {
            Symbol::Type(ty) => Some(ty),
            _ => None,
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.class(), self.name())
    }
}

/// How a parameter is passed
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ParamMode {
    /// Passed by value, no modifier
    Value,
    /// `const` parameters
    Const,
    /// `var` parameters, passed by reference
    Var,
}

/// The kind of a variable-like symbol
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum VarKind {
    Variable,
    Const,
    Param(ParamMode),
}

impl VarKind {
    pub fn class(&self) -> &'static str {
        match self {
            VarKind::Variable => "variable",
            VarKind::Const => "const",
            VarKind::Param(ParamMode::Value) => "param",
            VarKind::Param(ParamMode::Var) => "parameter variable reference",
            VarKind::Param(ParamMode::Const) => "const parameter",
        }
    }

    pub fn is_param(&self) -> bool {
        matches!(self, VarKind::Param(_))
    }
}

/// A variable, constant or parameter
#[derive(Debug)]
pub struct Variable {
    name: String,
    ty: TypeRef,
    kind: VarKind,
}

impl Variable {
    pub fn new(name: impl Into<String>, ty: TypeRef, kind: VarKind) -> Self {
        Self {
            name: name.into(),
            ty,
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn kind(&self) -> VarKind {
        self.kind
    }
}

/// Whether a callable returns a value
#[derive(Debug)]
pub enum CallableKind {
    Procedure,
    Function { returns: TypeRef },
}

/// A procedure or a function.
///
/// The local scope holds the parameters in declaration order along with every
/// other local declaration. Parameter count and parameter types are derived
/// from it.
#[derive(Debug)]
pub struct Callable {
    name: String,
    kind: CallableKind,
    locals: ScopeRef,
    position: Position,
}

impl Callable {
    pub fn new(name: impl Into<String>, kind: CallableKind, locals: ScopeRef, position: Position) -> Self {
        Self {
            name: name.into(),
            kind,
            locals,
            position,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &CallableKind {
        &self.kind
    }

    /// Where the declaration of this callable starts
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn class(&self) -> &'static str {
        match self.kind {
            CallableKind::Procedure => "procedure",
            CallableKind::Function { .. } => "function",
        }
    }

    /// The return type, if this is a function
    pub fn returns(&self) -> Option<&TypeRef> {
        match &self.kind {
            CallableKind::Procedure => None,
            CallableKind::Function { returns } => Some(returns),
        }
    }

    pub fn locals(&self) -> &ScopeRef {
        &self.locals
    }

    /// The parameters of this callable, in declaration order
    pub fn params(&self) -> Vec<Arc<Variable>> {
        self.locals
            .read_recursive()
            .iter()
            .filter_map(|(_, symbol)| symbol.as_variable())
            .filter(|var| var.kind().is_param())
            .cloned()
            .collect()
    }

    /// The number of declared parameters
    pub fn param_count(&self) -> usize {
        self.params().len()
    }
}
