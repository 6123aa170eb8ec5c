//! Type symbols and the compatibility relation between them

use crate::primitives::Primitive;
use crate::scope::ScopeRef;
use crate::symbol::Callable;
use pasco_tokens::Position;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// A shared reference to a type
pub type TypeRef = Arc<SymbolType>;

/// A type that an expression or declaration can have
#[derive(Debug)]
pub enum SymbolType {
    Primitive(Primitive),
    Alias(Alias),
    Record(Record),
    Array(Array),
    /// Procedures and functions, used as the type of a bare callable name
    Callable(Arc<Callable>),
}

impl SymbolType {
    /// The name of this type
    pub fn name(&self) -> &str {
        match self {
            SymbolType::Primitive(p) => p.name(),
            SymbolType::Alias(alias) => &alias.name,
            SymbolType::Record(_) => "record",
            SymbolType::Array(_) => "array",
            SymbolType::Callable(callable) => callable.name(),
        }
    }

    /// Gets the primitive this type resolves to, if any
    pub fn primitive(&self) -> Option<Primitive> {
        match self {
            SymbolType::Primitive(p) => Some(*p),
            SymbolType::Alias(alias) => alias.target.primitive(),
            _ => None,
        }
    }

    /// Gets the callable this type resolves to, if any
    pub fn as_callable(&self) -> Option<&Arc<Callable>> {
        match self {
            SymbolType::Callable(callable) => Some(callable),
            _ => None,
        }
    }
}

impl Display for SymbolType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SymbolType::Array(array) => write!(f, "array of {}", array.element),
            SymbolType::Callable(callable) => {
                write!(f, "{} {}", callable.class(), callable.name())
            }
            other => write!(f, "{}", other.name()),
        }
    }
}

/// A named alias for another type
#[derive(Debug)]
pub struct Alias {
    name: String,
    target: TypeRef,
}

impl Alias {
    pub fn new(name: impl Into<String>, target: TypeRef) -> Self {
        Self {
            name: name.into(),
            target,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type this alias directly names, which may itself be an alias
    pub fn target(&self) -> &TypeRef {
        &self.target
    }
}

/// A record type, a table of named fields
#[derive(Debug)]
pub struct Record {
    fields: ScopeRef,
}

impl Record {
    pub fn new(fields: ScopeRef) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &ScopeRef {
        &self.fields
    }

    /// Gets the type of a field
    pub fn field_type(&self, name: &str) -> Option<TypeRef> {
        let fields = self.fields.read_recursive();
        fields
            .get(name)
            .ok()
            .and_then(|symbol| symbol.as_variable())
            .map(|var| var.ty().clone())
    }
}

/// One bound of an array range
#[derive(Debug, Clone, PartialEq)]
pub enum Bound {
    /// An integer literal bound
    Constant(i64),
    /// A bound computed from an expression, located at the given position
    Dynamic(Position),
}

impl Display for Bound {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Bound::Constant(c) => write!(f, "{c}"),
            Bound::Dynamic(pos) => write!(f, "<expr at {pos}>"),
        }
    }
}

/// An array type over a single index range
#[derive(Debug)]
pub struct Array {
    element: TypeRef,
    low: Bound,
    high: Bound,
}

impl Array {
    pub fn new(element: TypeRef, low: Bound, high: Bound) -> Self {
        Self { element, low, high }
    }

    pub fn element(&self) -> &TypeRef {
        &self.element
    }

    pub fn low(&self) -> &Bound {
        &self.low
    }

    pub fn high(&self) -> &Bound {
        &self.high
    }
}

/// Follows aliases until a type that is not an alias is reached
pub fn resolve(ty: &TypeRef) -> TypeRef {
    let mut current = ty.clone();
    while let SymbolType::Alias(alias) = &*current {
        let next = alias.target.clone();
        current = next;
    }
    current
}

/// Checks whether two types are compatible.
///
/// Both sides are resolved first. Primitives are compatible with themselves,
/// records when they have the same field names with compatible types, arrays
/// when their element types are compatible, and callables only with themselves.
pub fn is_compatible(a: &TypeRef, b: &TypeRef) -> bool {
    let a = resolve(a);
    let b = resolve(b);
    if Arc::ptr_eq(&a, &b) {
        return true;
    }
    match (&*a, &*b) {
        (SymbolType::Primitive(l), SymbolType::Primitive(r)) => l == r,
        (SymbolType::Record(l), SymbolType::Record(r)) => {
            // equal field counts keep the relation symmetric, a record with
            // extra fields matches in neither direction
            let l_fields = l.fields.read_recursive();
            let r_fields = r.fields.read_recursive();
            l_fields.len() == r_fields.len()
                && l_fields.iter().all(|(name, symbol)| {
                    let Some(l_field) = symbol.as_variable() else {
                        return false;
                    };
                    match r_fields.get(name).ok().and_then(|s| s.as_variable()) {
                        Some(r_field) => is_compatible(r_field.ty(), l_field.ty()),
                        None => false,
                    }
                })
        }
        (SymbolType::Array(l), SymbolType::Array(r)) => is_compatible(&l.element, &r.element),
        (SymbolType::Callable(l), SymbolType::Callable(r)) => Arc::ptr_eq(l, r),
        _ => false,
    }
}

/// Checks whether a type resolves to the given primitive
pub fn is_primitive(ty: &TypeRef, primitive: Primitive) -> bool {
    ty.primitive() == Some(primitive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{BOOLEAN, INTEGER, REAL, STRING};
    use crate::scope::SymbolTable;
    use crate::symbol::{Symbol, VarKind, Variable};
    use test_log::test;

    fn record(fields: &[(&str, &TypeRef)]) -> TypeRef {
        let table = SymbolTable::new_ref();
        for (name, ty) in fields {
            table
                .write()
                .insert(Symbol::variable(Variable::new(
                    *name,
                    (*ty).clone(),
                    VarKind::Variable,
                )))
                .unwrap();
        }
        Arc::new(SymbolType::Record(Record::new(table)))
    }

    #[test]
    fn test_alias_chain_resolves_to_target() {
        let first = Arc::new(SymbolType::Alias(Alias::new("first", INTEGER.clone())));
        let second = Arc::new(SymbolType::Alias(Alias::new("second", first.clone())));
        assert!(Arc::ptr_eq(&resolve(&second), &INTEGER));
        assert!(is_compatible(&second, &INTEGER));
        assert!(is_compatible(&first, &second));
        assert!(!is_compatible(&second, &REAL));
        assert!(is_primitive(&second, Primitive::Integer));
    }

    #[test]
    fn test_records_compare_structurally() {
        let r1 = record(&[("a", &INTEGER)]);
        let r2 = record(&[("a", &INTEGER)]);
        let r3 = record(&[("a", &INTEGER), ("b", &INTEGER)]);
        let r4 = record(&[("a", &BOOLEAN)]);
        assert!(is_compatible(&r1, &r2));
        assert!(is_compatible(&r2, &r1));
        assert!(!is_compatible(&r3, &r1));
        assert!(!is_compatible(&r1, &r3));
        assert!(!is_compatible(&r1, &r4));
    }

    #[test]
    fn test_arrays_ignore_bounds() {
        let a = Arc::new(SymbolType::Array(Array::new(
            STRING.clone(),
            Bound::Constant(1),
            Bound::Constant(10),
        )));
        let b = Arc::new(SymbolType::Array(Array::new(
            STRING.clone(),
            Bound::Constant(0),
            Bound::Dynamic(Position::new(3, 4)),
        )));
        let c = Arc::new(SymbolType::Array(Array::new(
            INTEGER.clone(),
            Bound::Constant(1),
            Bound::Constant(10),
        )));
        assert!(is_compatible(&a, &b));
        assert!(!is_compatible(&a, &c));
        assert!(!is_compatible(&a, &STRING));
    }
}
