//! Scopes and the scope stack

use crate::error::ScopeError;
use crate::symbol::Symbol;
use indexmap::IndexMap;
use log::{debug, trace};
use parking_lot::RwLock;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// A shared, mutable scope.
///
/// Procedures keep a reference to their local scope while that scope is still
/// on the stack being filled in, so scopes are shared.
pub type ScopeRef = Arc<RwLock<SymbolTable>>;

/// An insertion ordered mapping of names to symbols
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: IndexMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new, empty shared scope
    pub fn new_ref() -> ScopeRef {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Gets a symbol by name
    pub fn get(&self, name: &str) -> Result<&Symbol, ScopeError> {
        self.symbols
            .get(name)
            .ok_or_else(|| ScopeError::Undeclared(name.to_string()))
    }

    /// Inserts a symbol under its own name, failing if the name is already taken
    pub fn insert(&mut self, symbol: Symbol) -> Result<(), ScopeError> {
        let name = symbol.name().to_string();
        if self.symbols.contains_key(&name) {
            return Err(ScopeError::AlreadyDeclared(name));
        }
        self.symbols.insert(name, symbol);
        Ok(())
    }

    /// Removes a symbol, keeping the order of the remaining symbols
    pub fn remove(&mut self, name: &str) -> Result<Symbol, ScopeError> {
        self.symbols
            .shift_remove(name)
            .ok_or_else(|| ScopeError::Undeclared(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterates over the symbols in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Symbol)> {
        self.symbols.iter().map(|(name, symbol)| (name.as_str(), symbol))
    }
}

/// The stack of active scopes, innermost last
#[derive(Debug, Default)]
pub struct SymbolTableStack {
    scopes: Vec<ScopeRef>,
}

impl SymbolTableStack {
    /// Creates an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a fresh scope, returning it
    pub fn create_scope(&mut self) -> ScopeRef {
        let scope = SymbolTable::new_ref();
        self.push(scope.clone());
        scope
    }

    /// Pushes an existing scope
    pub fn push(&mut self, scope: ScopeRef) {
        self.scopes.push(scope);
        debug!("pushed scope, depth={}", self.scopes.len());
    }

    /// Pops the innermost scope
    pub fn pop(&mut self) -> Result<ScopeRef, ScopeError> {
        let popped = self.scopes.pop().ok_or(ScopeError::NoScope)?;
        debug!("popped scope, depth={}", self.scopes.len());
        Ok(popped)
    }

    /// The innermost scope
    pub fn current(&self) -> Result<&ScopeRef, ScopeError> {
        self.scopes.last().ok_or(ScopeError::NoScope)
    }

    /// The number of active scopes
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Iterates over the active scopes, outermost first
    pub fn scopes(&self) -> impl Iterator<Item = &ScopeRef> {
        self.scopes.iter()
    }

    /// Declares a symbol in the innermost scope.
    ///
    /// Only the innermost scope is checked for duplicates, so a declaration may
    /// shadow one from an enclosing scope.
    pub fn declare(&mut self, symbol: Symbol) -> Result<(), ScopeError> {
        trace!("declaring {symbol} at depth {}", self.scopes.len());
        self.current()?.write().insert(symbol)
    }

    /// Looks up a name, innermost scope first
    pub fn lookup(&self, name: &str) -> Result<Symbol, ScopeError> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.read().get(name).ok().cloned())
            .ok_or_else(|| ScopeError::Undeclared(name.to_string()))
    }

    /// Creates a printable dump of every symbol in every active scope
    pub fn dump(&self) -> SymbolTableDump<'_> {
        SymbolTableDump { stack: self }
    }
}

/// A table of `scope`, `name`, `class` rows for every active scope.
///
/// Each scope is shown at its depth in the stack. The local scope of a
/// procedure or function follows its row, one level deeper.
pub struct SymbolTableDump<'a> {
    stack: &'a SymbolTableStack,
}

impl SymbolTableDump<'_> {
    fn write_table(
        f: &mut Formatter<'_>,
        table: &SymbolTable,
        depth: usize,
        path: &mut Vec<*const RwLock<SymbolTable>>,
    ) -> std::fmt::Result {
        for (_, symbol) in table.iter() {
            writeln!(f, "{:<10}{:<30}{:<20}", depth, symbol.name(), symbol.class())?;
            if let Some(callable) = symbol.as_callable() {
                let locals = callable.locals();
                let ptr = Arc::as_ptr(locals);
                if path.contains(&ptr) {
                    continue;
                }
                path.push(ptr);
                Self::write_table(f, &locals.read_recursive(), depth + 1, path)?;
                path.pop();
            }
        }
        Ok(())
    }
}

impl Display for SymbolTableDump<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:<10}{:<30}{:<20}", "scope", "name", "class")?;
        writeln!(f, "{}", "-".repeat(60))?;
        for (depth, scope) in self.stack.scopes.iter().enumerate() {
            let mut path = vec![Arc::as_ptr(scope)];
            Self::write_table(f, &scope.read_recursive(), depth, &mut path)?;
        }
        Ok(())
    }
}
