//! Scope errors

/// An error occurred while declaring or looking up a symbol
#[derive(Debug, thiserror::Error)]
pub enum ScopeError {
    #[error("Identifier '{0}' is undeclared")]
    Undeclared(String),
    #[error("Identifier '{0}' is already declared")]
    AlreadyDeclared(String),
    #[error("no active scope")]
    NoScope,
}
