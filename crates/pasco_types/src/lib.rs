#![doc = include_str!("../README.md")]

pub mod error;
pub mod primitives;
pub mod scope;
pub mod symbol;
pub mod ty;

pub use error::ScopeError;
pub use primitives::Primitive;
pub use scope::{ScopeRef, SymbolTable, SymbolTableStack};
pub use symbol::{Callable, CallableKind, ParamMode, Symbol, VarKind, Variable};
pub use ty::{is_compatible, resolve, SymbolType, TypeRef};
