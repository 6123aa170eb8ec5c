//! Type expressions used in declarations

use crate::expr::{ExprVar, Range};
use crate::typed::{typed_enum, typed_struct, TypeInfo};
use pasco_tokens::token::Token;
use pasco_tokens::{Position, Positioned};

/// A type referenced by name
#[derive(Debug)]
pub struct TypeSimple {
    pub name: ExprVar,
    pub info: TypeInfo,
}

impl TypeSimple {
    pub fn new(name: ExprVar) -> Self {
        Self {
            name,
            info: TypeInfo::default(),
        }
    }
}

/// `array[ranges] of element`
#[derive(Debug)]
pub struct TypeArray {
    pub keyword: Token,
    pub ranges: Vec<Range>,
    pub element: Box<TypeNode>,
    pub info: TypeInfo,
}

impl TypeArray {
    pub fn new(keyword: Token, ranges: Vec<Range>, element: TypeNode) -> Self {
        Self {
            keyword,
            ranges,
            element: Box::new(element),
            info: TypeInfo::default(),
        }
    }
}

/// `record fields end`
#[derive(Debug)]
pub struct TypeRecord {
    pub keyword: Token,
    pub fields: Vec<Field>,
    pub info: TypeInfo,
}

impl TypeRecord {
    pub fn new(keyword: Token, fields: Vec<Field>) -> Self {
        Self {
            keyword,
            fields,
            info: TypeInfo::default(),
        }
    }
}

/// `a, b: type` inside of a record
#[derive(Debug)]
pub struct Field {
    pub names: Vec<ExprVar>,
    pub ty: TypeNode,
}

/// A type expression
#[derive(Debug)]
pub enum TypeNode {
    Simple(TypeSimple),
    Array(TypeArray),
    Record(TypeRecord),
}

typed_struct!(TypeSimple, TypeArray, TypeRecord);
typed_enum!(TypeNode { Simple, Array, Record });

impl Positioned for TypeNode {
    fn position(&self) -> Position {
        match self {
            TypeNode::Simple(simple) => simple.name.position(),
            TypeNode::Array(array) => array.keyword.position(),
            TypeNode::Record(record) => record.keyword.position(),
        }
    }
}

impl Positioned for Field {
    fn position(&self) -> Position {
        self.names
            .first()
            .map(|name| name.position())
            .unwrap_or_else(|| self.ty.position())
    }
}
