//! Resolves every name against the scope stack and types every expression

use crate::compiler::error::{SemanticError, SemanticErrorKind, SemanticResult};
use pasco_ast::expr::{
    Expr, ExprArrayAccess, ExprBinary, ExprBoolean, ExprCall, ExprNumber, ExprRecordAccess,
    ExprString, ExprUnary, ExprVar, Range,
};
use pasco_ast::items::{
    DeclConst, DeclFunction, DeclProcedure, DeclType, DeclVar, Param, Program,
};
use pasco_ast::statements::{StmtAssign, StmtFor, StmtIf, StmtIoCall, StmtWhile};
use pasco_ast::typed::{Typed, TypedMut};
use pasco_ast::types::{Field, TypeArray, TypeNode, TypeRecord, TypeSimple};
use pasco_ast::AstVisitorMut;
use pasco_tokens::token::{Keyword, Operator, TokenKind};
use pasco_tokens::{Position, Positioned};
use pasco_types::primitives::{self, BOOLEAN, INTEGER, REAL, STRING};
use pasco_types::ty::{is_primitive, Alias, Array, Bound, Record};
use pasco_types::{
    is_compatible, resolve, Callable, CallableKind, Primitive, Symbol, SymbolTable,
    SymbolTableStack, SymbolType, TypeRef, VarKind, Variable,
};
use std::sync::Arc;
use tracing::{debug, instrument, trace};

const SCALARS: &[Primitive] = &[
    Primitive::Integer,
    Primitive::Real,
    Primitive::Boolean,
    Primitive::Char,
    Primitive::String,
];
const NUMERIC: &[Primitive] = &[Primitive::Integer, Primitive::Real];
const ADDITIVE: &[Primitive] = &[Primitive::Integer, Primitive::Real, Primitive::String];
const LOGICAL: &[Primitive] = &[Primitive::Integer, Primitive::Boolean];
const INTEGRAL: &[Primitive] = &[Primitive::Integer];

/// The operand types an operator accepts and the type it produces.
///
/// Both operands of a binary operator must resolve to the same primitive.
#[derive(Debug, Copy, Clone)]
enum Signature {
    /// Produces the given primitive
    Fixed(&'static [Primitive], Primitive),
    /// Produces the type of the left operand
    Same(&'static [Primitive]),
    NotApplicable,
}

impl Signature {
    fn binary(op: &TokenKind) -> Self {
        match op {
            TokenKind::Operator(
                Operator::Equal
                | Operator::Unequal
                | Operator::Less
                | Operator::LessEqual
                | Operator::Greater
                | Operator::GreaterEqual,
            ) => Self::Fixed(SCALARS, Primitive::Boolean),
            TokenKind::Operator(Operator::Add) => Self::Same(ADDITIVE),
            TokenKind::Operator(Operator::Subtract | Operator::Multiply) => Self::Same(NUMERIC),
            TokenKind::Operator(Operator::Division) => Self::Fixed(NUMERIC, Primitive::Real),
            TokenKind::Keyword(Keyword::Or | Keyword::Xor | Keyword::And) => {
                Self::Fixed(LOGICAL, Primitive::Boolean)
            }
            TokenKind::Keyword(Keyword::Div | Keyword::Mod | Keyword::Shr | Keyword::Shl) => {
                Self::Fixed(INTEGRAL, Primitive::Integer)
            }
            _ => Self::NotApplicable,
        }
    }

    fn unary(op: &TokenKind) -> Self {
        match op {
            TokenKind::Operator(Operator::Add | Operator::Subtract) => Self::Same(NUMERIC),
            TokenKind::Keyword(Keyword::Not) => Self::Same(LOGICAL),
            _ => Self::NotApplicable,
        }
    }

    fn assignment(op: &TokenKind) -> Self {
        match op {
            TokenKind::Operator(Operator::Assign) => Self::Same(SCALARS),
            TokenKind::Operator(Operator::AddAssign) => Self::Same(ADDITIVE),
            TokenKind::Operator(
                Operator::SubtractAssign | Operator::MultiplyAssign | Operator::DivisionAssign,
            ) => Self::Same(NUMERIC),
            _ => Self::NotApplicable,
        }
    }

    fn allowed(&self) -> &'static [Primitive] {
        match self {
            Signature::Fixed(allowed, _) | Signature::Same(allowed) => allowed,
            Signature::NotApplicable => &[],
        }
    }

    /// Gets the result type for a pair of operands
    fn apply(&self, left: &TypeRef, right: &TypeRef) -> Option<TypeRef> {
        let primitive = left.primitive()?;
        if right.primitive() != Some(primitive) || !self.allowed().contains(&primitive) {
            return None;
        }
        match self {
            Signature::Fixed(_, result) => Some(result.type_ref()),
            Signature::Same(_) => Some(left.clone()),
            Signature::NotApplicable => None,
        }
    }
}

/// Gets the type of an already visited expression.
///
/// Only calls to procedures are left untyped.
fn type_of(expr: &Expr) -> SemanticResult<TypeRef> {
    expr.get_type().cloned().ok_or_else(|| {
        SemanticErrorKind::TypeMismatch {
            expected: "value".to_string(),
            found: "procedure call".to_string(),
        }
        .at(expr.position())
    })
}

/// Names an expression in error messages
fn describe(expr: &Expr, ty: &TypeRef) -> String {
    match expr {
        Expr::Var(var) => format!("'{}'", var.name()),
        _ => format!("expression of type {ty}"),
    }
}

/// Array bounds that are integer literals, optionally signed, are kept as constants
fn bound(expr: &Expr) -> Bound {
    let constant = match expr {
        Expr::Number(number) => number.as_integer().map(i64::from),
        Expr::Unary(unary) => match (unary.op.kind(), &*unary.operand) {
            (TokenKind::Operator(Operator::Subtract), Expr::Number(number)) => {
                number.as_integer().map(|i| -i64::from(i))
            }
            (TokenKind::Operator(Operator::Add), Expr::Number(number)) => {
                number.as_integer().map(i64::from)
            }
            _ => None,
        },
        _ => None,
    };
    match constant {
        Some(c) => Bound::Constant(c),
        None => Bound::Dynamic(expr.position()),
    }
}

/// Walks a program, declaring symbols as they appear and checking every
/// expression and statement against the typing rules.
///
/// Stops at the first violation.
#[derive(Debug, Default)]
pub struct SemanticAnalyzer {
    stack: SymbolTableStack,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks a program, annotating its expressions with their types. Returns
    /// the scope stack, still holding the global and program scopes.
    #[instrument(skip_all)]
    pub fn check(mut self, program: &mut Program) -> SemanticResult<SymbolTableStack> {
        self.visit_program_mut(program)?;
        Ok(self.stack)
    }

    fn declare(&mut self, symbol: Symbol, position: impl Into<Option<Position>>) -> SemanticResult {
        let position = position.into();
        debug!("declaring {symbol}");
        self.stack
            .declare(symbol)
            .map_err(|e| SemanticErrorKind::from(e).at(position))
    }

    fn pop_scope(&mut self, position: Position) -> SemanticResult {
        self.stack
            .pop()
            .map(|_| ())
            .map_err(|e| SemanticErrorKind::from(e).at(position))
    }

    /// Visits a type expression and gets the type it denotes
    fn type_node(&mut self, node: &mut TypeNode) -> SemanticResult<TypeRef> {
        self.visit_type_node_mut(node)?;
        node.get_type().cloned().ok_or_else(|| {
            SemanticErrorKind::TypeMismatch {
                expected: "type".to_string(),
                found: "nothing".to_string(),
            }
            .at(node.position())
        })
    }

    fn expect_compatible(&self, expected: &TypeRef, found: &Expr) -> SemanticResult {
        let found_ty = type_of(found)?;
        if is_compatible(expected, &found_ty) {
            Ok(())
        } else {
            Err(SemanticErrorKind::TypeMismatch {
                expected: expected.to_string(),
                found: found_ty.to_string(),
            }
            .at(found.position()))
        }
    }

    fn expect_integer(&self, expr: &Expr) -> SemanticResult {
        let ty = type_of(expr)?;
        if is_primitive(&ty, Primitive::Integer) {
            Ok(())
        } else {
            Err(SemanticErrorKind::NotInteger(ty.to_string()).at(expr.position()))
        }
    }

    fn expect_boolean(&self, expr: &Expr) -> SemanticResult {
        let ty = type_of(expr)?;
        if is_primitive(&ty, Primitive::Boolean) {
            Ok(())
        } else {
            Err(SemanticErrorKind::NotBoolean(ty.to_string()).at(expr.position()))
        }
    }

    /// Checks a procedure or function.
    ///
    /// The callable is declared inside of its own local scope while its body is
    /// checked so it can call itself, then moved into the enclosing scope.
    #[instrument(skip_all, fields(name = decl.name.name()))]
    fn callable(&mut self, decl: &mut DeclProcedure, returns: Option<&mut TypeNode>) -> SemanticResult {
        let kind = match returns {
            Some(node) => CallableKind::Function {
                returns: self.type_node(node)?,
            },
            None => CallableKind::Procedure,
        };
        let name = decl.name.name().to_string();
        let position = decl.name.position();
        let locals = SymbolTable::new_ref();
        let callable = Arc::new(Callable::new(
            name.clone(),
            kind,
            locals.clone(),
            decl.keyword.position(),
        ));

        self.stack.push(locals.clone());
        self.declare(Symbol::Callable(callable.clone()), position)?;
        if let Some(returns) = callable.returns() {
            self.declare(
                Symbol::variable(Variable::new("result", returns.clone(), VarKind::Variable)),
                position,
            )?;
        }
        for param in &mut decl.params {
            self.visit_param_mut(param)?;
        }
        self.visit_block_mut(&mut decl.block)?;
        self.pop_scope(position)?;

        locals
            .write()
            .remove(&name)
            .map_err(|e| SemanticErrorKind::from(e).at(position))?;
        decl.name.set_type(Arc::new(SymbolType::Callable(callable.clone())));
        self.declare(Symbol::Callable(callable), position)
    }
}

impl AstVisitorMut for SemanticAnalyzer {
    type Err = SemanticError;

    fn visit_program_mut(&mut self, program: &mut Program) -> SemanticResult {
        self.stack.create_scope();
        for primitive in primitives::all() {
            self.declare(Symbol::ty(primitive), None)?;
        }
        self.stack.create_scope();
        self.visit_block_mut(&mut program.block)
    }

    fn visit_decl_type_mut(&mut self, decl: &mut DeclType) -> SemanticResult {
        let target = self.type_node(&mut decl.ty)?;
        let alias: TypeRef = Arc::new(SymbolType::Alias(Alias::new(decl.name.name(), target)));
        decl.name.set_type(alias.clone());
        self.declare(Symbol::ty(alias), decl.name.position())
    }

    fn visit_decl_var_mut(&mut self, decl: &mut DeclVar) -> SemanticResult {
        let ty = self.type_node(&mut decl.ty)?;
        if let Some(init) = &mut decl.init {
            self.visit_expr_mut(init)?;
            self.expect_compatible(&ty, init)?;
        }
        for name in &mut decl.names {
            let var = Variable::new(name.name(), ty.clone(), VarKind::Variable);
            self.declare(Symbol::variable(var), name.position())?;
            name.set_type(ty.clone());
            name.set_lvalue(true);
        }
        Ok(())
    }

    fn visit_decl_const_mut(&mut self, decl: &mut DeclConst) -> SemanticResult {
        self.visit_expr_mut(&mut decl.value)?;
        let ty = match &mut decl.ty {
            Some(node) => {
                let ty = self.type_node(node)?;
                self.expect_compatible(&ty, &decl.value)?;
                ty
            }
            None => type_of(&decl.value)?,
        };
        let var = Variable::new(decl.name.name(), ty.clone(), VarKind::Const);
        self.declare(Symbol::variable(var), decl.name.position())?;
        decl.name.set_type(ty);
        Ok(())
    }

    fn visit_param_mut(&mut self, param: &mut Param) -> SemanticResult {
        let ty = self.type_node(&mut param.ty)?;
        for name in &mut param.names {
            let var = Variable::new(name.name(), ty.clone(), VarKind::Param(param.mode));
            self.declare(Symbol::variable(var), name.position())?;
            name.set_type(ty.clone());
            name.set_lvalue(true);
        }
        Ok(())
    }

    fn visit_decl_procedure_mut(&mut self, decl: &mut DeclProcedure) -> SemanticResult {
        self.callable(decl, None)
    }

    fn visit_decl_function_mut(&mut self, decl: &mut DeclFunction) -> SemanticResult {
        self.callable(&mut decl.procedure, Some(&mut decl.returns))
    }

    fn visit_type_simple_mut(&mut self, ty: &mut TypeSimple) -> SemanticResult {
        let symbol = self
            .stack
            .lookup(ty.name.name())
            .map_err(|e| SemanticErrorKind::from(e).at(ty.name.position()))?;
        let Some(found) = symbol.as_type() else {
            return Err(SemanticErrorKind::TypeMismatch {
                expected: "type".to_string(),
                found: symbol.to_string(),
            }
            .at(ty.name.position()));
        };
        ty.name.set_type(found.clone());
        ty.set_type(found.clone());
        Ok(())
    }

    fn visit_type_array_mut(&mut self, ty: &mut TypeArray) -> SemanticResult {
        for range in &mut ty.ranges {
            self.visit_range_mut(range)?;
        }
        let element = self.type_node(&mut ty.element)?;
        let array = ty.ranges.iter().rev().fold(element, |inner, range| {
            Arc::new(SymbolType::Array(Array::new(
                inner,
                bound(&range.first),
                bound(&range.last),
            )))
        });
        ty.set_type(array);
        Ok(())
    }

    fn visit_range_mut(&mut self, range: &mut Range) -> SemanticResult {
        self.visit_expr_mut(&mut range.first)?;
        self.visit_expr_mut(&mut range.last)?;
        self.expect_integer(&range.first)?;
        self.expect_integer(&range.last)?;
        range.set_type(INTEGER.clone());
        Ok(())
    }

    fn visit_type_record_mut(&mut self, ty: &mut TypeRecord) -> SemanticResult {
        let fields = self.stack.create_scope();
        for field in &mut ty.fields {
            self.visit_field_mut(field)?;
        }
        self.pop_scope(ty.keyword.position())?;
        ty.set_type(Arc::new(SymbolType::Record(Record::new(fields))));
        Ok(())
    }

    fn visit_field_mut(&mut self, field: &mut Field) -> SemanticResult {
        let ty = self.type_node(&mut field.ty)?;
        for name in &mut field.names {
            let var = Variable::new(name.name(), ty.clone(), VarKind::Variable);
            self.declare(Symbol::variable(var), name.position())?;
            name.set_type(ty.clone());
        }
        Ok(())
    }

    fn visit_stmt_assign_mut(&mut self, stmt: &mut StmtAssign) -> SemanticResult {
        self.visit_expr_mut(&mut stmt.target)?;
        self.visit_expr_mut(&mut stmt.value)?;
        if !stmt.target.is_lvalue() {
            return Err(SemanticErrorKind::AssignToRvalue.at(stmt.target.position()));
        }
        let target = type_of(&stmt.target)?;
        let value = type_of(&stmt.value)?;
        let signature = Signature::assignment(stmt.op.kind());
        if signature.apply(&target, &value).is_some() {
            return Ok(());
        }
        let kind = if is_compatible(&target, &value) {
            SemanticErrorKind::expected_one_of(signature.allowed(), &target)
        } else {
            SemanticErrorKind::TypeMismatch {
                expected: target.to_string(),
                found: value.to_string(),
            }
        };
        Err(kind.at(stmt.op.position()))
    }

    fn visit_stmt_io_call_mut(&mut self, stmt: &mut StmtIoCall) -> SemanticResult {
        for arg in &mut stmt.args {
            self.visit_expr_mut(arg)?;
            if stmt.procedure.is_read() && !arg.is_lvalue() {
                return Err(SemanticErrorKind::AssignToRvalue.at(arg.position()));
            }
            let ty = type_of(arg)?;
            if !ty.primitive().is_some_and(|p| SCALARS.contains(&p)) {
                return Err(SemanticErrorKind::expected_one_of(SCALARS, &ty).at(arg.position()));
            }
        }
        Ok(())
    }

    fn visit_stmt_if_mut(&mut self, stmt: &mut StmtIf) -> SemanticResult {
        self.visit_expr_mut(&mut stmt.cond)?;
        self.expect_boolean(&stmt.cond)?;
        self.visit_stmt_mut(&mut stmt.then_branch)?;
        if let Some(else_branch) = &mut stmt.else_branch {
            self.visit_stmt_mut(else_branch)?;
        }
        Ok(())
    }

    fn visit_stmt_while_mut(&mut self, stmt: &mut StmtWhile) -> SemanticResult {
        self.visit_expr_mut(&mut stmt.cond)?;
        self.expect_boolean(&stmt.cond)?;
        self.visit_stmt_mut(&mut stmt.body)
    }

    fn visit_stmt_for_mut(&mut self, stmt: &mut StmtFor) -> SemanticResult {
        self.visit_expr_var_mut(&mut stmt.var)?;
        match stmt.var.get_type() {
            Some(ty) if is_primitive(ty, Primitive::Integer) => {}
            other => {
                let found = other.map(|ty| ty.to_string()).unwrap_or_default();
                return Err(SemanticErrorKind::NotInteger(found).at(stmt.var.position()));
            }
        }
        self.visit_expr_mut(&mut stmt.begin)?;
        self.visit_expr_mut(&mut stmt.end)?;
        self.expect_integer(&stmt.begin)?;
        self.expect_integer(&stmt.end)?;
        self.visit_stmt_mut(&mut stmt.body)
    }

    fn visit_expr_binary_mut(&mut self, expr: &mut ExprBinary) -> SemanticResult {
        self.visit_expr_mut(&mut expr.left)?;
        self.visit_expr_mut(&mut expr.right)?;
        let left = type_of(&expr.left)?;
        let right = type_of(&expr.right)?;
        let ty = Signature::binary(expr.op.kind())
            .apply(&left, &right)
            .ok_or_else(|| {
                SemanticErrorKind::OperatorNotApplicable {
                    op: expr.op.raw().to_lowercase(),
                    operands: format!("{left} and {right}"),
                }
                .at(expr.op.position())
            })?;
        trace!("{} : {ty}", expr.op.raw());
        expr.set_type(ty);
        Ok(())
    }

    fn visit_expr_unary_mut(&mut self, expr: &mut ExprUnary) -> SemanticResult {
        self.visit_expr_mut(&mut expr.operand)?;
        let operand = type_of(&expr.operand)?;
        let ty = Signature::unary(expr.op.kind())
            .apply(&operand, &operand)
            .ok_or_else(|| {
                SemanticErrorKind::OperatorNotApplicable {
                    op: expr.op.raw().to_lowercase(),
                    operands: operand.to_string(),
                }
                .at(expr.op.position())
            })?;
        expr.set_type(ty);
        Ok(())
    }

    fn visit_expr_number_mut(&mut self, expr: &mut ExprNumber) -> SemanticResult {
        let ty = if expr.is_real() {
            REAL.clone()
        } else {
            INTEGER.clone()
        };
        expr.set_type(ty);
        Ok(())
    }

    fn visit_expr_string_mut(&mut self, expr: &mut ExprString) -> SemanticResult {
        expr.set_type(STRING.clone());
        Ok(())
    }

    fn visit_expr_boolean_mut(&mut self, expr: &mut ExprBoolean) -> SemanticResult {
        expr.set_type(BOOLEAN.clone());
        Ok(())
    }

    fn visit_expr_var_mut(&mut self, var: &mut ExprVar) -> SemanticResult {
        let symbol = self
            .stack
            .lookup(var.name())
            .map_err(|e| SemanticErrorKind::from(e).at(var.position()))?;
        match symbol {
            Symbol::Variable(variable) => {
                var.set_type(variable.ty().clone());
                var.set_lvalue(true);
            }
            Symbol::Callable(callable) => {
                var.set_type(Arc::new(SymbolType::Callable(callable)));
                var.set_lvalue(false);
            }
            Symbol::Type(ty) => {
                return Err(SemanticErrorKind::TypeMismatch {
                    expected: "value".to_string(),
                    found: format!("type {ty}"),
                }
                .at(var.position()));
            }
        }
        Ok(())
    }

    fn visit_expr_record_access_mut(&mut self, expr: &mut ExprRecordAccess) -> SemanticResult {
        self.visit_expr_mut(&mut expr.record)?;
        let base = type_of(&expr.record)?;
        let resolved = resolve(&base);
        let SymbolType::Record(record) = &*resolved else {
            return Err(SemanticErrorKind::NotARecord(describe(&expr.record, &base))
                .at(expr.record.position()));
        };
        let field = record.field_type(expr.field.name()).ok_or_else(|| {
            SemanticErrorKind::Undeclared(expr.field.name().to_string()).at(expr.field.position())
        })?;
        expr.field.set_type(field.clone());
        expr.set_type(field);
        expr.set_lvalue(true);
        Ok(())
    }

    fn visit_expr_call_mut(&mut self, call: &mut ExprCall) -> SemanticResult {
        self.visit_expr_mut(&mut call.callee)?;
        let callee = type_of(&call.callee)?;
        let resolved = resolve(&callee);
        let Some(callable) = resolved.as_callable() else {
            return Err(SemanticErrorKind::NotCallable(describe(&call.callee, &callee))
                .at(call.callee.position()));
        };
        let params = callable.params();
        if params.len() != call.args.len() {
            return Err(SemanticErrorKind::ArgumentCountMismatch {
                callee: format!("{} {}", callable.class(), callable.name()),
                expected: params.len(),
                found: call.args.len(),
            }
            .at(call.position()));
        }
        for (arg, param) in call.args.iter_mut().zip(&params) {
            self.visit_expr_mut(arg)?;
            self.expect_compatible(param.ty(), arg)?;
        }
        if let Some(returns) = callable.returns() {
            call.set_type(returns.clone());
        }
        Ok(())
    }

    fn visit_expr_array_access_mut(&mut self, expr: &mut ExprArrayAccess) -> SemanticResult {
        self.visit_expr_mut(&mut expr.array)?;
        let mut ty = type_of(&expr.array)?;
        for index in &mut expr.indices {
            self.visit_expr_mut(index)?;
            self.expect_integer(index)?;
            let resolved = resolve(&ty);
            let SymbolType::Array(array) = &*resolved else {
                return Err(SemanticErrorKind::NotAnArray(describe(&expr.array, &ty))
                    .at(index.position()));
            };
            ty = array.element().clone();
        }
        expr.set_type(ty);
        expr.set_lvalue(true);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pasco_ast::items::Decl;
    use pasco_ast::statements::Stmt;
    use pasco_ast_parsing::lexer::Lexer;
    use pasco_ast_parsing::parser::blocking::BlockingParser;
    use std::path::Path;
    use test_log::test;

    fn check(src: &str) -> SemanticResult<(Program, SymbolTableStack)> {
        let mut parser = BlockingParser::new(Lexer::new(Path::new("test"), src.as_bytes()));
        let mut program = match parser.parse_program() {
            Ok(program) => program,
            Err(e) => panic!("{src:?} failed to parse: {e}"),
        };
        let symbols = SemanticAnalyzer::new().check(&mut program)?;
        Ok((program, symbols))
    }

    fn passes(src: &str) -> (Program, SymbolTableStack) {
        match check(src) {
            Ok(checked) => checked,
            Err(e) => panic!("{src:?} failed to check: {e}"),
        }
    }

    fn fails(src: &str) -> SemanticErrorKind {
        match check(src) {
            Ok(_) => panic!("{src:?} should not have passed"),
            Err(e) => e.into_kind(),
        }
    }

    /// Wraps statements in a program declaring a variable of every primitive type
    fn with_vars(body: &str) -> String {
        format!(
            "var i, j: integer; r: real; b: boolean; c: char; s: string;
             begin {body} end."
        )
    }

    #[test]
    fn test_assign_string_to_integer() {
        let err = check("var x: integer; begin x := 'a' end.").unwrap_err();
        assert!(matches!(err.kind(), SemanticErrorKind::TypeMismatch { .. }));
        assert_eq!(
            err.to_string(),
            "(1, 25) Type mismatch: integer expected, found string"
        );
        passes("var x: integer; begin x := 1 end.");
    }

    #[test]
    fn test_expressions_are_annotated() {
        let (program, _) = passes("var x: integer; begin x := 1 + 2 * 3 end.");
        let Stmt::Assign(assign) = &program.block.body.stmts[0] else {
            panic!("expected assignment")
        };
        assert!(assign.target.is_lvalue());
        assert!(!assign.value.is_lvalue());
        let value = assign.value.get_type().expect("value should be typed");
        assert!(Arc::ptr_eq(value, &INTEGER));
    }

    #[test]
    fn test_records_compare_structurally() {
        let src = |arg: &str| {
            format!(
                "type R1 = record a: integer end;
                      R2 = record a: integer end;
                      R3 = record a: integer; b: integer end;
                 procedure take(r: R1); begin end;
                 var x: R2; y: R3;
                 begin take({arg}) end."
            )
        };
        passes(&src("x"));
        assert!(matches!(
            fails(&src("y")),
            SemanticErrorKind::TypeMismatch { .. }
        ));
    }

    #[test]
    fn test_redeclaration_and_shadowing() {
        assert!(matches!(
            fails("var x: integer; x: boolean; begin end."),
            SemanticErrorKind::AlreadyDeclared(name) if name == "x"
        ));
        passes(
            "var x: integer;
             procedure p(); var x: boolean; begin x := true end;
             begin x := 1 end.",
        );
        assert!(matches!(
            fails(
                "var x: integer;
                 procedure p(); var x: boolean; begin end;
                 begin x := true end."
            ),
            SemanticErrorKind::TypeMismatch { .. }
        ));
    }

    #[test]
    fn test_recursive_function_moves_to_enclosing_scope() {
        let (_, symbols) = passes(
            "function fact(n: integer): integer;
             begin
               if n <= 1 then result := 1 else result := n * fact(n - 1)
             end;
             var x: integer;
             begin x := fact(5) end.",
        );
        assert_eq!(symbols.depth(), 2);
        let program_scope = symbols.scopes().nth(1).expect("program scope").clone();
        let program_scope = program_scope.read();
        assert_eq!(program_scope.iter().filter(|(name, _)| *name == "fact").count(), 1);
        let fact = program_scope
            .get("fact")
            .ok()
            .and_then(|s| s.as_callable())
            .expect("fact should be a callable")
            .clone();
        let locals = fact.locals().read();
        assert!(!locals.contains("fact"));
        assert!(locals.contains("result"));
        assert_eq!(fact.param_count(), 1);
    }

    #[test]
    fn test_recursive_procedure() {
        passes(
            "procedure countdown(n: integer);
             begin if n > 0 then countdown(n - 1) end;
             begin countdown(3) end.",
        );
    }

    #[test]
    fn test_operators() {
        for ok in [
            "b := i < j",
            "b := s = s",
            "b := c <> c",
            "r := i / j",
            "r := r * r",
            "s := s + 'x'",
            "i := 7 div 2 mod 3 shl 1",
            "b := b and not b",
            "b := i xor j",
            "i := -i",
            "i := not i",
        ] {
            passes(&with_vars(ok));
        }
        for not_applicable in [
            "i := 1 + 2.0",
            "s := s - s",
            "b := i in j",
            "r := r div r",
            "b := -b",
            "b := not s",
            "b := b < i",
        ] {
            assert!(
                matches!(
                    fails(&with_vars(not_applicable)),
                    SemanticErrorKind::OperatorNotApplicable { .. }
                ),
                "{not_applicable}"
            );
        }
        for mismatch in ["i := i / j", "i := i and j", "c := 'a'"] {
            assert!(
                matches!(
                    fails(&with_vars(mismatch)),
                    SemanticErrorKind::TypeMismatch { .. }
                ),
                "{mismatch}"
            );
        }
    }

    #[test]
    fn test_compound_assignment() {
        for ok in ["i += 1", "s += 'x'", "r -= 1.0", "i *= j", "r /= r"] {
            passes(&with_vars(ok));
        }
        for bad in ["b += true", "s -= 'x'", "i += 1.0", "c *= c"] {
            assert!(
                matches!(fails(&with_vars(bad)), SemanticErrorKind::TypeMismatch { .. }),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_assign_to_rvalue() {
        assert!(matches!(
            fails(&with_vars("1 := i")),
            SemanticErrorKind::AssignToRvalue
        ));
        assert!(matches!(
            fails("function f(): integer; begin result := 1 end; begin f() := 1 end."),
            SemanticErrorKind::AssignToRvalue
        ));
        assert!(matches!(
            fails(&with_vars("i + 1 += 1")),
            SemanticErrorKind::AssignToRvalue
        ));
    }

    #[test]
    fn test_undeclared() {
        let err = check("begin y := 1 end.").unwrap_err();
        assert_eq!(err.to_string(), "(1, 7) Identifier 'y' is undeclared");
    }

    #[test]
    fn test_calls() {
        let decls = "function add(a, b: integer): integer; begin result := a + b end;
                     procedure show(const s: string); begin writeln(s) end;
                     var i: integer; r: real;";
        passes(&format!("{decls} begin i := add(1, add(2, 3)); show('x') end."));
        assert!(matches!(
            fails(&format!("{decls} begin i := add(1) end.")),
            SemanticErrorKind::ArgumentCountMismatch { expected: 2, found: 1, .. }
        ));
        assert!(matches!(
            fails(&format!("{decls} begin i := add(1, 2.0) end.")),
            SemanticErrorKind::TypeMismatch { .. }
        ));
        assert!(matches!(
            fails(&format!("{decls} begin i(1) end.")),
            SemanticErrorKind::NotCallable(name) if name == "'i'"
        ));
        assert!(matches!(
            fails(&format!("{decls} begin r := show('x') end.")),
            SemanticErrorKind::TypeMismatch { found, .. } if found == "procedure call"
        ));
        assert!(matches!(
            fails(&format!("{decls} begin i := add end.")),
            SemanticErrorKind::TypeMismatch { .. }
        ));
    }

    #[test]
    fn test_record_access() {
        let decls = "type point = record x, y: integer; tag: string end;
                     var p: point; i: integer;";
        let (program, _) = passes(&format!("{decls} begin p.x := 1; p.tag := 'origin' end."));
        let Stmt::Assign(assign) = &program.block.body.stmts[0] else {
            panic!("expected assignment")
        };
        assert!(assign.target.is_lvalue());
        assert!(matches!(
            fails(&format!("{decls} begin p.z := 1 end.")),
            SemanticErrorKind::Undeclared(name) if name == "z"
        ));
        assert!(matches!(
            fails(&format!("{decls} begin i.x := 1 end.")),
            SemanticErrorKind::NotARecord(_)
        ));
    }

    #[test]
    fn test_array_access() {
        let decls = "type grid = array[1..3, 1..3] of real;
                     var g: grid; row: array[0..9] of integer; i: integer; r: real;";
        passes(&format!("{decls} begin g[1, i] := 1.5; r := g[i][2]; row[i] := i end."));
        assert!(matches!(
            fails(&format!("{decls} begin r := g[1.0, 1] end.")),
            SemanticErrorKind::NotInteger(_)
        ));
        assert!(matches!(
            fails(&format!("{decls} begin i := i[1] end.")),
            SemanticErrorKind::NotAnArray(_)
        ));
        assert!(matches!(
            fails(&format!("{decls} begin i := row[1, 2] end.")),
            SemanticErrorKind::NotAnArray(_)
        ));
        assert!(matches!(
            fails(&format!("{decls} begin i := g[1, 1] end.")),
            SemanticErrorKind::TypeMismatch { .. }
        ));
    }

    #[test]
    fn test_array_bounds() {
        let (program, _) = passes(
            "const n = 10;
             type t = array[-1..n, 2..+3] of boolean;
             begin end.",
        );
        let Decl::Type(decl) = &program.block.decls[1] else {
            panic!("expected type declaration")
        };
        let ty = decl.ty.get_type().expect("type should be resolved");
        let SymbolType::Array(outer) = &**ty else {
            panic!("expected array, found {ty}")
        };
        assert_eq!(outer.low(), &Bound::Constant(-1));
        assert!(matches!(outer.high(), Bound::Dynamic(_)));
        let SymbolType::Array(inner) = &**outer.element() else {
            panic!("expected nested array")
        };
        assert_eq!(inner.low(), &Bound::Constant(2));
        assert_eq!(inner.high(), &Bound::Constant(3));
        assert!(is_primitive(inner.element(), Primitive::Boolean));

        assert!(matches!(
            fails("type t = array[1..'z'] of integer; begin end."),
            SemanticErrorKind::NotInteger(_)
        ));
    }

    #[test]
    fn test_conditions() {
        passes(&with_vars("if b then i := 1 else i := 2; while i > 0 do i -= 1"));
        passes(&with_vars("for i := 1 to 10 do j += i; for i := j downto 1 do j -= 1"));
        assert!(matches!(
            fails(&with_vars("if i then i := 1")),
            SemanticErrorKind::NotBoolean(found) if found == "integer"
        ));
        assert!(matches!(
            fails(&with_vars("while s do i := 1")),
            SemanticErrorKind::NotBoolean(_)
        ));
        assert!(matches!(
            fails(&with_vars("for r := 1 to 2 do i := 1")),
            SemanticErrorKind::NotInteger(_)
        ));
        assert!(matches!(
            fails(&with_vars("for i := 1 to r do i := 1")),
            SemanticErrorKind::NotInteger(_)
        ));
    }

    #[test]
    fn test_io_calls() {
        passes(&with_vars("writeln(i, r, b, c, s, 'lit', i + 1); readln(i, s); write; read()"));
        assert!(matches!(
            fails(&with_vars("readln(i + 1)")),
            SemanticErrorKind::AssignToRvalue
        ));
        assert!(matches!(
            fails("type p = record a: integer end; var x: p; begin writeln(x) end."),
            SemanticErrorKind::TypeMismatch { .. }
        ));
    }

    #[test]
    fn test_type_declarations() {
        passes("type a = integer; b = a; var x: b; begin x := 1 end.");
        assert!(matches!(
            fails("var x: integer; y: x; begin end."),
            SemanticErrorKind::TypeMismatch { expected, .. } if expected == "type"
        ));
        assert!(matches!(
            fails("var x: missing; begin end."),
            SemanticErrorKind::Undeclared(name) if name == "missing"
        ));
        assert!(matches!(
            fails("type t = integer; begin t := 1 end."),
            SemanticErrorKind::TypeMismatch { .. }
        ));
    }

    #[test]
    fn test_constants_and_initializers() {
        passes("const c = 1.5; var r: real = c; begin r := c end.");
        passes("const c: string = 'x'; var i: integer = 3; begin end.");
        assert!(matches!(
            fails("const c: integer = 'a'; begin end."),
            SemanticErrorKind::TypeMismatch { .. }
        ));
        assert!(matches!(
            fails("var i: integer = true; begin end."),
            SemanticErrorKind::TypeMismatch { .. }
        ));
    }

    #[test]
    fn test_symbol_dump() {
        let (_, symbols) = passes(
            "type t = integer;
             var x: t;
             function f(a: integer; var b: real): t; begin result := a end;
             begin end.",
        );
        let dump = symbols.dump().to_string();
        let rows = dump
            .lines()
            .skip(2)
            .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
            .collect::<Vec<_>>();
        assert_eq!(
            rows,
            [
                "0 integer primitive type",
                "0 real primitive type",
                "0 boolean primitive type",
                "0 char primitive type",
                "0 string primitive type",
                "1 t alias",
                "1 x variable",
                "1 f function",
                "2 result variable",
                "2 a param",
                "2 b parameter variable reference",
            ]
        );
    }
}
