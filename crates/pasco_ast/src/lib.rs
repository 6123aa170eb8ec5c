#![doc = include_str!("../README.md")]

use expr::*;
use items::*;
use pasco_visitor_gen::{visit, visit_mut};
use statements::*;
use types::*;

pub mod expr;
pub mod items;
pub mod statements;
pub mod tree;
pub mod typed;
pub mod types;

visit! {
    /// Visits the syntax tree through shared references.
    ///
    /// The default methods descend into every child in source order.
    pub trait AstVisitor {
        pub visit (v, program: &Program) {
            if let Some(name) = &program.name {
                v.visit_expr_var(name)?;
            }
            v.visit_block(&program.block)
        }
        pub visit (v, block: &Block) {
            for decl in &block.decls {
                v.visit_decl(decl)?;
            }
            v.visit_stmt_compound(&block.body)
        }
        pub visit (v, decl: &Decl) {
            match decl {
                Decl::Type(d) => v.visit_decl_type(d),
                Decl::Var(d) => v.visit_decl_var(d),
                Decl::Const(d) => v.visit_decl_const(d),
                Decl::Procedure(d) => v.visit_decl_procedure(d),
                Decl::Function(d) => v.visit_decl_function(d),
            }
        }
        pub visit (v, decl: &DeclType) {
            v.visit_expr_var(&decl.name)?;
            v.visit_type_node(&decl.ty)
        }
        pub visit (v, decl: &DeclVar) {
            for name in &decl.names {
                v.visit_expr_var(name)?;
            }
            v.visit_type_node(&decl.ty)?;
            if let Some(init) = &decl.init {
                v.visit_expr(init)?;
            }
            Ok(())
        }
        pub visit (v, decl: &DeclConst) {
            v.visit_expr_var(&decl.name)?;
            if let Some(ty) = &decl.ty {
                v.visit_type_node(ty)?;
            }
            v.visit_expr(&decl.value)
        }
        pub visit (v, param: &Param) {
            for name in &param.names {
                v.visit_expr_var(name)?;
            }
            v.visit_type_node(&param.ty)
        }
        pub visit (v, decl: &DeclProcedure) {
            v.visit_expr_var(&decl.name)?;
            for param in &decl.params {
                v.visit_param(param)?;
            }
            v.visit_block(&decl.block)
        }
        pub visit (v, decl: &DeclFunction) {
            let procedure = &decl.procedure;
            v.visit_expr_var(&procedure.name)?;
            for param in &procedure.params {
                v.visit_param(param)?;
            }
            v.visit_type_node(&decl.returns)?;
            v.visit_block(&procedure.block)
        }
        pub visit (v, ty: &TypeNode) {
            match ty {
                TypeNode::Simple(t) => v.visit_type_simple(t),
                TypeNode::Array(t) => v.visit_type_array(t),
                TypeNode::Record(t) => v.visit_type_record(t),
            }
        }
        pub visit (_v, _ty: &TypeSimple) {
            Ok(())
        }
        pub visit (v, ty: &TypeArray) {
            for range in &ty.ranges {
                v.visit_range(range)?;
            }
            v.visit_type_node(&ty.element)
        }
        pub visit (v, range: &Range) {
            v.visit_expr(&range.first)?;
            v.visit_expr(&range.last)
        }
        pub visit (v, ty: &TypeRecord) {
            for field in &ty.fields {
                v.visit_field(field)?;
            }
            Ok(())
        }
        pub visit (v, field: &Field) {
            for name in &field.names {
                v.visit_expr_var(name)?;
            }
            v.visit_type_node(&field.ty)
        }
        pub visit (v, stmt: &Stmt) {
            match stmt {
                Stmt::Compound(s) => v.visit_stmt_compound(s),
                Stmt::Assign(s) => v.visit_stmt_assign(s),
                Stmt::Call(s) => v.visit_stmt_call(s),
                Stmt::IoCall(s) => v.visit_stmt_io_call(s),
                Stmt::If(s) => v.visit_stmt_if(s),
                Stmt::While(s) => v.visit_stmt_while(s),
                Stmt::For(s) => v.visit_stmt_for(s),
            }
        }
        pub visit (v, stmt: &StmtCompound) {
            for inner in &stmt.stmts {
                v.visit_stmt(inner)?;
            }
            Ok(())
        }
        pub visit (v, stmt: &StmtAssign) {
            v.visit_expr(&stmt.target)?;
            v.visit_expr(&stmt.value)
        }
        pub visit (v, stmt: &StmtCall) {
            v.visit_expr_call(&stmt.call)
        }
        pub visit (v, stmt: &StmtIoCall) {
            for arg in &stmt.args {
                v.visit_expr(arg)?;
            }
            Ok(())
        }
        pub visit (v, stmt: &StmtIf) {
            v.visit_expr(&stmt.cond)?;
            v.visit_stmt(&stmt.then_branch)?;
            if let Some(else_branch) = &stmt.else_branch {
                v.visit_stmt(else_branch)?;
            }
            Ok(())
        }
        pub visit (v, stmt: &StmtWhile) {
            v.visit_expr(&stmt.cond)?;
            v.visit_stmt(&stmt.body)
        }
        pub visit (v, stmt: &StmtFor) {
            v.visit_expr_var(&stmt.var)?;
            v.visit_expr(&stmt.begin)?;
            v.visit_expr(&stmt.end)?;
            v.visit_stmt(&stmt.body)
        }
        pub visit (v, expr: &Expr) {
            match expr {
                Expr::Binary(e) => v.visit_expr_binary(e),
                Expr::Unary(e) => v.visit_expr_unary(e),
                Expr::Number(e) => v.visit_expr_number(e),
                Expr::String(e) => v.visit_expr_string(e),
                Expr::Boolean(e) => v.visit_expr_boolean(e),
                Expr::Var(e) => v.visit_expr_var(e),
                Expr::RecordAccess(e) => v.visit_expr_record_access(e),
                Expr::Call(e) => v.visit_expr_call(e),
                Expr::ArrayAccess(e) => v.visit_expr_array_access(e),
            }
        }
        pub visit (v, expr: &ExprBinary) {
            v.visit_expr(&expr.left)?;
            v.visit_expr(&expr.right)
        }
        pub visit (v, expr: &ExprUnary) {
            v.visit_expr(&expr.operand)
        }
        pub visit (_v, _expr: &ExprNumber) {
            Ok(())
        }
        pub visit (_v, _expr: &ExprString) {
            Ok(())
        }
        pub visit (_v, _expr: &ExprBoolean) {
            Ok(())
        }
        pub visit (_v, _expr: &ExprVar) {
            Ok(())
        }
        pub visit (v, expr: &ExprRecordAccess) {
            v.visit_expr(&expr.record)?;
            v.visit_expr_var(&expr.field)
        }
        pub visit (v, expr: &ExprCall) {
            v.visit_expr(&expr.callee)?;
            for arg in &expr.args {
                v.visit_expr(arg)?;
            }
            Ok(())
        }
        pub visit (v, expr: &ExprArrayAccess) {
            v.visit_expr(&expr.array)?;
            for index in &expr.indices {
                v.visit_expr(index)?;
            }
            Ok(())
        }
    }
}

visit_mut! {
    /// Visits the syntax tree through mutable references, used by passes that
    /// annotate the tree.
    pub trait AstVisitorMut {
        pub visit (v, program: &mut Program) {
            if let Some(name) = &mut program.name {
                v.visit_expr_var_mut(name)?;
            }
            v.visit_block_mut(&mut program.block)
        }
        pub visit (v, block: &mut Block) {
            for decl in &mut block.decls {
                v.visit_decl_mut(decl)?;
            }
            v.visit_stmt_compound_mut(&mut block.body)
        }
        pub visit (v, decl: &mut Decl) {
            match decl {
                Decl::Type(d) => v.visit_decl_type_mut(d),
                Decl::Var(d) => v.visit_decl_var_mut(d),
                Decl::Const(d) => v.visit_decl_const_mut(d),
                Decl::Procedure(d) => v.visit_decl_procedure_mut(d),
                Decl::Function(d) => v.visit_decl_function_mut(d),
            }
        }
        pub visit (v, decl: &mut DeclType) {
            v.visit_expr_var_mut(&mut decl.name)?;
            v.visit_type_node_mut(&mut decl.ty)
        }
        pub visit (v, decl: &mut DeclVar) {
            for name in &mut decl.names {
                v.visit_expr_var_mut(name)?;
            }
            v.visit_type_node_mut(&mut decl.ty)?;
            if let Some(init) = &mut decl.init {
                v.visit_expr_mut(init)?;
            }
            Ok(())
        }
        pub visit (v, decl: &mut DeclConst) {
            v.visit_expr_var_mut(&mut decl.name)?;
            if let Some(ty) = &mut decl.ty {
                v.visit_type_node_mut(ty)?;
            }
            v.visit_expr_mut(&mut decl.value)
        }
        pub visit (v, param: &mut Param) {
            for name in &mut param.names {
                v.visit_expr_var_mut(name)?;
            }
            v.visit_type_node_mut(&mut param.ty)
        }
        pub visit (v, decl: &mut DeclProcedure) {
            v.visit_expr_var_mut(&mut decl.name)?;
            for param in &mut decl.params {
                v.visit_param_mut(param)?;
            }
            v.visit_block_mut(&mut decl.block)
        }
        pub visit (v, decl: &mut DeclFunction) {
            let procedure = &mut decl.procedure;
            v.visit_expr_var_mut(&mut procedure.name)?;
            for param in &mut procedure.params {
                v.visit_param_mut(param)?;
            }
            v.visit_type_node_mut(&mut decl.returns)?;
            v.visit_block_mut(&mut procedure.block)
        }
        pub visit (v, ty: &mut TypeNode) {
            match ty {
                TypeNode::Simple(t) => v.visit_type_simple_mut(t),
                TypeNode::Array(t) => v.visit_type_array_mut(t),
                TypeNode::Record(t) => v.visit_type_record_mut(t),
            }
        }
        pub visit (_v, _ty: &mut TypeSimple) {
            Ok(())
        }
        pub visit (v, ty: &mut TypeArray) {
            for range in &mut ty.ranges {
                v.visit_range_mut(range)?;
            }
            v.visit_type_node_mut(&mut ty.element)
        }
        pub visit (v, range: &mut Range) {
            v.visit_expr_mut(&mut range.first)?;
            v.visit_expr_mut(&mut range.last)
        }
        pub visit (v, ty: &mut TypeRecord) {
            for field in &mut ty.fields {
                v.visit_field_mut(field)?;
            }
            Ok(())
        }
        pub visit (v, field: &mut Field) {
            for name in &mut field.names {
                v.visit_expr_var_mut(name)?;
            }
            v.visit_type_node_mut(&mut field.ty)
        }
        pub visit (v, stmt: &mut Stmt) {
            match stmt {
                Stmt::Compound(s) => v.visit_stmt_compound_mut(s),
                Stmt::Assign(s) => v.visit_stmt_assign_mut(s),
                Stmt::Call(s) => v.visit_stmt_call_mut(s),
                Stmt::IoCall(s) => v.visit_stmt_io_call_mut(s),
                Stmt::If(s) => v.visit_stmt_if_mut(s),
                Stmt::While(s) => v.visit_stmt_while_mut(s),
                Stmt::For(s) => v.visit_stmt_for_mut(s),
            }
        }
        pub visit (v, stmt: &mut StmtCompound) {
            for inner in &mut stmt.stmts {
                v.visit_stmt_mut(inner)?;
            }
            Ok(())
        }
        pub visit (v, stmt: &mut StmtAssign) {
            v.visit_expr_mut(&mut stmt.target)?;
            v.visit_expr_mut(&mut stmt.value)
        }
        pub visit (v, stmt: &mut StmtCall) {
            v.visit_expr_call_mut(&mut stmt.call)
        }
        pub visit (v, stmt: &mut StmtIoCall) {
            for arg in &mut stmt.args {
                v.visit_expr_mut(arg)?;
            }
            Ok(())
        }
        pub visit (v, stmt: &mut StmtIf) {
            v.visit_expr_mut(&mut stmt.cond)?;
            v.visit_stmt_mut(&mut stmt.then_branch)?;
            if let Some(else_branch) = &mut stmt.else_branch {
                v.visit_stmt_mut(else_branch)?;
            }
            Ok(())
        }
        pub visit (v, stmt: &mut StmtWhile) {
            v.visit_expr_mut(&mut stmt.cond)?;
            v.visit_stmt_mut(&mut stmt.body)
        }
        pub visit (v, stmt: &mut StmtFor) {
            v.visit_expr_var_mut(&mut stmt.var)?;
            v.visit_expr_mut(&mut stmt.begin)?;
            v.visit_expr_mut(&mut stmt.end)?;
            v.visit_stmt_mut(&mut stmt.body)
        }
        pub visit (v, expr: &mut Expr) {
            match expr {
                Expr::Binary(e) => v.visit_expr_binary_mut(e),
                Expr::Unary(e) => v.visit_expr_unary_mut(e),
                Expr::Number(e) => v.visit_expr_number_mut(e),
                Expr::String(e) => v.visit_expr_string_mut(e),
                Expr::Boolean(e) => v.visit_expr_boolean_mut(e),
                Expr::Var(e) => v.visit_expr_var_mut(e),
                Expr::RecordAccess(e) => v.visit_expr_record_access_mut(e),
                Expr::Call(e) => v.visit_expr_call_mut(e),
                Expr::ArrayAccess(e) => v.visit_expr_array_access_mut(e),
            }
        }
        pub visit (v, expr: &mut ExprBinary) {
            v.visit_expr_mut(&mut expr.left)?;
            v.visit_expr_mut(&mut expr.right)
        }
        pub visit (v, expr: &mut ExprUnary) {
            v.visit_expr_mut(&mut expr.operand)
        }
        pub visit (_v, _expr: &mut ExprNumber) {
            Ok(())
        }
        pub visit (_v, _expr: &mut ExprString) {
            Ok(())
        }
        pub visit (_v, _expr: &mut ExprBoolean) {
            Ok(())
        }
        pub visit (_v, _expr: &mut ExprVar) {
            Ok(())
        }
        pub visit (v, expr: &mut ExprRecordAccess) {
            v.visit_expr_mut(&mut expr.record)?;
            v.visit_expr_var_mut(&mut expr.field)
        }
        pub visit (v, expr: &mut ExprCall) {
            v.visit_expr_mut(&mut expr.callee)?;
            for arg in &mut expr.args {
                v.visit_expr_mut(arg)?;
            }
            Ok(())
        }
        pub visit (v, expr: &mut ExprArrayAccess) {
            v.visit_expr_mut(&mut expr.array)?;
            for index in &mut expr.indices {
                v.visit_expr_mut(index)?;
            }
            Ok(())
        }
    }
}
