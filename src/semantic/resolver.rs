//! Type resolution
//!
//! Second analysis phase. Every non-template function body is walked in
//! post-order: children are typed first, then the node's own slot is
//! filled from theirs. Call sites bind to an overload through
//! [`GlobalScope::resolve_func`]. A callee whose return type has to be
//! inferred is analyzed on demand before the call site is typed.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use crate::ast::*;
use crate::error::{DachsError, DachsResult, SemanticErrorKind, SourceLocation};
use crate::types::{BuiltinType, Type};

use super::annotation::resolve_type_expr;
use super::scope::{FuncSymbolId, GlobalScope};

#[derive(Debug, Clone)]
struct Binding {
    ty: Type,
    mutable: bool,
}

/// Lexically nested local variables
#[derive(Debug, Clone)]
struct TypeEnvironment {
    scopes: Vec<FxHashMap<String, Binding>>,
}

impl TypeEnvironment {
    fn new() -> Self {
        Self {
            scopes: vec![FxHashMap::default()],
        }
    }

    fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    fn define(&mut self, name: &str, ty: Type, mutable: bool) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), Binding { ty, mutable });
        }
    }

    fn get(&self, name: &str) -> Option<&Binding> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }
}

/// Return type bookkeeping for the function being analyzed
struct ReturnContext {
    kind: FuncKind,
    name: String,
    /// Annotated or already inferred
    expected: Option<Type>,
}

fn semantic(kind: SemanticErrorKind, message: String, location: &SourceLocation) -> DachsError {
    DachsError::semantic_error(kind, message, location.clone())
}

fn mismatch(message: String, location: &SourceLocation) -> DachsError {
    semantic(SemanticErrorKind::TypeMismatch, message, location)
}

/// Already computed type of a child expression
fn type_of(expr: &Expr) -> DachsResult<Type> {
    expr.ty().get().cloned().ok_or_else(|| {
        DachsError::internal_error(format!(
            "expression at {} was not typed before its parent",
            expr.location()
        ))
    })
}

fn types_of(exprs: &[Expr]) -> DachsResult<Vec<Type>> {
    exprs.iter().map(type_of).collect()
}

fn expect_bool(expr: &Expr, what: &str) -> DachsResult<()> {
    let ty = type_of(expr)?;
    if ty == Type::bool() {
        Ok(())
    } else {
        Err(mismatch(
            format!("{} must be bool, found {}", what, ty),
            expr.location(),
        ))
    }
}

fn is_numeric(ty: &Type) -> bool {
    matches!(
        ty,
        Type::Builtin(BuiltinType::Int | BuiltinType::Uint | BuiltinType::Float)
    )
}

fn is_integral(ty: &Type) -> bool {
    matches!(ty, Type::Builtin(BuiltinType::Int | BuiltinType::Uint))
}

/// Split `values` across `count` targets, destructuring a single tuple
fn spread(values: Vec<Type>, count: usize, location: &SourceLocation) -> DachsResult<Vec<Type>> {
    if values.len() == count {
        return Ok(values);
    }
    if let [Type::Tuple(elements)] = values.as_slice() {
        if elements.len() == count {
            return Ok(elements.clone());
        }
    }
    Err(mismatch(
        format!("{} targets cannot take {} values", count, values.len()),
        location,
    ))
}

fn literal_type(value: &LiteralValue) -> Type {
    Type::builtin(match value {
        LiteralValue::Char(_) => BuiltinType::Char,
        LiteralValue::Float(_) => BuiltinType::Float,
        LiteralValue::Bool(_) => BuiltinType::Bool,
        LiteralValue::String(_) => BuiltinType::String,
        LiteralValue::Int(_) => BuiltinType::Int,
        LiteralValue::Uint(_) => BuiltinType::Uint,
        LiteralValue::Symbol(_) => BuiltinType::Symbol,
    })
}

pub(crate) struct TypeResolver<'ast, 's> {
    program: &'ast Program,
    scope: &'s GlobalScope,
    env: TypeEnvironment,
    ret: Option<ReturnContext>,
    analyzed: FxHashSet<FuncDefId>,
    in_progress: FxHashSet<FuncDefId>,
    error: Option<DachsError>,
}

impl<'ast, 's> TypeResolver<'ast, 's> {
    pub(crate) fn new(program: &'ast Program, scope: &'s GlobalScope) -> Self {
        Self {
            program,
            scope,
            env: TypeEnvironment::new(),
            ret: None,
            analyzed: FxHashSet::default(),
            in_progress: FxHashSet::default(),
            error: None,
        }
    }

    /// Type every non-template function of the program
    pub(crate) fn run(mut self) -> DachsResult<()> {
        let program = self.program;
        for (id, function) in program.functions.iter() {
            if function.is_template() {
                trace!(skip_template = %function.name);
                continue;
            }
            self.analyze_function(id)?;
        }
        Ok(())
    }

    fn record(&mut self, result: DachsResult<()>) {
        if let Err(err) = result {
            self.error.get_or_insert(err);
        }
    }

    fn failed(&self) -> bool {
        self.error.is_some()
    }

    /// Walk the children, then run `check` on the node itself
    fn post_order(
        &mut self,
        children: Children<'ast>,
        check: impl FnOnce(&mut Self) -> DachsResult<()>,
    ) {
        if self.failed() {
            return;
        }
        children.walk(self);
        if self.failed() {
            return;
        }
        let result = check(self);
        self.record(result);
    }

    fn analyze_function(&mut self, id: FuncDefId) -> DachsResult<()> {
        if self.analyzed.contains(&id) {
            return Ok(());
        }
        let program = self.program;
        let function = &program.functions[id];
        if self.in_progress.contains(&id) {
            return Err(semantic(
                SemanticErrorKind::NotInferable,
                format!(
                    "return type of recursive function '{}' must be annotated",
                    function.name
                ),
                &function.location,
            ));
        }

        let _span = tracing::debug_span!("function", name = %function.name).entered();
        self.in_progress.insert(id);

        let mut env = TypeEnvironment::new();
        for param in &function.params {
            let ty = param.ty.get().cloned().ok_or_else(|| {
                DachsError::internal_error(format!(
                    "parameter '{}' of '{}' has no type",
                    param.name, function.name
                ))
            })?;
            env.define(&param.name, ty, param.is_var);
        }

        let saved_env = std::mem::replace(&mut self.env, env);
        let saved_ret = self.ret.replace(ReturnContext {
            kind: function.kind,
            name: function.name.clone(),
            expected: function.ret_type.get().cloned(),
        });

        Children::of(&function.body).walk(self);
        let ret = self.ret.take();
        Children::of(&function.ensure_body).walk(self);

        self.env = saved_env;
        self.ret = saved_ret;
        self.in_progress.remove(&id);

        if let Some(err) = self.error.take() {
            return Err(err);
        }

        if !function.ret_type.is_resolved() {
            // a func without any return statement yields the unit value
            let inferred = ret.and_then(|ctx| ctx.expected).unwrap_or_else(Type::unit);
            debug!(inferred = %inferred, "return type");
            function.ret_type.fill(inferred.clone())?;
            let symbol = self.scope.symbol_of(id).ok_or_else(|| {
                DachsError::internal_error(format!("function '{}' has no symbol", function.name))
            })?;
            self.scope.set_return_type(symbol, inferred)?;
        }

        self.analyzed.insert(id);
        Ok(())
    }

    /// Return type of a resolved callee, analyzing its body first if needed
    fn callee_return_type(
        &mut self,
        id: FuncSymbolId,
        location: &SourceLocation,
    ) -> DachsResult<Type> {
        let scope = self.scope;
        let symbol = &scope[id];
        if symbol.kind == FuncKind::Proc {
            return Ok(Type::unit());
        }
        if symbol.return_type().is_none() {
            if symbol.is_template() {
                return Err(semantic(
                    SemanticErrorKind::NotInferable,
                    format!("template function '{}' needs a return type annotation", symbol),
                    location,
                ));
            }
            self.analyze_function(symbol.definition)?;
        }
        symbol.return_type().cloned().ok_or_else(|| {
            semantic(
                SemanticErrorKind::NotInferable,
                format!("cannot infer return type of '{}'", symbol),
                location,
            )
        })
    }

    fn bind_call(
        &mut self,
        name: &str,
        args: &[Expr],
        callee: &Slot<FuncSymbolId>,
        ty: &Slot<Type>,
        location: &SourceLocation,
    ) -> DachsResult<()> {
        let arg_types = types_of(args)?;
        self.bind_resolved(name, &arg_types, callee, ty, location)
    }

    fn bind_resolved(
        &mut self,
        name: &str,
        arg_types: &[Type],
        callee: &Slot<FuncSymbolId>,
        ty: &Slot<Type>,
        location: &SourceLocation,
    ) -> DachsResult<()> {
        let id = self
            .scope
            .resolve_func(name, arg_types)
            .ok_or_else(|| self.scope.no_matching_overload(name, arg_types, location.clone()))?;
        callee.fill(id)?;
        let ret = self.callee_return_type(id, location)?;
        ty.fill(ret)
    }

    fn indirect_call(&self, node: &FuncInvocation) -> DachsResult<()> {
        let callee_ty = type_of(&node.child)?;
        let arg_types = types_of(&node.args)?;
        let (params, ret) = match &callee_ty {
            Type::Func { params, ret } => (params, (**ret).clone()),
            Type::Proc { params } => (params, Type::unit()),
            other => {
                return Err(mismatch(
                    format!("value of type {} is not callable", other),
                    &node.location,
                ))
            }
        };
        if *params != arg_types {
            return Err(mismatch(
                format!(
                    "{} called with ({})",
                    callee_ty,
                    arg_types.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
                ),
                &node.location,
            ));
        }
        node.ty.fill(ret)
    }

    fn binary_expr(&self, node: &BinaryExpr) -> DachsResult<()> {
        let lhs = type_of(&node.lhs)?;
        let rhs = type_of(&node.rhs)?;
        if lhs != rhs {
            return Err(mismatch(
                format!(
                    "operands of '{}' differ: {} and {}",
                    node.op.symbol(),
                    lhs,
                    rhs
                ),
                &node.location,
            ));
        }

        let ty = if node.op.is_logical() {
            if lhs != Type::bool() {
                return Err(mismatch(
                    format!("operands of '{}' must be bool, found {}", node.op.symbol(), lhs),
                    &node.location,
                ));
            }
            Type::bool()
        } else if node.op.is_comparison() {
            Type::bool()
        } else if node.op == BinaryOp::Range {
            Type::range(lhs, rhs)
        } else {
            // '+' also concatenates strings
            let concat = node.op == BinaryOp::Add && lhs == Type::builtin(BuiltinType::String);
            if !is_numeric(&lhs) && !concat {
                return Err(mismatch(
                    format!("operator '{}' cannot be applied to {}", node.op.symbol(), lhs),
                    &node.location,
                ));
            }
            lhs
        };
        node.ty.fill(ty)
    }

    fn unary_expr(&self, node: &UnaryExpr) -> DachsResult<()> {
        let operand = type_of(&node.expr)?;
        let ty = match node.op {
            UnaryOp::Not => {
                expect_bool(&node.expr, "operand of '!'")?;
                Type::bool()
            }
            UnaryOp::Negate if is_numeric(&operand) => operand,
            UnaryOp::Negate => {
                return Err(mismatch(
                    format!("cannot negate a value of type {}", operand),
                    &node.location,
                ))
            }
        };
        node.ty.fill(ty)
    }

    fn index_access(&self, node: &IndexAccess) -> DachsResult<()> {
        let child = type_of(&node.child)?;
        let index = type_of(&node.index_expr)?;
        let ty = match &child {
            Type::Array(element) if is_integral(&index) => (**element).clone(),
            Type::Builtin(BuiltinType::String) if is_integral(&index) => {
                Type::builtin(BuiltinType::Char)
            }
            Type::Dict { key, value } if **key == index => (**value).clone(),
            Type::Tuple(elements) => {
                let position = match &*node.index_expr {
                    Expr::Literal(Literal {
                        value: LiteralValue::Int(i),
                        ..
                    }) => usize::try_from(*i).ok(),
                    Expr::Literal(Literal {
                        value: LiteralValue::Uint(u),
                        ..
                    }) => usize::try_from(*u).ok(),
                    _ => {
                        return Err(mismatch(
                            "tuple index must be an integer literal".to_string(),
                            node.index_expr.location(),
                        ))
                    }
                };
                position
                    .and_then(|i| elements.get(i))
                    .cloned()
                    .ok_or_else(|| {
                        mismatch(
                            format!("index out of range for {}", child),
                            node.index_expr.location(),
                        )
                    })?
            }
            _ => {
                return Err(mismatch(
                    format!("{} cannot be indexed by {}", child, index),
                    &node.location,
                ))
            }
        };
        node.ty.fill(ty)
    }

    fn array_literal(&self, node: &ArrayLiteral) -> DachsResult<()> {
        let elements = types_of(&node.element_exprs)?;
        let first = elements.first().cloned().ok_or_else(|| {
            semantic(
                SemanticErrorKind::NotInferable,
                "element type of an empty array literal is unknown".to_string(),
                &node.location,
            )
        })?;
        if let Some(other) = elements.iter().find(|ty| **ty != first) {
            return Err(mismatch(
                format!("array elements must share one type: {} and {}", first, other),
                &node.location,
            ));
        }
        node.ty.fill(Type::array(first))
    }

    fn dict_literal(&self, node: &DictLiteral) -> DachsResult<()> {
        let mut entries = Vec::with_capacity(node.value.len());
        for (key, value) in &node.value {
            entries.push((type_of(key)?, type_of(value)?));
        }
        let (key, value) = entries.first().cloned().ok_or_else(|| {
            semantic(
                SemanticErrorKind::NotInferable,
                "key and value types of an empty dict literal are unknown".to_string(),
                &node.location,
            )
        })?;
        if let Some((k, v)) = entries.iter().find(|(k, v)| *k != key || *v != value) {
            return Err(mismatch(
                format!(
                    "dict entries must share one type: {} => {} and {} => {}",
                    key, value, k, v
                ),
                &node.location,
            ));
        }
        node.ty.fill(Type::dict(key, value))
    }

    fn if_expr(&self, node: &IfExpr) -> DachsResult<()> {
        expect_bool(&node.condition_expr, "condition")?;
        let then_ty = type_of(&node.then_expr)?;
        let else_ty = type_of(&node.else_expr)?;
        if then_ty != else_ty {
            return Err(mismatch(
                format!("branches of if expression differ: {} and {}", then_ty, else_ty),
                &node.location,
            ));
        }
        node.ty.fill(then_ty)
    }

    fn var_ref(&self, node: &VarRef) -> DachsResult<()> {
        let binding = self.env.get(&node.name).ok_or_else(|| {
            semantic(
                SemanticErrorKind::UndefinedVariable,
                format!("variable '{}' is not declared", node.name),
                &node.location,
            )
        })?;
        node.ty.fill(binding.ty.clone())
    }

    fn initialize(&mut self, node: &InitializeStmt) -> DachsResult<()> {
        let values = match &node.maybe_rhs_exprs {
            Some(rhs) => Some(spread(types_of(rhs)?, node.var_decls.len(), &node.location)?),
            None => None,
        };

        for (i, decl) in node.var_decls.iter().enumerate() {
            let annotated = decl
                .maybe_type
                .as_ref()
                .map(|annotation| resolve_type_expr(annotation, self.scope))
                .transpose()?;
            let value = values.as_ref().map(|values| values[i].clone());

            let ty = match (annotated, value) {
                (Some(annotated), Some(value)) if annotated != value => {
                    return Err(mismatch(
                        format!(
                            "variable '{}' declared as {} but initialized with {}",
                            decl.name, annotated, value
                        ),
                        &decl.location,
                    ))
                }
                (Some(ty), _) | (None, Some(ty)) => ty,
                (None, None) => {
                    return Err(semantic(
                        SemanticErrorKind::NotInferable,
                        format!(
                            "variable '{}' needs a type annotation or an initializer",
                            decl.name
                        ),
                        &decl.location,
                    ))
                }
            };

            trace!(declare = %decl.name, ty = %ty);
            decl.ty.fill(ty.clone())?;
            self.env.define(&decl.name, ty, decl.is_var);
        }
        Ok(())
    }

    fn assignment(&self, node: &AssignmentStmt) -> DachsResult<()> {
        let values = spread(types_of(&node.rhs_exprs)?, node.assignees.len(), &node.location)?;
        for (assignee, value) in node.assignees.iter().zip(values) {
            if let Expr::Var(var) = assignee {
                if let Some(binding) = self.env.get(&var.name) {
                    if !binding.mutable {
                        return Err(semantic(
                            SemanticErrorKind::ImmutableAssignment,
                            format!("cannot assign twice to immutable variable '{}'", var.name),
                            &var.location,
                        ));
                    }
                }
            }
            let target = type_of(assignee)?;
            if target != value {
                return Err(mismatch(
                    format!("cannot assign {} to {}", value, target),
                    assignee.location(),
                ));
            }
        }
        Ok(())
    }

    fn return_stmt(&mut self, node: &ReturnStmt) -> DachsResult<()> {
        let mut types = types_of(&node.ret_exprs)?;
        let ty = match types.len() {
            0 => Type::unit(),
            1 => types.remove(0),
            _ => Type::tuple(types),
        };

        let ctx = self.ret.as_mut().ok_or_else(|| {
            semantic(
                SemanticErrorKind::TypeMismatch,
                "return outside of a function body".to_string(),
                &node.location,
            )
        })?;
        if ctx.kind == FuncKind::Proc && !node.ret_exprs.is_empty() {
            return Err(mismatch(
                format!("procedure '{}' cannot return a value", ctx.name),
                &node.location,
            ));
        }
        match &ctx.expected {
            Some(expected) if *expected != ty => Err(mismatch(
                format!(
                    "'{}' returns {} but this returns {}",
                    ctx.name, expected, ty
                ),
                &node.location,
            )),
            Some(_) => Ok(()),
            None => {
                ctx.expected = Some(ty);
                Ok(())
            }
        }
    }

    fn when_clauses(&self, clauses: &[WhenClause], target: Option<&Expr>) -> DachsResult<()> {
        let target_ty = target.map(type_of).transpose()?;
        for condition in clauses.iter().flat_map(|clause| &clause.conditions) {
            match &target_ty {
                None => expect_bool(condition, "when condition")?,
                Some(target_ty) => {
                    let ty = type_of(condition)?;
                    if ty != *target_ty {
                        return Err(mismatch(
                            format!("when value {} does not match switch target {}", ty, target_ty),
                            condition.location(),
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    fn for_stmt(&mut self, node: &'ast ForStmt) {
        if self.failed() {
            return;
        }
        self.env.push_scope();
        Children::of(&node.range_expr).walk(self);
        if !self.failed() {
            let result = self.bind_loop_variables(node);
            self.record(result);
        }
        Children::of(&node.body_stmts).walk(self);
        self.env.pop_scope();
    }

    fn bind_loop_variables(&mut self, node: &ForStmt) -> DachsResult<()> {
        let range = type_of(&node.range_expr)?;
        let element = match &range {
            Type::Array(element) => (**element).clone(),
            Type::Range { from, .. } => (**from).clone(),
            Type::Dict { key, value } => Type::tuple(vec![(**key).clone(), (**value).clone()]),
            other => {
                return Err(mismatch(
                    format!("cannot iterate over {}", other),
                    node.range_expr.location(),
                ))
            }
        };

        let types = spread(vec![element], node.iter_vars.len(), &node.location)?;
        for (var, ty) in node.iter_vars.iter().zip(types) {
            if let Some(annotation) = &var.param_type {
                let annotated = resolve_type_expr(annotation, self.scope)?;
                if annotated != ty {
                    return Err(mismatch(
                        format!(
                            "loop variable '{}' declared as {} but iterates {}",
                            var.name, annotated, ty
                        ),
                        &var.location,
                    ));
                }
            }
            var.ty.fill(ty.clone())?;
            self.env.define(&var.name, ty, var.is_var);
        }
        Ok(())
    }

    /// Callee name when `child` names a function rather than a local value
    fn function_name<'e>(&self, child: &'e Expr) -> Option<&'e str> {
        match child {
            Expr::Var(var) if self.env.get(&var.name).is_none() => Some(&var.name),
            _ => None,
        }
    }
}

impl<'ast, 's> Visitor<'ast> for TypeResolver<'ast, 's> {
    fn visit_statement_block(&mut self, _node: &'ast StatementBlock, children: Children<'ast>) {
        if self.failed() {
            return;
        }
        self.env.push_scope();
        children.walk(self);
        self.env.pop_scope();
    }

    fn visit_initialize_stmt(&mut self, node: &'ast InitializeStmt, _children: Children<'ast>) {
        // right-hand sides are typed before the new names come into scope
        self.post_order(Children::of(&node.maybe_rhs_exprs), |this| {
            this.initialize(node)
        });
    }

    fn visit_assignment_stmt(&mut self, node: &'ast AssignmentStmt, children: Children<'ast>) {
        self.post_order(children, |this| this.assignment(node));
    }

    fn visit_if_stmt(&mut self, node: &'ast IfStmt, children: Children<'ast>) {
        self.post_order(children, |_| {
            expect_bool(&node.condition, "condition")?;
            for clause in &node.elseif_stmts_list {
                expect_bool(&clause.condition, "condition")?;
            }
            Ok(())
        });
    }

    fn visit_return_stmt(&mut self, node: &'ast ReturnStmt, children: Children<'ast>) {
        self.post_order(children, |this| this.return_stmt(node));
    }

    fn visit_case_stmt(&mut self, node: &'ast CaseStmt, children: Children<'ast>) {
        self.post_order(children, |this| this.when_clauses(&node.when_stmts_list, None));
    }

    fn visit_switch_stmt(&mut self, node: &'ast SwitchStmt, children: Children<'ast>) {
        self.post_order(children, |this| {
            this.when_clauses(&node.when_stmts_list, Some(&node.target_expr))
        });
    }

    fn visit_for_stmt(&mut self, node: &'ast ForStmt, _children: Children<'ast>) {
        self.for_stmt(node);
    }

    fn visit_while_stmt(&mut self, node: &'ast WhileStmt, children: Children<'ast>) {
        self.post_order(children, |_| expect_bool(&node.condition, "condition"));
    }

    fn visit_postfix_if_stmt(&mut self, node: &'ast PostfixIfStmt, children: Children<'ast>) {
        self.post_order(children, |_| expect_bool(&node.condition, "condition"));
    }

    fn visit_let_stmt(&mut self, _node: &'ast LetStmt, children: Children<'ast>) {
        if self.failed() {
            return;
        }
        self.env.push_scope();
        children.walk(self);
        self.env.pop_scope();
    }

    fn visit_literal(&mut self, node: &'ast Literal, _children: Children<'ast>) {
        self.post_order(Children::none(), |_| node.ty.fill(literal_type(&node.value)));
    }

    fn visit_array_literal(&mut self, node: &'ast ArrayLiteral, children: Children<'ast>) {
        self.post_order(children, |this| this.array_literal(node));
    }

    fn visit_tuple_literal(&mut self, node: &'ast TupleLiteral, children: Children<'ast>) {
        self.post_order(children, |_| {
            node.ty.fill(Type::tuple(types_of(&node.element_exprs)?))
        });
    }

    fn visit_dict_literal(&mut self, node: &'ast DictLiteral, children: Children<'ast>) {
        self.post_order(children, |this| this.dict_literal(node));
    }

    fn visit_var_ref(&mut self, node: &'ast VarRef, _children: Children<'ast>) {
        self.post_order(Children::none(), |this| this.var_ref(node));
    }

    fn visit_func_invocation(&mut self, node: &'ast FuncInvocation, children: Children<'ast>) {
        match self.function_name(&node.child) {
            // the callee name is not a value; only the arguments are typed
            Some(name) => self.post_order(Children::of(&node.args), |this| {
                this.bind_call(name, &node.args, &node.callee, &node.ty, &node.location)
            }),
            None => self.post_order(children, |this| this.indirect_call(node)),
        }
    }

    fn visit_object_construct(&mut self, node: &'ast ObjectConstruct, _children: Children<'ast>) {
        self.post_order(Children::of(&node.args), |this| {
            node.ty.fill(resolve_type_expr(&node.obj_type, this.scope)?)
        });
    }

    fn visit_index_access(&mut self, node: &'ast IndexAccess, children: Children<'ast>) {
        self.post_order(children, |this| this.index_access(node));
    }

    fn visit_member_access(&mut self, node: &'ast MemberAccess, children: Children<'ast>) {
        self.post_order(children, |this| {
            let receiver = type_of(&node.child)?;
            this.bind_resolved(
                &node.member_name,
                &[receiver],
                &node.callee,
                &node.ty,
                &node.location,
            )
        });
    }

    fn visit_unary_expr(&mut self, node: &'ast UnaryExpr, children: Children<'ast>) {
        self.post_order(children, |this| this.unary_expr(node));
    }

    fn visit_cast_expr(&mut self, node: &'ast CastExpr, _children: Children<'ast>) {
        self.post_order(Children::of(&node.child), |this| {
            node.ty.fill(resolve_type_expr(&node.casted_type, this.scope)?)
        });
    }

    fn visit_binary_expr(&mut self, node: &'ast BinaryExpr, children: Children<'ast>) {
        self.post_order(children, |this| this.binary_expr(node));
    }

    fn visit_if_expr(&mut self, node: &'ast IfExpr, children: Children<'ast>) {
        self.post_order(children, |this| this.if_expr(node));
    }

    fn visit_typed_expr(&mut self, node: &'ast TypedExpr, _children: Children<'ast>) {
        if self.failed() {
            return;
        }
        let specified = match resolve_type_expr(&node.specified_type, self.scope) {
            Ok(ty) => ty,
            Err(err) => return self.record(Err(err)),
        };

        // an empty literal takes its type from the annotation
        let empty_literal = match &*node.child_expr {
            Expr::Array(array) if array.element_exprs.is_empty() => {
                Some((&array.ty, matches!(specified, Type::Array(_))))
            }
            Expr::Dict(dict) if dict.value.is_empty() => {
                Some((&dict.ty, matches!(specified, Type::Dict { .. })))
            }
            _ => None,
        };
        let children = match empty_literal {
            Some((slot, true)) => {
                let result = slot.fill(specified.clone());
                self.record(result);
                Children::none()
            }
            _ => Children::of(&node.child_expr),
        };

        self.post_order(children, |_| {
            let child = type_of(&node.child_expr)?;
            if child != specified {
                return Err(mismatch(
                    format!("expression of type {} annotated as {}", child, specified),
                    &node.location,
                ));
            }
            node.ty.fill(specified)
        });
    }
}
