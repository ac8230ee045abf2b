//! Abstract Syntax Tree definitions
//!
//! The tree is a single ownership hierarchy rooted at [`Program`]. Analysis
//! never changes its shape; it only fills the [`Slot`] fields.

use la_arena::{Arena, Idx};

use super::slot::Slot;
use crate::error::SourceLocation;
use crate::semantic::scope::FuncSymbolId;
use crate::types::{Qualifier, Type};

/// Handle to a function definition owned by a [`Program`]
pub type FuncDefId = Idx<FunctionDefinition>;

/// Position of a top-level definition in its owning table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Definition {
    Class(usize),
    Function(FuncDefId),
}

/// Root node: every class and function defined in a compilation unit
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub classes: Vec<ClassDefinition>,
    pub functions: Arena<FunctionDefinition>,
    /// Both tables interleaved in source order
    pub definitions: Vec<Definition>,
    pub location: SourceLocation,
}

impl Program {
    pub fn new(location: SourceLocation) -> Self {
        Self {
            classes: Vec::new(),
            functions: Arena::new(),
            definitions: Vec::new(),
            location,
        }
    }

    pub fn add_class(&mut self, class: ClassDefinition) {
        self.definitions.push(Definition::Class(self.classes.len()));
        self.classes.push(class);
    }

    pub fn add_function(&mut self, function: FunctionDefinition) -> FuncDefId {
        let id = self.functions.alloc(function);
        self.definitions.push(Definition::Function(id));
        id
    }
}

/// `class Name` declaration; members are not modelled
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDefinition {
    pub name: String,
    pub location: SourceLocation,
}

impl ClassDefinition {
    pub fn new(name: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }
}

/// Whether a function returns a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FuncKind {
    Func,
    Proc,
}

impl FuncKind {
    pub fn keyword(self) -> &'static str {
        match self {
            FuncKind::Func => "func",
            FuncKind::Proc => "proc",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    pub kind: FuncKind,
    pub name: String,
    pub params: Vec<Parameter>,
    pub return_type: Option<TypeExpr>,
    pub body: StatementBlock,
    /// Postcondition block
    pub ensure_body: Option<StatementBlock>,
    /// Concrete return type; the unit type for procedures
    pub ret_type: Slot<Type>,
    pub location: SourceLocation,
}

impl FunctionDefinition {
    pub fn new(
        kind: FuncKind,
        name: impl Into<String>,
        params: Vec<Parameter>,
        return_type: Option<TypeExpr>,
        body: StatementBlock,
        location: SourceLocation,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            params,
            return_type,
            body,
            ensure_body: None,
            ret_type: Slot::new(),
            location,
        }
    }

    pub fn with_ensure(mut self, ensure_body: StatementBlock) -> Self {
        self.ensure_body = Some(ensure_body);
        self
    }

    /// A function is a template when any parameter lacks a type annotation
    pub fn is_template(&self) -> bool {
        self.params.iter().any(Parameter::is_template)
    }
}

/// Function parameter or for-loop variable
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub is_var: bool,
    pub name: String,
    /// `None` makes the parameter an unconstrained template placeholder
    pub param_type: Option<TypeExpr>,
    pub ty: Slot<Type>,
    pub location: SourceLocation,
}

impl Parameter {
    pub fn typed(name: impl Into<String>, param_type: TypeExpr, location: SourceLocation) -> Self {
        Self {
            is_var: false,
            name: name.into(),
            param_type: Some(param_type),
            ty: Slot::new(),
            location,
        }
    }

    pub fn template(name: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            is_var: false,
            name: name.into(),
            param_type: None,
            ty: Slot::new(),
            location,
        }
    }

    pub fn mutable(mut self) -> Self {
        self.is_var = true;
        self
    }

    pub fn is_template(&self) -> bool {
        self.param_type.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatementBlock {
    pub value: Vec<Stmt>,
    pub location: SourceLocation,
}

impl StatementBlock {
    pub fn new(value: Vec<Stmt>, location: SourceLocation) -> Self {
        Self { value, location }
    }
}

// STATEMENTS

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Initialize(InitializeStmt),
    Assignment(AssignmentStmt),
    If(IfStmt),
    Return(ReturnStmt),
    Case(CaseStmt),
    Switch(SwitchStmt),
    For(ForStmt),
    While(WhileStmt),
    PostfixIf(PostfixIfStmt),
    Let(LetStmt),
    /// Expression evaluated for its effect
    Expr(Expr),
    Block(StatementBlock),
}

impl Stmt {
    pub fn location(&self) -> &SourceLocation {
        match self {
            Stmt::Initialize(s) => &s.location,
            Stmt::Assignment(s) => &s.location,
            Stmt::If(s) => &s.location,
            Stmt::Return(s) => &s.location,
            Stmt::Case(s) => &s.location,
            Stmt::Switch(s) => &s.location,
            Stmt::For(s) => &s.location,
            Stmt::While(s) => &s.location,
            Stmt::PostfixIf(s) => &s.location,
            Stmt::Let(s) => &s.location,
            Stmt::Expr(e) => e.location(),
            Stmt::Block(b) => &b.location,
        }
    }
}

/// `var x : int` or `x` inside an initialization
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    pub is_var: bool,
    pub name: String,
    pub maybe_type: Option<TypeExpr>,
    pub ty: Slot<Type>,
    pub location: SourceLocation,
}

impl VariableDecl {
    pub fn new(
        name: impl Into<String>,
        is_var: bool,
        maybe_type: Option<TypeExpr>,
        location: SourceLocation,
    ) -> Self {
        Self {
            is_var,
            name: name.into(),
            maybe_type,
            ty: Slot::new(),
            location,
        }
    }
}

/// `a, var b : int := 1, 2`
#[derive(Debug, Clone, PartialEq)]
pub struct InitializeStmt {
    pub var_decls: Vec<VariableDecl>,
    pub maybe_rhs_exprs: Option<Vec<Expr>>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentStmt {
    pub assignees: Vec<Expr>,
    pub rhs_exprs: Vec<Expr>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IfKind {
    If,
    Unless,
}

impl IfKind {
    pub fn keyword(self) -> &'static str {
        match self {
            IfKind::If => "if",
            IfKind::Unless => "unless",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElseIfClause {
    pub condition: Expr,
    pub stmts: StatementBlock,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub kind: IfKind,
    pub condition: Expr,
    pub then_stmts: StatementBlock,
    pub elseif_stmts_list: Vec<ElseIfClause>,
    pub maybe_else_stmts: Option<StatementBlock>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub ret_exprs: Vec<Expr>,
    pub location: SourceLocation,
}

/// One `when` arm of a case or switch statement
#[derive(Debug, Clone, PartialEq)]
pub struct WhenClause {
    pub conditions: Vec<Expr>,
    pub stmts: StatementBlock,
}

/// `case` with boolean `when` conditions
#[derive(Debug, Clone, PartialEq)]
pub struct CaseStmt {
    pub when_stmts_list: Vec<WhenClause>,
    pub maybe_else_stmts: Option<StatementBlock>,
    pub location: SourceLocation,
}

/// `case target` with `when` values compared against the target
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStmt {
    pub target_expr: Expr,
    pub when_stmts_list: Vec<WhenClause>,
    pub maybe_else_stmts: Option<StatementBlock>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub iter_vars: Vec<Parameter>,
    pub range_expr: Expr,
    pub body_stmts: StatementBlock,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body_stmts: StatementBlock,
    pub location: SourceLocation,
}

/// `stmt if cond`
#[derive(Debug, Clone, PartialEq)]
pub struct PostfixIfStmt {
    pub body: Box<Stmt>,
    pub kind: IfKind,
    pub condition: Expr,
    pub location: SourceLocation,
}

/// `let inits in stmt`
#[derive(Debug, Clone, PartialEq)]
pub struct LetStmt {
    pub inits: Vec<InitializeStmt>,
    pub child_stmt: Box<Stmt>,
    pub location: SourceLocation,
}

impl Stmt {
    pub fn expr(expr: Expr) -> Self {
        Stmt::Expr(expr)
    }

    pub fn init(
        var_decls: Vec<VariableDecl>,
        rhs: Option<Vec<Expr>>,
        location: SourceLocation,
    ) -> Self {
        Stmt::Initialize(InitializeStmt {
            var_decls,
            maybe_rhs_exprs: rhs,
            location,
        })
    }

    pub fn assign(assignees: Vec<Expr>, rhs_exprs: Vec<Expr>, location: SourceLocation) -> Self {
        Stmt::Assignment(AssignmentStmt {
            assignees,
            rhs_exprs,
            location,
        })
    }

    pub fn ret(ret_exprs: Vec<Expr>, location: SourceLocation) -> Self {
        Stmt::Return(ReturnStmt {
            ret_exprs,
            location,
        })
    }

    pub fn if_stmt(
        condition: Expr,
        then_stmts: StatementBlock,
        elseif_stmts_list: Vec<ElseIfClause>,
        maybe_else_stmts: Option<StatementBlock>,
        location: SourceLocation,
    ) -> Self {
        Stmt::If(IfStmt {
            kind: IfKind::If,
            condition,
            then_stmts,
            elseif_stmts_list,
            maybe_else_stmts,
            location,
        })
    }

    pub fn while_stmt(
        condition: Expr,
        body_stmts: StatementBlock,
        location: SourceLocation,
    ) -> Self {
        Stmt::While(WhileStmt {
            condition,
            body_stmts,
            location,
        })
    }

    pub fn for_stmt(
        iter_vars: Vec<Parameter>,
        range_expr: Expr,
        body_stmts: StatementBlock,
        location: SourceLocation,
    ) -> Self {
        Stmt::For(ForStmt {
            iter_vars,
            range_expr,
            body_stmts,
            location,
        })
    }
}

// EXPRESSIONS

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Char(char),
    Float(f64),
    Bool(bool),
    String(String),
    Int(i64),
    Uint(u64),
    Symbol(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: LiteralValue,
    pub ty: Slot<Type>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLiteral {
    pub element_exprs: Vec<Expr>,
    pub ty: Slot<Type>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TupleLiteral {
    pub element_exprs: Vec<Expr>,
    pub ty: Slot<Type>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DictLiteral {
    pub value: Vec<(Expr, Expr)>,
    pub ty: Slot<Type>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarRef {
    pub name: String,
    pub ty: Slot<Type>,
    pub location: SourceLocation,
}

/// `child(args...)`
#[derive(Debug, Clone, PartialEq)]
pub struct FuncInvocation {
    pub child: Box<Expr>,
    pub args: Vec<Expr>,
    /// Overload chosen for a call through a function name
    pub callee: Slot<FuncSymbolId>,
    pub ty: Slot<Type>,
    pub location: SourceLocation,
}

/// `new Type(args...)`
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectConstruct {
    pub obj_type: TypeExpr,
    pub args: Vec<Expr>,
    pub ty: Slot<Type>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexAccess {
    pub child: Box<Expr>,
    pub index_expr: Box<Expr>,
    pub ty: Slot<Type>,
    pub location: SourceLocation,
}

/// `child.member`, resolved as the call `member(child)`
#[derive(Debug, Clone, PartialEq)]
pub struct MemberAccess {
    pub child: Box<Expr>,
    pub member_name: String,
    pub callee: Slot<FuncSymbolId>,
    pub ty: Slot<Type>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::Not => "!",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub expr: Box<Expr>,
    pub ty: Slot<Type>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CastExpr {
    pub child: Box<Expr>,
    pub casted_type: TypeExpr,
    pub ty: Slot<Type>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
    /// `a..b`
    Range,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Range => "..",
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Equal
                | BinaryOp::NotEqual
                | BinaryOp::Less
                | BinaryOp::LessEqual
                | BinaryOp::Greater
                | BinaryOp::GreaterEqual
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub lhs: Box<Expr>,
    pub op: BinaryOp,
    pub rhs: Box<Expr>,
    pub ty: Slot<Type>,
    pub location: SourceLocation,
}

/// `if c then a else b`
#[derive(Debug, Clone, PartialEq)]
pub struct IfExpr {
    pub condition_expr: Box<Expr>,
    pub then_expr: Box<Expr>,
    pub else_expr: Box<Expr>,
    pub ty: Slot<Type>,
    pub location: SourceLocation,
}

/// `expr : type`
#[derive(Debug, Clone, PartialEq)]
pub struct TypedExpr {
    pub child_expr: Box<Expr>,
    pub specified_type: TypeExpr,
    pub ty: Slot<Type>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Array(ArrayLiteral),
    Tuple(TupleLiteral),
    Dict(DictLiteral),
    Var(VarRef),
    Invocation(FuncInvocation),
    Construct(ObjectConstruct),
    Index(IndexAccess),
    Member(MemberAccess),
    Unary(UnaryExpr),
    Cast(CastExpr),
    Binary(BinaryExpr),
    If(IfExpr),
    Typed(TypedExpr),
}

impl Expr {
    /// The resolution slot holding this expression's type
    pub fn ty(&self) -> &Slot<Type> {
        match self {
            Expr::Literal(e) => &e.ty,
            Expr::Array(e) => &e.ty,
            Expr::Tuple(e) => &e.ty,
            Expr::Dict(e) => &e.ty,
            Expr::Var(e) => &e.ty,
            Expr::Invocation(e) => &e.ty,
            Expr::Construct(e) => &e.ty,
            Expr::Index(e) => &e.ty,
            Expr::Member(e) => &e.ty,
            Expr::Unary(e) => &e.ty,
            Expr::Cast(e) => &e.ty,
            Expr::Binary(e) => &e.ty,
            Expr::If(e) => &e.ty,
            Expr::Typed(e) => &e.ty,
        }
    }

    pub fn location(&self) -> &SourceLocation {
        match self {
            Expr::Literal(e) => &e.location,
            Expr::Array(e) => &e.location,
            Expr::Tuple(e) => &e.location,
            Expr::Dict(e) => &e.location,
            Expr::Var(e) => &e.location,
            Expr::Invocation(e) => &e.location,
            Expr::Construct(e) => &e.location,
            Expr::Index(e) => &e.location,
            Expr::Member(e) => &e.location,
            Expr::Unary(e) => &e.location,
            Expr::Cast(e) => &e.location,
            Expr::Binary(e) => &e.location,
            Expr::If(e) => &e.location,
            Expr::Typed(e) => &e.location,
        }
    }

    pub fn literal(value: LiteralValue, location: SourceLocation) -> Self {
        Expr::Literal(Literal {
            value,
            ty: Slot::new(),
            location,
        })
    }

    pub fn int(value: i64, location: SourceLocation) -> Self {
        Self::literal(LiteralValue::Int(value), location)
    }

    pub fn uint(value: u64, location: SourceLocation) -> Self {
        Self::literal(LiteralValue::Uint(value), location)
    }

    pub fn float(value: f64, location: SourceLocation) -> Self {
        Self::literal(LiteralValue::Float(value), location)
    }

    pub fn bool(value: bool, location: SourceLocation) -> Self {
        Self::literal(LiteralValue::Bool(value), location)
    }

    pub fn char(value: char, location: SourceLocation) -> Self {
        Self::literal(LiteralValue::Char(value), location)
    }

    pub fn string(value: impl Into<String>, location: SourceLocation) -> Self {
        Self::literal(LiteralValue::String(value.into()), location)
    }

    pub fn symbol(value: impl Into<String>, location: SourceLocation) -> Self {
        Self::literal(LiteralValue::Symbol(value.into()), location)
    }

    pub fn var(name: impl Into<String>, location: SourceLocation) -> Self {
        Expr::Var(VarRef {
            name: name.into(),
            ty: Slot::new(),
            location,
        })
    }

    pub fn array(element_exprs: Vec<Expr>, location: SourceLocation) -> Self {
        Expr::Array(ArrayLiteral {
            element_exprs,
            ty: Slot::new(),
            location,
        })
    }

    pub fn tuple(element_exprs: Vec<Expr>, location: SourceLocation) -> Self {
        Expr::Tuple(TupleLiteral {
            element_exprs,
            ty: Slot::new(),
            location,
        })
    }

    pub fn dict(value: Vec<(Expr, Expr)>, location: SourceLocation) -> Self {
        Expr::Dict(DictLiteral {
            value,
            ty: Slot::new(),
            location,
        })
    }

    pub fn invoke(child: Expr, args: Vec<Expr>, location: SourceLocation) -> Self {
        Expr::Invocation(FuncInvocation {
            child: Box::new(child),
            args,
            callee: Slot::new(),
            ty: Slot::new(),
            location,
        })
    }

    /// Call of a function by name
    pub fn call(name: impl Into<String>, args: Vec<Expr>, location: SourceLocation) -> Self {
        Self::invoke(Self::var(name, location.clone()), args, location)
    }

    pub fn construct(obj_type: TypeExpr, args: Vec<Expr>, location: SourceLocation) -> Self {
        Expr::Construct(ObjectConstruct {
            obj_type,
            args,
            ty: Slot::new(),
            location,
        })
    }

    pub fn index(child: Expr, index_expr: Expr, location: SourceLocation) -> Self {
        Expr::Index(IndexAccess {
            child: Box::new(child),
            index_expr: Box::new(index_expr),
            ty: Slot::new(),
            location,
        })
    }

    pub fn member(child: Expr, member_name: impl Into<String>, location: SourceLocation) -> Self {
        Expr::Member(MemberAccess {
            child: Box::new(child),
            member_name: member_name.into(),
            callee: Slot::new(),
            ty: Slot::new(),
            location,
        })
    }

    pub fn unary(op: UnaryOp, expr: Expr, location: SourceLocation) -> Self {
        Expr::Unary(UnaryExpr {
            op,
            expr: Box::new(expr),
            ty: Slot::new(),
            location,
        })
    }

    pub fn cast(child: Expr, casted_type: TypeExpr, location: SourceLocation) -> Self {
        Expr::Cast(CastExpr {
            child: Box::new(child),
            casted_type,
            ty: Slot::new(),
            location,
        })
    }

    pub fn binary(lhs: Expr, op: BinaryOp, rhs: Expr, location: SourceLocation) -> Self {
        Expr::Binary(BinaryExpr {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
            ty: Slot::new(),
            location,
        })
    }

    pub fn if_expr(
        condition: Expr,
        then_expr: Expr,
        else_expr: Expr,
        location: SourceLocation,
    ) -> Self {
        Expr::If(IfExpr {
            condition_expr: Box::new(condition),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
            ty: Slot::new(),
            location,
        })
    }

    pub fn typed(child: Expr, specified_type: TypeExpr, location: SourceLocation) -> Self {
        Expr::Typed(TypedExpr {
            child_expr: Box::new(child),
            specified_type,
            ty: Slot::new(),
            location,
        })
    }
}

// TYPE ANNOTATIONS

/// `Name` or `Name(T1, T2)`
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryType {
    pub name: String,
    pub instantiated_templates: Vec<TypeExpr>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayTypeExpr {
    pub elem_type: Box<TypeExpr>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DictTypeExpr {
    pub key_type: Box<TypeExpr>,
    pub value_type: Box<TypeExpr>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TupleTypeExpr {
    pub arg_types: Vec<TypeExpr>,
    pub location: SourceLocation,
}

/// Function type annotation; no return type denotes a procedure
#[derive(Debug, Clone, PartialEq)]
pub struct FuncTypeExpr {
    pub arg_types: Vec<TypeExpr>,
    pub ret_type: Option<Box<TypeExpr>>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QualifiedTypeExpr {
    pub qualifier: Qualifier,
    pub ty: Box<TypeExpr>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Primary(PrimaryType),
    Array(ArrayTypeExpr),
    Dict(DictTypeExpr),
    Tuple(TupleTypeExpr),
    Func(FuncTypeExpr),
    Qualified(QualifiedTypeExpr),
}

impl TypeExpr {
    pub fn location(&self) -> &SourceLocation {
        match self {
            TypeExpr::Primary(t) => &t.location,
            TypeExpr::Array(t) => &t.location,
            TypeExpr::Dict(t) => &t.location,
            TypeExpr::Tuple(t) => &t.location,
            TypeExpr::Func(t) => &t.location,
            TypeExpr::Qualified(t) => &t.location,
        }
    }

    pub fn named(name: impl Into<String>, location: SourceLocation) -> Self {
        Self::generic(name, Vec::new(), location)
    }

    pub fn generic(
        name: impl Into<String>,
        instantiated_templates: Vec<TypeExpr>,
        location: SourceLocation,
    ) -> Self {
        TypeExpr::Primary(PrimaryType {
            name: name.into(),
            instantiated_templates,
            location,
        })
    }

    pub fn array(elem_type: TypeExpr, location: SourceLocation) -> Self {
        TypeExpr::Array(ArrayTypeExpr {
            elem_type: Box::new(elem_type),
            location,
        })
    }

    pub fn dict(key_type: TypeExpr, value_type: TypeExpr, location: SourceLocation) -> Self {
        TypeExpr::Dict(DictTypeExpr {
            key_type: Box::new(key_type),
            value_type: Box::new(value_type),
            location,
        })
    }

    pub fn tuple(arg_types: Vec<TypeExpr>, location: SourceLocation) -> Self {
        TypeExpr::Tuple(TupleTypeExpr {
            arg_types,
            location,
        })
    }

    pub fn func(
        arg_types: Vec<TypeExpr>,
        ret_type: Option<TypeExpr>,
        location: SourceLocation,
    ) -> Self {
        TypeExpr::Func(FuncTypeExpr {
            arg_types,
            ret_type: ret_type.map(Box::new),
            location,
        })
    }

    pub fn maybe(ty: TypeExpr, location: SourceLocation) -> Self {
        TypeExpr::Qualified(QualifiedTypeExpr {
            qualifier: Qualifier::Maybe,
            ty: Box::new(ty),
            location,
        })
    }
}
