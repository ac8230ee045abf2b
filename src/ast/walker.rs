//! Generic tree traversal
//!
//! [`walk`] hands each node to the matching `visit_*` method of a
//! [`Visitor`] together with [`Children`]: the node's declared children in
//! their fixed order. Calling `children.walk(self)` continues the traversal;
//! dropping it skips the subtree; a visitor may also walk a different set
//! built with [`Children::of`]. The walker itself never fails.

use super::node::*;
use crate::error::SourceLocation;

/// Borrowed view of one concrete node
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'ast> {
    Program(&'ast Program),
    ClassDefinition(&'ast ClassDefinition),
    FunctionDefinition(&'ast FunctionDefinition),
    Parameter(&'ast Parameter),
    StatementBlock(&'ast StatementBlock),
    VariableDecl(&'ast VariableDecl),
    InitializeStmt(&'ast InitializeStmt),
    AssignmentStmt(&'ast AssignmentStmt),
    IfStmt(&'ast IfStmt),
    ReturnStmt(&'ast ReturnStmt),
    CaseStmt(&'ast CaseStmt),
    SwitchStmt(&'ast SwitchStmt),
    ForStmt(&'ast ForStmt),
    WhileStmt(&'ast WhileStmt),
    PostfixIfStmt(&'ast PostfixIfStmt),
    LetStmt(&'ast LetStmt),
    Literal(&'ast Literal),
    ArrayLiteral(&'ast ArrayLiteral),
    TupleLiteral(&'ast TupleLiteral),
    DictLiteral(&'ast DictLiteral),
    VarRef(&'ast VarRef),
    FuncInvocation(&'ast FuncInvocation),
    ObjectConstruct(&'ast ObjectConstruct),
    IndexAccess(&'ast IndexAccess),
    MemberAccess(&'ast MemberAccess),
    UnaryExpr(&'ast UnaryExpr),
    CastExpr(&'ast CastExpr),
    BinaryExpr(&'ast BinaryExpr),
    IfExpr(&'ast IfExpr),
    TypedExpr(&'ast TypedExpr),
    PrimaryType(&'ast PrimaryType),
    ArrayTypeExpr(&'ast ArrayTypeExpr),
    DictTypeExpr(&'ast DictTypeExpr),
    TupleTypeExpr(&'ast TupleTypeExpr),
    FuncTypeExpr(&'ast FuncTypeExpr),
    QualifiedTypeExpr(&'ast QualifiedTypeExpr),
}

impl<'ast> NodeRef<'ast> {
    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeRef::Program(_) => "Program",
            NodeRef::ClassDefinition(_) => "ClassDefinition",
            NodeRef::FunctionDefinition(_) => "FunctionDefinition",
            NodeRef::Parameter(_) => "Parameter",
            NodeRef::StatementBlock(_) => "StatementBlock",
            NodeRef::VariableDecl(_) => "VariableDecl",
            NodeRef::InitializeStmt(_) => "InitializeStmt",
            NodeRef::AssignmentStmt(_) => "AssignmentStmt",
            NodeRef::IfStmt(_) => "IfStmt",
            NodeRef::ReturnStmt(_) => "ReturnStmt",
            NodeRef::CaseStmt(_) => "CaseStmt",
            NodeRef::SwitchStmt(_) => "SwitchStmt",
            NodeRef::ForStmt(_) => "ForStmt",
            NodeRef::WhileStmt(_) => "WhileStmt",
            NodeRef::PostfixIfStmt(_) => "PostfixIfStmt",
            NodeRef::LetStmt(_) => "LetStmt",
            NodeRef::Literal(_) => "Literal",
            NodeRef::ArrayLiteral(_) => "ArrayLiteral",
            NodeRef::TupleLiteral(_) => "TupleLiteral",
            NodeRef::DictLiteral(_) => "DictLiteral",
            NodeRef::VarRef(_) => "VarRef",
            NodeRef::FuncInvocation(_) => "FuncInvocation",
            NodeRef::ObjectConstruct(_) => "ObjectConstruct",
            NodeRef::IndexAccess(_) => "IndexAccess",
            NodeRef::MemberAccess(_) => "MemberAccess",
            NodeRef::UnaryExpr(_) => "UnaryExpr",
            NodeRef::CastExpr(_) => "CastExpr",
            NodeRef::BinaryExpr(_) => "BinaryExpr",
            NodeRef::IfExpr(_) => "IfExpr",
            NodeRef::TypedExpr(_) => "TypedExpr",
            NodeRef::PrimaryType(_) => "PrimaryType",
            NodeRef::ArrayTypeExpr(_) => "ArrayType",
            NodeRef::DictTypeExpr(_) => "DictType",
            NodeRef::TupleTypeExpr(_) => "TupleType",
            NodeRef::FuncTypeExpr(_) => "FuncType",
            NodeRef::QualifiedTypeExpr(_) => "QualifiedType",
        }
    }

    pub fn location(&self) -> &'ast SourceLocation {
        match *self {
            NodeRef::Program(n) => &n.location,
            NodeRef::ClassDefinition(n) => &n.location,
            NodeRef::FunctionDefinition(n) => &n.location,
            NodeRef::Parameter(n) => &n.location,
            NodeRef::StatementBlock(n) => &n.location,
            NodeRef::VariableDecl(n) => &n.location,
            NodeRef::InitializeStmt(n) => &n.location,
            NodeRef::AssignmentStmt(n) => &n.location,
            NodeRef::IfStmt(n) => &n.location,
            NodeRef::ReturnStmt(n) => &n.location,
            NodeRef::CaseStmt(n) => &n.location,
            NodeRef::SwitchStmt(n) => &n.location,
            NodeRef::ForStmt(n) => &n.location,
            NodeRef::WhileStmt(n) => &n.location,
            NodeRef::PostfixIfStmt(n) => &n.location,
            NodeRef::LetStmt(n) => &n.location,
            NodeRef::Literal(n) => &n.location,
            NodeRef::ArrayLiteral(n) => &n.location,
            NodeRef::TupleLiteral(n) => &n.location,
            NodeRef::DictLiteral(n) => &n.location,
            NodeRef::VarRef(n) => &n.location,
            NodeRef::FuncInvocation(n) => &n.location,
            NodeRef::ObjectConstruct(n) => &n.location,
            NodeRef::IndexAccess(n) => &n.location,
            NodeRef::MemberAccess(n) => &n.location,
            NodeRef::UnaryExpr(n) => &n.location,
            NodeRef::CastExpr(n) => &n.location,
            NodeRef::BinaryExpr(n) => &n.location,
            NodeRef::IfExpr(n) => &n.location,
            NodeRef::TypedExpr(n) => &n.location,
            NodeRef::PrimaryType(n) => &n.location,
            NodeRef::ArrayTypeExpr(n) => &n.location,
            NodeRef::DictTypeExpr(n) => &n.location,
            NodeRef::TupleTypeExpr(n) => &n.location,
            NodeRef::FuncTypeExpr(n) => &n.location,
            NodeRef::QualifiedTypeExpr(n) => &n.location,
        }
    }
}

impl<'ast> From<&'ast Expr> for NodeRef<'ast> {
    fn from(expr: &'ast Expr) -> Self {
        match expr {
            Expr::Literal(e) => NodeRef::Literal(e),
            Expr::Array(e) => NodeRef::ArrayLiteral(e),
            Expr::Tuple(e) => NodeRef::TupleLiteral(e),
            Expr::Dict(e) => NodeRef::DictLiteral(e),
            Expr::Var(e) => NodeRef::VarRef(e),
            Expr::Invocation(e) => NodeRef::FuncInvocation(e),
            Expr::Construct(e) => NodeRef::ObjectConstruct(e),
            Expr::Index(e) => NodeRef::IndexAccess(e),
            Expr::Member(e) => NodeRef::MemberAccess(e),
            Expr::Unary(e) => NodeRef::UnaryExpr(e),
            Expr::Cast(e) => NodeRef::CastExpr(e),
            Expr::Binary(e) => NodeRef::BinaryExpr(e),
            Expr::If(e) => NodeRef::IfExpr(e),
            Expr::Typed(e) => NodeRef::TypedExpr(e),
        }
    }
}

impl<'ast> From<&'ast Stmt> for NodeRef<'ast> {
    fn from(stmt: &'ast Stmt) -> Self {
        match stmt {
            Stmt::Initialize(s) => NodeRef::InitializeStmt(s),
            Stmt::Assignment(s) => NodeRef::AssignmentStmt(s),
            Stmt::If(s) => NodeRef::IfStmt(s),
            Stmt::Return(s) => NodeRef::ReturnStmt(s),
            Stmt::Case(s) => NodeRef::CaseStmt(s),
            Stmt::Switch(s) => NodeRef::SwitchStmt(s),
            Stmt::For(s) => NodeRef::ForStmt(s),
            Stmt::While(s) => NodeRef::WhileStmt(s),
            Stmt::PostfixIf(s) => NodeRef::PostfixIfStmt(s),
            Stmt::Let(s) => NodeRef::LetStmt(s),
            Stmt::Expr(e) => NodeRef::from(e),
            Stmt::Block(b) => NodeRef::StatementBlock(b),
        }
    }
}

impl<'ast> From<&'ast TypeExpr> for NodeRef<'ast> {
    fn from(ty: &'ast TypeExpr) -> Self {
        match ty {
            TypeExpr::Primary(t) => NodeRef::PrimaryType(t),
            TypeExpr::Array(t) => NodeRef::ArrayTypeExpr(t),
            TypeExpr::Dict(t) => NodeRef::DictTypeExpr(t),
            TypeExpr::Tuple(t) => NodeRef::TupleTypeExpr(t),
            TypeExpr::Func(t) => NodeRef::FuncTypeExpr(t),
            TypeExpr::Qualified(t) => NodeRef::QualifiedTypeExpr(t),
        }
    }
}

/// Anything that expands into an ordered list of child nodes
///
/// Sequences expand in order, an absent optional child expands to nothing
/// and a tagged union expands to its active variant.
pub trait IntoChildren<'ast> {
    fn push_into(self, out: &mut Vec<NodeRef<'ast>>);
}

macro_rules! leaf_into_children {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl<'ast> IntoChildren<'ast> for &'ast $ty {
                fn push_into(self, out: &mut Vec<NodeRef<'ast>>) {
                    out.push(NodeRef::$variant(self));
                }
            }
        )*
    };
}

leaf_into_children! {
    ClassDefinition => ClassDefinition,
    FunctionDefinition => FunctionDefinition,
    Parameter => Parameter,
    StatementBlock => StatementBlock,
    VariableDecl => VariableDecl,
    InitializeStmt => InitializeStmt,
}

impl<'ast> IntoChildren<'ast> for NodeRef<'ast> {
    fn push_into(self, out: &mut Vec<NodeRef<'ast>>) {
        out.push(self);
    }
}

impl<'ast> IntoChildren<'ast> for &'ast Expr {
    fn push_into(self, out: &mut Vec<NodeRef<'ast>>) {
        out.push(NodeRef::from(self));
    }
}

impl<'ast> IntoChildren<'ast> for &'ast Stmt {
    fn push_into(self, out: &mut Vec<NodeRef<'ast>>) {
        out.push(NodeRef::from(self));
    }
}

impl<'ast> IntoChildren<'ast> for &'ast TypeExpr {
    fn push_into(self, out: &mut Vec<NodeRef<'ast>>) {
        out.push(NodeRef::from(self));
    }
}

impl<'ast, T: ?Sized> IntoChildren<'ast> for &'ast Box<T>
where
    &'ast T: IntoChildren<'ast>,
{
    fn push_into(self, out: &mut Vec<NodeRef<'ast>>) {
        (&**self).push_into(out);
    }
}

impl<'ast, T> IntoChildren<'ast> for &'ast Option<T>
where
    &'ast T: IntoChildren<'ast>,
{
    fn push_into(self, out: &mut Vec<NodeRef<'ast>>) {
        if let Some(child) = self {
            child.push_into(out);
        }
    }
}

impl<'ast, T> IntoChildren<'ast> for &'ast [T]
where
    &'ast T: IntoChildren<'ast>,
{
    fn push_into(self, out: &mut Vec<NodeRef<'ast>>) {
        for child in self {
            child.push_into(out);
        }
    }
}

impl<'ast, T> IntoChildren<'ast> for &'ast Vec<T>
where
    &'ast T: IntoChildren<'ast>,
{
    fn push_into(self, out: &mut Vec<NodeRef<'ast>>) {
        self.as_slice().push_into(out);
    }
}

impl<'ast, A, B> IntoChildren<'ast> for &'ast (A, B)
where
    &'ast A: IntoChildren<'ast>,
    &'ast B: IntoChildren<'ast>,
{
    fn push_into(self, out: &mut Vec<NodeRef<'ast>>) {
        self.0.push_into(out);
        self.1.push_into(out);
    }
}

impl<'ast> IntoChildren<'ast> for &'ast ElseIfClause {
    fn push_into(self, out: &mut Vec<NodeRef<'ast>>) {
        (&self.condition).push_into(out);
        (&self.stmts).push_into(out);
    }
}

impl<'ast> IntoChildren<'ast> for &'ast WhenClause {
    fn push_into(self, out: &mut Vec<NodeRef<'ast>>) {
        (&self.conditions).push_into(out);
        (&self.stmts).push_into(out);
    }
}

impl<'ast> IntoChildren<'ast> for &'ast Program {
    fn push_into(self, out: &mut Vec<NodeRef<'ast>>) {
        for definition in &self.definitions {
            out.push(match *definition {
                Definition::Class(i) => NodeRef::ClassDefinition(&self.classes[i]),
                Definition::Function(id) => NodeRef::FunctionDefinition(&self.functions[id]),
            });
        }
    }
}

macro_rules! children {
    ($($child:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut nodes = Vec::new();
        $( IntoChildren::push_into($child, &mut nodes); )*
        Children::from_nodes(nodes)
    }};
}

/// The pending "visit the declared children" step of a traversal
#[derive(Debug, Clone, Default)]
pub struct Children<'ast> {
    nodes: Vec<NodeRef<'ast>>,
}

impl<'ast> Children<'ast> {
    /// Continuation of a leaf
    pub fn none() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn from_nodes(nodes: Vec<NodeRef<'ast>>) -> Self {
        Self { nodes }
    }

    /// An explicit child set, replacing the declared one
    pub fn of(children: impl IntoChildren<'ast>) -> Self {
        let mut nodes = Vec::new();
        children.push_into(&mut nodes);
        Self { nodes }
    }

    pub fn nodes(&self) -> &[NodeRef<'ast>] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Visit every child in order
    pub fn walk<V: Visitor<'ast> + ?Sized>(self, visitor: &mut V) {
        for node in self.nodes {
            walk(node, visitor);
        }
    }
}

/// Per-kind callbacks invoked by [`walk`]
///
/// Every method defaults to [`Visitor::visit_node`], whose default walks the
/// declared children. Passes that treat all nodes alike override only
/// `visit_node`.
#[allow(unused_variables)]
pub trait Visitor<'ast> {
    fn visit_node(&mut self, node: NodeRef<'ast>, children: Children<'ast>) {
        children.walk(self);
    }

    fn visit_program(&mut self, node: &'ast Program, children: Children<'ast>) {
        self.visit_node(NodeRef::Program(node), children);
    }

    fn visit_class_definition(&mut self, node: &'ast ClassDefinition, children: Children<'ast>) {
        self.visit_node(NodeRef::ClassDefinition(node), children);
    }

    fn visit_function_definition(
        &mut self,
        node: &'ast FunctionDefinition,
        children: Children<'ast>,
    ) {
        self.visit_node(NodeRef::FunctionDefinition(node), children);
    }

    fn visit_parameter(&mut self, node: &'ast Parameter, children: Children<'ast>) {
        self.visit_node(NodeRef::Parameter(node), children);
    }

    fn visit_statement_block(&mut self, node: &'ast StatementBlock, children: Children<'ast>) {
        self.visit_node(NodeRef::StatementBlock(node), children);
    }

    fn visit_variable_decl(&mut self, node: &'ast VariableDecl, children: Children<'ast>) {
        self.visit_node(NodeRef::VariableDecl(node), children);
    }

    fn visit_initialize_stmt(&mut self, node: &'ast InitializeStmt, children: Children<'ast>) {
        self.visit_node(NodeRef::InitializeStmt(node), children);
    }

    fn visit_assignment_stmt(&mut self, node: &'ast AssignmentStmt, children: Children<'ast>) {
        self.visit_node(NodeRef::AssignmentStmt(node), children);
    }

    fn visit_if_stmt(&mut self, node: &'ast IfStmt, children: Children<'ast>) {
        self.visit_node(NodeRef::IfStmt(node), children);
    }

    fn visit_return_stmt(&mut self, node: &'ast ReturnStmt, children: Children<'ast>) {
        self.visit_node(NodeRef::ReturnStmt(node), children);
    }

    fn visit_case_stmt(&mut self, node: &'ast CaseStmt, children: Children<'ast>) {
        self.visit_node(NodeRef::CaseStmt(node), children);
    }

    fn visit_switch_stmt(&mut self, node: &'ast SwitchStmt, children: Children<'ast>) {
        self.visit_node(NodeRef::SwitchStmt(node), children);
    }

    fn visit_for_stmt(&mut self, node: &'ast ForStmt, children: Children<'ast>) {
        self.visit_node(NodeRef::ForStmt(node), children);
    }

    fn visit_while_stmt(&mut self, node: &'ast WhileStmt, children: Children<'ast>) {
        self.visit_node(NodeRef::WhileStmt(node), children);
    }

    fn visit_postfix_if_stmt(&mut self, node: &'ast PostfixIfStmt, children: Children<'ast>) {
        self.visit_node(NodeRef::PostfixIfStmt(node), children);
    }

    fn visit_let_stmt(&mut self, node: &'ast LetStmt, children: Children<'ast>) {
        self.visit_node(NodeRef::LetStmt(node), children);
    }

    fn visit_literal(&mut self, node: &'ast Literal, children: Children<'ast>) {
        self.visit_node(NodeRef::Literal(node), children);
    }

    fn visit_array_literal(&mut self, node: &'ast ArrayLiteral, children: Children<'ast>) {
        self.visit_node(NodeRef::ArrayLiteral(node), children);
    }

    fn visit_tuple_literal(&mut self, node: &'ast TupleLiteral, children: Children<'ast>) {
        self.visit_node(NodeRef::TupleLiteral(node), children);
    }

    fn visit_dict_literal(&mut self, node: &'ast DictLiteral, children: Children<'ast>) {
        self.visit_node(NodeRef::DictLiteral(node), children);
    }

    fn visit_var_ref(&mut self, node: &'ast VarRef, children: Children<'ast>) {
        self.visit_node(NodeRef::VarRef(node), children);
    }

    fn visit_func_invocation(&mut self, node: &'ast FuncInvocation, children: Children<'ast>) {
        self.visit_node(NodeRef::FuncInvocation(node), children);
    }

    fn visit_object_construct(&mut self, node: &'ast ObjectConstruct, children: Children<'ast>) {
        self.visit_node(NodeRef::ObjectConstruct(node), children);
    }

    fn visit_index_access(&mut self, node: &'ast IndexAccess, children: Children<'ast>) {
        self.visit_node(NodeRef::IndexAccess(node), children);
    }

    fn visit_member_access(&mut self, node: &'ast MemberAccess, children: Children<'ast>) {
        self.visit_node(NodeRef::MemberAccess(node), children);
    }

    fn visit_unary_expr(&mut self, node: &'ast UnaryExpr, children: Children<'ast>) {
        self.visit_node(NodeRef::UnaryExpr(node), children);
    }

    fn visit_cast_expr(&mut self, node: &'ast CastExpr, children: Children<'ast>) {
        self.visit_node(NodeRef::CastExpr(node), children);
    }

    fn visit_binary_expr(&mut self, node: &'ast BinaryExpr, children: Children<'ast>) {
        self.visit_node(NodeRef::BinaryExpr(node), children);
    }

    fn visit_if_expr(&mut self, node: &'ast IfExpr, children: Children<'ast>) {
        self.visit_node(NodeRef::IfExpr(node), children);
    }

    fn visit_typed_expr(&mut self, node: &'ast TypedExpr, children: Children<'ast>) {
        self.visit_node(NodeRef::TypedExpr(node), children);
    }

    fn visit_primary_type(&mut self, node: &'ast PrimaryType, children: Children<'ast>) {
        self.visit_node(NodeRef::PrimaryType(node), children);
    }

    fn visit_array_type(&mut self, node: &'ast ArrayTypeExpr, children: Children<'ast>) {
        self.visit_node(NodeRef::ArrayTypeExpr(node), children);
    }

    fn visit_dict_type(&mut self, node: &'ast DictTypeExpr, children: Children<'ast>) {
        self.visit_node(NodeRef::DictTypeExpr(node), children);
    }

    fn visit_tuple_type(&mut self, node: &'ast TupleTypeExpr, children: Children<'ast>) {
        self.visit_node(NodeRef::TupleTypeExpr(node), children);
    }

    fn visit_func_type(&mut self, node: &'ast FuncTypeExpr, children: Children<'ast>) {
        self.visit_node(NodeRef::FuncTypeExpr(node), children);
    }

    fn visit_qualified_type(&mut self, node: &'ast QualifiedTypeExpr, children: Children<'ast>) {
        self.visit_node(NodeRef::QualifiedTypeExpr(node), children);
    }
}

/// Hand `node` to the visitor with its declared children
pub fn walk<'ast, V: Visitor<'ast> + ?Sized>(node: NodeRef<'ast>, visitor: &mut V) {
    match node {
        NodeRef::Program(n) => visitor.visit_program(n, Children::of(n)),
        NodeRef::ClassDefinition(n) => visitor.visit_class_definition(n, Children::none()),
        NodeRef::FunctionDefinition(n) => visitor.visit_function_definition(
            n,
            children!(&n.params, &n.return_type, &n.body, &n.ensure_body),
        ),
        NodeRef::Parameter(n) => visitor.visit_parameter(n, children!(&n.param_type)),
        NodeRef::StatementBlock(n) => visitor.visit_statement_block(n, children!(&n.value)),
        NodeRef::VariableDecl(n) => visitor.visit_variable_decl(n, children!(&n.maybe_type)),
        NodeRef::InitializeStmt(n) => {
            visitor.visit_initialize_stmt(n, children!(&n.var_decls, &n.maybe_rhs_exprs))
        }
        NodeRef::AssignmentStmt(n) => {
            visitor.visit_assignment_stmt(n, children!(&n.assignees, &n.rhs_exprs))
        }
        NodeRef::IfStmt(n) => visitor.visit_if_stmt(
            n,
            children!(
                &n.condition,
                &n.then_stmts,
                &n.elseif_stmts_list,
                &n.maybe_else_stmts
            ),
        ),
        NodeRef::ReturnStmt(n) => visitor.visit_return_stmt(n, children!(&n.ret_exprs)),
        NodeRef::CaseStmt(n) => {
            visitor.visit_case_stmt(n, children!(&n.when_stmts_list, &n.maybe_else_stmts))
        }
        NodeRef::SwitchStmt(n) => visitor.visit_switch_stmt(
            n,
            children!(&n.target_expr, &n.when_stmts_list, &n.maybe_else_stmts),
        ),
        NodeRef::ForStmt(n) => {
            visitor.visit_for_stmt(n, children!(&n.iter_vars, &n.range_expr, &n.body_stmts))
        }
        NodeRef::WhileStmt(n) => {
            visitor.visit_while_stmt(n, children!(&n.condition, &n.body_stmts))
        }
        NodeRef::PostfixIfStmt(n) => {
            visitor.visit_postfix_if_stmt(n, children!(&n.body, &n.condition))
        }
        NodeRef::LetStmt(n) => visitor.visit_let_stmt(n, children!(&n.inits, &n.child_stmt)),
        NodeRef::Literal(n) => visitor.visit_literal(n, Children::none()),
        NodeRef::ArrayLiteral(n) => visitor.visit_array_literal(n, children!(&n.element_exprs)),
        NodeRef::TupleLiteral(n) => visitor.visit_tuple_literal(n, children!(&n.element_exprs)),
        NodeRef::DictLiteral(n) => visitor.visit_dict_literal(n, children!(&n.value)),
        NodeRef::VarRef(n) => visitor.visit_var_ref(n, Children::none()),
        NodeRef::FuncInvocation(n) => {
            visitor.visit_func_invocation(n, children!(&n.child, &n.args))
        }
        NodeRef::ObjectConstruct(n) => {
            visitor.visit_object_construct(n, children!(&n.obj_type, &n.args))
        }
        NodeRef::IndexAccess(n) => {
            visitor.visit_index_access(n, children!(&n.child, &n.index_expr))
        }
        NodeRef::MemberAccess(n) => visitor.visit_member_access(n, children!(&n.child)),
        NodeRef::UnaryExpr(n) => visitor.visit_unary_expr(n, children!(&n.expr)),
        NodeRef::CastExpr(n) => visitor.visit_cast_expr(n, children!(&n.child, &n.casted_type)),
        NodeRef::BinaryExpr(n) => visitor.visit_binary_expr(n, children!(&n.rhs, &n.lhs)),
        NodeRef::IfExpr(n) => visitor.visit_if_expr(
            n,
            children!(&n.condition_expr, &n.then_expr, &n.else_expr),
        ),
        NodeRef::TypedExpr(n) => {
            visitor.visit_typed_expr(n, children!(&n.child_expr, &n.specified_type))
        }
        NodeRef::PrimaryType(n) => {
            visitor.visit_primary_type(n, children!(&n.instantiated_templates))
        }
        NodeRef::ArrayTypeExpr(n) => visitor.visit_array_type(n, children!(&n.elem_type)),
        NodeRef::DictTypeExpr(n) => {
            visitor.visit_dict_type(n, children!(&n.key_type, &n.value_type))
        }
        NodeRef::TupleTypeExpr(n) => visitor.visit_tuple_type(n, children!(&n.arg_types)),
        NodeRef::FuncTypeExpr(n) => {
            visitor.visit_func_type(n, children!(&n.arg_types, &n.ret_type))
        }
        NodeRef::QualifiedTypeExpr(n) => visitor.visit_qualified_type(n, children!(&n.ty)),
    }
}

/// Walk a whole program from its root
pub fn walk_program<'ast, V: Visitor<'ast> + ?Sized>(program: &'ast Program, visitor: &mut V) {
    walk(NodeRef::Program(program), visitor);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn loc(line: usize) -> SourceLocation {
        SourceLocation::at(line, 1)
    }

    /// Records the kind and line of every visited node
    #[derive(Default)]
    struct Recorder {
        visited: Vec<String>,
    }

    impl<'ast> Visitor<'ast> for Recorder {
        fn visit_node(&mut self, node: NodeRef<'ast>, children: Children<'ast>) {
            self.visited
                .push(format!("{}@{}", node.kind_name(), node.location().line));
            children.walk(self);
        }
    }

    fn record(node: NodeRef<'_>) -> Vec<String> {
        let mut recorder = Recorder::default();
        walk(node, &mut recorder);
        recorder.visited
    }

    #[test]
    fn test_binary_expr_visits_rhs_before_lhs() {
        let expr = Expr::binary(
            Expr::var("lhs", loc(2)),
            BinaryOp::Add,
            Expr::int(1, loc(3)),
            loc(1),
        );

        assert_eq!(
            record(NodeRef::from(&expr)),
            vec!["BinaryExpr@1", "Literal@3", "VarRef@2"]
        );
    }

    #[test]
    fn test_if_stmt_order_with_elseif_clauses() {
        let block = |line| StatementBlock::new(Vec::new(), loc(line));
        let stmt = Stmt::if_stmt(
            Expr::bool(true, loc(2)),
            block(3),
            vec![
                ElseIfClause {
                    condition: Expr::bool(false, loc(4)),
                    stmts: block(5),
                },
                ElseIfClause {
                    condition: Expr::bool(false, loc(6)),
                    stmts: block(7),
                },
            ],
            Some(block(8)),
            loc(1),
        );

        assert_eq!(
            record(NodeRef::from(&stmt)),
            vec![
                "IfStmt@1",
                "Literal@2",
                "StatementBlock@3",
                "Literal@4",
                "StatementBlock@5",
                "Literal@6",
                "StatementBlock@7",
                "StatementBlock@8",
            ]
        );
    }

    #[test]
    fn test_if_expr_and_for_stmt_order() {
        let if_expr = Expr::if_expr(
            Expr::bool(true, loc(2)),
            Expr::int(1, loc(3)),
            Expr::int(2, loc(4)),
            loc(1),
        );
        assert_eq!(
            record(NodeRef::from(&if_expr)),
            vec!["IfExpr@1", "Literal@2", "Literal@3", "Literal@4"]
        );

        let for_stmt = Stmt::for_stmt(
            vec![Parameter::template("i", loc(2))],
            Expr::var("xs", loc(3)),
            StatementBlock::new(Vec::new(), loc(4)),
            loc(1),
        );
        assert_eq!(
            record(NodeRef::from(&for_stmt)),
            vec!["ForStmt@1", "Parameter@2", "VarRef@3", "StatementBlock@4"]
        );
    }

    #[test]
    fn test_function_definition_order() {
        let def = FunctionDefinition::new(
            FuncKind::Func,
            "f",
            vec![Parameter::typed("a", TypeExpr::named("int", loc(3)), loc(2))],
            Some(TypeExpr::named("int", loc(4))),
            StatementBlock::new(Vec::new(), loc(5)),
            loc(1),
        )
        .with_ensure(StatementBlock::new(Vec::new(), loc(6)));

        assert_eq!(
            record(NodeRef::FunctionDefinition(&def)),
            vec![
                "FunctionDefinition@1",
                "Parameter@2",
                "PrimaryType@3",
                "PrimaryType@4",
                "StatementBlock@5",
                "StatementBlock@6",
            ]
        );
    }

    #[test]
    fn test_absent_optional_children_are_skipped() {
        let def = FunctionDefinition::new(
            FuncKind::Proc,
            "p",
            vec![Parameter::template("x", loc(2))],
            None,
            StatementBlock::new(Vec::new(), loc(3)),
            loc(1),
        );

        assert_eq!(
            record(NodeRef::FunctionDefinition(&def)),
            vec!["FunctionDefinition@1", "Parameter@2", "StatementBlock@3"]
        );
    }

    #[test]
    fn test_every_node_visited_once() {
        let mut program = Program::new(loc(1));
        program.add_class(ClassDefinition::new("Point", loc(2)));
        program.add_function(FunctionDefinition::new(
            FuncKind::Func,
            "main",
            Vec::new(),
            None,
            StatementBlock::new(
                vec![
                    Stmt::expr(Expr::call(
                        "f",
                        vec![Expr::int(1, loc(5)), Expr::string("s", loc(6))],
                        loc(4),
                    )),
                    Stmt::ret(vec![Expr::dict(
                        vec![(Expr::int(1, loc(8)), Expr::int(2, loc(9)))],
                        loc(7),
                    )], loc(7)),
                ],
                loc(3),
            ),
            loc(3),
        ));

        let visited = record(NodeRef::Program(&program));
        assert_eq!(
            visited,
            vec![
                "Program@1",
                "ClassDefinition@2",
                "FunctionDefinition@3",
                "StatementBlock@3",
                "FuncInvocation@4",
                "VarRef@4",
                "Literal@5",
                "Literal@6",
                "ReturnStmt@7",
                "DictLiteral@7",
                "Literal@8",
                "Literal@9",
            ]
        );
    }

    /// Skips function bodies and counts the rest
    struct SignatureOnly {
        count: usize,
    }

    impl<'ast> Visitor<'ast> for SignatureOnly {
        fn visit_node(&mut self, _node: NodeRef<'ast>, children: Children<'ast>) {
            self.count += 1;
            children.walk(self);
        }

        fn visit_function_definition(
            &mut self,
            node: &'ast FunctionDefinition,
            _children: Children<'ast>,
        ) {
            self.count += 1;
            Children::of(&node.params).walk(self);
        }
    }

    #[test]
    fn test_visitor_may_skip_or_replace_children() {
        let def = FunctionDefinition::new(
            FuncKind::Func,
            "f",
            vec![
                Parameter::typed("a", TypeExpr::named("int", loc(2)), loc(2)),
                Parameter::template("b", loc(3)),
            ],
            Some(TypeExpr::named("int", loc(4))),
            StatementBlock::new(vec![Stmt::ret(vec![Expr::var("a", loc(6))], loc(6))], loc(5)),
            loc(1),
        );

        let mut visitor = SignatureOnly { count: 0 };
        walk(NodeRef::FunctionDefinition(&def), &mut visitor);
        // definition, two parameters, one parameter type
        assert_eq!(visitor.count, 4);
    }

    #[test]
    fn test_leaf_has_empty_continuation() {
        struct LeafCheck(Vec<usize>);
        impl<'ast> Visitor<'ast> for LeafCheck {
            fn visit_var_ref(&mut self, _node: &'ast VarRef, children: Children<'ast>) {
                self.0.push(children.len());
            }
        }

        let expr = Expr::var("x", loc(1));
        let mut check = LeafCheck(Vec::new());
        walk(NodeRef::from(&expr), &mut check);
        assert_eq!(check.0, vec![0]);
    }

    #[test]
    fn test_program_definitions_in_source_order() {
        let empty_proc = |line| {
            FunctionDefinition::new(
                FuncKind::Proc,
                "p",
                Vec::new(),
                None,
                StatementBlock::new(Vec::new(), loc(line)),
                loc(line),
            )
        };
        let mut program = Program::new(loc(1));
        program.add_function(empty_proc(2));
        program.add_class(ClassDefinition::new("Point", loc(3)));
        program.add_function(empty_proc(4));

        assert_eq!(
            record(NodeRef::Program(&program)),
            vec![
                "Program@1",
                "FunctionDefinition@2",
                "StatementBlock@2",
                "ClassDefinition@3",
                "FunctionDefinition@4",
                "StatementBlock@4",
            ]
        );
    }
}
