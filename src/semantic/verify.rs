//! Resolution check
//!
//! Last analysis phase: walks the finished tree and reports the first
//! resolution slot that is still empty. Bodies of template functions are
//! never typed and are skipped.

use crate::ast::*;
use crate::error::{DachsError, DachsResult, SemanticErrorKind};
use crate::types::Type;

/// Type slot carried by `node`, if its kind has one
fn type_slot<'ast>(node: NodeRef<'ast>) -> Option<&'ast Slot<Type>> {
    match node {
        NodeRef::FunctionDefinition(n) => Some(&n.ret_type),
        NodeRef::Parameter(n) => Some(&n.ty),
        NodeRef::VariableDecl(n) => Some(&n.ty),
        NodeRef::Literal(n) => Some(&n.ty),
        NodeRef::ArrayLiteral(n) => Some(&n.ty),
        NodeRef::TupleLiteral(n) => Some(&n.ty),
        NodeRef::DictLiteral(n) => Some(&n.ty),
        NodeRef::VarRef(n) => Some(&n.ty),
        NodeRef::FuncInvocation(n) => Some(&n.ty),
        NodeRef::ObjectConstruct(n) => Some(&n.ty),
        NodeRef::IndexAccess(n) => Some(&n.ty),
        NodeRef::MemberAccess(n) => Some(&n.ty),
        NodeRef::UnaryExpr(n) => Some(&n.ty),
        NodeRef::CastExpr(n) => Some(&n.ty),
        NodeRef::BinaryExpr(n) => Some(&n.ty),
        NodeRef::IfExpr(n) => Some(&n.ty),
        NodeRef::TypedExpr(n) => Some(&n.ty),
        _ => None,
    }
}

#[derive(Default)]
pub(crate) struct ResolutionChecker {
    checked: usize,
    error: Option<DachsError>,
}

impl ResolutionChecker {
    pub(crate) fn finish(self) -> DachsResult<usize> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.checked),
        }
    }

    fn unresolved(&mut self, node: NodeRef<'_>, what: &str) {
        self.error.get_or_insert_with(|| {
            DachsError::semantic_error(
                SemanticErrorKind::UnresolvedSlot,
                format!("{} of {} was never resolved", what, node.kind_name()),
                node.location().clone(),
            )
        });
    }

    fn check_type(&mut self, node: NodeRef<'_>) {
        if let Some(slot) = type_slot(node) {
            self.checked += 1;
            if !slot.is_resolved() {
                self.unresolved(node, "type");
            }
        }
    }
}

impl<'ast> Visitor<'ast> for ResolutionChecker {
    fn visit_node(&mut self, node: NodeRef<'ast>, children: Children<'ast>) {
        if self.error.is_some() {
            return;
        }
        self.check_type(node);
        children.walk(self);
    }

    fn visit_function_definition(
        &mut self,
        node: &'ast FunctionDefinition,
        children: Children<'ast>,
    ) {
        if !node.is_template() {
            self.visit_node(NodeRef::FunctionDefinition(node), children);
        }
    }

    fn visit_func_invocation(&mut self, node: &'ast FuncInvocation, children: Children<'ast>) {
        if self.error.is_some() {
            return;
        }
        let this = NodeRef::FuncInvocation(node);
        self.check_type(this);
        if node.callee.is_resolved() {
            // called by name: the callee is a symbol, not a typed value
            Children::of(&node.args).walk(self);
        } else if node.child.ty().is_resolved() {
            children.walk(self);
        } else {
            self.unresolved(this, "callee");
        }
    }

    fn visit_member_access(&mut self, node: &'ast MemberAccess, children: Children<'ast>) {
        if self.error.is_some() {
            return;
        }
        if !node.callee.is_resolved() {
            self.unresolved(NodeRef::MemberAccess(node), "callee");
            return;
        }
        self.visit_node(NodeRef::MemberAccess(node), children);
    }
}
