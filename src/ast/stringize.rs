//! Indented textual dump of a syntax tree
//!
//! One line per node in walk order, children indented under their parent.
//! Resolved types are appended in parentheses once analysis has run.

use super::node::{LiteralValue, Program};
use super::walker::{walk, Children, NodeRef, Visitor};
use crate::types::Type;

const INDENT: &str = "  ";

struct Stringizer {
    depth: usize,
    out: String,
}

fn literal_text(value: &LiteralValue) -> String {
    match value {
        LiteralValue::Char(c) => format!("'{}'", c),
        LiteralValue::Float(f) => format!("{:?}", f),
        LiteralValue::Bool(b) => b.to_string(),
        LiteralValue::String(s) => format!("{:?}", s),
        LiteralValue::Int(i) => i.to_string(),
        LiteralValue::Uint(u) => format!("{}u", u),
        LiteralValue::Symbol(s) => format!(":{}", s),
    }
}

fn resolved(ty: Option<&Type>) -> String {
    ty.map(|t| format!(" ({})", t)).unwrap_or_default()
}

fn binding(is_var: bool, name: &str) -> String {
    if is_var {
        format!("var {}", name)
    } else {
        name.to_string()
    }
}

/// Node kind plus the detail that distinguishes it from its siblings
fn label(node: NodeRef<'_>) -> String {
    let detail = match node {
        NodeRef::ClassDefinition(n) => Some(n.name.clone()),
        NodeRef::FunctionDefinition(n) => Some(format!(
            "{} {}{}",
            n.kind.keyword(),
            n.name,
            resolved(n.ret_type.get())
        )),
        NodeRef::Parameter(n) => Some(format!(
            "{}{}",
            binding(n.is_var, &n.name),
            resolved(n.ty.get())
        )),
        NodeRef::VariableDecl(n) => Some(format!(
            "{}{}",
            binding(n.is_var, &n.name),
            resolved(n.ty.get())
        )),
        NodeRef::IfStmt(n) => Some(n.kind.keyword().to_string()),
        NodeRef::PostfixIfStmt(n) => Some(n.kind.keyword().to_string()),
        NodeRef::Literal(n) => Some(format!("{}{}", literal_text(&n.value), resolved(n.ty.get()))),
        NodeRef::VarRef(n) => Some(format!("{}{}", n.name, resolved(n.ty.get()))),
        NodeRef::MemberAccess(n) => Some(format!(".{}{}", n.member_name, resolved(n.ty.get()))),
        NodeRef::UnaryExpr(n) => Some(format!("{}{}", n.op.symbol(), resolved(n.ty.get()))),
        NodeRef::BinaryExpr(n) => Some(format!("{}{}", n.op.symbol(), resolved(n.ty.get()))),
        NodeRef::PrimaryType(n) => Some(n.name.clone()),
        NodeRef::QualifiedTypeExpr(_) => Some("?".to_string()),
        NodeRef::ArrayLiteral(n) => resolved_detail(n.ty.get()),
        NodeRef::TupleLiteral(n) => resolved_detail(n.ty.get()),
        NodeRef::DictLiteral(n) => resolved_detail(n.ty.get()),
        NodeRef::FuncInvocation(n) => resolved_detail(n.ty.get()),
        NodeRef::ObjectConstruct(n) => resolved_detail(n.ty.get()),
        NodeRef::IndexAccess(n) => resolved_detail(n.ty.get()),
        NodeRef::CastExpr(n) => resolved_detail(n.ty.get()),
        NodeRef::IfExpr(n) => resolved_detail(n.ty.get()),
        NodeRef::TypedExpr(n) => resolved_detail(n.ty.get()),
        _ => None,
    };

    match detail {
        Some(detail) => format!("{}: {}", node.kind_name(), detail.trim_start()),
        None => node.kind_name().to_string(),
    }
}

fn resolved_detail(ty: Option<&Type>) -> Option<String> {
    ty.map(ToString::to_string)
}

impl<'ast> Visitor<'ast> for Stringizer {
    fn visit_node(&mut self, node: NodeRef<'ast>, children: Children<'ast>) {
        self.out.push_str(&INDENT.repeat(self.depth));
        self.out.push_str(&label(node));
        self.out.push('\n');

        self.depth += 1;
        children.walk(self);
        self.depth -= 1;
    }
}

/// Dump a single subtree
pub fn stringize_node(node: NodeRef<'_>) -> String {
    let mut stringizer = Stringizer {
        depth: 0,
        out: String::new(),
    };
    walk(node, &mut stringizer);
    stringizer.out
}

/// Dump a whole program
pub fn stringize_ast(program: &Program) -> String {
    stringize_node(NodeRef::Program(program))
}
