//! Symbol collection
//!
//! First analysis phase: registers every class, then every function
//! signature, in the global scope. Function bodies are not entered.

use tracing::trace;

use crate::ast::{
    walk, Children, ClassDefinition, FuncDefId, FuncKind, FunctionDefinition, NodeRef, Program,
    Visitor,
};
use crate::error::{DachsError, DachsResult};
use crate::types::Type;

use super::annotation::resolve_type_expr;
use super::scope::{ClassSymbol, FunctionSymbol, GlobalScope, ParamType};

pub(crate) struct SymbolCollector<'s> {
    scope: &'s mut GlobalScope,
    current: Option<FuncDefId>,
    error: Option<DachsError>,
}

impl<'s> SymbolCollector<'s> {
    pub(crate) fn new(scope: &'s mut GlobalScope) -> Self {
        Self {
            scope,
            current: None,
            error: None,
        }
    }

    pub(crate) fn finish(self) -> DachsResult<()> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn record(&mut self, result: DachsResult<()>) {
        if let Err(err) = result {
            self.error.get_or_insert(err);
        }
    }

    fn collect_class(&mut self, node: &ClassDefinition) -> DachsResult<()> {
        self.scope
            .define_class(ClassSymbol::new(node.name.clone(), node.location.clone()))?;
        Ok(())
    }

    fn collect_function(&mut self, id: FuncDefId, node: &FunctionDefinition) -> DachsResult<()> {
        let mut params = Vec::with_capacity(node.params.len());
        for param in &node.params {
            match &param.param_type {
                Some(annotation) => {
                    let ty = resolve_type_expr(annotation, self.scope)?;
                    param.ty.fill(ty.clone())?;
                    params.push(ParamType::Concrete(ty));
                }
                None => params.push(ParamType::Template),
            }
        }

        let mut symbol = FunctionSymbol::new(
            node.kind,
            node.name.clone(),
            params,
            id,
            node.location.clone(),
        );
        match (node.kind, &node.return_type) {
            (FuncKind::Proc, _) => node.ret_type.fill(Type::unit())?,
            (FuncKind::Func, Some(annotation)) => {
                let ret = resolve_type_expr(annotation, self.scope)?;
                node.ret_type.fill(ret.clone())?;
                symbol = symbol.with_return_type(ret);
            }
            // inferred from the body later
            (FuncKind::Func, None) => {}
        }

        trace!(collect = %symbol);
        self.scope.define_function(symbol)?;
        Ok(())
    }
}

impl<'ast, 's> Visitor<'ast> for SymbolCollector<'s> {
    fn visit_program(&mut self, node: &'ast Program, _children: Children<'ast>) {
        // Classes go first so parameter annotations can name them.
        Children::of(&node.classes).walk(self);
        for (id, function) in node.functions.iter() {
            if self.error.is_some() {
                return;
            }
            self.current = Some(id);
            walk(NodeRef::FunctionDefinition(function), self);
        }
        self.current = None;
    }

    fn visit_class_definition(&mut self, node: &'ast ClassDefinition, _children: Children<'ast>) {
        if self.error.is_none() {
            let result = self.collect_class(node);
            self.record(result);
        }
    }

    fn visit_function_definition(
        &mut self,
        node: &'ast FunctionDefinition,
        _children: Children<'ast>,
    ) {
        let result = match self.current {
            Some(id) => self.collect_function(id, node),
            None => Err(DachsError::internal_error(format!(
                "function '{}' reached outside its program",
                node.name
            ))),
        };
        self.record(result);
    }
}
