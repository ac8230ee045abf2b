//! Type annotations to semantic types

use crate::ast::TypeExpr;
use crate::error::{DachsError, DachsResult, SemanticErrorKind};
use crate::types::{get_builtin_type, ClassType, Type};

use super::scope::GlobalScope;

/// Translate a written type annotation into a [`Type`]
///
/// Names are looked up among builtins first, then among the classes
/// registered in `scope`.
pub fn resolve_type_expr(expr: &TypeExpr, scope: &GlobalScope) -> DachsResult<Type> {
    match expr {
        TypeExpr::Primary(primary) => {
            if primary.instantiated_templates.is_empty() {
                if let Some(builtin) = get_builtin_type(&primary.name) {
                    return Ok(Type::builtin(builtin));
                }
            }

            let class = scope.lookup_class(&primary.name).ok_or_else(|| {
                DachsError::semantic_error(
                    SemanticErrorKind::UnknownType,
                    format!("unknown type '{}'", primary.name),
                    primary.location.clone(),
                )
            })?;
            let args = primary
                .instantiated_templates
                .iter()
                .map(|arg| resolve_type_expr(arg, scope))
                .collect::<DachsResult<Vec<_>>>()?;
            Ok(ClassType::new(primary.name.clone(), Some(class)).instantiate(args))
        }
        TypeExpr::Array(array) => Ok(Type::array(resolve_type_expr(&array.elem_type, scope)?)),
        TypeExpr::Dict(dict) => Ok(Type::dict(
            resolve_type_expr(&dict.key_type, scope)?,
            resolve_type_expr(&dict.value_type, scope)?,
        )),
        TypeExpr::Tuple(tuple) => Ok(Type::tuple(resolve_all(&tuple.arg_types, scope)?)),
        TypeExpr::Func(func) => {
            let params = resolve_all(&func.arg_types, scope)?;
            match &func.ret_type {
                Some(ret) => Ok(Type::func(params, resolve_type_expr(ret, scope)?)),
                None => Ok(Type::proc(params)),
            }
        }
        TypeExpr::Qualified(qualified) => Ok(Type::qualified(
            qualified.qualifier,
            resolve_type_expr(&qualified.ty, scope)?,
        )),
    }
}

fn resolve_all(exprs: &[TypeExpr], scope: &GlobalScope) -> DachsResult<Vec<Type>> {
    exprs.iter().map(|expr| resolve_type_expr(expr, scope)).collect()
}
