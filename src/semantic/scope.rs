//! Global scope and overload resolution
//!
//! The scope owns every top-level function and class symbol. Symbols keep
//! only non-owning handles back into the syntax tree. The analysis pass is
//! the single writer; once it finishes the scope is frozen and handed to
//! consumers read-only.

use std::fmt;
use std::ops::{Deref, Index};

use la_arena::{Arena, Idx};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::ast::{FuncDefId, FuncKind, Slot};
use crate::error::{DachsError, DachsResult, SemanticErrorKind, SourceLocation};
use crate::types::Type;

/// Handle to a class symbol owned by a [`GlobalScope`]
pub type ClassId = Idx<ClassSymbol>;

/// Handle to a function symbol owned by a [`GlobalScope`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FuncSymbolId(u32);

impl FuncSymbolId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassSymbol {
    pub name: String,
    pub location: SourceLocation,
}

impl ClassSymbol {
    pub fn new(name: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }
}

/// Declared type of one function parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// Unconstrained placeholder accepting any argument
    Template,
    Concrete(Type),
}

impl ParamType {
    /// Factor this parameter contributes to a candidate's score
    fn score(&self, arg: &Type) -> u64 {
        match self {
            ParamType::Template => 1,
            ParamType::Concrete(ty) if ty == arg => 2,
            ParamType::Concrete(_) => 0,
        }
    }

    pub fn is_template(&self) -> bool {
        matches!(self, ParamType::Template)
    }

    pub fn concrete(&self) -> Option<&Type> {
        match self {
            ParamType::Template => None,
            ParamType::Concrete(ty) => Some(ty),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Template => f.write_str("T"),
            ParamType::Concrete(ty) => write!(f, "{}", ty),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FunctionSymbol {
    pub name: String,
    pub kind: FuncKind,
    pub params: Vec<ParamType>,
    /// Annotated, or inferred once the body has been analyzed; never set for procedures
    pub ret_type: Slot<Type>,
    /// Defining node in the program's function arena
    pub definition: FuncDefId,
    pub location: SourceLocation,
}

impl FunctionSymbol {
    pub fn new(
        kind: FuncKind,
        name: impl Into<String>,
        params: Vec<ParamType>,
        definition: FuncDefId,
        location: SourceLocation,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            params,
            ret_type: Slot::new(),
            definition,
            location,
        }
    }

    pub fn with_return_type(self, ret_type: Type) -> Self {
        Self {
            ret_type: Slot::resolved(ret_type),
            ..self
        }
    }

    pub fn return_type(&self) -> Option<&Type> {
        self.ret_type.get()
    }

    pub fn is_template(&self) -> bool {
        self.params.iter().any(ParamType::is_template)
    }

    /// How well this symbol accepts a call with `args`
    ///
    /// 0 rejects the candidate. A nullary match scores 1; otherwise the
    /// score is the product of the per-parameter factors, so a single
    /// mismatching concrete parameter vetoes the whole candidate.
    pub fn score(&self, args: &[Type]) -> u64 {
        if self.params.len() != args.len() {
            return 0;
        }
        if args.is_empty() {
            return 1;
        }
        self.params
            .iter()
            .zip(args)
            .fold(1u64, |acc, (param, arg)| acc.saturating_mul(param.score(arg)))
    }
}

/// Signature equality for conflict checks; never looks at call sites
impl PartialEq for FunctionSymbol {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.params == other.params
    }
}

impl fmt::Display for FunctionSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}(", self.kind.keyword(), self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", param)?;
        }
        f.write_str(")")?;
        if let Some(ret) = self.return_type() {
            write!(f, ": {}", ret)?;
        }
        Ok(())
    }
}

/// Render a call site as `name(int, string)` for diagnostics
pub fn call_signature(name: &str, args: &[Type]) -> String {
    let args: Vec<String> = args.iter().map(ToString::to_string).collect();
    format!("{}({})", name, args.join(", "))
}

/// The binding environment for top-level symbols
#[derive(Debug, Default)]
pub struct GlobalScope {
    functions: Vec<FunctionSymbol>,
    functions_by_name: FxHashMap<String, Vec<FuncSymbolId>>,
    functions_by_definition: FxHashMap<FuncDefId, FuncSymbolId>,
    classes: Arena<ClassSymbol>,
    classes_by_name: FxHashMap<String, ClassId>,
}

impl GlobalScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function symbol
    ///
    /// # Errors
    ///
    /// `DuplicateDefinition` if a symbol with an equal signature exists.
    pub fn define_function(&mut self, symbol: FunctionSymbol) -> DachsResult<FuncSymbolId> {
        let overloads = self.functions_by_name.entry(symbol.name.clone()).or_default();
        if let Some(existing) = overloads
            .iter()
            .map(|id| &self.functions[id.index()])
            .find(|existing| **existing == symbol)
        {
            return Err(DachsError::semantic_error(
                SemanticErrorKind::DuplicateDefinition,
                format!(
                    "'{}' conflicts with '{}' defined at {}",
                    symbol, existing, existing.location
                ),
                symbol.location.clone(),
            ));
        }

        let id = FuncSymbolId(self.functions.len() as u32);
        debug!(define = "function", symbol = %symbol, overloads = overloads.len() + 1);
        overloads.push(id);
        self.functions_by_definition.insert(symbol.definition, id);
        self.functions.push(symbol);
        Ok(id)
    }

    /// Register a class by name
    ///
    /// # Errors
    ///
    /// `DuplicateDefinition` if the name is already a class.
    pub fn define_class(&mut self, symbol: ClassSymbol) -> DachsResult<ClassId> {
        if let Some(&existing) = self.classes_by_name.get(&symbol.name) {
            return Err(DachsError::semantic_error(
                SemanticErrorKind::DuplicateDefinition,
                format!(
                    "class '{}' is already defined at {}",
                    symbol.name, self.classes[existing].location
                ),
                symbol.location.clone(),
            ));
        }

        debug!(define = "class", name = %symbol.name);
        let name = symbol.name.clone();
        let id = self.classes.alloc(symbol);
        self.classes_by_name.insert(name, id);
        Ok(id)
    }

    pub fn lookup_class(&self, name: &str) -> Option<ClassId> {
        self.classes_by_name.get(name).copied()
    }

    pub fn class(&self, id: ClassId) -> &ClassSymbol {
        &self.classes[id]
    }

    pub fn function(&self, id: FuncSymbolId) -> &FunctionSymbol {
        &self.functions[id.index()]
    }

    /// All function symbols in declaration order
    pub fn functions(&self) -> impl Iterator<Item = (FuncSymbolId, &FunctionSymbol)> {
        self.functions
            .iter()
            .enumerate()
            .map(|(i, symbol)| (FuncSymbolId(i as u32), symbol))
    }

    /// Overloads sharing `name`, in declaration order
    pub fn overloads(&self, name: &str) -> &[FuncSymbolId] {
        self.functions_by_name
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_function(&self, name: &str) -> bool {
        !self.overloads(name).is_empty()
    }

    /// Symbol created for a function definition node
    pub fn symbol_of(&self, definition: FuncDefId) -> Option<FuncSymbolId> {
        self.functions_by_definition.get(&definition).copied()
    }

    /// Best overload of `name` for a call with `args`
    ///
    /// Candidates are scanned in declaration order and a later candidate
    /// only replaces the current best with a strictly higher score, so the
    /// earliest declaration wins ties. `None` when nothing scores above 0.
    pub fn resolve_func(&self, name: &str, args: &[Type]) -> Option<FuncSymbolId> {
        let mut best: Option<(FuncSymbolId, u64)> = None;

        for &id in self.overloads(name) {
            let score = self.function(id).score(args);
            trace!(resolve = %name, candidate = %self.function(id), score);
            if score > best.map_or(0, |(_, s)| s) {
                best = Some((id, score));
            }
        }

        match best {
            Some((id, score)) => {
                debug!(resolve = %call_signature(name, args), chosen = %self.function(id), score);
                Some(id)
            }
            None => {
                debug!(resolve = %call_signature(name, args), chosen = "none");
                None
            }
        }
    }

    /// Record the inferred return type of a function
    ///
    /// # Errors
    ///
    /// Internal error when the return type was already recorded.
    pub fn set_return_type(&self, id: FuncSymbolId, ret_type: Type) -> DachsResult<()> {
        self.function(id).ret_type.fill(ret_type)
    }

    /// Error describing a failed resolution, listing the candidates
    pub fn no_matching_overload(
        &self,
        name: &str,
        args: &[Type],
        location: SourceLocation,
    ) -> DachsError {
        let candidates: Vec<String> = self
            .overloads(name)
            .iter()
            .map(|&id| self.function(id).to_string())
            .collect();
        let message = if candidates.is_empty() {
            format!("no function matches call {}", call_signature(name, args))
        } else {
            format!(
                "no matching overload for call {}; candidates: {}",
                call_signature(name, args),
                candidates.join("; ")
            )
        };
        DachsError::semantic_error(SemanticErrorKind::NoMatchingOverload, message, location)
    }

    /// End construction; the result only supports queries
    pub fn freeze(self) -> FrozenScope {
        debug!(
            functions = self.functions.len(),
            classes = self.classes.len(),
            "global scope frozen"
        );
        FrozenScope { scope: self }
    }
}

impl Index<FuncSymbolId> for GlobalScope {
    type Output = FunctionSymbol;

    fn index(&self, id: FuncSymbolId) -> &FunctionSymbol {
        self.function(id)
    }
}

/// Read-only global scope handed to code generation and diagnostics
#[derive(Debug)]
pub struct FrozenScope {
    scope: GlobalScope,
}

impl Deref for FrozenScope {
    type Target = GlobalScope;

    fn deref(&self) -> &GlobalScope {
        &self.scope
    }
}
