//! Semantic analyzer implementation
//!
//! Runs the three analysis phases over a parsed program:
//! 1. symbol collection into a fresh [`GlobalScope`]
//! 2. type resolution of every non-template function body
//! 3. (optional) a check that no resolution slot was left empty
//!
//! The first semantic error aborts analysis; there is no recovery.

use tracing::{debug, info, info_span};

use crate::ast::{walk_program, Program};
use crate::error::DachsResult;

use super::collector::SymbolCollector;
use super::resolver::TypeResolver;
use super::scope::{FrozenScope, GlobalScope};
use super::verify::ResolutionChecker;

/// Knobs for a single analysis run
#[derive(Debug, Clone)]
pub struct AnalyzerOptions {
    /// Attached to the location of reported errors
    pub filename: Option<String>,
    /// Run the final pass that rejects unfilled resolution slots
    pub verify_resolution: bool,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            filename: None,
            verify_resolution: true,
        }
    }
}

impl AnalyzerOptions {
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Result of a successful analysis
#[derive(Debug)]
pub struct Analysis {
    /// Every function and class symbol, read-only
    pub scope: FrozenScope,
}

/// Analyze `program`, filling its resolution slots
///
/// A program can be analyzed only once: its slots are write-once.
///
/// # Errors
///
/// The first semantic error found, with `options.filename` attached to its
/// location.
pub fn analyze(program: &Program, options: &AnalyzerOptions) -> DachsResult<Analysis> {
    let filename = options.filename.as_deref();
    let _span = info_span!("analyze", file = filename.unwrap_or("<input>")).entered();

    run_phases(program, options).map_err(|err| err.with_filename(filename))
}

fn run_phases(program: &Program, options: &AnalyzerOptions) -> DachsResult<Analysis> {
    let mut scope = GlobalScope::new();

    {
        let _phase = info_span!("collect").entered();
        let mut collector = SymbolCollector::new(&mut scope);
        walk_program(program, &mut collector);
        collector.finish()?;
        debug!(
            classes = program.classes.len(),
            functions = program.functions.len(),
            "symbols collected"
        );
    }

    {
        let _phase = info_span!("resolve").entered();
        TypeResolver::new(program, &scope).run()?;
        debug!("types resolved");
    }

    if options.verify_resolution {
        let _phase = info_span!("verify").entered();
        let mut checker = ResolutionChecker::default();
        walk_program(program, &mut checker);
        let checked = checker.finish()?;
        debug!(slots = checked, "resolution verified");
    }

    info!("analysis complete");
    Ok(Analysis {
        scope: scope.freeze(),
    })
}

/// Shorthand for [`analyze`] with default options
pub fn analyze_program(program: &Program) -> DachsResult<Analysis> {
    analyze(program, &AnalyzerOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;
    use crate::error::{SemanticErrorKind, SourceLocation};
    use crate::types::{BuiltinType, Type};
    use pretty_assertions::assert_eq;

    fn loc(line: usize) -> SourceLocation {
        SourceLocation::at(line, 1)
    }

    fn ty(name: &str) -> TypeExpr {
        TypeExpr::named(name, loc(0))
    }

    fn block(stmts: Vec<Stmt>) -> StatementBlock {
        StatementBlock::new(stmts, loc(0))
    }

    fn func(
        name: &str,
        params: Vec<Parameter>,
        ret: Option<TypeExpr>,
        body: Vec<Stmt>,
        line: usize,
    ) -> FunctionDefinition {
        FunctionDefinition::new(FuncKind::Func, name, params, ret, block(body), loc(line))
    }

    fn param(name: &str, type_name: &str) -> Parameter {
        Parameter::typed(name, ty(type_name), loc(0))
    }

    fn main_proc(body: Vec<Stmt>) -> FunctionDefinition {
        FunctionDefinition::new(FuncKind::Proc, "main", vec![], None, block(body), loc(100))
    }

    fn init(name: &str, value: Expr, line: usize) -> Stmt {
        Stmt::init(
            vec![VariableDecl::new(name, false, None, loc(line))],
            Some(vec![value]),
            loc(line),
        )
    }

    fn expr_type(stmt: &Stmt) -> Option<&Type> {
        match stmt {
            Stmt::Expr(expr) => expr.ty().get(),
            Stmt::Initialize(init) => init.var_decls[0].ty.get(),
            _ => None,
        }
    }

    #[test]
    fn test_call_binds_best_overload() {
        let mut program = Program::new(loc(1));
        program.add_function(func(
            "f",
            vec![Parameter::template("a", loc(1)), Parameter::template("b", loc(1))],
            Some(ty("string")),
            vec![],
            1,
        ));
        program.add_function(func(
            "f",
            vec![param("a", "int"), param("b", "int")],
            Some(ty("int")),
            vec![Stmt::ret(vec![Expr::var("a", loc(2))], loc(2))],
            2,
        ));
        program.add_function(main_proc(vec![Stmt::expr(Expr::call(
            "f",
            vec![Expr::int(1, loc(5)), Expr::int(2, loc(5))],
            loc(5),
        ))]));

        let analysis = analyze_program(&program).unwrap();

        let main = program.functions.iter().last().unwrap().1;
        let Stmt::Expr(Expr::Invocation(call)) = &main.body.value[0] else {
            panic!("expected a call");
        };
        let callee = &analysis.scope[*call.callee.get().unwrap()];
        assert_eq!(callee.to_string(), "func f(int, int): int");
        assert_eq!(call.ty.get(), Some(&Type::int()));
    }

    #[test]
    fn test_return_type_inferred_on_demand() {
        let mut program = Program::new(loc(1));
        program.add_function(main_proc(vec![init(
            "x",
            Expr::call("twice", vec![Expr::float(1.5, loc(3))], loc(3)),
            3,
        )]));
        let twice = program.add_function(func(
            "twice",
            vec![param("v", "float")],
            None,
            vec![Stmt::ret(
                vec![Expr::binary(
                    Expr::var("v", loc(7)),
                    BinaryOp::Add,
                    Expr::var("v", loc(7)),
                    loc(7),
                )],
                loc(7),
            )],
            6,
        ));

        let analysis = analyze_program(&program).unwrap();

        let float = Type::builtin(BuiltinType::Float);
        assert_eq!(program.functions[twice].ret_type.get(), Some(&float));
        let symbol = analysis.scope.symbol_of(twice).unwrap();
        assert_eq!(analysis.scope[symbol].to_string(), "func twice(float): float");

        let main = program.functions.iter().next().unwrap().1;
        assert_eq!(expr_type(&main.body.value[0]), Some(&float));
    }

    #[test]
    fn test_recursion_through_uninferred_return_type() {
        let mut program = Program::new(loc(1));
        program.add_function(func(
            "loop_forever",
            vec![param("n", "int")],
            None,
            vec![Stmt::ret(
                vec![Expr::call("loop_forever", vec![Expr::var("n", loc(2))], loc(2))],
                loc(2),
            )],
            1,
        ));

        let err = analyze_program(&program).unwrap_err();
        assert_eq!(err.semantic_kind(), Some(SemanticErrorKind::NotInferable));
    }

    #[test]
    fn test_no_matching_overload_reports_call_site() {
        let mut program = Program::new(loc(1));
        program.add_function(func(
            "f",
            vec![param("a", "int"), param("b", "string")],
            Some(ty("int")),
            vec![Stmt::ret(vec![Expr::var("a", loc(2))], loc(2))],
            1,
        ));
        program.add_function(main_proc(vec![Stmt::expr(Expr::call(
            "f",
            vec![Expr::int(1, loc(9)), Expr::int(2, loc(9))],
            SourceLocation::at(9, 5),
        ))]));

        let options = AnalyzerOptions::default().with_filename("calls.dcs");
        let err = analyze(&program, &options).unwrap_err();
        assert_eq!(err.semantic_kind(), Some(SemanticErrorKind::NoMatchingOverload));
        assert_eq!(
            err.message(),
            "no matching overload for call f(int, int); candidates: func f(int, string): int"
        );
        assert_eq!(err.location().unwrap().to_string(), "calls.dcs:9:5");
    }

    #[test]
    fn test_duplicate_function_definition() {
        let mut program = Program::new(loc(1));
        program.add_function(func("f", vec![Parameter::template("x", loc(1))], None, vec![], 1));
        program.add_function(func("f", vec![Parameter::template("y", loc(2))], None, vec![], 2));

        let err = analyze_program(&program).unwrap_err();
        assert_eq!(err.semantic_kind(), Some(SemanticErrorKind::DuplicateDefinition));
        assert_eq!(err.location(), Some(&loc(2)));
    }

    #[test]
    fn test_template_bodies_are_left_untyped() {
        let mut program = Program::new(loc(1));
        let id = program.add_function(func(
            "id",
            vec![Parameter::template("x", loc(1))],
            None,
            vec![Stmt::ret(vec![Expr::var("x", loc(2))], loc(2))],
            1,
        ));

        analyze_program(&program).unwrap();
        let Stmt::Return(ret) = &program.functions[id].body.value[0] else {
            panic!("expected a return");
        };
        assert!(!ret.ret_exprs[0].ty().is_resolved());
    }

    #[test]
    fn test_member_access_resolves_as_call() {
        let mut program = Program::new(loc(1));
        program.add_function(func(
            "size",
            vec![param("s", "string")],
            Some(ty("uint")),
            vec![Stmt::ret(vec![Expr::uint(0, loc(2))], loc(2))],
            1,
        ));
        program.add_function(main_proc(vec![Stmt::expr(Expr::member(
            Expr::string("abc", loc(5)),
            "size",
            loc(5),
        ))]));

        analyze_program(&program).unwrap();
        let main = program.functions.iter().last().unwrap().1;
        assert_eq!(
            expr_type(&main.body.value[0]),
            Some(&Type::builtin(BuiltinType::Uint))
        );
    }

    #[test]
    fn test_condition_must_be_bool() {
        let mut program = Program::new(loc(1));
        program.add_function(main_proc(vec![Stmt::while_stmt(
            Expr::int(1, loc(4)),
            block(vec![]),
            loc(4),
        )]));

        let err = analyze_program(&program).unwrap_err();
        assert_eq!(err.semantic_kind(), Some(SemanticErrorKind::TypeMismatch));
        assert_eq!(err.message(), "condition must be bool, found int");
    }

    #[test]
    fn test_immutable_assignment() {
        let mut program = Program::new(loc(1));
        program.add_function(main_proc(vec![
            init("x", Expr::int(1, loc(2)), 2),
            Stmt::assign(vec![Expr::var("x", loc(3))], vec![Expr::int(2, loc(3))], loc(3)),
        ]));

        let err = analyze_program(&program).unwrap_err();
        assert_eq!(err.semantic_kind(), Some(SemanticErrorKind::ImmutableAssignment));
        assert_eq!(err.location(), Some(&loc(3)));
    }

    #[test]
    fn test_empty_literal_needs_annotation() {
        let mut program = Program::new(loc(1));
        program.add_function(main_proc(vec![init("xs", Expr::array(vec![], loc(2)), 2)]));
        let err = analyze_program(&program).unwrap_err();
        assert_eq!(err.semantic_kind(), Some(SemanticErrorKind::NotInferable));

        let mut program = Program::new(loc(1));
        program.add_function(main_proc(vec![init(
            "xs",
            Expr::typed(
                Expr::array(vec![], loc(2)),
                TypeExpr::array(ty("int"), loc(2)),
                loc(2),
            ),
            2,
        )]));
        analyze_program(&program).unwrap();
        let main = program.functions.iter().next().unwrap().1;
        assert_eq!(expr_type(&main.body.value[0]), Some(&Type::array(Type::int())));
    }

    #[test]
    fn test_verification_can_be_disabled() {
        let mut program = Program::new(loc(1));
        program.add_function(main_proc(vec![Stmt::expr(Expr::bool(true, loc(2)))]));

        let options = AnalyzerOptions {
            verify_resolution: false,
            ..AnalyzerOptions::default()
        };
        let analysis = analyze(&program, &options).unwrap();
        assert_eq!(analysis.scope.functions().count(), 1);
    }

    #[test]
    fn test_arithmetic_needs_numeric_operands() {
        let mut program = Program::new(loc(1));
        program.add_function(main_proc(vec![init(
            "z",
            Expr::binary(
                Expr::bool(true, loc(2)),
                BinaryOp::Multiply,
                Expr::bool(false, loc(2)),
                loc(2),
            ),
            2,
        )]));
        let err = analyze_program(&program).unwrap_err();
        assert_eq!(err.semantic_kind(), Some(SemanticErrorKind::TypeMismatch));
        assert_eq!(err.message(), "operator '*' cannot be applied to bool");

        let mut program = Program::new(loc(1));
        program.add_function(main_proc(vec![init(
            "z",
            Expr::binary(
                Expr::string("a", loc(2)),
                BinaryOp::Subtract,
                Expr::string("b", loc(2)),
                loc(2),
            ),
            2,
        )]));
        let err = analyze_program(&program).unwrap_err();
        assert_eq!(err.message(), "operator '-' cannot be applied to string");
    }

    #[test]
    fn test_plus_concatenates_strings() {
        let mut program = Program::new(loc(1));
        program.add_function(main_proc(vec![init(
            "s",
            Expr::binary(
                Expr::string("a", loc(2)),
                BinaryOp::Add,
                Expr::string("b", loc(2)),
                loc(2),
            ),
            2,
        )]));

        analyze_program(&program).unwrap();
        let main = program.functions.iter().next().unwrap().1;
        assert_eq!(
            expr_type(&main.body.value[0]),
            Some(&Type::builtin(BuiltinType::String))
        );
    }

    #[test]
    fn test_for_over_range_calls_function_value() {
        let accumulate = Stmt::assign(
            vec![Expr::var("acc", loc(4))],
            vec![Expr::binary(
                Expr::var("acc", loc(4)),
                BinaryOp::Add,
                Expr::invoke(Expr::var("g", loc(4)), vec![Expr::var("i", loc(4))], loc(4)),
                loc(4),
            )],
            loc(4),
        );
        let mut program = Program::new(loc(1));
        let apply = program.add_function(func(
            "apply",
            vec![
                Parameter::typed(
                    "g",
                    TypeExpr::func(vec![ty("int")], Some(ty("int")), loc(1)),
                    loc(1),
                ),
                param("n", "int"),
            ],
            Some(ty("int")),
            vec![
                Stmt::init(
                    vec![VariableDecl::new("acc", true, None, loc(2))],
                    Some(vec![Expr::int(0, loc(2))]),
                    loc(2),
                ),
                Stmt::for_stmt(
                    vec![Parameter::template("i", loc(3))],
                    Expr::binary(
                        Expr::int(0, loc(3)),
                        BinaryOp::Range,
                        Expr::var("n", loc(3)),
                        loc(3),
                    ),
                    block(vec![accumulate]),
                    loc(3),
                ),
                Stmt::ret(vec![Expr::var("acc", loc(6))], loc(6)),
            ],
            1,
        ));

        let analysis = analyze_program(&program).unwrap();
        let symbol = analysis.scope.symbol_of(apply).unwrap();
        assert_eq!(
            analysis.scope[symbol].to_string(),
            "func apply(func (int) : int, int): int"
        );

        let Stmt::For(for_stmt) = &program.functions[apply].body.value[1] else {
            panic!("expected a for statement");
        };
        assert_eq!(for_stmt.range_expr.ty().get(), Some(&Type::range(Type::int(), Type::int())));
        assert_eq!(for_stmt.iter_vars[0].ty.get(), Some(&Type::int()));

        let Stmt::Assignment(assign) = &for_stmt.body_stmts.value[0] else {
            panic!("expected an assignment");
        };
        let Expr::Binary(sum) = &assign.rhs_exprs[0] else {
            panic!("expected a binary expression");
        };
        let Expr::Invocation(call) = &*sum.rhs else {
            panic!("expected a call");
        };
        // a local function value is called directly, not through an overload
        assert!(!call.callee.is_resolved());
        assert_eq!(
            call.child.ty().get().map(ToString::to_string).as_deref(),
            Some("func (int) : int")
        );
        assert_eq!(call.ty.get(), Some(&Type::int()));
    }

    #[test]
    fn test_tuple_index_by_literal() {
        let pair = || {
            Expr::tuple(
                vec![Expr::int(1, loc(2)), Expr::string("s", loc(2))],
                loc(2),
            )
        };
        let mut program = Program::new(loc(1));
        program.add_function(main_proc(vec![init(
            "second",
            Expr::index(pair(), Expr::int(1, loc(2)), loc(2)),
            2,
        )]));
        analyze_program(&program).unwrap();
        let main = program.functions.iter().next().unwrap().1;
        assert_eq!(
            expr_type(&main.body.value[0]),
            Some(&Type::builtin(BuiltinType::String))
        );

        let mut program = Program::new(loc(1));
        program.add_function(main_proc(vec![init(
            "third",
            Expr::index(pair(), Expr::int(2, SourceLocation::at(2, 12)), loc(2)),
            2,
        )]));
        let err = analyze_program(&program).unwrap_err();
        assert_eq!(err.semantic_kind(), Some(SemanticErrorKind::TypeMismatch));
        assert_eq!(err.message(), "index out of range for (int,string)");
        assert_eq!(err.location(), Some(&SourceLocation::at(2, 12)));
    }

    #[test]
    fn test_ensure_body_is_typed() {
        let mut program = Program::new(loc(1));
        let checked = program.add_function(
            func(
                "checked",
                vec![param("n", "int")],
                Some(ty("int")),
                vec![Stmt::ret(vec![Expr::var("n", loc(2))], loc(2))],
                1,
            )
            .with_ensure(block(vec![init(
                "positive",
                Expr::binary(
                    Expr::var("n", loc(4)),
                    BinaryOp::Greater,
                    Expr::int(0, loc(4)),
                    loc(4),
                ),
                4,
            )])),
        );

        analyze_program(&program).unwrap();
        let ensure = program.functions[checked].ensure_body.as_ref().unwrap();
        assert_eq!(expr_type(&ensure.value[0]), Some(&Type::bool()));
    }
}
