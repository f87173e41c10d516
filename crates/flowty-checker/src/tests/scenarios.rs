//! The concrete scenarios of spec.md §8, end to end through `check()`.

use flowty_algebra::testutil::MapResolver;
use flowty_algebra::{RecordField, RecordType, Type, TypeInterner};
use flowty_common::{CoreDiagnosticKind, CoreOptions, Interner, Span};
use flowty_solver::{Engine, StaticLifetimeRelation};

use crate::ast::{CallableBody, Condition, ConstKind, Expr, Stmt, VarId};
use crate::collaborators::CollectingReporter;
use crate::context::CheckerContext;
use crate::declaration::TopLevelDeclaration;

/// Scenario A: `if x is int: return x else: return 0` reports nothing.
#[test]
fn scenario_a_positive_flow_refinement() {
    let interner = TypeInterner::new();
    let resolver = MapResolver::new();
    let names = Interner::new();
    let lifetimes = StaticLifetimeRelation::new(names.intern("*"));
    let options = CoreOptions::default();
    let engine = Engine::new(&interner, &resolver, &lifetimes, &options);
    let reporter = CollectingReporter::new();
    let ctx = CheckerContext::new(&engine, &resolver, &reporter, &options);

    let x = VarId(0);
    let callable = CallableBody {
        name: names.intern("f"),
        params: vec![(x, Type::union(vec![Type::Int, Type::Null]))],
        returns: vec![Type::Int],
        declared_lifetimes: vec![],
        preconditions: vec![],
        postconditions: vec![],
        body: vec![Stmt::If {
            condition: Condition::TypeTest {
                operand: Expr::Var(x),
                target: Type::Int,
            },
            then_branch: vec![Stmt::Return(vec![Expr::Var(x)])],
            else_branch: vec![Stmt::Return(vec![Expr::Const(ConstKind::Int(0))])],
        }],
        span: Span::dummy(),
    };

    ctx.check(&[TopLevelDeclaration::Callable(callable)]).unwrap();
    assert!(reporter.take().is_empty());
}

/// Scenario B: `return x is null` where `x: int` is an impossible test.
#[test]
fn scenario_b_impossible_test_diagnosed() {
    let interner = TypeInterner::new();
    let resolver = MapResolver::new();
    let names = Interner::new();
    let lifetimes = StaticLifetimeRelation::new(names.intern("*"));
    let options = CoreOptions::default();
    let engine = Engine::new(&interner, &resolver, &lifetimes, &options);
    let reporter = CollectingReporter::new();
    let ctx = CheckerContext::new(&engine, &resolver, &reporter, &options);

    let x = VarId(0);
    let callable = CallableBody {
        name: names.intern("f"),
        params: vec![(x, Type::Int)],
        returns: vec![Type::Bool],
        declared_lifetimes: vec![],
        preconditions: vec![],
        postconditions: vec![],
        body: vec![Stmt::Return(vec![Expr::TypeTest {
            operand: Box::new(Expr::Var(x)),
            target: Type::Null,
        }])],
        span: Span::dummy(),
    };

    ctx.check(&[TopLevelDeclaration::Callable(callable)]).unwrap();
    let diagnostics = reporter.take();
    assert!(diagnostics.iter().any(|d| d.kind == CoreDiagnosticKind::IncomparableOperands));
}

/// Scenario C: `{int f, int g} | {bool f}` reads `.f` as `int | bool`.
#[test]
fn scenario_c_record_readable_union() {
    let interner = TypeInterner::new();
    let resolver = MapResolver::new();
    let names = Interner::new();
    let lifetimes = StaticLifetimeRelation::new(names.intern("*"));
    let options = CoreOptions::default();
    let engine = Engine::new(&interner, &resolver, &lifetimes, &options);
    let reporter = CollectingReporter::new();
    let ctx = CheckerContext::new(&engine, &resolver, &reporter, &options);

    let f = names.intern("f");
    let g = names.intern("g");
    let record_a = Type::Record(
        RecordType::new(
            false,
            vec![
                RecordField { name: f, ty: Type::Int },
                RecordField { name: g, ty: Type::Int },
            ],
        )
        .unwrap(),
    );
    let record_b = Type::Record(RecordType::new(false, vec![RecordField { name: f, ty: Type::Bool }]).unwrap());

    let xs = VarId(0);
    let callable = CallableBody {
        name: names.intern("read"),
        params: vec![(xs, Type::union(vec![record_a, record_b]))],
        returns: vec![Type::union(vec![Type::Int, Type::Bool])],
        declared_lifetimes: vec![],
        preconditions: vec![],
        postconditions: vec![],
        body: vec![Stmt::Return(vec![Expr::RecordAccess {
            record: Box::new(Expr::Var(xs)),
            field: f,
        }])],
        span: Span::dummy(),
    };

    ctx.check(&[TopLevelDeclaration::Callable(callable)]).unwrap();
    assert!(reporter.take().is_empty());
}

/// Scenario F: a second, unreachable `return` is diagnosed.
#[test]
fn scenario_f_unreachable_code() {
    let interner = TypeInterner::new();
    let resolver = MapResolver::new();
    let names = Interner::new();
    let lifetimes = StaticLifetimeRelation::new(names.intern("*"));
    let options = CoreOptions::default();
    let engine = Engine::new(&interner, &resolver, &lifetimes, &options);
    let reporter = CollectingReporter::new();
    let ctx = CheckerContext::new(&engine, &resolver, &reporter, &options);

    let callable = CallableBody {
        name: names.intern("f"),
        params: vec![],
        returns: vec![Type::Int],
        declared_lifetimes: vec![],
        preconditions: vec![],
        postconditions: vec![],
        body: vec![
            Stmt::Return(vec![Expr::Const(ConstKind::Int(0))]),
            Stmt::Return(vec![Expr::Const(ConstKind::Int(1))]),
        ],
        span: Span::dummy(),
    };

    ctx.check(&[TopLevelDeclaration::Callable(callable)]).unwrap();
    let diagnostics = reporter.take();
    assert!(diagnostics.iter().any(|d| d.kind == CoreDiagnosticKind::UnreachableCode));
}
