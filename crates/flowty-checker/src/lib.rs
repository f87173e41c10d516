//! Flow-sensitive typing over the decision engine — spec component C5.
//!
//! `flowty-checker` owns the AST-facing half of the system: the typing
//! environment, `checkExpression`/`checkCondition`/`checkStatement`, overload
//! resolution, and the per-declaration and top-level `check` entry points.
//! Everything here calls down into `flowty-solver`'s `Engine` for emptiness,
//! subtyping and extraction; it never re-derives those directly.

pub mod ast;
pub mod collaborators;
pub mod condition;
pub mod context;
pub mod declaration;
pub mod environment;
pub mod expression;
pub mod overload;
pub mod statement;

pub use ast::{CallableBody, Condition, ConstKind, Expr, RefinablePath, Stmt, VarId};
pub use collaborators::{
    CallableDeclaration, CollectingReporter, Declaration, DeclarationKind, NameResolver,
    ResolutionFailure, SyntaxErrorReporter,
};
pub use context::CheckerContext;
pub use declaration::TopLevelDeclaration;
pub use environment::{ReachableEnv, TypingEnvironment};
pub use expression::ExpectedTypes;
pub use overload::{Candidate, ResolutionOutcome};

#[cfg(test)]
#[path = "tests/scenarios.rs"]
mod scenarios;
