//! External collaborator interfaces, spec.md §6.1.
//!
//! These are boundaries, not implementations: the driver (parser, binder,
//! module loader) supplies real instances. The checker only ever calls
//! through the trait objects below.

use flowty_algebra::Type;
use flowty_common::{Diagnostic, Name, Span};

/// What a resolved declaration carries back to the checker. Mirrors
/// spec.md §3's "declaration" concept without committing to a concrete AST
/// representation the checker would otherwise have to own.
#[derive(Clone, Debug)]
pub enum Declaration {
    Type { name: Name, body: Type },
    Callable { name: Name, signature: CallableDeclaration },
    StaticVariable { name: Name, declared_type: Type },
}

#[derive(Clone, Debug)]
pub struct CallableDeclaration {
    pub params: Vec<Type>,
    pub returns: Vec<Type>,
    pub captured_lifetimes: Vec<Name>,
    pub declared_lifetimes: Vec<Name>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeclarationKind {
    Type,
    Callable,
    StaticVariable,
}

#[derive(Debug)]
pub struct ResolutionFailure;

/// `resolveExactly`/`resolveAll`, spec.md §6.1.
pub trait NameResolver {
    fn resolve_exactly(&self, name: Name, kind: DeclarationKind) -> Result<Declaration, ResolutionFailure>;
    fn resolve_all(&self, name: Name, kind: DeclarationKind) -> Vec<Declaration>;
}

/// `syntaxError`/`internalFailure`, spec.md §6.1 and §7.
///
/// The core never formats its own error strings beyond the diagnostic's
/// `args`; rendering the final message is this collaborator's job.
pub trait SyntaxErrorReporter {
    fn report(&self, diagnostic: Diagnostic);

    fn internal_failure(&self, message: &str, span: Span) {
        self.report(Diagnostic::new(
            flowty_common::CoreDiagnosticKind::InternalFailure,
            span,
        ).with_arg(message.to_string()));
    }
}

/// A `SyntaxErrorReporter` that just collects diagnostics, for tests and
/// for drivers that want to batch-process the stream themselves.
#[derive(Default)]
pub struct CollectingReporter {
    pub diagnostics: std::cell::RefCell<Vec<Diagnostic>>,
}

impl CollectingReporter {
    #[must_use]
    pub fn new() -> Self {
        CollectingReporter::default()
    }

    pub fn take(&self) -> Vec<Diagnostic> {
        self.diagnostics.take()
    }
}

impl SyntaxErrorReporter for CollectingReporter {
    fn report(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }
}

/// `flowty_algebra::testutil::MapResolver` only ever stands in for the
/// `NominalBodyResolver` the decision engine consumes; tests that also need
/// a `NameResolver` to build a `CheckerContext` reuse the same value rather
/// than keeping two separate fakes in sync. None of its declarations are
/// ever populated, so every lookup fails — fine for tests that resolve
/// invocations by building `Candidate`s directly.
impl NameResolver for flowty_algebra::testutil::MapResolver {
    fn resolve_exactly(&self, _name: Name, _kind: DeclarationKind) -> Result<Declaration, ResolutionFailure> {
        Err(ResolutionFailure)
    }

    fn resolve_all(&self, _name: Name, _kind: DeclarationKind) -> Vec<Declaration> {
        Vec::new()
    }
}
