//! `CheckerContext`: the shared state every checking function closes over,
//! grounded on the teacher's own `context.rs`/`CheckerContext` pattern —
//! one struct bundling the collaborators so `checkStatement`/`checkCondition`/
//! `checkExpression` don't each take four parameters by hand.

use flowty_algebra::{InternalFailure, SemanticType, Type};
use flowty_common::{CoreDiagnosticKind, CoreOptions, Diagnostic, Span};
use flowty_solver::{Engine, LifetimeRelation};

use crate::collaborators::{NameResolver, SyntaxErrorReporter};

pub struct CheckerContext<'a> {
    pub engine: &'a Engine<'a>,
    pub resolver: &'a dyn NameResolver,
    pub reporter: &'a dyn SyntaxErrorReporter,
    pub options: &'a CoreOptions,
}

impl<'a> CheckerContext<'a> {
    #[must_use]
    pub fn new(
        engine: &'a Engine<'a>,
        resolver: &'a dyn NameResolver,
        reporter: &'a dyn SyntaxErrorReporter,
        options: &'a CoreOptions,
    ) -> Self {
        CheckerContext {
            engine,
            resolver,
            reporter,
            options,
        }
    }

    pub fn lifetimes(&self) -> &dyn LifetimeRelation {
        self.engine.lifetimes
    }

    pub fn report(&self, kind: CoreDiagnosticKind, span: Span, args: Vec<String>) {
        let mut diagnostic = Diagnostic::new(kind, span);
        diagnostic.args = args;
        self.reporter.report(diagnostic);
    }

    /// Checks `inferred <: expected`, reporting `SUBTYPE_ERROR` on failure.
    /// Returns whether the check passed so callers can substitute a
    /// best-guess type on failure (spec.md §7's "local recovery").
    pub fn expect_subtype(&self, expected: &Type, inferred: &Type, span: Span) -> Result<bool, InternalFailure> {
        let ok = self.engine.is_subtype(expected, inferred)?;
        if !ok {
            self.report(CoreDiagnosticKind::SubtypeError, span, vec![]);
        }
        Ok(ok)
    }

    pub fn report_empty_type(&self, span: Span) {
        self.report(CoreDiagnosticKind::EmptyType, span, vec![]);
    }

    /// Shared emptiness diagnostics for a type test `e is T`, spec.md
    /// §4.4.2 and §8's Scenario B: reports `INCOMPARABLE_OPERANDS` when
    /// `Te ∩ T` is empty (the test can never succeed) or
    /// `BRANCH_ALWAYS_TAKEN` when `Te \ T` is empty (it can never fail).
    /// Shared between `checkCondition`'s narrowing path and a bare `is`
    /// expression value, both of which need the same diagnostic.
    pub(crate) fn check_type_test_emptiness(&self, te: &Type, target: &Type, span: Span) -> Result<(), InternalFailure> {
        let true_branch = Type::intersection(vec![te.clone(), target.clone()]);
        let false_branch = Type::difference(te.clone(), target.clone());
        if self.engine.is_empty(&true_branch)? {
            self.report(CoreDiagnosticKind::IncomparableOperands, span, vec![]);
        } else if self.engine.is_empty(&false_branch)? {
            self.report(CoreDiagnosticKind::BranchAlwaysTaken, span, vec![]);
        }
        Ok(())
    }

    /// Chooses the concrete syntactic type for an expression: the least
    /// element of `expected` that is a supertype of `inferred`, spec.md
    /// §4.4.3. Ambiguity (two incomparable candidates both matching) is
    /// reported and the first match is used as the best-guess recovery type.
    pub fn choose_concrete(
        &self,
        inferred: &SemanticType,
        expected: &[Type],
        span: Span,
    ) -> Result<Type, InternalFailure> {
        let inferred_ty = semantic_to_representative(self.engine, inferred)?;
        let mut candidates = Vec::new();
        for candidate in expected {
            if self.engine.is_subtype(candidate, &inferred_ty)? {
                candidates.push(candidate.clone());
            }
        }
        if candidates.is_empty() {
            self.report(CoreDiagnosticKind::SubtypeError, span, vec![]);
            return Ok(expected.first().cloned().unwrap_or(Type::Any));
        }
        // The least element: one that every other candidate is a supertype
        // of. If more than one minimal candidate survives, two incomparable
        // candidates both match — ambiguous.
        let mut least = candidates[0].clone();
        let mut ambiguous = false;
        for candidate in &candidates[1..] {
            let least_below_candidate = self.engine.is_subtype(candidate, &least)?;
            let candidate_below_least = self.engine.is_subtype(&least, candidate)?;
            match (least_below_candidate, candidate_below_least) {
                (true, false) => {}
                (false, true) => least = candidate.clone(),
                (true, true) => {}
                (false, false) => ambiguous = true,
            }
        }
        if ambiguous {
            self.report(CoreDiagnosticKind::AmbiguousResolution, span, vec![]);
        }
        Ok(least)
    }
}

/// Converts a semantic type back to a syntactic one for decision-engine
/// queries, which normalize `Type`. The mapping is structural, not
/// DNF-reducing: `SemanticType`'s union/intersection/difference nodes are
/// already syntactic-type constructors under a different name.
pub fn semantic_to_representative(
    engine: &Engine<'_>,
    semantic: &SemanticType,
) -> Result<Type, InternalFailure> {
    Ok(match semantic {
        SemanticType::Leaf(id) => (*engine.interner.lookup(*id)).clone(),
        SemanticType::Union(members) => {
            let mut out = Vec::with_capacity(members.len());
            for m in members {
                out.push(semantic_to_representative(engine, m)?);
            }
            Type::union(out)
        }
        SemanticType::Intersection(members) => {
            let mut out = Vec::with_capacity(members.len());
            for m in members {
                out.push(semantic_to_representative(engine, m)?);
            }
            Type::intersection(out)
        }
        SemanticType::Difference(a, b) => Type::difference(
            semantic_to_representative(engine, a)?,
            semantic_to_representative(engine, b)?,
        ),
    })
}
