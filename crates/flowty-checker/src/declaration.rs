//! Per-declaration-form checking and the top-level `check` entry point,
//! spec.md §4.4 and §6.2.

use flowty_algebra::{InternalFailure, SemanticType, Type};
use flowty_common::{CoreDiagnosticKind, Name, Span};

use crate::ast::{CallableBody, Expr};
use crate::context::CheckerContext;
use crate::environment::TypingEnvironment;
use crate::expression::ExpectedTypes;

/// A single top-level declaration, as the driver's binder hands it to the
/// checker (spec.md §6.2's "for each declared type/static variable/callable").
pub enum TopLevelDeclaration {
    Type {
        name: Name,
        body: Type,
        span: Span,
    },
    StaticVariable {
        name: Name,
        declared_type: Type,
        initializer: Option<Expr>,
        span: Span,
    },
    Callable(CallableBody),
}

impl<'a> CheckerContext<'a> {
    /// The entry point, spec.md §6.2: checks every declaration in turn.
    /// A single `InternalFailure` aborts the whole pass, matching spec.md
    /// §4.1's "resolution failure is fatal, not a per-declaration error".
    pub fn check(&self, declarations: &[TopLevelDeclaration]) -> Result<(), InternalFailure> {
        for declaration in declarations {
            match declaration {
                TopLevelDeclaration::Type { name, body, span } => {
                    self.check_type_declaration(*name, body, *span)?;
                }
                TopLevelDeclaration::StaticVariable {
                    declared_type,
                    initializer,
                    span,
                    ..
                } => {
                    self.check_static_variable_declaration(declared_type, initializer.as_ref(), *span)?;
                }
                TopLevelDeclaration::Callable(body) => {
                    self.check_callable_declaration(body)?;
                }
            }
        }
        Ok(())
    }

    /// A declared type must be contractive (spec.md §3.1's well-foundedness
    /// requirement) and non-empty; an empty declared type can never be
    /// instantiated and is almost always a mistake.
    fn check_type_declaration(&self, name: Name, body: &Type, span: Span) -> Result<(), InternalFailure> {
        if !self.engine.is_contractive(name, body) {
            self.report(CoreDiagnosticKind::InternalFailure, span, vec![
                "declared type is not contractive".to_string(),
            ]);
            return Ok(());
        }
        if self.engine.is_empty(body)? {
            self.report_empty_type(span);
        }
        Ok(())
    }

    fn check_static_variable_declaration(
        &self,
        declared_type: &Type,
        initializer: Option<&Expr>,
        span: Span,
    ) -> Result<(), InternalFailure> {
        if self.engine.is_empty(declared_type)? {
            self.report_empty_type(span);
        }
        if let Some(initializer) = initializer {
            let env = TypingEnvironment::empty();
            self.check_expression(
                initializer,
                &env,
                &ExpectedTypes::just(declared_type.clone()),
                span,
            )?;
        }
        Ok(())
    }

    /// Declares parameters and lifetimes, checks the precondition/body/
    /// postcondition sequence, and verifies the body doesn't fall through
    /// without producing a return when one is required (spec.md §4.4).
    fn check_callable_declaration(&self, callable: &CallableBody) -> Result<(), InternalFailure> {
        for (_, param_ty) in &callable.params {
            if self.engine.is_empty(param_ty)? {
                self.report_empty_type(callable.span);
            }
        }
        for return_ty in &callable.returns {
            if self.engine.is_empty(return_ty)? {
                self.report_empty_type(callable.span);
            }
        }

        let mut env = TypingEnvironment::empty();
        for (var, param_ty) in &callable.params {
            let leaf = SemanticType::from_type(self.engine.interner.intern(param_ty.clone()));
            env = env.refine(*var, leaf);
        }
        let outermost = self.lifetimes().outermost();
        for lifetime in &callable.declared_lifetimes {
            env = env.with_enclosing_lifetime(*lifetime, outermost);
        }

        for precondition in &callable.preconditions {
            env = self.check_condition(precondition, true, &env, callable.span)?;
        }

        let exit_env = self.check_block(&callable.body, &env, &callable.returns, callable.span)?;

        // Falling off the end of a callable declaring non-void returns never
        // produced a `return`; every reachable exit must have gone through
        // one (which yields BOTTOM, spec.md §4.4.1's Return rule).
        if !exit_env.is_bottom() && !callable.returns.is_empty() {
            self.report(CoreDiagnosticKind::SubtypeError, callable.span, vec![
                "function falls through without returning its declared result".to_string(),
            ]);
        }

        // Every `return` already drove its environment to BOTTOM (the
        // Return rule, spec.md §4.4.1); postconditions are checked here
        // only against a reachable fall-through, since this core doesn't
        // retain each individual return site's environment. A BOTTOM exit
        // means every path already returned explicitly and is accepted
        // without a redundant "unreachable" diagnostic.
        if !exit_env.is_bottom() {
            for postcondition in &callable.postconditions {
                self.check_condition(postcondition, true, &exit_env, callable.span)?;
            }
        }

        Ok(())
    }
}
