//! `checkStatement`, spec.md §4.4.1.

use flowty_algebra::{InternalFailure, SemanticType, Type};
use flowty_common::{CoreDiagnosticKind, Span};

use crate::ast::Stmt;
use crate::context::CheckerContext;
use crate::environment::TypingEnvironment;
use crate::expression::ExpectedTypes;

impl<'a> CheckerContext<'a> {
    /// `checkStatement(stmt, env, returns) → env'`. `returns` is the
    /// enclosing callable's declared return types, needed to check `return`
    /// statements and to know what a fall-through body must still produce.
    pub fn check_statement(
        &self,
        stmt: &Stmt,
        env: &TypingEnvironment,
        returns: &[Type],
        span: Span,
    ) -> Result<TypingEnvironment, InternalFailure> {
        if env.is_bottom() {
            self.report(CoreDiagnosticKind::UnreachableCode, span, vec![]);
            return Ok(TypingEnvironment::bottom());
        }
        match stmt {
            Stmt::VarDecl { var, declared_type, initializer } => {
                if self.engine.is_empty(declared_type)? {
                    self.report_empty_type(span);
                }
                let refined = match initializer {
                    Some(init) => {
                        let (inferred, _) =
                            self.check_expression(init, env, &ExpectedTypes::just(declared_type.clone()), span)?;
                        inferred
                    }
                    None => SemanticType::from_type(self.engine.interner.intern(declared_type.clone())),
                };
                Ok(env.refine(*var, refined))
            }

            Stmt::Assign { targets, values } => {
                let mut current = env.clone();
                for (target, value) in targets.iter().zip(values) {
                    let (_, target_concrete) =
                        self.check_expression(target, &current, &ExpectedTypes::any(), span)?;
                    let shape = match target {
                        crate::ast::Expr::ArrayAccess { .. } => Some(flowty_solver::Shape::Array),
                        crate::ast::Expr::RecordAccess { .. } => Some(flowty_solver::Shape::Record),
                        crate::ast::Expr::Dereference(_) => Some(flowty_solver::Shape::Reference),
                        _ => None,
                    };
                    let effective = match shape {
                        Some(shape) => self
                            .engine
                            .extract(flowty_solver::ExtractorKind::Writeable, shape, &target_concrete)?,
                        None => None,
                    };
                    let expected = effective.unwrap_or(target_concrete);
                    let (inferred, _) =
                        self.check_expression(value, &current, &ExpectedTypes::just(expected), span)?;
                    if let Some(path) = crate::ast::refinable_path_of(target) {
                        if path.fields.is_empty() {
                            current = current.refine(path.root, inferred);
                        }
                    }
                }
                Ok(current)
            }

            Stmt::Return(values) => {
                for (value, expected) in values.iter().zip(returns) {
                    self.check_expression(value, env, &ExpectedTypes::just(expected.clone()), span)?;
                }
                if values.len() != returns.len() {
                    self.report(CoreDiagnosticKind::SubtypeError, span, vec![]);
                }
                Ok(TypingEnvironment::bottom())
            }

            Stmt::If { condition, then_branch, else_branch } => {
                let then_env = self.check_condition(condition, true, env, span)?;
                let then_result = self.check_block(then_branch, &then_env, returns, span)?;
                let else_env = self.check_condition(condition, false, env, span)?;
                let else_result = self.check_block(else_branch, &else_env, returns, span)?;
                Ok(then_result.join(&else_result))
            }

            Stmt::Switch { discriminant, cases, default } => {
                let (_, discriminant_concrete) =
                    self.check_expression(discriminant, env, &ExpectedTypes::any(), span)?;
                let mut joined = TypingEnvironment::bottom();
                for (constants, body) in cases {
                    for constant in constants {
                        self.check_expression(
                            &crate::ast::Expr::Const(*constant),
                            env,
                            &ExpectedTypes::just(discriminant_concrete.clone()),
                            span,
                        )?;
                    }
                    let result = self.check_block(body, env, returns, span)?;
                    joined = joined.join(&result);
                }
                match default {
                    Some(body) => {
                        let result = self.check_block(body, env, returns, span)?;
                        joined = joined.join(&result);
                    }
                    None => joined = joined.join(env),
                }
                Ok(joined)
            }

            Stmt::While { invariants, condition, body } => {
                for invariant in invariants {
                    self.check_condition(invariant, true, env, span)?;
                }
                let loop_entry = if self.options.loop_fixed_point {
                    self.loop_fixed_point(env, condition, body, returns, span)?
                } else {
                    env.clone()
                };
                let body_entry = self.check_condition(condition, true, &loop_entry, span)?;
                self.check_block(body, &body_entry, returns, span)?;
                self.check_condition(condition, false, &loop_entry, span)
            }

            Stmt::Break | Stmt::Continue | Stmt::Fail => Ok(TypingEnvironment::bottom()),

            Stmt::Assert(condition) => self.check_condition(condition, true, env, span),

            Stmt::Assume(condition) => self.check_condition(condition, true, env, span),

            Stmt::NamedBlock { lifetime, enclosing, body } => {
                let extended = env.with_enclosing_lifetime(*lifetime, *enclosing);
                self.check_block(body, &extended, returns, span)
            }
        }
    }

    /// Re-checks a loop body against its own refined environment until the
    /// environment stabilizes (joins stop changing) or
    /// `max_loop_iterations` is reached, so a refinement established inside
    /// the loop body is visible on the next iteration's condition check.
    fn loop_fixed_point(
        &self,
        env: &TypingEnvironment,
        condition: &crate::ast::Condition,
        body: &[Stmt],
        returns: &[Type],
        span: Span,
    ) -> Result<TypingEnvironment, InternalFailure> {
        let mut current = env.clone();
        for _ in 0..self.options.max_loop_iterations {
            let body_entry = self.check_condition(condition, true, &current, span)?;
            let after_body = self.check_block(body, &body_entry, returns, span)?;
            let next = current.join(&after_body);
            if next == current {
                break;
            }
            current = next;
        }
        Ok(current)
    }

    /// Threads `env` through a statement sequence, stopping early (the rest
    /// of the block is unreachable) once it hits `BOTTOM`.
    pub fn check_block(
        &self,
        stmts: &[Stmt],
        env: &TypingEnvironment,
        returns: &[Type],
        span: Span,
    ) -> Result<TypingEnvironment, InternalFailure> {
        let mut current = env.clone();
        for stmt in stmts {
            current = self.check_statement(stmt, &current, returns, span)?;
        }
        Ok(current)
    }
}

