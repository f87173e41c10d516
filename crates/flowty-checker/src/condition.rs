//! `checkCondition`, spec.md §4.4.2.
//!
//! Splits on the condition's logical shape, threading or unioning refined
//! environments depending on `sign`. Type tests are where refinement
//! actually happens: everything else here exists to route sign-flipping and
//! environment combination down to the type tests inside it.

use flowty_algebra::InternalFailure;
use flowty_common::{CoreDiagnosticKind, Span};

use crate::ast::{refinable_path_of, Condition};
use crate::context::{semantic_to_representative, CheckerContext};
use crate::environment::TypingEnvironment;
use crate::expression::ExpectedTypes;

impl<'a> CheckerContext<'a> {
    /// `checkCondition(expr, sign, env) → env'`, spec.md §4.4.2.
    pub fn check_condition(
        &self,
        condition: &Condition,
        sign: bool,
        env: &TypingEnvironment,
        span: Span,
    ) -> Result<TypingEnvironment, InternalFailure> {
        if env.is_bottom() {
            self.report(CoreDiagnosticKind::UnreachableCode, span, vec![]);
            return Ok(TypingEnvironment::bottom());
        }
        match condition {
            Condition::Negation(inner) => self.check_condition(inner, !sign, env, span),

            Condition::Disjunction(disjuncts) => {
                if sign {
                    // Each disjunct refines assuming the prior ones were
                    // false; the final environment is the union of every
                    // disjunct's true-branch refinement.
                    let mut remaining = env.clone();
                    let mut unioned: Option<TypingEnvironment> = None;
                    for disjunct in disjuncts {
                        let refined = self.check_condition(disjunct, true, &remaining, span)?;
                        unioned = Some(match unioned {
                            None => refined,
                            Some(acc) => acc.join(&refined),
                        });
                        remaining = self.check_condition(disjunct, false, &remaining, span)?;
                    }
                    Ok(unioned.unwrap_or_else(|| env.clone()))
                } else {
                    // De Morgan: ¬(A ∨ B) = ¬A ∧ ¬B, threaded sequentially.
                    let mut current = env.clone();
                    for disjunct in disjuncts {
                        current = self.check_condition(disjunct, false, &current, span)?;
                    }
                    Ok(current)
                }
            }

            Condition::Conjunction(conjuncts) => {
                if sign {
                    let mut current = env.clone();
                    for conjunct in conjuncts {
                        current = self.check_condition(conjunct, true, &current, span)?;
                    }
                    Ok(current)
                } else {
                    let mut remaining = env.clone();
                    let mut unioned: Option<TypingEnvironment> = None;
                    for conjunct in conjuncts {
                        let refined = self.check_condition(conjunct, false, &remaining, span)?;
                        unioned = Some(match unioned {
                            None => refined,
                            Some(acc) => acc.join(&refined),
                        });
                        remaining = self.check_condition(conjunct, true, &remaining, span)?;
                    }
                    Ok(unioned.unwrap_or_else(|| env.clone()))
                }
            }

            Condition::Implication(a, b) => {
                if sign {
                    let not_a = self.check_condition(a, false, env, span)?;
                    let a_true = self.check_condition(a, true, env, span)?;
                    let a_and_b = self.check_condition(b, true, &a_true, span)?;
                    Ok(not_a.join(&a_and_b))
                } else {
                    let a_true = self.check_condition(a, true, env, span)?;
                    self.check_condition(b, false, &a_true, span)
                }
            }

            Condition::Biconditional(a, b) => {
                let after_a = self.check_condition(a, sign, env, span)?;
                self.check_condition(b, sign, &after_a, span)
            }

            Condition::TypeTest { operand, target } => {
                self.check_type_test(operand, target, sign, env, span)
            }

            Condition::Quantifier { params, body } => {
                for param in params {
                    if self.engine.is_empty(param)? {
                        self.report_empty_type(span);
                    }
                }
                // Refinements inside a quantifier's body never escape it.
                let _ = self.check_condition(body, true, env, span)?;
                Ok(env.clone())
            }

            Condition::Other(expr) => {
                let _ = self.check_expression(expr, env, &ExpectedTypes::just(flowty_algebra::Type::Bool), span)?;
                Ok(env.clone())
            }
        }
    }

    fn check_type_test(
        &self,
        operand: &crate::ast::Expr,
        target: &flowty_algebra::Type,
        sign: bool,
        env: &TypingEnvironment,
        span: Span,
    ) -> Result<TypingEnvironment, InternalFailure> {
        let (inferred, _concrete) =
            self.check_expression(operand, env, &ExpectedTypes::any(), span)?;
        let te = semantic_to_representative(self.engine, &inferred)?;
        self.check_type_test_emptiness(&te, target, span)?;

        let true_branch = flowty_algebra::Type::intersection(vec![te.clone(), target.clone()]);
        let false_branch = flowty_algebra::Type::difference(te, target.clone());
        let refined_type = if sign { true_branch } else { false_branch };

        let Some(path) = refinable_path_of(operand) else {
            // Array/dereference accesses are not refinable: the test is
            // still checked above, but it's a no-op on the environment.
            return Ok(env.clone());
        };
        if !path.fields.is_empty() {
            // Record-field projections narrow the *path's* semantic type as
            // a whole; without a nested-field rewrite machinery in this
            // core, we approximate by refining the path's root to the
            // narrowed type directly rather than threading it through a
            // partial-record rewrite.
        }
        Ok(env.refine(path.root, flowty_algebra::SemanticType::from(
            self.engine.interner.intern(refined_type),
        )))
    }
}
