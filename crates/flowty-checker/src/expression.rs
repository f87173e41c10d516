//! `checkExpression`, spec.md §4.4.3.

use flowty_algebra::{InternalFailure, SemanticType, Type};
use flowty_common::{CoreDiagnosticKind, Span};

use crate::ast::{ConstKind, Expr};
use crate::collaborators::{DeclarationKind, Declaration};
use crate::context::CheckerContext;
use crate::environment::TypingEnvironment;
use crate::overload::{Candidate, ResolutionOutcome};

/// The `expected: sequence of Type` parameter of `checkExpression`.
pub struct ExpectedTypes(pub Vec<Type>);

impl ExpectedTypes {
    #[must_use]
    pub fn any() -> Self {
        ExpectedTypes(vec![Type::Any])
    }

    #[must_use]
    pub fn just(ty: Type) -> Self {
        ExpectedTypes(vec![ty])
    }

    #[must_use]
    pub fn many(types: Vec<Type>) -> Self {
        ExpectedTypes(types)
    }
}

impl<'a> CheckerContext<'a> {
    /// `checkExpression(expr, env, expected) → SemanticType`. Also returns
    /// the concrete syntactic type assigned to the expression (spec.md
    /// §6.2's "type" slot, here returned rather than written into a node
    /// the core doesn't own a concrete representation of).
    pub fn check_expression(
        &self,
        expr: &Expr,
        env: &TypingEnvironment,
        expected: &ExpectedTypes,
        span: Span,
    ) -> Result<(SemanticType, Type), InternalFailure> {
        let inferred = self.infer_expression(expr, env, span)?;
        let concrete = self.choose_concrete(&inferred, &expected.0, span)?;
        Ok((inferred, concrete))
    }

    fn infer_expression(
        &self,
        expr: &Expr,
        env: &TypingEnvironment,
        span: Span,
    ) -> Result<SemanticType, InternalFailure> {
        match expr {
            Expr::Const(kind) => Ok(SemanticType::from_type(match kind {
                ConstKind::Null => flowty_algebra::TypeId::NULL,
                ConstKind::Bool(_) => flowty_algebra::TypeId::BOOL,
                ConstKind::Int(_) => flowty_algebra::TypeId::INT,
                ConstKind::Byte(_) => flowty_algebra::TypeId::BYTE,
            })),

            Expr::Var(id) => Ok(env.refined(*id).unwrap_or_else(|| SemanticType::from_type(flowty_algebra::TypeId::ANY))),

            Expr::StaticVariable(name) => match self.resolver.resolve_exactly(*name, DeclarationKind::StaticVariable) {
                Ok(Declaration::StaticVariable { declared_type, .. }) => {
                    Ok(SemanticType::from_type(self.engine.interner.intern(declared_type)))
                }
                _ => {
                    self.report(CoreDiagnosticKind::ResolutionError, span, vec![]);
                    Ok(SemanticType::from_type(flowty_algebra::TypeId::ANY))
                }
            },

            Expr::Cast { operand, target } => {
                self.check_expression(operand, env, &ExpectedTypes::just(target.clone()), span)?;
                Ok(SemanticType::from_type(self.engine.interner.intern(target.clone())))
            }

            Expr::Invoke { callee, args } => self.check_direct_invocation(*callee, args, env, span),

            Expr::InvokeIndirect { source, args } => self.check_indirect_invocation(source, args, env, span),

            Expr::Arithmetic { lhs, rhs } => {
                self.check_expression(lhs, env, &ExpectedTypes::just(Type::Int), span)?;
                self.check_expression(rhs, env, &ExpectedTypes::just(Type::Int), span)?;
                Ok(SemanticType::from_type(flowty_algebra::TypeId::INT))
            }

            Expr::Comparison { lhs, rhs } => {
                self.check_expression(lhs, env, &ExpectedTypes::any(), span)?;
                self.check_expression(rhs, env, &ExpectedTypes::any(), span)?;
                Ok(SemanticType::from_type(flowty_algebra::TypeId::BOOL))
            }

            Expr::Logical { lhs, rhs } => {
                self.check_expression(lhs, env, &ExpectedTypes::just(Type::Bool), span)?;
                self.check_expression(rhs, env, &ExpectedTypes::just(Type::Bool), span)?;
                Ok(SemanticType::from_type(flowty_algebra::TypeId::BOOL))
            }

            Expr::ArrayInit(elements) => {
                let mut element_ids = Vec::new();
                for element in elements {
                    let (inferred, _) = self.check_expression(element, env, &ExpectedTypes::any(), span)?;
                    let rep = crate::context::semantic_to_representative(self.engine, &inferred)?;
                    if !element_ids.contains(&rep) {
                        element_ids.push(rep);
                    }
                }
                Ok(SemanticType::from_type(
                    self.engine.interner.intern(Type::array(Type::union(element_ids))),
                ))
            }

            Expr::ArrayAccess { array, index } => {
                self.check_expression(index, env, &ExpectedTypes::just(Type::Int), span)?;
                let (array_inferred, array_concrete) =
                    self.check_expression(array, env, &ExpectedTypes::any(), span)?;
                let _ = array_inferred;
                match self.engine.extract(
                    flowty_solver::ExtractorKind::Readable,
                    flowty_solver::Shape::Array,
                    &array_concrete,
                )? {
                    Some(Type::Array(elem)) => {
                        Ok(SemanticType::from_type(self.engine.interner.intern(*elem)))
                    }
                    _ => {
                        self.report(CoreDiagnosticKind::InvalidLValExpression, span, vec![]);
                        Ok(SemanticType::from_type(flowty_algebra::TypeId::ANY))
                    }
                }
            }

            Expr::ArrayUpdate { array, index, value } => {
                self.check_expression(index, env, &ExpectedTypes::just(Type::Int), span)?;
                let (_, array_concrete) = self.check_expression(array, env, &ExpectedTypes::any(), span)?;
                let effective = self.engine.extract(
                    flowty_solver::ExtractorKind::Writeable,
                    flowty_solver::Shape::Array,
                    &array_concrete,
                )?;
                if let Some(Type::Array(elem)) = effective {
                    self.check_expression(value, env, &ExpectedTypes::just(*elem), span)?;
                } else {
                    self.report(CoreDiagnosticKind::InvalidLValExpression, span, vec![]);
                }
                Ok(SemanticType::from_type(self.engine.interner.intern(array_concrete)))
            }

            Expr::ArrayLength(array) => {
                self.check_expression(array, env, &ExpectedTypes::any(), span)?;
                Ok(SemanticType::from_type(flowty_algebra::TypeId::INT))
            }

            Expr::RecordInit(fields) => {
                let mut record_fields = Vec::new();
                for (name, value) in fields {
                    let (inferred, _) = self.check_expression(value, env, &ExpectedTypes::any(), span)?;
                    let rep = crate::context::semantic_to_representative(self.engine, &inferred)?;
                    record_fields.push(flowty_algebra::RecordField { name: *name, ty: rep });
                }
                match flowty_algebra::RecordType::new(false, record_fields) {
                    Ok(rt) => Ok(SemanticType::from_type(self.engine.interner.intern(Type::Record(rt)))),
                    Err(_) => {
                        self.report(CoreDiagnosticKind::InvalidLValExpression, span, vec![]);
                        Ok(SemanticType::from_type(flowty_algebra::TypeId::ANY))
                    }
                }
            }

            Expr::RecordAccess { record, field } => {
                let (_, record_concrete) = self.check_expression(record, env, &ExpectedTypes::any(), span)?;
                match self.engine.extract(
                    flowty_solver::ExtractorKind::Readable,
                    flowty_solver::Shape::Record,
                    &record_concrete,
                )? {
                    Some(Type::Record(rt)) => match rt.field(*field) {
                        Some(ty) => Ok(SemanticType::from_type(self.engine.interner.intern(ty.clone()))),
                        None => {
                            self.report(CoreDiagnosticKind::RecordMissingField, span, vec![]);
                            Ok(SemanticType::from_type(flowty_algebra::TypeId::ANY))
                        }
                    },
                    _ => {
                        self.report(CoreDiagnosticKind::RecordMissingField, span, vec![]);
                        Ok(SemanticType::from_type(flowty_algebra::TypeId::ANY))
                    }
                }
            }

            Expr::RecordUpdate { record, field, value } => {
                let (_, record_concrete) = self.check_expression(record, env, &ExpectedTypes::any(), span)?;
                let effective = self.engine.extract(
                    flowty_solver::ExtractorKind::Writeable,
                    flowty_solver::Shape::Record,
                    &record_concrete,
                )?;
                if let Some(Type::Record(rt)) = effective {
                    if let Some(existing) = rt.field(*field) {
                        self.check_expression(value, env, &ExpectedTypes::just(existing.clone()), span)?;
                    } else {
                        self.report(CoreDiagnosticKind::RecordMissingField, span, vec![]);
                    }
                } else {
                    self.report(CoreDiagnosticKind::RecordMissingField, span, vec![]);
                }
                Ok(SemanticType::from_type(self.engine.interner.intern(record_concrete)))
            }

            Expr::Dereference(inner) => {
                let (_, concrete) = self.check_expression(inner, env, &ExpectedTypes::any(), span)?;
                match self.engine.extract(
                    flowty_solver::ExtractorKind::Readable,
                    flowty_solver::Shape::Reference,
                    &concrete,
                )? {
                    Some(Type::Reference(elem, _)) => Ok(SemanticType::from_type(self.engine.interner.intern(*elem))),
                    _ => {
                        self.report(CoreDiagnosticKind::InvalidLValExpression, span, vec![]);
                        Ok(SemanticType::from_type(flowty_algebra::TypeId::ANY))
                    }
                }
            }

            Expr::New { element, lifetime } => {
                let (inferred, _) = self.check_expression(element, env, &ExpectedTypes::any(), span)?;
                let rep = crate::context::semantic_to_representative(self.engine, &inferred)?;
                Ok(SemanticType::from_type(
                    self.engine.interner.intern(Type::reference(rep, *lifetime)),
                ))
            }

            Expr::Lambda { params, body } => {
                for param in params {
                    if self.engine.is_empty(param)? {
                        self.report_empty_type(span);
                    }
                }
                let (_, _) = self.check_expression(body, env, &ExpectedTypes::any(), span)?;
                let pure = self.is_pure(body, env, span)?;
                let sig = flowty_algebra::CallableSig {
                    params: params.clone(),
                    returns: vec![Type::Any],
                };
                let ty = if pure { Type::Function(sig) } else {
                    Type::Method(flowty_algebra::MethodSig {
                        params: params.clone(),
                        returns: vec![Type::Any],
                        captured_lifetimes: Vec::new(),
                        declared_lifetimes: Vec::new(),
                    })
                };
                Ok(SemanticType::from_type(self.engine.interner.intern(ty)))
            }

            Expr::LambdaAccess(name) => match self.resolver.resolve_exactly(*name, DeclarationKind::Callable) {
                Ok(Declaration::Callable { signature, .. }) => {
                    let ty = Type::Function(flowty_algebra::CallableSig {
                        params: signature.params,
                        returns: signature.returns,
                    });
                    Ok(SemanticType::from_type(self.engine.interner.intern(ty)))
                }
                _ => {
                    self.report(CoreDiagnosticKind::ResolutionError, span, vec![]);
                    Ok(SemanticType::from_type(flowty_algebra::TypeId::ANY))
                }
            },

            Expr::TypeTest { operand, target } => {
                // Evaluated for its value as a boolean expression here;
                // refinement only happens through `check_condition`, but the
                // emptiness diagnostics apply regardless of position.
                let (inferred, _) = self.check_expression(operand, env, &ExpectedTypes::any(), span)?;
                let te = crate::context::semantic_to_representative(self.engine, &inferred)?;
                self.check_type_test_emptiness(&te, target, span)?;
                Ok(SemanticType::from_type(flowty_algebra::TypeId::BOOL))
            }
        }
    }

    fn check_direct_invocation(
        &self,
        callee: flowty_common::Name,
        args: &[Expr],
        env: &TypingEnvironment,
        span: Span,
    ) -> Result<SemanticType, InternalFailure> {
        let declarations = self.resolver.resolve_all(callee, DeclarationKind::Callable);
        let mut candidates = Vec::new();
        for decl in &declarations {
            if let Declaration::Callable { signature, .. } = decl {
                candidates.push(Candidate {
                    params: signature.params.clone(),
                    returns: signature.returns.clone(),
                });
            }
        }
        candidates.retain(|c| c.params.len() == args.len());

        let mut arg_types = Vec::with_capacity(args.len());
        for (i, arg) in args.iter().enumerate() {
            let propagated: Vec<Type> = candidates.iter().map(|c| c.params[i].clone()).collect();
            let expected = if propagated.is_empty() {
                ExpectedTypes::any()
            } else {
                ExpectedTypes::many(propagated)
            };
            let (inferred, _) = self.check_expression(arg, env, &expected, span)?;
            let rep = crate::context::semantic_to_representative(self.engine, &inferred)?;
            candidates.retain(|c| {
                self.engine
                    .is_subtype(&c.params[i], &rep)
                    .unwrap_or(false)
            });
            arg_types.push(rep);
        }

        match self.resolve_direct(candidates, &arg_types)? {
            ResolutionOutcome::Unique(candidate) => {
                Ok(SemanticType::from_type(self.engine.interner.intern(Type::union(candidate.returns))))
            }
            ResolutionOutcome::None => {
                self.report(CoreDiagnosticKind::ResolutionError, span, vec![]);
                Ok(SemanticType::from_type(flowty_algebra::TypeId::ANY))
            }
            ResolutionOutcome::Ambiguous => {
                self.report(CoreDiagnosticKind::AmbiguousResolution, span, vec![]);
                Ok(SemanticType::from_type(flowty_algebra::TypeId::ANY))
            }
        }
    }

    fn check_indirect_invocation(
        &self,
        source: &Expr,
        args: &[Expr],
        env: &TypingEnvironment,
        span: Span,
    ) -> Result<SemanticType, InternalFailure> {
        let (_, source_concrete) = self.check_expression(source, env, &ExpectedTypes::any(), span)?;
        let callable = self.engine.extract(
            flowty_solver::ExtractorKind::Readable,
            flowty_solver::Shape::Callable,
            &source_concrete,
        )?;
        let Some(callable_ty) = callable else {
            self.report(CoreDiagnosticKind::ResolutionError, span, vec![]);
            return Ok(SemanticType::from_type(flowty_algebra::TypeId::ANY));
        };
        let (params, returns) = match callable_ty {
            Type::Function(sig) | Type::Property(sig) => (sig.params, sig.returns),
            Type::Method(sig) => (sig.params, sig.returns),
            _ => (Vec::new(), vec![Type::Any]),
        };
        if params.len() != args.len() {
            self.report(CoreDiagnosticKind::ResolutionError, span, vec![]);
        }
        for (arg, param) in args.iter().zip(&params) {
            self.check_expression(arg, env, &ExpectedTypes::just(param.clone()), span)?;
        }
        Ok(SemanticType::from_type(self.engine.interner.intern(Type::union(returns))))
    }

    /// Purity = no dereference, no static variable access, no method call, no
    /// `new`; propagated recursively (spec.md §4.4.3). "No method call" is a
    /// semantic condition on the *resolved* callee, not a syntactic one: an
    /// invocation is impure exactly when it resolves to a declaration whose
    /// signature captures an enclosing lifetime (a `Method`), regardless of
    /// whether its arguments are themselves pure.
    fn is_pure(&self, expr: &Expr, env: &TypingEnvironment, span: Span) -> Result<bool, InternalFailure> {
        Ok(match expr {
            Expr::Dereference(_) | Expr::StaticVariable(_) | Expr::New { .. } => false,
            Expr::Const(_) | Expr::Var(_) => true,
            Expr::LambdaAccess(name) => !self.callable_is_method(*name),
            Expr::Cast { operand, .. } => self.is_pure(operand, env, span)?,
            Expr::Invoke { callee, args } => {
                !self.callable_is_method(*callee) && self.all_pure(args, env, span)?
            }
            Expr::InvokeIndirect { source, args } => {
                !self.invocation_source_is_method(source, env, span)?
                    && self.is_pure(source, env, span)?
                    && self.all_pure(args, env, span)?
            }
            Expr::Arithmetic { lhs, rhs } | Expr::Comparison { lhs, rhs } | Expr::Logical { lhs, rhs } => {
                self.is_pure(lhs, env, span)? && self.is_pure(rhs, env, span)?
            }
            Expr::ArrayInit(elements) => self.all_pure(elements, env, span)?,
            Expr::ArrayAccess { array, index } => {
                self.is_pure(array, env, span)? && self.is_pure(index, env, span)?
            }
            Expr::ArrayUpdate { array, index, value } => {
                self.is_pure(array, env, span)? && self.is_pure(index, env, span)? && self.is_pure(value, env, span)?
            }
            Expr::ArrayLength(inner) => self.is_pure(inner, env, span)?,
            Expr::RecordInit(fields) => {
                let mut pure = true;
                for (_, value) in fields {
                    if !self.is_pure(value, env, span)? {
                        pure = false;
                        break;
                    }
                }
                pure
            }
            Expr::RecordAccess { record, .. } => self.is_pure(record, env, span)?,
            Expr::RecordUpdate { record, value, .. } => {
                self.is_pure(record, env, span)? && self.is_pure(value, env, span)?
            }
            Expr::Lambda { body, .. } => self.is_pure(body, env, span)?,
            Expr::TypeTest { operand, .. } => self.is_pure(operand, env, span)?,
        })
    }

    fn all_pure(&self, exprs: &[Expr], env: &TypingEnvironment, span: Span) -> Result<bool, InternalFailure> {
        for expr in exprs {
            if !self.is_pure(expr, env, span)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// A direct-call callee is impure if any resolved candidate captures an
    /// enclosing lifetime (i.e. is a `Method`, not a plain `Function`).
    fn callable_is_method(&self, name: flowty_common::Name) -> bool {
        self.resolver
            .resolve_all(name, DeclarationKind::Callable)
            .iter()
            .any(|decl| matches!(decl, Declaration::Callable { signature, .. } if !signature.captured_lifetimes.is_empty()))
    }

    /// An indirect-call source is impure if its inferred callable shape is a
    /// `Method`.
    fn invocation_source_is_method(
        &self,
        source: &Expr,
        env: &TypingEnvironment,
        span: Span,
    ) -> Result<bool, InternalFailure> {
        let (_, concrete) = self.check_expression(source, env, &ExpectedTypes::any(), span)?;
        let extracted = self.engine.extract(
            flowty_solver::ExtractorKind::Readable,
            flowty_solver::Shape::Callable,
            &concrete,
        )?;
        Ok(matches!(extracted, Some(Type::Method(_))) || matches!(concrete, Type::Method(_)))
    }
}
