//! Overload resolution, spec.md §4.4.3 (direct invocation) and §4.4.4
//! (lifetime-parametric methods).
//!
//! Direct invocation filters candidates by arity, then narrows by argument
//! subtyping one argument at a time; lifetime-parametric methods additionally
//! enumerate every substitution of declared lifetime parameters to the
//! lifetimes mentioned by the call site before applicability filtering.

use flowty_algebra::{InternalFailure, Type};
use flowty_common::Name;

use crate::collaborators::CallableDeclaration;
use crate::context::CheckerContext;

#[derive(Clone, Debug)]
pub struct Candidate {
    pub params: Vec<Type>,
    pub returns: Vec<Type>,
}

pub enum ResolutionOutcome {
    Unique(Candidate),
    None,
    Ambiguous,
}

impl<'a> CheckerContext<'a> {
    /// `resolveAll` candidates filtered by arity, then narrowed one argument
    /// at a time by subtyping; spec.md §4.4.3's direct-invocation rule.
    pub fn resolve_direct(
        &self,
        candidates: Vec<Candidate>,
        arg_types: &[Type],
    ) -> Result<ResolutionOutcome, InternalFailure> {
        let mut survivors: Vec<Candidate> = candidates
            .into_iter()
            .filter(|c| c.params.len() == arg_types.len())
            .collect();
        for (i, arg_ty) in arg_types.iter().enumerate() {
            let mut next = Vec::new();
            for candidate in survivors {
                if self.engine.is_subtype(&candidate.params[i], arg_ty)? {
                    next.push(candidate);
                }
            }
            survivors = next;
        }
        Ok(match survivors.len() {
            0 => ResolutionOutcome::None,
            1 => ResolutionOutcome::Unique(survivors.into_iter().next().expect("len checked")),
            _ => ResolutionOutcome::Ambiguous,
        })
    }

    /// Lifetime-parametric overload resolution, spec.md §4.4.4: enumerate
    /// every substitution of `decl`'s declared lifetimes over
    /// `call_site_lifetimes` (Cartesian product, capped by
    /// `options.max_lifetime_substitutions`), keep the applicable bindings,
    /// and require a unique proper-subtype-minimal winner.
    pub fn resolve_with_lifetimes(
        &self,
        decl: &CallableDeclaration,
        call_site_lifetimes: &[Name],
        arg_types: &[Type],
    ) -> Result<ResolutionOutcome, InternalFailure> {
        if decl.params.len() != arg_types.len() {
            return Ok(ResolutionOutcome::None);
        }
        let substitutions = cartesian_substitutions(
            &decl.declared_lifetimes,
            call_site_lifetimes,
            self.options.max_lifetime_substitutions,
        );

        let mut applicable: Vec<Candidate> = Vec::new();
        for substitution in &substitutions {
            let params: Vec<Type> = decl
                .params
                .iter()
                .map(|p| substitute_lifetimes(p, substitution))
                .collect();
            let returns: Vec<Type> = decl
                .returns
                .iter()
                .map(|r| substitute_lifetimes(r, substitution))
                .collect();
            let mut ok = true;
            for (param, arg) in params.iter().zip(arg_types) {
                if !self.engine.is_subtype(param, arg)? {
                    ok = false;
                    break;
                }
            }
            if ok {
                applicable.push(Candidate { params, returns });
            }
        }

        if applicable.is_empty() {
            return Ok(ResolutionOutcome::None);
        }

        // Binding B beats B' if B's concrete signature is a proper subtype
        // of B': every param/return of B is a subtype of B''s, and the
        // reverse does not also hold.
        let mut best: Vec<usize> = (0..applicable.len()).collect();
        for i in 0..applicable.len() {
            for j in 0..applicable.len() {
                if i == j || !best.contains(&i) || !best.contains(&j) {
                    continue;
                }
                if self.signature_properly_beats(&applicable[i], &applicable[j])? {
                    best.retain(|&k| k != j);
                }
            }
        }

        match best.len() {
            1 => Ok(ResolutionOutcome::Unique(applicable[best[0]].clone())),
            0 => Ok(ResolutionOutcome::Ambiguous),
            _ => Ok(ResolutionOutcome::Ambiguous),
        }
    }

    fn signature_properly_beats(&self, a: &Candidate, b: &Candidate) -> Result<bool, InternalFailure> {
        let a_below_b = self.signature_subtype(a, b)?;
        let b_below_a = self.signature_subtype(b, a)?;
        Ok(a_below_b && !b_below_a)
    }

    fn signature_subtype(&self, a: &Candidate, b: &Candidate) -> Result<bool, InternalFailure> {
        for (pa, pb) in a.params.iter().zip(&b.params) {
            if !self.engine.is_subtype(pb, pa)? {
                return Ok(false);
            }
        }
        for (ra, rb) in a.returns.iter().zip(&b.returns) {
            if !self.engine.is_subtype(rb, ra)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Every total function `declared -> call_site` (declared lifetimes mapped
/// to concrete ones seen at the call site), capped at `max` bindings.
fn cartesian_substitutions(declared: &[Name], call_site: &[Name], max: usize) -> Vec<Vec<(Name, Name)>> {
    if declared.is_empty() {
        return vec![Vec::new()];
    }
    if call_site.is_empty() {
        return Vec::new();
    }
    let mut out = vec![Vec::new()];
    for &lifetime in declared {
        let mut next = Vec::new();
        'outer: for binding in &out {
            for &candidate in call_site {
                if next.len() >= max {
                    break 'outer;
                }
                let mut extended = binding.clone();
                extended.push((lifetime, candidate));
                next.push(extended);
            }
        }
        out = next;
        if out.len() >= max {
            out.truncate(max);
        }
    }
    out
}

fn substitute_lifetimes(ty: &Type, substitution: &[(Name, Name)]) -> Type {
    match ty {
        Type::Reference(elem, Some(lifetime)) => {
            let resolved = substitution
                .iter()
                .find(|(decl, _)| decl == lifetime)
                .map_or(*lifetime, |(_, concrete)| *concrete);
            Type::reference(substitute_lifetimes(elem, substitution), Some(resolved))
        }
        Type::Reference(elem, None) => Type::reference(substitute_lifetimes(elem, substitution), None),
        Type::Array(elem) => Type::array(substitute_lifetimes(elem, substitution)),
        Type::Union(members) => Type::union(members.iter().map(|m| substitute_lifetimes(m, substitution)).collect()),
        Type::Intersection(members) => {
            Type::intersection(members.iter().map(|m| substitute_lifetimes(m, substitution)).collect())
        }
        Type::Difference(a, b) => Type::difference(
            substitute_lifetimes(a, substitution),
            substitute_lifetimes(b, substitution),
        ),
        Type::Negation(a) => Type::negation(substitute_lifetimes(a, substitution)),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::CollectingReporter;
    use flowty_algebra::testutil::MapResolver;
    use flowty_algebra::TypeInterner;
    use flowty_common::{CoreOptions, Interner};
    use flowty_solver::{Engine, StaticLifetimeRelation};

    /// Scenario D: `id(int)`/`id(bool)` resolve uniquely to the `int` overload.
    #[test]
    fn direct_resolution_picks_the_unique_subtype_match() {
        let interner = TypeInterner::new();
        let resolver = MapResolver::new();
        let names = Interner::new();
        let lifetimes = StaticLifetimeRelation::new(names.intern("*"));
        let options = CoreOptions::default();
        let engine = Engine::new(&interner, &resolver, &lifetimes, &options);
        let reporter = CollectingReporter::new();
        let ctx = CheckerContext::new(&engine, &resolver, &reporter, &options);

        let candidates = vec![
            Candidate {
                params: vec![Type::Int],
                returns: vec![Type::Int],
            },
            Candidate {
                params: vec![Type::Bool],
                returns: vec![Type::Bool],
            },
        ];
        let outcome = ctx.resolve_direct(candidates, &[Type::Int]).unwrap();
        assert!(matches!(outcome, ResolutionOutcome::Unique(_)));
    }

    /// Scenario E: `h(int|null)`/`h(int|bool)` both accept `0`, ambiguous.
    #[test]
    fn direct_resolution_reports_ambiguity() {
        let interner = TypeInterner::new();
        let resolver = MapResolver::new();
        let names = Interner::new();
        let lifetimes = StaticLifetimeRelation::new(names.intern("*"));
        let options = CoreOptions::default();
        let engine = Engine::new(&interner, &resolver, &lifetimes, &options);
        let reporter = CollectingReporter::new();
        let ctx = CheckerContext::new(&engine, &resolver, &reporter, &options);

        let candidates = vec![
            Candidate {
                params: vec![Type::union(vec![Type::Int, Type::Null])],
                returns: vec![Type::Int],
            },
            Candidate {
                params: vec![Type::union(vec![Type::Int, Type::Bool])],
                returns: vec![Type::Int],
            },
        ];
        let outcome = ctx.resolve_direct(candidates, &[Type::Int]).unwrap();
        assert!(matches!(outcome, ResolutionOutcome::Ambiguous));
    }

    #[test]
    fn direct_resolution_filters_by_arity_first() {
        let interner = TypeInterner::new();
        let resolver = MapResolver::new();
        let names = Interner::new();
        let lifetimes = StaticLifetimeRelation::new(names.intern("*"));
        let options = CoreOptions::default();
        let engine = Engine::new(&interner, &resolver, &lifetimes, &options);
        let reporter = CollectingReporter::new();
        let ctx = CheckerContext::new(&engine, &resolver, &reporter, &options);

        let candidates = vec![
            Candidate {
                params: vec![Type::Int, Type::Int],
                returns: vec![Type::Int],
            },
            Candidate {
                params: vec![Type::Int],
                returns: vec![Type::Int],
            },
        ];
        let outcome = ctx.resolve_direct(candidates, &[Type::Int]).unwrap();
        assert!(matches!(outcome, ResolutionOutcome::Unique(_)));
    }

    #[test]
    fn lifetime_substitution_picks_unique_narrower_binding() {
        let interner = TypeInterner::new();
        let resolver = MapResolver::new();
        let names = Interner::new();
        let star = names.intern("*");
        let inner = names.intern("inner");
        let mut lifetimes = StaticLifetimeRelation::new(star);
        lifetimes.declare(inner, star);
        let options = CoreOptions::default();
        let engine = Engine::new(&interner, &resolver, &lifetimes, &options);
        let reporter = CollectingReporter::new();
        let ctx = CheckerContext::new(&engine, &resolver, &reporter, &options);

        let l = names.intern("l");
        let decl = CallableDeclaration {
            params: vec![Type::reference(Type::Int, Some(l))],
            returns: vec![Type::Void],
            captured_lifetimes: vec![],
            declared_lifetimes: vec![l],
        };
        let outcome = ctx
            .resolve_with_lifetimes(&decl, &[inner], &[Type::reference(Type::Int, Some(inner))])
            .unwrap();
        assert!(matches!(outcome, ResolutionOutcome::Unique(_)));
    }
}
