//! Core options, mirroring `tsz-common::checker_options::CheckerOptions`:
//! a plain `Default`-able struct both the solver and the checker read
//! without creating a dependency cycle between them.

/// Configuration for the decision engine and the flow typer.
///
/// Two fields directly answer the open questions of spec.md §9: the source
/// left both the loop fixed-point question and the empty-array convention
/// unresolved, so this implementation picks a default and makes the choice
/// configurable rather than guessing silently. See `DESIGN.md` for the
/// reasoning behind each default.
#[derive(Debug, Clone)]
pub struct CoreOptions {
    /// When `true`, `while`/`do-while` bodies are refined to a fixed point
    /// (the refined environment is re-checked against the loop body until
    /// it stabilizes, bounded by `max_loop_iterations`). When `false`
    /// (the teacher's apparent default), a single pass is used and declared
    /// types are trusted to bound the refinement lattice.
    pub loop_fixed_point: bool,

    /// Bounds fixed-point loop refinement when `loop_fixed_point` is set.
    pub max_loop_iterations: usize,

    /// When `true`, `Array(T)` is treated as admitting the zero-length
    /// array regardless of `T`, so `Array(a) ∩ Array(b)` is never empty
    /// even when `a ∩ b` is empty. When `false`, array intersection is
    /// empty exactly when the element intersection is empty. Default
    /// `true` (the empty array value `[]` is a genuine inhabitant of every
    /// `Array(T)`, so conflating "no valid element type" with "no values"
    /// would be unsound).
    pub empty_array_inhabits_every_array: bool,

    /// Caps DNF normalization depth (recursion through unions,
    /// intersections, differences, negations and nominal unfolding).
    /// `None` means unbounded (documented worst case: `O(2^n)` conjuncts).
    pub normalization_depth_cap: Option<usize>,

    /// Caps the Cartesian product enumerated by lifetime-parametric
    /// overload resolution (spec.md §4.4.4).
    pub max_lifetime_substitutions: usize,
}

impl Default for CoreOptions {
    fn default() -> Self {
        CoreOptions {
            loop_fixed_point: false,
            max_loop_iterations: 16,
            empty_array_inhabits_every_array: true,
            normalization_depth_cap: Some(256),
            max_lifetime_substitutions: 4096,
        }
    }
}
