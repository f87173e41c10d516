//! Common types and utilities shared by the flowty checker core.
//!
//! This crate provides the foundational layer used by both the type
//! algebra/decision engine (`flowty-algebra`, `flowty-solver`) and the flow
//! typer (`flowty-checker`):
//! - String interning (`Name`, `Interner`)
//! - Source spans (`Span`, `Spanned`)
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`, `CoreDiagnosticKind`)
//! - Recursion/iteration guards for normalization and nominal unfolding
//! - Core options (the two documented open-question toggles plus bounds)

pub mod diagnostics;
pub mod interner;
pub mod options;
pub mod recursion;
pub mod span;

pub use diagnostics::{CoreDiagnosticKind, Diagnostic, DiagnosticCategory, format_message};
pub use interner::{Interner, Name};
pub use options::CoreOptions;
pub use recursion::{RecursionGuard, RecursionProfile, RecursionResult};
pub use span::{Span, Spanned};
