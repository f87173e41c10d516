//! Diagnostic types shared across the decision engine and the flow typer.
//!
//! The core never formats user-facing prose itself — that's the syntax
//! error reporter's job (an external collaborator, see
//! `flowty-checker::collaborators::SyntaxErrorReporter`). This module only
//! defines *which* condition occurred (`CoreDiagnosticKind`, spec.md §7) and
//! a small `{0}`-style template substitution helper the reporter may reuse.

use crate::span::Span;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Error,
    Warning,
    Suggestion,
}

/// The error-kind taxonomy of spec.md §7. Every variant but
/// `InternalFailure` is recoverable: checking continues after it is
/// reported. `InternalFailure` aborts the current declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CoreDiagnosticKind {
    SubtypeError,
    ResolutionError,
    AmbiguousResolution,
    IncomparableOperands,
    BranchAlwaysTaken,
    UnreachableCode,
    InvalidLValExpression,
    RecordMissingField,
    EmptyType,
    InternalFailure,
}

impl CoreDiagnosticKind {
    /// Stable numeric code, analogous to `tsz`'s TSxxxx codes, so a
    /// downstream formatter can key off a fixed id rather than the enum's
    /// in-memory discriminant.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            CoreDiagnosticKind::SubtypeError => 1001,
            CoreDiagnosticKind::ResolutionError => 1002,
            CoreDiagnosticKind::AmbiguousResolution => 1003,
            CoreDiagnosticKind::IncomparableOperands => 1004,
            CoreDiagnosticKind::BranchAlwaysTaken => 1005,
            CoreDiagnosticKind::UnreachableCode => 1006,
            CoreDiagnosticKind::InvalidLValExpression => 1007,
            CoreDiagnosticKind::RecordMissingField => 1008,
            CoreDiagnosticKind::EmptyType => 1009,
            CoreDiagnosticKind::InternalFailure => 1999,
        }
    }

    #[must_use]
    pub const fn category(self) -> DiagnosticCategory {
        match self {
            CoreDiagnosticKind::InternalFailure => DiagnosticCategory::Error,
            _ => DiagnosticCategory::Error,
        }
    }

    #[must_use]
    pub const fn is_recoverable(self) -> bool {
        !matches!(self, CoreDiagnosticKind::InternalFailure)
    }
}

/// A diagnostic ready to be forwarded to the external reporter.
#[derive(Clone, Debug, Serialize)]
pub struct Diagnostic {
    pub kind: CoreDiagnosticKind,
    pub span: Span,
    /// Positional arguments substituted into the kind's message template.
    pub args: Vec<String>,
}

impl Diagnostic {
    #[must_use]
    pub fn new(kind: CoreDiagnosticKind, span: Span) -> Self {
        Diagnostic {
            kind,
            span,
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

/// Replace `{0}`, `{1}`, ... placeholders in `template` with `args`.
#[must_use]
pub fn format_message(template: &str, args: &[String]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_message_substitutes_positional_args() {
        let msg = format_message("expected {0}, found {1}", &["int".into(), "bool".into()]);
        assert_eq!(msg, "expected int, found bool");
    }

    #[test]
    fn internal_failure_is_not_recoverable() {
        assert!(!CoreDiagnosticKind::InternalFailure.is_recoverable());
        assert!(CoreDiagnosticKind::SubtypeError.is_recoverable());
    }
}
