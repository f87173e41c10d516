//! Minimal AST contract, spec.md §6.2.
//!
//! The real parser/binder is out of scope (§1); this module only defines the
//! shape of node the checker needs to read and the "type"/"signature" slots
//! it's allowed to write. A driver adapts its own AST to these types (or
//! constructs them directly, as the test suite does).

use std::cell::RefCell;

use flowty_algebra::{SemanticType, Type};
use flowty_common::{Name, Span};

/// Identity of a declared variable: by declaration site, not name, per
/// spec.md §3.4 ("A `TypingEnvironment` maps declared variables... by
/// declaration site").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub u32);

/// A declared lifetime identifier's binding site.
pub type LifetimeId = Name;

/// The mutable "type" slot every expression node carries, spec.md §6.2.
/// `RefCell` because the checker fills it in while only holding a shared
/// reference to the surrounding tree (mirrors the teacher's node-mutation
/// pattern for AST decoration without `&mut` threading).
#[derive(Default)]
pub struct TypeSlot {
    inferred: RefCell<Option<SemanticType>>,
    concrete: RefCell<Option<Type>>,
    signature: RefCell<Option<usize>>,
}

impl TypeSlot {
    pub fn set(&self, inferred: SemanticType, concrete: Type) {
        *self.inferred.borrow_mut() = Some(inferred);
        *self.concrete.borrow_mut() = Some(concrete);
    }

    pub fn set_signature(&self, index: usize) {
        *self.signature.borrow_mut() = Some(index);
    }

    #[must_use]
    pub fn inferred(&self) -> Option<SemanticType> {
        self.inferred.borrow().clone()
    }

    #[must_use]
    pub fn concrete(&self) -> Option<Type> {
        self.concrete.borrow().clone()
    }

    #[must_use]
    pub fn signature(&self) -> Option<usize> {
        *self.signature.borrow()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstKind {
    Null,
    Bool(bool),
    Int(i64),
    Byte(u8),
}

/// A boolean/value-producing expression, spec.md §4.4.3.
pub enum Expr {
    Const(ConstKind),
    Var(VarId),
    StaticVariable(Name),
    Cast {
        operand: Box<Expr>,
        target: Type,
    },
    Invoke {
        callee: Name,
        args: Vec<Expr>,
    },
    InvokeIndirect {
        source: Box<Expr>,
        args: Vec<Expr>,
    },
    Arithmetic {
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Comparison {
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Logical {
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    ArrayInit(Vec<Expr>),
    ArrayAccess {
        array: Box<Expr>,
        index: Box<Expr>,
    },
    ArrayUpdate {
        array: Box<Expr>,
        index: Box<Expr>,
        value: Box<Expr>,
    },
    ArrayLength(Box<Expr>),
    RecordInit(Vec<(Name, Expr)>),
    RecordAccess {
        record: Box<Expr>,
        field: Name,
    },
    RecordUpdate {
        record: Box<Expr>,
        field: Name,
        value: Box<Expr>,
    },
    Dereference(Box<Expr>),
    New {
        element: Box<Expr>,
        lifetime: Option<LifetimeId>,
    },
    Lambda {
        params: Vec<Type>,
        body: Box<Expr>,
    },
    LambdaAccess(Name),
    /// `e is T`, used only inside conditions but modeled as an expression so
    /// `checkExpression` can recurse into its operand.
    TypeTest {
        operand: Box<Expr>,
        target: Type,
    },
}

/// A boolean condition, spec.md §4.4.2. Distinct from `Expr` because its
/// logical connectives carry refinement semantics `Expr` does not.
pub enum Condition {
    Negation(Box<Condition>),
    Disjunction(Vec<Condition>),
    Conjunction(Vec<Condition>),
    Implication(Box<Condition>, Box<Condition>),
    Biconditional(Box<Condition>, Box<Condition>),
    TypeTest {
        operand: Expr,
        target: Type,
    },
    /// A universally/existentially quantified condition whose parameters
    /// must be checked non-empty before the body is checked; its
    /// refinements never escape (spec.md §4.4.2).
    Quantifier {
        params: Vec<Type>,
        body: Box<Condition>,
    },
    Other(Expr),
}

/// A refinable access path root: a variable, optionally followed by record
/// field projections. Array and dereference accesses are not refinable
/// (spec.md §4.4.2) and make a type test a no-op on the environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefinablePath {
    pub root: VarId,
    pub fields: Vec<Name>,
}

/// Attempts to read an access-path root out of an expression tree. Returns
/// `None` for array/dereference accesses — those expressions are still
/// type-checked, but a type test over them cannot narrow the environment.
#[must_use]
pub fn refinable_path_of(expr: &Expr) -> Option<RefinablePath> {
    match expr {
        Expr::Var(id) => Some(RefinablePath {
            root: *id,
            fields: Vec::new(),
        }),
        Expr::RecordAccess { record, field } => {
            let mut path = refinable_path_of(record)?;
            path.fields.push(*field);
            Some(path)
        }
        _ => None,
    }
}

pub enum Stmt {
    VarDecl {
        var: VarId,
        declared_type: Type,
        initializer: Option<Expr>,
    },
    Assign {
        targets: Vec<Expr>,
        values: Vec<Expr>,
    },
    Return(Vec<Expr>),
    If {
        condition: Condition,
        then_branch: Vec<Stmt>,
        else_branch: Vec<Stmt>,
    },
    Switch {
        discriminant: Expr,
        cases: Vec<(Vec<ConstKind>, Vec<Stmt>)>,
        default: Option<Vec<Stmt>>,
    },
    While {
        invariants: Vec<Condition>,
        condition: Condition,
        body: Vec<Stmt>,
    },
    Break,
    Continue,
    Fail,
    Assert(Condition),
    Assume(Condition),
    NamedBlock {
        lifetime: LifetimeId,
        enclosing: LifetimeId,
        body: Vec<Stmt>,
    },
}

/// A function/method/property body plus its declared contract, the unit
/// `checkDeclaration` (spec.md §4.4) walks.
pub struct CallableBody {
    pub name: Name,
    pub params: Vec<(VarId, Type)>,
    pub returns: Vec<Type>,
    pub declared_lifetimes: Vec<LifetimeId>,
    pub preconditions: Vec<Condition>,
    pub postconditions: Vec<Condition>,
    pub body: Vec<Stmt>,
    pub span: Span,
}
