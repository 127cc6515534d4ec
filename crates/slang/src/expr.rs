//! The term algebra (section 3: Expressions, Statements, Values).
//!
//! A single `Expr` enum carries both pre-evaluation AST forms and the
//! value forms that are "a subset of expressions" per the spec's own data
//! model — matching `original_source/slang/syntax/terms.py`, where
//! `Value`/`Array` are themselves `Expression` subclasses rather than a
//! disjoint type. Variant list keyed off
//! `original_source/slang/syntax/terms.py`'s actual class list
//! (`Bang`/`Assignment`/`Block`/`Reference`/`This`/`UnaryOperation`/
//! `BinaryOperation`/`Bound`/`Variable`/`IfThenElse`/`FunctionDef`/`Call`/
//! `Lookup`/`NamespaceDefinition`/`Namespace`/`Index`), not on
//! `ouros::expressions::Expr`'s much larger Python-AST scale.

use std::rc::Rc;

use strum::{Display, EnumString};

use crate::environment::Environment;
use crate::namespace::Namespace;
use crate::position::Position;
use crate::types::Type;

pub type ExprRef = Rc<Expr>;

/// `{+, -, *, /, ^, %, ==, <, >, <=, >=}` from section 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum BinaryOp {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "/")]
    Div,
    #[strum(serialize = "^")]
    Pow,
    #[strum(serialize = "%")]
    Mod,
    #[strum(serialize = "==")]
    Eq,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = "<=")]
    Le,
    #[strum(serialize = ">=")]
    Ge,
}

/// `{+, -, ~, !}` from section 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum UnaryOp {
    #[strum(serialize = "+")]
    Plus,
    #[strum(serialize = "-")]
    Neg,
    #[strum(serialize = "~")]
    BitNot,
    #[strum(serialize = "!")]
    Not,
}

/// A function parameter; the type annotation is consumed only by the type
/// judge (section 4.7), never by the evaluator.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub annotation: Option<Type>,
}

/// The body of a `FunctionDef`: either a slang expression, or a native
/// handle identified by a `BuiltinId` (section 4.8). Builtin bodies are
/// never substituted (section 4.3).
#[derive(Debug, Clone)]
pub enum FunctionBody {
    Expr(ExprRef),
    Native(crate::builtins::BuiltinId),
}

#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub params: Vec<Param>,
    pub body: FunctionBody,
}

/// A function paired with the environment captured at evaluation time
/// (section 9: "Capture of enclosing environment in functions"). This is
/// the *only* callable value; a bare `FunctionDef` is not itself callable
/// until closed over an `Environment`.
#[derive(Debug, Clone)]
pub struct Closure {
    pub def: Rc<FunctionDef>,
    pub env: Environment,
}

/// A statement, evaluated for effect on the enclosing `Block`'s scope
/// (section 3: Statements).
#[derive(Debug, Clone)]
pub enum Stmt {
    /// `let name = value;` — binds `name` to `value` in a child scope.
    Let { name: String, value: ExprRef },
    /// `import "path";` — resolved entirely during `walk` (see
    /// `walk.rs`); by the time this reaches the evaluator, the imported
    /// namespace's definitions have already been merged into scope, so
    /// `Block` evaluation skips `Import` statements. Retained as an AST
    /// node only so diagnostics can still point at the `import` site.
    Import { path: String, position: Position },
    /// `!expr;` — evaluated for its side effect (e.g. `echo`) and
    /// discarded.
    Bang { expr: ExprRef },
}

/// The term algebra. Pre-evaluation AST forms and post-evaluation value
/// forms share one enum; `Expr::is_value` distinguishes them structurally.
#[derive(Debug, Clone)]
pub enum Expr {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    /// Doubles as the `ArrayLit` AST form (elements may be unreduced) and
    /// the `Array` value form (elements are all values), per section 3.
    Array(Vec<ExprRef>),
    /// Raw name reference, present only before `walk` (section 4.2).
    Variable { name: String, position: Position },
    /// De Bruijn-style bound parameter reference, `index` counted from the
    /// innermost enclosing function's parameter list (section 3).
    Bound { name: String, index: usize },
    /// A frozen pointer to a resolved environment/top-level symbol.
    Reference { name: String, value: ExprRef },
    /// The self-reference placeholder; illegal outside a function body,
    /// resolved to a `Reference` at `Call` time (section 4.5).
    This,
    UnaryOp { op: UnaryOp, operand: ExprRef, position: Position },
    BinaryOp { op: BinaryOp, lhs: ExprRef, rhs: ExprRef, position: Position },
    If { test: ExprRef, then_branch: ExprRef, else_branch: ExprRef, position: Position },
    Block { statements: Vec<Stmt>, tail: ExprRef },
    FunctionDef(Rc<FunctionDef>),
    Call { callee: ExprRef, args: Vec<ExprRef>, position: Position },
    Lookup { base: ExprRef, name: String, position: Position },
    Index { array: ExprRef, index: ExprRef, position: Position },
    /// The unevaluated `namespace { ... }` literal; definitions are
    /// evaluated left-to-right under a cumulative scope (section 4.6).
    NamespaceLit { definitions: Vec<(String, ExprRef)> },
    /// The evaluated namespace value (section 3: Values).
    Namespace(Namespace),
    /// The evaluated function value (section 3: Values).
    Closure(Rc<Closure>),
}

impl Expr {
    /// Whether this node is already a value (`is_value` in section 3/9's
    /// terminology). `Array` is a value only once every element is.
    #[must_use]
    pub fn is_value(&self) -> bool {
        match self {
            Self::Int(_) | Self::Float(_) | Self::Bool(_) | Self::Str(_) | Self::Namespace(_) | Self::Closure(_) => {
                true
            }
            Self::Array(elements) => elements.iter().all(|e| e.is_value()),
            _ => false,
        }
    }

    #[must_use]
    pub fn int(value: i64) -> ExprRef {
        Rc::new(Self::Int(value))
    }

    #[must_use]
    pub fn float(value: f64) -> ExprRef {
        Rc::new(Self::Float(value))
    }

    #[must_use]
    pub fn boolean(value: bool) -> ExprRef {
        Rc::new(Self::Bool(value))
    }

    #[must_use]
    pub fn string(value: impl Into<String>) -> ExprRef {
        Rc::new(Self::Str(value.into()))
    }

    /// Renders a value for the `echo` builtin (section 4.8) and for JSON
    /// function placeholders. Only meaningful for values; non-value nodes
    /// render their kind name so a stray call is at least diagnosable.
    #[must_use]
    pub fn stringify(&self) -> String {
        match self {
            Self::Int(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
            Self::Bool(value) => value.to_string(),
            Self::Str(value) => value.clone(),
            Self::Array(elements) => {
                let rendered: Vec<String> = elements.iter().map(|e| e.stringify()).collect();
                format!("[{}]", rendered.join(", "))
            }
            Self::Namespace(namespace) => {
                let rendered: Vec<String> =
                    namespace.definitions().iter().map(|(name, value)| format!("{name}={}", value.stringify())).collect();
                format!("namespace{{{}}}", rendered.join(", "))
            }
            Self::Closure(_) => "function".to_owned(),
            other => other.kind_name().to_owned(),
        }
    }

    /// A short, non-exhaustive description of this node's shape, used in
    /// `TypeMismatch` error messages (`Error::type_mismatch`'s `got`
    /// argument).
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "Int",
            Self::Float(_) => "Float",
            Self::Bool(_) => "Bool",
            Self::Str(_) => "String",
            Self::Array(_) => "Array",
            Self::Namespace(_) => "Namespace",
            Self::Closure(_) => "Function",
            Self::Variable { .. } => "Variable",
            Self::Bound { .. } => "Bound",
            Self::Reference { .. } => "Reference",
            Self::This => "This",
            Self::UnaryOp { .. } => "UnaryOp",
            Self::BinaryOp { .. } => "BinaryOp",
            Self::If { .. } => "If",
            Self::Block { .. } => "Block",
            Self::FunctionDef(_) => "FunctionDef",
            Self::Call { .. } => "Call",
            Self::Lookup { .. } => "Lookup",
            Self::Index { .. } => "Index",
            Self::NamespaceLit { .. } => "NamespaceLit",
        }
    }
}
