//! The builtins registry (section 4.8): `echo`, `length`, and
//! `nslib::{has, remove, combine}`, exposed under the root namespace
//! `builtins`.
//!
//! Directly modeled on `ouros::builtins`'s one-file-per-builtin
//! convention: `mod.rs` declares one submodule per builtin and a registry
//! enum, each submodule exports a single `pub fn builtin_<name>(...)`
//! following `builtins/abs.rs`'s shape (an arg-extraction helper, then a
//! match over `Expr` variants producing a typed result or a
//! `TypeMismatch`).

mod echo;
mod length;
mod nslib;

use std::rc::Rc;

use strum::{Display, EnumString, IntoStaticStr};

use crate::environment::Environment;
use crate::error::Result;
use crate::expr::{Closure, Expr, ExprRef, FunctionBody, FunctionDef, Param};
use crate::io::OutputSink;
use crate::namespace::Namespace;
use crate::position::Position;

/// The root lexical scope every program (and every imported module) starts
/// `walk` from: an otherwise-empty `Environment` with `builtins` bound to
/// `builtins_namespace()` (section 9: "Global builtins"). Shared by
/// `walk::walk_program`'s top-level entry point and its own handling of
/// `import` (each imported file is walked from its own fresh instance of
/// this same scope).
pub fn root_environment() -> Result<Environment> {
    Environment::root().add("builtins", Rc::new(Expr::Namespace(builtins_namespace())))
}

/// Identifies a builtin's native handle. A `FunctionDef` whose body is
/// `FunctionBody::Native(id)` dispatches here instead of substituting and
/// evaluating a slang expression (section 4.8: "A builtin is modeled as a
/// `FunctionDef` whose body is a native handle").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
pub enum BuiltinId {
    Echo,
    Length,
    NsHas,
    NsRemove,
    NsCombine,
}

impl BuiltinId {
    /// Invokes the native handle with already-simplified arguments. The
    /// arity has already been checked by the evaluator's `Call` rule
    /// (section 4.4) against `self.param_count()`.
    pub fn call(self, args: &[ExprRef], sink: &mut dyn OutputSink, position: Position) -> Result<ExprRef> {
        match self {
            Self::Echo => echo::builtin_echo(args, sink),
            Self::Length => length::builtin_length(args, position),
            Self::NsHas => nslib::builtin_has(args, position),
            Self::NsRemove => nslib::builtin_remove(args, position),
            Self::NsCombine => nslib::builtin_combine(args, position),
        }
    }

    fn param_names(self) -> &'static [&'static str] {
        match self {
            Self::Echo => &["value"],
            Self::Length => &["array"],
            Self::NsHas | Self::NsRemove => &["namespace", "name"],
            Self::NsCombine => &["a", "b"],
        }
    }

    fn closure(self) -> ExprRef {
        let params = self.param_names().iter().map(|name| Param { name: (*name).to_owned(), annotation: None }).collect();
        let def = Rc::new(FunctionDef { params, body: FunctionBody::Native(self) });
        Rc::new(Expr::Closure(Rc::new(Closure { def, env: Environment::root() })))
    }
}

/// Builds the `builtins` namespace seeded into the root environment at
/// startup (section 9: "Global builtins"). No process-wide mutable state:
/// every call constructs a fresh, independent namespace value.
#[must_use]
pub fn builtins_namespace() -> Namespace {
    let nslib = Namespace::new(vec![
        ("has".to_owned(), BuiltinId::NsHas.closure()),
        ("remove".to_owned(), BuiltinId::NsRemove.closure()),
        ("combine".to_owned(), BuiltinId::NsCombine.closure()),
    ]);
    Namespace::new(vec![
        ("echo".to_owned(), BuiltinId::Echo.closure()),
        ("length".to_owned(), BuiltinId::Length.closure()),
        ("nslib".to_owned(), Rc::new(Expr::Namespace(nslib))),
    ])
}
