//! The single error type surfaced by every fallible operation in the core.
//!
//! Grounded on `ouros::exception_private`'s `RunError`/`ExcType` shape: one
//! hand-rolled enum, `Cow<'static, str>` message payloads, helper
//! constructor methods, and a hand-written `Display` impl (no
//! `thiserror`/`anyhow`, matching the teacher's dependency stack).

use std::borrow::Cow;
use std::fmt;

use crate::position::Position;

/// `Result` alias used throughout the core, matching `ouros`'s
/// `pub type RunResult<T> = Result<T, RunError>`.
pub type Result<T> = std::result::Result<T, Error>;

/// One of the error kinds named by the error-handling design (see
/// `SPEC_FULL.md` section 7). None of these are caught inside the core;
/// they unwind to the host boundary (`slang-cli`).
#[derive(Debug, Clone)]
pub enum Error {
    /// Produced by the parsing collaborator (lexer/parser), not by CORE
    /// itself, but carried in the same enum so the host has a single
    /// failure type to format.
    ParseError { position: Position, message: Cow<'static, str> },
    /// `walk` found a free `Variable` with no environment definition.
    ResolveUnbound { name: String, position: Position },
    /// `Environment::add` was called with a name already bound in the same
    /// frame.
    EnvDuplicate { name: String },
    /// `Call` argument count did not match the callee's parameter count.
    ArityMismatch { expected: usize, got: usize, position: Position },
    /// An operator or builtin was applied to a value of the wrong shape.
    TypeMismatch { expected: Cow<'static, str>, got: Cow<'static, str>, position: Position },
    /// `Lookup` into a namespace found no definition with that name.
    NoSuchField { namespace: Cow<'static, str>, name: String, position: Position },
    /// `Index` was out of the array's bounds.
    OutOfBounds { index: i64, length: usize, position: Position },
    /// Integer division by zero.
    DivisionByZero { position: Position },
    /// An invariant internal to the core was violated; never expected to
    /// surface from well-formed input.
    InternalError { message: Cow<'static, str> },
}

impl Error {
    #[must_use]
    pub fn parse_error(position: Position, message: impl Into<Cow<'static, str>>) -> Self {
        Self::ParseError { position, message: message.into() }
    }

    #[must_use]
    pub fn resolve_unbound(name: impl Into<String>, position: Position) -> Self {
        Self::ResolveUnbound { name: name.into(), position }
    }

    #[must_use]
    pub fn env_duplicate(name: impl Into<String>) -> Self {
        Self::EnvDuplicate { name: name.into() }
    }

    #[must_use]
    pub fn arity_mismatch(expected: usize, got: usize, position: Position) -> Self {
        Self::ArityMismatch { expected, got, position }
    }

    #[must_use]
    pub fn type_mismatch(
        expected: impl Into<Cow<'static, str>>,
        got: impl Into<Cow<'static, str>>,
        position: Position,
    ) -> Self {
        Self::TypeMismatch { expected: expected.into(), got: got.into(), position }
    }

    #[must_use]
    pub fn no_such_field(namespace: impl Into<Cow<'static, str>>, name: impl Into<String>, position: Position) -> Self {
        Self::NoSuchField { namespace: namespace.into(), name: name.into(), position }
    }

    #[must_use]
    pub fn out_of_bounds(index: i64, length: usize, position: Position) -> Self {
        Self::OutOfBounds { index, length, position }
    }

    #[must_use]
    pub fn division_by_zero(position: Position) -> Self {
        Self::DivisionByZero { position }
    }

    #[must_use]
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InternalError { message: message.into() }
    }

    /// The source position the error should be reported at, when it has
    /// one. `EnvDuplicate` and `InternalError` carry no AST position.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::ParseError { position, .. }
            | Self::ResolveUnbound { position, .. }
            | Self::ArityMismatch { position, .. }
            | Self::TypeMismatch { position, .. }
            | Self::NoSuchField { position, .. }
            | Self::OutOfBounds { position, .. } => Some(*position),
            Self::DivisionByZero { position } => Some(*position),
            Self::EnvDuplicate { .. } | Self::InternalError { .. } => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParseError { position, message } => write!(f, "parse error at {position}: {message}"),
            Self::ResolveUnbound { name, position } => write!(f, "unbound name '{name}' at {position}"),
            Self::EnvDuplicate { name } => write!(f, "'{name}' is already defined in this scope"),
            Self::ArityMismatch { expected, got, position } => {
                write!(f, "arity mismatch at {position}: expected {expected} argument(s), got {got}")
            }
            Self::TypeMismatch { expected, got, position } => {
                write!(f, "type mismatch at {position}: expected {expected}, got {got}")
            }
            Self::NoSuchField { namespace, name, position } => {
                write!(f, "no field '{name}' in {namespace} at {position}")
            }
            Self::OutOfBounds { index, length, position } => {
                write!(f, "index {index} out of bounds for array of length {length} at {position}")
            }
            Self::DivisionByZero { position } => write!(f, "division by zero at {position}"),
            Self::InternalError { message } => write!(f, "internal error: {message}"),
        }
    }
}

impl std::error::Error for Error {}
