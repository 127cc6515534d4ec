//! `nslib::{has, remove, combine}` — thin wrappers over the namespace
//! operations of section 4.6, exposed as ordinary callables (section 4.8).

use crate::error::{Error, Result};
use crate::expr::{Expr, ExprRef};
use crate::position::Position;

fn expect_namespace<'a>(value: &'a ExprRef, position: Position) -> Result<&'a crate::namespace::Namespace> {
    match value.as_ref() {
        Expr::Namespace(namespace) => Ok(namespace),
        other => Err(Error::type_mismatch("Namespace", other.kind_name(), position)),
    }
}

fn expect_name(value: &ExprRef, position: Position) -> Result<&str> {
    match value.as_ref() {
        Expr::Str(name) => Ok(name.as_str()),
        other => Err(Error::type_mismatch("String", other.kind_name(), position)),
    }
}

pub fn builtin_has(args: &[ExprRef], position: Position) -> Result<ExprRef> {
    let namespace = expect_namespace(args.first().ok_or_else(|| Error::internal("nslib::has: missing argument"))?, position)?;
    let name = expect_name(args.get(1).ok_or_else(|| Error::internal("nslib::has: missing argument"))?, position)?;
    Ok(Expr::boolean(namespace.has(name)))
}

pub fn builtin_remove(args: &[ExprRef], position: Position) -> Result<ExprRef> {
    let namespace =
        expect_namespace(args.first().ok_or_else(|| Error::internal("nslib::remove: missing argument"))?, position)?;
    let name = expect_name(args.get(1).ok_or_else(|| Error::internal("nslib::remove: missing argument"))?, position)?;
    Ok(std::rc::Rc::new(Expr::Namespace(namespace.remove(name))))
}

pub fn builtin_combine(args: &[ExprRef], position: Position) -> Result<ExprRef> {
    let a = expect_namespace(args.first().ok_or_else(|| Error::internal("nslib::combine: missing argument"))?, position)?;
    let b = expect_namespace(args.get(1).ok_or_else(|| Error::internal("nslib::combine: missing argument"))?, position)?;
    Ok(std::rc::Rc::new(Expr::Namespace(a.combine(b))))
}
