//! `length(a)` — `a` must be an array; returns its size as `Int`
//! (section 4.8; tested by invariant 7 in section 8).

use crate::error::{Error, Result};
use crate::expr::{Expr, ExprRef};
use crate::position::Position;

pub fn builtin_length(args: &[ExprRef], position: Position) -> Result<ExprRef> {
    let value = args.first().ok_or_else(|| Error::internal("length: missing argument"))?;
    match value.as_ref() {
        Expr::Array(elements) => Ok(Expr::int(elements.len() as i64)),
        other => Err(Error::type_mismatch("Array", other.kind_name(), position)),
    }
}
