//! `echo(v)` — serialize `v` to standard output as a line, return `v`
//! unchanged (section 4.8).

use crate::error::{Error, Result};
use crate::expr::ExprRef;
use crate::io::OutputSink;

pub fn builtin_echo(args: &[ExprRef], sink: &mut dyn OutputSink) -> Result<ExprRef> {
    let value = args.first().ok_or_else(|| Error::internal("echo: missing argument"))?;
    sink.emit_line(&value.stringify());
    Ok(value.clone())
}
