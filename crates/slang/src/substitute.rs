//! The capture-avoiding substitution engine (section 4.3), keyed by de
//! Bruijn-style `Bound` indices.
//!
//! New module — `ouros` is a bytecode VM, not a substitution interpreter,
//! so there is no teacher counterpart for the traversal itself. The exact
//! threshold arithmetic is grounded on
//! `original_source/slang/syntax/terms.py`'s
//! `Bound.substitute`/`FunctionRef.substitute`.

use std::rc::Rc;

use crate::expr::{Expr, ExprRef, FunctionBody, Stmt};

/// Replaces every `Bound` index `>= threshold` in `expr` with the
/// corresponding entry of `args` (`args[index - threshold]`), leaving
/// indices bound by an enclosing (inner) function untouched. `threshold`
/// rises by a function's parameter count when the traversal crosses into
/// that function's body, so indices stay meaningful without
/// alpha-renaming (section 9: "De Bruijn-style bound indices").
#[must_use]
pub fn substitute(expr: &ExprRef, args: &[ExprRef], threshold: usize) -> ExprRef {
    match expr.as_ref() {
        Expr::Bound { index, .. } => {
            if *index < threshold {
                expr.clone()
            } else {
                args.get(*index - threshold).cloned().unwrap_or_else(|| expr.clone())
            }
        }
        // Values, `This`, raw `Variable` (never survives past `walk`), and
        // `Reference` are all identity: a `Reference` points at an
        // already-resolved, already-closed AST node and must not be
        // re-traversed (section 4.3).
        Expr::Int(_)
        | Expr::Float(_)
        | Expr::Bool(_)
        | Expr::Str(_)
        | Expr::This
        | Expr::Variable { .. }
        | Expr::Reference { .. }
        | Expr::Namespace(_)
        | Expr::Closure(_) => expr.clone(),
        Expr::Array(elements) => {
            Rc::new(Expr::Array(elements.iter().map(|e| substitute(e, args, threshold)).collect()))
        }
        Expr::UnaryOp { op, operand, position } => {
            Rc::new(Expr::UnaryOp { op: *op, operand: substitute(operand, args, threshold), position: *position })
        }
        Expr::BinaryOp { op, lhs, rhs, position } => Rc::new(Expr::BinaryOp {
            op: *op,
            lhs: substitute(lhs, args, threshold),
            rhs: substitute(rhs, args, threshold),
            position: *position,
        }),
        Expr::If { test, then_branch, else_branch, position } => Rc::new(Expr::If {
            test: substitute(test, args, threshold),
            then_branch: substitute(then_branch, args, threshold),
            else_branch: substitute(else_branch, args, threshold),
            position: *position,
        }),
        Expr::Block { statements, tail } => {
            let statements = statements
                .iter()
                .map(|stmt| match stmt {
                    Stmt::Let { name, value } => {
                        Stmt::Let { name: name.clone(), value: substitute(value, args, threshold) }
                    }
                    Stmt::Import { .. } => stmt.clone(),
                    Stmt::Bang { expr } => Stmt::Bang { expr: substitute(expr, args, threshold) },
                })
                .collect();
            Rc::new(Expr::Block { statements, tail: substitute(tail, args, threshold) })
        }
        Expr::FunctionDef(def) => {
            let body = match &def.body {
                // Builtin bodies are never substituted (section 4.3).
                FunctionBody::Native(id) => FunctionBody::Native(*id),
                FunctionBody::Expr(body) => {
                    FunctionBody::Expr(substitute(body, args, threshold + def.params.len()))
                }
            };
            Rc::new(Expr::FunctionDef(Rc::new(crate::expr::FunctionDef { params: def.params.clone(), body })))
        }
        Expr::Call { callee, args: call_args, position } => Rc::new(Expr::Call {
            callee: substitute(callee, args, threshold),
            args: call_args.iter().map(|a| substitute(a, args, threshold)).collect(),
            position: *position,
        }),
        Expr::Lookup { base, name, position } => {
            Rc::new(Expr::Lookup { base: substitute(base, args, threshold), name: name.clone(), position: *position })
        }
        Expr::Index { array, index, position } => Rc::new(Expr::Index {
            array: substitute(array, args, threshold),
            index: substitute(index, args, threshold),
            position: *position,
        }),
        Expr::NamespaceLit { definitions } => Rc::new(Expr::NamespaceLit {
            definitions: definitions.iter().map(|(name, value)| (name.clone(), substitute(value, args, threshold))).collect(),
        }),
    }
}

/// Replaces every `This` leaf in `body` with `replacement` (section 4.5).
/// Stops descending into nested `FunctionDef`s' own `This` occurrences only
/// insofar as those are resolved by *their own* call, not this one — but
/// since `This` always refers to "the function currently being applied",
/// and a nested `FunctionDef` is a value that is not itself being applied
/// here, its body is still walked so that an inner `this` appearing free
/// (not yet shadowed by another call) correctly resolves to the outer
/// closure until the inner function is itself called and gets its own
/// substitution pass.
#[must_use]
pub fn substitute_this(body: &ExprRef, replacement: &ExprRef) -> ExprRef {
    match body.as_ref() {
        Expr::This => replacement.clone(),
        Expr::Int(_)
        | Expr::Float(_)
        | Expr::Bool(_)
        | Expr::Str(_)
        | Expr::Variable { .. }
        | Expr::Bound { .. }
        | Expr::Reference { .. }
        | Expr::Namespace(_)
        | Expr::Closure(_) => body.clone(),
        Expr::Array(elements) => {
            Rc::new(Expr::Array(elements.iter().map(|e| substitute_this(e, replacement)).collect()))
        }
        Expr::UnaryOp { op, operand, position } => {
            Rc::new(Expr::UnaryOp { op: *op, operand: substitute_this(operand, replacement), position: *position })
        }
        Expr::BinaryOp { op, lhs, rhs, position } => Rc::new(Expr::BinaryOp {
            op: *op,
            lhs: substitute_this(lhs, replacement),
            rhs: substitute_this(rhs, replacement),
            position: *position,
        }),
        Expr::If { test, then_branch, else_branch, position } => Rc::new(Expr::If {
            test: substitute_this(test, replacement),
            then_branch: substitute_this(then_branch, replacement),
            else_branch: substitute_this(else_branch, replacement),
            position: *position,
        }),
        Expr::Block { statements, tail } => {
            let statements = statements
                .iter()
                .map(|stmt| match stmt {
                    Stmt::Let { name, value } => {
                        Stmt::Let { name: name.clone(), value: substitute_this(value, replacement) }
                    }
                    Stmt::Import { .. } => stmt.clone(),
                    Stmt::Bang { expr } => Stmt::Bang { expr: substitute_this(expr, replacement) },
                })
                .collect();
            Rc::new(Expr::Block { statements, tail: substitute_this(tail, replacement) })
        }
        Expr::FunctionDef(def) => {
            let body = match &def.body {
                FunctionBody::Native(id) => FunctionBody::Native(*id),
                FunctionBody::Expr(inner) => FunctionBody::Expr(substitute_this(inner, replacement)),
            };
            Rc::new(Expr::FunctionDef(Rc::new(crate::expr::FunctionDef { params: def.params.clone(), body })))
        }
        Expr::Call { callee, args, position } => Rc::new(Expr::Call {
            callee: substitute_this(callee, replacement),
            args: args.iter().map(|a| substitute_this(a, replacement)).collect(),
            position: *position,
        }),
        Expr::Lookup { base, name, position } => {
            Rc::new(Expr::Lookup { base: substitute_this(base, replacement), name: name.clone(), position: *position })
        }
        Expr::Index { array, index, position } => Rc::new(Expr::Index {
            array: substitute_this(array, replacement),
            index: substitute_this(index, replacement),
            position: *position,
        }),
        Expr::NamespaceLit { definitions } => Rc::new(Expr::NamespaceLit {
            definitions: definitions
                .iter()
                .map(|(name, value)| (name.clone(), substitute_this(value, replacement)))
                .collect(),
        }),
    }
}
