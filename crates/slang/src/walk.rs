//! The binding resolver (section 4.2): turns every raw `Variable` in a
//! freshly parsed AST into a `Bound` index, a `Reference` to an
//! already-walked environment entry, or `This`, and resolves `let`/`import`
//! statements against a compile-time `Environment`.
//!
//! New module — there is no bytecode-VM counterpart to a substitution
//! interpreter's binding pass in `ouros`. The index arithmetic is grounded
//! on section 3's own definition of a `Bound` index ("counted from the
//! innermost enclosing function's parameter list, scanning outward"); the
//! "inject I/O and the loader, keep the traversal itself pure" shape
//! mirrors `builtins/echo.rs` taking an `&mut dyn OutputSink` and
//! `loader.rs`'s `ProgramLoader` trait rather than touching `std::fs`
//! directly.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::environment::Environment;
use crate::error::{Error, Result};
use crate::expr::{Expr, ExprRef, FunctionBody, FunctionDef, Stmt};
use crate::io::OutputSink;
use crate::loader::{NoImportsLoader, ProgramLoader};
use crate::namespace::Namespace;
use crate::position::Position;

/// The parameter-name stack threaded through a `walk`, one frame per
/// `FunctionDef` currently being descended into, innermost last. Mirrors
/// the threshold-bumping `substitute` does at evaluation time, but over
/// names rather than a numeric threshold, since at this point parameters
/// aren't yet indices — that's exactly what this pass computes.
type ParamStack = Vec<Vec<String>>;

/// The host services a `walk` needs beyond the `Environment` chain:
/// resolving an `import` path to source text, and a sink for any builtin
/// whose *type judge*, not evaluator, runs at walk time (none currently;
/// kept symmetric with `eval::simplify`'s signature so the two passes are
/// easy to compare).
pub struct WalkCtx<'a> {
    pub loader: &'a dyn ProgramLoader,
    pub base_dir: PathBuf,
    pub sink: &'a mut dyn OutputSink,
}

/// Resolves every `Variable` in `expr` against `env`, starting with an
/// empty parameter stack (i.e. `expr` is not itself inside a function
/// body). This is the entry point `lib.rs` calls once per top-level
/// program or import.
pub fn walk_program(expr: &ExprRef, env: &Environment, ctx: &mut WalkCtx) -> Result<ExprRef> {
    walk_expr(expr, env, &mut ParamStack::new(), ctx)
}

/// A convenience entry point for callers (mainly tests) that know the
/// program has no `import`s and don't care about `echo` output during
/// `walk` (there currently is none, but keeping a sink wired up costs
/// nothing and matches `eval::simplify`'s shape).
pub fn walk(expr: &ExprRef, env: &Environment) -> Result<ExprRef> {
    let mut sink = crate::io::NullSink;
    let loader = NoImportsLoader;
    let mut ctx = WalkCtx { loader: &loader, base_dir: PathBuf::new(), sink: &mut sink };
    walk_program(expr, env, &mut ctx)
}

/// Resolves a name against the parameter stack first (innermost frame
/// outward), returning the de Bruijn-style index described in section 3:
/// the number of parameter slots in all frames strictly inside the one
/// `name` was found in, plus its position within that frame.
fn resolve_bound(params: &ParamStack, name: &str) -> Option<usize> {
    let mut inner_slots = 0;
    for frame in params.iter().rev() {
        if let Some(position) = frame.iter().position(|n| n == name) {
            return Some(inner_slots + position);
        }
        inner_slots += frame.len();
    }
    None
}

fn walk_expr(expr: &ExprRef, env: &Environment, params: &mut ParamStack, ctx: &mut WalkCtx) -> Result<ExprRef> {
    match expr.as_ref() {
        Expr::Int(_) | Expr::Float(_) | Expr::Bool(_) | Expr::Str(_) => Ok(expr.clone()),

        Expr::Array(elements) => {
            let mut walked = Vec::with_capacity(elements.len());
            for element in elements {
                walked.push(walk_expr(element, env, params, ctx)?);
            }
            Ok(Rc::new(Expr::Array(walked)))
        }

        Expr::Variable { name, position } => {
            if name == "this" {
                return Ok(Rc::new(Expr::This));
            }
            if let Some(index) = resolve_bound(params, name) {
                return Ok(Rc::new(Expr::Bound { name: name.clone(), index }));
            }
            match env.find(name) {
                Some(value) => Ok(Rc::new(Expr::Reference { name: name.clone(), value })),
                None => Err(Error::resolve_unbound(name.clone(), *position)),
            }
        }

        // `walk` is idempotent on anything it has already produced, so a
        // re-`walk` of an already-resolved tree (e.g. an imported module's
        // namespace definitions, walked once and then merged verbatim into
        // a second program) is a no-op rather than an error.
        Expr::Bound { .. } | Expr::Reference { .. } | Expr::This | Expr::Namespace(_) | Expr::Closure(_) => {
            Ok(expr.clone())
        }

        Expr::UnaryOp { op, operand, position } => {
            Ok(Rc::new(Expr::UnaryOp { op: *op, operand: walk_expr(operand, env, params, ctx)?, position: *position }))
        }

        Expr::BinaryOp { op, lhs, rhs, position } => Ok(Rc::new(Expr::BinaryOp {
            op: *op,
            lhs: walk_expr(lhs, env, params, ctx)?,
            rhs: walk_expr(rhs, env, params, ctx)?,
            position: *position,
        })),

        Expr::If { test, then_branch, else_branch, position } => Ok(Rc::new(Expr::If {
            test: walk_expr(test, env, params, ctx)?,
            then_branch: walk_expr(then_branch, env, params, ctx)?,
            else_branch: walk_expr(else_branch, env, params, ctx)?,
            position: *position,
        })),

        Expr::Block { statements, tail } => walk_block(statements, tail, env, params, ctx),

        Expr::FunctionDef(def) => walk_function_def(def, env, params, ctx),

        Expr::Call { callee, args, position } => {
            let callee = walk_expr(callee, env, params, ctx)?;
            let mut walked_args = Vec::with_capacity(args.len());
            for arg in args {
                walked_args.push(walk_expr(arg, env, params, ctx)?);
            }
            Ok(Rc::new(Expr::Call { callee, args: walked_args, position: *position }))
        }

        Expr::Lookup { base, name, position } => {
            Ok(Rc::new(Expr::Lookup { base: walk_expr(base, env, params, ctx)?, name: name.clone(), position: *position }))
        }

        Expr::Index { array, index, position } => Ok(Rc::new(Expr::Index {
            array: walk_expr(array, env, params, ctx)?,
            index: walk_expr(index, env, params, ctx)?,
            position: *position,
        })),

        Expr::NamespaceLit { definitions } => {
            // Definitions are walked left to right under a scope that
            // cumulatively binds each prior definition, so later entries
            // can reference earlier ones by name (section 4.6). Each
            // definition gets its own freshly pushed frame rather than
            // sharing one via `Environment::add`, so repeating a name
            // (legal shadowing, per `Namespace::lookup`'s last-wins rule)
            // doesn't trip `EnvDuplicate`.
            let mut scope = env.clone();
            let mut walked = Vec::with_capacity(definitions.len());
            for (name, value) in definitions {
                let walked_value = walk_expr(value, &scope, params, ctx)?;
                scope = scope.push().add(name.clone(), walked_value.clone())?;
                walked.push((name.clone(), walked_value));
            }
            Ok(Rc::new(Expr::NamespaceLit { definitions: walked }))
        }
    }
}

fn walk_function_def(def: &Rc<FunctionDef>, env: &Environment, params: &mut ParamStack, ctx: &mut WalkCtx) -> Result<ExprRef> {
    let body = match &def.body {
        FunctionBody::Native(id) => FunctionBody::Native(*id),
        FunctionBody::Expr(body) => {
            let frame = def.params.iter().map(|param| param.name.clone()).collect();
            params.push(frame);
            let walked_body = walk_expr(body, env, params, ctx);
            params.pop();
            FunctionBody::Expr(walked_body?)
        }
    };
    Ok(Rc::new(Expr::FunctionDef(Rc::new(FunctionDef { params: def.params.clone(), body }))))
}

fn walk_block(statements: &[Stmt], tail: &ExprRef, env: &Environment, params: &mut ParamStack, ctx: &mut WalkCtx) -> Result<ExprRef> {
    let mut scope = env.clone();
    let mut walked_statements = Vec::with_capacity(statements.len());
    for stmt in statements {
        match stmt {
            Stmt::Let { name, value } => {
                let walked_value = walk_expr(value, &scope, params, ctx)?;
                scope = scope.push().add(name.clone(), walked_value.clone())?;
                walked_statements.push(Stmt::Let { name: name.clone(), value: walked_value });
            }
            Stmt::Bang { expr } => {
                walked_statements.push(Stmt::Bang { expr: walk_expr(expr, &scope, params, ctx)? });
            }
            Stmt::Import { path, position } => {
                let imported = resolve_import(path, *position, ctx)?;
                for (name, value) in imported.definitions() {
                    scope = scope.push().add(name.clone(), value.clone())?;
                }
                walked_statements.push(Stmt::Import { path: path.clone(), position: *position });
            }
        }
    }
    let walked_tail = walk_expr(tail, &scope, params, ctx)?;
    Ok(Rc::new(Expr::Block { statements: walked_statements, tail: walked_tail }))
}

/// Loads, parses, walks, and fully evaluates the module at `path`, per
/// section 4.4's note that "`Import` is resolved at walk time and has no
/// runtime effect" — by the time the importing program reaches the
/// evaluator, an import has already been reduced to a set of `Reference`
/// bindings pointing at the imported module's (already-computed) values.
/// The imported program must evaluate to a `Namespace` value; anything
/// else is a `TypeMismatch` at the `import` site.
fn resolve_import(path: &str, position: Position, ctx: &mut WalkCtx) -> Result<Namespace> {
    let source = ctx.loader.load(&ctx.base_dir, path)?;
    let parsed = crate::parser::parse_program(&source)?;

    let imported_dir = Path::new(path).parent().map_or_else(|| ctx.base_dir.clone(), |dir| ctx.base_dir.join(dir));
    let root_env = crate::builtins::root_environment()?;
    let mut nested_ctx = WalkCtx { loader: ctx.loader, base_dir: imported_dir, sink: &mut *ctx.sink };
    let walked = walk_program(&parsed, &root_env, &mut nested_ctx)?;
    let value = crate::eval::simplify(&walked, nested_ctx.sink)?;

    match value.as_ref() {
        Expr::Namespace(namespace) => Ok(namespace.clone()),
        other => Err(Error::type_mismatch("Namespace", other.kind_name(), position)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{BinaryOp, FunctionBody, Param};

    fn walk_source(source: &str) -> Result<ExprRef> {
        let parsed = crate::parser::parse_program(source)?;
        let env = crate::builtins::root_environment()?;
        walk(&parsed, &env)
    }

    #[test]
    fn resolves_let_bound_name_to_reference() {
        let walked = walk_source("let x = 1; x").unwrap();
        match walked.as_ref() {
            Expr::Block { tail, .. } => assert!(matches!(tail.as_ref(), Expr::Reference { name, .. } if name == "x")),
            other => panic!("expected Block, got {other:?}"),
        }
    }

    #[test]
    fn resolves_function_parameter_to_bound_zero() {
        let walked = walk_source("function(x) { x }").unwrap();
        match walked.as_ref() {
            Expr::Block { tail, .. } => match tail.as_ref() {
                Expr::FunctionDef(def) => match &def.body {
                    FunctionBody::Expr(body) => {
                        assert!(matches!(body.as_ref(), Expr::Bound { index: 0, .. }));
                    }
                    FunctionBody::Native(_) => panic!("expected Expr body"),
                },
                other => panic!("expected FunctionDef, got {other:?}"),
            },
            other => panic!("expected Block, got {other:?}"),
        }
    }

    #[test]
    fn nested_function_indices_count_outward() {
        // function(a) { function(b) { a + b } } — `b` is index 0 (its own
        // frame), `a` is index 1 (one inner frame of size 1, plus position
        // 0 in the outer frame).
        let walked = walk_source("function(a) { function(b) { a + b } }").unwrap();
        let inner_body = match walked.as_ref() {
            Expr::Block { tail, .. } => match tail.as_ref() {
                Expr::FunctionDef(outer) => match &outer.body {
                    FunctionBody::Expr(outer_body) => match outer_body.as_ref() {
                        Expr::Block { tail, .. } => match tail.as_ref() {
                            Expr::FunctionDef(inner) => match &inner.body {
                                FunctionBody::Expr(body) => body.clone(),
                                FunctionBody::Native(_) => panic!("expected Expr body"),
                            },
                            other => panic!("expected FunctionDef, got {other:?}"),
                        },
                        other => panic!("expected Block, got {other:?}"),
                    },
                    FunctionBody::Native(_) => panic!("expected Expr body"),
                },
                other => panic!("expected FunctionDef, got {other:?}"),
            },
            other => panic!("expected Block, got {other:?}"),
        };
        match inner_body.as_ref() {
            Expr::BinaryOp { op: BinaryOp::Add, lhs, rhs, .. } => {
                assert!(matches!(lhs.as_ref(), Expr::Bound { index: 1, .. }));
                assert!(matches!(rhs.as_ref(), Expr::Bound { index: 0, .. }));
            }
            other => panic!("expected BinaryOp, got {other:?}"),
        }
    }

    #[test]
    fn this_becomes_this_node() {
        let walked = walk_source("function(x) { this }").unwrap();
        match walked.as_ref() {
            Expr::Block { tail, .. } => match tail.as_ref() {
                Expr::FunctionDef(def) => match &def.body {
                    FunctionBody::Expr(body) => assert!(matches!(body.as_ref(), Expr::This)),
                    FunctionBody::Native(_) => panic!("expected Expr body"),
                },
                other => panic!("expected FunctionDef, got {other:?}"),
            },
            other => panic!("expected Block, got {other:?}"),
        }
    }

    #[test]
    fn unbound_name_is_an_error() {
        assert!(walk_source("no_such_name").is_err());
    }

    #[test]
    fn shadowed_namespace_literal_definitions_do_not_error() {
        let walked = walk_source("namespace { x = 1; x = 2; }").unwrap();
        match walked.as_ref() {
            Expr::Block { tail, .. } => assert!(matches!(tail.as_ref(), Expr::NamespaceLit { .. })),
            other => panic!("expected Block, got {other:?}"),
        }
    }

    #[test]
    fn repeated_let_names_shadow_instead_of_erroring() {
        let walked = walk_source("let x = 1; let x = 2; x").unwrap();
        match walked.as_ref() {
            Expr::Block { tail, .. } => assert!(matches!(tail.as_ref(), Expr::Reference { .. })),
            other => panic!("expected Block, got {other:?}"),
        }
    }

    #[test]
    fn import_without_a_loader_is_an_error() {
        assert!(walk_source(r#"import "./other.slang"; 1"#).is_err());
    }
}
