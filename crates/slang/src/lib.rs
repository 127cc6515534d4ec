//! Core library for slang: an expression-oriented language evaluated by
//! capture-avoiding substitution (`SPEC_FULL.md` section 1).
//!
//! Grounded on `ouros::lib.rs`'s shape: one `mod` declaration per
//! collaborator, followed by a curated `pub use` re-export block so
//! downstream crates (`slang-cli`) depend on a stable surface rather than
//! reaching into individual modules.
//!
//! The pipeline a whole program goes through, front to back:
//! `parser::parse_program` (text -> raw AST) -> `walk::walk_program`
//! (raw AST -> closed AST, every name resolved) -> `eval::simplify`
//! (closed AST -> value), with `judge::judge_program` available as an
//! optional side channel that types a walked AST without evaluating it.

pub mod builtins;
pub mod environment;
pub mod error;
pub mod eval;
pub mod expr;
pub mod io;
pub mod judge;
pub mod lexer;
pub mod loader;
pub mod namespace;
pub mod parser;
pub mod position;
pub mod substitute;
pub mod types;
pub mod walk;

use std::path::Path;

pub use environment::Environment;
pub use error::{Error, Result};
pub use expr::{Expr, ExprRef};
pub use io::{CollectingSink, NullSink, OutputSink, StdoutSink};
pub use loader::{NoImportsLoader, ProgramLoader};
pub use namespace::Namespace;
pub use position::Position;
pub use types::Type;

/// Parses and resolves `source`'s bindings (`parser::parse_program` then
/// `walk::walk_program`) without evaluating it. Exposed separately from
/// [`run_source`] so a caller (`slang-cli`'s `--judge` flag) can type a
/// program with [`judge::judge_program`] instead of, or in addition to,
/// running it.
///
/// `base_dir` anchors any `import` path `source` contains; `loader`
/// supplies the corresponding file contents, since CORE never touches the
/// filesystem directly (section 9: "no direct file I/O").
pub fn walk_source(
    source: &str,
    loader: &dyn ProgramLoader,
    base_dir: &Path,
    sink: &mut dyn OutputSink,
) -> Result<ExprRef> {
    let parsed = parser::parse_program(source)?;
    let env = builtins::root_environment()?;
    let mut ctx = walk::WalkCtx { loader, base_dir: base_dir.to_path_buf(), sink };
    walk::walk_program(&parsed, &env, &mut ctx)
}

/// The full pipeline: parses, resolves bindings, and evaluates `source`
/// to a value (section 6: the behavior behind `slang-cli`'s `run`
/// subcommand).
pub fn run_source(
    source: &str,
    loader: &dyn ProgramLoader,
    base_dir: &Path,
    sink: &mut dyn OutputSink,
) -> Result<ExprRef> {
    let walked = walk_source(source, loader, base_dir, sink)?;
    eval::simplify(&walked, sink)
}

/// Parses and resolves `source`'s bindings, then types the result with
/// the structural type judge, without evaluating it (section 4.7).
pub fn judge_source(
    source: &str,
    loader: &dyn ProgramLoader,
    base_dir: &Path,
    sink: &mut dyn OutputSink,
) -> Result<Type> {
    let walked = walk_source(source, loader, base_dir, sink)?;
    judge::judge_program(&walked)
}

/// Renders an already-evaluated value as JSON (section 6: "Output
/// format"): scalars map to their JSON scalar, arrays to JSON arrays,
/// namespaces to JSON objects keyed in definition order, and functions to
/// the literal string `"function"` (functions have no JSON
/// representation of their own).
#[must_use]
pub fn to_json(value: &Expr) -> serde_json::Value {
    match value {
        Expr::Int(n) => serde_json::Value::from(*n),
        Expr::Float(n) => serde_json::Value::from(*n),
        Expr::Bool(b) => serde_json::Value::Bool(*b),
        Expr::Str(s) => serde_json::Value::String(s.clone()),
        Expr::Array(elements) => serde_json::Value::Array(elements.iter().map(to_json).collect()),
        Expr::Namespace(namespace) => {
            let mut map = serde_json::Map::with_capacity(namespace.len());
            for (name, value) in namespace.definitions() {
                map.insert(name.clone(), to_json(value));
            }
            serde_json::Value::Object(map)
        }
        Expr::Closure(_) => serde_json::Value::String("function".to_owned()),
        // Not reachable for a fully evaluated value; rendered as a kind
        // name rather than panicking so a caller mis-using `to_json` on a
        // non-value still gets a diagnosable string.
        other => serde_json::Value::String(other.kind_name().to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str) -> Result<ExprRef> {
        let loader = NoImportsLoader;
        let mut sink = NullSink;
        run_source(source, &loader, Path::new("."), &mut sink)
    }

    #[test]
    fn runs_a_program_end_to_end() {
        let value = run("let x = 21; x * 2").unwrap();
        assert!(matches!(value.as_ref(), Expr::Int(42)));
    }

    #[test]
    fn renders_namespace_as_json_object_in_definition_order() {
        let value = run("namespace { a = 1; b = \"two\"; }").unwrap();
        let json = to_json(&value);
        assert_eq!(json, serde_json::json!({"a": 1, "b": "two"}));
    }

    #[test]
    fn renders_function_as_the_string_function() {
        let value = run("function(x) { x }").unwrap();
        assert_eq!(to_json(&value), serde_json::Value::String("function".to_owned()));
    }

    #[test]
    fn renders_array_and_scalars() {
        let value = run("[1, true, \"s\"]").unwrap();
        assert_eq!(to_json(&value), serde_json::json!([1, true, "s"]));
    }
}
