//! The de Bruijn substitution invariants of §8's Invariants list (items 1
//! and 2), exercised end-to-end through the parser/walker rather than by
//! constructing `Bound` nodes by hand (that lower-level case lives in
//! `substitute.rs`'s own `#[cfg(test)]` module).

use std::path::Path;

use slang::{to_json, NoImportsLoader, NullSink};

fn run_json(source: &str) -> serde_json::Value {
    let loader = NoImportsLoader;
    let mut sink = NullSink;
    let value = slang::run_source(source, &loader, Path::new("."), &mut sink).unwrap_or_else(|err| panic!("{source:?} failed: {err}"));
    to_json(&value)
}

#[test]
fn single_argument_substitution_terminates_with_a_value() {
    assert_eq!(run_json("(function(x) { x * 2 })(21)"), serde_json::json!(42));
}

#[test]
fn multi_argument_substitution_resolves_every_index() {
    assert_eq!(run_json("(function(a, b, c) { a + b + c })(1, 2, 3)"), serde_json::json!(6));
}

#[test]
fn nested_calls_bump_the_threshold_correctly() {
    // outer captures 10 at index... well, `a` is bound by the outer call;
    // the inner call substitutes its own parameter at threshold 0 while
    // leaving the outer's already-substituted `a` (now a plain `Int`,
    // not a `Bound`) untouched.
    let source = "(function(a) { (function(b) { a + b })(5) })(10)";
    assert_eq!(run_json(source), serde_json::json!(15));
}

#[test]
fn unused_parameter_does_not_affect_the_result() {
    assert_eq!(run_json("(function(x, y) { x })(1, 2)"), serde_json::json!(1));
}

#[test]
fn returned_closure_keeps_its_own_unresolved_bound_index_until_called() {
    // `function(b) { b }` is returned as a value without ever being
    // called; its `Bound(b, 0)` must survive the outer call's
    // substitution untouched (it belongs to a strictly inner frame), and
    // only resolves once this returned closure is itself applied.
    let source = "let make_identity = function(a) { function(b) { b } }; make_identity(1)(99)";
    assert_eq!(run_json(source), serde_json::json!(99));
}

#[test]
fn recursive_this_call_substitutes_a_fresh_argument_each_time() {
    let source = "let f = function(n) { if n == 0 then 0 else n + this(n - 1) }; f(4)";
    assert_eq!(run_json(source), serde_json::json!(10));
}
