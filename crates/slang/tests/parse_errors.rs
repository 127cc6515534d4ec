//! Malformed-source diagnostics: every case here is expected to fail
//! either at lex/parse time or at `walk` time, with a `Position` attached
//! (§7's propagation rule: "Position information is attached at
//! construction from the AST node's source position").

use std::path::Path;

use slang::{Error, NoImportsLoader, NullSink};

fn run(source: &str) -> Result<(), Error> {
    let loader = NoImportsLoader;
    let mut sink = NullSink;
    slang::run_source(source, &loader, Path::new("."), &mut sink).map(|_| ())
}

#[test]
fn unterminated_string_literal_is_a_lex_error() {
    let err = run(r#"let x = "unterminated; x"#).unwrap_err();
    assert!(matches!(err, Error::ParseError { .. }));
}

#[test]
fn unexpected_character_is_a_lex_error() {
    let err = run("1 @ 2").unwrap_err();
    assert!(matches!(err, Error::ParseError { .. }));
}

#[test]
fn missing_closing_paren_is_a_parse_error() {
    let err = run("(1 + 2").unwrap_err();
    assert!(matches!(err, Error::ParseError { .. }));
}

#[test]
fn block_ending_in_a_bang_statement_with_no_tail_is_a_parse_error() {
    let err = run("let x = 1;").unwrap_err();
    assert!(matches!(err, Error::ParseError { .. }));
}

#[test]
fn unbound_name_is_a_resolve_error_with_a_position() {
    let err = run("no_such_name + 1").unwrap_err();
    match err {
        Error::ResolveUnbound { name, position } => {
            assert_eq!(name, "no_such_name");
            assert_eq!(position.line, 1);
        }
        other => panic!("expected ResolveUnbound, got {other:?}"),
    }
}

#[test]
fn this_outside_a_function_body_is_an_internal_error_not_silently_accepted() {
    // `This` is only meaningful inside a function body (§3 invariant 6);
    // at top level it walks to `Expr::This` and then fails when the
    // evaluator reaches it unsubstituted.
    assert!(run("this").is_err());
}

#[test]
fn redeclaring_a_let_binding_in_an_import_free_program_still_shadows_cleanly() {
    // Sanity check that shadowing (legal) is not confused with
    // `EnvDuplicate` (illegal re-declaration in the very same frame,
    // which `walk`'s child-scope-per-`Let` design never triggers from
    // surface syntax).
    assert!(run("let x = 1; let x = 2; x").is_ok());
}

#[test]
fn division_by_zero_is_reported_with_a_position() {
    let err = run("1 / 0").unwrap_err();
    assert!(matches!(err, Error::DivisionByZero { .. }));
}

#[test]
fn arity_mismatch_names_expected_and_got_counts() {
    let err = run("(function(x, y) { x })(1)").unwrap_err();
    match err {
        Error::ArityMismatch { expected, got, .. } => {
            assert_eq!(expected, 2);
            assert_eq!(got, 1);
        }
        other => panic!("expected ArityMismatch, got {other:?}"),
    }
}

#[test]
fn out_of_bounds_index_names_the_index_and_length() {
    let err = run("[1, 2][5]").unwrap_err();
    match err {
        Error::OutOfBounds { index, length, .. } => {
            assert_eq!(index, 5);
            assert_eq!(length, 2);
        }
        other => panic!("expected OutOfBounds, got {other:?}"),
    }
}

#[test]
fn looking_up_a_missing_namespace_field_is_reported() {
    let err = run("namespace { x = 1; }::y").unwrap_err();
    assert!(matches!(err, Error::NoSuchField { .. }));
}
