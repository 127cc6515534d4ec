//! The runtime `Namespace` value (section 4.6): an ordered list of named
//! definitions supporting has/lookup/remove/combine.
//!
//! Deliberately **not** grounded on `ouros::namespace` — that module
//! implements `NamespaceId`/`Namespaces{stack, reuse_ids, ...}`, a VM
//! call-frame variable-slot arena, an unrelated concept that happens to
//! share the name. This module is grounded instead on
//! `original_source/slang/syntax/terms.py`'s `Namespace` class
//! (`has`/`remove`/`combine`/`lookup`/`for_json`), with one deliberate
//! semantic change recorded in `DESIGN.md`: `lookup` resolves to
//! last-definition-wins rather than the original's first-match scan.

use crate::expr::ExprRef;

/// An ordered, possibly-shadowed list of `(name, value)` definitions.
/// Kept as a `Vec` rather than a map so insertion order is preserved for
/// iteration and JSON serialization (section 9: "Namespace ordering").
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    definitions: Vec<(String, ExprRef)>,
}

impl Namespace {
    #[must_use]
    pub fn new(definitions: Vec<(String, ExprRef)>) -> Self {
        Self { definitions }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.definitions.iter().any(|(n, _)| n == name)
    }

    /// The last definition with the given name, i.e. the one that would
    /// win under shadowing (section 3, invariant 3). Scanning from the
    /// end and returning the first hit is equivalent to, and implemented
    /// as, last-definition-wins.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<ExprRef> {
        self.definitions.iter().rev().find(|(n, _)| n == name).map(|(_, value)| value.clone())
    }

    /// A namespace with every definition named `name` filtered out.
    #[must_use]
    pub fn remove(&self, name: &str) -> Self {
        Self { definitions: self.definitions.iter().filter(|(n, _)| n != name).cloned().collect() }
    }

    /// `combine(a, b)`: `b`'s definitions, followed by any of `a`'s
    /// definitions whose name does not appear in `b` — so names present in
    /// `b` take precedence (section 3, invariant 4), and `lookup` after
    /// combining still resolves per last-definition-wins since `b`'s own
    /// internal shadowing is untouched.
    #[must_use]
    pub fn combine(&self, other: &Self) -> Self {
        let mut definitions = other.definitions.clone();
        definitions.extend(self.definitions.iter().filter(|(n, _)| !other.has(n)).cloned());
        Self { definitions }
    }

    /// All definitions in insertion order, for JSON serialization
    /// (section 6: "namespace -> JSON object with keys in definition
    /// order").
    #[must_use]
    pub fn definitions(&self) -> &[(String, ExprRef)] {
        &self.definitions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Expr;

    fn ns(pairs: &[(&str, i64)]) -> Namespace {
        Namespace::new(pairs.iter().map(|(name, value)| ((*name).to_owned(), Expr::int(*value))).collect())
    }

    #[test]
    fn lookup_is_last_wins() {
        let namespace = ns(&[("x", 1), ("x", 2)]);
        match namespace.lookup("x").unwrap().as_ref() {
            Expr::Int(value) => assert_eq!(*value, 2),
            other => panic!("expected Int, got {other:?}"),
        }
    }

    #[test]
    fn combine_prefers_b() {
        let a = ns(&[("foo", 1)]);
        let b = ns(&[("foo", 2)]);
        let combined = a.combine(&b);
        match combined.lookup("foo").unwrap().as_ref() {
            Expr::Int(value) => assert_eq!(*value, 2),
            other => panic!("expected Int, got {other:?}"),
        }
    }

    #[test]
    fn combine_keeps_unshadowed_a_definitions() {
        let a = ns(&[("foo", 1), ("bar", 9)]);
        let b = ns(&[("foo", 2)]);
        let combined = a.combine(&b);
        assert!(combined.has("bar"));
        assert!(combined.has("foo"));
    }

    #[test]
    fn remove_clears_has_only_for_that_name() {
        let namespace = ns(&[("foo", 1), ("bar", 2)]);
        let removed = namespace.remove("foo");
        assert!(!removed.has("foo"));
        assert!(removed.has("bar"));
    }
}
