//! The compile-time lexical scope chain used by the binding resolver
//! (section 4.1). Distinct from `namespace.rs`'s runtime `Namespace`
//! value: an `Environment` only ever exists while `walk`-ing an AST (and,
//! transiently, captured inside a `Closure`), never as a value a program
//! can pass around.
//!
//! No teacher counterpart: `ouros::namespace` is a VM call-frame slot
//! arena, an unrelated concept despite the name collision (see
//! `namespace.rs`'s module doc and `DESIGN.md`). This module is new,
//! built directly from section 4.1's operation list.

use std::rc::Rc;

use crate::error::{Error, Result};
use crate::expr::ExprRef;

#[derive(Debug)]
struct Frame {
    parent: Option<Environment>,
    bindings: Vec<(String, ExprRef)>,
}

/// A lexical scope: an ordered list of `(name, value)` bindings plus an
/// optional parent. Environments are acyclic and never mutate an existing
/// frame once it has a child (`push` always allocates a fresh frame), so
/// an `Environment` can be cheaply cloned (`Rc` increment) and safely
/// captured by a `Closure`.
#[derive(Debug, Clone)]
pub struct Environment(Rc<Frame>);

impl Environment {
    /// A fresh root environment with no parent and no bindings.
    #[must_use]
    pub fn root() -> Self {
        Self(Rc::new(Frame { parent: None, bindings: Vec::new() }))
    }

    /// A child environment with an empty symbol map and `self` as parent.
    #[must_use]
    pub fn push(&self) -> Self {
        Self(Rc::new(Frame { parent: Some(self.clone()), bindings: Vec::new() }))
    }

    /// Returns a new environment with `name` bound to `value` added to
    /// *this* frame. Fails with `EnvDuplicate` if `name` is already bound
    /// in this frame (not a parent) — shadowing across frames is allowed,
    /// re-declaration within one is not.
    ///
    /// Frames are append-only trees, so "adding" to a frame actually
    /// produces a new frame with the same parent; any `Environment` handle
    /// still pointing at the old frame is unaffected.
    pub fn add(&self, name: impl Into<String>, value: ExprRef) -> Result<Self> {
        let name = name.into();
        if self.0.bindings.iter().any(|(n, _)| *n == name) {
            return Err(Error::env_duplicate(name));
        }
        let mut bindings = self.0.bindings.clone();
        bindings.push((name, value));
        Ok(Self(Rc::new(Frame { parent: self.0.parent.clone(), bindings })))
    }

    /// Searches this frame, then each parent in turn, for `name`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<ExprRef> {
        self.0
            .bindings
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value.clone())
            .or_else(|| self.0.parent.as_ref().and_then(|parent| parent.find(name)))
    }

    /// The union of names visible from this frame (this frame's own names
    /// plus every parent's), in unspecified order, per section 4.1.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut names: Vec<String> = self.0.bindings.iter().map(|(n, _)| n.clone()).collect();
        if let Some(parent) = &self.0.parent {
            names.extend(parent.keys());
        }
        names
    }

    /// The topmost ancestor of this environment.
    #[must_use]
    pub fn root_of(&self) -> Self {
        match &self.0.parent {
            Some(parent) => parent.root_of(),
            None => self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Expr;

    #[test]
    fn find_walks_up_parents() {
        let root = Environment::root().add("x", Expr::int(1)).unwrap();
        let child = root.push();
        assert!(child.find("x").is_some());
        assert!(child.find("y").is_none());
    }

    #[test]
    fn duplicate_add_in_same_frame_fails() {
        let root = Environment::root().add("x", Expr::int(1)).unwrap();
        assert!(root.add("x", Expr::int(2)).is_err());
    }

    #[test]
    fn shadowing_across_frames_is_allowed() {
        let root = Environment::root().add("x", Expr::int(1)).unwrap();
        let child = root.push().add("x", Expr::int(2)).unwrap();
        match child.find("x").unwrap().as_ref() {
            Expr::Int(value) => assert_eq!(*value, 2),
            other => panic!("expected Int, got {other:?}"),
        }
    }
}
