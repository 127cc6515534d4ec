//! The structural type lattice used by the type judge (section 4.7).
//!
//! Grounded directly on `original_source/slang/syntax/types.py`
//! (`BasicType`/`Array`/`Function`/`UnionType`, the `Universe` coercion
//! table, `make_union`, `is_subtype`), translated into an idiomatic Rust
//! enum plus a small registry struct, styled with the field-level `///`
//! doc-comment density `ouros` uses for its own data structs (see
//! `function.rs`/`signature.rs`).

use std::fmt;

/// A type in slang's structural lattice.
///
/// `Any` is the absorbing element of union (`make_union` with `Any` on
/// either side always yields `Any`); `Void` is its identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Any,
    Void,
    Int,
    Float,
    Bool,
    String,
    Array(Box<Type>),
    Function(Vec<Type>, Box<Type>),
    Union(Box<Type>, Box<Type>),
}

impl Type {
    #[must_use]
    pub fn array(element: Type) -> Self {
        Self::Array(Box::new(element))
    }

    #[must_use]
    pub fn function(params: Vec<Type>, ret: Type) -> Self {
        Self::Function(params, Box::new(ret))
    }

    /// The type of an empty array literal, per `Array(Void)` in the
    /// original `types.py`.
    #[must_use]
    pub fn empty_array() -> Self {
        Self::array(Self::Void)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "Any"),
            Self::Void => write!(f, "Void"),
            Self::Int => write!(f, "Int"),
            Self::Float => write!(f, "Float"),
            Self::Bool => write!(f, "Bool"),
            Self::String => write!(f, "String"),
            Self::Array(element) => write!(f, "Array<{element}>"),
            Self::Function(params, ret) => {
                write!(f, "Function<(")?;
                for (idx, param) in params.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, "), {ret}>")
            }
            Self::Union(lhs, rhs) => write!(f, "Union<{lhs}, {rhs}>"),
        }
    }
}

/// Returns whether `lhs <: rhs` (`lhs` can be used where `rhs` is
/// expected).
///
/// Reflexive equality is checked first; a `Union` on the left requires
/// *both* arms to be subtypes of `rhs`, a `Union` on the right requires
/// *any* arm to be a supertype of `lhs` — mirroring `types.py::is_subtype`.
#[must_use]
pub fn is_subtype(lhs: &Type, rhs: &Type) -> bool {
    if lhs == rhs {
        return true;
    }
    match (lhs, rhs) {
        (Type::Union(a, b), _) => is_subtype(a, rhs) && is_subtype(b, rhs),
        (_, Type::Union(a, b)) => is_subtype(lhs, a) || is_subtype(lhs, b),
        _ => false,
    }
}

/// Folds two types into their union, per `types.py::make_union`: `Void` is
/// the identity, `Any` is absorbing, and a structural subtype check in
/// either direction avoids constructing a redundant `Union` wrapper.
#[must_use]
pub fn make_union(lhs: Type, rhs: Type) -> Type {
    if lhs == Type::Void {
        return rhs;
    }
    if rhs == Type::Void {
        return lhs;
    }
    if lhs == Type::Any || rhs == Type::Any {
        return Type::Any;
    }
    if is_subtype(&lhs, &rhs) {
        return rhs;
    }
    if is_subtype(&rhs, &lhs) {
        return lhs;
    }
    Type::Union(Box::new(lhs), Box::new(rhs))
}

/// Folds a sequence of element types into a single array element type,
/// used by the type judge for `ArrayLit`. An empty sequence yields `Void`
/// (the caller wraps it as `Array<Void>`).
#[must_use]
pub fn fold_union(types: impl IntoIterator<Item = Type>) -> Type {
    types.into_iter().fold(Type::Void, make_union)
}

/// A coercion `from -> to` with the conversion function identified by a
/// tag rather than a function pointer, so the registry stays cheap to
/// clone and easy to reason about; only numeric widenings are registered
/// in practice (`Bool -> Int -> Float`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    BoolToInt,
    IntToFloat,
    BoolToFloat,
}

/// The coercion table, precomputed transitively on registration so a
/// lookup stays O(1) per pair (`types.py::Universe.add_coercion`).
///
/// The number of basic types is assumed small (the original's own
/// docstring notes "<50?"), so a flat `Vec` of edges is preferred over a
/// matrix or hash map keyed by a wider type space.
#[derive(Debug, Clone, Default)]
pub struct Coercions {
    edges: Vec<(Type, Type, Coercion)>,
}

impl Coercions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard numeric ladder slang ships with: `Bool -> Int`,
    /// `Int -> Float`, and the transitively-composed `Bool -> Float`.
    ///
    /// `register` only composes forward (an edge is derived for `from` once
    /// an existing edge starts where `to` landed), so `Int -> Float` must be
    /// registered *before* `Bool -> Int` for `Bool -> Float` to be derived —
    /// matching `types.py::add_coercion`'s own registration order.
    #[must_use]
    pub fn standard() -> Self {
        let mut table = Self::new();
        table.register(Type::Int, Type::Float, Coercion::IntToFloat);
        table.register(Type::Bool, Type::Int, Coercion::BoolToInt);
        table
    }

    /// Registers `from -> to`, then composes it with every existing edge
    /// whose source is `to`, so `add_coercion(Bool, Int)` following
    /// `add_coercion(Int, Float)` derives `Bool -> Float` automatically —
    /// matching `types.py::add_coercion`'s transitive composition.
    pub fn register(&mut self, from: Type, to: Type, via: Coercion) {
        let transitive: Vec<_> = self
            .edges
            .iter()
            .filter(|(src, _, _)| *src == to)
            .map(|(_, dst, _)| dst.clone())
            .collect();
        self.edges.push((from.clone(), to.clone(), via));
        for dst in transitive {
            let composed = match (&via, &to) {
                (Coercion::BoolToInt, Type::Int) if dst == Type::Float => Coercion::BoolToFloat,
                _ => via,
            };
            self.edges.push((from.clone(), dst, composed));
        }
    }

    /// Whether `from` can be coerced to `to` (including the identity case).
    #[must_use]
    pub fn can_coerce(&self, from: &Type, to: &Type) -> bool {
        from == to || self.edges.iter().any(|(src, dst, _)| src == from && dst == to)
    }

    /// The least upper bound of two operand types under coercion, used by
    /// the type judge for arithmetic `BinaryOp`s: if one side coerces to
    /// the other, the result is the wider type; otherwise fall back to
    /// `make_union`.
    #[must_use]
    pub fn arithmetic_result(&self, lhs: &Type, rhs: &Type) -> Type {
        if lhs == rhs {
            return lhs.clone();
        }
        if self.can_coerce(lhs, rhs) {
            return rhs.clone();
        }
        if self.can_coerce(rhs, lhs) {
            return lhs.clone();
        }
        make_union(lhs.clone(), rhs.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn void_is_union_identity() {
        assert_eq!(make_union(Type::Void, Type::Int), Type::Int);
        assert_eq!(make_union(Type::Int, Type::Void), Type::Int);
    }

    #[test]
    fn any_is_absorbing() {
        assert_eq!(make_union(Type::Any, Type::Int), Type::Any);
        assert_eq!(make_union(Type::Int, Type::Any), Type::Any);
    }

    #[test]
    fn subtype_union_both_sides() {
        let union = Type::Union(Box::new(Type::Int), Box::new(Type::Bool));
        assert!(is_subtype(&Type::Int, &union));
        assert!(is_subtype(&Type::Bool, &union));
        assert!(!is_subtype(&Type::String, &union));
    }

    #[test]
    fn transitive_coercion_is_precomputed() {
        let table = Coercions::standard();
        assert!(table.can_coerce(&Type::Bool, &Type::Int));
        assert!(table.can_coerce(&Type::Int, &Type::Float));
        assert!(table.can_coerce(&Type::Bool, &Type::Float));
        assert!(!table.can_coerce(&Type::Float, &Type::Int));
    }

    #[test]
    fn empty_array_is_array_of_void() {
        assert_eq!(Type::empty_array(), Type::array(Type::Void));
    }
}
