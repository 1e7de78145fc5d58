//! Exact structural identity.
//!
//! This is the relation a type hash must reproduce: two types hash equal iff
//! they are `identical`. Assignability and other weaker relations are not
//! modelled here.

use std::sync::Arc;

use crate::ty::Type;

/// Report whether `x` and `y` are exactly the same type.
///
/// Named types compare by the reference of their origin declaration and then
/// by their type arguments; everything else compares structurally.
pub fn identical(x: &Type, y: &Type) -> bool {
    match (x, y) {
        (Type::Basic(a), Type::Basic(b)) => a == b,
        (Type::Pointer(a), Type::Pointer(b)) | (Type::Slice(a), Type::Slice(b)) => {
            identical(a, b)
        }
        (Type::Array { len: la, elem: ea }, Type::Array { len: lb, elem: eb }) => {
            la == lb && identical(ea, eb)
        }
        (Type::Map { key: ka, value: va }, Type::Map { key: kb, value: vb }) => {
            identical(ka, kb) && identical(va, vb)
        }
        (Type::Chan { dir: da, elem: ea }, Type::Chan { dir: db, elem: eb }) => {
            da == db && identical(ea, eb)
        }
        (Type::Struct(a), Type::Struct(b)) => {
            a.len() == b.len()
                && a
                    .iter()
                    .zip(b.iter())
                    .all(|(fa, fb)| fa.name() == fb.name() && identical(fa.ty(), fb.ty()))
        }
        (Type::Tuple(a), Type::Tuple(b)) => identical_lists(a, b),
        (
            Type::Signature {
                params: pa,
                results: ra,
                variadic: va,
            },
            Type::Signature {
                params: pb,
                results: rb,
                variadic: vb,
            },
        ) => va == vb && identical_lists(pa, pb) && identical_lists(ra, rb),
        (Type::TypeParam(a), Type::TypeParam(b)) => a == b,
        (Type::Named(a), Type::Named(b)) => {
            Arc::ptr_eq(a, b)
                || (Arc::ptr_eq(a.origin(), b.origin()) && identical_lists(a.targs(), b.targs()))
        }
        _ => false,
    }
}

/// Pairwise [`identical`] over two lists of equal length.
pub fn identical_lists(xs: &[Type], ys: &[Type]) -> bool {
    xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| identical(x, y))
}
