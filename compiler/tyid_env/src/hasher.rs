//! Canonical type encodings used as type hashes.
//!
//! A [`TypeHasher`] writes a type into a text sink such that identical types
//! always produce byte-identical output and different types never do. Named
//! types are identified through the owning [`Environment`]: their prefix is
//! the environment id of their origin declaration.
//!
//! # Encoding
//!
//! ```text
//! int                  basic types by spelling
//! *T  []T  [4]T        pointer, slice, array
//! map[K]V              map
//! chan T  chan<- T  <-chan T   channels; a channel element is parenthesised
//! struct{a int; T}     named and embedded fields
//! (T, U)               tuple
//! func(T, ...U) R      signature; several results (or a tuple) parenthesised
//! T₃                   type parameter with its id in subscript digits
//! 7:pkg/path.List[int] named type: origin id, qualified name, type arguments
//! ```
//!
//! Field and type parameter names are written unescaped. They are
//! [identifiers](tyid_types::is_identifier): no spaces, separators, or
//! subscript digits, and never keywords.

use std::sync::Arc;

use tyid_types::{ChanDir, Named, Type};

use crate::environment::Environment;

/// Writer of canonical type encodings.
///
/// The environment creates one hasher per hash and drives it either with
/// `write_type` or, for a hypothetical instance, with `write_prefix`,
/// `write_type_name`, and `write_type_list`.
pub trait TypeHasher<'env>: Sized {
    /// Create a hasher appending to `sink`, resolving named type identity
    /// through `env`.
    fn new(sink: String, env: &'env Environment) -> Self;

    /// Write the full encoding of `ty`.
    fn write_type(&mut self, ty: &Type);

    /// Write the identity prefix of a named type.
    fn write_prefix(&mut self, named: &Arc<Named>);

    /// Write the declared name of a named type.
    fn write_type_name(&mut self, named: &Named);

    /// Write a delimited list of type arguments.
    fn write_type_list(&mut self, list: &[Type]);

    /// Consume the hasher and return the sink.
    fn finish(self) -> String;
}

/// Default [`TypeHasher`].
pub struct CanonicalHasher<'env> {
    buf: String,
    env: &'env Environment,
}

/// Subscript digits for type parameter ids.
const SUBSCRIPT_DIGITS: [char; 10] = ['₀', '₁', '₂', '₃', '₄', '₅', '₆', '₇', '₈', '₉'];

impl<'env> TypeHasher<'env> for CanonicalHasher<'env> {
    fn new(sink: String, env: &'env Environment) -> Self {
        Self { buf: sink, env }
    }

    fn write_type(&mut self, ty: &Type) {
        ensure_sufficient_stack(|| self.write_type_inner(ty));
    }

    fn write_prefix(&mut self, named: &Arc<Named>) {
        let id = self.env.id_for(named.origin());
        self.buf.push_str(&id.to_string());
        self.buf.push(':');
    }

    fn write_type_name(&mut self, named: &Named) {
        let obj = named.obj();
        if let Some(pkg) = obj.pkg_path() {
            self.buf.push_str(pkg);
            self.buf.push('.');
        }
        self.buf.push_str(obj.name());
    }

    fn write_type_list(&mut self, list: &[Type]) {
        self.buf.push('[');
        self.write_list(list);
        self.buf.push(']');
    }

    fn finish(self) -> String {
        self.buf
    }
}

impl CanonicalHasher<'_> {
    fn write_type_inner(&mut self, ty: &Type) {
        match ty {
            Type::Basic(kind) => self.buf.push_str(kind.name()),
            Type::Pointer(elem) => {
                self.buf.push('*');
                self.write_type(elem);
            }
            Type::Slice(elem) => {
                self.buf.push_str("[]");
                self.write_type(elem);
            }
            Type::Array { len, elem } => {
                self.buf.push('[');
                self.buf.push_str(&len.to_string());
                self.buf.push(']');
                self.write_type(elem);
            }
            Type::Map { key, value } => {
                self.buf.push_str("map[");
                self.write_type(key);
                self.buf.push(']');
                self.write_type(value);
            }
            Type::Chan { dir, elem } => {
                self.buf.push_str(match dir {
                    ChanDir::SendRecv => "chan ",
                    ChanDir::SendOnly => "chan<- ",
                    ChanDir::RecvOnly => "<-chan ",
                });
                // `chan (<-chan T)` and `chan<- chan T` must stay apart.
                let parens = matches!(**elem, Type::Chan { .. });
                if parens {
                    self.buf.push('(');
                }
                self.write_type(elem);
                if parens {
                    self.buf.push(')');
                }
            }
            Type::Struct(fields) => {
                self.buf.push_str("struct{");
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        self.buf.push_str("; ");
                    }
                    if let Some(name) = field.name() {
                        self.buf.push_str(name);
                        self.buf.push(' ');
                    }
                    self.write_type(field.ty());
                }
                self.buf.push('}');
            }
            Type::Tuple(types) => {
                self.buf.push('(');
                self.write_list(types);
                self.buf.push(')');
            }
            Type::Signature {
                params,
                results,
                variadic,
            } => self.write_signature(params, results, *variadic),
            Type::TypeParam(param) => {
                self.buf.push_str(param.name());
                for digit in param.id().to_string().bytes() {
                    self.buf.push(SUBSCRIPT_DIGITS[usize::from(digit - b'0')]);
                }
            }
            Type::Named(named) => {
                self.write_prefix(named);
                self.write_type_name(named);
                // Declarations hash without their type parameters; the
                // prefix already identifies them.
                if !named.targs().is_empty() {
                    self.write_type_list(named.targs());
                }
            }
        }
    }

    fn write_signature(&mut self, params: &[Type], results: &[Type], variadic: bool) {
        self.buf.push_str("func(");
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.buf.push_str(", ");
            }
            if variadic && i + 1 == params.len() {
                self.buf.push_str("...");
            }
            self.write_type(param);
        }
        self.buf.push(')');

        match results {
            [] => {}
            // A lone tuple result keeps its own parens inside the list.
            [single] if !matches!(single, Type::Tuple(_)) => {
                self.buf.push(' ');
                self.write_type(single);
            }
            _ => {
                self.buf.push_str(" (");
                self.write_list(results);
                self.buf.push(')');
            }
        }
    }

    fn write_list(&mut self, list: &[Type]) {
        for (i, ty) in list.iter().enumerate() {
            if i > 0 {
                self.buf.push_str(", ");
            }
            self.write_type(ty);
        }
    }
}

/// Minimum stack space to keep available before recursing (100KB).
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
#[cfg(not(target_arch = "wasm32"))]
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Grow the stack if needed before encoding a nested type.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
