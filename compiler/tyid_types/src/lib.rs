//! Type representation consumed by the identity environment.
//!
//! The environment treats these values opaquely: it stores and compares
//! `Arc<Named>` references and hands whole `Type` trees to a hasher. Nothing
//! here performs inference, substitution, or printing.
//!
//! # Identity
//!
//! - Named types are identified by the reference of their declaration
//!   (`Named::origin`), never by their spelling.
//! - Everything else is structural; see [`identical`].

mod basic;
mod identical;
mod named;
mod ty;

pub use basic::BasicKind;
pub use identical::{identical, identical_lists};
pub use named::{Named, TypeName, TypeParam};
pub use ty::{ChanDir, Field, Type};

/// Byte a type printer reserves to flag instantiation references in its
/// output.
///
/// Hash encodings and printed types share one text space, so no declared name
/// may contain this byte and no hash may ever emit it.
pub const INSTANCE_MARKER: u8 = b'#';

/// Reserved words that can never name a field or a type parameter.
const KEYWORDS: [&str; 25] = [
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

/// Report whether `name` is a plain identifier: a letter or `_` followed by
/// letters, ASCII digits, or `_`, and not a keyword.
///
/// Field names and type parameter names are written into type hashes
/// unescaped, so they are restricted to identifiers. Spaces, punctuation,
/// subscript digits, and keywords would otherwise let a name imitate the
/// encoding around it.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphabetic() || c.is_ascii_digit() || c == '_')
        && !KEYWORDS.contains(&name)
}

/// Panics if `name` is not an [identifier](is_identifier).
#[track_caller]
pub(crate) fn assert_identifier(kind: &str, name: &str) {
    assert!(
        is_identifier(name),
        "{kind} name `{name}` is not an identifier"
    );
}

/// Panics if `name` cannot appear in a type encoding.
#[track_caller]
pub(crate) fn assert_valid_name(kind: &str, name: &str) {
    assert!(!name.is_empty(), "{kind} name must not be empty");
    assert!(
        !name.as_bytes().contains(&INSTANCE_MARKER),
        "{kind} name `{name}` contains the reserved instance marker"
    );
}
