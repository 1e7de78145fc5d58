//! Named types, their declarations, and their instances.

use std::fmt;
use std::sync::Arc;

use crate::{assert_identifier, assert_valid_name};
use crate::ty::Type;

/// The declared name of a named type, optionally qualified by a package path.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct TypeName {
    pkg_path: Option<Box<str>>,
    name: Box<str>,
}

impl TypeName {
    /// Create an unqualified type name (e.g. a universe-scope type).
    ///
    /// # Panics
    /// Panics if `name` is empty or contains [`crate::INSTANCE_MARKER`].
    #[track_caller]
    pub fn new(name: impl Into<Box<str>>) -> Self {
        let name = name.into();
        assert_valid_name("type", &name);
        Self {
            pkg_path: None,
            name,
        }
    }

    /// Create a type name declared in the package at `pkg_path`.
    ///
    /// # Panics
    /// Panics if either part is empty or contains [`crate::INSTANCE_MARKER`].
    #[track_caller]
    pub fn qualified(pkg_path: impl Into<Box<str>>, name: impl Into<Box<str>>) -> Self {
        let pkg_path = pkg_path.into();
        assert_valid_name("package path", &pkg_path);
        let mut this = Self::new(name);
        this.pkg_path = Some(pkg_path);
        this
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pkg_path(&self) -> Option<&str> {
        self.pkg_path.as_deref()
    }
}

impl fmt::Debug for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pkg_path {
            Some(pkg) => write!(f, "{pkg}.{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// A type parameter of a generic declaration.
///
/// `id` is assigned by the checker and distinguishes parameters that share a
/// spelling (e.g. the `T` of two different generic functions).
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeParam {
    name: Box<str>,
    id: u32,
}

impl TypeParam {
    /// # Panics
    /// Panics if `name` is not an [identifier](crate::is_identifier).
    #[track_caller]
    pub fn new(name: impl Into<Box<str>>, id: u32) -> Self {
        let name = name.into();
        assert_identifier("type parameter", &name);
        Self { name, id }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> u32 {
        self.id
    }
}

/// A named type: either a declaration or an instance of a generic one.
///
/// Named types have reference identity. Two declarations with the same
/// spelling are different types; an instance is identified by its origin
/// declaration plus its type arguments.
///
/// `Named` has no interior mutability, so an `Arc<Named>` published as
/// canonical can never be altered by any holder.
#[derive(Debug)]
pub struct Named {
    obj: Arc<TypeName>,
    type_params: Box<[TypeParam]>,
    /// Declaration this type instantiates. `None` for declarations.
    origin: Option<Arc<Named>>,
    /// Type arguments. Empty for declarations.
    targs: Box<[Type]>,
}

impl Named {
    /// Declare a named type with the given type parameters.
    pub fn declare(obj: TypeName, type_params: Vec<TypeParam>) -> Arc<Self> {
        Arc::new(Self {
            obj: Arc::new(obj),
            type_params: type_params.into_boxed_slice(),
            origin: None,
            targs: Box::default(),
        })
    }

    /// Build a fresh instance of `origin` with `targs`.
    ///
    /// The result is a new reference; use the environment to obtain the
    /// canonical instance. If `origin` is itself an instance, the new
    /// instance is rooted at its declaration.
    ///
    /// # Panics
    /// Panics if `targs` is empty.
    #[track_caller]
    pub fn instance(origin: &Arc<Named>, targs: Vec<Type>) -> Arc<Self> {
        assert!(
            !targs.is_empty(),
            "instance of `{:?}` requires at least one type argument",
            origin.obj
        );
        let origin = Arc::clone(origin.origin());
        Arc::new(Self {
            obj: Arc::clone(&origin.obj),
            type_params: Box::default(),
            origin: Some(origin),
            targs: targs.into_boxed_slice(),
        })
    }

    /// The declaration this type instantiates, or `self` for a declaration.
    pub fn origin(self: &Arc<Self>) -> &Arc<Self> {
        self.origin.as_ref().unwrap_or(self)
    }

    pub fn obj(&self) -> &TypeName {
        &self.obj
    }

    /// Type parameters of the declaration.
    pub fn type_params(&self) -> &[TypeParam] {
        match &self.origin {
            Some(origin) => &origin.type_params,
            None => &self.type_params,
        }
    }

    /// Type arguments of an instance; empty for a declaration.
    pub fn targs(&self) -> &[Type] {
        &self.targs
    }

    pub fn is_instance(&self) -> bool {
        self.origin.is_some()
    }

    pub fn is_generic(&self) -> bool {
        !self.type_params().is_empty()
    }
}
